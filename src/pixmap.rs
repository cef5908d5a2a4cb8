use std::os::raw::c_int;
use std::path::Path;

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::colorspace::Colorspace;
use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::IRect;
use crate::handle::{native_handle, path_to_cstring};
use crate::image::Image;

native_handle! {
    /// Raster of samples in a colorspace, optionally with alpha.
    ///
    /// A pixmap owns its samples outright: nothing else holds a native
    /// reference to it, so [`Pixmap::samples_mut`] is exclusive. Use
    /// [`Pixmap::duplicate`] for a copy.
    pub struct Pixmap(sys::FzPixmap): Pixmap,
        drop = sys::mupdf_drop_pixmap;
}

/// Encoded output formats for [`Pixmap::to_buffer`] and [`Pixmap::save_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Pnm,
    Pam,
    Psd,
    /// Quality 0..=100.
    Jpeg(u8),
}

impl ImageFormat {
    fn to_raw(self) -> (c_int, c_int) {
        match self {
            ImageFormat::Png => (sys::MUPDF_IMAGE_PNG, 0),
            ImageFormat::Pnm => (sys::MUPDF_IMAGE_PNM, 0),
            ImageFormat::Pam => (sys::MUPDF_IMAGE_PAM, 0),
            ImageFormat::Psd => (sys::MUPDF_IMAGE_PSD, 0),
            ImageFormat::Jpeg(quality) => (sys::MUPDF_IMAGE_JPEG, c_int::from(quality)),
        }
    }
}

fn dimension(value: u32) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| Error::precondition("pixmap dimension too large"))
}

impl Pixmap {
    /// Allocates an uninitialised pixmap at origin `(x, y)`.
    ///
    /// A pixmap without a colorspace is an alpha-only mask and must have
    /// `alpha` set.
    pub fn new(cs: Option<&Colorspace>, x: i32, y: i32, width: u32, height: u32, alpha: bool) -> Result<Self> {
        let ctx = context()?;
        let cs = cs.map_or(std::ptr::null_mut(), Colorspace::as_ptr);
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_pixmap(
                ctx,
                cs,
                x,
                y,
                dimension(width)?,
                dimension(height)?,
                c_int::from(alpha)
            ))?;
            Self::from_raw(raw)
        }
    }

    pub fn new_with_size(cs: &Colorspace, width: u32, height: u32, alpha: bool) -> Result<Self> {
        Self::new(Some(cs), 0, 0, width, height, alpha)
    }

    /// Deep copy with its own samples.
    pub fn duplicate(&self) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_clone_pixmap(ctx, self.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn x(&self) -> i32 {
        unsafe { sys::mupdf_pixmap_x(infallible_context(), self.as_ptr()) }
    }

    pub fn y(&self) -> i32 {
        unsafe { sys::mupdf_pixmap_y(infallible_context(), self.as_ptr()) }
    }

    pub fn width(&self) -> u32 {
        let w = unsafe { sys::mupdf_pixmap_width(infallible_context(), self.as_ptr()) };
        u32::try_from(w).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        let h = unsafe { sys::mupdf_pixmap_height(infallible_context(), self.as_ptr()) };
        u32::try_from(h).unwrap_or(0)
    }

    pub fn bounds(&self) -> IRect {
        let (x, y) = (self.x(), self.y());
        IRect::new(
            x,
            y,
            x.saturating_add_unsigned(self.width()),
            y.saturating_add_unsigned(self.height()),
        )
    }

    /// Components per pixel, including alpha.
    pub fn n(&self) -> u32 {
        let n = unsafe { sys::mupdf_pixmap_n(infallible_context(), self.as_ptr()) };
        u32::try_from(n).unwrap_or(0)
    }

    pub fn alpha(&self) -> bool {
        unsafe { sys::mupdf_pixmap_alpha(infallible_context(), self.as_ptr()) != 0 }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        let stride = unsafe { sys::mupdf_pixmap_stride(infallible_context(), self.as_ptr()) };
        usize::try_from(stride).unwrap_or(0)
    }

    /// `None` for alpha-only masks.
    pub fn colorspace(&self) -> Option<Colorspace> {
        let raw = unsafe { sys::mupdf_pixmap_colorspace(infallible_context(), self.as_ptr()) };
        if raw.is_null() {
            None
        } else {
            unsafe { Colorspace::from_raw(raw) }.ok()
        }
    }

    /// Horizontal and vertical resolution in dpi.
    pub fn resolution(&self) -> (i32, i32) {
        let ctx = infallible_context();
        unsafe {
            (
                sys::mupdf_pixmap_xres(ctx, self.as_ptr()),
                sys::mupdf_pixmap_yres(ctx, self.as_ptr()),
            )
        }
    }

    pub fn set_resolution(&mut self, xres: i32, yres: i32) {
        unsafe { sys::mupdf_pixmap_set_resolution(infallible_context(), self.as_ptr(), xres, yres) };
    }

    fn samples_len(&self) -> usize {
        self.stride() * self.height() as usize
    }

    /// Borrowed view of the samples, `stride()` bytes per row.
    ///
    /// Clones share these samples; drawing through a device targeting this
    /// pixmap while the slice is alive is not allowed.
    pub fn samples(&self) -> &[u8] {
        let ptr = unsafe { sys::mupdf_pixmap_samples(infallible_context(), self.as_ptr()) };
        let len = self.samples_len();
        if ptr.is_null() || len == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        let ptr = unsafe { sys::mupdf_pixmap_samples(infallible_context(), self.as_ptr()) };
        let len = self.samples_len();
        if ptr.is_null() || len == 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(ptr, len) }
    }

    /// Clears colour to black and alpha to transparent.
    pub fn clear(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_clear_pixmap(ctx, self.as_ptr())) }
    }

    /// Sets every colour byte to `value`; alpha becomes opaque.
    pub fn clear_with(&mut self, value: u8) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_clear_pixmap_with_value(ctx, self.as_ptr(), c_int::from(value))) }
    }

    pub fn invert(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_invert_pixmap(ctx, self.as_ptr())) }
    }

    pub fn gamma(&mut self, gamma: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_gamma_pixmap(ctx, self.as_ptr(), gamma)) }
    }

    /// Maps black and white to the given `0xRRGGBB` colours.
    pub fn tint(&mut self, black: u32, white: u32) -> Result<()> {
        let ctx = context()?;
        let black = c_int::try_from(black & 0x00ff_ffff).unwrap_or(0);
        let white = c_int::try_from(white & 0x00ff_ffff).unwrap_or(0);
        unsafe { ffi_try!(sys::mupdf_tint_pixmap(ctx, self.as_ptr(), black, white)) }
    }

    pub fn to_buffer(&self, format: ImageFormat) -> Result<Buffer> {
        let ctx = context()?;
        let (format, quality) = format.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_pixmap_to_buffer(ctx, self.as_ptr(), format, quality))?;
            Buffer::from_raw(raw)
        }
    }

    pub fn save_as<P: AsRef<Path>>(&self, path: P, format: ImageFormat) -> Result<()> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        let (format, quality) = format.to_raw();
        unsafe { ffi_try!(sys::mupdf_save_pixmap_as(ctx, self.as_ptr(), c_path.as_ptr(), format, quality)) }
    }

    pub fn to_image(&self) -> Result<Image> {
        Image::from_pixmap(self)
    }
}
