use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::ptr::NonNull;

use mupdf_shim_sys as sys;

use crate::colorspace::{ColorParams, Colorspace, color_args};
use crate::context::{context, infallible_context};
use crate::custom_device::{self, CustomDevice};
use crate::display_list::DisplayList;
use crate::error::{Error, Result, ffi_try};
use crate::geometry::{Matrix, Rect};
use crate::image::Image;
use crate::path::Path;
use crate::pixmap::Pixmap;
use crate::stats::{self, HandleKind};
use crate::stroke_state::StrokeState;
use crate::text::Text;
use crate::text_page::{TextPage, TextPageOptions};

/// Compositing modes for [`Device::begin_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Reads the mode out of a native blend value; the isolated and
    /// knockout bits above it are ignored.
    pub(crate) const fn from_raw(value: c_int) -> Self {
        match value & 15 {
            1 => Self::Multiply,
            2 => Self::Screen,
            3 => Self::Overlay,
            4 => Self::Darken,
            5 => Self::Lighten,
            6 => Self::ColorDodge,
            7 => Self::ColorBurn,
            8 => Self::HardLight,
            9 => Self::SoftLight,
            10 => Self::Difference,
            11 => Self::Exclusion,
            12 => Self::Hue,
            13 => Self::Saturation,
            14 => Self::Color,
            15 => Self::Luminosity,
            _ => Self::Normal,
        }
    }
}

/// Whatever the native device writes into.
enum Target<'a> {
    None,
    /// Borrowed for as long as the device may draw into it.
    Pixmap(PhantomData<&'a mut Pixmap>),
    /// Owned until [`Device::into_display_list`] hands it out.
    DisplayList(DisplayList),
    TextPage(TextPage),
    Bbox(Box<sys::FzRect>),
    Custom(PhantomData<&'a mut ()>),
}

/// Receiver of drawing commands.
///
/// A device owns or mutably borrows its target (pixmap, display list, text
/// page, bounding box or [`CustomDevice`]) for as long as it exists, so
/// nothing else can read or write the target while drawing is possible.
pub struct Device<'a> {
    inner: NonNull<sys::FzDevice>,
    target: Target<'a>,
}

// Every target is either owned and `Send`, or a `&mut` to a `Send` value.
unsafe impl Send for Device<'_> {}

impl<'a> Device<'a> {
    /// # Safety
    ///
    /// `ptr` must be null or an owned device reference.
    pub(crate) unsafe fn from_raw(ptr: *mut sys::FzDevice) -> Result<Self> {
        unsafe { Self::with_target(ptr, Target::None) }
    }

    unsafe fn with_target(ptr: *mut sys::FzDevice, target: Target<'a>) -> Result<Self> {
        let inner = NonNull::new(ptr).ok_or_else(|| Error::generic("native call returned no Device"))?;
        stats::record_created(HandleKind::Device);
        Ok(Self { inner, target })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::FzDevice {
        self.inner.as_ptr()
    }

    /// Rasterizer drawing into `pixmap` through `ctm`.
    pub fn draw(pixmap: &'a mut Pixmap, ctm: &Matrix) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_draw_device(ctx, pixmap.as_ptr(), (*ctm).into()))?;
            Self::with_target(raw, Target::Pixmap(PhantomData))
        }
    }

    /// Recorder for a new display list covering `mediabox`. The list is
    /// only reachable through [`Device::into_display_list`].
    pub fn list(mediabox: Rect) -> Result<Self> {
        let list = DisplayList::empty(mediabox)?;
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_list_device(ctx, list.as_ptr()))?;
            Self::with_target(raw, Target::DisplayList(list))
        }
    }

    /// Forwards every drawing command to `device`.
    pub fn custom<D: CustomDevice + Send>(device: &'a mut D) -> Result<Self> {
        let ctx = context()?;
        let callbacks = custom_device::callbacks(device);
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_custom_device(ctx, &callbacks))?;
            Self::with_target(raw, Target::Custom(PhantomData))
        }
    }

    /// Text extractor filling `page`. Get the page back with
    /// [`Device::into_text_page`].
    pub fn text(page: TextPage, options: TextPageOptions) -> Result<Self> {
        let ctx = context()?;
        let opts = options.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_stext_device(ctx, page.as_ptr(), &opts))?;
            Self::with_target(raw, Target::TextPage(page))
        }
    }

    /// Accumulates the bounds of everything drawn. See [`Device::bbox_bounds`].
    pub fn bbox() -> Result<Self> {
        let ctx = context()?;
        let mut rect = Box::new(sys::FzRect::default());
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_bbox_device(ctx, &mut *rect))?;
            Self::with_target(raw, Target::Bbox(rect))
        }
    }

    /// Bounds collected so far; `None` unless this is a bbox device.
    pub fn bbox_bounds(&self) -> Option<Rect> {
        match &self.target {
            Target::Bbox(rect) => Some(Rect::from(**rect)),
            _ => None,
        }
    }

    /// Closes the device and hands back the text page it filled.
    pub fn into_text_page(mut self) -> Result<TextPage> {
        if !matches!(self.target, Target::TextPage(_)) {
            return Err(Error::precondition("not a text device"));
        }
        self.close()?;
        match std::mem::replace(&mut self.target, Target::None) {
            Target::TextPage(page) => Ok(page),
            _ => Err(Error::precondition("not a text device")),
        }
    }

    /// Closes the recorder and hands back the finished list. The device is
    /// released first so nothing can append to the list afterwards.
    pub fn into_display_list(mut self) -> Result<DisplayList> {
        if !matches!(self.target, Target::DisplayList(_)) {
            return Err(Error::precondition("not a list device"));
        }
        self.close()?;
        let target = std::mem::replace(&mut self.target, Target::None);
        drop(self);
        match target {
            Target::DisplayList(list) => Ok(list),
            _ => Err(Error::precondition("not a list device")),
        }
    }

    /// Flushes pending output. Drawing after close is an error.
    pub fn close(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_close_device(ctx, self.as_ptr())) }
    }

    pub fn fill_path(
        &mut self,
        path: &Path,
        even_odd: bool,
        ctm: &Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (color, n) = color_args(cs, color)?;
        unsafe {
            ffi_try!(sys::mupdf_fill_path(
                ctx,
                self.as_ptr(),
                path.as_ptr(),
                c_int::from(even_odd),
                (*ctm).into(),
                cs.as_ptr(),
                color,
                n,
                alpha,
                params.into()
            ))
        }
    }

    pub fn stroke_path(
        &mut self,
        path: &Path,
        stroke: &StrokeState,
        ctm: &Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (color, n) = color_args(cs, color)?;
        unsafe {
            ffi_try!(sys::mupdf_stroke_path(
                ctx,
                self.as_ptr(),
                path.as_ptr(),
                stroke.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                color,
                n,
                alpha,
                params.into()
            ))
        }
    }

    pub fn clip_path(&mut self, path: &Path, even_odd: bool, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_clip_path(
                ctx,
                self.as_ptr(),
                path.as_ptr(),
                c_int::from(even_odd),
                (*ctm).into()
            ))
        }
    }

    pub fn clip_stroke_path(&mut self, path: &Path, stroke: &StrokeState, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_clip_stroke_path(
                ctx,
                self.as_ptr(),
                path.as_ptr(),
                stroke.as_ptr(),
                (*ctm).into()
            ))
        }
    }

    pub fn fill_text(
        &mut self,
        text: &Text,
        ctm: &Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (color, n) = color_args(cs, color)?;
        unsafe {
            ffi_try!(sys::mupdf_fill_text(
                ctx,
                self.as_ptr(),
                text.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                color,
                n,
                alpha,
                params.into()
            ))
        }
    }

    pub fn stroke_text(
        &mut self,
        text: &Text,
        stroke: &StrokeState,
        ctm: &Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (color, n) = color_args(cs, color)?;
        unsafe {
            ffi_try!(sys::mupdf_stroke_text(
                ctx,
                self.as_ptr(),
                text.as_ptr(),
                stroke.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                color,
                n,
                alpha,
                params.into()
            ))
        }
    }

    pub fn clip_text(&mut self, text: &Text, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_clip_text(ctx, self.as_ptr(), text.as_ptr(), (*ctm).into())) }
    }

    pub fn clip_stroke_text(&mut self, text: &Text, stroke: &StrokeState, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_clip_stroke_text(
                ctx,
                self.as_ptr(),
                text.as_ptr(),
                stroke.as_ptr(),
                (*ctm).into()
            ))
        }
    }

    /// Invisible text: extracted by text devices, never painted.
    pub fn ignore_text(&mut self, text: &Text, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_ignore_text(ctx, self.as_ptr(), text.as_ptr(), (*ctm).into())) }
    }

    /// Paints `image` into the unit square mapped by `ctm`.
    pub fn fill_image(&mut self, image: &Image, ctm: &Matrix, alpha: f32, params: ColorParams) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_fill_image(
                ctx,
                self.as_ptr(),
                image.as_ptr(),
                (*ctm).into(),
                alpha,
                params.into()
            ))
        }
    }

    pub fn fill_image_mask(
        &mut self,
        image: &Image,
        ctm: &Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (color, n) = color_args(cs, color)?;
        unsafe {
            ffi_try!(sys::mupdf_fill_image_mask(
                ctx,
                self.as_ptr(),
                image.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                color,
                n,
                alpha,
                params.into()
            ))
        }
    }

    pub fn clip_image_mask(&mut self, image: &Image, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_clip_image_mask(ctx, self.as_ptr(), image.as_ptr(), (*ctm).into())) }
    }

    pub fn pop_clip(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pop_clip(ctx, self.as_ptr())) }
    }

    /// Starts a soft mask. `backdrop` is the colour outside the mask for
    /// luminosity masks; `None` makes an alpha mask.
    pub fn begin_mask(
        &mut self,
        area: &Rect,
        luminosity: bool,
        backdrop: Option<(&Colorspace, &[f32])>,
        params: ColorParams,
    ) -> Result<()> {
        let ctx = context()?;
        let (cs, color, n) = match backdrop {
            Some((cs, color)) => {
                let (color, n) = color_args(cs, color)?;
                (cs.as_ptr(), color, n)
            }
            None => (std::ptr::null_mut(), std::ptr::null(), 0),
        };
        unsafe {
            ffi_try!(sys::mupdf_begin_mask(
                ctx,
                self.as_ptr(),
                (*area).into(),
                c_int::from(luminosity),
                cs,
                color,
                n,
                params.into()
            ))
        }
    }

    pub fn end_mask(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_end_mask(ctx, self.as_ptr())) }
    }

    pub fn begin_group(
        &mut self,
        area: &Rect,
        cs: Option<&Colorspace>,
        isolated: bool,
        knockout: bool,
        blend: BlendMode,
        alpha: f32,
    ) -> Result<()> {
        let ctx = context()?;
        let cs = cs.map_or(std::ptr::null_mut(), Colorspace::as_ptr);
        unsafe {
            ffi_try!(sys::mupdf_begin_group(
                ctx,
                self.as_ptr(),
                (*area).into(),
                cs,
                c_int::from(isolated),
                c_int::from(knockout),
                blend as c_int,
                alpha
            ))
        }
    }

    pub fn end_group(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_end_group(ctx, self.as_ptr())) }
    }

    pub fn begin_tile(&mut self, area: &Rect, view: &Rect, xstep: f32, ystep: f32, ctm: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_begin_tile(
                ctx,
                self.as_ptr(),
                (*area).into(),
                (*view).into(),
                xstep,
                ystep,
                (*ctm).into()
            ))
        }
    }

    pub fn end_tile(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_end_tile(ctx, self.as_ptr())) }
    }

    pub fn begin_layer(&mut self, name: &str) -> Result<()> {
        let ctx = context()?;
        let c_name = CString::new(name)?;
        unsafe { ffi_try!(sys::mupdf_begin_layer(ctx, self.as_ptr(), c_name.as_ptr())) }
    }

    pub fn end_layer(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_end_layer(ctx, self.as_ptr())) }
    }
}

impl Drop for Device<'_> {
    fn drop(&mut self) {
        // The target field is dropped after this, once the device is gone.
        unsafe { sys::mupdf_drop_device(infallible_context(), self.as_ptr()) };
        stats::record_destroyed(HandleKind::Device);
    }
}

impl std::fmt::Debug for Device<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match self.target {
            Target::None => "none",
            Target::Pixmap(_) => "pixmap",
            Target::DisplayList(_) => "display-list",
            Target::TextPage(_) => "text-page",
            Target::Bbox(_) => "bbox",
            Target::Custom(_) => "custom",
        };
        f.debug_struct("Device")
            .field("ptr", &self.inner)
            .field("target", &target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, WriteMode};

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Path {
        let mut path = Path::new().unwrap();
        path.rect(x0, y0, x1, y1).unwrap();
        path
    }

    #[test]
    fn test_draw_device_fills_pixels() {
        let rgb = Colorspace::device_rgb().unwrap();
        let mut pix = Pixmap::new_with_size(&rgb, 8, 8, false).unwrap();
        pix.clear_with(255).unwrap();
        {
            let mut dev = Device::draw(&mut pix, &Matrix::IDENTITY).unwrap();
            dev.fill_path(&square(2.0, 2.0, 6.0, 6.0), false, &Matrix::IDENTITY, &rgb, &[1.0, 0.0, 0.0], 1.0, ColorParams::default())
                .unwrap();
            dev.close().unwrap();
        }
        let stride = pix.stride();
        let inside = 3 * stride + 3 * 3;
        assert_eq!(&pix.samples()[inside..inside + 3], &[255, 0, 0]);
        assert_eq!(&pix.samples()[0..3], &[255, 255, 255]);
    }

    #[test]
    fn test_short_color_is_precondition() {
        let rgb = Colorspace::device_rgb().unwrap();
        let mut dev = Device::bbox().unwrap();
        let err = dev
            .fill_path(&square(0.0, 0.0, 1.0, 1.0), false, &Matrix::IDENTITY, &rgb, &[1.0], 1.0, ColorParams::default())
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("fewer components"));
    }

    #[test]
    fn test_bbox_device_collects_bounds() {
        let gray = Colorspace::device_gray().unwrap();
        let mut dev = Device::bbox().unwrap();
        dev.fill_path(&square(10.0, 20.0, 30.0, 40.0), false, &Matrix::IDENTITY, &gray, &[0.0], 1.0, ColorParams::default())
            .unwrap();
        dev.fill_path(&square(0.0, 0.0, 5.0, 5.0), true, &Matrix::translate(50.0, 50.0), &gray, &[0.0], 1.0, ColorParams::default())
            .unwrap();
        dev.close().unwrap();
        assert_eq!(dev.bbox_bounds(), Some(Rect::new(10.0, 20.0, 55.0, 55.0)));
    }

    #[test]
    fn test_text_device_extracts_string() {
        let font = Font::new("Helvetica").unwrap();
        let mut text = Text::new().unwrap();
        text.show_string(&font, &Matrix::new(12.0, 0.0, 0.0, 12.0, 10.0, 40.0), "Hello", WriteMode::Horizontal)
            .unwrap();
        let page = TextPage::new(Rect::new(0.0, 0.0, 200.0, 100.0)).unwrap();
        let mut dev = Device::text(page, TextPageOptions::default()).unwrap();
        assert!(dev.bbox_bounds().is_none());
        let gray = Colorspace::device_gray().unwrap();
        dev.fill_text(&text, &Matrix::IDENTITY, &gray, &[0.0], 1.0, ColorParams::default())
            .unwrap();
        let page = dev.into_text_page().unwrap();
        assert!(page.to_text().unwrap().contains("Hello"));
    }

    #[test]
    fn test_into_text_page_on_other_device_fails() {
        let dev = Device::bbox().unwrap();
        let err = dev.into_text_page().unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_bbox_is_empty_before_drawing() {
        let dev = Device::bbox().unwrap();
        let bounds = dev.bbox_bounds().unwrap();
        assert_eq!(bounds, Rect::EMPTY);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_list_device_hands_out_finished_list() {
        let gray = Colorspace::device_gray().unwrap();
        let mut dev = Device::list(Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        dev.fill_path(&square(5.0, 5.0, 15.0, 15.0), false, &Matrix::IDENTITY, &gray, &[0.0], 1.0, ColorParams::default())
            .unwrap();
        let list = dev.into_display_list().unwrap();

        let mut bbox = Device::bbox().unwrap();
        list.run(&mut bbox, &Matrix::IDENTITY, &Rect::INFINITE, None).unwrap();
        assert_eq!(bbox.bbox_bounds(), Some(Rect::new(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn test_into_display_list_on_other_device_fails() {
        let dev = Device::bbox().unwrap();
        assert!(matches!(dev.into_display_list(), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_blend_mode_ignores_group_flags() {
        assert_eq!(BlendMode::from_raw(1), BlendMode::Multiply);
        assert_eq!(BlendMode::from_raw(15 | 16 | 32), BlendMode::Luminosity);
        assert_eq!(BlendMode::from_raw(0), BlendMode::Normal);
    }

    #[test]
    fn test_group_and_clip_nesting() {
        let gray = Colorspace::device_gray().unwrap();
        let mut pix = Pixmap::new_with_size(&gray, 4, 4, true).unwrap();
        pix.clear().unwrap();
        let mut dev = Device::draw(&mut pix, &Matrix::IDENTITY).unwrap();
        let area = Rect::new(0.0, 0.0, 4.0, 4.0);
        dev.clip_path(&square(0.0, 0.0, 2.0, 2.0), false, &Matrix::IDENTITY).unwrap();
        dev.begin_group(&area, None, true, false, BlendMode::Multiply, 0.5).unwrap();
        dev.fill_path(&square(0.0, 0.0, 4.0, 4.0), false, &Matrix::IDENTITY, &gray, &[0.0], 1.0, ColorParams::default())
            .unwrap();
        dev.end_group().unwrap();
        dev.pop_clip().unwrap();
        dev.begin_layer("notes").unwrap();
        dev.end_layer().unwrap();
        dev.close().unwrap();
    }
}
