use std::path::Path;

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::colorspace::Colorspace;
use crate::context::{context, infallible_context};
use crate::display_list::DisplayList;
use crate::error::{Result, ffi_try};
use crate::handle::{native_handle, path_to_cstring};
use crate::pixmap::Pixmap;

native_handle! {
    /// Decoded or lazily decodable image.
    pub struct Image(sys::FzImage): Image,
        keep = sys::mupdf_keep_image,
        drop = sys::mupdf_drop_image;
}

impl Image {
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_image_from_pixmap(ctx, pixmap.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_image_from_file(ctx, c_path.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    /// Decodes an encoded image (PNG, JPEG, ...) held in `buffer`.
    pub fn from_buffer(buffer: &Buffer) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_image_from_buffer(ctx, buffer.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    /// Vector image that renders `list` at `width` x `height` points.
    pub fn from_display_list(list: &DisplayList, width: f32, height: f32) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_image_from_display_list(ctx, list.as_ptr(), width, height))?;
            Self::from_raw(raw)
        }
    }

    pub fn width(&self) -> u32 {
        let w = unsafe { sys::mupdf_image_width(infallible_context(), self.as_ptr()) };
        u32::try_from(w).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        let h = unsafe { sys::mupdf_image_height(infallible_context(), self.as_ptr()) };
        u32::try_from(h).unwrap_or(0)
    }

    pub fn resolution(&self) -> (i32, i32) {
        let ctx = infallible_context();
        unsafe {
            (
                sys::mupdf_image_xres(ctx, self.as_ptr()),
                sys::mupdf_image_yres(ctx, self.as_ptr()),
            )
        }
    }

    pub fn colorspace(&self) -> Option<Colorspace> {
        let raw = unsafe { sys::mupdf_image_colorspace(infallible_context(), self.as_ptr()) };
        if raw.is_null() {
            None
        } else {
            unsafe { Colorspace::from_raw(raw) }.ok()
        }
    }

    /// Decodes the image at its native size.
    pub fn to_pixmap(&self) -> Result<Pixmap> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_get_pixmap_from_image(ctx, self.as_ptr()))?;
            Pixmap::from_raw(raw)
        }
    }
}
