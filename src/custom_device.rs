//! Drawing commands delivered to host code.
//!
//! [`Device::custom`](crate::Device::custom) wraps a [`CustomDevice`] in a
//! native device. Each callback borrows its arguments: paths, text, images
//! and colorspaces are only valid for the duration of the call, and cloning
//! the immutable ones takes a reference of its own.

use std::ffi::CStr;
use std::os::raw::{c_char, c_float, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use mupdf_shim_sys as sys;
use tracing::{error, warn};

use crate::colorspace::{ColorParams, Colorspace};
use crate::context::infallible_context;
use crate::device::BlendMode;
use crate::error::Result;
use crate::geometry::{Matrix, Rect};
use crate::image::Image;
use crate::path::Path;
use crate::stroke_state::StrokeState;
use crate::text::Text;

/// Receiver for the commands a page or display list draws.
///
/// Every method defaults to doing nothing. A panic inside a method fails the
/// drawing call that triggered it.
#[allow(unused_variables)]
pub trait CustomDevice {
    fn close_device(&mut self) {}

    fn fill_path(
        &mut self,
        path: &Path,
        even_odd: bool,
        ctm: Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) {
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        stroke: &StrokeState,
        ctm: Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) {
    }

    fn clip_path(&mut self, path: &Path, even_odd: bool, ctm: Matrix, scissor: Rect) {}

    fn clip_stroke_path(&mut self, path: &Path, stroke: &StrokeState, ctm: Matrix, scissor: Rect) {}

    fn fill_text(&mut self, text: &Text, ctm: Matrix, cs: &Colorspace, color: &[f32], alpha: f32, params: ColorParams) {}

    fn stroke_text(
        &mut self,
        text: &Text,
        stroke: &StrokeState,
        ctm: Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) {
    }

    fn clip_text(&mut self, text: &Text, ctm: Matrix, scissor: Rect) {}

    fn clip_stroke_text(&mut self, text: &Text, stroke: &StrokeState, ctm: Matrix, scissor: Rect) {}

    /// Invisible text.
    fn ignore_text(&mut self, text: &Text, ctm: Matrix) {}

    fn fill_image(&mut self, image: &Image, ctm: Matrix, alpha: f32, params: ColorParams) {}

    fn fill_image_mask(
        &mut self,
        image: &Image,
        ctm: Matrix,
        cs: &Colorspace,
        color: &[f32],
        alpha: f32,
        params: ColorParams,
    ) {
    }

    fn clip_image_mask(&mut self, image: &Image, ctm: Matrix, scissor: Rect) {}

    fn pop_clip(&mut self) {}

    /// `backdrop` is `None` for alpha masks.
    fn begin_mask(&mut self, area: Rect, luminosity: bool, backdrop: Option<(&Colorspace, &[f32])>, params: ColorParams) {}

    fn end_mask(&mut self) {}

    fn begin_group(
        &mut self,
        area: Rect,
        cs: Option<&Colorspace>,
        isolated: bool,
        knockout: bool,
        blend: BlendMode,
        alpha: f32,
    ) {
    }

    fn end_group(&mut self) {}

    fn begin_layer(&mut self, name: &str) {}

    fn end_layer(&mut self) {}
}

/// Callback table pointing at `device`. The caller keeps `device` borrowed
/// for as long as the native device exists.
pub(crate) fn callbacks<D: CustomDevice>(device: &mut D) -> sys::MupdfDeviceCallbacks {
    sys::MupdfDeviceCallbacks {
        user: std::ptr::from_mut(device).cast(),
        close_device: Some(close_device::<D>),
        fill_path: Some(fill_path::<D>),
        stroke_path: Some(stroke_path::<D>),
        clip_path: Some(clip_path::<D>),
        clip_stroke_path: Some(clip_stroke_path::<D>),
        fill_text: Some(fill_text::<D>),
        stroke_text: Some(stroke_text::<D>),
        clip_text: Some(clip_text::<D>),
        clip_stroke_text: Some(clip_stroke_text::<D>),
        ignore_text: Some(ignore_text::<D>),
        fill_image: Some(fill_image::<D>),
        fill_image_mask: Some(fill_image_mask::<D>),
        clip_image_mask: Some(clip_image_mask::<D>),
        pop_clip: Some(pop_clip::<D>),
        begin_mask: Some(begin_mask::<D>),
        end_mask: Some(end_mask::<D>),
        begin_group: Some(begin_group::<D>),
        end_group: Some(end_group::<D>),
        begin_layer: Some(begin_layer::<D>),
        end_layer: Some(end_layer::<D>),
    }
}

/// Runs `f` on the device behind `user`, turning errors and panics into the
/// nonzero status the shim rethrows.
unsafe fn dispatch<D: CustomDevice>(user: *mut c_void, f: impl FnOnce(&mut D) -> Result<()>) -> c_int {
    // SAFETY: `user` is the `&mut D` captured by `callbacks`, still borrowed
    // by the device that is calling back.
    let device = unsafe { &mut *user.cast::<D>() };
    match panic::catch_unwind(AssertUnwindSafe(|| f(device))) {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => {
            warn!(%err, "custom device could not take its arguments");
            1
        }
        Err(_) => {
            error!("custom device callback panicked");
            1
        }
    }
}

/// Takes a reference of our own on a borrowed native object.
unsafe fn lend<R, T>(
    ptr: *mut R,
    keep: unsafe extern "C" fn(*mut sys::FzContext, *mut R) -> *mut R,
    wrap: unsafe fn(*mut R) -> Result<T>,
) -> Result<T> {
    unsafe { wrap(keep(infallible_context(), ptr)) }
}

unsafe fn lend_path(ptr: *mut sys::FzPath) -> Result<Path> {
    unsafe { lend(ptr, sys::mupdf_keep_path, Path::from_raw) }
}

unsafe fn lend_text(ptr: *mut sys::FzText) -> Result<Text> {
    unsafe { lend(ptr, sys::mupdf_keep_text, Text::from_raw) }
}

unsafe fn lend_stroke(ptr: *mut sys::FzStrokeState) -> Result<StrokeState> {
    unsafe { lend(ptr, sys::mupdf_keep_stroke_state, StrokeState::from_raw) }
}

unsafe fn lend_image(ptr: *mut sys::FzImage) -> Result<Image> {
    unsafe { lend(ptr, sys::mupdf_keep_image, Image::from_raw) }
}

unsafe fn lend_colorspace(ptr: *mut sys::FzColorspace) -> Result<Option<Colorspace>> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { lend(ptr, sys::mupdf_keep_colorspace, Colorspace::from_raw) }.map(Some)
}

unsafe fn required_colorspace(ptr: *mut sys::FzColorspace) -> Result<Colorspace> {
    unsafe { lend(ptr, sys::mupdf_keep_colorspace, Colorspace::from_raw) }
}

unsafe fn color<'c>(ptr: *const c_float, n: c_int) -> &'c [f32] {
    match usize::try_from(n) {
        Ok(n) if n > 0 && !ptr.is_null() => unsafe { slice::from_raw_parts(ptr, n) },
        _ => &[],
    }
}

unsafe extern "C" fn close_device<D: CustomDevice>(user: *mut c_void) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            dev.close_device();
            Ok(())
        })
    }
}

unsafe extern "C" fn fill_path<D: CustomDevice>(
    user: *mut c_void,
    path: *mut sys::FzPath,
    even_odd: c_int,
    ctm: sys::FzMatrix,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let path = lend_path(path)?;
            let cs = required_colorspace(cs)?;
            dev.fill_path(&path, even_odd != 0, ctm.into(), &cs, color(color_ptr, n), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn stroke_path<D: CustomDevice>(
    user: *mut c_void,
    path: *mut sys::FzPath,
    stroke: *mut sys::FzStrokeState,
    ctm: sys::FzMatrix,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let path = lend_path(path)?;
            let stroke = lend_stroke(stroke)?;
            let cs = required_colorspace(cs)?;
            dev.stroke_path(&path, &stroke, ctm.into(), &cs, color(color_ptr, n), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn clip_path<D: CustomDevice>(
    user: *mut c_void,
    path: *mut sys::FzPath,
    even_odd: c_int,
    ctm: sys::FzMatrix,
    scissor: sys::FzRect,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let path = lend_path(path)?;
            dev.clip_path(&path, even_odd != 0, ctm.into(), scissor.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn clip_stroke_path<D: CustomDevice>(
    user: *mut c_void,
    path: *mut sys::FzPath,
    stroke: *mut sys::FzStrokeState,
    ctm: sys::FzMatrix,
    scissor: sys::FzRect,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let path = lend_path(path)?;
            let stroke = lend_stroke(stroke)?;
            dev.clip_stroke_path(&path, &stroke, ctm.into(), scissor.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn fill_text<D: CustomDevice>(
    user: *mut c_void,
    text: *mut sys::FzText,
    ctm: sys::FzMatrix,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let text = lend_text(text)?;
            let cs = required_colorspace(cs)?;
            dev.fill_text(&text, ctm.into(), &cs, color(color_ptr, n), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn stroke_text<D: CustomDevice>(
    user: *mut c_void,
    text: *mut sys::FzText,
    stroke: *mut sys::FzStrokeState,
    ctm: sys::FzMatrix,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let text = lend_text(text)?;
            let stroke = lend_stroke(stroke)?;
            let cs = required_colorspace(cs)?;
            dev.stroke_text(&text, &stroke, ctm.into(), &cs, color(color_ptr, n), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn clip_text<D: CustomDevice>(
    user: *mut c_void,
    text: *mut sys::FzText,
    ctm: sys::FzMatrix,
    scissor: sys::FzRect,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let text = lend_text(text)?;
            dev.clip_text(&text, ctm.into(), scissor.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn clip_stroke_text<D: CustomDevice>(
    user: *mut c_void,
    text: *mut sys::FzText,
    stroke: *mut sys::FzStrokeState,
    ctm: sys::FzMatrix,
    scissor: sys::FzRect,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let text = lend_text(text)?;
            let stroke = lend_stroke(stroke)?;
            dev.clip_stroke_text(&text, &stroke, ctm.into(), scissor.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn ignore_text<D: CustomDevice>(user: *mut c_void, text: *mut sys::FzText, ctm: sys::FzMatrix) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let text = lend_text(text)?;
            dev.ignore_text(&text, ctm.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn fill_image<D: CustomDevice>(
    user: *mut c_void,
    image: *mut sys::FzImage,
    ctm: sys::FzMatrix,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let image = lend_image(image)?;
            dev.fill_image(&image, ctm.into(), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn fill_image_mask<D: CustomDevice>(
    user: *mut c_void,
    image: *mut sys::FzImage,
    ctm: sys::FzMatrix,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    alpha: c_float,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let image = lend_image(image)?;
            let cs = required_colorspace(cs)?;
            dev.fill_image_mask(&image, ctm.into(), &cs, color(color_ptr, n), alpha, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn clip_image_mask<D: CustomDevice>(
    user: *mut c_void,
    image: *mut sys::FzImage,
    ctm: sys::FzMatrix,
    scissor: sys::FzRect,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let image = lend_image(image)?;
            dev.clip_image_mask(&image, ctm.into(), scissor.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn pop_clip<D: CustomDevice>(user: *mut c_void) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            dev.pop_clip();
            Ok(())
        })
    }
}

unsafe extern "C" fn begin_mask<D: CustomDevice>(
    user: *mut c_void,
    area: sys::FzRect,
    luminosity: c_int,
    cs: *mut sys::FzColorspace,
    color_ptr: *const c_float,
    n: c_int,
    cp: sys::FzColorParams,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let cs = lend_colorspace(cs)?;
            let backdrop = cs.as_ref().map(|cs| (cs, color(color_ptr, n)));
            dev.begin_mask(area.into(), luminosity != 0, backdrop, cp.into());
            Ok(())
        })
    }
}

unsafe extern "C" fn end_mask<D: CustomDevice>(user: *mut c_void) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            dev.end_mask();
            Ok(())
        })
    }
}

unsafe extern "C" fn begin_group<D: CustomDevice>(
    user: *mut c_void,
    area: sys::FzRect,
    cs: *mut sys::FzColorspace,
    isolated: c_int,
    knockout: c_int,
    blend: c_int,
    alpha: c_float,
) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let cs = lend_colorspace(cs)?;
            dev.begin_group(
                area.into(),
                cs.as_ref(),
                isolated != 0,
                knockout != 0,
                BlendMode::from_raw(blend),
                alpha,
            );
            Ok(())
        })
    }
}

unsafe extern "C" fn end_group<D: CustomDevice>(user: *mut c_void) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            dev.end_group();
            Ok(())
        })
    }
}

unsafe extern "C" fn begin_layer<D: CustomDevice>(user: *mut c_void, name: *const c_char) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            let name = if name.is_null() {
                std::borrow::Cow::Borrowed("")
            } else {
                CStr::from_ptr(name).to_string_lossy()
            };
            dev.begin_layer(&name);
            Ok(())
        })
    }
}

unsafe extern "C" fn end_layer<D: CustomDevice>(user: *mut c_void) -> c_int {
    unsafe {
        dispatch::<D>(user, |dev| {
            dev.end_layer();
            Ok(())
        })
    }
}
