use std::os::raw::{c_float, c_void};
use std::panic::{self, AssertUnwindSafe};

use mupdf_shim_sys as sys;
use tracing::error;

use crate::context::context;
use crate::error::{Error, Result, ffi_try};
use crate::geometry::{Matrix, Point, Rect};
use crate::handle::native_handle;
use crate::stroke_state::StrokeState;

native_handle! {
    /// Vector path built from move/line/curve segments.
    pub struct Path(sys::FzPath): Path,
        drop = sys::mupdf_drop_path;
}

/// Receives the segments of a path in order. See [`Path::walk`].
pub trait PathWalker {
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn curve_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, ex: f32, ey: f32);
    fn close(&mut self);
}

impl Path {
    pub fn new() -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_path(ctx))?;
            Self::from_raw(raw)
        }
    }

    /// Deep copy with its own segments.
    pub fn duplicate(&self) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_clone_path(ctx, self.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_moveto(ctx, self.as_ptr(), x, y)) }
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_lineto(ctx, self.as_ptr(), x, y)) }
    }

    pub fn curve_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, ex: f32, ey: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_curveto(ctx, self.as_ptr(), cx1, cy1, cx2, cy2, ex, ey)) }
    }

    /// Curve whose first control point is the current point.
    pub fn curve_to_v(&mut self, cx: f32, cy: f32, ex: f32, ey: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_curvetov(ctx, self.as_ptr(), cx, cy, ex, ey)) }
    }

    /// Curve whose second control point is the end point.
    pub fn curve_to_y(&mut self, cx: f32, cy: f32, ex: f32, ey: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_curvetoy(ctx, self.as_ptr(), cx, cy, ex, ey)) }
    }

    pub fn close(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_closepath(ctx, self.as_ptr())) }
    }

    pub fn rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_rectto(ctx, self.as_ptr(), x0, y0, x1, y1)) }
    }

    pub fn current_point(&self) -> Result<Point> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_currentpoint(ctx, self.as_ptr())) }.map(Point::from)
    }

    pub fn transform(&mut self, mat: &Matrix) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_transform_path(ctx, self.as_ptr(), (*mat).into())) }
    }

    /// Releases spare segment storage. The path stays usable.
    pub fn trim(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_trim_path(ctx, self.as_ptr())) }
    }

    /// Bounding box under `ctm`, widened by `stroke` when given.
    pub fn bounds(&self, stroke: Option<&StrokeState>, ctm: &Matrix) -> Result<Rect> {
        let ctx = context()?;
        let stroke = stroke.map_or(std::ptr::null_mut(), StrokeState::as_ptr);
        unsafe { ffi_try!(sys::mupdf_bound_path(ctx, self.as_ptr(), stroke, (*ctm).into())) }.map(Rect::from)
    }

    /// Feeds every segment to `walker`.
    ///
    /// A panic inside the walker is caught at the native boundary; the
    /// remaining segments are skipped and the call returns a precondition
    /// error.
    pub fn walk<W: PathWalker>(&self, walker: &mut W) -> Result<()> {
        let ctx = context()?;
        let mut state = WalkState {
            walker,
            panicked: false,
        };
        let callbacks = sys::MupdfPathWalker {
            moveto: Some(trampoline_move_to::<W>),
            lineto: Some(trampoline_line_to::<W>),
            curveto: Some(trampoline_curve_to::<W>),
            closepath: Some(trampoline_close::<W>),
        };
        let arg = (&mut state as *mut WalkState<'_, W>).cast::<c_void>();
        unsafe { ffi_try!(sys::mupdf_walk_path(ctx, self.as_ptr(), &callbacks, arg)) }?;
        if state.panicked {
            return Err(Error::precondition("path walker panicked"));
        }
        Ok(())
    }
}

struct WalkState<'a, W> {
    walker: &'a mut W,
    panicked: bool,
}

unsafe fn with_walker<W: PathWalker>(arg: *mut c_void, f: impl FnOnce(&mut W)) {
    let state = unsafe { &mut *arg.cast::<WalkState<'_, W>>() };
    if state.panicked {
        return;
    }
    let walker = &mut *state.walker;
    if panic::catch_unwind(AssertUnwindSafe(|| f(walker))).is_err() {
        error!("path walker panicked; skipping remaining segments");
        state.panicked = true;
    }
}

unsafe extern "C" fn trampoline_move_to<W: PathWalker>(arg: *mut c_void, x: c_float, y: c_float) {
    unsafe { with_walker::<W>(arg, |w| w.move_to(x, y)) }
}

unsafe extern "C" fn trampoline_line_to<W: PathWalker>(arg: *mut c_void, x: c_float, y: c_float) {
    unsafe { with_walker::<W>(arg, |w| w.line_to(x, y)) }
}

unsafe extern "C" fn trampoline_curve_to<W: PathWalker>(
    arg: *mut c_void,
    x1: c_float,
    y1: c_float,
    x2: c_float,
    y2: c_float,
    x3: c_float,
    y3: c_float,
) {
    unsafe { with_walker::<W>(arg, |w| w.curve_to(x1, y1, x2, y2, x3, y3)) }
}

unsafe extern "C" fn trampoline_close<W: PathWalker>(arg: *mut c_void) {
    unsafe { with_walker::<W>(arg, PathWalker::close) }
}
