use std::os::raw::c_int;

use mupdf_shim_sys as sys;
use smallvec::SmallVec;

use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::handle::native_handle;

native_handle! {
    /// Immutable stroke parameters shared by reference.
    pub struct StrokeState(sys::FzStrokeState): StrokeState,
        keep = sys::mupdf_keep_stroke_state,
        drop = sys::mupdf_drop_stroke_state;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
    MiterXps,
}

impl LineCap {
    fn from_raw(v: c_int) -> Self {
        match v {
            1 => Self::Round,
            2 => Self::Square,
            3 => Self::Triangle,
            _ => Self::Butt,
        }
    }

    fn to_raw(self) -> c_int {
        self as c_int
    }
}

impl LineJoin {
    fn from_raw(v: c_int) -> Self {
        match v {
            1 => Self::Round,
            2 => Self::Bevel,
            3 => Self::MiterXps,
            _ => Self::Miter,
        }
    }

    fn to_raw(self) -> c_int {
        self as c_int
    }
}

/// Full description of a stroke, as passed to [`StrokeState::with_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeParams {
    pub start_cap: LineCap,
    pub dash_cap: LineCap,
    pub end_cap: LineCap,
    pub line_join: LineJoin,
    pub line_width: f32,
    pub miter_limit: f32,
    pub dash_phase: f32,
    pub dashes: SmallVec<[f32; 4]>,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            start_cap: LineCap::Butt,
            dash_cap: LineCap::Butt,
            end_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            line_width: 1.0,
            miter_limit: 10.0,
            dash_phase: 0.0,
            dashes: SmallVec::new(),
        }
    }
}

impl StrokeState {
    /// Solid one-unit stroke with butt caps and miter joins.
    pub fn new() -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_default_stroke_state(ctx))?;
            Self::from_raw(raw)
        }
    }

    pub fn with_params(params: &StrokeParams) -> Result<Self> {
        let ctx = context()?;
        let dash_len = c_int::try_from(params.dashes.len())
            .map_err(|_| Error::precondition("dash list too long"))?;
        let info = sys::MupdfStrokeInfo {
            start_cap: params.start_cap.to_raw(),
            dash_cap: params.dash_cap.to_raw(),
            end_cap: params.end_cap.to_raw(),
            line_join: params.line_join.to_raw(),
            line_width: params.line_width,
            miter_limit: params.miter_limit,
            dash_phase: params.dash_phase,
            dash_len,
        };
        let dash = if params.dashes.is_empty() {
            std::ptr::null()
        } else {
            params.dashes.as_ptr()
        };
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_stroke_state(ctx, &info, dash))?;
            Self::from_raw(raw)
        }
    }

    /// Reads every parameter back, dash list included.
    pub fn params(&self) -> StrokeParams {
        let ctx = infallible_context();
        let mut info = sys::MupdfStrokeInfo::default();
        unsafe { sys::mupdf_stroke_state_info(ctx, self.as_ptr(), &mut info) };
        StrokeParams {
            start_cap: LineCap::from_raw(info.start_cap),
            dash_cap: LineCap::from_raw(info.dash_cap),
            end_cap: LineCap::from_raw(info.end_cap),
            line_join: LineJoin::from_raw(info.line_join),
            line_width: info.line_width,
            miter_limit: info.miter_limit,
            dash_phase: info.dash_phase,
            dashes: self.dashes(),
        }
    }

    pub fn line_width(&self) -> f32 {
        self.params().line_width
    }

    pub fn dashes(&self) -> SmallVec<[f32; 4]> {
        let ctx = infallible_context();
        let len = unsafe { sys::mupdf_stroke_state_dashes(ctx, self.as_ptr(), std::ptr::null_mut(), 0) };
        let mut dashes: SmallVec<[f32; 4]> = SmallVec::from_elem(0.0, usize::try_from(len).unwrap_or(0));
        if !dashes.is_empty() {
            unsafe { sys::mupdf_stroke_state_dashes(ctx, self.as_ptr(), dashes.as_mut_ptr(), len) };
        }
        dashes
    }
}
