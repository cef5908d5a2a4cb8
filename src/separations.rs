use std::os::raw::c_int;

use mupdf_shim_sys as sys;

use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::handle::{borrowed_str, native_handle};

native_handle! {
    /// Spot colour plates used by a page.
    pub struct Separations(sys::FzSeparations): Separations,
        drop = sys::mupdf_drop_separations;
}

/// How a spot colour is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationState {
    /// Converted into the process colours.
    Composite,
    /// Rendered to its own plate.
    Spot,
    Disabled,
}

impl SeparationState {
    fn from_raw(v: c_int) -> Option<Self> {
        match v {
            0 => Some(Self::Composite),
            1 => Some(Self::Spot),
            2 => Some(Self::Disabled),
            _ => None,
        }
    }

    fn to_raw(self) -> c_int {
        match self {
            Self::Composite => 0,
            Self::Spot => 1,
            Self::Disabled => 2,
        }
    }
}

impl Separations {
    pub fn len(&self) -> usize {
        let n = unsafe { sys::mupdf_count_separations(infallible_context(), self.as_ptr()) };
        usize::try_from(n).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of separation `index`; `None` when out of range.
    pub fn name(&self, index: usize) -> Option<String> {
        let i = c_int::try_from(index).ok()?;
        unsafe { borrowed_str(sys::mupdf_separation_name(infallible_context(), self.as_ptr(), i)) }
    }

    pub fn state(&self, index: usize) -> Option<SeparationState> {
        let i = c_int::try_from(index).ok()?;
        SeparationState::from_raw(unsafe { sys::mupdf_separation_state(infallible_context(), self.as_ptr(), i) })
    }

    pub fn set_state(&mut self, index: usize, state: SeparationState) -> Result<()> {
        let ctx = context()?;
        let i = c_int::try_from(index).map_err(|_| Error::precondition("separation index out of range"))?;
        unsafe { ffi_try!(sys::mupdf_set_separation_state(ctx, self.as_ptr(), i, state.to_raw())) }
    }
}
