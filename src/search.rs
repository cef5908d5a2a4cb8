//! Text search results shared by pages, display lists and text pages.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};

use mupdf_shim_sys as sys;

use crate::context::infallible_context;
use crate::error::{Error, Result, ffi_try};
use crate::geometry::Quad;

/// Hit capacity used by the `search` convenience methods.
pub const DEFAULT_HIT_MAX: usize = 512;

/// Outcome of a two-phase search.
///
/// The native search fills a zeroed array of `capacity()` quads and reports
/// how many it wrote; only the first `count()` entries are hits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHits {
    quads: Vec<Quad>,
    count: usize,
}

impl SearchHits {
    pub fn hits(&self) -> &[Quad] {
        &self.quads[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when the search may have stopped early for lack of room.
    pub fn is_saturated(&self) -> bool {
        self.count == self.quads.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quad> {
        self.hits().iter()
    }
}

impl IntoIterator for SearchHits {
    type Item = Quad;
    type IntoIter = std::iter::Take<std::vec::IntoIter<Quad>>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter().take(self.count)
    }
}

impl<'a> IntoIterator for &'a SearchHits {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Runs one of the native search entry points and copies its quads out.
pub(crate) fn run_search<F>(needle: &str, hit_max: usize, search: F) -> Result<SearchHits>
where
    F: FnOnce(*const c_char, c_int, *mut c_int, sys::ErrorSlot) -> *mut sys::FzQuad,
{
    let c_needle = CString::new(needle)?;
    let max = c_int::try_from(hit_max).map_err(|_| Error::precondition("hit_max too large"))?;
    let mut count: c_int = 0;
    let raw = unsafe { ffi_try!(search(c_needle.as_ptr(), max, &mut count)) }?;
    if raw.is_null() {
        return Err(Error::generic("search returned no hit array"));
    }
    let len = usize::try_from(max).unwrap_or(0);
    let quads = unsafe { std::slice::from_raw_parts(raw, len) }
        .iter()
        .copied()
        .map(Quad::from)
        .collect::<Vec<_>>();
    unsafe { sys::mupdf_drop_quads(infallible_context(), raw) };
    let count = usize::try_from(count).unwrap_or(0).min(len);
    Ok(SearchHits { quads, count })
}
