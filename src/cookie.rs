use std::os::raw::c_int;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use mupdf_shim_sys as sys;

use crate::context::context;
use crate::error::{Error, Result, ffi_try};
use crate::handle::native_handle;

native_handle! {
    /// Progress report and cancellation flag for long-running calls.
    ///
    /// Pass it to a render or conversion and call [`Cookie::abort`] from any
    /// other thread; the running call stops and fails with
    /// [`Error::Aborted`](crate::Error::Aborted).
    pub struct Cookie(sys::FzCookie): Cookie,
        drop = sys::mupdf_drop_cookie;
}

// Every host-side access to the counters goes through an atomic view.
unsafe impl Sync for Cookie {}

impl Cookie {
    pub fn new() -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_cookie(ctx))?;
            Self::from_raw(raw)
        }
    }

    fn field(&self, which: c_int) -> &AtomicI32 {
        // SAFETY: the shim returns the address of an aligned int inside the
        // cookie for every known field, valid for as long as `self`.
        unsafe { AtomicI32::from_ptr(sys::mupdf_cookie_field(self.as_ptr(), which)) }
    }

    pub fn abort(&self) {
        self.field(sys::MUPDF_COOKIE_ABORT).store(1, Ordering::SeqCst);
    }

    pub fn aborted(&self) -> bool {
        self.field(sys::MUPDF_COOKIE_ABORT).load(Ordering::SeqCst) != 0
    }

    pub fn progress(&self) -> i32 {
        self.field(sys::MUPDF_COOKIE_PROGRESS).load(Ordering::Relaxed)
    }

    pub fn progress_max(&self) -> usize {
        unsafe { AtomicUsize::from_ptr(sys::mupdf_cookie_progress_max_field(self.as_ptr())) }.load(Ordering::Relaxed)
    }

    /// Number of errors the library recovered from while running.
    pub fn errors(&self) -> i32 {
        self.field(sys::MUPDF_COOKIE_ERRORS).load(Ordering::Relaxed)
    }

    pub fn incomplete(&self) -> bool {
        self.field(sys::MUPDF_COOKIE_INCOMPLETE).load(Ordering::Relaxed) != 0
    }

    /// Clears every counter and the abort flag.
    pub fn reset(&mut self) {
        unsafe { sys::mupdf_cookie_reset(self.as_ptr()) }
    }
}

pub(crate) fn cookie_ptr(cookie: Option<&Cookie>) -> *mut sys::FzCookie {
    cookie.map_or(std::ptr::null_mut(), Cookie::as_ptr)
}

/// The library stops quietly when its cookie is aborted; report that as a
/// failure so partial output is never mistaken for a finished run.
pub(crate) fn check_aborted(cookie: Option<&Cookie>) -> Result<()> {
    match cookie {
        Some(cookie) if cookie.aborted() => Err(Error::Aborted("stopped through its cookie".to_owned())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_cookie_is_clear() {
        let cookie = Cookie::new().unwrap();
        assert!(!cookie.aborted());
        assert_eq!(cookie.progress(), 0);
        assert_eq!(cookie.progress_max(), 0);
        assert_eq!(cookie.errors(), 0);
        assert!(!cookie.incomplete());
        assert!(check_aborted(Some(&cookie)).is_ok());
        assert!(check_aborted(None).is_ok());
    }

    #[test]
    fn test_abort_from_another_thread() {
        let cookie = Arc::new(Cookie::new().unwrap());
        let remote = Arc::clone(&cookie);
        thread::spawn(move || remote.abort()).join().unwrap();
        assert!(cookie.aborted());
        assert!(matches!(check_aborted(Some(&cookie)), Err(Error::Aborted(_))));
    }

    #[test]
    fn test_reset_clears_abort() {
        let mut cookie = Cookie::new().unwrap();
        cookie.abort();
        cookie.reset();
        assert!(!cookie.aborted());
    }
}
