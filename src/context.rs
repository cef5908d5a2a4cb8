//! Process-wide native context and its per-thread clones.
//!
//! A single base context owns the store, the lock table and the document
//! handler registry. Every thread that calls into the library works through
//! its own clone, created on first use and dropped when the thread exits.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::ptr::NonNull;
use std::sync::OnceLock;

use mupdf_shim_sys as sys;
use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ffi_try};
use crate::lock::{self, LOCK_MAX, LockTable};

pub const DEFAULT_STORE_SIZE: usize = 256 << 20;

/// Settings applied to the base context when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContextOptions {
    /// Resource store limit in bytes. `0` means unlimited.
    pub store_size: usize,
    /// Anti-aliasing bits, 0 to 8.
    pub anti_alias: u8,
    /// Colour management.
    pub icc: bool,
    /// Stylesheet applied to reflowable formats (EPUB, HTML, ...).
    pub user_css: Option<String>,
    /// Route native warnings and error traces into `tracing`.
    pub forward_diagnostics: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            store_size: DEFAULT_STORE_SIZE,
            anti_alias: 8,
            icc: true,
            user_css: None,
            forward_diagnostics: false,
        }
    }
}

pub(crate) struct BaseContext {
    ptr: NonNull<sys::FzContext>,
    options: ContextOptions,
    // Dropped after the native context, which may still take locks on teardown.
    _locks: Box<LockTable>,
}

// The base is only ever cloned from, which the native library synchronises
// through the lock table.
unsafe impl Send for BaseContext {}
unsafe impl Sync for BaseContext {}

impl BaseContext {
    pub(crate) fn new(options: ContextOptions) -> Result<Self> {
        if options.anti_alias > 8 {
            return Err(Error::precondition("anti-alias level must be between 0 and 8"));
        }
        let css = options.user_css.as_deref().map(CString::new).transpose()?;

        let locks = LockTable::new();
        let raw = unsafe {
            sys::mupdf_new_base_context(
                locks.user_ptr(),
                Some(lock::lock),
                Some(lock::unlock),
                options.store_size,
            )
        };
        let ptr = NonNull::new(raw).ok_or_else(|| Error::memory("cannot create base context"))?;
        let base = Self {
            ptr,
            options,
            _locks: locks,
        };

        unsafe {
            sys::mupdf_set_aa_level(ptr.as_ptr(), i32::from(base.options.anti_alias));
            sys::mupdf_set_icc(ptr.as_ptr(), i32::from(base.options.icc));
            if let Some(css) = &css {
                ffi_try!(sys::mupdf_set_user_css(ptr.as_ptr(), css.as_ptr()))?;
            }
        }
        if base.options.forward_diagnostics {
            install_forwarding(ptr.as_ptr());
        }
        #[cfg(all(feature = "system-fonts", not(target_os = "android")))]
        crate::system_font::install(ptr.as_ptr());

        tracing::debug!(
            store_size = base.options.store_size,
            locks = LOCK_MAX,
            "created base context"
        );
        Ok(base)
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::FzContext {
        self.ptr.as_ptr()
    }

    fn clone_for_thread(&self) -> Result<LocalContext> {
        let raw = unsafe { ffi_try!(sys::mupdf_clone_context(self.as_ptr())) }?;
        let ptr = NonNull::new(raw).ok_or_else(|| Error::memory("cannot clone context"))?;
        if self.options.forward_diagnostics {
            install_forwarding(ptr.as_ptr());
        }
        Ok(LocalContext { ptr })
    }
}

impl Drop for BaseContext {
    fn drop(&mut self) {
        unsafe { sys::mupdf_drop_base_context(self.ptr.as_ptr()) };
        tracing::debug!("dropped base context");
    }
}

struct LocalContext {
    ptr: NonNull<sys::FzContext>,
}

impl Drop for LocalContext {
    fn drop(&mut self) {
        unsafe { sys::mupdf_drop_context(self.ptr.as_ptr()) };
    }
}

static BASE: OnceLock<BaseContext> = OnceLock::new();
/// Held while a base context is being created, so only one is ever built.
static CREATING: Mutex<()> = parking_lot::const_mutex(());

thread_local! {
    static LOCAL: RefCell<Option<LocalContext>> = const { RefCell::new(None) };
}

fn base() -> Result<&'static BaseContext> {
    match BASE.get() {
        Some(base) => Ok(base),
        None => create_base(ContextOptions::default(), false),
    }
}

/// Builds the one base context. With `explicit`, an existing base is an
/// error instead of the result.
fn create_base(options: ContextOptions, explicit: bool) -> Result<&'static BaseContext> {
    let _creating = CREATING.lock();
    if let Some(base) = BASE.get() {
        if explicit {
            return Err(Error::precondition("context already initialized"));
        }
        return Ok(base);
    }
    let created = BaseContext::new(options)?;
    Ok(BASE.get_or_init(|| created))
}

/// Native context for the calling thread.
///
/// The pointer stays valid until the thread exits.
pub(crate) fn context() -> Result<*mut sys::FzContext> {
    LOCAL
        .try_with(|local| {
            let mut local = local
                .try_borrow_mut()
                .map_err(|_| Error::generic("thread context is busy"))?;
            if let Some(ctx) = local.as_ref() {
                return Ok(ctx.ptr.as_ptr());
            }
            let ctx = base()?.clone_for_thread()?;
            let ptr = ctx.ptr.as_ptr();
            *local = Some(ctx);
            Ok(ptr)
        })
        .map_err(|_| Error::generic("thread is shutting down"))?
}

/// Context for keep, drop and accessor calls, which never throw.
///
/// Falls back to the base context while thread-local storage is being torn
/// down. Null only if no base context was ever created, in which case no
/// handle can exist either.
pub(crate) fn infallible_context() -> *mut sys::FzContext {
    context()
        .ok()
        .or_else(|| BASE.get().map(BaseContext::as_ptr))
        .unwrap_or(std::ptr::null_mut())
}

/// Handle on the process-wide library state.
pub struct Context;

impl Context {
    /// Creates the base context with explicit settings.
    ///
    /// Fails with `Precondition` if the base context already exists, whether
    /// from an earlier `init` or from lazy creation by another call.
    pub fn init(options: ContextOptions) -> Result<()> {
        create_base(options, true).map(|_| ())
    }

    pub fn is_initialized() -> bool {
        BASE.get().is_some()
    }

    /// Settings the base context was created with.
    pub fn options() -> Result<ContextOptions> {
        Ok(base()?.options.clone())
    }

    /// Anti-aliasing level in effect on the calling thread.
    pub fn anti_alias() -> Result<u8> {
        let ctx = context()?;
        let bits = unsafe { sys::mupdf_aa_level(ctx) };
        Ok(u8::try_from(bits).unwrap_or(0))
    }

    /// Evicts everything the shared resource store can release.
    pub fn empty_store() -> Result<()> {
        let ctx = context()?;
        unsafe { sys::mupdf_empty_store(ctx) };
        Ok(())
    }
}

fn install_forwarding(ctx: *mut sys::FzContext) {
    unsafe {
        sys::mupdf_set_diagnostic_callbacks(
            ctx,
            std::ptr::null_mut(),
            Some(forward_warning),
            Some(forward_error),
        );
    }
}

fn diagnostic_text(message: *const c_char) -> String {
    if message.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned()
}

unsafe extern "C" fn forward_warning(_user: *mut c_void, message: *const c_char) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let text = diagnostic_text(message);
        tracing::debug!(target: "mupdf", "{text}");
    }));
    if outcome.is_err() {
        tracing::error!("diagnostic forwarder panicked");
    }
}

unsafe extern "C" fn forward_error(_user: *mut c_void, message: *const c_char) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let text = diagnostic_text(message);
        tracing::trace!(target: "mupdf", "{text}");
    }));
    if outcome.is_err() {
        tracing::error!("diagnostic forwarder panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ContextOptions::default();
        assert_eq!(opts.store_size, 256 * 1024 * 1024);
        assert_eq!(opts.anti_alias, 8);
        assert!(opts.icc);
        assert!(opts.user_css.is_none());
        assert!(!opts.forward_diagnostics);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: ContextOptions =
            serde_json::from_str(r#"{"anti_alias": 4, "forward_diagnostics": true}"#).unwrap();
        assert_eq!(opts.anti_alias, 4);
        assert!(opts.forward_diagnostics);
        assert_eq!(opts.store_size, DEFAULT_STORE_SIZE);
    }

    #[test]
    fn test_private_base_context_lifecycle() {
        let base = BaseContext::new(ContextOptions {
            anti_alias: 2,
            forward_diagnostics: true,
            ..ContextOptions::default()
        })
        .unwrap();
        assert_eq!(unsafe { sys::mupdf_aa_level(base.as_ptr()) }, 2);
        let local = base.clone_for_thread().unwrap();
        assert_eq!(unsafe { sys::mupdf_aa_level(local.ptr.as_ptr()) }, 2);
        drop(local);
        drop(base);
    }

    #[test]
    fn test_rejects_out_of_range_anti_alias() {
        let err = BaseContext::new(ContextOptions {
            anti_alias: 9,
            ..ContextOptions::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_rejects_css_with_nul() {
        let err = BaseContext::new(ContextOptions {
            user_css: Some("p { }\0".into()),
            ..ContextOptions::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_init_after_lazy_creation_fails() {
        context().unwrap();
        let err = Context::init(ContextOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.message().contains("context already initialized"));
        assert!(Context::is_initialized());
    }

    #[test]
    fn test_each_thread_gets_its_own_clone() {
        let here = context().unwrap() as usize;
        assert_eq!(context().unwrap() as usize, here);
        let there = std::thread::spawn(|| context().unwrap() as usize)
            .join()
            .unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn test_concurrent_first_use_shares_one_base() {
        let threads = 8;
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(threads));
        let bases: Vec<usize> = (0..threads)
            .map(|_| {
                let barrier = std::sync::Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    context().unwrap();
                    base().unwrap().as_ptr() as usize
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|t| t.join().unwrap())
            .collect();
        assert!(bases.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(bases[0], BASE.get().unwrap().as_ptr() as usize);
    }

    #[test]
    fn test_infallible_context_is_available() {
        context().unwrap();
        assert!(!infallible_context().is_null());
    }

    #[test]
    fn test_empty_store_and_anti_alias() {
        Context::empty_store().unwrap();
        assert!(Context::anti_alias().unwrap() <= 8);
    }
}
