//! Owned native references.
//!
//! Each handle owns exactly one native reference: `Clone` issues the keep
//! call, `Drop` issues the drop call once, and both report to
//! [`crate::stats`].
//!
//! Only handles over immutable native objects get `keep`. Mutable objects
//! are move-only so that `&mut self` really is exclusive. Handles marked
//! `local` belong to a document, whose native state is not safe to touch
//! from two threads, and are not `Send`.

/// Declares a handle over an opaque native type.
///
/// With `keep = ...` the handle is `Clone`; without it, it is move-only.
/// A leading `@local` keeps the handle on the thread that made it.
macro_rules! native_handle {
    (@threads $name:ident) => {
        // Every reference to the native object is owned by a handle of this
        // type, and the refcount itself is updated under the lock table.
        unsafe impl Send for $name {}
    };
    (@threads $name:ident local) => {};
    (@base $(#[$meta:meta])* $vis:vis $name:ident, $raw:ty, $kind:ident, $($drop:ident)::+) => {
        $(#[$meta])*
        $vis struct $name {
            inner: ::std::ptr::NonNull<$raw>,
        }

        impl $name {
            /// Takes ownership of one native reference.
            ///
            /// # Safety
            ///
            /// `ptr` must be null or an owned reference nobody else will drop.
            pub(crate) unsafe fn from_raw(ptr: *mut $raw) -> $crate::error::Result<Self> {
                let inner = ::std::ptr::NonNull::new(ptr).ok_or_else(|| {
                    $crate::error::Error::generic(concat!("native call returned no ", stringify!($name)))
                })?;
                $crate::stats::record_created($crate::stats::HandleKind::$kind);
                Ok(Self { inner })
            }

            pub(crate) fn as_ptr(&self) -> *mut $raw {
                self.inner.as_ptr()
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                let ctx = $crate::context::infallible_context();
                unsafe { $($drop)::+(ctx, self.inner.as_ptr()) };
                $crate::stats::record_destroyed($crate::stats::HandleKind::$kind);
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("ptr", &self.inner)
                    .finish()
            }
        }
    };
    (
        $(#[$meta:meta])*
        $(@$local:ident)? $vis:vis struct $name:ident($raw:ty): $kind:ident,
            keep = $($keep:ident)::+,
            drop = $($drop:ident)::+;
    ) => {
        $crate::handle::native_handle!(@base $(#[$meta])* $vis $name, $raw, $kind, $($drop)::+);
        $crate::handle::native_handle!(@threads $name $($local)?);

        impl Clone for $name {
            fn clone(&self) -> Self {
                let ctx = $crate::context::infallible_context();
                unsafe { $($keep)::+(ctx, self.inner.as_ptr()) };
                $crate::stats::record_created($crate::stats::HandleKind::$kind);
                Self { inner: self.inner }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $(@$local:ident)? $vis:vis struct $name:ident($raw:ty): $kind:ident,
            drop = $($drop:ident)::+;
    ) => {
        $crate::handle::native_handle!(@base $(#[$meta])* $vis $name, $raw, $kind, $($drop)::+);
        $crate::handle::native_handle!(@threads $name $($local)?);
    };
}

pub(crate) use native_handle;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;

use crate::error::{Error, Result};

/// Copies a borrowed native string. Null reads as `None`.
///
/// # Safety
///
/// `ptr` must be null or point at a nul-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn borrowed_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

/// Copies then releases a string the shim allocated for the caller.
///
/// # Safety
///
/// `ptr` must be null or an adopted string that nobody else will release.
pub(crate) unsafe fn adopted_str(ptr: *mut c_char) -> Option<String> {
    let text = unsafe { borrowed_str(ptr) };
    if !ptr.is_null() {
        unsafe { mupdf_shim_sys::mupdf_drop_str(ptr) };
    }
    text
}

pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
    let text = path
        .to_str()
        .ok_or_else(|| Error::precondition(format!("path is not valid UTF-8: {}", path.display())))?;
    Ok(CString::new(text)?)
}
