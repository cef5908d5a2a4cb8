//! Error handling for the MuPDF bindings

use std::ffi::{CStr, NulError};
use std::io;
use std::os::raw::c_int;
use std::str::Utf8Error;

use mupdf_shim_sys as sys;
use thiserror::Error;

/// Failure reported by a shim call or by argument marshalling on the host side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Out of range: {0}")]
    Range(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Format error: {0}")]
    Format(String),
    #[error("Encryption error: {0}")]
    Crypto(String),
    #[error("Password required: {0}")]
    PasswordRequired(String),
    #[error("Password rejected: {0}")]
    PasswordFailed(String),
    #[error("System error: {0}")]
    System(String),
    #[error("Out of memory: {0}")]
    Memory(String),
    #[error("Operation aborted: {0}")]
    Aborted(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

/// Payload tag of an [`Error`], for matching without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Generic,
    Syntax,
    Range,
    NotFound,
    Format,
    Crypto,
    PasswordRequired,
    PasswordFailed,
    System,
    Memory,
    Aborted,
    Precondition,
}

impl ErrorKind {
    /// Maps a shim kind tag; unknown tags fold into `Generic`.
    pub fn from_raw(kind: c_int) -> Self {
        match kind {
            sys::MUPDF_ERROR_SYNTAX => Self::Syntax,
            sys::MUPDF_ERROR_RANGE => Self::Range,
            sys::MUPDF_ERROR_NOT_FOUND => Self::NotFound,
            sys::MUPDF_ERROR_FORMAT => Self::Format,
            sys::MUPDF_ERROR_CRYPTO => Self::Crypto,
            sys::MUPDF_ERROR_PASSWORD_REQUIRED => Self::PasswordRequired,
            sys::MUPDF_ERROR_PASSWORD_FAILED => Self::PasswordFailed,
            sys::MUPDF_ERROR_SYSTEM => Self::System,
            sys::MUPDF_ERROR_MEMORY => Self::Memory,
            sys::MUPDF_ERROR_ABORTED => Self::Aborted,
            sys::MUPDF_ERROR_PRECONDITION => Self::Precondition,
            _ => Self::Generic,
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            Self::Generic => sys::MUPDF_ERROR_GENERIC,
            Self::Syntax => sys::MUPDF_ERROR_SYNTAX,
            Self::Range => sys::MUPDF_ERROR_RANGE,
            Self::NotFound => sys::MUPDF_ERROR_NOT_FOUND,
            Self::Format => sys::MUPDF_ERROR_FORMAT,
            Self::Crypto => sys::MUPDF_ERROR_CRYPTO,
            Self::PasswordRequired => sys::MUPDF_ERROR_PASSWORD_REQUIRED,
            Self::PasswordFailed => sys::MUPDF_ERROR_PASSWORD_FAILED,
            Self::System => sys::MUPDF_ERROR_SYSTEM,
            Self::Memory => sys::MUPDF_ERROR_MEMORY,
            Self::Aborted => sys::MUPDF_ERROR_ABORTED,
            Self::Precondition => sys::MUPDF_ERROR_PRECONDITION,
        }
    }
}

impl Error {
    pub fn new<S: Into<String>>(kind: ErrorKind, msg: S) -> Self {
        let msg = msg.into();
        match kind {
            ErrorKind::Generic => Error::Generic(msg),
            ErrorKind::Syntax => Error::Syntax(msg),
            ErrorKind::Range => Error::Range(msg),
            ErrorKind::NotFound => Error::NotFound(msg),
            ErrorKind::Format => Error::Format(msg),
            ErrorKind::Crypto => Error::Crypto(msg),
            ErrorKind::PasswordRequired => Error::PasswordRequired(msg),
            ErrorKind::PasswordFailed => Error::PasswordFailed(msg),
            ErrorKind::System => Error::System(msg),
            ErrorKind::Memory => Error::Memory(msg),
            ErrorKind::Aborted => Error::Aborted(msg),
            ErrorKind::Precondition => Error::Precondition(msg),
        }
    }

    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
    pub fn range<S: Into<String>>(msg: S) -> Self {
        Error::Range(msg.into())
    }
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }
    pub fn system<S: Into<String>>(msg: S) -> Self {
        Error::System(msg.into())
    }
    pub fn memory<S: Into<String>>(msg: S) -> Self {
        Error::Memory(msg.into())
    }
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        Error::Precondition(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Generic(_) => ErrorKind::Generic,
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Range(_) => ErrorKind::Range,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Format(_) => ErrorKind::Format,
            Error::Crypto(_) => ErrorKind::Crypto,
            Error::PasswordRequired(_) => ErrorKind::PasswordRequired,
            Error::PasswordFailed(_) => ErrorKind::PasswordFailed,
            Error::System(_) => ErrorKind::System,
            Error::Memory(_) => ErrorKind::Memory,
            Error::Aborted(_) => ErrorKind::Aborted,
            Error::Precondition(_) => ErrorKind::Precondition,
        }
    }

    /// The message as reported, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Generic(m)
            | Error::Syntax(m)
            | Error::Range(m)
            | Error::NotFound(m)
            | Error::Format(m)
            | Error::Crypto(m)
            | Error::PasswordRequired(m)
            | Error::PasswordFailed(m)
            | Error::System(m)
            | Error::Memory(m)
            | Error::Aborted(m)
            | Error::Precondition(m) => m,
        }
    }

    /// Takes ownership of a shim payload, releasing it exactly once.
    ///
    /// # Safety
    ///
    /// `payload` must be null or a live payload produced by the shim that no
    /// one else will release.
    pub(crate) unsafe fn from_payload(payload: *mut sys::MupdfError) -> Option<Self> {
        if payload.is_null() {
            return None;
        }
        let (kind, message) = unsafe {
            let raw = &*payload;
            let message = if raw.message.is_null() {
                String::new()
            } else {
                CStr::from_ptr(raw.message).to_string_lossy().into_owned()
            };
            (ErrorKind::from_raw(raw.kind), message)
        };
        unsafe { sys::mupdf_drop_error(payload) };
        tracing::trace!(?kind, %message, "native call failed");
        Some(Error::new(kind, message))
    }
}

impl From<NulError> for Error {
    fn from(err: NulError) -> Self {
        Error::Precondition(format!("string contains an interior nul byte: {err}"))
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::Precondition(format!("string is not valid UTF-8: {err}"))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::System(err.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::other(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Runs a shim entry point with a trailing error slot appended.
///
/// Yields `Ok(result)` when the slot stays null, otherwise the converted
/// payload. Must be used inside an `unsafe` block.
macro_rules! ffi_try {
    ($($func:ident)::+ ( $($arg:expr),* $(,)? )) => {{
        let mut err: *mut ::mupdf_shim_sys::MupdfError = ::std::ptr::null_mut();
        let result = $($func)::+($($arg,)* &mut err);
        match $crate::error::Error::from_payload(err) {
            None => Ok(result),
            Some(e) => Err(e),
        }
    }};
}

pub(crate) use ffi_try;
