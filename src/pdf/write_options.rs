use std::ffi::CString;
use std::os::raw::c_int;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use mupdf_shim_sys as sys;

use crate::error::Result;

/// Encryption applied when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Encryption {
    /// Keep whatever the document was opened with.
    #[default]
    Keep,
    None,
    Rc4_40,
    Rc4_128,
    Aes128,
    Aes256,
}

impl Encryption {
    fn to_raw(self) -> c_int {
        match self {
            Encryption::Keep => sys::MUPDF_ENCRYPT_KEEP,
            Encryption::None => sys::MUPDF_ENCRYPT_NONE,
            Encryption::Rc4_40 => sys::MUPDF_ENCRYPT_RC4_40,
            Encryption::Rc4_128 => sys::MUPDF_ENCRYPT_RC4_128,
            Encryption::Aes128 => sys::MUPDF_ENCRYPT_AES_128,
            Encryption::Aes256 => sys::MUPDF_ENCRYPT_AES_256,
        }
    }
}

/// Options for [`PdfDocument::save`](super::PdfDocument::save) and
/// [`PdfDocument::write_to_buffer`](super::PdfDocument::write_to_buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriteOptions {
    /// Append changes instead of rewriting the file.
    pub incremental: bool,
    pub pretty: bool,
    pub ascii: bool,
    pub compress: bool,
    pub compress_images: bool,
    pub compress_fonts: bool,
    pub decompress: bool,
    /// 0 keeps every object; 1 drops unused ones, 2 also renumbers, 3 also
    /// merges duplicates, 4 also merges duplicate streams.
    pub garbage: u8,
    pub linear: bool,
    pub clean: bool,
    pub sanitize: bool,
    /// Regenerate missing annotation appearance streams.
    pub appearance: bool,
    pub encryption: Encryption,
    /// Permission bits; `-1` grants everything.
    pub permissions: i32,
    pub owner_password: Option<String>,
    pub user_password: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            incremental: false,
            pretty: false,
            ascii: false,
            compress: false,
            compress_images: false,
            compress_fonts: false,
            decompress: false,
            garbage: 0,
            linear: false,
            clean: false,
            sanitize: false,
            appearance: true,
            encryption: Encryption::Keep,
            permissions: -1,
            owner_password: None,
            user_password: None,
        }
    }
}

impl WriteOptions {
    /// Compact output: compressed streams, full garbage collection.
    pub fn compact() -> Self {
        Self {
            compress: true,
            compress_images: true,
            compress_fonts: true,
            garbage: 3,
            ..Self::default()
        }
    }

    /// Encrypts with AES-256 under the given passwords.
    pub fn encrypted(owner_password: &str, user_password: &str) -> Self {
        Self {
            encryption: Encryption::Aes256,
            owner_password: Some(owner_password.to_owned()),
            user_password: Some(user_password.to_owned()),
            ..Self::default()
        }
    }

    /// Runs `f` with the native view of these options. Password strings
    /// live only for the duration of the call.
    pub(crate) fn with_raw<T>(&self, f: impl FnOnce(&sys::MupdfWriteOptions) -> Result<T>) -> Result<T> {
        let owner = self.owner_password.as_deref().map(CString::new).transpose()?;
        let user = self.user_password.as_deref().map(CString::new).transpose()?;
        let raw = sys::MupdfWriteOptions {
            incremental: c_int::from(self.incremental),
            pretty: c_int::from(self.pretty),
            ascii: c_int::from(self.ascii),
            compress: c_int::from(self.compress),
            compress_images: c_int::from(self.compress_images),
            compress_fonts: c_int::from(self.compress_fonts),
            decompress: c_int::from(self.decompress),
            garbage: c_int::from(self.garbage),
            linear: c_int::from(self.linear),
            clean: c_int::from(self.clean),
            sanitize: c_int::from(self.sanitize),
            appearance: c_int::from(self.appearance),
            encryption: self.encryption.to_raw(),
            permissions: self.permissions,
            owner_password: owner.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
            user_password: user.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
        };
        f(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::ffi::CStr;

    #[test]
    fn test_raw_view_carries_passwords() {
        let opts = WriteOptions::encrypted("owner", "user");
        opts.with_raw(|raw| {
            assert_eq!(raw.encryption, sys::MUPDF_ENCRYPT_AES_256);
            assert_eq!(unsafe { CStr::from_ptr(raw.owner_password) }.to_str().unwrap(), "owner");
            assert_eq!(unsafe { CStr::from_ptr(raw.user_password) }.to_str().unwrap(), "user");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_defaults_leave_passwords_null() {
        WriteOptions::default()
            .with_raw(|raw| {
                assert!(raw.owner_password.is_null() && raw.user_password.is_null());
                assert_eq!(raw.appearance, 1);
                assert_eq!(raw.permissions, -1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_interior_nul_is_precondition() {
        let opts = WriteOptions::encrypted("own\0er", "user");
        let err = opts.with_raw(|_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: WriteOptions = serde_json::from_str(r#"{"garbage": 4, "encryption": "aes256"}"#).unwrap();
        assert_eq!(opts.garbage, 4);
        assert_eq!(opts.encryption, Encryption::Aes256);
        assert!(opts.appearance);
    }
}
