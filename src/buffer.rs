use std::ffi::CString;
use std::io;
use std::ptr::NonNull;
use std::str::FromStr;

use bytes::Bytes;
use mupdf_shim_sys as sys;

use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::stats::{self, HandleKind};

/// Growable byte buffer owned by the library.
///
/// `io::Read` consumes from an internal cursor; `io::Write` appends.
///
/// Documents, fonts and images built from a buffer read its storage for as
/// long as they live. While any of them does, the buffer is
/// [shared](Buffer::is_shared) and refuses writes.
pub struct Buffer {
    inner: NonNull<sys::FzBuffer>,
    offset: usize,
}

unsafe impl Send for Buffer {}

impl Buffer {
    /// # Safety
    ///
    /// `ptr` must be null or an owned reference nobody else will drop.
    pub(crate) unsafe fn from_raw(ptr: *mut sys::FzBuffer) -> Result<Self> {
        let inner = NonNull::new(ptr).ok_or_else(|| Error::generic("native call returned no Buffer"))?;
        stats::record_created(HandleKind::Buffer);
        Ok(Self { inner, offset: 0 })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::FzBuffer {
        self.inner.as_ptr()
    }

    pub fn new() -> Result<Self> {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_buffer(ctx, capacity))?;
            Self::from_raw(raw)
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_buffer_from_bytes(ctx, data.as_ptr(), data.len()))?;
            Self::from_raw(raw)
        }
    }

    /// Decodes base64 text into a new buffer.
    pub fn from_base64(text: &str) -> Result<Self> {
        let ctx = context()?;
        let c_text = CString::new(text)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_buffer_from_base64(ctx, c_text.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn len(&self) -> usize {
        let ctx = infallible_context();
        unsafe { sys::mupdf_buffer_len(ctx, self.as_ptr()) }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies up to `out.len()` bytes starting at `offset`.
    ///
    /// An offset past the end is a precondition error; an offset equal to
    /// the length reads nothing.
    pub fn read_at(&self, offset: usize, out: &mut [u8]) -> Result<usize> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_buffer_read_bytes(
                ctx,
                self.as_ptr(),
                offset,
                out.as_mut_ptr(),
                out.len()
            ))
        }
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0; self.len()];
        let n = self.read_at(0, &mut out)?;
        out.truncate(n);
        Ok(out)
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        self.to_vec().map(Bytes::from)
    }

    /// Reads the whole buffer as UTF-8 text.
    pub fn to_text(&self) -> Result<String> {
        String::from_utf8(self.to_vec()?)
            .map_err(|e| Error::from(e.utf8_error()))
    }

    /// Deep copy with its own storage and a fresh read cursor.
    pub fn duplicate(&self) -> Result<Self> {
        Self::from_bytes(&self.to_vec()?)
    }

    /// Whether a document, font, image or output also holds this buffer.
    pub fn is_shared(&self) -> bool {
        unsafe { sys::mupdf_buffer_refs(infallible_context(), self.as_ptr()) > 1 }
    }

    fn ensure_exclusive(&self) -> Result<()> {
        if self.is_shared() {
            return Err(Error::precondition("buffer is shared and cannot be written"));
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_exclusive()?;
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_buffer_write_bytes(ctx, self.as_ptr(), data.as_ptr(), data.len())) }
    }

    /// Appends `data` encoded as base64.
    pub fn write_base64(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_exclusive()?;
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_buffer_write_base64(ctx, self.as_ptr(), data.as_ptr(), data.len())) }
    }

    /// Moves the read cursor used by `io::Read`.
    pub fn seek_read(&mut self, offset: usize) {
        self.offset = offset;
    }
}

impl FromStr for Buffer {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe { sys::mupdf_drop_buffer(infallible_context(), self.as_ptr()) };
        stats::record_destroyed(HandleKind::Buffer);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl io::Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.len() {
            return Ok(0);
        }
        let n = self.read_at(self.offset, buf)?;
        self.offset += n;
        Ok(n)
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
