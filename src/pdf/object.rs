use std::cell::OnceCell;
use std::ffi::CString;
use std::fmt;
use std::os::raw::{c_char, c_int};

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::Rect;
use crate::handle::{adopted_str, borrowed_str};
use crate::stats::{self, HandleKind};

use super::PdfDocument;

/// A PDF value: null, boolean, number, string, name, array, dictionary,
/// stream or indirect reference.
///
/// `null`, `true` and `false` are library-owned sentinels; handles over
/// them are never kept or dropped natively.
pub struct PdfObject {
    ptr: *mut sys::PdfObj,
    sentinel: bool,
    /// Owning document, filled on construction when known and looked up
    /// lazily otherwise.
    doc: OnceCell<Option<PdfDocument>>,
}

fn is_sentinel(ptr: *mut sys::PdfObj) -> bool {
    unsafe { ptr.is_null() || ptr == sys::mupdf_pdf_true() || ptr == sys::mupdf_pdf_false() }
}

fn index_arg(index: usize) -> Result<c_int> {
    c_int::try_from(index).map_err(|_| Error::precondition("index out of range"))
}

impl PdfObject {
    fn wrap(ptr: *mut sys::PdfObj, doc: OnceCell<Option<PdfDocument>>) -> Self {
        stats::record_created(HandleKind::PdfObject);
        Self {
            ptr,
            sentinel: is_sentinel(ptr),
            doc,
        }
    }

    /// Takes ownership of one object reference. A null pointer is a
    /// failure here; use [`PdfObject::from_raw_optional`] where null means
    /// "absent".
    ///
    /// # Safety
    ///
    /// `ptr` must be null, a sentinel, or an owned reference.
    pub(crate) unsafe fn from_raw(ptr: *mut sys::PdfObj, doc: Option<PdfDocument>) -> Result<Self> {
        if ptr.is_null() {
            return Err(Error::generic("native call returned no PdfObject"));
        }
        Ok(Self::wrap(ptr, OnceCell::from(doc)))
    }

    /// Like [`PdfObject::from_raw`], but null reads as `None`.
    ///
    /// # Safety
    ///
    /// As for [`PdfObject::from_raw`].
    pub(crate) unsafe fn from_raw_optional(ptr: *mut sys::PdfObj, doc: Option<PdfDocument>) -> Option<Self> {
        (!ptr.is_null()).then(|| Self::wrap(ptr, OnceCell::from(doc)))
    }

    /// Adopts an object whose document is looked up on first use.
    ///
    /// # Safety
    ///
    /// As for [`PdfObject::from_raw`].
    pub(crate) unsafe fn from_raw_unbound(ptr: *mut sys::PdfObj) -> Result<Self> {
        if ptr.is_null() {
            return Err(Error::generic("native call returned no PdfObject"));
        }
        Ok(Self::wrap(ptr, OnceCell::new()))
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::PdfObj {
        self.ptr
    }

    fn child(&self, ptr: *mut sys::PdfObj) -> Option<Self> {
        unsafe { Self::from_raw_optional(ptr, self.document()) }
    }

    pub fn null() -> Self {
        Self::wrap(std::ptr::null_mut(), OnceCell::from(None))
    }

    pub fn new_bool(value: bool) -> Self {
        let ptr = unsafe {
            if value {
                sys::mupdf_pdf_true()
            } else {
                sys::mupdf_pdf_false()
            }
        };
        Self::wrap(ptr, OnceCell::from(None))
    }

    pub fn new_int(value: i64) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_int(ctx, value))?;
            Self::from_raw(raw, None)
        }
    }

    pub fn new_real(value: f32) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_real(ctx, value))?;
            Self::from_raw(raw, None)
        }
    }

    pub fn new_string(value: &str) -> Result<Self> {
        Self::new_byte_string(value.as_bytes())
    }

    /// String object holding arbitrary bytes.
    pub fn new_byte_string(bytes: &[u8]) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_string(ctx, bytes.as_ptr().cast::<c_char>(), bytes.len()))?;
            Self::from_raw(raw, None)
        }
    }

    pub fn new_name(name: &str) -> Result<Self> {
        let ctx = context()?;
        let c_name = CString::new(name)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_name(ctx, c_name.as_ptr()))?;
            Self::from_raw(raw, None)
        }
    }

    /// Parses a direct object from PDF syntax, e.g. `<< /Type /Page >>`.
    /// Use [`PdfDocument::parse_object`] when the text holds references.
    pub fn parse(source: &str) -> Result<Self> {
        let ctx = context()?;
        let c_source = CString::new(source)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_obj_from_str(ctx, std::ptr::null_mut(), c_source.as_ptr()))?;
            Self::from_raw(raw, None)
        }
    }

    /// Document this object belongs to, if any.
    pub fn document(&self) -> Option<PdfDocument> {
        self.doc
            .get_or_init(|| {
                let raw = unsafe { sys::mupdf_pdf_get_bound_document(infallible_context(), self.ptr) };
                if raw.is_null() {
                    None
                } else {
                    unsafe { PdfDocument::from_raw(raw) }.ok()
                }
            })
            .clone()
    }

    pub fn deep_copy(&self) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_deep_copy_obj(ctx, self.ptr))?;
            Self::from_raw(raw, self.document())
        }
    }

    /// Marks the object as modified so incremental saves pick it up.
    pub fn set_dirty(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_dirty(ctx, self.ptr)) }
    }

    /// Serializes to PDF syntax. `tight` drops optional whitespace, `ascii`
    /// escapes non-ASCII string bytes.
    pub fn to_pdf_string(&self, tight: bool, ascii: bool) -> Result<String> {
        let ctx = context()?;
        let raw = unsafe {
            ffi_try!(sys::mupdf_pdf_obj_to_string(ctx, self.ptr, c_int::from(tight), c_int::from(ascii)))
        }?;
        unsafe { adopted_str(raw) }.ok_or_else(|| Error::generic("object has no text form"))
    }
}

macro_rules! predicates {
    ($($name:ident => $func:ident),* $(,)?) => {
        impl PdfObject {
            $(
                pub fn $name(&self) -> Result<bool> {
                    let ctx = context()?;
                    unsafe { ffi_try!(sys::$func(ctx, self.ptr)) }.map(|v| v != 0)
                }
            )*
        }
    };
}

predicates! {
    is_null => mupdf_pdf_is_null,
    is_bool => mupdf_pdf_is_bool,
    is_int => mupdf_pdf_is_int,
    is_real => mupdf_pdf_is_real,
    is_number => mupdf_pdf_is_number,
    is_string => mupdf_pdf_is_string,
    is_name => mupdf_pdf_is_name,
    is_array => mupdf_pdf_is_array,
    is_dict => mupdf_pdf_is_dict,
    is_indirect => mupdf_pdf_is_indirect,
    is_stream => mupdf_pdf_is_stream,
}

// Conversions follow the library's lenient rules: a value of the wrong
// type reads as false, zero or empty, references are followed.
impl PdfObject {
    pub fn as_bool(&self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_to_bool(ctx, self.ptr)) }.map(|v| v != 0)
    }

    pub fn as_int(&self) -> Result<i64> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_to_int(ctx, self.ptr)) }
    }

    pub fn as_float(&self) -> Result<f32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_to_real(ctx, self.ptr)) }
    }

    pub fn as_name(&self) -> Result<String> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_to_name(ctx, self.ptr)) }?;
        Ok(unsafe { borrowed_str(raw) }.unwrap_or_default())
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        let ctx = context()?;
        let mut len = 0usize;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_to_string(ctx, self.ptr, &mut len)) }?;
        if raw.is_null() || len == 0 {
            return Ok(Vec::new());
        }
        Ok(unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec())
    }

    /// String contents, with invalid UTF-8 replaced.
    pub fn as_string(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.as_bytes()?).into_owned())
    }

    pub fn as_rect(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_to_rect(ctx, self.ptr)) }.map(Rect::from)
    }

    /// Object number of an indirect reference, 0 for direct objects.
    pub fn object_number(&self) -> Result<i32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_to_num(ctx, self.ptr)) }
    }

    /// Follows an indirect reference; direct objects resolve to themselves.
    pub fn resolve(&self) -> Result<Self> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_resolve_indirect(ctx, self.ptr)) }?;
        Ok(self.child(raw).unwrap_or_else(Self::null))
    }
}

impl PdfObject {
    pub fn array_len(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { ffi_try!(sys::mupdf_pdf_array_len(ctx, self.ptr)) }?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Element `index`; `None` past the end.
    pub fn array_get(&self, index: usize) -> Result<Option<Self>> {
        let ctx = context()?;
        let i = index_arg(index)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_array_get(ctx, self.ptr, i)) }?;
        Ok(self.child(raw))
    }

    pub fn array_put(&mut self, index: usize, item: &PdfObject) -> Result<()> {
        let ctx = context()?;
        let i = index_arg(index)?;
        unsafe { ffi_try!(sys::mupdf_pdf_array_put(ctx, self.ptr, i, item.ptr)) }
    }

    pub fn array_push(&mut self, item: &PdfObject) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_array_push(ctx, self.ptr, item.ptr)) }
    }

    pub fn array_insert(&mut self, index: usize, item: &PdfObject) -> Result<()> {
        let ctx = context()?;
        let i = index_arg(index)?;
        unsafe { ffi_try!(sys::mupdf_pdf_array_insert(ctx, self.ptr, item.ptr, i)) }
    }

    pub fn array_delete(&mut self, index: usize) -> Result<()> {
        let ctx = context()?;
        let i = index_arg(index)?;
        unsafe { ffi_try!(sys::mupdf_pdf_array_delete(ctx, self.ptr, i)) }
    }
}

impl PdfObject {
    pub fn dict_len(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { ffi_try!(sys::mupdf_pdf_dict_len(ctx, self.ptr)) }?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Key of entry `index`, a name object.
    pub fn dict_key(&self, index: usize) -> Result<Option<Self>> {
        let ctx = context()?;
        let i = index_arg(index)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_dict_get_key(ctx, self.ptr, i)) }?;
        Ok(self.child(raw))
    }

    pub fn dict_value(&self, index: usize) -> Result<Option<Self>> {
        let ctx = context()?;
        let i = index_arg(index)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_dict_get_val(ctx, self.ptr, i)) }?;
        Ok(self.child(raw))
    }

    /// Value under `key`; `None` when missing or null.
    pub fn dict_get(&self, key: &str) -> Result<Option<Self>> {
        let ctx = context()?;
        let c_key = CString::new(key)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_dict_gets(ctx, self.ptr, c_key.as_ptr())) }?;
        Ok(self.child(raw))
    }

    pub fn dict_get_obj(&self, key: &PdfObject) -> Result<Option<Self>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_dict_get(ctx, self.ptr, key.ptr)) }?;
        Ok(self.child(raw))
    }

    /// Looks `key` up here, then along the `Parent` chain, the way page
    /// attributes such as `MediaBox` are inherited.
    pub fn dict_get_inheritable(&self, key: &str) -> Result<Option<Self>> {
        let ctx = context()?;
        let name = Self::new_name(key)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_dict_get_inheritable(ctx, self.ptr, name.ptr)) }?;
        Ok(self.child(raw))
    }

    pub fn dict_put(&mut self, key: &str, value: &PdfObject) -> Result<()> {
        let ctx = context()?;
        let c_key = CString::new(key)?;
        unsafe { ffi_try!(sys::mupdf_pdf_dict_puts(ctx, self.ptr, c_key.as_ptr(), value.ptr)) }
    }

    pub fn dict_put_obj(&mut self, key: &PdfObject, value: &PdfObject) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_dict_put(ctx, self.ptr, key.ptr, value.ptr)) }
    }

    pub fn dict_delete(&mut self, key: &str) -> Result<()> {
        let ctx = context()?;
        let c_key = CString::new(key)?;
        unsafe { ffi_try!(sys::mupdf_pdf_dict_dels(ctx, self.ptr, c_key.as_ptr())) }
    }

    pub fn dict_delete_obj(&mut self, key: &PdfObject) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_dict_del(ctx, self.ptr, key.ptr)) }
    }
}

impl PdfObject {
    /// Decoded stream contents.
    pub fn read_stream(&self) -> Result<Buffer> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_read_stream(ctx, self.ptr))?;
            Buffer::from_raw(raw)
        }
    }

    /// Stream contents with filters still applied.
    pub fn read_raw_stream(&self) -> Result<Buffer> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_read_raw_stream(ctx, self.ptr))?;
            Buffer::from_raw(raw)
        }
    }

    /// Replaces the object this reference points to with `value`.
    pub fn write_object(&mut self, value: &PdfObject) -> Result<()> {
        if !self.is_indirect()? {
            return Err(Error::precondition("object is not an indirect reference"));
        }
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_write_object(ctx, self.ptr, value.ptr)) }
    }

    /// Replaces the stream data of this reference. `compressed` says the
    /// bytes are already encoded with the object's filters.
    pub fn write_stream(&mut self, data: &Buffer, compressed: bool) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_pdf_write_stream_buffer(
                ctx,
                self.ptr,
                data.as_ptr(),
                c_int::from(compressed)
            ))
        }
    }

    pub fn write_stream_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_stream(&Buffer::from_bytes(data)?, false)
    }
}

impl Clone for PdfObject {
    fn clone(&self) -> Self {
        if !self.sentinel {
            unsafe { sys::mupdf_pdf_keep_obj(infallible_context(), self.ptr) };
        }
        stats::record_created(HandleKind::PdfObject);
        Self {
            ptr: self.ptr,
            sentinel: self.sentinel,
            doc: self.doc.clone(),
        }
    }
}

impl Drop for PdfObject {
    fn drop(&mut self) {
        if !self.sentinel {
            unsafe { sys::mupdf_pdf_drop_obj(infallible_context(), self.ptr) };
        }
        stats::record_destroyed(HandleKind::PdfObject);
    }
}

impl fmt::Debug for PdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_pdf_string(true, true) {
            Ok(text) => f.debug_tuple("PdfObject").field(&text).finish(),
            Err(_) => f.debug_struct("PdfObject").field("ptr", &self.ptr).finish(),
        }
    }
}

impl fmt::Display for PdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_pdf_string(false, false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
