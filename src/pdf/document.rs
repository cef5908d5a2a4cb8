use std::ffi::CString;
use std::os::raw::c_int;
use std::path::Path;

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::context::{context, infallible_context};
use crate::document::Document;
use crate::error::{Error, Result, ffi_try};
use crate::font::{Font, WriteMode};
use crate::geometry::{Matrix, Rect};
use crate::handle::{native_handle, path_to_cstring};
use crate::image::Image;

use super::{PdfGraftMap, PdfObject, PdfPage, WriteOptions};

native_handle! {
    /// A PDF document opened for inspection and editing.
    @local pub struct PdfDocument(sys::PdfDocument): PdfDocument,
        keep = sys::mupdf_pdf_keep_document,
        drop = sys::mupdf_pdf_drop_document;
}

/// Character collection of a CJK font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CjkOrdering {
    /// Traditional Chinese.
    Cns,
    /// Simplified Chinese.
    Gb,
    Japan,
    Korea,
}

impl CjkOrdering {
    fn to_raw(self) -> c_int {
        match self {
            CjkOrdering::Cns => 0,
            CjkOrdering::Gb => 1,
            CjkOrdering::Japan => 2,
            CjkOrdering::Korea => 3,
        }
    }
}

/// Single-byte encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimpleFontEncoding {
    #[default]
    Latin,
    Greek,
    Cyrillic,
}

impl SimpleFontEncoding {
    fn to_raw(self) -> c_int {
        match self {
            SimpleFontEncoding::Latin => 0,
            SimpleFontEncoding::Greek => 1,
            SimpleFontEncoding::Cyrillic => 2,
        }
    }
}

/// `None` appends, `Some(i)` places before page `i`.
fn page_slot(at: Option<usize>) -> Result<c_int> {
    at.map_or(Ok(-1), |i| c_int::try_from(i).map_err(|_| Error::precondition("page index out of range")))
}

fn page_index(index: usize) -> Result<c_int> {
    c_int::try_from(index).map_err(|_| Error::precondition("page index out of range"))
}

impl PdfDocument {
    /// Empty document without pages.
    pub fn new() -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_create_document(ctx))?;
            Self::from_raw(raw)
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_open_document(ctx, c_path.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn from_buffer(buffer: &Buffer) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_open_document_from_bytes(ctx, buffer.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_buffer(&Buffer::from_bytes(bytes)?)
    }

    /// The same document through the format-independent interface, for
    /// rendering, text extraction and metadata.
    pub fn as_document(&self) -> Result<Document> {
        unsafe { Document::from_raw(sys::mupdf_pdf_document_as_document(infallible_context(), self.as_ptr())) }
    }

    pub fn page_count(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { ffi_try!(sys::mupdf_pdf_count_pages(ctx, self.as_ptr())) }?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    pub fn load_page(&self, index: usize) -> Result<PdfPage> {
        let ctx = context()?;
        let i = page_index(index)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_load_page(ctx, self.as_ptr(), i))?;
            PdfPage::from_raw(raw, self.clone())
        }
    }

    fn bound(&self, raw: *mut sys::PdfObj) -> Result<PdfObject> {
        unsafe { PdfObject::from_raw(raw, Some(self.clone())) }
    }

    /// Stores `obj` as a new numbered object and returns a reference to it.
    pub fn add_object(&mut self, obj: &PdfObject) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_add_object(ctx, self.as_ptr(), obj.as_ptr())) }?;
        self.bound(raw)
    }

    /// Reserves a new object number, initially null.
    pub fn create_object(&mut self) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_create_object(ctx, self.as_ptr())) }?;
        self.bound(raw)
    }

    pub fn delete_object(&mut self, num: i32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_delete_object(ctx, self.as_ptr(), num)) }
    }

    pub fn add_image(&mut self, image: &Image) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_add_image(ctx, self.as_ptr(), image.as_ptr())) }?;
        self.bound(raw)
    }

    /// Embeds `font` as a CID font with Identity-H encoding.
    pub fn add_font(&mut self, font: &Font) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_add_font(ctx, self.as_ptr(), font.as_ptr())) }?;
        self.bound(raw)
    }

    pub fn add_cjk_font(
        &mut self,
        font: &Font,
        ordering: CjkOrdering,
        wmode: WriteMode,
        serif: bool,
    ) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe {
            ffi_try!(sys::mupdf_pdf_add_cjk_font(
                ctx,
                self.as_ptr(),
                font.as_ptr(),
                ordering.to_raw(),
                wmode.to_raw(),
                c_int::from(serif)
            ))
        }?;
        self.bound(raw)
    }

    pub fn add_simple_font(&mut self, font: &Font, encoding: SimpleFontEncoding) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe {
            ffi_try!(sys::mupdf_pdf_add_simple_font(ctx, self.as_ptr(), font.as_ptr(), encoding.to_raw()))
        }?;
        self.bound(raw)
    }

    pub fn new_array(&self, capacity: usize) -> Result<PdfObject> {
        let ctx = context()?;
        let cap = c_int::try_from(capacity).unwrap_or(c_int::MAX);
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_new_array(ctx, self.as_ptr(), cap)) }?;
        self.bound(raw)
    }

    pub fn new_dict(&self, capacity: usize) -> Result<PdfObject> {
        let ctx = context()?;
        let cap = c_int::try_from(capacity).unwrap_or(c_int::MAX);
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_new_dict(ctx, self.as_ptr(), cap)) }?;
        self.bound(raw)
    }

    /// Reference to object `num`, whether or not it exists yet.
    pub fn new_indirect(&self, num: i32, generation: i32) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_new_indirect(ctx, self.as_ptr(), num, generation)) }?;
        self.bound(raw)
    }

    pub fn new_rect(&self, rect: Rect) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_new_rect(ctx, self.as_ptr(), rect.into())) }?;
        self.bound(raw)
    }

    pub fn new_matrix(&self, matrix: Matrix) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_new_matrix(ctx, self.as_ptr(), matrix.into())) }?;
        self.bound(raw)
    }

    /// Parses PDF syntax whose references (`12 0 R`) point into this
    /// document.
    pub fn parse_object(&self, source: &str) -> Result<PdfObject> {
        let ctx = context()?;
        let c_source = CString::new(source)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_obj_from_str(ctx, self.as_ptr(), c_source.as_ptr())) }?;
        self.bound(raw)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, options: &WriteOptions) -> Result<()> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        options.with_raw(|raw| unsafe { ffi_try!(sys::mupdf_pdf_save_document(ctx, self.as_ptr(), c_path.as_ptr(), raw)) })
    }

    pub fn write_to_buffer(&self, options: &WriteOptions) -> Result<Buffer> {
        let ctx = context()?;
        options.with_raw(|raw| unsafe {
            let buf = ffi_try!(sys::mupdf_pdf_write_document(ctx, self.as_ptr(), raw))?;
            Buffer::from_raw(buf)
        })
    }

    pub fn to_bytes(&self, options: &WriteOptions) -> Result<Vec<u8>> {
        self.write_to_buffer(options)?.to_vec()
    }

    pub fn enable_js(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_enable_js(ctx, self.as_ptr())) }
    }

    pub fn disable_js(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_disable_js(ctx, self.as_ptr())) }
    }

    pub fn js_supported(&self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_js_supported(ctx, self.as_ptr())) }.map(|v| v != 0)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        unsafe { sys::mupdf_pdf_has_unsaved_changes(infallible_context(), self.as_ptr()) != 0 }
    }

    pub fn can_be_saved_incrementally(&self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_can_be_saved_incrementally(ctx, self.as_ptr())) }.map(|v| v != 0)
    }

    pub fn trailer(&self) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_trailer(ctx, self.as_ptr())) }?;
        self.bound(raw)
    }

    /// The document catalog (`/Root`).
    pub fn catalog(&self) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_catalog(ctx, self.as_ptr())) }?;
        self.bound(raw)
    }

    /// Length of the cross-reference table, object 0 included.
    pub fn count_objects(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { ffi_try!(sys::mupdf_pdf_count_objects(ctx, self.as_ptr())) }?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Deep-copies `obj`, which may belong to another document, into this
    /// one. Copying several related objects should share a
    /// [`PdfGraftMap`] so common resources are copied once.
    pub fn graft_object(&mut self, obj: &PdfObject) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_graft_object(ctx, self.as_ptr(), obj.as_ptr())) }?;
        self.bound(raw)
    }

    pub fn new_graft_map(&self) -> Result<PdfGraftMap> {
        PdfGraftMap::new(self)
    }

    /// Creates an empty page and loads it. `at` as for
    /// [`PdfDocument::insert_page`].
    pub fn new_page(&mut self, at: Option<usize>, mediabox: Rect, rotate: i32) -> Result<PdfPage> {
        let ctx = context()?;
        let slot = page_slot(at)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_page(ctx, self.as_ptr(), slot, mediabox.into(), rotate))?;
            PdfPage::from_raw(raw, self.clone())
        }
    }

    /// Builds a page object from a resource dictionary and a content
    /// stream. The page is not part of the page tree until inserted.
    pub fn add_page(&mut self, mediabox: Rect, rotate: i32, resources: &PdfObject, contents: &Buffer) -> Result<PdfObject> {
        let ctx = context()?;
        let raw = unsafe {
            ffi_try!(sys::mupdf_pdf_add_page(
                ctx,
                self.as_ptr(),
                mediabox.into(),
                rotate,
                resources.as_ptr(),
                contents.as_ptr()
            ))
        }?;
        self.bound(raw)
    }

    /// Inserts a page object into the page tree. `None` appends; `Some(i)`
    /// places it before page `i`.
    pub fn insert_page(&mut self, at: Option<usize>, page: &PdfObject) -> Result<()> {
        let ctx = context()?;
        let slot = page_slot(at)?;
        unsafe { ffi_try!(sys::mupdf_pdf_insert_page(ctx, self.as_ptr(), slot, page.as_ptr())) }
    }

    pub fn delete_page(&mut self, index: usize) -> Result<()> {
        let ctx = context()?;
        let i = page_index(index)?;
        unsafe { ffi_try!(sys::mupdf_pdf_delete_page(ctx, self.as_ptr(), i)) }
    }

    pub fn lookup_page_obj(&self, index: usize) -> Result<PdfObject> {
        let ctx = context()?;
        let i = page_index(index)?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_lookup_page_obj(ctx, self.as_ptr(), i)) }?;
        self.bound(raw)
    }
}
