use std::ffi::CString;
use std::os::raw::c_int;
use std::path::Path;

use mupdf_shim_sys as sys;
use tracing::debug;

use crate::buffer::Buffer;
use crate::colorspace::Colorspace;
use crate::context::{context, infallible_context};
use crate::cookie::{Cookie, check_aborted, cookie_ptr};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::Point;
use crate::handle::{adopted_str, native_handle, path_to_cstring};
use crate::link::{LinkDestination, Location};
use crate::outline::{self, Outline};
use crate::page::Page;
use crate::pdf::PdfDocument;

native_handle! {
    /// An open document of any format MuPDF understands.
    @local pub struct Document(sys::FzDocument): Document,
        keep = sys::mupdf_keep_document,
        drop = sys::mupdf_drop_document;
}

/// Well-known keys for [`Document::metadata`].
pub mod metadata {
    pub const FORMAT: &str = "format";
    pub const ENCRYPTION: &str = "encryption";
    pub const TITLE: &str = "info:Title";
    pub const AUTHOR: &str = "info:Author";
    pub const SUBJECT: &str = "info:Subject";
    pub const KEYWORDS: &str = "info:Keywords";
    pub const CREATOR: &str = "info:Creator";
    pub const PRODUCER: &str = "info:Producer";
    pub const CREATION_DATE: &str = "info:CreationDate";
    pub const MOD_DATE: &str = "info:ModDate";
}

impl Document {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_open_document(ctx, c_path.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    /// Opens and authenticates in one step.
    ///
    /// Fails with `PasswordRequired` when the file is encrypted and
    /// `password` is `None`, and with `PasswordFailed` when it is rejected.
    pub fn open_with_password<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        let c_password = password.map(CString::new).transpose()?;
        let password_ptr = c_password.as_ref().map_or(std::ptr::null(), |p| p.as_ptr());
        unsafe {
            let raw = ffi_try!(sys::mupdf_open_document_with_password(ctx, c_path.as_ptr(), password_ptr))?;
            Self::from_raw(raw)
        }
    }

    /// Opens an in-memory document. `magic` is a file name or mime type
    /// used to pick the handler, e.g. `"application/pdf"` or `"book.epub"`.
    pub fn from_buffer(buffer: &Buffer, magic: &str) -> Result<Self> {
        let ctx = context()?;
        let c_magic = CString::new(magic)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_open_document_from_bytes(ctx, buffer.as_ptr(), c_magic.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn from_bytes(bytes: &[u8], magic: &str) -> Result<Self> {
        Self::from_buffer(&Buffer::from_bytes(bytes)?, magic)
    }

    /// Whether any registered handler accepts `magic`.
    pub fn recognize(magic: &str) -> Result<bool> {
        let ctx = context()?;
        let c_magic = CString::new(magic)?;
        unsafe { ffi_try!(sys::mupdf_recognize_document(ctx, c_magic.as_ptr())) }.map(|v| v != 0)
    }

    pub fn needs_password(&self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_needs_password(ctx, self.as_ptr())) }.map(|v| v != 0)
    }

    /// Returns `false` for a wrong password; the document stays locked.
    pub fn authenticate(&mut self, password: &str) -> Result<bool> {
        let ctx = context()?;
        let c_password = CString::new(password)?;
        unsafe { ffi_try!(sys::mupdf_authenticate_password(ctx, self.as_ptr(), c_password.as_ptr())) }
            .map(|v| v != 0)
    }

    pub fn page_count(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { ffi_try!(sys::mupdf_document_page_count(ctx, self.as_ptr())) }?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    pub fn load_page(&self, index: usize) -> Result<Page> {
        let ctx = context()?;
        let index = c_int::try_from(index).map_err(|_| Error::precondition("page index out of range"))?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_load_page(ctx, self.as_ptr(), index))?;
            Page::from_raw(raw)
        }
    }

    /// All pages in order, loaded lazily.
    pub fn pages(&self) -> Result<impl Iterator<Item = Result<Page>> + '_> {
        let count = self.page_count()?;
        Ok((0..count).map(move |i| self.load_page(i)))
    }

    /// Looks up a metadata entry; `None` when the document has no such key.
    /// See [`metadata`] for common keys.
    pub fn metadata(&self, key: &str) -> Result<Option<String>> {
        let ctx = context()?;
        let c_key = CString::new(key)?;
        let raw = unsafe { ffi_try!(sys::mupdf_lookup_metadata(ctx, self.as_ptr(), c_key.as_ptr())) }?;
        Ok(unsafe { adopted_str(raw) })
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<()> {
        let ctx = context()?;
        let c_key = CString::new(key)?;
        let c_value = CString::new(value)?;
        unsafe { ffi_try!(sys::mupdf_set_metadata(ctx, self.as_ptr(), c_key.as_ptr(), c_value.as_ptr())) }
    }

    pub fn is_reflowable(&self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_is_document_reflowable(ctx, self.as_ptr())) }.map(|v| v != 0)
    }

    /// Lays out a reflowable document for a `w` x `h` page and `em` font
    /// size. Fixed-layout documents ignore it.
    pub fn layout(&mut self, w: f32, h: f32, em: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_layout_document(ctx, self.as_ptr(), w, h, em)) }
    }

    /// Table of contents, empty when the document has none.
    pub fn outline(&self) -> Result<Vec<Outline>> {
        let ctx = context()?;
        let head = unsafe { ffi_try!(sys::mupdf_load_outline(ctx, self.as_ptr())) }?;
        Ok(unsafe { outline::collect_outline(head) })
    }

    /// Resolves an internal link to a location and the target point on
    /// that page.
    pub fn resolve_link(&self, uri: &str) -> Result<(Location, Point)> {
        let ctx = context()?;
        let c_uri = CString::new(uri)?;
        let (mut x, mut y) = (0.0f32, 0.0f32);
        let loc = unsafe { ffi_try!(sys::mupdf_resolve_link(ctx, self.as_ptr(), c_uri.as_ptr(), &mut x, &mut y)) }?;
        Ok((Location::from(loc), Point::new(x, y)))
    }

    /// Like [`resolve_link`](Self::resolve_link), also reporting how the
    /// link wants the target page framed.
    pub fn resolve_link_dest(&self, uri: &str) -> Result<LinkDestination> {
        let ctx = context()?;
        let c_uri = CString::new(uri)?;
        let dest = unsafe { ffi_try!(sys::mupdf_resolve_link_dest(ctx, self.as_ptr(), c_uri.as_ptr())) }?;
        Ok(dest.into())
    }

    pub fn output_intent(&self) -> Result<Option<Colorspace>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_document_output_intent(ctx, self.as_ptr())) }?;
        if raw.is_null() {
            return Ok(None);
        }
        unsafe { Colorspace::from_raw(raw) }.map(Some)
    }

    /// Re-renders pages `from..=to` into a new PDF, walking backwards when
    /// `to < from`. `rotate` must be a multiple of 90.
    ///
    /// Any failure aborts the whole conversion and leaves nothing behind,
    /// including an abort through `cookie`.
    pub fn convert_to_pdf(&self, from: usize, to: usize, rotate: i32, cookie: Option<&Cookie>) -> Result<PdfDocument> {
        let ctx = context()?;
        let from = c_int::try_from(from).map_err(|_| Error::precondition("page index out of range"))?;
        let to = c_int::try_from(to).map_err(|_| Error::precondition("page index out of range"))?;
        debug!(from, to, rotate, "converting pages to pdf");
        let pdf = unsafe {
            let raw = ffi_try!(sys::mupdf_convert_to_pdf(ctx, self.as_ptr(), from, to, rotate, cookie_ptr(cookie)))?;
            PdfDocument::from_raw(raw)?
        };
        check_aborted(cookie)?;
        Ok(pdf)
    }

    /// The PDF view of this document, `None` for other formats.
    pub fn as_pdf(&self) -> Option<PdfDocument> {
        let raw = unsafe { sys::mupdf_document_as_pdf(infallible_context(), self.as_ptr()) };
        if raw.is_null() {
            return None;
        }
        unsafe { PdfDocument::from_raw(raw) }.ok()
    }

    pub fn is_pdf(&self) -> bool {
        self.as_pdf().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::link::DestinationKind;
    use crate::testing;

    #[test]
    fn test_page_count_and_range_check() {
        let doc = testing::sample_document(&["one", "two", "three"]);
        assert_eq!(doc.page_count().unwrap(), 3);
        assert!(doc.load_page(2).is_ok());
        let err = doc.load_page(3).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("page index out of range"));
        assert_eq!(doc.pages().unwrap().count(), 3);
    }

    #[test]
    fn test_metadata_round_trip() {
        let mut doc = testing::sample_document(&["meta"]);
        assert_eq!(doc.metadata(metadata::FORMAT).unwrap().as_deref().map(|f| f.starts_with("PDF")), Some(true));
        assert_eq!(doc.metadata("info:NoSuchKey").unwrap(), None);
        doc.set_metadata(metadata::TITLE, "Quarterly report").unwrap();
        assert_eq!(doc.metadata(metadata::TITLE).unwrap().as_deref(), Some("Quarterly report"));
    }

    #[test]
    fn test_open_from_bytes() {
        let bytes = testing::sample_pdf_bytes(&["from memory"]);
        let doc = Document::from_bytes(&bytes, "application/pdf").unwrap();
        assert_eq!(doc.page_count().unwrap(), 1);
        assert!(doc.is_pdf());
        assert!(!doc.needs_password().unwrap());
        assert!(!doc.is_reflowable().unwrap());
    }

    #[test]
    fn test_recognize_magic() {
        assert!(Document::recognize("application/pdf").unwrap());
        assert!(Document::recognize("file.pdf").unwrap());
        assert!(matches!(Document::recognize("bad\0magic"), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Document::open("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotFound | ErrorKind::System | ErrorKind::Generic));
    }

    #[test]
    fn test_layout_rejects_zero_size() {
        let mut doc = testing::sample_document(&["fixed"]);
        assert!(matches!(doc.layout(0.0, 100.0, 11.0), Err(Error::Precondition(_))));
        doc.layout(300.0, 400.0, 11.0).unwrap();
    }

    #[test]
    fn test_outline_empty_without_toc() {
        let doc = testing::sample_document(&["no toc"]);
        assert!(doc.outline().unwrap().is_empty());
        assert!(doc.output_intent().unwrap().is_none());
    }

    #[test]
    fn test_resolve_page_link() {
        let doc = testing::sample_document(&["a", "b"]);
        let (loc, _) = doc.resolve_link("#page=2").unwrap();
        assert_eq!(loc, Location { chapter: 0, page: 1 });
    }

    #[test]
    fn test_resolve_link_destination() {
        let doc = testing::sample_document(&["a", "b"]);
        let dest = doc.resolve_link_dest("#page=2").unwrap();
        assert_eq!(dest.location, Location { chapter: 0, page: 1 });

        let fit = doc.resolve_link_dest("#page=2&view=Fit").unwrap();
        assert_eq!(fit.location.page, 1);
        assert_eq!(fit.kind, DestinationKind::Fit);

        let fit_h = doc.resolve_link_dest("#page=1&view=FitH,72").unwrap();
        assert_eq!(fit_h.location.page, 0);
        assert!(matches!(fit_h.kind, DestinationKind::FitH { .. }));
    }

    #[test]
    fn test_convert_to_pdf() {
        let doc = testing::sample_document(&["first", "second", "third"]);
        let pdf = doc.convert_to_pdf(0, 2, 0, None).unwrap();
        assert_eq!(pdf.page_count().unwrap(), 3);

        let reversed = doc.convert_to_pdf(2, 1, 90, None).unwrap();
        assert_eq!(reversed.page_count().unwrap(), 2);
        let text = reversed.as_document().unwrap().load_page(0).unwrap().to_text().unwrap();
        assert!(text.contains("third"));
    }

    #[test]
    fn test_convert_rejects_odd_rotation() {
        let doc = testing::sample_document(&["tilted"]);
        let err = doc.convert_to_pdf(0, 0, 45, None).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("rotation not multiple of 90"));
    }

    #[test]
    fn test_convert_past_end_fails() {
        let doc = testing::sample_document(&["only"]);
        assert!(doc.convert_to_pdf(0, 5, 0, None).is_err());
    }

    #[test]
    fn test_aborted_conversion_releases_source_pages() {
        let doc = testing::sample_document(&["a", "b"]);
        let refs = || unsafe { sys::mupdf_document_refs(infallible_context(), doc.as_ptr()) };
        let before = refs();
        let cookie = Cookie::new().unwrap();
        cookie.abort();
        let res = doc.convert_to_pdf(0, 1, 0, Some(&cookie));
        assert!(matches!(res, Err(Error::Aborted(_))));
        assert_eq!(refs(), before);
    }
}
