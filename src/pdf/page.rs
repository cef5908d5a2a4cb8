use std::fmt;
use std::os::raw::c_int;
use std::ptr::NonNull;

use mupdf_shim_sys as sys;

use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::{Matrix, Rect};
use crate::page::Page;
use crate::stats::{self, HandleKind};

use super::{AnnotationType, Annotations, PdfAction, PdfAnnotation, PdfDocument, PdfLink, PdfObject};

/// How redaction treats images under a redaction area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactImageMethod {
    /// Leave images alone.
    None,
    /// Remove any image touching the area.
    Remove,
    /// Blank out the covered pixels.
    #[default]
    Pixels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedactOptions {
    /// Paint black boxes over the redacted areas.
    pub black_boxes: bool,
    pub image_method: RedactImageMethod,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            black_boxes: true,
            image_method: RedactImageMethod::default(),
        }
    }
}

impl RedactOptions {
    fn to_raw(self) -> sys::MupdfRedactOptions {
        sys::MupdfRedactOptions {
            black_boxes: c_int::from(self.black_boxes),
            image_method: match self.image_method {
                RedactImageMethod::None => 0,
                RedactImageMethod::Remove => 1,
                RedactImageMethod::Pixels => 2,
            },
        }
    }
}

/// A page of a [`PdfDocument`], with access to its annotations and page
/// dictionary.
pub struct PdfPage {
    inner: NonNull<sys::PdfPage>,
    doc: PdfDocument,
}

impl PdfPage {
    /// # Safety
    ///
    /// `ptr` must be null or an owned page reference belonging to `doc`.
    pub(crate) unsafe fn from_raw(ptr: *mut sys::PdfPage, doc: PdfDocument) -> Result<Self> {
        let inner = NonNull::new(ptr).ok_or_else(|| Error::generic("native call returned no PdfPage"))?;
        stats::record_created(HandleKind::PdfPage);
        Ok(Self { inner, doc })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::PdfPage {
        self.inner.as_ptr()
    }

    /// The PDF view of `page`; `None` when it comes from another format.
    pub fn from_page(page: &Page) -> Result<Option<Self>> {
        let ctx = infallible_context();
        let raw = unsafe { sys::mupdf_pdf_page_from_page(ctx, page.as_ptr()) };
        if raw.is_null() {
            return Ok(None);
        }
        let doc = unsafe { PdfObject::from_raw_unbound(sys::mupdf_pdf_page_obj(ctx, raw)) }
            .ok()
            .and_then(|obj| obj.document());
        let Some(doc) = doc else {
            unsafe { sys::mupdf_pdf_drop_page(ctx, raw) };
            return Err(Error::generic("page object is not bound to a document"));
        };
        unsafe { Self::from_raw(raw, doc) }.map(Some)
    }

    pub fn document(&self) -> &PdfDocument {
        &self.doc
    }

    /// The same page through the format-independent interface.
    pub fn as_page(&self) -> Result<Page> {
        unsafe { Page::from_raw(sys::mupdf_pdf_page_as_page(infallible_context(), self.as_ptr())) }
    }

    /// The page dictionary.
    pub fn object(&self) -> Result<PdfObject> {
        let raw = unsafe { sys::mupdf_pdf_page_obj(infallible_context(), self.as_ptr()) };
        unsafe { PdfObject::from_raw(raw, Some(self.doc.clone())) }
    }

    pub fn create_annotation(&mut self, kind: AnnotationType) -> Result<PdfAnnotation> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_create_annot(ctx, self.as_ptr(), kind.to_raw()))?;
            PdfAnnotation::from_raw(raw, self.clone())
        }
    }

    pub fn delete_annotation(&mut self, annot: &PdfAnnotation) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_delete_annot(ctx, self.as_ptr(), annot.as_ptr())) }
    }

    pub fn annotations(&self) -> Annotations {
        let first = unsafe { sys::mupdf_pdf_first_annot(infallible_context(), self.as_ptr()) };
        Annotations::new(self.clone(), first)
    }

    /// Link annotations with their actions decoded. Links whose URI is
    /// empty are skipped.
    pub fn links(&self) -> Result<Vec<PdfLink>> {
        let links = self.as_page()?.links()?;
        Ok(links
            .into_iter()
            .filter_map(|link| {
                PdfAction::parse(&link.uri).map(|action| PdfLink {
                    bounds: link.bounds,
                    action,
                })
            })
            .collect())
    }

    /// Regenerates annotation appearances. Returns whether anything changed.
    pub fn update(&mut self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_update_page(ctx, self.as_ptr())) }.map(|v| v != 0)
    }

    /// Applies every redaction annotation on the page. Returns whether any
    /// content was removed.
    pub fn redact(&mut self, options: RedactOptions) -> Result<bool> {
        let ctx = context()?;
        let raw = options.to_raw();
        unsafe { ffi_try!(sys::mupdf_pdf_redact_page(ctx, self.as_ptr(), &raw)) }.map(|v| v != 0)
    }

    /// Rotation in degrees, as stored (possibly inherited) in the page tree.
    pub fn rotation(&self) -> Result<i32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_rotation(ctx, self.as_ptr())) }
    }

    pub fn set_rotation(&mut self, degrees: i32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_set_rotation(ctx, self.as_ptr(), degrees)) }
    }

    /// Visible region in unrotated PDF space; the media box when no crop
    /// box is set.
    pub fn crop_box(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_crop_box(ctx, self.as_ptr())) }.map(Rect::from)
    }

    pub fn set_crop_box(&mut self, rect: Rect) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_set_crop_box(ctx, self.as_ptr(), rect.into())) }
    }

    pub fn media_box(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_media_box(ctx, self.as_ptr())) }.map(Rect::from)
    }

    /// Maps PDF space onto the rotated, top-down page space.
    pub fn transform(&self) -> Result<Matrix> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_page_transform(ctx, self.as_ptr())) }.map(Matrix::from)
    }
}

impl Clone for PdfPage {
    fn clone(&self) -> Self {
        unsafe { sys::mupdf_pdf_keep_page(infallible_context(), self.as_ptr()) };
        stats::record_created(HandleKind::PdfPage);
        Self {
            inner: self.inner,
            doc: self.doc.clone(),
        }
    }
}

impl Drop for PdfPage {
    fn drop(&mut self) {
        unsafe { sys::mupdf_pdf_drop_page(infallible_context(), self.as_ptr()) };
        stats::record_destroyed(HandleKind::PdfPage);
    }
}

impl fmt::Debug for PdfPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfPage")
            .field("ptr", &self.inner)
            .field("doc", &self.doc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::testing;

    #[test]
    fn test_page_from_generic_page() {
        let pdf = testing::sample_pdf(&["generic"]);
        let page = pdf.as_document().unwrap().load_page(0).unwrap();
        let pdf_page = PdfPage::from_page(&page).unwrap().unwrap();
        assert_eq!(pdf_page.media_box().unwrap(), Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(pdf_page.document().page_count().unwrap(), 1);
        assert!(pdf_page.as_page().unwrap().to_text().unwrap().contains("generic"));
    }

    fn link_annot(pdf: &PdfDocument, rect: Rect, key: &str, value: &PdfObject) -> PdfObject {
        let mut annot = pdf.new_dict(4).unwrap();
        annot.dict_put("Type", &PdfObject::new_name("Annot").unwrap()).unwrap();
        annot.dict_put("Subtype", &PdfObject::new_name("Link").unwrap()).unwrap();
        annot.dict_put("Rect", &pdf.new_rect(rect).unwrap()).unwrap();
        annot.dict_put(key, value).unwrap();
        annot
    }

    #[test]
    fn test_links_decode_actions() {
        testing::init_tracing();
        let mut pdf = PdfDocument::new().unwrap();
        let resources = pdf.new_dict(0).unwrap();
        let contents = Buffer::from_bytes(b"").unwrap();
        let mut page_obj = pdf
            .add_page(Rect::new(0.0, 0.0, 300.0, 200.0), 0, &resources, &contents)
            .unwrap();

        let mut uri_action = pdf.new_dict(2).unwrap();
        uri_action.dict_put("S", &PdfObject::new_name("URI").unwrap()).unwrap();
        uri_action.dict_put("URI", &PdfObject::new_string("https://mupdf.com").unwrap()).unwrap();
        let mut dest = pdf.new_array(2).unwrap();
        dest.array_push(&page_obj).unwrap();
        dest.array_push(&PdfObject::new_name("Fit").unwrap()).unwrap();

        let mut annots = pdf.new_array(2).unwrap();
        annots
            .array_push(&link_annot(&pdf, Rect::new(10.0, 20.0, 110.0, 40.0), "A", &uri_action))
            .unwrap();
        annots
            .array_push(&link_annot(&pdf, Rect::new(10.0, 60.0, 110.0, 80.0), "Dest", &dest))
            .unwrap();
        page_obj.dict_put("Annots", &annots).unwrap();
        pdf.insert_page(None, &page_obj).unwrap();

        let links = pdf.load_page(0).unwrap().links().unwrap();
        assert_eq!(links.len(), 2);
        let web = links
            .iter()
            .find(|l| l.action == PdfAction::Uri("https://mupdf.com".into()))
            .unwrap();
        assert_eq!((web.bounds.x0, web.bounds.x1), (10.0, 110.0));
        assert_eq!(web.bounds.height(), 20.0);
        assert!(links.iter().any(|l| matches!(
            l.action,
            PdfAction::GoTo(crate::pdf::PdfDestination::Page { page: 0, .. })
        )));
    }

    #[test]
    fn test_rotation() {
        let pdf = testing::sample_pdf(&["spin"]);
        let mut page = pdf.load_page(0).unwrap();
        assert_eq!(page.rotation().unwrap(), 0);
        page.set_rotation(270).unwrap();
        assert_eq!(page.rotation().unwrap(), 270);
        let err = page.set_rotation(45).unwrap_err();
        assert!(err.to_string().contains("rotation not multiple of 90"));
        assert_eq!(
            page.object().unwrap().dict_get("Rotate").unwrap().unwrap().as_int().unwrap(),
            270
        );
    }

    #[test]
    fn test_crop_box() {
        let pdf = testing::sample_pdf(&["crop"]);
        let mut page = pdf.load_page(0).unwrap();
        assert_eq!(page.crop_box().unwrap(), page.media_box().unwrap());
        let crop = Rect::new(10.0, 10.0, 110.0, 60.0);
        page.set_crop_box(crop).unwrap();
        assert_eq!(page.crop_box().unwrap(), crop);
        assert!(matches!(page.set_crop_box(Rect::EMPTY), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_transform_flips_y() {
        let pdf = testing::sample_pdf(&["flip"]);
        let page = pdf.load_page(0).unwrap();
        let ctm = page.transform().unwrap();
        assert_eq!((ctm.a, ctm.d), (1.0, -1.0));
        assert_eq!(ctm.f, 200.0);
    }

    #[test]
    fn test_annotation_lifecycle() {
        let pdf = testing::sample_pdf(&["notes"]);
        let mut page = pdf.load_page(0).unwrap();
        assert_eq!(page.annotations().count(), 0);
        let note = page.create_annotation(AnnotationType::Text).unwrap();
        page.create_annotation(AnnotationType::Square).unwrap();
        let kinds: Vec<_> = page.annotations().map(|a| a.kind().unwrap()).collect();
        assert_eq!(kinds, [AnnotationType::Text, AnnotationType::Square]);

        page.delete_annotation(&note).unwrap();
        assert_eq!(page.annotations().count(), 1);
        page.update().unwrap();
    }

    #[test]
    fn test_redaction_removes_text() {
        let pdf = testing::sample_pdf(&["classified"]);
        let mut page = pdf.load_page(0).unwrap();
        let mut redaction = page.create_annotation(AnnotationType::Redact).unwrap();
        redaction.set_rect(Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();
        assert!(page.redact(RedactOptions::default()).unwrap());
        assert!(!page.as_page().unwrap().to_text().unwrap().contains("classified"));
    }
}
