use std::ffi::CString;
use std::fmt;
use std::os::raw::c_int;
use std::ptr::NonNull;

use mupdf_shim_sys as sys;

use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::{Point, Rect};
use crate::handle::borrowed_str;
use crate::stats::{self, HandleKind};

use super::{PdfObject, PdfPage};

/// Annotation subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationType {
    Text,
    Link,
    FreeText,
    Line,
    Square,
    Circle,
    Polygon,
    PolyLine,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    Redact,
    Stamp,
    Caret,
    Ink,
    Popup,
    FileAttachment,
    Sound,
    Movie,
    RichMedia,
    Widget,
    Screen,
    PrinterMark,
    TrapNet,
    Watermark,
    ThreeD,
    Projection,
    /// A subtype MuPDF does not recognize.
    Unknown,
}

impl AnnotationType {
    const KNOWN: [AnnotationType; 28] = [
        AnnotationType::Text,
        AnnotationType::Link,
        AnnotationType::FreeText,
        AnnotationType::Line,
        AnnotationType::Square,
        AnnotationType::Circle,
        AnnotationType::Polygon,
        AnnotationType::PolyLine,
        AnnotationType::Highlight,
        AnnotationType::Underline,
        AnnotationType::Squiggly,
        AnnotationType::StrikeOut,
        AnnotationType::Redact,
        AnnotationType::Stamp,
        AnnotationType::Caret,
        AnnotationType::Ink,
        AnnotationType::Popup,
        AnnotationType::FileAttachment,
        AnnotationType::Sound,
        AnnotationType::Movie,
        AnnotationType::RichMedia,
        AnnotationType::Widget,
        AnnotationType::Screen,
        AnnotationType::PrinterMark,
        AnnotationType::TrapNet,
        AnnotationType::Watermark,
        AnnotationType::ThreeD,
        AnnotationType::Projection,
    ];

    pub(crate) fn from_raw(raw: c_int) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::KNOWN.get(i).copied())
            .unwrap_or(AnnotationType::Unknown)
    }

    /// `Unknown` maps to -1, which creation rejects.
    pub(crate) fn to_raw(self) -> c_int {
        Self::KNOWN
            .iter()
            .position(|&k| k == self)
            .and_then(|i| c_int::try_from(i).ok())
            .unwrap_or(-1)
    }
}

/// Bits of the annotation `/F` entry.
pub mod flags {
    pub const INVISIBLE: i32 = 1 << 0;
    pub const HIDDEN: i32 = 1 << 1;
    pub const PRINT: i32 = 1 << 2;
    pub const NO_ZOOM: i32 = 1 << 3;
    pub const NO_ROTATE: i32 = 1 << 4;
    pub const NO_VIEW: i32 = 1 << 5;
    pub const READ_ONLY: i32 = 1 << 6;
    pub const LOCKED: i32 = 1 << 7;
    pub const TOGGLE_NO_VIEW: i32 = 1 << 8;
    pub const LOCKED_CONTENTS: i32 = 1 << 9;
}

/// An annotation on a [`PdfPage`]. Keeps its page alive.
pub struct PdfAnnotation {
    inner: NonNull<sys::PdfAnnot>,
    page: PdfPage,
}

impl PdfAnnotation {
    /// # Safety
    ///
    /// `ptr` must be null or an owned annotation reference on `page`.
    pub(crate) unsafe fn from_raw(ptr: *mut sys::PdfAnnot, page: PdfPage) -> Result<Self> {
        let inner = NonNull::new(ptr).ok_or_else(|| Error::generic("native call returned no PdfAnnotation"))?;
        stats::record_created(HandleKind::PdfAnnotation);
        Ok(Self { inner, page })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::PdfAnnot {
        self.inner.as_ptr()
    }

    pub fn page(&self) -> &PdfPage {
        &self.page
    }

    /// The annotation dictionary.
    pub fn object(&self) -> Result<PdfObject> {
        let raw = unsafe { sys::mupdf_pdf_annot_obj(infallible_context(), self.as_ptr()) };
        unsafe { PdfObject::from_raw(raw, Some(self.page.document().clone())) }
    }

    pub fn kind(&self) -> Result<AnnotationType> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_type(ctx, self.as_ptr())) }.map(AnnotationType::from_raw)
    }

    pub fn author(&self) -> Result<Option<String>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_annot_author(ctx, self.as_ptr())) }?;
        Ok(unsafe { borrowed_str(raw) })
    }

    pub fn set_author(&mut self, author: &str) -> Result<()> {
        let ctx = context()?;
        let author = CString::new(author)?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_author(ctx, self.as_ptr(), author.as_ptr())) }
    }

    pub fn contents(&self) -> Result<Option<String>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_pdf_annot_contents(ctx, self.as_ptr())) }?;
        Ok(unsafe { borrowed_str(raw) })
    }

    pub fn set_contents(&mut self, text: &str) -> Result<()> {
        let ctx = context()?;
        let text = CString::new(text)?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_contents(ctx, self.as_ptr(), text.as_ptr())) }
    }

    /// Bounding box in page space.
    pub fn rect(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_rect(ctx, self.as_ptr())) }.map(Rect::from)
    }

    pub fn set_rect(&mut self, rect: Rect) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_rect(ctx, self.as_ptr(), rect.into())) }
    }

    /// Stroke color components; empty when transparent.
    pub fn color(&self) -> Result<Vec<f32>> {
        let ctx = context()?;
        let mut components = [0.0f32; 4];
        let n = unsafe { ffi_try!(sys::mupdf_pdf_annot_color(ctx, self.as_ptr(), components.as_mut_ptr())) }?;
        let n = usize::try_from(n).unwrap_or(0).min(components.len());
        Ok(components[..n].to_vec())
    }

    /// Accepts 0 (transparent), 1 (gray), 3 (RGB) or 4 (CMYK) components.
    pub fn set_color(&mut self, components: &[f32]) -> Result<()> {
        let ctx = context()?;
        let n = c_int::try_from(components.len())
            .map_err(|_| Error::precondition("annotation color needs 0, 1, 3 or 4 components"))?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_color(ctx, self.as_ptr(), n, components.as_ptr())) }
    }

    /// See [`flags`].
    pub fn flags(&self) -> Result<i32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_flags(ctx, self.as_ptr())) }
    }

    pub fn set_flags(&mut self, flags: i32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_flags(ctx, self.as_ptr(), flags)) }
    }

    pub fn opacity(&self) -> Result<f32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_opacity(ctx, self.as_ptr())) }
    }

    /// `opacity` must lie in `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_opacity(ctx, self.as_ptr(), opacity)) }
    }

    pub fn border_width(&self) -> Result<f32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_border_width(ctx, self.as_ptr())) }
    }

    pub fn set_border_width(&mut self, width: f32) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_border_width(ctx, self.as_ptr(), width)) }
    }

    /// End points of a line annotation.
    pub fn set_line(&mut self, a: Point, b: Point) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_line(ctx, self.as_ptr(), a.into(), b.into())) }
    }

    pub fn popup(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_annot_popup(ctx, self.as_ptr())) }.map(Rect::from)
    }

    pub fn set_popup(&mut self, rect: Rect) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_set_annot_popup(ctx, self.as_ptr(), rect.into())) }
    }

    /// Whether the pointer is over the annotation.
    pub fn is_hot(&self) -> bool {
        unsafe { sys::mupdf_pdf_annot_is_hot(infallible_context(), self.as_ptr()) != 0 }
    }

    /// Whether the annotation is being interacted with.
    pub fn is_active(&self) -> bool {
        unsafe { sys::mupdf_pdf_annot_is_active(infallible_context(), self.as_ptr()) != 0 }
    }

    /// Regenerates the appearance stream if needed. Returns whether it changed.
    pub fn update(&mut self) -> Result<bool> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_pdf_update_annot(ctx, self.as_ptr())) }.map(|v| v != 0)
    }
}

impl Clone for PdfAnnotation {
    fn clone(&self) -> Self {
        unsafe { sys::mupdf_pdf_keep_annot(infallible_context(), self.as_ptr()) };
        stats::record_created(HandleKind::PdfAnnotation);
        Self {
            inner: self.inner,
            page: self.page.clone(),
        }
    }
}

impl Drop for PdfAnnotation {
    fn drop(&mut self) {
        unsafe { sys::mupdf_pdf_drop_annot(infallible_context(), self.as_ptr()) };
        stats::record_destroyed(HandleKind::PdfAnnotation);
    }
}

impl fmt::Debug for PdfAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfAnnotation")
            .field("ptr", &self.inner)
            .field("kind", &self.kind().ok())
            .finish()
    }
}

/// Iterator over the annotations of a page, in page order.
pub struct Annotations {
    page: PdfPage,
    next: Option<PdfAnnotation>,
}

impl Annotations {
    pub(crate) fn new(page: PdfPage, first: *mut sys::PdfAnnot) -> Self {
        let next = unsafe { PdfAnnotation::from_raw(first, page.clone()) }.ok();
        Self { page, next }
    }
}

impl Iterator for Annotations {
    type Item = PdfAnnotation;

    fn next(&mut self) -> Option<PdfAnnotation> {
        let current = self.next.take()?;
        let raw = unsafe { sys::mupdf_pdf_next_annot(infallible_context(), current.as_ptr()) };
        self.next = unsafe { PdfAnnotation::from_raw(raw, self.page.clone()) }.ok();
        Some(current)
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotations").field("page", &self.page).finish_non_exhaustive()
    }
}
