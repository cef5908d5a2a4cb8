use mupdf_shim_sys as sys;

use crate::context::context;
use crate::error::{Result, ffi_try};
use crate::handle::native_handle;

use super::{PdfDocument, PdfObject};

native_handle! {
    /// Copies objects into one destination document, remembering what was
    /// already copied so shared resources land there only once.
    @local pub struct PdfGraftMap(sys::PdfGraftMap): PdfGraftMap,
        keep = sys::mupdf_pdf_keep_graft_map,
        drop = sys::mupdf_pdf_drop_graft_map;
}

impl PdfGraftMap {
    /// A map copying into `dst`.
    pub fn new(dst: &PdfDocument) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_new_graft_map(ctx, dst.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    /// Deep-copies `obj` into the destination document and returns the copy.
    pub fn graft_object(&mut self, obj: &PdfObject) -> Result<PdfObject> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_pdf_graft_mapped_object(ctx, self.as_ptr(), obj.as_ptr()))?;
            PdfObject::from_raw_unbound(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{HandleKind, handle_stats};
    use crate::testing;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_shared_object_copied_once() {
        let src = testing::sample_pdf(&["shared"]);
        let dst = PdfDocument::new().unwrap();
        let page = src.lookup_page_obj(0).unwrap();

        let mut map = dst.new_graft_map().unwrap();
        let first = map.graft_object(&page).unwrap();
        let second = map.graft_object(&page).unwrap();
        assert!(first.is_indirect().unwrap());
        assert_eq!(first.object_number().unwrap(), second.object_number().unwrap());
        assert!(first.document().is_some());
    }

    #[test]
    #[serial]
    fn test_unmapped_graft_copies_again() {
        let src = testing::sample_pdf(&["again"]);
        let mut dst = PdfDocument::new().unwrap();
        let page = src.lookup_page_obj(0).unwrap();

        let mut map = dst.new_graft_map().unwrap();
        let mapped = map.graft_object(&page).unwrap();
        let unmapped = dst.graft_object(&page).unwrap();
        assert_ne!(mapped.object_number().unwrap(), unmapped.object_number().unwrap());
    }

    #[test]
    #[serial]
    fn test_map_handles_are_released() {
        let before = handle_stats(HandleKind::PdfGraftMap).current;
        {
            let dst = PdfDocument::new().unwrap();
            let map = PdfGraftMap::new(&dst).unwrap();
            let _copy = map.clone();
            assert_eq!(handle_stats(HandleKind::PdfGraftMap).current, before + 2);
        }
        assert_eq!(handle_stats(HandleKind::PdfGraftMap).current, before);
    }
}
