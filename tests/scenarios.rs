mod common;

use mupdf_safe::pdf::{PdfDocument, WriteOptions};
use mupdf_safe::{Colorspace, Document, Error, Matrix, Rect};

mod open_and_render {
    use super::*;

    #[test]
    fn test_letter_page_renders_at_native_size() {
        common::init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = common::write_pdf(dir.path(), "test.pdf", &common::letter_pdf(&["hello"]));

        let doc = Document::open(&path).unwrap();
        assert_eq!(doc.page_count().unwrap(), 1);
        let page = doc.load_page(0).unwrap();
        assert_eq!(page.bounds().unwrap(), Rect::new(0.0, 0.0, 612.0, 792.0));

        let rgb = Colorspace::device_rgb().unwrap();
        let pixmap = page.to_pixmap(&Matrix::IDENTITY, &rgb, false, true).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (612, 792));
        assert_eq!(pixmap.n(), 3);
        assert!(!pixmap.alpha());
    }

    #[test]
    fn test_page_past_end_is_precondition() {
        let doc = Document::from_bytes(&common::letter_pdf(&["only"]), "application/pdf").unwrap();
        let err = doc.load_page(1).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}

mod passwords {
    use super::*;

    #[test]
    fn test_wrong_then_correct_password() {
        common::init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.pdf");
        let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["secret"])).unwrap();
        pdf.save(&path, &WriteOptions::encrypted("owner-pass", "correct")).unwrap();

        let mut doc = Document::open(&path).unwrap();
        assert!(doc.needs_password().unwrap());
        assert!(!doc.authenticate("wrong").unwrap());
        assert!(doc.authenticate("correct").unwrap());
        assert!(doc.load_page(0).unwrap().to_text().unwrap().contains("secret"));
    }

    #[test]
    fn test_open_with_password_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.pdf");
        let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["secret"])).unwrap();
        pdf.save(&path, &WriteOptions::encrypted("owner-pass", "correct")).unwrap();

        let missing = Document::open_with_password(&path, None).unwrap_err();
        assert!(matches!(missing, Error::PasswordRequired(_)));
        let failed = Document::open_with_password(&path, Some("wrong")).unwrap_err();
        assert!(matches!(failed, Error::PasswordFailed(_)));
        let doc = Document::open_with_password(&path, Some("correct")).unwrap();
        assert_eq!(doc.page_count().unwrap(), 1);
    }
}

mod conversion {
    use super::*;

    #[test]
    fn test_invalid_rotation() {
        let doc = Document::from_bytes(&common::letter_pdf(&["a"]), "application/pdf").unwrap();
        let err = doc.convert_to_pdf(0, 0, 45, None).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.message().contains("rotation not multiple of 90"));
    }

    #[test]
    fn test_rotated_copy() {
        let doc = Document::from_bytes(&common::letter_pdf(&["a", "b"]), "application/pdf").unwrap();
        let pdf = doc.convert_to_pdf(0, 1, 90, None).unwrap();
        assert_eq!(pdf.page_count().unwrap(), 2);
        let bounds = pdf.as_document().unwrap().load_page(0).unwrap().bounds().unwrap();
        assert_eq!((bounds.width(), bounds.height()), (792.0, 612.0));
    }
}

mod search {
    use super::*;

    #[test]
    fn test_no_hits() {
        let doc = Document::from_bytes(&common::letter_pdf(&["haystack"]), "application/pdf").unwrap();
        let page = doc.load_page(0).unwrap();
        let hits = page.search_with_capacity("needle-not-present", 16).unwrap();
        assert_eq!(hits.count(), 0);
        assert!(hits.is_empty());
        assert_eq!(hits.capacity(), 16);
    }

    #[test]
    fn test_hits_are_on_page() {
        let doc = Document::from_bytes(&common::letter_pdf(&["find the needle"]), "application/pdf").unwrap();
        let page = doc.load_page(0).unwrap();
        let hits = page.search("needle").unwrap();
        assert_eq!(hits.count(), 1);
        let bounds = page.bounds().unwrap();
        let quad = hits.hits()[0];
        assert!(bounds.contains(quad.ul.x, quad.ul.y));
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn test_write_to_buffer_keeps_page_count() {
        let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["1", "2", "3"])).unwrap();
        let buffer = pdf.write_to_buffer(&WriteOptions::default()).unwrap();
        let reopened = Document::from_buffer(&buffer, "application/pdf").unwrap();
        assert_eq!(reopened.page_count().unwrap(), pdf.page_count().unwrap());
    }

    #[test]
    fn test_compact_write_reopens() {
        let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["x", "y"])).unwrap();
        let bytes = pdf.to_bytes(&WriteOptions::compact()).unwrap();
        let reopened = Document::from_bytes(&bytes, "application/pdf").unwrap();
        assert_eq!(reopened.page_count().unwrap(), 2);
        assert!(reopened.load_page(1).unwrap().to_text().unwrap().contains('y'));
    }
}

mod concurrency {
    use super::*;
    use mupdf_safe::SharedDocument;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_two_threads_share_one_document() {
        common::init_tracing();
        let texts = ["one", "two", "three", "four"];
        let doc = Document::from_bytes(&common::letter_pdf(&texts), "application/pdf").unwrap();
        let pages = doc.page_count().unwrap();
        let doc = Arc::new(SharedDocument::new(doc).unwrap());

        let workers: Vec<_> = (0..2)
            .map(|_| {
                let doc = Arc::clone(&doc);
                thread::spawn(move || -> mupdf_safe::Result<Vec<(u32, u32)>> {
                    let rgb = Colorspace::device_rgb()?;
                    let mut sizes = Vec::with_capacity(pages);
                    for i in 0..pages {
                        // Documents are single-threaded; recorded display
                        // lists render concurrently.
                        let list = doc.with(|d| d.load_page(i)?.to_display_list(true))?;
                        let pixmap = list.to_pixmap(&Matrix::scale(0.5, 0.5), &rgb, false)?;
                        sizes.push((pixmap.width(), pixmap.height()));
                    }
                    Ok(sizes)
                })
            })
            .collect();

        for worker in workers {
            let sizes = worker.join().unwrap().unwrap();
            assert_eq!(sizes.len(), pages);
            assert!(sizes.iter().all(|&(w, h)| w > 0 && h > 0));
        }
    }
}
