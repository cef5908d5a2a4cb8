//! Handle accounting and failure-path properties. Every test reads the
//! global handle counters, so all of them run serially.

mod common;

use mupdf_safe::pdf::{PdfDocument, PdfObject, WriteOptions};
use mupdf_safe::{
    BlendMode, Buffer, ColorParams, Colorspace, Cookie, CustomDevice, Device, Document, DocumentWriter, Error,
    HandleKind, Image, Matrix, Path, Rect, StrokeState, Text, handle_stats,
};
use rayon::prelude::*;
use serial_test::serial;

fn live(kind: HandleKind) -> u64 {
    handle_stats(kind).current
}

fn sample() -> Document {
    Document::from_bytes(&common::letter_pdf(&["alpha", "beta"]), "application/pdf").unwrap()
}

mod lifetimes {
    use super::*;

    #[test]
    #[serial]
    fn test_create_then_drop_is_net_zero() {
        common::init_tracing();
        let kinds = [
            HandleKind::Document,
            HandleKind::Page,
            HandleKind::Pixmap,
            HandleKind::DisplayList,
            HandleKind::Path,
        ];
        let before: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        {
            let doc = sample();
            let page = doc.load_page(0).unwrap();
            let rgb = Colorspace::device_rgb().unwrap();
            let _pixmap = page.to_pixmap(&Matrix::IDENTITY, &rgb, false, true).unwrap();
            let _list = page.to_display_list(false).unwrap();
            let mut path = Path::new().unwrap();
            path.rect(0.0, 0.0, 10.0, 10.0).unwrap();
        }
        let after: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        assert_eq!(before, after);
    }

    #[test]
    #[serial]
    fn test_clone_outlives_original() {
        let before = live(HandleKind::Document);
        let doc = sample();
        let copy = doc.clone();
        assert_eq!(live(HandleKind::Document), before + 2);
        drop(doc);
        assert_eq!(live(HandleKind::Document), before + 1);
        assert_eq!(copy.page_count().unwrap(), 2);
        drop(copy);
        assert_eq!(live(HandleKind::Document), before);
    }

    #[test]
    #[serial]
    fn test_pdf_object_sentinels_are_not_counted_twice() {
        let before = live(HandleKind::PdfObject);
        {
            let t = PdfObject::new_bool(true);
            let _copies: Vec<_> = (0..4).map(|_| t.clone()).collect();
            let _null = PdfObject::null();
        }
        assert_eq!(live(HandleKind::PdfObject), before);
    }

    /// Keeps nothing it is handed.
    #[derive(Default)]
    struct Counter {
        calls: usize,
    }

    impl CustomDevice for Counter {
        fn fill_path(&mut self, _: &Path, _: bool, _: Matrix, _: &Colorspace, _: &[f32], _: f32, _: ColorParams) {
            self.calls += 1;
        }

        fn stroke_path(&mut self, _: &Path, _: &StrokeState, _: Matrix, _: &Colorspace, _: &[f32], _: f32, _: ColorParams) {
            self.calls += 1;
        }

        fn fill_text(&mut self, _: &Text, _: Matrix, _: &Colorspace, _: &[f32], _: f32, _: ColorParams) {
            self.calls += 1;
        }

        fn fill_image(&mut self, _: &Image, _: Matrix, _: f32, _: ColorParams) {
            self.calls += 1;
        }

        fn begin_group(&mut self, _: Rect, cs: Option<&Colorspace>, _: bool, _: bool, _: BlendMode, _: f32) {
            // A clone taken here must be released like any other.
            let _copy = cs.cloned();
            self.calls += 1;
        }
    }

    #[test]
    #[serial]
    fn test_custom_device_arguments_are_net_zero() {
        let kinds = [
            HandleKind::Path,
            HandleKind::Text,
            HandleKind::Colorspace,
            HandleKind::StrokeState,
            HandleKind::Image,
        ];
        let doc = sample();
        let page = doc.load_page(0).unwrap();
        let list = page.to_display_list(false).unwrap();
        let rgb = Colorspace::device_rgb().unwrap();
        let mut square = Path::new().unwrap();
        square.rect(0.0, 0.0, 4.0, 4.0).unwrap();

        let before: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        let mut counter = Counter::default();
        {
            let mut dev = Device::custom(&mut counter).unwrap();
            list.run(&mut dev, &Matrix::IDENTITY, &Rect::INFINITE, None).unwrap();
            dev.fill_path(&square, false, &Matrix::IDENTITY, &rgb, &[0.0, 0.0, 0.0], 1.0, ColorParams::default())
                .unwrap();
            dev.begin_group(&Rect::new(0.0, 0.0, 1.0, 1.0), Some(&rgb), false, false, BlendMode::Normal, 1.0)
                .unwrap();
            dev.end_group().unwrap();
            dev.close().unwrap();
        }
        let after: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        assert_eq!(before, after);
        assert!(counter.calls >= 3);
    }

    #[test]
    #[serial]
    fn test_annotations_release_their_page() {
        let before = (live(HandleKind::PdfPage), live(HandleKind::PdfAnnotation));
        {
            let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["notes"])).unwrap();
            let mut page = pdf.load_page(0).unwrap();
            page.create_annotation(mupdf_safe::pdf::AnnotationType::Highlight).unwrap();
            let listed: Vec<_> = page.annotations().collect();
            assert_eq!(listed.len(), 1);
        }
        assert_eq!((live(HandleKind::PdfPage), live(HandleKind::PdfAnnotation)), before);
    }
}

mod failure_paths {
    use super::*;

    #[test]
    #[serial]
    fn test_failed_serialization_releases_buffer() {
        let pdf = PdfDocument::from_bytes(&common::letter_pdf(&["x"])).unwrap();
        let before = live(HandleKind::Buffer);
        let options = WriteOptions {
            garbage: 9,
            ..WriteOptions::default()
        };
        assert!(matches!(pdf.write_to_buffer(&options), Err(Error::Precondition(_))));
        assert_eq!(live(HandleKind::Buffer), before);
    }

    #[test]
    #[serial]
    fn test_failed_writer_construction() {
        let mut out = Buffer::new().unwrap();
        let before = (live(HandleKind::Buffer), live(HandleKind::DocumentWriter));
        assert!(DocumentWriter::with_buffer(&mut out, "not-a-format", "").is_err());
        assert_eq!((live(HandleKind::Buffer), live(HandleKind::DocumentWriter)), before);
        // No native reference to the buffer was left behind either.
        assert!(!out.is_shared());
        out.write_bytes(b"%PDF").unwrap();
    }

    #[test]
    #[serial]
    fn test_aborted_conversion_leaks_nothing() {
        let doc = sample();
        let cookie = Cookie::new().unwrap();
        cookie.abort();
        let kinds = [HandleKind::PdfDocument, HandleKind::Page, HandleKind::Buffer];
        let before: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        let res = doc.convert_to_pdf(0, 1, 0, Some(&cookie));
        assert!(matches!(res, Err(Error::Aborted(_))));
        let after: Vec<_> = kinds.iter().map(|&k| live(k)).collect();
        assert_eq!(before, after);
        // The source is intact and still converts without the cookie.
        assert_eq!(doc.convert_to_pdf(0, 1, 0, None).unwrap().page_count().unwrap(), 2);
    }

    #[test]
    #[serial]
    fn test_aborted_svg_export_leaks_nothing() {
        let doc = sample();
        let page = doc.load_page(0).unwrap();
        let cookie = Cookie::new().unwrap();
        cookie.abort();
        let before = (live(HandleKind::Buffer), live(HandleKind::Device));
        let res = page.to_svg(&Matrix::IDENTITY, Some(&cookie));
        assert!(matches!(res, Err(Error::Aborted(_))));
        assert_eq!((live(HandleKind::Buffer), live(HandleKind::Device)), before);
    }

    #[test]
    #[serial]
    fn test_precondition_before_native_call() {
        let doc = sample();
        let err = doc.load_page(usize::MAX).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(matches!(Document::recognize("bad\0magic"), Err(Error::Precondition(_))));
    }
}

mod conversion {
    use super::*;

    #[test]
    #[serial]
    fn test_empty_source_gives_empty_pdf() {
        let empty = PdfDocument::new().unwrap().as_document().unwrap();
        let pdf = empty.convert_to_pdf(0, 0, 0, None).unwrap();
        assert_eq!(pdf.page_count().unwrap(), 0);
        assert!(!pdf.to_bytes(&WriteOptions::default()).unwrap().is_empty());
    }

    #[test]
    #[serial]
    fn test_bad_rotation_allocates_nothing() {
        let doc = sample();
        let before = live(HandleKind::PdfDocument);
        let err = doc.convert_to_pdf(0, 1, 45, None).unwrap_err();
        assert!(err.message().contains("rotation not multiple of 90"));
        assert_eq!(live(HandleKind::PdfDocument), before);
    }

    #[test]
    #[serial]
    fn test_failure_mid_range_leaks_nothing() {
        let doc = sample();
        let before = (live(HandleKind::PdfDocument), live(HandleKind::Page));
        assert!(doc.convert_to_pdf(0, 5, 0, None).is_err());
        assert_eq!((live(HandleKind::PdfDocument), live(HandleKind::Page)), before);
        // The source stays usable.
        assert_eq!(doc.convert_to_pdf(1, 0, 0, None).unwrap().page_count().unwrap(), 2);
    }
}

mod threads {
    use super::*;

    #[test]
    #[serial]
    fn test_parallel_open_render_drop() {
        common::init_tracing();
        let bytes = common::letter_pdf(&["p1", "p2", "p3"]);
        let before = (live(HandleKind::Document), live(HandleKind::Pixmap));

        let areas: Vec<u64> = (0..8)
            .into_par_iter()
            .map(|_| {
                let doc = Document::from_bytes(&bytes, "application/pdf").unwrap();
                let rgb = Colorspace::device_rgb().unwrap();
                let mut area = 0u64;
                for page in doc.pages().unwrap() {
                    let pixmap = page
                        .unwrap()
                        .to_pixmap(&Matrix::scale(0.25, 0.25), &rgb, false, true)
                        .unwrap();
                    area += u64::from(pixmap.width()) * u64::from(pixmap.height());
                }
                area
            })
            .collect();

        assert!(areas.iter().all(|&a| a > 0));
        assert!(areas.windows(2).all(|w| w[0] == w[1]));
        assert_eq!((live(HandleKind::Document), live(HandleKind::Pixmap)), before);
    }
}
