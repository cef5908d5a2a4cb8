//! Fixtures for unit tests: small PDFs built through the wrapper itself.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::buffer::Buffer;
use crate::document::Document;
use crate::font::Font;
use crate::geometry::Rect;
use crate::pdf::{PdfDocument, SimpleFontEncoding, WriteOptions};

static TRACING: Once = Once::new();

/// Routes `tracing` output to the test harness, filtered by `RUST_LOG`.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// One 300x200 page per entry, each showing its text in Helvetica.
pub(crate) fn sample_pdf(pages: &[&str]) -> PdfDocument {
    init_tracing();
    let mut pdf = PdfDocument::new().unwrap();
    let font = Font::new("Helvetica").unwrap();
    let font_ref = pdf.add_simple_font(&font, SimpleFontEncoding::Latin).unwrap();

    let mut fonts = pdf.new_dict(1).unwrap();
    fonts.dict_put("F1", &font_ref).unwrap();
    let mut resources = pdf.new_dict(1).unwrap();
    resources.dict_put("Font", &fonts).unwrap();

    for text in pages {
        let content = format!("BT /F1 24 Tf 72 100 Td ({}) Tj ET", escape(text));
        let contents = Buffer::from_bytes(content.as_bytes()).unwrap();
        let page = pdf
            .add_page(Rect::new(0.0, 0.0, 300.0, 200.0), 0, &resources, &contents)
            .unwrap();
        pdf.insert_page(None, &page).unwrap();
    }
    pdf
}

pub(crate) fn sample_document(pages: &[&str]) -> Document {
    sample_pdf(pages).as_document().unwrap()
}

/// Serialized form of [`sample_pdf`].
pub(crate) fn sample_pdf_bytes(pages: &[&str]) -> Vec<u8> {
    sample_pdf(pages).to_bytes(&WriteOptions::default()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_parens() {
        assert_eq!(escape(r"a(b)\c"), r"a\(b\)\\c");
    }
}
