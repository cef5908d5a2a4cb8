#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LETTER: (f32, f32) = (612.0, 792.0);

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A page of a generated PDF: its size and one line of Helvetica text.
#[derive(Debug, Clone, Copy)]
pub struct PageSpec<'a> {
    pub width: f32,
    pub height: f32,
    pub text: &'a str,
}

impl<'a> PageSpec<'a> {
    pub fn letter(text: &'a str) -> Self {
        Self {
            width: LETTER.0,
            height: LETTER.1,
            text,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Serializes a minimal, well-formed PDF with a correct cross-reference
/// table, so tests never depend on binary fixtures.
///
/// Object layout: 1 catalog, 2 page tree, 3 font, then a page and its
/// content stream per entry.
pub fn build_pdf(pages: &[PageSpec<'_>]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_owned());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_owned());
    for (i, page) in pages.iter().enumerate() {
        let content_num = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R >> >> /Contents {content_num} 0 R >>",
            page.width, page.height
        ));
        let stream = format!("BT /F1 24 Tf 72 {} Td ({}) Tj ET", page.height / 2.0, escape(page.text));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = String::from("%PDF-1.7\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", i + 1);
    }
    let xref_at = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    );
    out.into_bytes()
}

/// One letter-sized page per entry.
pub fn letter_pdf(texts: &[&str]) -> Vec<u8> {
    let pages: Vec<_> = texts.iter().map(|t| PageSpec::letter(t)).collect();
    build_pdf(&pages)
}

pub fn write_pdf(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
