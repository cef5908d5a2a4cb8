use std::os::raw::c_int;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::Rect;
use crate::handle::native_handle;
use crate::search::{self, SearchHits};

native_handle! {
    /// Structured text extracted from a page or display list.
    pub struct TextPage(sys::FzStextPage): TextPage,
        drop = sys::mupdf_drop_stext_page;
}

/// Serialization formats for extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
    Xhtml,
    Xml,
    Json,
}

impl TextFormat {
    pub(crate) fn to_raw(self) -> c_int {
        match self {
            TextFormat::Plain => sys::MUPDF_TEXT_PLAIN,
            TextFormat::Html => sys::MUPDF_TEXT_HTML,
            TextFormat::Xhtml => sys::MUPDF_TEXT_XHTML,
            TextFormat::Xml => sys::MUPDF_TEXT_XML,
            TextFormat::Json => sys::MUPDF_TEXT_JSON,
        }
    }
}

/// Controls what structured-text extraction keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextPageOptions {
    pub preserve_ligatures: bool,
    pub preserve_whitespace: bool,
    pub preserve_images: bool,
    pub inhibit_spaces: bool,
    pub dehyphenate: bool,
    pub preserve_spans: bool,
    /// Drop characters outside the page's media box.
    pub clip: bool,
    pub scale: f32,
}

impl Default for TextPageOptions {
    fn default() -> Self {
        Self {
            preserve_ligatures: false,
            preserve_whitespace: false,
            preserve_images: false,
            inhibit_spaces: false,
            dehyphenate: false,
            preserve_spans: false,
            clip: false,
            scale: 1.0,
        }
    }
}

impl TextPageOptions {
    pub(crate) fn to_raw(self) -> sys::MupdfStextOptions {
        let bits = [
            self.preserve_ligatures,
            self.preserve_whitespace,
            self.preserve_images,
            self.inhibit_spaces,
            self.dehyphenate,
            self.preserve_spans,
            self.clip,
        ];
        let flags = bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0, |acc, (i, _)| acc | (1 << i));
        sys::MupdfStextOptions {
            flags,
            scale: self.scale,
        }
    }
}

impl TextPage {
    /// Empty page, to be filled through a text device.
    pub fn new(mediabox: Rect) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_stext_page(ctx, mediabox.into()))?;
            Self::from_raw(raw)
        }
    }

    pub fn bounds(&self) -> Rect {
        unsafe { sys::mupdf_stext_page_bound(infallible_context(), self.as_ptr()) }.into()
    }

    pub fn to_buffer(&self, format: TextFormat) -> Result<Buffer> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_stext_page_to_buffer(ctx, self.as_ptr(), format.to_raw()))?;
            Buffer::from_raw(raw)
        }
    }

    pub fn to_text(&self) -> Result<String> {
        self.to_buffer(TextFormat::Plain)?.to_text()
    }

    /// Block/line/span structure as parsed JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let text = self.to_buffer(TextFormat::Json)?.to_text()?;
        serde_json::from_str(&text).map_err(|e| Error::format(format!("invalid text page json: {e}")))
    }

    pub fn search(&self, needle: &str) -> Result<SearchHits> {
        self.search_with_capacity(needle, search::DEFAULT_HIT_MAX)
    }

    pub fn search_with_capacity(&self, needle: &str, hit_max: usize) -> Result<SearchHits> {
        let ctx = context()?;
        search::run_search(needle, hit_max, |n, max, count, err| unsafe {
            sys::mupdf_search_stext_page(ctx, self.as_ptr(), n, max, count, err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_flags() {
        assert_eq!(TextPageOptions::default().to_raw().flags, 0);
        let opts = TextPageOptions {
            preserve_whitespace: true,
            dehyphenate: true,
            ..TextPageOptions::default()
        };
        assert_eq!(opts.to_raw().flags, 2 | 16);
        assert_eq!(opts.to_raw().scale, 1.0);
    }

    #[test]
    fn test_empty_page_formats() {
        let page = TextPage::new(Rect::new(0.0, 0.0, 100.0, 50.0)).unwrap();
        assert_eq!(page.bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(page.to_text().unwrap().trim().is_empty());
        let json = page.to_json().unwrap();
        assert!(json["blocks"].as_array().unwrap().is_empty());
        let html = page.to_buffer(TextFormat::Html).unwrap().to_text().unwrap();
        assert!(html.contains("<html"));
    }

    #[test]
    fn test_search_empty_page() {
        let page = TextPage::new(Rect::UNIT).unwrap();
        let hits = page.search("anything").unwrap();
        assert!(hits.is_empty());
        assert_eq!(hits.capacity(), search::DEFAULT_HIT_MAX);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: TextPageOptions = serde_json::from_str(r#"{"preserve_images": true}"#).unwrap();
        assert!(opts.preserve_images);
        assert_eq!(opts.scale, 1.0);
    }
}
