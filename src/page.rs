use std::os::raw::c_int;

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::colorspace::Colorspace;
use crate::context::context;
use crate::cookie::{Cookie, check_aborted, cookie_ptr};
use crate::device::Device;
use crate::display_list::DisplayList;
use crate::error::{Result, ffi_try};
use crate::geometry::{Matrix, Rect};
use crate::handle::native_handle;
use crate::link::{self, Link};
use crate::pixmap::Pixmap;
use crate::search::{self, SearchHits};
use crate::separations::Separations;
use crate::text_page::{TextFormat, TextPage, TextPageOptions};

native_handle! {
    /// One page of a [`Document`](crate::Document).
    ///
    /// The page keeps its document alive natively.
    @local pub struct Page(sys::FzPage): Page,
        keep = sys::mupdf_keep_page,
        drop = sys::mupdf_drop_page;
}

/// Which layers of a page [`Page::run`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    All,
    Contents,
    Annotations,
    Widgets,
}

impl RunMode {
    fn to_raw(self) -> c_int {
        match self {
            RunMode::All => sys::MUPDF_RUN_ALL,
            RunMode::Contents => sys::MUPDF_RUN_CONTENTS,
            RunMode::Annotations => sys::MUPDF_RUN_ANNOTS,
            RunMode::Widgets => sys::MUPDF_RUN_WIDGETS,
        }
    }
}

impl Page {
    pub fn bounds(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_bound_page(ctx, self.as_ptr())) }.map(Rect::from)
    }

    /// Renders the page. `show_extras` includes annotations and widgets.
    pub fn to_pixmap(&self, ctm: &Matrix, cs: &Colorspace, alpha: bool, show_extras: bool) -> Result<Pixmap> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_page_to_pixmap(
                ctx,
                self.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                c_int::from(alpha),
                c_int::from(show_extras)
            ))?;
            Pixmap::from_raw(raw)
        }
    }

    /// Fails with [`Error::Aborted`](crate::Error::Aborted) when `cookie`
    /// was aborted; the partial output is released.
    pub fn to_svg(&self, ctm: &Matrix, cookie: Option<&Cookie>) -> Result<Buffer> {
        let ctx = context()?;
        let svg = unsafe {
            let raw = ffi_try!(sys::mupdf_page_to_svg(ctx, self.as_ptr(), (*ctm).into(), cookie_ptr(cookie)))?;
            Buffer::from_raw(raw)?
        };
        check_aborted(cookie)?;
        Ok(svg)
    }

    pub fn to_display_list(&self, annotations: bool) -> Result<DisplayList> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_page_to_display_list(ctx, self.as_ptr(), c_int::from(annotations)))?;
            DisplayList::from_raw(raw)
        }
    }

    pub fn to_text_page(&self, options: TextPageOptions) -> Result<TextPage> {
        let ctx = context()?;
        let opts = options.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_page_to_stext_page(ctx, self.as_ptr(), &opts))?;
            TextPage::from_raw(raw)
        }
    }

    pub fn to_text_format(&self, format: TextFormat, options: TextPageOptions) -> Result<Buffer> {
        let ctx = context()?;
        let opts = options.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_page_to_text_format(ctx, self.as_ptr(), format.to_raw(), &opts))?;
            Buffer::from_raw(raw)
        }
    }

    /// Plain text of the page with default extraction options.
    pub fn to_text(&self) -> Result<String> {
        self.to_text_format(TextFormat::Plain, TextPageOptions::default())?
            .to_text()
    }

    pub fn run(&self, mode: RunMode, device: &mut Device<'_>, ctm: &Matrix, cookie: Option<&Cookie>) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_run_page(
                ctx,
                self.as_ptr(),
                mode.to_raw(),
                device.as_ptr(),
                (*ctm).into(),
                cookie_ptr(cookie)
            ))?;
        }
        check_aborted(cookie)
    }

    pub fn links(&self) -> Result<Vec<Link>> {
        let ctx = context()?;
        let head = unsafe { ffi_try!(sys::mupdf_load_links(ctx, self.as_ptr())) }?;
        Ok(unsafe { link::collect_links(head) })
    }

    /// Spot colour plates, `None` for pages without any.
    pub fn separations(&self) -> Result<Option<Separations>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_page_separations(ctx, self.as_ptr())) }?;
        if raw.is_null() {
            return Ok(None);
        }
        unsafe { Separations::from_raw(raw) }.map(Some)
    }

    pub fn count_separations(&self) -> Result<usize> {
        Ok(self.separations()?.map_or(0, |seps| seps.len()))
    }

    pub fn search(&self, needle: &str) -> Result<SearchHits> {
        self.search_with_capacity(needle, search::DEFAULT_HIT_MAX)
    }

    pub fn search_with_capacity(&self, needle: &str, hit_max: usize) -> Result<SearchHits> {
        let ctx = context()?;
        search::run_search(needle, hit_max, |n, max, count, err| unsafe {
            sys::mupdf_search_page(ctx, self.as_ptr(), n, max, count, err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing;

    #[test]
    fn test_bounds_and_render() {
        let doc = testing::sample_document(&["first page", "second page"]);
        let page = doc.load_page(0).unwrap();
        assert_eq!(page.bounds().unwrap(), Rect::new(0.0, 0.0, 300.0, 200.0));

        let rgb = Colorspace::device_rgb().unwrap();
        let pix = page.to_pixmap(&Matrix::scale(0.5, 0.5), &rgb, false, true).unwrap();
        assert_eq!((pix.width(), pix.height()), (150, 100));
        assert_eq!(pix.n(), 3);
    }

    #[test]
    fn test_text_extraction() {
        let doc = testing::sample_document(&["needle in a haystack"]);
        let page = doc.load_page(0).unwrap();
        assert!(page.to_text().unwrap().contains("needle in a haystack"));
        let json = page.to_text_page(TextPageOptions::default()).unwrap().to_json().unwrap();
        assert_eq!(json["blocks"].as_array().unwrap().len(), 1);
        let html = page
            .to_text_format(TextFormat::Xhtml, TextPageOptions::default())
            .unwrap()
            .to_text()
            .unwrap();
        assert!(html.contains("needle"));
    }

    #[test]
    fn test_search_hits() {
        let doc = testing::sample_document(&["abc abc abc"]);
        let page = doc.load_page(0).unwrap();
        let hits = page.search("abc").unwrap();
        assert_eq!(hits.count(), 3);
        let xs: Vec<f32> = hits.iter().map(|q| q.ul.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));

        let capped = page.search_with_capacity("abc", 2).unwrap();
        assert_eq!(capped.count(), 2);
        assert!(capped.is_saturated());

        let err = page.search_with_capacity("abc", 0).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_display_list_and_run_modes() {
        let doc = testing::sample_document(&["listed"]);
        let page = doc.load_page(0).unwrap();
        let list = page.to_display_list(true).unwrap();
        assert!(list.to_text_page(TextPageOptions::default()).unwrap().to_text().unwrap().contains("listed"));

        let mut dev = Device::bbox().unwrap();
        page.run(RunMode::Contents, &mut dev, &Matrix::IDENTITY, None).unwrap();
        assert!(!dev.bbox_bounds().unwrap().is_empty());

        let mut empty = Device::bbox().unwrap();
        page.run(RunMode::Annotations, &mut empty, &Matrix::IDENTITY, None).unwrap();
        assert!(empty.bbox_bounds().unwrap().is_empty());
    }

    #[test]
    fn test_svg_and_links() {
        let doc = testing::sample_document(&["svg"]);
        let page = doc.load_page(0).unwrap();
        let svg = page.to_svg(&Matrix::IDENTITY, None).unwrap().to_text().unwrap();
        assert!(svg.starts_with("<?xml") || svg.contains("<svg"));
        assert!(page.links().unwrap().is_empty());
        assert_eq!(page.count_separations().unwrap(), 0);
    }

    #[test]
    fn test_aborted_svg_export_fails() {
        let doc = testing::sample_document(&["svg"]);
        let page = doc.load_page(0).unwrap();
        let cookie = Cookie::new().unwrap();
        cookie.abort();
        let res = page.to_svg(&Matrix::IDENTITY, Some(&cookie));
        assert!(matches!(res, Err(Error::Aborted(_))));
    }

    #[test]
    fn test_aborted_run_fails() {
        let doc = testing::sample_document(&["stopped"]);
        let page = doc.load_page(0).unwrap();
        let cookie = Cookie::new().unwrap();
        cookie.abort();
        let mut dev = Device::bbox().unwrap();
        let res = page.run(RunMode::Contents, &mut dev, &Matrix::IDENTITY, Some(&cookie));
        assert!(matches!(res, Err(Error::Aborted(_))));
    }
}
