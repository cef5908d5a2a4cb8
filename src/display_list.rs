use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::colorspace::Colorspace;
use crate::context::context;
use crate::cookie::{Cookie, check_aborted, cookie_ptr};
use crate::device::Device;
use crate::error::{Result, ffi_try};
use crate::geometry::{Matrix, Rect};
use crate::handle::native_handle;
use crate::pixmap::Pixmap;
use crate::search::{self, SearchHits};
use crate::text_page::{TextFormat, TextPage, TextPageOptions};

native_handle! {
    /// Recorded drawing commands, replayable on any device.
    ///
    /// Lists come out of [`Page::to_display_list`](crate::Page::to_display_list)
    /// or [`Device::into_display_list`] fully recorded. Nothing appends to
    /// them afterwards, so they can be replayed from several threads at once.
    pub struct DisplayList(sys::FzDisplayList): DisplayList,
        keep = sys::mupdf_keep_display_list,
        drop = sys::mupdf_drop_display_list;
}

// Only a list device appends, and the one recording device owns its list
// until `Device::into_display_list` hands it out.
unsafe impl Sync for DisplayList {}

impl DisplayList {
    /// Empty list for a recording device.
    pub(crate) fn empty(mediabox: Rect) -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_display_list(ctx, mediabox.into()))?;
            Self::from_raw(raw)
        }
    }

    pub fn bounds(&self) -> Result<Rect> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_bound_display_list(ctx, self.as_ptr())) }.map(Rect::from)
    }

    /// Replays the commands that intersect `area` onto `device`.
    ///
    /// Fails with [`Error::Aborted`](crate::Error::Aborted) when `cookie` was
    /// aborted before or during the replay.
    pub fn run(&self, device: &mut Device<'_>, ctm: &Matrix, area: &Rect, cookie: Option<&Cookie>) -> Result<()> {
        let ctx = context()?;
        unsafe {
            ffi_try!(sys::mupdf_run_display_list(
                ctx,
                self.as_ptr(),
                device.as_ptr(),
                (*ctm).into(),
                (*area).into(),
                cookie_ptr(cookie)
            ))?;
        }
        check_aborted(cookie)
    }

    pub fn to_pixmap(&self, ctm: &Matrix, cs: &Colorspace, alpha: bool) -> Result<Pixmap> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_display_list_to_pixmap(
                ctx,
                self.as_ptr(),
                (*ctm).into(),
                cs.as_ptr(),
                i32::from(alpha)
            ))?;
            Pixmap::from_raw(raw)
        }
    }

    pub fn to_text_page(&self, options: TextPageOptions) -> Result<TextPage> {
        let ctx = context()?;
        let opts = options.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_display_list_to_stext_page(ctx, self.as_ptr(), &opts))?;
            TextPage::from_raw(raw)
        }
    }

    pub fn to_svg(&self, ctm: &Matrix, cookie: Option<&Cookie>) -> Result<Buffer> {
        let ctx = context()?;
        let svg = unsafe {
            let raw = ffi_try!(sys::mupdf_display_list_to_svg(
                ctx,
                self.as_ptr(),
                (*ctm).into(),
                cookie_ptr(cookie)
            ))?;
            Buffer::from_raw(raw)?
        };
        check_aborted(cookie)?;
        Ok(svg)
    }

    pub fn to_text_format(&self, format: TextFormat, options: TextPageOptions) -> Result<Buffer> {
        let ctx = context()?;
        let opts = options.to_raw();
        unsafe {
            let raw = ffi_try!(sys::mupdf_display_list_to_text_format(
                ctx,
                self.as_ptr(),
                format.to_raw(),
                &opts
            ))?;
            Buffer::from_raw(raw)
        }
    }

    pub fn search(&self, needle: &str) -> Result<SearchHits> {
        self.search_with_capacity(needle, search::DEFAULT_HIT_MAX)
    }

    pub fn search_with_capacity(&self, needle: &str, hit_max: usize) -> Result<SearchHits> {
        let ctx = context()?;
        search::run_search(needle, hit_max, |n, max, count, err| unsafe {
            sys::mupdf_search_display_list(ctx, self.as_ptr(), n, max, count, err)
        })
    }
}
