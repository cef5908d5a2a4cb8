//! Fonts a document names but does not embed, looked up on the host.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Style, Weight};
use font_kit::source::SystemSource;
use mupdf_shim_sys as sys;

/// Font file bytes and the face to use inside them.
pub(crate) struct SystemFont {
    pub(crate) family: String,
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

/// Routes missing-font lookups on `ctx` and its clones to the host.
pub(crate) fn install(ctx: *mut sys::FzContext) {
    unsafe { sys::mupdf_install_system_fonts(ctx, Some(load_font), Some(load_cjk_font)) };
    tracing::debug!("system font lookup installed");
}

pub(crate) fn find(name: &str, bold: bool, italic: bool) -> Option<SystemFont> {
    // Common alias with a different family name on macOS.
    let name = if name == "SimSun" { "SimSong" } else { name };
    let mut properties = Properties::new();
    properties
        .weight(if bold { Weight::BOLD } else { Weight::NORMAL })
        .style(if italic { Style::Italic } else { Style::Normal });
    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Title(name.to_owned())], &properties)
        .ok()?;
    let index = match &handle {
        Handle::Path { font_index, .. } | Handle::Memory { font_index, .. } => *font_index,
    };
    let font = handle.load().ok()?;
    Some(SystemFont {
        family: font.family_name(),
        data: font.copy_font_data()?,
        index,
    })
}

/// Families commonly installed for a CJK collection.
pub(crate) fn cjk_families(ordering: c_int, serif: bool) -> &'static [&'static str] {
    match (ordering, serif) {
        (sys::FZ_ADOBE_CNS, true) => &["MingLiU", "PMingLiU", "Noto Serif CJK TC"],
        (sys::FZ_ADOBE_CNS, false) => &["DFKaiShu-SB-Estd-BF", "Microsoft JhengHei", "Noto Sans CJK TC"],
        (sys::FZ_ADOBE_GB, true) => &["SimSun", "Noto Serif CJK SC"],
        (sys::FZ_ADOBE_GB, false) => &["KaiTi", "KaiTi_GB2312", "Microsoft YaHei", "Noto Sans CJK SC"],
        (sys::FZ_ADOBE_JAPAN, true) => &["MS-Mincho", "MS Mincho", "Noto Serif CJK JP"],
        (sys::FZ_ADOBE_JAPAN, false) => &["MS-Gothic", "MS Gothic", "Noto Sans CJK JP"],
        (sys::FZ_ADOBE_KOREA, true) => &["Batang", "Noto Serif CJK KR"],
        (sys::FZ_ADOBE_KOREA, false) => &["Gulim", "Malgun Gothic", "Noto Sans CJK KR"],
        _ => &[],
    }
}

unsafe fn deliver(sink: *mut c_void, deliver: Option<sys::MupdfFontSinkFn>, font: &SystemFont) -> c_int {
    let (Some(deliver), Ok(index)) = (deliver, c_int::try_from(font.index)) else {
        return 0;
    };
    unsafe { deliver(sink, font.data.as_ptr(), font.data.len(), index) };
    1
}

unsafe fn requested_name<'n>(name: *const c_char) -> Option<std::borrow::Cow<'n, str>> {
    if name.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(name) }.to_string_lossy())
    }
}

unsafe extern "C" fn load_font(
    sink: *mut c_void,
    sink_fn: Option<sys::MupdfFontSinkFn>,
    name: *const c_char,
    bold: c_int,
    italic: c_int,
    exact: c_int,
) -> c_int {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let Some(name) = (unsafe { requested_name(name) }) else {
            return 0;
        };
        match find(&name, bold != 0, italic != 0) {
            Some(font) if exact == 0 || font.family == name => {
                tracing::trace!(requested = %name, family = %font.family, "system font found");
                unsafe { deliver(sink, sink_fn, &font) }
            }
            _ => 0,
        }
    }));
    outcome.unwrap_or_else(|_| {
        tracing::error!("system font lookup panicked");
        0
    })
}

unsafe extern "C" fn load_cjk_font(
    sink: *mut c_void,
    sink_fn: Option<sys::MupdfFontSinkFn>,
    name: *const c_char,
    ordering: c_int,
    serif: c_int,
) -> c_int {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let requested = unsafe { requested_name(name) };
        let found = requested
            .as_deref()
            .and_then(|name| find(name, false, false))
            .or_else(|| {
                cjk_families(ordering, serif != 0)
                    .iter()
                    .find_map(|family| find(family, false, false))
            });
        found.map_or(0, |font| unsafe { deliver(sink, sink_fn, &font) })
    }));
    outcome.unwrap_or_else(|_| {
        tracing::error!("system CJK font lookup panicked");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    unsafe extern "C" fn collect(sink: *mut c_void, data: *const u8, len: usize, index: c_int) {
        let out = unsafe { &mut *sink.cast::<(Vec<u8>, c_int)>() };
        out.0 = unsafe { std::slice::from_raw_parts(data, len) }.to_vec();
        out.1 = index;
    }

    #[test]
    fn test_unknown_family_is_not_found() {
        assert!(find("No Such Family 7f3a", false, false).is_none());
    }

    #[test]
    fn test_lookup_without_name_delivers_nothing() {
        let mut out: (Vec<u8>, c_int) = (Vec::new(), -1);
        let found = unsafe {
            load_font(ptr::from_mut(&mut out).cast(), Some(collect), ptr::null(), 0, 0, 0)
        };
        assert_eq!(found, 0);
        assert!(out.0.is_empty());
    }

    #[test]
    fn test_cjk_families_cover_every_collection() {
        for ordering in [sys::FZ_ADOBE_CNS, sys::FZ_ADOBE_GB, sys::FZ_ADOBE_JAPAN, sys::FZ_ADOBE_KOREA] {
            assert!(!cjk_families(ordering, true).is_empty());
            assert!(!cjk_families(ordering, false).is_empty());
        }
        assert!(cjk_families(42, false).is_empty());
    }

    #[test]
    fn test_delivered_bytes_are_copied_out() {
        let font = SystemFont {
            family: "Test".into(),
            data: Arc::new(vec![1, 2, 3]),
            index: 2,
        };
        let mut out = (Vec::new(), -1);
        let found = unsafe { deliver(ptr::from_mut(&mut out).cast(), Some(collect), &font) };
        assert_eq!(found, 1);
        assert_eq!(out, (vec![1, 2, 3], 2));
    }
}
