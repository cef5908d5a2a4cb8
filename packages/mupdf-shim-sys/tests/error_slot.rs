//! Exercises the error-slot protocol. Most paths fail before touching the
//! native context; the few that need one get a private, single-threaded
//! context from [`with_context`].

use std::ffi::{CStr, CString};
use std::os::raw::{c_int, c_void};
use std::ptr;

use mupdf_shim_sys::*;

/// Takes ownership of a payload and returns its kind and message.
fn take_error(err: *mut MupdfError) -> (i32, String) {
    assert!(!err.is_null(), "expected an error payload");
    unsafe {
        let kind = (*err).kind;
        let message = CStr::from_ptr((*err).message).to_string_lossy().into_owned();
        mupdf_drop_error(err);
        (kind, message)
    }
}

unsafe extern "C" fn no_lock(_user: *mut c_void, _lock: c_int) {}

/// Runs `f` on a fresh context used by this thread only.
fn with_context<R>(f: impl FnOnce(*mut FzContext) -> R) -> R {
    let ctx = unsafe { mupdf_new_base_context(ptr::null_mut(), Some(no_lock), Some(no_lock), 64 << 20) };
    assert!(!ctx.is_null());
    let out = f(ctx);
    unsafe { mupdf_drop_base_context(ctx) };
    out
}

fn assert_precondition(err: *mut MupdfError, expected: &str) {
    let (kind, message) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
    assert!(message.contains(expected), "unexpected message: {message}");
}

#[test]
fn test_convert_rejects_rotation_before_any_native_call() {
    let mut err = ptr::null_mut();
    let pdf = unsafe { mupdf_convert_to_pdf(ptr::null_mut(), ptr::null_mut(), 0, 0, 45, ptr::null_mut(), &mut err) };
    assert!(pdf.is_null());
    let (kind, message) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
    assert!(message.contains("rotation not multiple of 90"));
}

#[test]
fn test_search_rejects_non_positive_hit_max_and_zeroes_count() {
    let needle = CString::new("needle").unwrap();
    let mut err = ptr::null_mut();
    let mut count = 17;
    let hits = unsafe {
        mupdf_search_page(ptr::null_mut(), ptr::null_mut(), needle.as_ptr(), 0, &mut count, &mut err)
    };
    assert!(hits.is_null());
    assert_eq!(count, 0);
    let (kind, message) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
    assert!(message.contains("hit_max"));
}

#[test]
fn test_search_requires_needle() {
    let mut err = ptr::null_mut();
    let mut count = 0;
    let hits = unsafe {
        mupdf_search_stext_page(ptr::null_mut(), ptr::null_mut(), ptr::null(), 4, &mut count, &mut err)
    };
    assert!(hits.is_null());
    let (kind, _) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
}

#[test]
fn test_page_index_below_zero_is_precondition() {
    let mut err = ptr::null_mut();
    let page = unsafe { mupdf_load_page(ptr::null_mut(), ptr::null_mut(), -1, &mut err) };
    assert!(page.is_null());
    let (kind, message) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
    assert_eq!(message, "page index out of range");
}

#[test]
fn test_new_page_rotation_checked_first() {
    let mut err = ptr::null_mut();
    let mediabox = FzRect { x0: 0.0, y0: 0.0, x1: 100.0, y1: 100.0 };
    let page = unsafe { mupdf_pdf_new_page(ptr::null_mut(), ptr::null_mut(), -1, mediabox, 30, &mut err) };
    assert!(page.is_null());
    let (kind, message) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
    assert!(message.contains("rotation not multiple of 90"));
}

#[test]
fn test_annotation_color_component_count() {
    let mut err = ptr::null_mut();
    let color = [0.5f32; 2];
    unsafe { mupdf_pdf_set_annot_color(ptr::null_mut(), ptr::null_mut(), 2, color.as_ptr(), &mut err) };
    let (kind, _) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_PRECONDITION);
}

#[test]
fn test_payload_round_trips_kind_and_message() {
    let message = CString::new("cannot find object").unwrap();
    let err = unsafe { mupdf_new_error_from_str(MUPDF_ERROR_NOT_FOUND, message.as_ptr()) };
    let (kind, text) = take_error(err);
    assert_eq!(kind, MUPDF_ERROR_NOT_FOUND);
    assert_eq!(text, "cannot find object");
}

#[test]
fn test_drop_error_tolerates_null() {
    unsafe { mupdf_drop_error(ptr::null_mut()) };
    unsafe { mupdf_drop_str(ptr::null_mut()) };
}

#[test]
fn test_lock_table_fits() {
    let count = unsafe { mupdf_lock_count() };
    assert!(count > 0);
    assert!(count as usize <= MUPDF_LOCK_MAX);
}

#[test]
fn test_read_bytes_requires_buffer() {
    let mut err = ptr::null_mut();
    let mut out = [0u8; 4];
    let n = unsafe { mupdf_buffer_read_bytes(ptr::null_mut(), ptr::null_mut(), 0, out.as_mut_ptr(), 4, &mut err) };
    assert_eq!(n, 0);
    assert_precondition(err, "buffer required");
}

#[test]
fn test_read_bytes_checks_output_and_offset() {
    with_context(|ctx| unsafe {
        let data = b"abcd";
        let mut err = ptr::null_mut();
        let buf = mupdf_buffer_from_bytes(ctx, data.as_ptr(), data.len(), &mut err);
        assert!(err.is_null());

        let n = mupdf_buffer_read_bytes(ctx, buf, 0, ptr::null_mut(), 2, &mut err);
        assert_eq!(n, 0);
        assert_precondition(err, "output buffer missing");

        let mut out = [0u8; 4];
        err = ptr::null_mut();
        let n = mupdf_buffer_read_bytes(ctx, buf, 5, out.as_mut_ptr(), out.len(), &mut err);
        assert_eq!(n, 0);
        assert_precondition(err, "offset past end of buffer");

        // Reading right at the end is an empty read, not an error.
        err = ptr::null_mut();
        let n = mupdf_buffer_read_bytes(ctx, buf, 4, out.as_mut_ptr(), out.len(), &mut err);
        assert_eq!(n, 0);
        assert!(err.is_null());
        mupdf_drop_buffer(ctx, buf);
    });
}

#[test]
fn test_stroke_state_dash_bounds() {
    let mut err = ptr::null_mut();
    let info = MupdfStrokeInfo {
        dash_len: -1,
        ..MupdfStrokeInfo::default()
    };
    let stroke = unsafe { mupdf_new_stroke_state(ptr::null_mut(), &info, ptr::null(), &mut err) };
    assert!(stroke.is_null());
    assert_precondition(err, "dash length must not be negative");

    let info = MupdfStrokeInfo {
        dash_len: 2,
        ..MupdfStrokeInfo::default()
    };
    err = ptr::null_mut();
    let stroke = unsafe { mupdf_new_stroke_state(ptr::null_mut(), &info, ptr::null(), &mut err) };
    assert!(stroke.is_null());
    assert_precondition(err, "dash list shorter than dash length");
}

#[test]
fn test_page_rotation_must_be_quarter_turns() {
    let mut err = ptr::null_mut();
    unsafe { mupdf_pdf_page_set_rotation(ptr::null_mut(), ptr::null_mut(), 45, &mut err) };
    assert_precondition(err, "rotation not multiple of 90");
}

#[test]
fn test_write_object_requires_bound_object() {
    with_context(|ctx| unsafe {
        let mut err = ptr::null_mut();
        let obj = mupdf_pdf_new_int(ctx, 7, &mut err);
        assert!(err.is_null());
        mupdf_pdf_write_object(ctx, obj, obj, &mut err);
        assert_precondition(err, "object not bound to document");
        mupdf_pdf_drop_obj(ctx, obj);
    });
}

#[test]
fn test_annotation_type_out_of_range() {
    for subtype in [-1, 999] {
        let mut err = ptr::null_mut();
        let annot = unsafe { mupdf_pdf_create_annot(ptr::null_mut(), ptr::null_mut(), subtype, &mut err) };
        assert!(annot.is_null());
        assert_precondition(err, "unknown annotation type");
    }
}

#[test]
fn test_layout_dimensions_must_be_positive() {
    for (w, h, em) in [(0.0, 600.0, 11.0), (400.0, -1.0, 11.0), (400.0, 600.0, 0.0)] {
        let mut err = ptr::null_mut();
        unsafe { mupdf_layout_document(ptr::null_mut(), ptr::null_mut(), w, h, em, &mut err) };
        assert_precondition(err, "layout dimensions must be positive");
    }
}

#[test]
fn test_separation_index_out_of_range() {
    // No separations at all, so index 0 is already past the end.
    let mut err = ptr::null_mut();
    unsafe { mupdf_set_separation_state(ptr::null_mut(), ptr::null_mut(), 0, 0, &mut err) };
    assert_precondition(err, "separation index out of range");
}

#[test]
fn test_writer_page_needs_mediabox() {
    let mut err = ptr::null_mut();
    let empty = FzRect { x0: 0.0, y0: 0.0, x1: 0.0, y1: 0.0 };
    let dev = unsafe { mupdf_document_writer_begin_page(ptr::null_mut(), ptr::null_mut(), empty, &mut err) };
    assert!(dev.is_null());
    assert_precondition(err, "page mediabox must not be empty");
}

#[test]
fn test_rejected_writer_format_releases_buffer() {
    with_context(|ctx| unsafe {
        let mut err = ptr::null_mut();
        let buf = mupdf_new_buffer(ctx, 16, &mut err);
        assert!(err.is_null());
        assert_eq!(mupdf_buffer_refs(ctx, buf), 1);

        let format = CString::new("no-such-format").unwrap();
        let options = CString::new("").unwrap();
        let writer = mupdf_new_document_writer_with_buffer(ctx, buf, format.as_ptr(), options.as_ptr(), &mut err);
        assert!(writer.is_null());
        let (kind, _) = take_error(err);
        assert_ne!(kind, MUPDF_ERROR_PRECONDITION);
        assert_eq!(mupdf_buffer_refs(ctx, buf), 1);
        mupdf_drop_buffer(ctx, buf);
    });
}
