//! Raw declarations for the MuPDF error-slot shim.
//!
//! Every fallible function takes a trailing `*mut *mut MupdfError`. On return
//! either the result is meaningful and the slot is null, or the result is the
//! typed zero and the slot owns a payload to release with
//! [`mupdf_drop_error`]. Returned object pointers are owned references.

#![allow(non_camel_case_types)]

use libc::{c_char, c_float, c_int, c_uchar, c_void, ptrdiff_t, size_t};

pub const MUPDF_LOCK_MAX: usize = 4;

pub const MUPDF_ERROR_GENERIC: c_int = 1;
pub const MUPDF_ERROR_SYNTAX: c_int = 2;
pub const MUPDF_ERROR_RANGE: c_int = 3;
pub const MUPDF_ERROR_NOT_FOUND: c_int = 4;
pub const MUPDF_ERROR_FORMAT: c_int = 5;
pub const MUPDF_ERROR_CRYPTO: c_int = 6;
pub const MUPDF_ERROR_PASSWORD_REQUIRED: c_int = 7;
pub const MUPDF_ERROR_PASSWORD_FAILED: c_int = 8;
pub const MUPDF_ERROR_SYSTEM: c_int = 9;
pub const MUPDF_ERROR_MEMORY: c_int = 10;
pub const MUPDF_ERROR_ABORTED: c_int = 11;
pub const MUPDF_ERROR_PRECONDITION: c_int = 12;

pub const MUPDF_CS_GRAY: c_int = 0;
pub const MUPDF_CS_RGB: c_int = 1;
pub const MUPDF_CS_BGR: c_int = 2;
pub const MUPDF_CS_CMYK: c_int = 3;

pub const MUPDF_IMAGE_PNG: c_int = 0;
pub const MUPDF_IMAGE_PNM: c_int = 1;
pub const MUPDF_IMAGE_PAM: c_int = 2;
pub const MUPDF_IMAGE_PSD: c_int = 3;
pub const MUPDF_IMAGE_JPEG: c_int = 4;

pub const MUPDF_TEXT_PLAIN: c_int = 0;
pub const MUPDF_TEXT_HTML: c_int = 1;
pub const MUPDF_TEXT_XHTML: c_int = 2;
pub const MUPDF_TEXT_XML: c_int = 3;
pub const MUPDF_TEXT_JSON: c_int = 4;

pub const MUPDF_COOKIE_ABORT: c_int = 0;
pub const MUPDF_COOKIE_PROGRESS: c_int = 1;
pub const MUPDF_COOKIE_ERRORS: c_int = 2;
pub const MUPDF_COOKIE_INCOMPLETE: c_int = 3;

pub const MUPDF_DEST_FIT: c_int = 0;
pub const MUPDF_DEST_FIT_B: c_int = 1;
pub const MUPDF_DEST_FIT_H: c_int = 2;
pub const MUPDF_DEST_FIT_BH: c_int = 3;
pub const MUPDF_DEST_FIT_V: c_int = 4;
pub const MUPDF_DEST_FIT_BV: c_int = 5;
pub const MUPDF_DEST_FIT_R: c_int = 6;
pub const MUPDF_DEST_XYZ: c_int = 7;

pub const FZ_ADOBE_CNS: c_int = 0;
pub const FZ_ADOBE_GB: c_int = 1;
pub const FZ_ADOBE_JAPAN: c_int = 2;
pub const FZ_ADOBE_KOREA: c_int = 3;

pub const MUPDF_RUN_ALL: c_int = 0;
pub const MUPDF_RUN_CONTENTS: c_int = 1;
pub const MUPDF_RUN_ANNOTS: c_int = 2;
pub const MUPDF_RUN_WIDGETS: c_int = 3;

pub const MUPDF_ENCRYPT_KEEP: c_int = 0;
pub const MUPDF_ENCRYPT_NONE: c_int = 1;
pub const MUPDF_ENCRYPT_RC4_40: c_int = 2;
pub const MUPDF_ENCRYPT_RC4_128: c_int = 3;
pub const MUPDF_ENCRYPT_AES_128: c_int = 4;
pub const MUPDF_ENCRYPT_AES_256: c_int = 5;

pub enum FzContext {}
pub enum FzPixmap {}
pub enum FzFont {}
pub enum FzImage {}
pub enum FzPath {}
pub enum FzText {}
pub enum FzStrokeState {}
pub enum FzPage {}
pub enum FzDisplayList {}
pub enum FzDevice {}
pub enum FzBuffer {}
pub enum FzCookie {}
pub enum FzSeparations {}
pub enum FzLink {}
pub enum FzOutline {}
pub enum FzColorspace {}
pub enum FzStextPage {}
pub enum FzOutput {}
pub enum FzDocument {}
pub enum FzDocumentWriter {}
pub enum PdfDocument {}
pub enum PdfObj {}
pub enum PdfPage {}
pub enum PdfAnnot {}
pub enum PdfGraftMap {}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FzPoint {
    pub x: c_float,
    pub y: c_float,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FzRect {
    pub x0: c_float,
    pub y0: c_float,
    pub x1: c_float,
    pub y1: c_float,
}

impl Default for FzRect {
    fn default() -> FzRect {
        // The native empty rectangle: the infinite one inverted.
        FzRect {
            x0: 2_147_483_520.0,
            y0: 2_147_483_520.0,
            x1: -2_147_483_648.0,
            y1: -2_147_483_648.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FzIRect {
    pub x0: c_int,
    pub y0: c_int,
    pub x1: c_int,
    pub y1: c_int,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FzMatrix {
    pub a: c_float,
    pub b: c_float,
    pub c: c_float,
    pub d: c_float,
    pub e: c_float,
    pub f: c_float,
}

impl Default for FzMatrix {
    fn default() -> FzMatrix {
        FzMatrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FzQuad {
    pub ul: FzPoint,
    pub ur: FzPoint,
    pub ll: FzPoint,
    pub lr: FzPoint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FzLocation {
    pub chapter: c_int,
    pub page: c_int,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MupdfLinkDest {
    pub loc: FzLocation,
    pub kind: c_int,
    pub x: c_float,
    pub y: c_float,
    pub w: c_float,
    pub h: c_float,
    pub zoom: c_float,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FzColorParams {
    pub ri: u8,
    pub bp: u8,
    pub op: u8,
    pub opm: u8,
}

#[repr(C)]
#[derive(Debug)]
pub struct MupdfError {
    pub kind: c_int,
    pub message: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct MupdfStrokeInfo {
    pub start_cap: c_int,
    pub dash_cap: c_int,
    pub end_cap: c_int,
    pub line_join: c_int,
    pub line_width: c_float,
    pub miter_limit: c_float,
    pub dash_phase: c_float,
    pub dash_len: c_int,
}

#[repr(C)]
pub struct MupdfPathWalker {
    pub moveto: Option<unsafe extern "C" fn(arg: *mut c_void, x: c_float, y: c_float)>,
    pub lineto: Option<unsafe extern "C" fn(arg: *mut c_void, x: c_float, y: c_float)>,
    pub curveto: Option<
        unsafe extern "C" fn(
            arg: *mut c_void,
            x1: c_float,
            y1: c_float,
            x2: c_float,
            y2: c_float,
            x3: c_float,
            y3: c_float,
        ),
    >,
    pub closepath: Option<unsafe extern "C" fn(arg: *mut c_void)>,
}

/// Host-implemented device. A `None` entry keeps the native no-op; a nonzero
/// return fails the drawing call in progress.
#[repr(C)]
pub struct MupdfDeviceCallbacks {
    pub user: *mut c_void,
    pub close_device: Option<unsafe extern "C" fn(user: *mut c_void) -> c_int>,
    pub fill_path: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            path: *mut FzPath,
            even_odd: c_int,
            ctm: FzMatrix,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            alpha: c_float,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub stroke_path: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            path: *mut FzPath,
            stroke: *mut FzStrokeState,
            ctm: FzMatrix,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            alpha: c_float,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub clip_path: Option<
        unsafe extern "C" fn(user: *mut c_void, path: *mut FzPath, even_odd: c_int, ctm: FzMatrix, scissor: FzRect) -> c_int,
    >,
    pub clip_stroke_path: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            path: *mut FzPath,
            stroke: *mut FzStrokeState,
            ctm: FzMatrix,
            scissor: FzRect,
        ) -> c_int,
    >,
    pub fill_text: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            text: *mut FzText,
            ctm: FzMatrix,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            alpha: c_float,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub stroke_text: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            text: *mut FzText,
            stroke: *mut FzStrokeState,
            ctm: FzMatrix,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            alpha: c_float,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub clip_text: Option<unsafe extern "C" fn(user: *mut c_void, text: *mut FzText, ctm: FzMatrix, scissor: FzRect) -> c_int>,
    pub clip_stroke_text: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            text: *mut FzText,
            stroke: *mut FzStrokeState,
            ctm: FzMatrix,
            scissor: FzRect,
        ) -> c_int,
    >,
    pub ignore_text: Option<unsafe extern "C" fn(user: *mut c_void, text: *mut FzText, ctm: FzMatrix) -> c_int>,
    pub fill_image: Option<
        unsafe extern "C" fn(user: *mut c_void, image: *mut FzImage, ctm: FzMatrix, alpha: c_float, cp: FzColorParams) -> c_int,
    >,
    pub fill_image_mask: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            image: *mut FzImage,
            ctm: FzMatrix,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            alpha: c_float,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub clip_image_mask: Option<
        unsafe extern "C" fn(user: *mut c_void, image: *mut FzImage, ctm: FzMatrix, scissor: FzRect) -> c_int,
    >,
    pub pop_clip: Option<unsafe extern "C" fn(user: *mut c_void) -> c_int>,
    pub begin_mask: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            area: FzRect,
            luminosity: c_int,
            cs: *mut FzColorspace,
            color: *const c_float,
            n_color: c_int,
            cp: FzColorParams,
        ) -> c_int,
    >,
    pub end_mask: Option<unsafe extern "C" fn(user: *mut c_void) -> c_int>,
    pub begin_group: Option<
        unsafe extern "C" fn(
            user: *mut c_void,
            area: FzRect,
            cs: *mut FzColorspace,
            isolated: c_int,
            knockout: c_int,
            blendmode: c_int,
            alpha: c_float,
        ) -> c_int,
    >,
    pub end_group: Option<unsafe extern "C" fn(user: *mut c_void) -> c_int>,
    pub begin_layer: Option<unsafe extern "C" fn(user: *mut c_void, name: *const c_char) -> c_int>,
    pub end_layer: Option<unsafe extern "C" fn(user: *mut c_void) -> c_int>,
}

impl Default for MupdfDeviceCallbacks {
    fn default() -> Self {
        Self {
            user: std::ptr::null_mut(),
            close_device: None,
            fill_path: None,
            stroke_path: None,
            clip_path: None,
            clip_stroke_path: None,
            fill_text: None,
            stroke_text: None,
            clip_text: None,
            clip_stroke_text: None,
            ignore_text: None,
            fill_image: None,
            fill_image_mask: None,
            clip_image_mask: None,
            pop_clip: None,
            begin_mask: None,
            end_mask: None,
            begin_group: None,
            end_group: None,
            begin_layer: None,
            end_layer: None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct MupdfStextOptions {
    pub flags: c_int,
    pub scale: c_float,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct MupdfWriteOptions {
    pub incremental: c_int,
    pub pretty: c_int,
    pub ascii: c_int,
    pub compress: c_int,
    pub compress_images: c_int,
    pub compress_fonts: c_int,
    pub decompress: c_int,
    pub garbage: c_int,
    pub linear: c_int,
    pub clean: c_int,
    pub sanitize: c_int,
    pub appearance: c_int,
    pub encryption: c_int,
    pub permissions: c_int,
    pub owner_password: *const c_char,
    pub user_password: *const c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct MupdfRedactOptions {
    pub black_boxes: c_int,
    pub image_method: c_int,
}

pub type MupdfLockFn = unsafe extern "C" fn(user: *mut c_void, lock: c_int);
pub type MupdfDiagnosticFn = unsafe extern "C" fn(user: *mut c_void, message: *const c_char);
pub type MupdfFontSinkFn = unsafe extern "C" fn(sink: *mut c_void, data: *const c_uchar, len: size_t, index: c_int);
pub type MupdfSystemFontFn = unsafe extern "C" fn(
    sink: *mut c_void,
    deliver: Option<MupdfFontSinkFn>,
    name: *const c_char,
    bold: c_int,
    italic: c_int,
    exact: c_int,
) -> c_int;
pub type MupdfSystemCjkFontFn = unsafe extern "C" fn(
    sink: *mut c_void,
    deliver: Option<MupdfFontSinkFn>,
    name: *const c_char,
    ordering: c_int,
    serif: c_int,
) -> c_int;

/// Trailing out-parameter of every fallible shim call.
pub type ErrorSlot = *mut *mut MupdfError;

unsafe extern "C" {
    // Errors
    pub fn mupdf_new_error_from_str(kind: c_int, message: *const c_char) -> *mut MupdfError;
    pub fn mupdf_drop_error(err: *mut MupdfError);
    pub fn mupdf_drop_str(s: *mut c_char);

    // Context
    pub fn mupdf_lock_count() -> c_int;
    pub fn mupdf_new_base_context(
        lock_user: *mut c_void,
        lock: Option<MupdfLockFn>,
        unlock: Option<MupdfLockFn>,
        store_size: size_t,
    ) -> *mut FzContext;
    pub fn mupdf_drop_base_context(ctx: *mut FzContext);
    pub fn mupdf_clone_context(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut FzContext;
    pub fn mupdf_drop_context(ctx: *mut FzContext);
    pub fn mupdf_set_diagnostic_callbacks(
        ctx: *mut FzContext,
        user: *mut c_void,
        warn: Option<MupdfDiagnosticFn>,
        error: Option<MupdfDiagnosticFn>,
    );
    pub fn mupdf_set_aa_level(ctx: *mut FzContext, bits: c_int);
    pub fn mupdf_aa_level(ctx: *mut FzContext) -> c_int;
    pub fn mupdf_set_icc(ctx: *mut FzContext, enabled: c_int);
    pub fn mupdf_set_user_css(ctx: *mut FzContext, css: *const c_char, errptr: ErrorSlot);
    pub fn mupdf_empty_store(ctx: *mut FzContext);

    // Colorspace
    pub fn mupdf_device_colorspace(ctx: *mut FzContext, which: c_int) -> *mut FzColorspace;
    pub fn mupdf_keep_colorspace(ctx: *mut FzContext, cs: *mut FzColorspace) -> *mut FzColorspace;
    pub fn mupdf_drop_colorspace(ctx: *mut FzContext, cs: *mut FzColorspace);
    pub fn mupdf_colorspace_n(ctx: *mut FzContext, cs: *mut FzColorspace) -> c_int;
    pub fn mupdf_colorspace_type(ctx: *mut FzContext, cs: *mut FzColorspace) -> c_int;
    pub fn mupdf_colorspace_name(ctx: *mut FzContext, cs: *mut FzColorspace) -> *const c_char;
    pub fn mupdf_convert_color(
        ctx: *mut FzContext,
        from: *mut FzColorspace,
        src: *const c_float,
        n_src: c_int,
        to: *mut FzColorspace,
        dst: *mut c_float,
        n_dst: c_int,
        params: FzColorParams,
        errptr: ErrorSlot,
    );

    // Buffer
    pub fn mupdf_new_buffer(ctx: *mut FzContext, capacity: size_t, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_buffer_from_bytes(ctx: *mut FzContext, data: *const c_uchar, len: size_t, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_buffer_from_str(ctx: *mut FzContext, s: *const c_char, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_buffer_from_base64(ctx: *mut FzContext, s: *const c_char, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_keep_buffer(ctx: *mut FzContext, buf: *mut FzBuffer) -> *mut FzBuffer;
    pub fn mupdf_drop_buffer(ctx: *mut FzContext, buf: *mut FzBuffer);
    pub fn mupdf_buffer_len(ctx: *mut FzContext, buf: *mut FzBuffer) -> size_t;
    pub fn mupdf_buffer_data(ctx: *mut FzContext, buf: *mut FzBuffer) -> *const c_uchar;
    pub fn mupdf_buffer_read_bytes(
        ctx: *mut FzContext,
        buf: *mut FzBuffer,
        at: size_t,
        output: *mut c_uchar,
        output_len: size_t,
        errptr: ErrorSlot,
    ) -> size_t;
    pub fn mupdf_buffer_refs(ctx: *mut FzContext, buf: *mut FzBuffer) -> c_int;
    pub fn mupdf_buffer_write_bytes(ctx: *mut FzContext, buf: *mut FzBuffer, bytes: *const c_uchar, len: size_t, errptr: ErrorSlot);
    pub fn mupdf_buffer_write_base64(ctx: *mut FzContext, buf: *mut FzBuffer, bytes: *const c_uchar, len: size_t, errptr: ErrorSlot);
    pub fn mupdf_new_output_with_buffer(ctx: *mut FzContext, buf: *mut FzBuffer, errptr: ErrorSlot) -> *mut FzOutput;
    pub fn mupdf_close_output(ctx: *mut FzContext, out: *mut FzOutput, errptr: ErrorSlot);
    pub fn mupdf_drop_output(ctx: *mut FzContext, out: *mut FzOutput);

    // Pixmap
    pub fn mupdf_new_pixmap(
        ctx: *mut FzContext,
        cs: *mut FzColorspace,
        x: c_int,
        y: c_int,
        w: c_int,
        h: c_int,
        alpha: c_int,
        errptr: ErrorSlot,
    ) -> *mut FzPixmap;
    pub fn mupdf_clone_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, errptr: ErrorSlot) -> *mut FzPixmap;
    pub fn mupdf_keep_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap) -> *mut FzPixmap;
    pub fn mupdf_pixmap_refs(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_drop_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap);
    pub fn mupdf_pixmap_x(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_y(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_width(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_height(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_n(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_alpha(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_stride(ctx: *mut FzContext, pix: *mut FzPixmap) -> ptrdiff_t;
    pub fn mupdf_pixmap_samples(ctx: *mut FzContext, pix: *mut FzPixmap) -> *mut c_uchar;
    pub fn mupdf_pixmap_colorspace(ctx: *mut FzContext, pix: *mut FzPixmap) -> *mut FzColorspace;
    pub fn mupdf_pixmap_xres(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_yres(ctx: *mut FzContext, pix: *mut FzPixmap) -> c_int;
    pub fn mupdf_pixmap_set_resolution(ctx: *mut FzContext, pix: *mut FzPixmap, xres: c_int, yres: c_int);
    pub fn mupdf_clear_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, errptr: ErrorSlot);
    pub fn mupdf_clear_pixmap_with_value(ctx: *mut FzContext, pix: *mut FzPixmap, value: c_int, errptr: ErrorSlot);
    pub fn mupdf_invert_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, errptr: ErrorSlot);
    pub fn mupdf_gamma_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, gamma: c_float, errptr: ErrorSlot);
    pub fn mupdf_tint_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, black: c_int, white: c_int, errptr: ErrorSlot);
    pub fn mupdf_pixmap_to_buffer(ctx: *mut FzContext, pix: *mut FzPixmap, format: c_int, quality: c_int, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_save_pixmap_as(
        ctx: *mut FzContext,
        pix: *mut FzPixmap,
        filename: *const c_char,
        format: c_int,
        quality: c_int,
        errptr: ErrorSlot,
    );

    // Font
    pub fn mupdf_new_font(ctx: *mut FzContext, name: *const c_char, index: c_int, errptr: ErrorSlot) -> *mut FzFont;
    pub fn mupdf_install_system_fonts(
        ctx: *mut FzContext,
        font: Option<MupdfSystemFontFn>,
        cjk: Option<MupdfSystemCjkFontFn>,
    );
    pub fn mupdf_new_font_from_buffer(
        ctx: *mut FzContext,
        name: *const c_char,
        index: c_int,
        buffer: *mut FzBuffer,
        errptr: ErrorSlot,
    ) -> *mut FzFont;
    pub fn mupdf_keep_font(ctx: *mut FzContext, font: *mut FzFont) -> *mut FzFont;
    pub fn mupdf_drop_font(ctx: *mut FzContext, font: *mut FzFont);
    pub fn mupdf_font_name(ctx: *mut FzContext, font: *mut FzFont) -> *const c_char;
    pub fn mupdf_font_is_bold(ctx: *mut FzContext, font: *mut FzFont) -> c_int;
    pub fn mupdf_font_is_italic(ctx: *mut FzContext, font: *mut FzFont) -> c_int;
    pub fn mupdf_font_is_serif(ctx: *mut FzContext, font: *mut FzFont) -> c_int;
    pub fn mupdf_font_is_monospaced(ctx: *mut FzContext, font: *mut FzFont) -> c_int;
    pub fn mupdf_encode_character(ctx: *mut FzContext, font: *mut FzFont, unicode: c_int, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_advance_glyph(ctx: *mut FzContext, font: *mut FzFont, glyph: c_int, wmode: c_int, errptr: ErrorSlot) -> c_float;
    pub fn mupdf_outline_glyph(ctx: *mut FzContext, font: *mut FzFont, glyph: c_int, ctm: FzMatrix, errptr: ErrorSlot) -> *mut FzPath;

    // Image
    pub fn mupdf_new_image_from_pixmap(ctx: *mut FzContext, pix: *mut FzPixmap, errptr: ErrorSlot) -> *mut FzImage;
    pub fn mupdf_new_image_from_file(ctx: *mut FzContext, filename: *const c_char, errptr: ErrorSlot) -> *mut FzImage;
    pub fn mupdf_new_image_from_buffer(ctx: *mut FzContext, buf: *mut FzBuffer, errptr: ErrorSlot) -> *mut FzImage;
    pub fn mupdf_new_image_from_display_list(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        w: c_float,
        h: c_float,
        errptr: ErrorSlot,
    ) -> *mut FzImage;
    pub fn mupdf_keep_image(ctx: *mut FzContext, image: *mut FzImage) -> *mut FzImage;
    pub fn mupdf_drop_image(ctx: *mut FzContext, image: *mut FzImage);
    pub fn mupdf_image_width(ctx: *mut FzContext, image: *mut FzImage) -> c_int;
    pub fn mupdf_image_height(ctx: *mut FzContext, image: *mut FzImage) -> c_int;
    pub fn mupdf_image_xres(ctx: *mut FzContext, image: *mut FzImage) -> c_int;
    pub fn mupdf_image_yres(ctx: *mut FzContext, image: *mut FzImage) -> c_int;
    pub fn mupdf_image_colorspace(ctx: *mut FzContext, image: *mut FzImage) -> *mut FzColorspace;
    pub fn mupdf_get_pixmap_from_image(ctx: *mut FzContext, image: *mut FzImage, errptr: ErrorSlot) -> *mut FzPixmap;

    // Stroke state
    pub fn mupdf_default_stroke_state(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut FzStrokeState;
    pub fn mupdf_new_stroke_state(
        ctx: *mut FzContext,
        info: *const MupdfStrokeInfo,
        dash: *const c_float,
        errptr: ErrorSlot,
    ) -> *mut FzStrokeState;
    pub fn mupdf_keep_stroke_state(ctx: *mut FzContext, stroke: *mut FzStrokeState) -> *mut FzStrokeState;
    pub fn mupdf_drop_stroke_state(ctx: *mut FzContext, stroke: *mut FzStrokeState);
    pub fn mupdf_stroke_state_info(ctx: *mut FzContext, stroke: *mut FzStrokeState, info: *mut MupdfStrokeInfo);
    pub fn mupdf_stroke_state_dashes(ctx: *mut FzContext, stroke: *mut FzStrokeState, out: *mut c_float, cap: c_int) -> c_int;

    // Path
    pub fn mupdf_new_path(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut FzPath;
    pub fn mupdf_clone_path(ctx: *mut FzContext, path: *mut FzPath, errptr: ErrorSlot) -> *mut FzPath;
    pub fn mupdf_keep_path(ctx: *mut FzContext, path: *mut FzPath) -> *mut FzPath;
    pub fn mupdf_drop_path(ctx: *mut FzContext, path: *mut FzPath);
    pub fn mupdf_moveto(ctx: *mut FzContext, path: *mut FzPath, x: c_float, y: c_float, errptr: ErrorSlot);
    pub fn mupdf_lineto(ctx: *mut FzContext, path: *mut FzPath, x: c_float, y: c_float, errptr: ErrorSlot);
    pub fn mupdf_curveto(
        ctx: *mut FzContext,
        path: *mut FzPath,
        x1: c_float,
        y1: c_float,
        x2: c_float,
        y2: c_float,
        x3: c_float,
        y3: c_float,
        errptr: ErrorSlot,
    );
    pub fn mupdf_curvetov(ctx: *mut FzContext, path: *mut FzPath, x2: c_float, y2: c_float, x3: c_float, y3: c_float, errptr: ErrorSlot);
    pub fn mupdf_curvetoy(ctx: *mut FzContext, path: *mut FzPath, x1: c_float, y1: c_float, x3: c_float, y3: c_float, errptr: ErrorSlot);
    pub fn mupdf_closepath(ctx: *mut FzContext, path: *mut FzPath, errptr: ErrorSlot);
    pub fn mupdf_rectto(ctx: *mut FzContext, path: *mut FzPath, x0: c_float, y0: c_float, x1: c_float, y1: c_float, errptr: ErrorSlot);
    pub fn mupdf_currentpoint(ctx: *mut FzContext, path: *mut FzPath, errptr: ErrorSlot) -> FzPoint;
    pub fn mupdf_transform_path(ctx: *mut FzContext, path: *mut FzPath, ctm: FzMatrix, errptr: ErrorSlot);
    pub fn mupdf_trim_path(ctx: *mut FzContext, path: *mut FzPath, errptr: ErrorSlot);
    pub fn mupdf_bound_path(
        ctx: *mut FzContext,
        path: *mut FzPath,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        errptr: ErrorSlot,
    ) -> FzRect;
    pub fn mupdf_walk_path(
        ctx: *mut FzContext,
        path: *mut FzPath,
        walker: *const MupdfPathWalker,
        arg: *mut c_void,
        errptr: ErrorSlot,
    );

    // Text
    pub fn mupdf_new_text(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut FzText;
    pub fn mupdf_keep_text(ctx: *mut FzContext, text: *mut FzText) -> *mut FzText;
    pub fn mupdf_drop_text(ctx: *mut FzContext, text: *mut FzText);
    pub fn mupdf_show_glyph(
        ctx: *mut FzContext,
        text: *mut FzText,
        font: *mut FzFont,
        trm: FzMatrix,
        glyph: c_int,
        unicode: c_int,
        wmode: c_int,
        errptr: ErrorSlot,
    );
    pub fn mupdf_show_string(
        ctx: *mut FzContext,
        text: *mut FzText,
        font: *mut FzFont,
        trm: FzMatrix,
        s: *const c_char,
        wmode: c_int,
        errptr: ErrorSlot,
    ) -> FzMatrix;
    pub fn mupdf_bound_text(
        ctx: *mut FzContext,
        text: *mut FzText,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        errptr: ErrorSlot,
    ) -> FzRect;

    // Cookie
    pub fn mupdf_new_cookie(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut FzCookie;
    pub fn mupdf_drop_cookie(ctx: *mut FzContext, cookie: *mut FzCookie);
    pub fn mupdf_cookie_field(cookie: *mut FzCookie, field: c_int) -> *mut c_int;
    pub fn mupdf_cookie_progress_max_field(cookie: *mut FzCookie) -> *mut size_t;
    pub fn mupdf_cookie_reset(cookie: *mut FzCookie);

    // Structured text
    pub fn mupdf_new_stext_page(ctx: *mut FzContext, mediabox: FzRect, errptr: ErrorSlot) -> *mut FzStextPage;
    pub fn mupdf_drop_stext_page(ctx: *mut FzContext, page: *mut FzStextPage);
    pub fn mupdf_stext_page_bound(ctx: *mut FzContext, page: *mut FzStextPage) -> FzRect;
    pub fn mupdf_stext_page_to_buffer(ctx: *mut FzContext, page: *mut FzStextPage, format: c_int, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_search_stext_page(
        ctx: *mut FzContext,
        page: *mut FzStextPage,
        needle: *const c_char,
        hit_max: c_int,
        hit_count: *mut c_int,
        errptr: ErrorSlot,
    ) -> *mut FzQuad;
    pub fn mupdf_drop_quads(ctx: *mut FzContext, quads: *mut FzQuad);

    // Display list
    pub fn mupdf_new_display_list(ctx: *mut FzContext, mediabox: FzRect, errptr: ErrorSlot) -> *mut FzDisplayList;
    pub fn mupdf_keep_display_list(ctx: *mut FzContext, list: *mut FzDisplayList) -> *mut FzDisplayList;
    pub fn mupdf_drop_display_list(ctx: *mut FzContext, list: *mut FzDisplayList);
    pub fn mupdf_bound_display_list(ctx: *mut FzContext, list: *mut FzDisplayList, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_run_display_list(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        dev: *mut FzDevice,
        ctm: FzMatrix,
        area: FzRect,
        cookie: *mut FzCookie,
        errptr: ErrorSlot,
    );
    pub fn mupdf_display_list_to_pixmap(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        alpha: c_int,
        errptr: ErrorSlot,
    ) -> *mut FzPixmap;
    pub fn mupdf_display_list_to_stext_page(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        options: *const MupdfStextOptions,
        errptr: ErrorSlot,
    ) -> *mut FzStextPage;
    pub fn mupdf_display_list_to_svg(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        ctm: FzMatrix,
        cookie: *mut FzCookie,
        errptr: ErrorSlot,
    ) -> *mut FzBuffer;
    pub fn mupdf_display_list_to_text_format(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        format: c_int,
        options: *const MupdfStextOptions,
        errptr: ErrorSlot,
    ) -> *mut FzBuffer;
    pub fn mupdf_search_display_list(
        ctx: *mut FzContext,
        list: *mut FzDisplayList,
        needle: *const c_char,
        hit_max: c_int,
        hit_count: *mut c_int,
        errptr: ErrorSlot,
    ) -> *mut FzQuad;

    // Device
    pub fn mupdf_new_draw_device(ctx: *mut FzContext, pix: *mut FzPixmap, ctm: FzMatrix, errptr: ErrorSlot) -> *mut FzDevice;
    pub fn mupdf_new_list_device(ctx: *mut FzContext, list: *mut FzDisplayList, errptr: ErrorSlot) -> *mut FzDevice;
    pub fn mupdf_new_stext_device(
        ctx: *mut FzContext,
        page: *mut FzStextPage,
        options: *const MupdfStextOptions,
        errptr: ErrorSlot,
    ) -> *mut FzDevice;
    pub fn mupdf_new_bbox_device(ctx: *mut FzContext, rect: *mut FzRect, errptr: ErrorSlot) -> *mut FzDevice;
    pub fn mupdf_keep_device(ctx: *mut FzContext, dev: *mut FzDevice) -> *mut FzDevice;
    pub fn mupdf_drop_device(ctx: *mut FzContext, dev: *mut FzDevice);
    pub fn mupdf_close_device(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_fill_path(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        path: *mut FzPath,
        even_odd: c_int,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_stroke_path(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        path: *mut FzPath,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_clip_path(ctx: *mut FzContext, dev: *mut FzDevice, path: *mut FzPath, even_odd: c_int, ctm: FzMatrix, errptr: ErrorSlot);
    pub fn mupdf_clip_stroke_path(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        path: *mut FzPath,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        errptr: ErrorSlot,
    );
    pub fn mupdf_fill_text(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        text: *mut FzText,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_stroke_text(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        text: *mut FzText,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_clip_text(ctx: *mut FzContext, dev: *mut FzDevice, text: *mut FzText, ctm: FzMatrix, errptr: ErrorSlot);
    pub fn mupdf_clip_stroke_text(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        text: *mut FzText,
        stroke: *mut FzStrokeState,
        ctm: FzMatrix,
        errptr: ErrorSlot,
    );
    pub fn mupdf_ignore_text(ctx: *mut FzContext, dev: *mut FzDevice, text: *mut FzText, ctm: FzMatrix, errptr: ErrorSlot);
    pub fn mupdf_fill_image(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        image: *mut FzImage,
        ctm: FzMatrix,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_fill_image_mask(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        image: *mut FzImage,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        alpha: c_float,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_clip_image_mask(ctx: *mut FzContext, dev: *mut FzDevice, image: *mut FzImage, ctm: FzMatrix, errptr: ErrorSlot);
    pub fn mupdf_pop_clip(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_begin_mask(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        area: FzRect,
        luminosity: c_int,
        cs: *mut FzColorspace,
        color: *const c_float,
        n_color: c_int,
        cp: FzColorParams,
        errptr: ErrorSlot,
    );
    pub fn mupdf_end_mask(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_begin_group(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        area: FzRect,
        cs: *mut FzColorspace,
        isolated: c_int,
        knockout: c_int,
        blendmode: c_int,
        alpha: c_float,
        errptr: ErrorSlot,
    );
    pub fn mupdf_end_group(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_begin_tile(
        ctx: *mut FzContext,
        dev: *mut FzDevice,
        area: FzRect,
        view: FzRect,
        xstep: c_float,
        ystep: c_float,
        ctm: FzMatrix,
        errptr: ErrorSlot,
    );
    pub fn mupdf_end_tile(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_begin_layer(ctx: *mut FzContext, dev: *mut FzDevice, name: *const c_char, errptr: ErrorSlot);
    pub fn mupdf_end_layer(ctx: *mut FzContext, dev: *mut FzDevice, errptr: ErrorSlot);
    pub fn mupdf_new_custom_device(
        ctx: *mut FzContext,
        callbacks: *const MupdfDeviceCallbacks,
        errptr: ErrorSlot,
    ) -> *mut FzDevice;

    // Page
    pub fn mupdf_keep_page(ctx: *mut FzContext, page: *mut FzPage) -> *mut FzPage;
    pub fn mupdf_drop_page(ctx: *mut FzContext, page: *mut FzPage);
    pub fn mupdf_bound_page(ctx: *mut FzContext, page: *mut FzPage, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_page_to_pixmap(
        ctx: *mut FzContext,
        page: *mut FzPage,
        ctm: FzMatrix,
        cs: *mut FzColorspace,
        alpha: c_int,
        show_extras: c_int,
        errptr: ErrorSlot,
    ) -> *mut FzPixmap;
    pub fn mupdf_page_to_svg(ctx: *mut FzContext, page: *mut FzPage, ctm: FzMatrix, cookie: *mut FzCookie, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_page_to_display_list(ctx: *mut FzContext, page: *mut FzPage, annots: c_int, errptr: ErrorSlot) -> *mut FzDisplayList;
    pub fn mupdf_page_to_stext_page(
        ctx: *mut FzContext,
        page: *mut FzPage,
        options: *const MupdfStextOptions,
        errptr: ErrorSlot,
    ) -> *mut FzStextPage;
    pub fn mupdf_page_to_text_format(
        ctx: *mut FzContext,
        page: *mut FzPage,
        format: c_int,
        options: *const MupdfStextOptions,
        errptr: ErrorSlot,
    ) -> *mut FzBuffer;
    pub fn mupdf_run_page(
        ctx: *mut FzContext,
        page: *mut FzPage,
        mode: c_int,
        dev: *mut FzDevice,
        ctm: FzMatrix,
        cookie: *mut FzCookie,
        errptr: ErrorSlot,
    );
    pub fn mupdf_search_page(
        ctx: *mut FzContext,
        page: *mut FzPage,
        needle: *const c_char,
        hit_max: c_int,
        hit_count: *mut c_int,
        errptr: ErrorSlot,
    ) -> *mut FzQuad;
    pub fn mupdf_load_links(ctx: *mut FzContext, page: *mut FzPage, errptr: ErrorSlot) -> *mut FzLink;
    pub fn mupdf_drop_link(ctx: *mut FzContext, link: *mut FzLink);
    pub fn mupdf_link_next(link: *mut FzLink) -> *mut FzLink;
    pub fn mupdf_link_rect(link: *mut FzLink) -> FzRect;
    pub fn mupdf_link_uri(link: *mut FzLink) -> *const c_char;
    pub fn mupdf_page_separations(ctx: *mut FzContext, page: *mut FzPage, errptr: ErrorSlot) -> *mut FzSeparations;
    pub fn mupdf_keep_separations(ctx: *mut FzContext, seps: *mut FzSeparations) -> *mut FzSeparations;
    pub fn mupdf_drop_separations(ctx: *mut FzContext, seps: *mut FzSeparations);
    pub fn mupdf_count_separations(ctx: *mut FzContext, seps: *mut FzSeparations) -> c_int;
    pub fn mupdf_separation_name(ctx: *mut FzContext, seps: *mut FzSeparations, i: c_int) -> *const c_char;
    pub fn mupdf_separation_state(ctx: *mut FzContext, seps: *mut FzSeparations, i: c_int) -> c_int;
    pub fn mupdf_set_separation_state(ctx: *mut FzContext, seps: *mut FzSeparations, i: c_int, state: c_int, errptr: ErrorSlot);

    // Document
    pub fn mupdf_open_document(ctx: *mut FzContext, filename: *const c_char, errptr: ErrorSlot) -> *mut FzDocument;
    pub fn mupdf_open_document_with_password(
        ctx: *mut FzContext,
        filename: *const c_char,
        password: *const c_char,
        errptr: ErrorSlot,
    ) -> *mut FzDocument;
    pub fn mupdf_open_document_from_bytes(
        ctx: *mut FzContext,
        bytes: *mut FzBuffer,
        magic: *const c_char,
        errptr: ErrorSlot,
    ) -> *mut FzDocument;
    pub fn mupdf_recognize_document(ctx: *mut FzContext, magic: *const c_char, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_keep_document(ctx: *mut FzContext, doc: *mut FzDocument) -> *mut FzDocument;
    pub fn mupdf_drop_document(ctx: *mut FzContext, doc: *mut FzDocument);
    pub fn mupdf_needs_password(ctx: *mut FzContext, doc: *mut FzDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_authenticate_password(ctx: *mut FzContext, doc: *mut FzDocument, password: *const c_char, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_document_page_count(ctx: *mut FzContext, doc: *mut FzDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_load_page(ctx: *mut FzContext, doc: *mut FzDocument, page_no: c_int, errptr: ErrorSlot) -> *mut FzPage;
    pub fn mupdf_lookup_metadata(ctx: *mut FzContext, doc: *mut FzDocument, key: *const c_char, errptr: ErrorSlot) -> *mut c_char;
    pub fn mupdf_set_metadata(
        ctx: *mut FzContext,
        doc: *mut FzDocument,
        key: *const c_char,
        value: *const c_char,
        errptr: ErrorSlot,
    );
    pub fn mupdf_is_document_reflowable(ctx: *mut FzContext, doc: *mut FzDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_layout_document(ctx: *mut FzContext, doc: *mut FzDocument, w: c_float, h: c_float, em: c_float, errptr: ErrorSlot);
    pub fn mupdf_resolve_link(
        ctx: *mut FzContext,
        doc: *mut FzDocument,
        uri: *const c_char,
        xp: *mut c_float,
        yp: *mut c_float,
        errptr: ErrorSlot,
    ) -> FzLocation;
    pub fn mupdf_resolve_link_dest(
        ctx: *mut FzContext,
        doc: *mut FzDocument,
        uri: *const c_char,
        errptr: ErrorSlot,
    ) -> MupdfLinkDest;
    pub fn mupdf_document_refs(ctx: *mut FzContext, doc: *mut FzDocument) -> c_int;
    pub fn mupdf_document_output_intent(ctx: *mut FzContext, doc: *mut FzDocument, errptr: ErrorSlot) -> *mut FzColorspace;
    pub fn mupdf_convert_to_pdf(
        ctx: *mut FzContext,
        doc: *mut FzDocument,
        from: c_int,
        to: c_int,
        rotate: c_int,
        cookie: *mut FzCookie,
        errptr: ErrorSlot,
    ) -> *mut PdfDocument;
    pub fn mupdf_document_as_pdf(ctx: *mut FzContext, doc: *mut FzDocument) -> *mut PdfDocument;
    pub fn mupdf_load_outline(ctx: *mut FzContext, doc: *mut FzDocument, errptr: ErrorSlot) -> *mut FzOutline;
    pub fn mupdf_drop_outline(ctx: *mut FzContext, outline: *mut FzOutline);
    pub fn mupdf_outline_next(outline: *mut FzOutline) -> *mut FzOutline;
    pub fn mupdf_outline_down(outline: *mut FzOutline) -> *mut FzOutline;
    pub fn mupdf_outline_title(outline: *mut FzOutline) -> *const c_char;
    pub fn mupdf_outline_uri(outline: *mut FzOutline) -> *const c_char;
    pub fn mupdf_outline_page(outline: *mut FzOutline) -> FzLocation;
    pub fn mupdf_outline_point(outline: *mut FzOutline) -> FzPoint;
    pub fn mupdf_outline_is_open(outline: *mut FzOutline) -> c_int;

    // Document writer
    pub fn mupdf_new_document_writer(
        ctx: *mut FzContext,
        filename: *const c_char,
        format: *const c_char,
        options: *const c_char,
        errptr: ErrorSlot,
    ) -> *mut FzDocumentWriter;
    pub fn mupdf_new_document_writer_with_buffer(
        ctx: *mut FzContext,
        buf: *mut FzBuffer,
        format: *const c_char,
        options: *const c_char,
        errptr: ErrorSlot,
    ) -> *mut FzDocumentWriter;
    pub fn mupdf_document_writer_begin_page(
        ctx: *mut FzContext,
        writer: *mut FzDocumentWriter,
        mediabox: FzRect,
        errptr: ErrorSlot,
    ) -> *mut FzDevice;
    pub fn mupdf_document_writer_end_page(ctx: *mut FzContext, writer: *mut FzDocumentWriter, errptr: ErrorSlot);
    pub fn mupdf_close_document_writer(ctx: *mut FzContext, writer: *mut FzDocumentWriter, errptr: ErrorSlot);
    pub fn mupdf_drop_document_writer(ctx: *mut FzContext, writer: *mut FzDocumentWriter);

    // PDF document
    pub fn mupdf_pdf_create_document(ctx: *mut FzContext, errptr: ErrorSlot) -> *mut PdfDocument;
    pub fn mupdf_pdf_open_document(ctx: *mut FzContext, filename: *const c_char, errptr: ErrorSlot) -> *mut PdfDocument;
    pub fn mupdf_pdf_open_document_from_bytes(ctx: *mut FzContext, bytes: *mut FzBuffer, errptr: ErrorSlot) -> *mut PdfDocument;
    pub fn mupdf_pdf_keep_document(ctx: *mut FzContext, pdf: *mut PdfDocument) -> *mut PdfDocument;
    pub fn mupdf_pdf_drop_document(ctx: *mut FzContext, pdf: *mut PdfDocument);
    pub fn mupdf_pdf_document_as_document(ctx: *mut FzContext, pdf: *mut PdfDocument) -> *mut FzDocument;
    pub fn mupdf_pdf_count_pages(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_load_page(ctx: *mut FzContext, pdf: *mut PdfDocument, page_no: c_int, errptr: ErrorSlot) -> *mut PdfPage;
    pub fn mupdf_pdf_add_object(ctx: *mut FzContext, pdf: *mut PdfDocument, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_create_object(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_delete_object(ctx: *mut FzContext, pdf: *mut PdfDocument, num: c_int, errptr: ErrorSlot);
    pub fn mupdf_pdf_add_image(ctx: *mut FzContext, pdf: *mut PdfDocument, image: *mut FzImage, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_add_font(ctx: *mut FzContext, pdf: *mut PdfDocument, font: *mut FzFont, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_add_cjk_font(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        font: *mut FzFont,
        ordering: c_int,
        wmode: c_int,
        serif: c_int,
        errptr: ErrorSlot,
    ) -> *mut PdfObj;
    pub fn mupdf_pdf_add_simple_font(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        font: *mut FzFont,
        encoding: c_int,
        errptr: ErrorSlot,
    ) -> *mut PdfObj;
    pub fn mupdf_pdf_save_document(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        filename: *const c_char,
        options: *const MupdfWriteOptions,
        errptr: ErrorSlot,
    );
    pub fn mupdf_pdf_write_document(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        options: *const MupdfWriteOptions,
        errptr: ErrorSlot,
    ) -> *mut FzBuffer;
    pub fn mupdf_pdf_enable_js(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot);
    pub fn mupdf_pdf_disable_js(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot);
    pub fn mupdf_pdf_js_supported(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_has_unsaved_changes(ctx: *mut FzContext, pdf: *mut PdfDocument) -> c_int;
    pub fn mupdf_pdf_can_be_saved_incrementally(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_trailer(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_catalog(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_count_objects(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_new_graft_map(ctx: *mut FzContext, pdf: *mut PdfDocument, errptr: ErrorSlot) -> *mut PdfGraftMap;
    pub fn mupdf_pdf_keep_graft_map(ctx: *mut FzContext, map: *mut PdfGraftMap) -> *mut PdfGraftMap;
    pub fn mupdf_pdf_drop_graft_map(ctx: *mut FzContext, map: *mut PdfGraftMap);
    pub fn mupdf_pdf_graft_object(ctx: *mut FzContext, dst: *mut PdfDocument, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_graft_mapped_object(ctx: *mut FzContext, map: *mut PdfGraftMap, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_page(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        page_no: c_int,
        mediabox: FzRect,
        rotate: c_int,
        errptr: ErrorSlot,
    ) -> *mut PdfPage;
    pub fn mupdf_pdf_add_page(
        ctx: *mut FzContext,
        pdf: *mut PdfDocument,
        mediabox: FzRect,
        rotate: c_int,
        resources: *mut PdfObj,
        contents: *mut FzBuffer,
        errptr: ErrorSlot,
    ) -> *mut PdfObj;
    pub fn mupdf_pdf_lookup_page_obj(ctx: *mut FzContext, pdf: *mut PdfDocument, page_no: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_insert_page(ctx: *mut FzContext, pdf: *mut PdfDocument, page_no: c_int, page: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_delete_page(ctx: *mut FzContext, pdf: *mut PdfDocument, page_no: c_int, errptr: ErrorSlot);

    // PDF object
    pub fn mupdf_pdf_null() -> *mut PdfObj;
    pub fn mupdf_pdf_true() -> *mut PdfObj;
    pub fn mupdf_pdf_false() -> *mut PdfObj;
    pub fn mupdf_pdf_keep_obj(ctx: *mut FzContext, obj: *mut PdfObj) -> *mut PdfObj;
    pub fn mupdf_pdf_drop_obj(ctx: *mut FzContext, obj: *mut PdfObj);
    pub fn mupdf_pdf_new_int(ctx: *mut FzContext, i: i64, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_real(ctx: *mut FzContext, f: c_float, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_string(ctx: *mut FzContext, s: *const c_char, len: size_t, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_name(ctx: *mut FzContext, name: *const c_char, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_indirect(ctx: *mut FzContext, pdf: *mut PdfDocument, num: c_int, gen_: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_array(ctx: *mut FzContext, pdf: *mut PdfDocument, capacity: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_dict(ctx: *mut FzContext, pdf: *mut PdfDocument, capacity: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_rect(ctx: *mut FzContext, pdf: *mut PdfDocument, rect: FzRect, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_new_matrix(ctx: *mut FzContext, pdf: *mut PdfDocument, m: FzMatrix, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_obj_from_str(ctx: *mut FzContext, pdf: *mut PdfDocument, src: *const c_char, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_deep_copy_obj(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_is_null(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_bool(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_int(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_real(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_number(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_string(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_name(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_array(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_dict(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_indirect(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_is_stream(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_to_bool(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_to_int(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> i64;
    pub fn mupdf_pdf_to_real(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_float;
    pub fn mupdf_pdf_to_name(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> *const c_char;
    pub fn mupdf_pdf_to_string(ctx: *mut FzContext, obj: *mut PdfObj, len: *mut size_t, errptr: ErrorSlot) -> *const c_char;
    pub fn mupdf_pdf_to_num(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_to_rect(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_pdf_obj_to_string(ctx: *mut FzContext, obj: *mut PdfObj, tight: c_int, ascii: c_int, errptr: ErrorSlot) -> *mut c_char;
    pub fn mupdf_pdf_resolve_indirect(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_get_bound_document(ctx: *mut FzContext, obj: *mut PdfObj) -> *mut PdfDocument;
    pub fn mupdf_pdf_set_dirty(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_array_len(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_array_get(ctx: *mut FzContext, obj: *mut PdfObj, index: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_array_put(ctx: *mut FzContext, obj: *mut PdfObj, index: c_int, item: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_array_push(ctx: *mut FzContext, obj: *mut PdfObj, item: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_array_insert(ctx: *mut FzContext, obj: *mut PdfObj, item: *mut PdfObj, index: c_int, errptr: ErrorSlot);
    pub fn mupdf_pdf_array_delete(ctx: *mut FzContext, obj: *mut PdfObj, index: c_int, errptr: ErrorSlot);
    pub fn mupdf_pdf_dict_len(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_dict_get_key(ctx: *mut FzContext, obj: *mut PdfObj, index: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_dict_get_val(ctx: *mut FzContext, obj: *mut PdfObj, index: c_int, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_dict_get(ctx: *mut FzContext, obj: *mut PdfObj, key: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_dict_gets(ctx: *mut FzContext, obj: *mut PdfObj, key: *const c_char, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_dict_get_inheritable(ctx: *mut FzContext, obj: *mut PdfObj, key: *mut PdfObj, errptr: ErrorSlot) -> *mut PdfObj;
    pub fn mupdf_pdf_dict_put(ctx: *mut FzContext, obj: *mut PdfObj, key: *mut PdfObj, value: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_dict_puts(ctx: *mut FzContext, obj: *mut PdfObj, key: *const c_char, value: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_dict_del(ctx: *mut FzContext, obj: *mut PdfObj, key: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_dict_dels(ctx: *mut FzContext, obj: *mut PdfObj, key: *const c_char, errptr: ErrorSlot);
    pub fn mupdf_pdf_read_stream(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_pdf_read_raw_stream(ctx: *mut FzContext, obj: *mut PdfObj, errptr: ErrorSlot) -> *mut FzBuffer;
    pub fn mupdf_pdf_write_object(ctx: *mut FzContext, obj: *mut PdfObj, reference: *mut PdfObj, errptr: ErrorSlot);
    pub fn mupdf_pdf_write_stream_buffer(ctx: *mut FzContext, obj: *mut PdfObj, buf: *mut FzBuffer, compressed: c_int, errptr: ErrorSlot);

    // PDF page
    pub fn mupdf_pdf_page_from_page(ctx: *mut FzContext, page: *mut FzPage) -> *mut PdfPage;
    pub fn mupdf_pdf_page_as_page(ctx: *mut FzContext, page: *mut PdfPage) -> *mut FzPage;
    pub fn mupdf_pdf_keep_page(ctx: *mut FzContext, page: *mut PdfPage) -> *mut PdfPage;
    pub fn mupdf_pdf_drop_page(ctx: *mut FzContext, page: *mut PdfPage);
    pub fn mupdf_pdf_page_obj(ctx: *mut FzContext, page: *mut PdfPage) -> *mut PdfObj;
    pub fn mupdf_pdf_create_annot(ctx: *mut FzContext, page: *mut PdfPage, subtype: c_int, errptr: ErrorSlot) -> *mut PdfAnnot;
    pub fn mupdf_pdf_delete_annot(ctx: *mut FzContext, page: *mut PdfPage, annot: *mut PdfAnnot, errptr: ErrorSlot);
    pub fn mupdf_pdf_first_annot(ctx: *mut FzContext, page: *mut PdfPage) -> *mut PdfAnnot;
    pub fn mupdf_pdf_next_annot(ctx: *mut FzContext, annot: *mut PdfAnnot) -> *mut PdfAnnot;
    pub fn mupdf_pdf_update_page(ctx: *mut FzContext, page: *mut PdfPage, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_redact_page(ctx: *mut FzContext, page: *mut PdfPage, options: *const MupdfRedactOptions, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_page_rotation(ctx: *mut FzContext, page: *mut PdfPage, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_page_set_rotation(ctx: *mut FzContext, page: *mut PdfPage, rotation: c_int, errptr: ErrorSlot);
    pub fn mupdf_pdf_page_set_crop_box(ctx: *mut FzContext, page: *mut PdfPage, rect: FzRect, errptr: ErrorSlot);
    pub fn mupdf_pdf_page_crop_box(ctx: *mut FzContext, page: *mut PdfPage, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_pdf_page_media_box(ctx: *mut FzContext, page: *mut PdfPage, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_pdf_page_transform(ctx: *mut FzContext, page: *mut PdfPage, errptr: ErrorSlot) -> FzMatrix;

    // PDF annotation
    pub fn mupdf_pdf_keep_annot(ctx: *mut FzContext, annot: *mut PdfAnnot) -> *mut PdfAnnot;
    pub fn mupdf_pdf_drop_annot(ctx: *mut FzContext, annot: *mut PdfAnnot);
    pub fn mupdf_pdf_annot_obj(ctx: *mut FzContext, annot: *mut PdfAnnot) -> *mut PdfObj;
    pub fn mupdf_pdf_annot_type(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_annot_author(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> *const c_char;
    pub fn mupdf_pdf_set_annot_author(ctx: *mut FzContext, annot: *mut PdfAnnot, author: *const c_char, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_contents(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> *const c_char;
    pub fn mupdf_pdf_set_annot_contents(ctx: *mut FzContext, annot: *mut PdfAnnot, text: *const c_char, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_rect(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_pdf_set_annot_rect(ctx: *mut FzContext, annot: *mut PdfAnnot, rect: FzRect, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_color(ctx: *mut FzContext, annot: *mut PdfAnnot, color: *mut c_float, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_set_annot_color(ctx: *mut FzContext, annot: *mut PdfAnnot, n: c_int, color: *const c_float, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_flags(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> c_int;
    pub fn mupdf_pdf_set_annot_flags(ctx: *mut FzContext, annot: *mut PdfAnnot, flags: c_int, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_opacity(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> c_float;
    pub fn mupdf_pdf_set_annot_opacity(ctx: *mut FzContext, annot: *mut PdfAnnot, opacity: c_float, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_border_width(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> c_float;
    pub fn mupdf_pdf_set_annot_border_width(ctx: *mut FzContext, annot: *mut PdfAnnot, width: c_float, errptr: ErrorSlot);
    pub fn mupdf_pdf_set_annot_line(ctx: *mut FzContext, annot: *mut PdfAnnot, a: FzPoint, b: FzPoint, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_popup(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> FzRect;
    pub fn mupdf_pdf_set_annot_popup(ctx: *mut FzContext, annot: *mut PdfAnnot, rect: FzRect, errptr: ErrorSlot);
    pub fn mupdf_pdf_annot_is_hot(ctx: *mut FzContext, annot: *mut PdfAnnot) -> c_int;
    pub fn mupdf_pdf_annot_is_active(ctx: *mut FzContext, annot: *mut PdfAnnot) -> c_int;
    pub fn mupdf_pdf_update_annot(ctx: *mut FzContext, annot: *mut PdfAnnot, errptr: ErrorSlot) -> c_int;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn test_value_type_layouts() {
        assert_eq!(size_of::<FzPoint>(), 8);
        assert_eq!(size_of::<FzRect>(), 16);
        assert_eq!(size_of::<FzIRect>(), 16);
        assert_eq!(size_of::<FzMatrix>(), 24);
        assert_eq!(size_of::<FzQuad>(), 32);
        assert_eq!(size_of::<FzLocation>(), 8);
        assert_eq!(size_of::<MupdfLinkDest>(), 32);
        assert_eq!(size_of::<FzColorParams>(), 4);
        assert_eq!(align_of::<FzColorParams>(), 1);
        assert_eq!(size_of::<MupdfDeviceCallbacks>(), 21 * size_of::<*mut c_void>());
    }

    #[test]
    fn test_empty_rect_default() {
        let r = FzRect::default();
        assert!(r.x0 > r.x1 && r.y0 > r.y1);
    }
}
