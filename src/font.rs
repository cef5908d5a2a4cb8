use std::ffi::CString;
use std::os::raw::c_int;

use mupdf_shim_sys as sys;

use crate::buffer::Buffer;
use crate::context::{context, infallible_context};
use crate::error::{Error, Result, ffi_try};
use crate::geometry::Matrix;
use crate::handle::{borrowed_str, native_handle};
use crate::path::Path;

native_handle! {
    pub struct Font(sys::FzFont): Font,
        keep = sys::mupdf_keep_font,
        drop = sys::mupdf_drop_font;
}

/// Writing direction for glyph metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Horizontal,
    Vertical,
}

impl WriteMode {
    pub(crate) fn to_raw(self) -> c_int {
        match self {
            WriteMode::Horizontal => 0,
            WriteMode::Vertical => 1,
        }
    }
}

impl Font {
    /// Opens a font by name.
    ///
    /// Base-14 names ("Helvetica", "Times-Roman", ...) resolve to the
    /// builtin fonts; any other name is treated as a font file path.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_index(name, 0)
    }

    pub fn with_index(name: &str, index: i32) -> Result<Self> {
        let ctx = context()?;
        let c_name = CString::new(name)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_font(ctx, c_name.as_ptr(), index))?;
            Self::from_raw(raw)
        }
    }

    /// Loads a font file held in memory.
    pub fn from_buffer(name: &str, index: i32, buffer: &Buffer) -> Result<Self> {
        let ctx = context()?;
        let c_name = CString::new(name)?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_font_from_buffer(ctx, c_name.as_ptr(), index, buffer.as_ptr()))?;
            Self::from_raw(raw)
        }
    }

    pub fn name(&self) -> String {
        unsafe { borrowed_str(sys::mupdf_font_name(infallible_context(), self.as_ptr())) }.unwrap_or_default()
    }

    pub fn is_bold(&self) -> bool {
        unsafe { sys::mupdf_font_is_bold(infallible_context(), self.as_ptr()) != 0 }
    }

    pub fn is_italic(&self) -> bool {
        unsafe { sys::mupdf_font_is_italic(infallible_context(), self.as_ptr()) != 0 }
    }

    pub fn is_serif(&self) -> bool {
        unsafe { sys::mupdf_font_is_serif(infallible_context(), self.as_ptr()) != 0 }
    }

    pub fn is_monospaced(&self) -> bool {
        unsafe { sys::mupdf_font_is_monospaced(infallible_context(), self.as_ptr()) != 0 }
    }

    /// Glyph id for a character; 0 when the font has no glyph for it.
    pub fn encode_character(&self, ch: char) -> Result<i32> {
        let ctx = context()?;
        let unicode = c_int::try_from(u32::from(ch)).map_err(|_| Error::precondition("character out of range"))?;
        unsafe { ffi_try!(sys::mupdf_encode_character(ctx, self.as_ptr(), unicode)) }
    }

    /// Advance width of `glyph` in font units scaled to 1.
    pub fn advance_glyph(&self, glyph: i32, wmode: WriteMode) -> Result<f32> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_advance_glyph(ctx, self.as_ptr(), glyph, wmode.to_raw())) }
    }

    /// Outline of `glyph` under `ctm`. `None` for glyphs without an outline.
    pub fn outline_glyph(&self, glyph: i32, ctm: &Matrix) -> Result<Option<Path>> {
        let ctx = context()?;
        let raw = unsafe { ffi_try!(sys::mupdf_outline_glyph(ctx, self.as_ptr(), glyph, (*ctm).into())) }?;
        if raw.is_null() {
            return Ok(None);
        }
        unsafe { Path::from_raw(raw) }.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_font_properties() {
        let font = Font::new("Helvetica-Bold").unwrap();
        assert!(font.name().contains("Helvetica"));
        assert!(font.is_bold());
        assert!(!font.is_italic());

        let courier = Font::new("Courier").unwrap();
        assert!(courier.is_monospaced());
        let times = Font::new("Times-Italic").unwrap();
        assert!(times.is_serif());
        assert!(times.is_italic());
    }

    #[test]
    fn test_encode_and_advance() {
        let font = Font::new("Helvetica").unwrap();
        let glyph = font.encode_character('A').unwrap();
        assert!(glyph > 0);
        let advance = font.advance_glyph(glyph, WriteMode::Horizontal).unwrap();
        assert!(advance > 0.5 && advance < 1.0);
    }

    #[test]
    fn test_outline_glyph_bounds() {
        let font = Font::new("Helvetica").unwrap();
        let glyph = font.encode_character('O').unwrap();
        let path = font
            .outline_glyph(glyph, &Matrix::scale(100.0, 100.0))
            .unwrap()
            .unwrap();
        let bounds = path.bounds(None, &Matrix::IDENTITY).unwrap();
        assert!(bounds.width() > 10.0);
        assert!(bounds.height() > 10.0);
    }

    #[test]
    fn test_missing_font_file_fails() {
        let err = Font::new("/nonexistent/font.ttf").unwrap_err();
        assert!(!matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_name_with_nul_is_precondition() {
        let err = Font::new("Helv\0etica").unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
