use std::ffi::CString;
use std::os::raw::c_int;

use mupdf_shim_sys as sys;

use crate::context::context;
use crate::error::{Error, Result, ffi_try};
use crate::font::{Font, WriteMode};
use crate::geometry::{Matrix, Rect};
use crate::handle::native_handle;
use crate::stroke_state::StrokeState;

native_handle! {
    /// Positioned glyph runs, ready to be drawn on a device.
    pub struct Text(sys::FzText): Text,
        drop = sys::mupdf_drop_text;
}

impl Text {
    pub fn new() -> Result<Self> {
        let ctx = context()?;
        unsafe {
            let raw = ffi_try!(sys::mupdf_new_text(ctx))?;
            Self::from_raw(raw)
        }
    }

    /// Places one glyph at `trm`. `unicode` is what text extraction reports for it.
    pub fn show_glyph(&mut self, font: &Font, trm: &Matrix, glyph: i32, unicode: char, wmode: WriteMode) -> Result<()> {
        let ctx = context()?;
        let unicode = c_int::try_from(u32::from(unicode)).map_err(|_| Error::precondition("character out of range"))?;
        unsafe {
            ffi_try!(sys::mupdf_show_glyph(
                ctx,
                self.as_ptr(),
                font.as_ptr(),
                (*trm).into(),
                glyph,
                unicode,
                wmode.to_raw()
            ))
        }
    }

    /// Lays out `s` starting at `trm` and returns the matrix advanced past
    /// the last glyph.
    pub fn show_string(&mut self, font: &Font, trm: &Matrix, s: &str, wmode: WriteMode) -> Result<Matrix> {
        let ctx = context()?;
        let c_str = CString::new(s)?;
        unsafe {
            ffi_try!(sys::mupdf_show_string(
                ctx,
                self.as_ptr(),
                font.as_ptr(),
                (*trm).into(),
                c_str.as_ptr(),
                wmode.to_raw()
            ))
        }
        .map(Matrix::from)
    }

    pub fn bounds(&self, stroke: Option<&StrokeState>, ctm: &Matrix) -> Result<Rect> {
        let ctx = context()?;
        let stroke = stroke.map_or(std::ptr::null_mut(), StrokeState::as_ptr);
        unsafe { ffi_try!(sys::mupdf_bound_text(ctx, self.as_ptr(), stroke, (*ctm).into())) }.map(Rect::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_string_advances_matrix() {
        let font = Font::new("Helvetica").unwrap();
        let mut text = Text::new().unwrap();
        let start = Matrix::new(12.0, 0.0, 0.0, 12.0, 10.0, 50.0);
        let end = text.show_string(&font, &start, "Hello", WriteMode::Horizontal).unwrap();
        assert!(end.e > start.e);
        assert_eq!(end.f, start.f);

        let bounds = text.bounds(None, &Matrix::IDENTITY).unwrap();
        assert!(!bounds.is_empty());
        assert!(bounds.x0 < start.e + 5.0 && bounds.x1 > start.e + 20.0);
    }

    #[test]
    fn test_show_glyph_extends_bounds() {
        let font = Font::new("Courier").unwrap();
        let glyph = font.encode_character('W').unwrap();
        let mut text = Text::new().unwrap();
        assert!(text.bounds(None, &Matrix::IDENTITY).unwrap().is_empty());
        text.show_glyph(&font, &Matrix::scale(20.0, 20.0), glyph, 'W', WriteMode::Horizontal)
            .unwrap();
        assert!(!text.bounds(None, &Matrix::IDENTITY).unwrap().is_empty());
    }

    #[test]
    fn test_string_with_nul_is_precondition() {
        let font = Font::new("Helvetica").unwrap();
        let mut text = Text::new().unwrap();
        let err = text
            .show_string(&font, &Matrix::IDENTITY, "a\0b", WriteMode::Horizontal)
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
