use std::os::raw::c_int;

use mupdf_shim_sys as sys;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::context;
use crate::error::{Error, Result, ffi_try};
use crate::handle::{borrowed_str, native_handle};

native_handle! {
    pub struct Colorspace(sys::FzColorspace): Colorspace,
        keep = sys::mupdf_keep_colorspace,
        drop = sys::mupdf_drop_colorspace;
}

/// Family of a colorspace as reported by the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorspaceType {
    None,
    Gray,
    Rgb,
    Bgr,
    Cmyk,
    Lab,
    Indexed,
    Separation,
}

impl ColorspaceType {
    fn from_raw(value: c_int) -> Self {
        match value {
            1 => Self::Gray,
            2 => Self::Rgb,
            3 => Self::Bgr,
            4 => Self::Cmyk,
            5 => Self::Lab,
            6 => Self::Indexed,
            7 => Self::Separation,
            _ => Self::None,
        }
    }
}

impl Colorspace {
    fn device(which: c_int) -> Result<Self> {
        let ctx = context()?;
        unsafe { Self::from_raw(sys::mupdf_device_colorspace(ctx, which)) }
    }

    pub fn device_gray() -> Result<Self> {
        Self::device(sys::MUPDF_CS_GRAY)
    }

    pub fn device_rgb() -> Result<Self> {
        Self::device(sys::MUPDF_CS_RGB)
    }

    pub fn device_bgr() -> Result<Self> {
        Self::device(sys::MUPDF_CS_BGR)
    }

    pub fn device_cmyk() -> Result<Self> {
        Self::device(sys::MUPDF_CS_CMYK)
    }

    /// Number of colour components, excluding alpha.
    pub fn n(&self) -> Result<usize> {
        let ctx = context()?;
        let n = unsafe { sys::mupdf_colorspace_n(ctx, self.as_ptr()) };
        Ok(usize::try_from(n).unwrap_or(0))
    }

    pub fn name(&self) -> Result<String> {
        let ctx = context()?;
        Ok(unsafe { borrowed_str(sys::mupdf_colorspace_name(ctx, self.as_ptr())) }.unwrap_or_default())
    }

    pub fn kind(&self) -> Result<ColorspaceType> {
        let ctx = context()?;
        Ok(ColorspaceType::from_raw(unsafe {
            sys::mupdf_colorspace_type(ctx, self.as_ptr())
        }))
    }

    pub fn is_gray(&self) -> Result<bool> {
        Ok(self.kind()? == ColorspaceType::Gray)
    }

    pub fn is_rgb(&self) -> Result<bool> {
        Ok(self.kind()? == ColorspaceType::Rgb)
    }

    pub fn is_cmyk(&self) -> Result<bool> {
        Ok(self.kind()? == ColorspaceType::Cmyk)
    }

    /// Converts one colour from this colorspace into `to`.
    ///
    /// `src` must have at least `self.n()` components; the result has
    /// exactly `to.n()`.
    pub fn convert_color(&self, src: &[f32], to: &Colorspace, params: ColorParams) -> Result<Vec<f32>> {
        let ctx = context()?;
        let mut dst = vec![0.0_f32; to.n()?.max(1)];
        let n_src = c_int::try_from(src.len()).map_err(|_| Error::precondition("too many colour components"))?;
        let n_dst = c_int::try_from(dst.len()).map_err(|_| Error::precondition("too many colour components"))?;
        unsafe {
            ffi_try!(sys::mupdf_convert_color(
                ctx,
                self.as_ptr(),
                src.as_ptr(),
                n_src,
                to.as_ptr(),
                dst.as_mut_ptr(),
                n_dst,
                params.into()
            ))
        }?;
        dst.truncate(to.n()?);
        Ok(dst)
    }
}

/// Colour conversion parameters.
///
/// `rendering_intent` follows the PDF numbering: 0 perceptual, 1 relative
/// colorimetric, 2 saturation, 3 absolute colorimetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorParams {
    pub rendering_intent: u8,
    pub black_point: bool,
    pub overprint: bool,
    pub overprint_mode: bool,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            rendering_intent: 1,
            black_point: true,
            overprint: false,
            overprint_mode: false,
        }
    }
}

impl From<ColorParams> for sys::FzColorParams {
    fn from(p: ColorParams) -> Self {
        sys::FzColorParams {
            ri: p.rendering_intent,
            bp: u8::from(p.black_point),
            op: u8::from(p.overprint),
            opm: u8::from(p.overprint_mode),
        }
    }
}

impl From<sys::FzColorParams> for ColorParams {
    fn from(p: sys::FzColorParams) -> Self {
        Self {
            rendering_intent: p.ri,
            black_point: p.bp != 0,
            overprint: p.op != 0,
            overprint_mode: p.opm != 0,
        }
    }
}

/// Pointer and length pair for an optional colour, checked against `cs`.
pub(crate) fn color_args(cs: &Colorspace, color: &[f32]) -> Result<(*const f32, c_int)> {
    if color.len() < cs.n()? {
        return Err(Error::precondition(
            "color has fewer components than its colorspace",
        ));
    }
    let n = c_int::try_from(color.len()).map_err(|_| Error::precondition("too many colour components"))?;
    Ok((color.as_ptr(), n))
}
