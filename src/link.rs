use std::fmt;

use mupdf_shim_sys as sys;

use crate::context::infallible_context;
use crate::geometry::Rect;
use crate::handle::borrowed_str;

/// Chapter/page pair addressing a page in reflowable and fixed documents
/// alike. Fixed-layout documents have a single chapter 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub chapter: i32,
    pub page: i32,
}

impl Location {
    /// True unless this is the `(-1, -1)` "nowhere" location.
    pub fn is_valid(&self) -> bool {
        self.chapter >= 0 && self.page >= 0
    }
}

impl From<sys::FzLocation> for Location {
    fn from(l: sys::FzLocation) -> Self {
        Self {
            chapter: l.chapter,
            page: l.page,
        }
    }
}

/// How a viewer should frame the target page of a link.
///
/// Coordinates left out of the link come back as `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestinationKind {
    /// Whole page in the window.
    Fit,
    /// Like `Fit`, using the bounding box of the page contents.
    FitB,
    /// Page width in the window, `top` at the top edge.
    FitH { top: Option<f32> },
    FitBH { top: Option<f32> },
    /// Page height in the window, `left` at the left edge.
    FitV { left: Option<f32> },
    FitBV { left: Option<f32> },
    /// The given rectangle in the window.
    FitR { left: f32, bottom: f32, right: f32, top: f32 },
    /// `(left, top)` at the top left corner, magnified by `zoom` percent.
    XYZ {
        left: Option<f32>,
        top: Option<f32>,
        zoom: Option<f32>,
    },
}

impl Default for DestinationKind {
    fn default() -> Self {
        Self::XYZ {
            left: None,
            top: None,
            zoom: None,
        }
    }
}

fn coord(v: f32) -> Option<f32> {
    (!v.is_nan()).then_some(v)
}

fn write_coord(f: &mut fmt::Formatter<'_>, v: Option<f32>) -> fmt::Result {
    match v.and_then(coord) {
        Some(v) => write!(f, "{v}"),
        None => f.write_str("nan"),
    }
}

impl DestinationKind {
    fn from_raw(dest: &sys::MupdfLinkDest) -> Self {
        match dest.kind {
            sys::MUPDF_DEST_FIT_B => Self::FitB,
            sys::MUPDF_DEST_FIT_H => Self::FitH { top: coord(dest.y) },
            sys::MUPDF_DEST_FIT_BH => Self::FitBH { top: coord(dest.y) },
            sys::MUPDF_DEST_FIT_V => Self::FitV { left: coord(dest.x) },
            sys::MUPDF_DEST_FIT_BV => Self::FitBV { left: coord(dest.x) },
            sys::MUPDF_DEST_FIT_R => Self::FitR {
                left: dest.x,
                bottom: dest.y,
                right: dest.x + dest.w,
                top: dest.y + dest.h,
            },
            sys::MUPDF_DEST_XYZ => Self::XYZ {
                left: coord(dest.x),
                top: coord(dest.y),
                zoom: coord(dest.zoom),
            },
            _ => Self::Fit,
        }
    }
}

/// Writes the view part of a link URI (`&view=FitH,20`, `&zoom=150,10,20`,
/// ...), empty for a destination that only names the page.
impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = |f: &mut fmt::Formatter<'_>, name: &str, v: Option<f32>| match v.and_then(coord) {
            Some(v) => write!(f, "&view={name},{v}"),
            None => write!(f, "&view={name}"),
        };
        match *self {
            Self::Fit => f.write_str("&view=Fit"),
            Self::FitB => f.write_str("&view=FitB"),
            Self::FitH { top } => edge(f, "FitH", top),
            Self::FitBH { top } => edge(f, "FitBH", top),
            Self::FitV { left } => edge(f, "FitV", left),
            Self::FitBV { left } => edge(f, "FitBV", left),
            Self::FitR { left, bottom, right, top } => {
                write!(f, "&viewrect={left},{bottom},{},{}", right - left, top - bottom)
            }
            Self::XYZ { left, top, zoom } => {
                let zoom = zoom.filter(|z| z.is_finite() && *z > 0.0);
                if zoom.is_none() && left.and_then(coord).is_none() && top.and_then(coord).is_none() {
                    return Ok(());
                }
                f.write_str("&zoom=")?;
                write_coord(f, zoom)?;
                f.write_str(",")?;
                write_coord(f, left)?;
                f.write_str(",")?;
                write_coord(f, top)
            }
        }
    }
}

/// Target of an internal link, from
/// [`Document::resolve_link_dest`](crate::Document::resolve_link_dest).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkDestination {
    pub location: Location,
    pub kind: DestinationKind,
}

impl From<sys::MupdfLinkDest> for LinkDestination {
    fn from(dest: sys::MupdfLinkDest) -> Self {
        Self {
            location: dest.loc.into(),
            kind: DestinationKind::from_raw(&dest),
        }
    }
}

/// Hyperlink area on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub bounds: Rect,
    pub uri: String,
}

impl Link {
    /// True for links leaving the document (`http:`, `mailto:`, ...);
    /// internal links are resolved with
    /// [`Document::resolve_link`](crate::Document::resolve_link).
    pub fn is_external(&self) -> bool {
        let scheme_len = self.uri.bytes().take_while(u8::is_ascii_lowercase).count();
        self.uri.as_bytes().get(scheme_len) == Some(&b':')
    }
}

/// Copies a native link chain into owned values, then releases the chain.
///
/// # Safety
///
/// `head` must be null or an owned link chain reference.
pub(crate) unsafe fn collect_links(head: *mut sys::FzLink) -> Vec<Link> {
    let mut links = Vec::new();
    let mut cur = head;
    while !cur.is_null() {
        unsafe {
            links.push(Link {
                bounds: sys::mupdf_link_rect(cur).into(),
                uri: borrowed_str(sys::mupdf_link_uri(cur)).unwrap_or_default(),
            });
            cur = sys::mupdf_link_next(cur);
        }
    }
    if !head.is_null() {
        unsafe { sys::mupdf_drop_link(infallible_context(), head) };
    }
    links
}
