//! Typed view of PDF link annotations.
//!
//! The library hands every link out as a flat URI string (`#page=3&view=Fit`,
//! `file:other.pdf#nameddest=intro`, `https://...`). [`PdfAction`] turns that
//! string back into the action it was written from, and formats to the same
//! string again.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::geometry::Rect;
use crate::link::DestinationKind;

/// Characters left alone in a URI component: letters, digits and
/// `-_.!~*'()`.
const URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// [`URI_COMPONENT_SET`] keeping `/` as well, for file paths.
const URI_PATH_SET: &AsciiSet = &URI_COMPONENT_SET.remove(b'/');

/// A link annotation on a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLink {
    pub bounds: Rect,
    pub action: PdfAction,
}

/// What following a link does.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfAction {
    /// Jump within this document.
    GoTo(PdfDestination),
    /// Jump into another PDF file.
    GoToR { file: FileSpec, dest: PdfDestination },
    /// Open a file that is not a PDF.
    Launch(FileSpec),
    /// Any other URI, as written.
    Uri(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileSpec {
    /// Local path, absolute or relative.
    Path(String),
    /// 7-bit ASCII URL.
    Url(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfDestination {
    /// Zero-based page plus framing.
    Page { page: u32, kind: DestinationKind },
    /// Entry of the target document's name tree.
    Named(String),
}

impl Default for PdfDestination {
    fn default() -> Self {
        Self::Page {
            page: 0,
            kind: DestinationKind::default(),
        }
    }
}

impl PdfAction {
    /// Same as `to_string()`.
    pub fn to_uri(&self) -> String {
        self.to_string()
    }

    /// Reads back a link URI as produced by the library; `None` for an
    /// empty string or a bare `#`.
    pub fn parse(uri: &str) -> Option<Self> {
        parse_link_uri(uri)
    }
}

fn write_dest(f: &mut fmt::Formatter<'_>, sep: char, dest: &PdfDestination) -> fmt::Result {
    match dest {
        PdfDestination::Page { page, kind } => write!(f, "{sep}page={}{kind}", page.saturating_add(1)),
        PdfDestination::Named(name) => {
            write!(f, "{sep}nameddest={}", utf8_percent_encode(name, URI_COMPONENT_SET))
        }
    }
}

fn write_file(f: &mut fmt::Formatter<'_>, file: &FileSpec) -> fmt::Result {
    match file {
        FileSpec::Path(path) => {
            let scheme = if path.starts_with('/') { "file://" } else { "file:" };
            write!(f, "{scheme}{}", utf8_percent_encode(path, URI_PATH_SET))
        }
        FileSpec::Url(url) => f.write_str(url),
    }
}

/// Fragment separator after a file: a URL may already carry a fragment.
fn fragment_sep(file: &FileSpec) -> char {
    match file {
        FileSpec::Url(url) if url.contains('#') => '&',
        _ => '#',
    }
}

/// Formats the action the way the library writes link URIs.
impl fmt::Display for PdfAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoTo(dest) => write_dest(f, '#', dest),
            Self::Uri(uri) => f.write_str(uri),
            Self::Launch(file) => {
                write_file(f, file)?;
                write!(f, "{}page=1", fragment_sep(file))
            }
            Self::GoToR { file, dest } => {
                write_file(f, file)?;
                write_dest(f, fragment_sep(file), dest)
            }
        }
    }
}

fn parse_link_uri(uri: &str) -> Option<PdfAction> {
    let uri = uri.trim();
    if uri.is_empty() {
        return None;
    }
    let (head, params) = uri
        .split_once('#')
        .map_or((uri, ""), |(head, params)| (head.trim(), params.trim()));

    if head.is_empty() {
        let dest = match parse_fragment(params) {
            Fragment::Explicit(page, kind) => PdfDestination::Page { page, kind },
            Fragment::Named(name) => PdfDestination::Named(name),
            Fragment::UnknownKeys => PdfDestination::Named(uri.to_owned()),
            Fragment::Empty => return None,
        };
        return Some(PdfAction::GoTo(dest));
    }

    let (link, file_scheme) = strip_prefix_icase(head, "file:").map_or((head, false), |path| (path, true));

    if is_pdf_path(link) {
        let dest = match parse_fragment(params) {
            Fragment::Empty => PdfDestination::default(),
            Fragment::Explicit(page, kind) => PdfDestination::Page { page, kind },
            Fragment::Named(name) => PdfDestination::Named(name),
            Fragment::UnknownKeys => return Some(PdfAction::Uri(uri.to_owned())),
        };
        let file = if !file_scheme && is_external(link) {
            FileSpec::Url(link.to_owned())
        } else {
            FileSpec::Path(clean_path(&decode(link)))
        };
        return Some(PdfAction::GoToR { file, dest });
    }

    // Launch and URI actions flatten to the same shape; anything local
    // counts as a launch.
    let action = if file_scheme && !link.is_empty() {
        PdfAction::Launch(FileSpec::Path(clean_path(&decode(link))))
    } else if !is_external(uri) {
        PdfAction::Launch(FileSpec::Path(clean_path(&decode(uri))))
    } else {
        PdfAction::Uri(uri.to_owned())
    };
    Some(action)
}

/// A scheme of at least three characters; shorter ones are drive letters.
fn is_external(uri: &str) -> bool {
    let Some((scheme, _)) = uri.split_once(':') else {
        return false;
    };
    let bytes = scheme.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

fn is_pdf_path(path: &str) -> bool {
    path.get(path.len().saturating_sub(4)..)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf"))
}

fn strip_prefix_icase<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .and_then(|_| s.get(prefix.len()..))
}

fn decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8().unwrap_or(Cow::Borrowed(s))
}

/// Drops `.` and empty segments and folds `..` where it can.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    let mut leading_up = 0usize;
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.len() > leading_up => {
                parts.pop();
            }
            ".." if !rooted => {
                parts.push("..");
                leading_up += 1;
            }
            ".." => {}
            part => parts.push(part),
        }
    }
    match (rooted, parts.is_empty()) {
        (true, _) => format!("/{}", parts.join("/")),
        (false, true) => ".".to_owned(),
        (false, false) => parts.join("/"),
    }
}

#[derive(Debug, PartialEq)]
enum Fragment {
    Empty,
    Explicit(u32, DestinationKind),
    Named(String),
    UnknownKeys,
}

/// Reads `page=`, `nameddest=`, `view=`, `zoom=` and `viewrect=` pairs.
/// `page` and `nameddest` override each other, last one wins. A fragment
/// with no pairs at all is a bare named destination.
fn parse_fragment(params: &str) -> Fragment {
    if params.is_empty() {
        return Fragment::Empty;
    }
    let mut page = None;
    let mut kind = None;
    let mut named = None;

    let pairs = params
        .split(['&', '#'])
        .map(str::trim)
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()));
    for (key, value) in pairs {
        if key.eq_ignore_ascii_case("page") {
            if let Ok(n) = value.parse::<i32>() {
                page = Some(u32::try_from(n.saturating_sub(1)).unwrap_or(0));
                kind = Some(DestinationKind::default());
                named = None;
                continue;
            }
        }
        if key.eq_ignore_ascii_case("nameddest") && !value.is_empty() {
            named = Some(value);
            page = None;
            kind = None;
            continue;
        }
        let parsed = if key.eq_ignore_ascii_case("viewrect") {
            parse_viewrect(value)
        } else if key.eq_ignore_ascii_case("zoom") {
            Some(parse_zoom(value))
        } else if key.eq_ignore_ascii_case("view") {
            parse_view(value)
        } else {
            return Fragment::UnknownKeys;
        };
        if parsed.is_some() {
            kind = parsed;
        }
    }

    if let Some(name) = named {
        return Fragment::Named(decode(name).into_owned());
    }
    match (page, kind) {
        (None, None) => Fragment::Named(decode(params).into_owned()),
        (page, kind) => Fragment::Explicit(page.unwrap_or_default(), kind.unwrap_or_default()),
    }
}

fn floats(s: &str) -> impl Iterator<Item = Option<f32>> + '_ {
    s.split(',')
        .map(|part| part.trim().parse::<f32>().ok().filter(|v| v.is_finite()))
}

/// `left,top,width,height`; a zero-sized rectangle is ignored.
fn parse_viewrect(s: &str) -> Option<DestinationKind> {
    let mut it = floats(s);
    let (x, y, w, h) = (it.next()??, it.next()??, it.next()??, it.next()??);
    if w == 0.0 || h == 0.0 {
        return None;
    }
    Some(DestinationKind::FitR {
        left: x,
        bottom: y,
        right: x + w,
        top: y + h,
    })
}

/// `scale[,left,top]`; a scale of zero or less means 100%.
fn parse_zoom(s: &str) -> DestinationKind {
    let mut it = floats(s);
    let zoom = it.next().flatten().map(|z| if z <= 0.0 { 100.0 } else { z });
    DestinationKind::XYZ {
        left: it.next().flatten(),
        top: it.next().flatten(),
        zoom,
    }
}

fn parse_view(s: &str) -> Option<DestinationKind> {
    let mut parts = s.split(',').map(str::trim);
    let name = parts.next().filter(|name| !name.is_empty())?;
    let mut arg = || parts.next().and_then(|v| v.parse::<f32>().ok()).filter(|v| v.is_finite());
    let is = |expected: &str| name.eq_ignore_ascii_case(expected);
    if is("Fit") {
        Some(DestinationKind::Fit)
    } else if is("FitB") {
        Some(DestinationKind::FitB)
    } else if is("FitH") {
        Some(DestinationKind::FitH { top: arg() })
    } else if is("FitBH") {
        Some(DestinationKind::FitBH { top: arg() })
    } else if is("FitV") {
        Some(DestinationKind::FitV { left: arg() })
    } else if is("FitBV") {
        Some(DestinationKind::FitBV { left: arg() })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goto(page: u32, kind: DestinationKind) -> PdfAction {
        PdfAction::GoTo(PdfDestination::Page { page, kind })
    }

    #[test]
    fn test_format_internal_links() {
        assert_eq!(goto(0, DestinationKind::default()).to_uri(), "#page=1");
        assert_eq!(goto(4, DestinationKind::Fit).to_uri(), "#page=5&view=Fit");
        assert_eq!(
            goto(0, DestinationKind::FitH { top: Some(500.0) }).to_uri(),
            "#page=1&view=FitH,500"
        );
        let xyz = DestinationKind::XYZ {
            left: Some(100.0),
            top: None,
            zoom: Some(150.0),
        };
        assert_eq!(goto(2, xyz).to_uri(), "#page=3&zoom=150,100,nan");
        let named = PdfAction::GoTo(PdfDestination::Named("Name With Spaces/ä".into()));
        assert_eq!(named.to_uri(), "#nameddest=Name%20With%20Spaces%2F%C3%A4");
        assert_eq!(
            PdfAction::GoTo(PdfDestination::Named("a-b_c.d!e~f*g'h(i)j".into())).to_uri(),
            "#nameddest=a-b_c.d!e~f*g'h(i)j"
        );
    }

    #[test]
    fn test_format_external_links() {
        let launch = PdfAction::Launch(FileSpec::Path("/path with spaces.pdf".into()));
        assert_eq!(launch.to_uri(), "file:///path%20with%20spaces.pdf#page=1");
        assert_eq!(
            PdfAction::Launch(FileSpec::Path("docs/readme.txt".into())).to_uri(),
            "file:docs/readme.txt#page=1"
        );
        let remote = PdfAction::GoToR {
            file: FileSpec::Url("https://example.com/doc.pdf#frag".into()),
            dest: PdfDestination::Page {
                page: 1,
                kind: DestinationKind::Fit,
            },
        };
        assert_eq!(remote.to_uri(), "https://example.com/doc.pdf#frag&page=2&view=Fit");
        assert_eq!(PdfAction::Uri("mailto:user@example.com".into()).to_uri(), "mailto:user@example.com");
    }

    #[test]
    fn test_parse_internal_links() {
        assert_eq!(PdfAction::parse("#page=3&view=FitV,20"), Some(goto(2, DestinationKind::FitV { left: Some(20.0) })));
        assert_eq!(PdfAction::parse("#page=0"), Some(goto(0, DestinationKind::default())));
        assert_eq!(
            PdfAction::parse("#nameddest=Chapter%201"),
            Some(PdfAction::GoTo(PdfDestination::Named("Chapter 1".into())))
        );
        assert_eq!(
            PdfAction::parse("#intro"),
            Some(PdfAction::GoTo(PdfDestination::Named("intro".into())))
        );
        // Last of page / nameddest wins.
        assert_eq!(PdfAction::parse("#nameddest=x&page=2"), Some(goto(1, DestinationKind::default())));
        assert_eq!(PdfAction::parse(""), None);
        assert_eq!(PdfAction::parse("#"), None);
    }

    #[test]
    fn test_parse_view_parameters() {
        let zoom = PdfAction::parse("#page=1&zoom=0,10,20").unwrap();
        assert_eq!(
            zoom,
            goto(
                0,
                DestinationKind::XYZ {
                    left: Some(10.0),
                    top: Some(20.0),
                    zoom: Some(100.0)
                }
            )
        );
        let rect = PdfAction::parse("#page=2&viewrect=50,100,150,200").unwrap();
        assert_eq!(
            rect,
            goto(
                1,
                DestinationKind::FitR {
                    left: 50.0,
                    bottom: 100.0,
                    right: 200.0,
                    top: 300.0
                }
            )
        );
        // A flat rectangle leaves the page's default framing.
        assert_eq!(PdfAction::parse("#page=1&viewrect=1,2,0,4"), Some(goto(0, DestinationKind::default())));
    }

    #[test]
    fn test_parse_external_links() {
        assert_eq!(
            PdfAction::parse("file:../a/./b/../report.pdf#page=2"),
            Some(PdfAction::GoToR {
                file: FileSpec::Path("../a/report.pdf".into()),
                dest: PdfDestination::Page {
                    page: 1,
                    kind: DestinationKind::default()
                },
            })
        );
        assert_eq!(
            PdfAction::parse("https://example.com/doc.pdf#nameddest=x"),
            Some(PdfAction::GoToR {
                file: FileSpec::Url("https://example.com/doc.pdf".into()),
                dest: PdfDestination::Named("x".into()),
            })
        );
        assert_eq!(
            PdfAction::parse("file:///tmp/notes%20v2.txt"),
            Some(PdfAction::Launch(FileSpec::Path("/tmp/notes v2.txt".into())))
        );
        assert_eq!(
            PdfAction::parse("C:/data/sheet.xls"),
            Some(PdfAction::Launch(FileSpec::Path("C:/data/sheet.xls".into())))
        );
        assert_eq!(
            PdfAction::parse("https://mupdf.com"),
            Some(PdfAction::Uri("https://mupdf.com".into()))
        );
        // Extra open parameters keep the whole URI.
        assert_eq!(
            PdfAction::parse("doc.pdf#page=1&search=word"),
            Some(PdfAction::Uri("doc.pdf#page=1&search=word".into()))
        );
    }

    #[test]
    fn test_formatted_links_parse_back() {
        let actions = [
            goto(3, DestinationKind::FitBH { top: Some(12.5) }),
            PdfAction::GoTo(PdfDestination::Named("章节".into())),
            PdfAction::GoToR {
                file: FileSpec::Path("other.pdf".into()),
                dest: PdfDestination::Named("Chapter1".into()),
            },
        ];
        for action in actions {
            assert_eq!(PdfAction::parse(&action.to_uri()), Some(action));
        }
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a/../../b//c/."), "/b/c");
        assert_eq!(clean_path("../../x"), "../../x");
        assert_eq!(clean_path("a/.."), ".");
        assert_eq!(clean_path("/"), "/");
    }
}
