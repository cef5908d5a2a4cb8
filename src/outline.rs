use mupdf_shim_sys as sys;

use crate::context::infallible_context;
use crate::handle::borrowed_str;
use crate::link::Location;

/// One entry of a document's table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub title: String,
    pub uri: Option<String>,
    /// Resolved destination, invalid when the entry points nowhere.
    pub location: Location,
    pub x: f32,
    pub y: f32,
    pub is_open: bool,
    pub children: Vec<Outline>,
}

impl Outline {
    /// Number of entries in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Outline::count).sum::<usize>()
    }
}

unsafe fn copy_siblings(mut cur: *mut sys::FzOutline) -> Vec<Outline> {
    let mut items = Vec::new();
    while !cur.is_null() {
        unsafe {
            let point = sys::mupdf_outline_point(cur);
            items.push(Outline {
                title: borrowed_str(sys::mupdf_outline_title(cur)).unwrap_or_default(),
                uri: borrowed_str(sys::mupdf_outline_uri(cur)),
                location: sys::mupdf_outline_page(cur).into(),
                x: point.x,
                y: point.y,
                is_open: sys::mupdf_outline_is_open(cur) != 0,
                children: copy_siblings(sys::mupdf_outline_down(cur)),
            });
            cur = sys::mupdf_outline_next(cur);
        }
    }
    items
}

/// Copies a native outline tree into owned values, then releases it.
///
/// # Safety
///
/// `head` must be null or an owned outline reference.
pub(crate) unsafe fn collect_outline(head: *mut sys::FzOutline) -> Vec<Outline> {
    let items = unsafe { copy_siblings(head) };
    if !head.is_null() {
        unsafe { sys::mupdf_drop_outline(infallible_context(), head) };
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, children: Vec<Outline>) -> Outline {
        Outline {
            title: title.into(),
            uri: None,
            location: Location::default(),
            x: 0.0,
            y: 0.0,
            is_open: false,
            children,
        }
    }

    #[test]
    fn test_subtree_len() {
        let tree = entry("root", vec![entry("a", vec![entry("a.1", vec![])]), entry("b", vec![])]);
        assert_eq!(tree.count(), 4);
    }

    #[test]
    fn test_collect_null_tree() {
        assert!(unsafe { collect_outline(std::ptr::null_mut()) }.is_empty());
    }
}
