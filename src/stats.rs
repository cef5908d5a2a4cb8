//! Per-kind handle accounting.
//!
//! Every handle constructor and `Drop` reports here, so a test can check
//! that a scope released everything it created.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Colorspace,
    Buffer,
    Pixmap,
    Font,
    Image,
    StrokeState,
    Path,
    Text,
    Cookie,
    TextPage,
    DisplayList,
    Device,
    Page,
    Separations,
    Document,
    DocumentWriter,
    PdfDocument,
    PdfObject,
    PdfPage,
    PdfAnnotation,
    PdfGraftMap,
}

impl HandleKind {
    pub const COUNT: usize = 21;

    pub const ALL: [HandleKind; Self::COUNT] = [
        HandleKind::Colorspace,
        HandleKind::Buffer,
        HandleKind::Pixmap,
        HandleKind::Font,
        HandleKind::Image,
        HandleKind::StrokeState,
        HandleKind::Path,
        HandleKind::Text,
        HandleKind::Cookie,
        HandleKind::TextPage,
        HandleKind::DisplayList,
        HandleKind::Device,
        HandleKind::Page,
        HandleKind::Separations,
        HandleKind::Document,
        HandleKind::DocumentWriter,
        HandleKind::PdfDocument,
        HandleKind::PdfObject,
        HandleKind::PdfPage,
        HandleKind::PdfAnnotation,
        HandleKind::PdfGraftMap,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Counters for one handle kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HandleStats {
    /// Total handles ever created
    pub created: u64,
    /// Total handles dropped
    pub destroyed: u64,
    /// Handles currently alive
    pub current: u64,
    /// Highest value `current` has reached
    pub peak: u64,
}

impl HandleStats {
    const ZERO: HandleStats = HandleStats {
        created: 0,
        destroyed: 0,
        current: 0,
        peak: 0,
    };
}

static STATS: [Mutex<HandleStats>; HandleKind::COUNT] =
    [const { Mutex::new(HandleStats::ZERO) }; HandleKind::COUNT];

pub(crate) fn record_created(kind: HandleKind) {
    let mut stats = STATS[kind.index()].lock();
    stats.created += 1;
    stats.current += 1;
    if stats.current > stats.peak {
        stats.peak = stats.current;
    }
}

pub(crate) fn record_destroyed(kind: HandleKind) {
    let mut stats = STATS[kind.index()].lock();
    stats.destroyed += 1;
    stats.current = stats.current.saturating_sub(1);
}

/// Snapshot of the counters for `kind`.
pub fn handle_stats(kind: HandleKind) -> HandleStats {
    *STATS[kind.index()].lock()
}

/// Number of handles of every kind alive right now.
pub fn live_handles() -> u64 {
    HandleKind::ALL
        .iter()
        .map(|&kind| handle_stats(kind).current)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_kind_indices_are_dense() {
        for (i, kind) in HandleKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    #[serial]
    fn test_created_and_destroyed_balance() {
        let before = handle_stats(HandleKind::PdfGraftMap);
        record_created(HandleKind::PdfGraftMap);
        record_created(HandleKind::PdfGraftMap);
        let mid = handle_stats(HandleKind::PdfGraftMap);
        assert_eq!(mid.current, before.current + 2);
        assert!(mid.peak >= before.current + 2);

        record_destroyed(HandleKind::PdfGraftMap);
        record_destroyed(HandleKind::PdfGraftMap);
        let after = handle_stats(HandleKind::PdfGraftMap);
        assert_eq!(after.current, before.current);
        assert_eq!(after.created, before.created + 2);
        assert_eq!(after.destroyed, before.destroyed + 2);
    }
}
