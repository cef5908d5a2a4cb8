use parking_lot::Mutex;
use tracing::warn;

use mupdf_shim_sys as sys;

use crate::context::infallible_context;
use crate::document::Document;
use crate::error::{Error, Result};

/// A [`Document`] several threads can take turns on.
///
/// Documents and the pages, objects and annotations loaded from them are
/// tied to one thread, because the native document has no locking of its
/// own. `SharedDocument` owns the only reference to one and lends it out
/// under a lock; whatever a closure returns must be `Send`, so pages never
/// leave it. Render a page to a [`DisplayList`](crate::DisplayList) inside
/// the lock and replay the list outside.
///
/// If a closure manages to keep a reference to the document anyway (say in
/// a thread-local), the lock can no longer protect it: the document is
/// retired and every later call fails with `Precondition`.
pub struct SharedDocument {
    slot: Mutex<Slot>,
}

struct Slot {
    doc: Document,
    poisoned: bool,
}

// The document is only touched with the lock held, and only while this
// handle owns its single native reference.
unsafe impl Send for SharedDocument {}
unsafe impl Sync for SharedDocument {}

fn native_refs(doc: &Document) -> i32 {
    unsafe { sys::mupdf_document_refs(infallible_context(), doc.as_ptr()) }
}

impl SharedDocument {
    /// Takes over `doc`. Fails with `Precondition` while any clone, page or
    /// other view of it is still alive.
    pub fn new(doc: Document) -> Result<Self> {
        if native_refs(&doc) != 1 {
            return Err(Error::precondition("document is still referenced elsewhere"));
        }
        Ok(Self {
            slot: Mutex::new(Slot { doc, poisoned: false }),
        })
    }

    /// Runs `f` with exclusive access to the document.
    pub fn with<R: Send>(&self, f: impl FnOnce(&Document) -> Result<R>) -> Result<R> {
        let mut slot = self.slot.lock();
        if slot.poisoned {
            return Err(Error::precondition("document reference escaped the lock"));
        }
        let guard = EscapeCheck(&mut *slot);
        f(&guard.0.doc)
    }

    /// Gives the document back to the calling thread.
    pub fn into_inner(self) -> Result<Document> {
        let slot = self.slot.into_inner();
        if slot.poisoned {
            return Err(Error::precondition("document reference escaped the lock"));
        }
        Ok(slot.doc)
    }
}

/// Checks on the way out of [`SharedDocument::with`], panicking or not,
/// that the closure left no reference behind.
struct EscapeCheck<'s>(&'s mut Slot);

impl Drop for EscapeCheck<'_> {
    fn drop(&mut self) {
        let refs = native_refs(&self.0.doc);
        if refs != 1 {
            warn!(refs, "document reference escaped a shared lock; retiring it");
            self.0.poisoned = true;
        }
    }
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDocument").finish_non_exhaustive()
    }
}
