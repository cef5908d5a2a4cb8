//! Lock table handed to the native library.
//!
//! MuPDF serialises access to its shared state (allocator, font cache, store
//! and glyph cache) through a small fixed set of numbered locks supplied by
//! the host. The table lives in a `Box` so its address stays put for the
//! lifetime of the base context.

use std::os::raw::{c_int, c_void};

use mupdf_shim_sys as sys;
use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as _;

pub const LOCK_MAX: usize = sys::MUPDF_LOCK_MAX;

pub(crate) struct LockTable {
    locks: [RawMutex; LOCK_MAX],
}

impl LockTable {
    pub fn new() -> Box<Self> {
        Box::new(Self {
            locks: [const { RawMutex::INIT }; LOCK_MAX],
        })
    }

    pub fn user_ptr(&self) -> *mut c_void {
        std::ptr::from_ref(self).cast_mut().cast()
    }

    fn get(&self, id: c_int) -> Option<&RawMutex> {
        usize::try_from(id).ok().and_then(|i| self.locks.get(i))
    }

    #[cfg(test)]
    pub fn is_locked(&self, id: usize) -> bool {
        self.locks[id].is_locked()
    }
}

/// `lock` callback. Out-of-range ids are ignored.
pub(crate) unsafe extern "C" fn lock(user: *mut c_void, id: c_int) {
    if user.is_null() {
        return;
    }
    let table = unsafe { &*user.cast::<LockTable>() };
    if let Some(mutex) = table.get(id) {
        mutex.lock();
    }
}

/// `unlock` callback. Only ever called by the thread that took the lock.
pub(crate) unsafe extern "C" fn unlock(user: *mut c_void, id: c_int) {
    if user.is_null() {
        return;
    }
    let table = unsafe { &*user.cast::<LockTable>() };
    if let Some(mutex) = table.get(id) {
        unsafe { mutex.unlock() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_table_matches_native_count() {
        let native = unsafe { sys::mupdf_lock_count() };
        assert!(native >= 1);
        assert!(native as usize <= LOCK_MAX);
    }

    #[test]
    fn test_callbacks_lock_and_unlock() {
        let table = LockTable::new();
        let user = table.user_ptr();
        for id in 0..LOCK_MAX {
            unsafe { lock(user, id as c_int) };
            assert!(table.is_locked(id));
            unsafe { unlock(user, id as c_int) };
            assert!(!table.is_locked(id));
        }
    }

    #[test]
    fn test_out_of_range_ids_are_ignored() {
        let table = LockTable::new();
        let user = table.user_ptr();
        unsafe {
            lock(user, -1);
            lock(user, LOCK_MAX as c_int);
            unlock(user, 99);
        }
        assert!((0..LOCK_MAX).all(|id| !table.is_locked(id)));
    }

    #[test]
    fn test_lock_is_exclusive_across_threads() {
        let table = LockTable::new();
        let user = table.user_ptr() as usize;
        unsafe { lock(user as *mut c_void, 2) };
        let contended = std::thread::spawn(move || {
            let table = unsafe { &*(user as *const LockTable) };
            table.locks[2].try_lock()
        })
        .join()
        .unwrap();
        assert!(!contended);
        unsafe { unlock(user as *mut c_void, 2) };
    }
}
