//! Process-wide interceptor state.
//!
//! A preloaded interceptor cannot avoid globals: every interposed symbol
//! must reach the same tables. Everything here is const-initialized so the
//! first intercepted call — which may arrive before the dynamic linker has
//! finished bootstrapping — performs no lazy setup and no allocation.

use std::fs::File;
use std::sync::atomic::AtomicBool;

use failinj_core::hash::HashTable;
use parking_lot::Mutex;

/// The call-site history plus the three resource ledgers. One lock guards
/// all four; shims never hold it across a nested intercepted call thanks
/// to the reentrancy guard.
pub struct Tables {
    /// Stack fingerprints of every call site ever injected. Grows
    /// monotonically within a run; mirrors the persistence log.
    pub callsite: HashTable,
    /// Live heap blocks, keyed by pointer value.
    pub allocation: HashTable,
    /// Open file descriptors, keyed by descriptor number.
    pub fd: HashTable,
    /// Open streams, keyed by handle address.
    pub file: HashTable,
}

impl Tables {
    const fn new() -> Self {
        Self {
            callsite: HashTable::new(),
            allocation: HashTable::new(),
            fd: HashTable::new(),
            file: HashTable::new(),
        }
    }
}

pub static TABLES: Mutex<Tables> = Mutex::new(Tables::new());

/// One-way latch: set once this run's single injection has happened. Later
/// would-be injections proceed as real calls. First writer wins; the latch
/// only ever becomes more restrictive.
pub static HAS_FAILED: AtomicBool = AtomicBool::new(false);

/// Set when any untracked release or leak has been reported; forces the
/// bug-found exit status at teardown.
pub static FOUND_BUG: AtomicBool = AtomicBool::new(false);

/// Persistence-log handle, opened and loaded on the first injection
/// decision.
pub static DATABASE: Mutex<Option<File>> = Mutex::new(None);
