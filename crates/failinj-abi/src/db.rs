//! Persistence-log file wiring.
//!
//! The codec lives in `failinj_core::db`; this module owns the real file:
//! open-on-first-use in read+append mode, bulk load into the call-site
//! table, and durable appends. Any failure here is fatal — without the
//! database the one-shot protocol cannot make progress, and a silently
//! lost record would re-inject an already-exercised site forever.

use std::fs::OpenOptions;
use std::io::BufReader;

use failinj_core::config;
use failinj_core::db::{DbError, append, load};

use crate::diag;
use crate::state;

/// Open and load the database if this is the first injection decision.
/// Called with the reentrancy guard held.
pub fn ensure_loaded() {
    let mut handle = state::DATABASE.lock();
    if handle.is_some() {
        return;
    }
    let path = config::database_path();
    let file = match OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => diag::fatal(format_args!("Unable to open '{path}': {e}")),
    };
    let loaded: Result<usize, DbError> = {
        let mut tables = state::TABLES.lock();
        load(BufReader::new(&file), &mut tables.callsite)
    };
    if let Err(e) = loaded {
        diag::fatal(format_args!("{e}"));
    }
    *handle = Some(file);
}

/// Append a freshly injected fingerprint and flush it to disk before the
/// shim returns its synthetic error; the target may well crash in the
/// error path we are about to exercise.
pub fn record(hash: u64) {
    let mut handle = state::DATABASE.lock();
    let Some(file) = handle.as_mut() else {
        return;
    };
    if let Err(e) = append(&mut *file, hash) {
        diag::fatal(format_args!("{e}"));
    }
}
