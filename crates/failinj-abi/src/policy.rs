//! One-shot injection decision.

use std::sync::atomic::Ordering;

use failinj_core::hash::HashEntry;

use crate::callsite;
use crate::db;
use crate::diag;
use crate::guard;
use crate::state;

/// Decide whether the current intercepted call should return its synthetic
/// failure.
///
/// At most one call per run ever answers `true`: the first one whose stack
/// fingerprint has never been seen in any run. The fingerprint is recorded
/// in the call-site table and the on-disk log before the shim returns, so
/// the site succeeds in every later run even if the target dies in the
/// error path we are about to exercise.
///
/// Callers check the reentrancy guard first; everything below runs with it
/// held, so nested intercepted calls (the database open, the allocations
/// the stack walk makes, the diagnostic prints) pass straight through to
/// the real symbols.
pub fn should_fail() -> bool {
    if state::HAS_FAILED.load(Ordering::Relaxed) {
        return false;
    }
    let Some(_guard) = guard::ForceLibc::enter() else {
        return false;
    };

    db::ensure_loaded();

    let Some(hash) = callsite::fingerprint() else {
        return false;
    };

    let already_known = {
        let mut tables = state::TABLES.lock();
        tables.callsite.insert(HashEntry::new(hash, None)).is_some()
    };
    if already_known {
        return false;
    }

    db::record(hash);
    diag::report(format_args!("Injecting failure at:\n"));
    diag::raw(&callsite::backtrace_string());
    diag::raw("\n");
    state::HAS_FAILED.store(true, Ordering::Relaxed);
    true
}
