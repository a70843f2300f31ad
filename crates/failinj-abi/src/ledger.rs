//! Resource tracking: create/destroy events for the three ledgers.

use std::sync::atomic::Ordering;

use failinj_core::hash::HashEntry;
use failinj_core::ignore::SuppressRule;

use crate::callsite;
use crate::diag;
use crate::guard;
use crate::state;

/// Which resource table an event belongs to.
#[derive(Clone, Copy)]
pub enum Ledger {
    Allocation,
    Fd,
    File,
}

impl Ledger {
    fn table(self, tables: &mut state::Tables) -> &mut failinj_core::hash::HashTable {
        match self {
            Ledger::Allocation => &mut tables.allocation,
            Ledger::Fd => &mut tables.fd,
            Ledger::File => &mut tables.file,
        }
    }
}

/// Record a successful acquisition. The acquiring backtrace is captured
/// eagerly: by the time a leak is reported the acquiring stack is long
/// gone. Double-tracking of an existing key is tolerated silently (the
/// first entry wins).
pub fn track_create(key: u64, ledger: Ledger) {
    let Some(_guard) = guard::ForceLibc::enter() else {
        return;
    };
    let entry = HashEntry::new(key, Some(callsite::backtrace_string()));
    let mut tables = state::TABLES.lock();
    ledger.table(&mut tables).insert(entry);
}

/// Record a release. A key with no ledger entry means the target released
/// something it never owned (double free, stray close); unless the rule
/// suppresses it, that is reported as a bug and the bug flag latches.
pub fn track_destroy(
    key: u64,
    ledger: Ledger,
    rule: &'static SuppressRule,
    message: fn(u64) -> String,
) {
    let Some(_guard) = guard::ForceLibc::enter() else {
        return;
    };
    let popped = {
        let mut tables = state::TABLES.lock();
        ledger.table(&mut tables).pop(key)
    };
    if popped.is_some() {
        return;
    }
    let backtrace = callsite::backtrace_string();
    if rule.suppresses(&backtrace) {
        return;
    }
    diag::report(format_args!("{}", message(key)));
    diag::raw(&backtrace);
    state::FOUND_BUG.store(true, Ordering::Relaxed);
}
