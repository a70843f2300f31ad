//! Terminal leak reporter.
//!
//! Runs from a `.fini_array` entry at normal process termination, after
//! the target's own cleanup has had its chance to release everything.
//! Whatever is still in the resource ledgers at that point is a leak.

use std::sync::atomic::Ordering;

use failinj_core::config;
use failinj_core::hash::HashTable;
use failinj_core::ignore::{self, SuppressRule};

use crate::diag;
use crate::guard;
use crate::state;

fn drain_leaks(table: &mut HashTable, rule: &'static SuppressRule, message: fn(u64) -> String) {
    for entry in table.drain() {
        let backtrace = entry.backtrace.as_deref().unwrap_or("");
        if rule.suppresses(backtrace) {
            continue;
        }
        state::FOUND_BUG.store(true, Ordering::Relaxed);
        diag::report(format_args!("{}", message(entry.hash)));
        diag::raw(backtrace);
    }
}

extern "C" fn check_leaks() {
    let _guard = guard::ForceLibc::enter();
    {
        let mut tables = state::TABLES.lock();
        drain_leaks(&mut tables.allocation, &ignore::MEM_LEAKS, |key| {
            format!("Possible memory leak for {key:#x} allocated at:\n")
        });
        drain_leaks(&mut tables.fd, &ignore::FD_LEAKS, |key| {
            format!("Possible file descriptor leak for {key} opened at:\n")
        });
        drain_leaks(&mut tables.file, &ignore::FILE_LEAKS, |key| {
            format!("Possible unclosed file for {key:#x} opened at:\n")
        });
    }
    if state::FOUND_BUG.load(Ordering::Relaxed) {
        // Already inside teardown; _exit forces the status without
        // re-entering the exit machinery.
        unsafe { libc::_exit(config::bug_found_status()) };
    }
}

#[unsafe(link_section = ".fini_array")]
#[used]
static CHECK_LEAKS: extern "C" fn() = check_leaks;
