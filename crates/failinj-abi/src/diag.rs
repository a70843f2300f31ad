//! Diagnostic stream and the interceptor-internal fatal path.
//!
//! Everything goes to standard error, tagged so it stands apart from
//! whatever the target was printing. No logging framework: the interceptor
//! must be able to report from inside a half-initialized or dying process,
//! so the only machinery allowed here is a raw stderr write.

use std::fmt;
use std::io::Write as _;

use failinj_core::config;

const TAG: &str = "\nFAILINJ: ";

/// Write a tagged diagnostic. The caller supplies the trailing newline.
pub fn report(args: fmt::Arguments<'_>) {
    let mut err = std::io::stderr().lock();
    let _ = err.write_all(TAG.as_bytes());
    let _ = err.write_fmt(args);
}

/// Write untagged text, used for backtrace blocks under a report line.
pub fn raw(text: &str) {
    let _ = std::io::stderr().lock().write_all(text.as_bytes());
}

/// Interceptor-internal fatal error: no useful work is possible (the
/// database cannot be opened, read, or written), so report and terminate
/// with the configured error status. Termination goes through `exit`, so
/// the leak destructor still runs and may escalate the status to
/// bug-found.
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    report(args);
    raw("\n");
    std::process::exit(config::exit_error_status())
}
