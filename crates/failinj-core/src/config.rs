//! Environment-driven configuration.
//!
//! Every knob is optional. The `FAILINJ_*` names are authoritative; the
//! `FAILCOV_*` names are accepted as fallbacks for databases and scripts
//! that predate the rename. Values are re-read where the original re-read
//! them (suppression lists at event time); nothing here caches.

use std::env;

pub const ENV_DATABASE: &str = "FAILINJ_DATABASE";
pub const ENV_DATABASE_COMPAT: &str = "FAILCOV_DATABASE";
pub const DEFAULT_DATABASE: &str = "failinj.db";

pub const ENV_EXIT_ERROR: &str = "FAILINJ_EXIT_ERROR";
pub const ENV_EXIT_ERROR_COMPAT: &str = "FAILCOV_EXIT_ERROR";
/// Exit status for interceptor-internal fatal errors.
pub const DEFAULT_EXIT_ERROR: i32 = 32;

pub const ENV_BUG_FOUND: &str = "FAILINJ_BUG_FOUND";
pub const ENV_BUG_FOUND_COMPAT: &str = "FAILCOV_BUG_FOUND";
/// Exit status forced at teardown when any bug was observed.
pub const DEFAULT_BUG_FOUND: i32 = 33;

/// Space-separated substrings; a frame name containing one discards the
/// whole call site.
pub const ENV_SKIP_INJECTION: &str = "FAILINJ_SKIP_INJECTION";

/// Parse an exit-status override with `strtol(_, _, 0)` semantics: optional
/// sign, `0x`/`0X` hex, leading-`0` octal, decimal otherwise. Trailing
/// garbage rejects the override entirely.
#[must_use]
pub fn parse_status(raw: &str) -> Option<i32> {
    let s = raw.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    if digits.is_empty() {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn status_from_env(primary: &str, compat: &str, default: i32) -> i32 {
    env::var(primary)
        .or_else(|_| env::var(compat))
        .ok()
        .and_then(|raw| parse_status(&raw))
        .unwrap_or(default)
}

#[must_use]
pub fn exit_error_status() -> i32 {
    status_from_env(ENV_EXIT_ERROR, ENV_EXIT_ERROR_COMPAT, DEFAULT_EXIT_ERROR)
}

#[must_use]
pub fn bug_found_status() -> i32 {
    status_from_env(ENV_BUG_FOUND, ENV_BUG_FOUND_COMPAT, DEFAULT_BUG_FOUND)
}

#[must_use]
pub fn database_path() -> String {
    env::var(ENV_DATABASE)
        .or_else(|_| env::var(ENV_DATABASE_COMPAT))
        .unwrap_or_else(|_| DEFAULT_DATABASE.to_owned())
}

#[must_use]
pub fn skip_list() -> Option<String> {
    env::var(ENV_SKIP_INJECTION).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal() {
        assert_eq!(parse_status("33"), Some(33));
        assert_eq!(parse_status(" 40 "), Some(40));
        assert_eq!(parse_status("0"), Some(0));
    }

    #[test]
    fn parse_signed() {
        assert_eq!(parse_status("-1"), Some(-1));
        assert_eq!(parse_status("+7"), Some(7));
    }

    #[test]
    fn parse_hex_and_octal() {
        assert_eq!(parse_status("0x21"), Some(0x21));
        assert_eq!(parse_status("0X21"), Some(0x21));
        assert_eq!(parse_status("041"), Some(0o41));
    }

    #[test]
    fn trailing_garbage_rejects() {
        assert_eq!(parse_status("33x"), None);
        assert_eq!(parse_status("0x"), None);
        assert_eq!(parse_status(""), None);
        assert_eq!(parse_status("abc"), None);
    }

    #[test]
    fn out_of_range_rejects() {
        assert_eq!(parse_status("99999999999"), None);
    }
}
