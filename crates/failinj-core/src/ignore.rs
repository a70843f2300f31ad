//! Suppression rules for injections, leak reports, and untracked-release
//! reports.
//!
//! Each bug class has a pair of environment variables: a space-separated
//! substring list that suppresses individual reports by backtrace match,
//! and an `_ALL_` switch that suppresses the whole class. The memory-leak
//! class additionally carries built-in exemptions for the C library's own
//! long-lived stream buffers.

use std::env;

/// True when any whitespace-separated token of `list` occurs in `haystack`.
#[must_use]
pub fn list_matches(haystack: &str, list: &str) -> bool {
    list.split_whitespace().any(|tok| haystack.contains(tok))
}

/// Skip-injection test for a single frame name.
#[must_use]
pub fn frame_skipped(name: &str, skip: &str) -> bool {
    list_matches(name, skip)
}

/// One bug class worth of suppression configuration.
pub struct SuppressRule {
    pub list_env: &'static str,
    pub all_env: &'static str,
    /// Substrings exempted unconditionally, regardless of environment.
    pub builtin: &'static [&'static str],
}

/// glibc allocates stream buffers in `_IO_file_doallocate` on first use and
/// keeps them until the stream dies; `fopen` itself allocates the `FILE`.
/// Both outlive most targets legitimately.
pub const MEM_LEAKS: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_MEM_LEAKS",
    all_env: "FAILINJ_IGNORE_ALL_MEM_LEAKS",
    builtin: &["_IO_file_doallocate", "fopen"],
};

pub const FD_LEAKS: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_FD_LEAKS",
    all_env: "FAILINJ_IGNORE_ALL_FD_LEAKS",
    builtin: &[],
};

pub const FILE_LEAKS: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_FILE_LEAKS",
    all_env: "FAILINJ_IGNORE_ALL_FILE_LEAKS",
    builtin: &[],
};

pub const UNTRACKED_FREES: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_UNTRACKED_FREES",
    all_env: "FAILINJ_IGNORE_ALL_UNTRACKED_FREES",
    builtin: &[],
};

pub const UNTRACKED_CLOSES: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_UNTRACKED_CLOSES",
    all_env: "FAILINJ_IGNORE_ALL_UNTRACKED_CLOSES",
    builtin: &[],
};

pub const UNTRACKED_FCLOSES: SuppressRule = SuppressRule {
    list_env: "FAILINJ_IGNORE_UNTRACKED_FCLOSES",
    all_env: "FAILINJ_IGNORE_ALL_UNTRACKED_FCLOSES",
    builtin: &[],
};

impl SuppressRule {
    /// Pure form: decide against explicit environment values.
    #[must_use]
    pub fn suppresses_with(&self, backtrace: &str, list: Option<&str>, all: bool) -> bool {
        if all {
            return true;
        }
        if self.builtin.iter().any(|tok| backtrace.contains(tok)) {
            return true;
        }
        match list {
            Some(l) => list_matches(backtrace, l),
            None => false,
        }
    }

    /// Decide against the live environment, re-read at every event as the
    /// report paths expect.
    #[must_use]
    pub fn suppresses(&self, backtrace: &str) -> bool {
        let all = env::var_os(self.all_env).is_some();
        let list = env::var(self.list_env).ok();
        self.suppresses_with(backtrace, list.as_deref(), all)
    }
}
