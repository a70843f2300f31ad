//! End-to-end harness for the failinj interceptor.
//!
//! The fixture binaries under `src/bin/` are deliberately C-shaped: built
//! with `#![no_main]`, calling raw `libc`, so the only call sites the
//! interceptor sees are the ones the fixture spells out — no Rust runtime
//! startup allocating (and leaking) in the background.
//!
//! Tests drive a fixture through [`run_target`] with a scratch database,
//! or through [`run_until_converged`] to exhaust every injectable site
//! first and then assert on the behavior of a clean run.

pub mod artifacts;

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

pub use artifacts::preload_lib;

/// Marker every injection banner carries on stderr.
pub const INJECT_BANNER: &str = "FAILINJ: Injecting failure at:";

/// Outcome of one fixture run under the interceptor.
pub struct TargetRun {
    /// Exit code, or `None` when the run died on a signal (an injected
    /// failure in a startup path can legitimately crash the target).
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl TargetRun {
    /// Did this run inject a failure anywhere?
    pub fn injected(&self) -> bool {
        self.stderr.contains(INJECT_BANNER)
    }

    /// Count of diagnostics matching `needle` on stderr.
    pub fn diagnostics(&self, needle: &str) -> usize {
        self.stderr.matches(needle).count()
    }
}

/// Run `fixture` once under `LD_PRELOAD=libfailinj.so` against `db`.
pub fn run_target(fixture: &str, db: &Path, envs: &[(&str, &str)]) -> Result<TargetRun> {
    let lib = artifacts::preload_lib()?;
    let mut cmd = Command::new(fixture);
    cmd.env("LD_PRELOAD", &lib).env("FAILINJ_DATABASE", db);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    let output = cmd
        .output()
        .with_context(|| format!("spawning fixture {fixture}"))?;
    Ok(TargetRun {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Fingerprints currently recorded in `db`, duplicates included. A missing
/// file reads as empty (the interceptor creates it on first use).
pub fn read_db(db: &Path) -> Result<Vec<u64>> {
    let file = match std::fs::File::open(db) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("opening {}", db.display())),
    };
    Ok(failinj_core::db::snapshot(file)?)
}

/// Run `fixture` repeatedly until a run records no new call site, i.e.
/// every reachable injection point is already in the database. Returns the
/// number of injecting runs that came first, plus the clean run itself.
///
/// Convergence is judged by database growth rather than by stderr banners:
/// the database is flushed before the synthetic error is even returned,
/// while a banner can be lost when the injected operation had already torn
/// down stderr (`fcloseall`) or the target dies mid-write.
pub fn run_until_converged(
    fixture: &str,
    db: &Path,
    envs: &[(&str, &str)],
    max_runs: usize,
) -> Result<(usize, TargetRun)> {
    let mut before = read_db(db)?.len();
    for injected_runs in 0..max_runs {
        let run = run_target(fixture, db, envs)?;
        let after = read_db(db)?.len();
        if after == before {
            return Ok((injected_runs, run));
        }
        before = after;
    }
    bail!(
        "fixture {fixture} still injecting after {max_runs} runs ({} recorded sites)",
        read_db(db)?.len()
    )
}
