//! End-to-end: the progressive one-shot injection protocol.
//!
//! Repeated runs of the happy-path fixture against one database must
//! inject a different call site each time, grow the database by exactly
//! one record per injecting run, and converge to a run that injects
//! nothing, exits 0, and prints no diagnostics.

use std::path::PathBuf;

use failinj_harness::{INJECT_BANNER, TargetRun, read_db, run_target};
use tempfile::TempDir;

const FIXTURE: &str = env!("CARGO_BIN_EXE_fixture_basic");

fn scratch_db(dir: &TempDir) -> PathBuf {
    dir.path().join("failinj.db")
}

#[test]
fn first_run_injects_exactly_once() {
    let dir = TempDir::new().unwrap();
    let db = scratch_db(&dir);

    let run = run_target(FIXTURE, &db, &[]).unwrap();
    assert!(run.injected(), "stderr:\n{}", run.stderr);
    assert_eq!(
        run.diagnostics(INJECT_BANNER),
        1,
        "one injection per run, got:\n{}",
        run.stderr
    );
    assert_eq!(read_db(&db).unwrap().len(), 1);
}

#[test]
fn runs_grow_database_monotonically_until_convergence() {
    let dir = TempDir::new().unwrap();
    let db = scratch_db(&dir);

    let mut previous = 0usize;
    let mut clean: Option<TargetRun> = None;
    for _ in 0..100 {
        let run = run_target(FIXTURE, &db, &[]).unwrap();
        let now = read_db(&db).unwrap().len();
        assert!(now >= previous, "database shrank: {previous} -> {now}");
        if now == previous {
            clean = Some(run);
            break;
        }
        assert_eq!(now, previous + 1, "more than one site recorded in a run");
        previous = now;
    }

    let clean = clean.expect("fixture did not converge within 100 runs");
    assert_eq!(clean.status, Some(0), "stderr:\n{}", clean.stderr);
    assert_eq!(clean.stdout, "OK\n");
    assert!(
        !clean.stderr.contains("FAILINJ:"),
        "clean run printed diagnostics:\n{}",
        clean.stderr
    );

    // The happy path has several distinct injectable sites.
    assert!(previous >= 3, "only {previous} sites discovered");
}

#[test]
fn database_is_distinct_raw_records() {
    let dir = TempDir::new().unwrap();
    let db = scratch_db(&dir);

    for _ in 0..100 {
        let before = read_db(&db).unwrap().len();
        run_target(FIXTURE, &db, &[]).unwrap();
        if read_db(&db).unwrap().len() == before {
            break;
        }
    }

    let bytes = std::fs::read(&db).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(bytes.len() % 8, 0, "database must be whole 8-byte records");

    let records = read_db(&db).unwrap();
    let mut unique = records.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), records.len(), "duplicate fingerprints recorded");

    // Re-reading yields the same contents; nothing mutates the file at rest.
    assert_eq!(read_db(&db).unwrap(), records);
}

#[test]
fn skip_list_suppresses_all_injection() {
    let dir = TempDir::new().unwrap();
    let db = scratch_db(&dir);

    // Every call site the fixture spells out sits under its own `main`
    // frame, so skipping on it discards every site.
    let run = run_target(FIXTURE, &db, &[("FAILINJ_SKIP_INJECTION", "main")]).unwrap();
    assert!(!run.injected(), "stderr:\n{}", run.stderr);
    assert_eq!(run.status, Some(0));
    assert_eq!(run.stdout, "OK\n");
    assert!(read_db(&db).unwrap().is_empty());
}
