//! End-to-end: untracked releases and leaks force the bug-found exit.

use std::path::PathBuf;

use failinj_harness::run_until_converged;
use tempfile::TempDir;

fn scratch_db(dir: &TempDir) -> PathBuf {
    dir.path().join("failinj.db")
}

#[test]
fn untracked_free_is_reported() {
    let dir = TempDir::new().unwrap();
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_untracked_free"),
        &scratch_db(&dir),
        &[],
        50,
    )
    .unwrap();

    assert!(
        run.stderr
            .contains("FAILINJ: Attempted to free untracked pointer 0x"),
        "stderr:\n{}",
        run.stderr
    );
    assert_eq!(run.status, Some(33));
}

#[test]
fn untracked_close_is_reported_with_descriptor_number() {
    let dir = TempDir::new().unwrap();
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_untracked_close"),
        &scratch_db(&dir),
        &[],
        50,
    )
    .unwrap();

    assert!(
        run.stderr
            .contains("FAILINJ: Attempted to close untracked file descriptor 88 at:"),
        "stderr:\n{}",
        run.stderr
    );
    assert_eq!(run.status, Some(33));
}

#[test]
fn descriptor_leak_is_reported_with_backtrace() {
    let dir = TempDir::new().unwrap();
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_fd_leak"),
        &scratch_db(&dir),
        &[],
        50,
    )
    .unwrap();

    assert!(
        run.stderr
            .contains("FAILINJ: Possible file descriptor leak for"),
        "stderr:\n{}",
        run.stderr
    );
    // The leak diagnostic carries the opening site's stored backtrace.
    let re = regex::Regex::new(r"Possible file descriptor leak for \d+ opened at:\n    \S").unwrap();
    assert!(re.is_match(&run.stderr), "stderr:\n{}", run.stderr);
    assert_eq!(run.status, Some(33));
}

#[test]
fn memory_leak_is_reported() {
    let dir = TempDir::new().unwrap();
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_mem_leak"),
        &scratch_db(&dir),
        &[],
        50,
    )
    .unwrap();

    assert!(
        run.stderr
            .contains("FAILINJ: Possible memory leak for 0x"),
        "stderr:\n{}",
        run.stderr
    );
    assert_eq!(run.status, Some(33));
}

#[test]
fn memory_leak_class_switch_suppresses() {
    let dir = TempDir::new().unwrap();
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_mem_leak"),
        &scratch_db(&dir),
        &[("FAILINJ_IGNORE_ALL_MEM_LEAKS", "1")],
        50,
    )
    .unwrap();

    assert_eq!(run.status, Some(0), "stderr:\n{}", run.stderr);
    assert!(!run.stderr.contains("Possible memory leak"));
}

#[test]
fn memory_leak_substring_list_suppresses() {
    let dir = TempDir::new().unwrap();
    // The leaked allocation happens under the fixture's `main`; a matching
    // substring in the backtrace suppresses just that report.
    let (_, run) = run_until_converged(
        env!("CARGO_BIN_EXE_fixture_mem_leak"),
        &scratch_db(&dir),
        &[("FAILINJ_IGNORE_MEM_LEAKS", "main")],
        50,
    )
    .unwrap();

    assert_eq!(run.status, Some(0), "stderr:\n{}", run.stderr);
    assert!(!run.stderr.contains("Possible memory leak"));
}
