//! The campaign-runner CLI drives a target to convergence.

use std::process::Command;

use failinj_harness::preload_lib;
use tempfile::TempDir;

#[test]
fn runner_converges_and_reports_progress() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("failinj.db");
    let lib = preload_lib().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_failinj-run"))
        .args([
            "--preload",
            lib.to_str().unwrap(),
            "--database",
            db.to_str().unwrap(),
            "--max-runs",
            "100",
            "--",
            env!("CARGO_BIN_EXE_fixture_basic"),
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("converged after"), "stdout:\n{stdout}");
    assert!(db.exists());
}
