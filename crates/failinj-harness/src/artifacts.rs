//! Cached interceptor builds for the end-to-end tests.
//!
//! The tests exercise real binaries under `LD_PRELOAD`, so they need the
//! built `libfailinj.so`, not an rlib — and the harness must not link the
//! interceptor crate itself, or its exported `malloc` would shadow the test
//! process's own allocator. Instead the cdylib is built through cargo on
//! first use and cached for the rest of the test process.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;

/// Build `libfailinj.so` (debug profile) once and return its path.
pub fn preload_lib() -> Result<PathBuf> {
    static LIB: OnceCell<PathBuf> = OnceCell::new();
    Ok(LIB.get_or_try_init(build_preload_lib)?.clone())
}

fn build_preload_lib() -> Result<PathBuf> {
    let output = Command::new(env!("CARGO"))
        .args(["build", "-p", "failinj-abi"])
        .output()
        .context("running `cargo build -p failinj-abi`")?;
    if !output.status.success() {
        bail!(
            "cargo build -p failinj-abi failed: status {:?}\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let path = artifact_dir()?.join("libfailinj.so");
    if !path.exists() {
        bail!("built interceptor not found at {}", path.display());
    }
    Ok(path)
}

/// Cargo's artifact directory, found by walking up from the running test
/// binary (`target/debug/deps/...`) to the `target` directory. Relies on
/// the binary not having been moved out of the build tree.
fn artifact_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("locating current test binary")?;
    for dir in exe.ancestors() {
        if dir.file_name().is_some_and(|n| n == "target") {
            return Ok(dir.join("debug"));
        }
    }
    bail!("no `target` directory above {}", exe.display())
}
