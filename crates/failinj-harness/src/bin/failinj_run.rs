//! Campaign runner: drive a target under the interceptor until its
//! database stops growing, i.e. every reachable error path has been
//! exercised once.
//!
//! ```text
//! failinj-run --preload target/debug/libfailinj.so --database ./run.db -- ./a.out
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "failinj-run",
    about = "Run a command under the failinj interceptor until every injectable call site is exhausted"
)]
struct Args {
    /// Path to the built libfailinj.so.
    #[arg(long)]
    preload: PathBuf,

    /// Persistence database grown across runs.
    #[arg(long, default_value = "failinj.db")]
    database: PathBuf,

    /// Give up after this many runs.
    #[arg(long, default_value_t = 200)]
    max_runs: usize,

    /// Target command and its arguments.
    #[arg(required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

fn recorded_sites(path: &PathBuf) -> Result<usize> {
    match File::open(path) {
        Ok(f) => Ok(failinj_core::db::snapshot(f)?.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e).with_context(|| format!("opening {}", path.display())),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut before = recorded_sites(&args.database)?;
    for run in 1..=args.max_runs {
        let status = Command::new(&args.command[0])
            .args(&args.command[1..])
            .env("LD_PRELOAD", &args.preload)
            .env("FAILINJ_DATABASE", &args.database)
            .status()
            .with_context(|| format!("spawning {}", args.command[0]))?;

        let after = recorded_sites(&args.database)?;
        println!(
            "run {run}: exit {:?}, {after} recorded sites ({} new)",
            status.code(),
            after - before
        );
        if after == before {
            println!("converged after {run} runs");
            return Ok(());
        }
        before = after;
    }
    bail!("not converged after {} runs", args.max_runs)
}
