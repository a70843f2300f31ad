#![feature(c_variadic)]
// All extern "C" shims accept whatever the target hands the C library; the
// shims forward to the real definitions, so per-function safety docs would
// restate the libc contract.
#![allow(clippy::missing_safety_doc)]
//! # failinj-abi
//!
//! Fault-injection and resource-leak interceptor, built as a `cdylib`
//! (`libfailinj.so`) and loaded ahead of the C library with `LD_PRELOAD`.
//! Each exported shim shadows one failure-prone libc entry point.
//!
//! # Architecture
//!
//! ```text
//! target call -> shim (this crate) -> injection policy -> synthetic error
//!                                  \-> real symbol -> resource ledger -> return
//! ```
//!
//! On each *distinct* call site — identified by hashing the whole live
//! stack — the policy returns a synthetic failure exactly once, records the
//! site in a persistent database, and lets the site succeed in every later
//! run. Successful acquisitions are tracked in per-class ledgers; releases
//! pop them; whatever survives to process teardown is reported as a leak.
//!
//! The crate is reentrant by construction: a thread-local `force_libc`
//! flag marks every stretch of interceptor-internal code, and any shim
//! entered while it is set bypasses injection and tracking and simply
//! forwards to the real symbol. A 4096-byte bootstrap arena serves the
//! allocations the dynamic linker makes while we are still resolving the
//! real allocator.

mod macros;

pub mod callsite;
pub mod db;
pub mod diag;
pub mod early;
pub mod guard;
pub mod ledger;
pub mod policy;
pub mod real;
pub mod state;
pub mod util;

// Shim modules export #[no_mangle] symbols (malloc, free, open, ...) that
// would shadow the host allocator inside this crate's own test binary,
// causing infinite recursion. Gated out of test builds; the harness crate
// exercises them through the built cdylib instead.
#[cfg(not(test))]
pub mod io_abi;
#[cfg(not(test))]
pub mod malloc_abi;
#[cfg(not(test))]
pub mod report;
#[cfg(not(test))]
pub mod stdio_abi;
