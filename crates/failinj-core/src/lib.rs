//! # failinj-core
//!
//! Process-state-free logic for the failinj fault-injection interceptor.
//!
//! The interceptor proper (`failinj-abi`) is a preloaded cdylib full of
//! global state and `extern "C"` shims; everything that can be expressed as
//! a pure function over explicit inputs lives here instead, where it can be
//! unit-tested without an `LD_PRELOAD` environment:
//!
//! - [`hash`]: the DJB2 call-site fold and the fixed-size chained tables
//!   that back the call-site history and the three resource ledgers.
//! - [`frame`]: `name+0xoffset` frame-label formatting shared by the
//!   fingerprint fold and the stored backtrace strings.
//! - [`db`]: the persistence-log codec (raw host-endian `u64` records).
//! - [`config`]: environment variable names, defaults, and exit-status
//!   parsing.
//! - [`ignore`]: skip-injection and leak/untracked-release suppression
//!   rules.

#![deny(unsafe_code)]

pub mod config;
pub mod db;
pub mod frame;
pub mod hash;
pub mod ignore;
