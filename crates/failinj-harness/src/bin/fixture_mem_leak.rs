//! Allocates a buffer and never frees it.

#![no_main]

use std::ffi::{c_char, c_int};

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    let p = unsafe { libc::malloc(100) };
    if p.is_null() { 1 } else { 0 }
}
