//! Closes a descriptor that was never opened.

#![no_main]

use std::ffi::{c_char, c_int};

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    unsafe { libc::close(88) };
    0
}
