//! Frees a heap block the interceptor never saw being allocated:
//! `posix_memalign` is not interposed, so the block is real heap memory
//! (safe to hand to the real `free`) with no ledger entry.

#![no_main]

use std::ffi::{c_char, c_int, c_void};
use std::ptr;

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    let mut p: *mut c_void = ptr::null_mut();
    if unsafe { libc::posix_memalign(&mut p, 64, 128) } != 0 {
        return 1;
    }
    unsafe { libc::free(p) };
    0
}
