//! Prints through stdio and exits without tearing the stream down. The C
//! library's output buffer (allocated in `_IO_file_doallocate` on first
//! use) stays live until process exit; the interceptor's built-in
//! exemption has to keep that from counting as a leak.

#![no_main]

use std::ffi::{c_char, c_int};

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    let x = unsafe { libc::strdup(c"OK".as_ptr()) };
    if x.is_null() {
        return 1;
    }
    unsafe {
        libc::printf(c"It's %s!\n".as_ptr(), x);
        libc::free(x.cast());
    }
    0
}
