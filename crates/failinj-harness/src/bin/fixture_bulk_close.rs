//! Opens two streams and releases both through `fcloseall`.

#![no_main]

use std::ffi::{c_char, c_int};

unsafe extern "C" {
    fn fcloseall() -> c_int;
}

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    unsafe {
        let a = libc::fopen(c"/dev/null".as_ptr(), c"w".as_ptr());
        if a.is_null() {
            return 1;
        }
        let b = libc::fopen(c"/dev/null".as_ptr(), c"w".as_ptr());
        if b.is_null() {
            libc::fclose(a);
            return 1;
        }
        let msg = b"bulk";
        if libc::fwrite(msg.as_ptr().cast(), 1, msg.len(), a) != msg.len() {
            libc::fclose(a);
            libc::fclose(b);
            return 1;
        }
        if fcloseall() == libc::EOF {
            return 1;
        }
    }
    0
}
