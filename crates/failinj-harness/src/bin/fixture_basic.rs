//! Happy-path target: heap buffers, descriptor reads, a stream write.
//! Every operation checks its result and backs out, so each injected
//! failure exercises one error path and a clean run exits 0.

#![no_main]

use std::ffi::{c_char, c_int};

#[unsafe(no_mangle)]
extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    unsafe { run() }
}

unsafe fn run() -> c_int {
    let x = unsafe { libc::malloc(50) };
    if x.is_null() {
        unsafe { libc::perror(c"x allocation failed".as_ptr()) };
        return 1;
    }
    let y = unsafe { libc::malloc(50) };
    if y.is_null() {
        unsafe {
            libc::perror(c"y allocation failed".as_ptr());
            libc::free(x);
        }
        return 1;
    }

    let mut ret = 0;
    let fd = unsafe { libc::open(c"/dev/zero".as_ptr(), libc::O_RDONLY) };
    if fd == -1 {
        unsafe { libc::perror(c"Unable to open /dev/zero".as_ptr()) };
        ret = 1;
    } else {
        let rd = unsafe { libc::read(fd, x, 50) };
        if rd < 0 {
            unsafe { libc::perror(c"Failed to read /dev/zero".as_ptr()) };
            ret = 1;
        } else {
            let f = unsafe { libc::fopen(c"/dev/null".as_ptr(), c"w".as_ptr()) };
            if f.is_null() {
                unsafe { libc::perror(c"Unable to open /dev/null".as_ptr()) };
                ret = 1;
            } else {
                let wr = unsafe { libc::fwrite(x, 1, rd as usize, f) };
                if wr != rd as usize {
                    unsafe { libc::perror(c"Unable to write to /dev/null".as_ptr()) };
                    ret = 1;
                }
                if unsafe { libc::fflush(f) } == libc::EOF {
                    unsafe { libc::perror(c"Error while flushing /dev/null".as_ptr()) };
                    ret = 1;
                }
                if unsafe { libc::fclose(f) } == libc::EOF {
                    unsafe { libc::perror(c"Error while closing /dev/null".as_ptr()) };
                    ret = 1;
                }
            }
        }
        unsafe { libc::close(fd) };
    }

    unsafe {
        libc::free(y);
        libc::free(x);
    }
    if ret == 0 {
        let msg = b"OK\n";
        unsafe { libc::write(1, msg.as_ptr().cast(), msg.len()) };
    }
    ret
}
