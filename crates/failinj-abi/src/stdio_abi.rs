//! Stream shims: `fopen`, `fdopen`, `freopen`, `fmemopen`, `tmpfile`,
//! `fclose`, `fcloseall`, `fwrite`, `fflush`.
//!
//! Stream handles are tracked in the file ledger keyed by address.
//! `fdopen` hands ownership of the descriptor to the stream, so its fd
//! entry is popped; `freopen` consumes the old stream and tracks whatever
//! the real call returns. `fread` is deliberately not shimmed: its error
//! indicator cannot be set from user code, so an injected failure would be
//! indistinguishable from a short read.

use std::ffi::{c_char, c_int, c_void};
use std::ptr;

use failinj_core::ignore;

use crate::guard;
use crate::ledger::{self, Ledger};
use crate::macros::real_fn;
use crate::policy;
use crate::state;
use crate::util;

// ---------------------------------------------------------------------------
// fopen / fdopen / freopen / fmemopen / tmpfile
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fopen(pathname: *const c_char, mode: *const c_char) -> *mut libc::FILE {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EACCES);
        return ptr::null_mut();
    }
    let real =
        real_fn!(fopen: unsafe extern "C" fn(*const c_char, *const c_char) -> *mut libc::FILE);
    let stream = unsafe { real(pathname, mode) };
    if !stream.is_null() {
        ledger::track_create(stream as u64, Ledger::File);
    }
    stream
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fdopen(fd: c_int, mode: *const c_char) -> *mut libc::FILE {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EPERM);
        return ptr::null_mut();
    }
    let real = real_fn!(fdopen: unsafe extern "C" fn(c_int, *const c_char) -> *mut libc::FILE);
    let stream = unsafe { real(fd, mode) };
    if !stream.is_null() {
        ledger::track_create(stream as u64, Ledger::File);
        // The stream owns the descriptor now.
        ledger::track_destroy(fd as u64, Ledger::Fd, &ignore::UNTRACKED_FCLOSES, |key| {
            format!("Attempted to fdopen untracked file descriptor {key} at:\n")
        });
    }
    stream
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn freopen(
    pathname: *const c_char,
    mode: *const c_char,
    stream: *mut libc::FILE,
) -> *mut libc::FILE {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EPERM);
        return ptr::null_mut();
    }
    let real = real_fn!(
        freopen:
            unsafe extern "C" fn(*const c_char, *const c_char, *mut libc::FILE) -> *mut libc::FILE
    );
    let ret = unsafe { real(pathname, mode, stream) };
    if !ret.is_null() {
        // Old handle first, then the returned one: they are usually the
        // same address, and the other order would untrack it immediately.
        ledger::track_destroy(stream as u64, Ledger::File, &ignore::UNTRACKED_FCLOSES, |key| {
            format!("Attempted to freopen untracked file {key:#x} at:\n")
        });
        ledger::track_create(ret as u64, Ledger::File);
    }
    ret
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fmemopen(
    buf: *mut c_void,
    size: usize,
    mode: *const c_char,
) -> *mut libc::FILE {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    let real = real_fn!(
        fmemopen: unsafe extern "C" fn(*mut c_void, usize, *const c_char) -> *mut libc::FILE
    );
    let stream = unsafe { real(buf, size, mode) };
    if !stream.is_null() {
        ledger::track_create(stream as u64, Ledger::File);
    }
    stream
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn tmpfile() -> *mut libc::FILE {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EROFS);
        return ptr::null_mut();
    }
    let real = real_fn!(tmpfile: unsafe extern "C" fn() -> *mut libc::FILE);
    let stream = unsafe { real() };
    if !stream.is_null() {
        ledger::track_create(stream as u64, Ledger::File);
    }
    stream
}

// ---------------------------------------------------------------------------
// fclose / fcloseall
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fclose(stream: *mut libc::FILE) -> c_int {
    ledger::track_destroy(stream as u64, Ledger::File, &ignore::UNTRACKED_FCLOSES, |key| {
        format!("Attempted to fclose untracked file {key:#x} at:\n")
    });
    let real = real_fn!(fclose: unsafe extern "C" fn(*mut libc::FILE) -> c_int);
    let ret = unsafe { real(stream) };
    if ret == 0 && !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOSPC);
        return libc::EOF;
    }
    ret
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fcloseall() -> c_int {
    {
        let _guard = guard::ForceLibc::enter();
        state::TABLES.lock().file.drain().for_each(drop);
    }
    let real = real_fn!(fcloseall: unsafe extern "C" fn() -> c_int);
    let ret = unsafe { real() };
    if ret == 0 && !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOSPC);
        return libc::EOF;
    }
    ret
}

// ---------------------------------------------------------------------------
// fwrite / fflush
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwrite(
    ptr: *const c_void,
    size: usize,
    nmemb: usize,
    stream: *mut libc::FILE,
) -> usize {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOSPC);
        return 0;
    }
    let real = real_fn!(
        fwrite: unsafe extern "C" fn(*const c_void, usize, usize, *mut libc::FILE) -> usize
    );
    unsafe { real(ptr, size, nmemb, stream) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fflush(stream: *mut libc::FILE) -> c_int {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOSPC);
        return libc::EOF;
    }
    let real = real_fn!(fflush: unsafe extern "C" fn(*mut libc::FILE) -> c_int);
    unsafe { real(stream) }
}
