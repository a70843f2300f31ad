//! Descriptor shims: `creat`, `open`, `openat`, `close`, `read`, `write`.
//!
//! Open-family successes are tracked in the fd ledger. `close` releases
//! its entry *before* forwarding, and only a successful real close can be
//! turned into a synthetic failure — the descriptor is genuinely released
//! either way, so an injected close failure never leaks it.

use std::ffi::{c_char, c_int, c_uint, c_void};

use failinj_core::ignore;

use crate::guard;
use crate::ledger::{self, Ledger};
use crate::macros::real_fn;
use crate::policy;
use crate::util;

// ---------------------------------------------------------------------------
// creat
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn creat(pathname: *const c_char, mode: libc::mode_t) -> c_int {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EACCES);
        return -1;
    }
    let real = real_fn!(creat: unsafe extern "C" fn(*const c_char, libc::mode_t) -> c_int);
    let fd = unsafe { real(pathname, mode) };
    if fd != -1 {
        ledger::track_create(fd as u64, Ledger::Fd);
    }
    fd
}

// ---------------------------------------------------------------------------
// open / openat
// ---------------------------------------------------------------------------

// The mode argument only exists in the variadic area when the call may
// create the file; reading it otherwise would read garbage.
#[inline]
fn wants_mode(flags: c_int) -> bool {
    flags & (libc::O_CREAT | libc::O_TMPFILE) != 0
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn open(pathname: *const c_char, flags: c_int, mut args: ...) -> c_int {
    let mode: c_uint = if wants_mode(flags) {
        unsafe { args.next_arg::<c_uint>() }
    } else {
        0
    };
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EACCES);
        return -1;
    }
    let real = real_fn!(open: unsafe extern "C" fn(*const c_char, c_int, ...) -> c_int);
    let fd = unsafe { real(pathname, flags, mode) };
    if fd != -1 {
        ledger::track_create(fd as u64, Ledger::Fd);
    }
    fd
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn openat(
    dirfd: c_int,
    pathname: *const c_char,
    flags: c_int,
    mut args: ...
) -> c_int {
    let mode: c_uint = if wants_mode(flags) {
        unsafe { args.next_arg::<c_uint>() }
    } else {
        0
    };
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EACCES);
        return -1;
    }
    let real = real_fn!(openat: unsafe extern "C" fn(c_int, *const c_char, c_int, ...) -> c_int);
    let fd = unsafe { real(dirfd, pathname, flags, mode) };
    if fd != -1 {
        ledger::track_create(fd as u64, Ledger::Fd);
    }
    fd
}

// ---------------------------------------------------------------------------
// close
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn close(fd: c_int) -> c_int {
    // The ledger reflects the caller's intent to release even if the real
    // close is about to fail.
    ledger::track_destroy(fd as u64, Ledger::Fd, &ignore::UNTRACKED_CLOSES, |key| {
        format!("Attempted to close untracked file descriptor {key} at:\n")
    });
    let real = real_fn!(close: unsafe extern "C" fn(c_int) -> c_int);
    let ret = unsafe { real(fd) };
    if ret == 0 && !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EDQUOT);
        return -1;
    }
    ret
}

// ---------------------------------------------------------------------------
// read / write
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn read(fd: c_int, buf: *mut c_void, count: usize) -> isize {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::EIO);
        return -1;
    }
    let real = real_fn!(read: unsafe extern "C" fn(c_int, *mut c_void, usize) -> isize);
    unsafe { real(fd, buf, count) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn write(fd: c_int, buf: *const c_void, count: usize) -> isize {
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOSPC);
        return -1;
    }
    let real = real_fn!(write: unsafe extern "C" fn(c_int, *const c_void, usize) -> isize);
    unsafe { real(fd, buf, count) }
}
