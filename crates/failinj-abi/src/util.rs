//! Shared helpers for the shim modules.

use std::ffi::c_int;

/// Set the caller-visible errno.
#[inline]
pub(crate) fn set_errno(val: c_int) {
    // SAFETY: __errno_location returns the calling thread's errno slot.
    unsafe { *libc::__errno_location() = val };
}
