//! Allocator shims: `malloc`, `calloc`, `realloc`, `reallocarray`, `free`.
//!
//! Acquisitions that can fail are injection points (ENOMEM); successful
//! ones are tracked in the allocation ledger keyed by pointer value.
//! `free` cannot fail, so it only updates the ledger. While the symbol
//! resolver is running, `malloc`/`calloc` serve from the bootstrap arena,
//! and arena pointers never reach the real allocator.

use std::ffi::c_void;
use std::ptr;

use failinj_core::ignore;

use crate::early;
use crate::guard;
use crate::ledger::{self, Ledger};
use crate::macros::real_fn;
use crate::policy;
use crate::util;

// ---------------------------------------------------------------------------
// malloc
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(size: usize) -> *mut c_void {
    if guard::early_alloc_active() {
        return early::alloc(size);
    }
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    let real = real_fn!(malloc: unsafe extern "C" fn(usize) -> *mut c_void);
    let ret = unsafe { real(size) };
    if !ret.is_null() {
        ledger::track_create(ret as u64, Ledger::Allocation);
    }
    ret
}

// ---------------------------------------------------------------------------
// calloc
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn calloc(nmemb: usize, size: usize) -> *mut c_void {
    if guard::early_alloc_active() {
        // The arena is zero-initialized and never recycled, so this is
        // already calloc-shaped.
        return match nmemb.checked_mul(size) {
            Some(total) => early::alloc(total),
            None => ptr::null_mut(),
        };
    }
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    let real = real_fn!(calloc: unsafe extern "C" fn(usize, usize) -> *mut c_void);
    let ret = unsafe { real(nmemb, size) };
    if !ret.is_null() {
        ledger::track_create(ret as u64, Ledger::Allocation);
    }
    ret
}

// ---------------------------------------------------------------------------
// realloc
// ---------------------------------------------------------------------------

fn realloc_untracked(key: u64) -> String {
    format!("Attempted to realloc untracked pointer {key:#x} at:\n")
}

/// Ledger bookkeeping shared by the realloc family. The old key is
/// consumed first, then the new one is tracked; when the real call frees
/// in place (`size == 0` returning null), only the consumption happens.
fn track_realloc(old: *mut c_void, new: *mut c_void, freed_in_place: bool, message: fn(u64) -> String) {
    if !new.is_null() {
        if !old.is_null() {
            ledger::track_destroy(old as u64, Ledger::Allocation, &ignore::UNTRACKED_FREES, message);
        }
        ledger::track_create(new as u64, Ledger::Allocation);
    } else if freed_in_place && !old.is_null() {
        ledger::track_destroy(old as u64, Ledger::Allocation, &ignore::UNTRACKED_FREES, message);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    if early::contains(ptr) {
        // Bootstrap memory is never moved or reclaimed.
        return ptr;
    }
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    let real = real_fn!(realloc: unsafe extern "C" fn(*mut c_void, usize) -> *mut c_void);
    let ret = unsafe { real(ptr, size) };
    track_realloc(ptr, ret, size == 0, realloc_untracked);
    ret
}

// ---------------------------------------------------------------------------
// reallocarray
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn reallocarray(ptr: *mut c_void, nmemb: usize, size: usize) -> *mut c_void {
    if early::contains(ptr) {
        return ptr;
    }
    if !guard::in_libc() && policy::should_fail() {
        util::set_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    let real =
        real_fn!(reallocarray: unsafe extern "C" fn(*mut c_void, usize, usize) -> *mut c_void);
    let ret = unsafe { real(ptr, nmemb, size) };
    track_realloc(ptr, ret, nmemb == 0 || size == 0, |key| {
        format!("Attempted to reallocarray untracked pointer {key:#x} at:\n")
    });
    ret
}

// ---------------------------------------------------------------------------
// free
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    if ptr.is_null() || early::contains(ptr) {
        return;
    }
    let real = real_fn!(free: unsafe extern "C" fn(*mut c_void));
    unsafe { real(ptr) };
    ledger::track_destroy(ptr as u64, Ledger::Allocation, &ignore::UNTRACKED_FREES, |key| {
        format!("Attempted to free untracked pointer {key:#x} at:\n")
    });
}
