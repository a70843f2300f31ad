//! Thread-local reentrancy flags.
//!
//! `force_libc` marks interceptor-internal code: any shim entered while it
//! is set must bypass injection and ledger updates and forward straight to
//! the real symbol. `use_early_allocator` routes allocations to the
//! bootstrap arena while the symbol resolver runs. Both are per-thread so
//! concurrent shims cannot disarm each other's guards.
//!
//! The cells are const-initialized and hold no destructor, so touching
//! them never allocates — including on a thread's very first intercepted
//! call.

use std::cell::Cell;

thread_local! {
    static FORCE_LIBC: Cell<bool> = const { Cell::new(false) };
    static USE_EARLY_ALLOCATOR: Cell<bool> = const { Cell::new(false) };
}

/// True while the calling thread is inside interceptor-internal code.
#[inline]
pub fn in_libc() -> bool {
    FORCE_LIBC.with(Cell::get)
}

/// True while allocations must be served from the bootstrap arena.
#[inline]
pub fn early_alloc_active() -> bool {
    USE_EARLY_ALLOCATOR.with(Cell::get)
}

/// RAII `force_libc` scope. `enter` yields `None` when the flag is already
/// set, so an outer scope is never cleared by a nested one.
pub struct ForceLibc {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ForceLibc {
    pub fn enter() -> Option<Self> {
        FORCE_LIBC.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(ForceLibc {
                    _not_send: std::marker::PhantomData,
                })
            }
        })
    }
}

impl Drop for ForceLibc {
    fn drop(&mut self) {
        FORCE_LIBC.with(|flag| flag.set(false));
    }
}

/// RAII `use_early_allocator` scope, held around `dlsym` calls.
pub struct EarlyAlloc {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl EarlyAlloc {
    pub fn enter() -> Option<Self> {
        USE_EARLY_ALLOCATOR.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(EarlyAlloc {
                    _not_send: std::marker::PhantomData,
                })
            }
        })
    }
}

impl Drop for EarlyAlloc {
    fn drop(&mut self) {
        USE_EARLY_ALLOCATOR.with(|flag| flag.set(false));
    }
}
