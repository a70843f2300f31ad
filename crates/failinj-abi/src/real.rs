//! Symbol resolution against the next object in the interposition chain.

use std::ffi::c_void;

use crate::diag;
use crate::guard;

/// Ask the dynamic linker for the next definition of a symbol.
///
/// `name_z` must be NUL-terminated (the `real_fn!` macro appends the
/// terminator at compile time). The early-allocator flag is held for the
/// duration so anything the resolver allocates lands in the bootstrap
/// arena. An unresolvable symbol leaves the interceptor unable to forward
/// the call at all, which is fatal.
pub fn next_symbol(name_z: &'static str) -> *mut c_void {
    let _early = guard::EarlyAlloc::enter();
    // SAFETY: name_z is a static NUL-terminated string.
    let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, name_z.as_ptr().cast()) };
    if sym.is_null() {
        diag::fatal(format_args!(
            "Unable to resolve '{}'",
            &name_z[..name_z.len() - 1]
        ));
    }
    sym
}
