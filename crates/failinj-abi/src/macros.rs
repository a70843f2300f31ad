//! Helper macro for binding real symbols at shim call sites.

/// Bind and return the next definition of `$name` in the interposition
/// chain as a typed function pointer.
///
/// Each expansion site owns one `AtomicPtr` slot, filled on first use via
/// `dlsym(RTLD_NEXT)` and short-circuited afterwards. Plain relaxed loads
/// and stores are all the synchronization needed: racing resolvers write
/// the same address.
///
/// ```ignore
/// let real = real_fn!(malloc: unsafe extern "C" fn(usize) -> *mut c_void);
/// let ret = unsafe { real(size) };
/// ```
macro_rules! real_fn {
    ($name:ident : $fnty:ty) => {{
        static SLOT: ::std::sync::atomic::AtomicPtr<::std::ffi::c_void> =
            ::std::sync::atomic::AtomicPtr::new(::std::ptr::null_mut());
        let mut sym = SLOT.load(::std::sync::atomic::Ordering::Relaxed);
        if sym.is_null() {
            sym = $crate::real::next_symbol(concat!(stringify!($name), "\0"));
            SLOT.store(sym, ::std::sync::atomic::Ordering::Relaxed);
        }
        // SAFETY: the slot holds the next definition of `$name`, whose ABI
        // is `$fnty`.
        unsafe { ::std::mem::transmute::<*mut ::std::ffi::c_void, $fnty>(sym) }
    }};
}

pub(crate) use real_fn;
