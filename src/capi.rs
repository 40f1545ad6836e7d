//! C ABI for [`Counter`].
//!
//! Exposes a counter to C callers through an opaque [`Contatore`] handle and
//! errno-style status codes. The matching header is `include/contatore.h`.
//!
//! | Status   | Meaning                                                     |
//! |----------|-------------------------------------------------------------|
//! | `0`      | success                                                     |
//! | `EINVAL` | null pointer, negative initial value, uninitialized counter |
//! | `ERANGE` | increment of a counter already at `INT_MAX`                 |
//! | `ENOMEM` | the handle could not be allocated                           |
//! | `EIO`    | a panic was caught at the boundary                          |
//!
//! After a failure, [`contatore_last_error`] returns a human readable message
//! for the calling thread.
//!
//! # Feature Flag
//!
//! This module requires the `capi` feature.
//!
//! # Example
//!
//! ```c
//! Contatore *counter = NULL;
//! if (contatore_new(&counter) != 0) { /* ENOMEM */ }
//!
//! contatore_initialize(counter, 42);
//! contatore_increment(counter);
//!
//! int value = 0;
//! contatore_read(counter, &value);   /* value == 43 */
//!
//! contatore_destroy(counter);
//! contatore_read(counter, &value);   /* EINVAL */
//! contatore_free(counter);
//! ```

use std::alloc::{self, Layout};
use std::any::Any;
use std::cell::RefCell;
use std::ffi::{c_char, c_int, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::{debug, warn};

use crate::counter::Counter;
use crate::error::CounterError;

/// Status returned by every C function on success.
pub const CONTATORE_OK: c_int = 0;

/// Opaque counter handle handed out to C callers.
///
/// Created with [`contatore_new`] and released with [`contatore_free`].
pub struct Contatore {
    counter: Counter<c_int>,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(message: impl Into<String>) {
    let message = CString::new(message.into()).unwrap_or_default();
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(message));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

/// Why a C call failed before producing a status code.
enum Failure {
    NullPointer(&'static str),
    OutOfMemory,
    Counter(CounterError),
}

impl From<CounterError> for Failure {
    fn from(err: CounterError) -> Self {
        Failure::Counter(err)
    }
}

/// Maps a counter error to the errno value reported across the C ABI.
pub fn status_code(err: &CounterError) -> c_int {
    match err {
        CounterError::InvalidArgument { .. } | CounterError::InvalidState => libc::EINVAL,
        CounterError::Overflow { .. } => libc::ERANGE,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    }
}

/// Runs `f` at the C boundary: catches panics, records the last error and
/// converts the outcome into a status code.
fn boundary<F>(op: &'static str, f: F) -> c_int
where
    F: FnOnce() -> Result<(), Failure>,
{
    clear_last_error();

    let (code, message) = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => return CONTATORE_OK,
        Ok(Err(Failure::NullPointer(arg))) => (libc::EINVAL, format!("{arg} is null")),
        Ok(Err(Failure::OutOfMemory)) => (
            libc::ENOMEM,
            "out of memory: cannot allocate counter".to_string(),
        ),
        Ok(Err(Failure::Counter(err))) => (status_code(&err), err.to_string()),
        Err(payload) => {
            let message = format!("panic: {}", panic_message(payload.as_ref()));
            warn!(op, %message, "panic caught at the C boundary");
            (libc::EIO, message)
        }
    };

    debug!(op, code, %message, "C call failed");
    set_last_error(message);
    code
}

/// Allocates a new, uninitialized counter and stores it in `*out`.
///
/// Returns `EINVAL` if `out` is null and `ENOMEM` if the allocation fails;
/// `*out` is left untouched on failure.
///
/// # Safety
///
/// `out` must be null or valid for a pointer write. The handle must be
/// released with [`contatore_free`].
#[no_mangle]
pub unsafe extern "C" fn contatore_new(out: *mut *mut Contatore) -> c_int {
    boundary("contatore_new", || {
        if out.is_null() {
            return Err(Failure::NullPointer("out"));
        }

        let layout = Layout::new::<Contatore>();
        // SAFETY: `Contatore` is not zero-sized.
        let raw = alloc::alloc(layout) as *mut Contatore;
        if raw.is_null() {
            return Err(Failure::OutOfMemory);
        }
        raw.write(Contatore {
            counter: Counter::new(),
        });
        *out = raw;
        Ok(())
    })
}

/// Releases a handle created by [`contatore_new`]. Null is ignored.
///
/// # Safety
///
/// `counter` must be null or a handle from [`contatore_new`] that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn contatore_free(counter: *mut Contatore) {
    if counter.is_null() {
        return;
    }
    // SAFETY: allocated in `contatore_new` with the global allocator and the
    // layout of `Contatore`, which is what `Box` expects.
    drop(Box::from_raw(counter));
}

/// Initializes the counter with `value`, discarding any previous value.
///
/// Returns `EINVAL` if `counter` is null or `value` is negative.
///
/// # Safety
///
/// `counter` must be null or a live handle from [`contatore_new`].
#[no_mangle]
pub unsafe extern "C" fn contatore_initialize(counter: *mut Contatore, value: c_int) -> c_int {
    boundary("contatore_initialize", || {
        let handle = counter.as_mut().ok_or(Failure::NullPointer("counter"))?;
        handle.counter.initialize(value)?;
        Ok(())
    })
}

/// Adds one to the counter.
///
/// Returns `EINVAL` if `counter` is null or uninitialized and `ERANGE` if it
/// already holds `INT_MAX`.
///
/// # Safety
///
/// `counter` must be null or a live handle from [`contatore_new`].
#[no_mangle]
pub unsafe extern "C" fn contatore_increment(counter: *mut Contatore) -> c_int {
    boundary("contatore_increment", || {
        let handle = counter.as_mut().ok_or(Failure::NullPointer("counter"))?;
        handle.counter.increment()?;
        Ok(())
    })
}

/// Writes the counter's value to `*value`.
///
/// Returns `EINVAL` if either pointer is null or the counter is
/// uninitialized; `*value` is only written on success.
///
/// # Safety
///
/// `counter` must be null or a live handle from [`contatore_new`], and
/// `value` must be null or valid for an `int` write.
#[no_mangle]
pub unsafe extern "C" fn contatore_read(counter: *const Contatore, value: *mut c_int) -> c_int {
    boundary("contatore_read", || {
        let handle = counter.as_ref().ok_or(Failure::NullPointer("counter"))?;
        if value.is_null() {
            return Err(Failure::NullPointer("value"));
        }
        *value = handle.counter.read()?;
        Ok(())
    })
}

/// Returns the counter to the uninitialized state.
///
/// Destroying an uninitialized counter succeeds. Returns `EINVAL` only if
/// `counter` is null. The handle itself stays valid until
/// [`contatore_free`].
///
/// # Safety
///
/// `counter` must be null or a live handle from [`contatore_new`].
#[no_mangle]
pub unsafe extern "C" fn contatore_destroy(counter: *mut Contatore) -> c_int {
    boundary("contatore_destroy", || {
        let handle = counter.as_mut().ok_or(Failure::NullPointer("counter"))?;
        handle.counter.destroy();
        Ok(())
    })
}

/// Returns the message of the last failed call on this thread, or null.
///
/// The string is owned by the library and stays valid until the next
/// `contatore_*` call on the same thread.
#[no_mangle]
pub extern "C" fn contatore_last_error() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map_or(ptr::null(), |s| s.as_ptr()))
}

/// Clears the last error message of this thread.
#[no_mangle]
pub extern "C" fn contatore_clear_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use tracing_test::traced_test;

    fn last_error() -> Option<String> {
        let ptr = contatore_last_error();
        if ptr.is_null() {
            None
        } else {
            unsafe { Some(CStr::from_ptr(ptr).to_string_lossy().into_owned()) }
        }
    }

    #[test]
    fn test_status_code() {
        assert_eq!(
            status_code(&CounterError::InvalidArgument { value: -1 }),
            libc::EINVAL
        );
        assert_eq!(status_code(&CounterError::InvalidState), libc::EINVAL);
        assert_eq!(
            status_code(&CounterError::Overflow { max: 0 }),
            libc::ERANGE
        );
    }

    #[test]
    fn test_boundary_success_clears_error() {
        set_last_error("stale");
        assert_eq!(boundary("test", || Ok(())), CONTATORE_OK);
        assert_eq!(last_error(), None);
    }

    #[test]
    fn test_boundary_null_pointer() {
        let code = boundary("test", || Err(Failure::NullPointer("counter")));
        assert_eq!(code, libc::EINVAL);
        assert_eq!(last_error().as_deref(), Some("counter is null"));
    }

    #[test]
    fn test_boundary_out_of_memory() {
        assert_eq!(boundary("test", || Err(Failure::OutOfMemory)), libc::ENOMEM);
        assert!(last_error().unwrap().starts_with("out of memory"));
    }

    #[test]
    fn test_boundary_catches_panic() {
        let code = boundary("test", || panic!("boom"));
        assert_eq!(code, libc::EIO);
        assert_eq!(last_error().as_deref(), Some("panic: boom"));
    }

    #[traced_test]
    #[test]
    fn test_failed_call_is_logged() {
        let code = boundary("contatore_increment", || {
            Err(Failure::Counter(CounterError::InvalidState))
        });
        assert_eq!(code, libc::EINVAL);
        assert!(logs_contain("C call failed"));
        assert!(logs_contain("contatore_increment"));
        assert!(!logs_contain("panic caught"));
    }

    #[traced_test]
    #[test]
    fn test_caught_panic_is_logged() {
        let code = boundary("contatore_read", || panic!("boom"));
        assert_eq!(code, libc::EIO);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("panic caught at the C boundary"));
        assert!(logs_contain("panic: boom"));
    }

    #[traced_test]
    #[test]
    fn test_success_is_not_logged() {
        assert_eq!(boundary("contatore_destroy", || Ok(())), CONTATORE_OK);
        assert!(!logs_contain("C call failed"));
    }

    #[test]
    fn test_clear_error() {
        set_last_error("something");
        contatore_clear_error();
        assert!(contatore_last_error().is_null());
    }
}
