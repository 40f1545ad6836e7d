//! Overflow-checked counter with an explicit lifecycle.
//!
//! A [`Counter`] is either *uninitialized* (it holds no value) or
//! *initialized* (it holds a non-negative integer). The state machine is:
//!
//! ```text
//!                  initialize(v >= 0)
//!   ┌───────────────┐ ───────────────► ┌───────────────┐
//!   │ Uninitialized │                  │  Initialized  │ ◄─┐ increment()
//!   └───────────────┘ ◄─────────────── └───────────────┘ ──┘ read()
//!          ▲   │           destroy()         │
//!          └───┘ destroy()                   └── initialize(v >= 0)
//! ```
//!
//! `increment()` and `read()` are only valid in the initialized state. The
//! stored value never wraps: incrementing a counter at its maximum is
//! rejected with [`CounterError::Overflow`] and leaves the value untouched.
//!
//! # Storage
//!
//! The value lives inline in an `Option<T>`, so none of the operations
//! allocate and none of them can fail for lack of memory. Dropping a counter
//! releases the value; [`Counter::destroy`] only exists for early release and
//! reuse of the same instance.
//!
//! # Integer width
//!
//! `Counter` is generic over any primitive signed integer through the sealed
//! [`Integer`] trait, and defaults to `i32` (the width of a C `int`).

use std::fmt::{self, Debug, Display};

use num_traits::{AsPrimitive, PrimInt, Signed};
use tracing::trace;

use crate::error::{CounterError, Result};

mod sealed {
    pub trait Sealed {}
}

/// Primitive signed integer types a [`Counter`] can hold.
///
/// This trait is sealed and implemented for `i8`, `i16`, `i32`, `i64`,
/// `i128` and `isize`.
pub trait Integer:
    sealed::Sealed + PrimInt + Signed + AsPrimitive<i128> + Debug + Display
{
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}
            impl Integer for $t {}
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize);

/// A single non-negative counter with an explicit initialize/destroy lifecycle.
///
/// # Examples
///
/// ```rust
/// use contatore::counter::Counter;
/// use contatore::error::CounterError;
///
/// let mut counter: Counter = Counter::new();
/// counter.initialize(42)?;
/// assert_eq!(counter.read()?, 42);
///
/// counter.increment()?;
/// counter.increment()?;
/// assert_eq!(counter.read()?, 44);
///
/// counter.destroy();
/// assert_eq!(counter.read(), Err(CounterError::InvalidState));
/// # Ok::<(), CounterError>(())
/// ```
///
/// Overflow is reported, never wrapped:
///
/// ```rust
/// use contatore::counter::Counter;
/// use contatore::error::CounterError;
///
/// let mut counter = Counter::<i8>::with_value(i8::MAX)?;
/// assert_eq!(counter.increment(), Err(CounterError::Overflow { max: 127 }));
/// assert_eq!(counter.read()?, i8::MAX);
/// # Ok::<(), CounterError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counter<T: Integer = i32> {
    value: Option<T>,
}

impl<T: Integer> Counter<T> {
    /// Creates an uninitialized counter.
    ///
    /// ```rust
    /// use contatore::counter::Counter;
    ///
    /// let counter: Counter = Counter::new();
    /// assert!(!counter.is_initialized());
    /// ```
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Creates a counter and initializes it with `initial_value`.
    ///
    /// # Errors
    ///
    /// [`CounterError::InvalidArgument`] if `initial_value` is negative.
    ///
    /// ```rust
    /// use contatore::counter::Counter;
    ///
    /// let counter = Counter::with_value(7).unwrap();
    /// assert_eq!(counter.read(), Ok(7));
    /// assert!(Counter::with_value(-7).is_err());
    /// ```
    pub fn with_value(initial_value: T) -> Result<Self> {
        let mut counter = Self::new();
        counter.initialize(initial_value)?;
        Ok(counter)
    }

    /// Rebuilds a counter from its optional value.
    ///
    /// `None` yields an uninitialized counter, `Some(v)` behaves like
    /// [`Counter::with_value`].
    pub fn from_option(value: Option<T>) -> Result<Self> {
        match value {
            Some(v) => Self::with_value(v),
            None => Ok(Self::new()),
        }
    }

    /// Sets the counter to `initial_value`, discarding any previous value.
    ///
    /// # Errors
    ///
    /// [`CounterError::InvalidArgument`] if `initial_value` is negative. The
    /// counter is left exactly as it was.
    pub fn initialize(&mut self, initial_value: T) -> Result<()> {
        if initial_value.is_negative() {
            return Err(CounterError::InvalidArgument {
                value: initial_value.as_(),
            });
        }
        self.value = Some(initial_value);
        trace!(value = %initial_value, "counter initialized");
        Ok(())
    }

    /// Adds one to the stored value.
    ///
    /// # Errors
    ///
    /// - [`CounterError::InvalidState`] if the counter is not initialized.
    /// - [`CounterError::Overflow`] if the value is already `T::MAX`; the value
    ///   is left unchanged.
    pub fn increment(&mut self) -> Result<()> {
        let value = self.value.as_mut().ok_or(CounterError::InvalidState)?;
        *value = value
            .checked_add(&T::one())
            .ok_or_else(|| CounterError::Overflow {
                max: T::max_value().as_(),
            })?;
        Ok(())
    }

    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// [`CounterError::InvalidState`] if the counter is not initialized.
    #[inline]
    pub fn read(&self) -> Result<T> {
        self.value.ok_or(CounterError::InvalidState)
    }

    /// Releases the stored value and returns the counter to the
    /// uninitialized state.
    ///
    /// Calling this on an uninitialized counter is a no-op.
    pub fn destroy(&mut self) {
        if self.value.take().is_some() {
            trace!("counter destroyed");
        }
    }

    /// Returns `true` if the counter currently holds a value.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Consumes the counter, returning its value if initialized.
    #[inline]
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T: Integer> Default for Counter<T> {
    /// Creates an uninitialized counter.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integer> Debug for Counter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "Counter({v})"),
            None => write!(f, "Counter(uninitialized)"),
        }
    }
}

impl<T: Integer> Display for Counter<T> {
    /// Formats the value, or `uninitialized` when there is none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("uninitialized"),
        }
    }
}
