//! Error type shared by every counter operation.
//!
//! All fallible operations on a [`Counter`](crate::counter::Counter) return
//! [`Result<T>`], whose error is a [`CounterError`]. The bindings
//! (C ABI, Python) translate these errors into their own idiom without
//! altering their meaning.
//!
//! # Example
//!
//! ```rust
//! use contatore::counter::Counter;
//! use contatore::error::CounterError;
//!
//! let mut counter: Counter = Counter::new();
//! assert_eq!(counter.read(), Err(CounterError::InvalidState));
//! ```

use thiserror::Error;

/// Errors reported by counter operations.
///
/// Every variant is recoverable: the caller can retry with a corrected
/// argument or re-initialize the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CounterError {
    /// The initial value passed to `initialize` was negative.
    #[error("invalid argument: initial value {value} is negative")]
    InvalidArgument {
        /// The rejected value.
        value: i128,
    },

    /// The counter is not initialized (never initialized, or destroyed).
    #[error("invalid state: counter is not initialized")]
    InvalidState,

    /// The counter already holds its maximum value and cannot be incremented.
    #[error("overflow: counter is already at its maximum value {max}")]
    Overflow {
        /// The maximum representable value for the counter's width.
        max: i128,
    },
}

/// Result type for counter operations.
pub type Result<T> = std::result::Result<T, CounterError>;
