//! # Contatore - A Single Overflow-Checked Counter
//!
//! A Rust library providing one small value type, [`Counter`](counter::Counter),
//! that holds a single non-negative integer behind an explicit lifecycle:
//! initialize, increment, read and destroy. Every operation reports failure
//! through a [`Result`](error::Result); nothing wraps, saturates or panics.
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──► Uninitialized ──initialize(v)──► Initialized ──┐
//!                  ▲                               │  ▲      │ increment()
//!                  └──────────destroy()────────────┘  └──────┘ read()
//! ```
//!
//! | Operation | Valid in | Fails with |
//! |-----------|----------|------------|
//! | `initialize(v)` | any state | `InvalidArgument` if `v < 0` |
//! | `increment()` | Initialized | `InvalidState`, `Overflow` at `MAX` |
//! | `read()` | Initialized | `InvalidState` |
//! | `destroy()` | any state | never |
//!
//! ## Quick Start
//!
//! ```rust
//! use contatore::counter::Counter;
//! use contatore::error::CounterError;
//!
//! let mut counter: Counter = Counter::new();
//! counter.initialize(42)?;
//! counter.increment()?;
//! assert_eq!(counter.read()?, 43);
//!
//! counter.destroy();
//! assert_eq!(counter.increment(), Err(CounterError::InvalidState));
//! # Ok::<(), CounterError>(())
//! ```
//!
//! ## Integer Width
//!
//! `Counter<T>` accepts any primitive signed integer and defaults to `i32`:
//!
//! ```rust
//! use contatore::counter::Counter;
//!
//! let mut small = Counter::<i8>::with_value(126).unwrap();
//! small.increment().unwrap();
//! assert!(small.increment().is_err()); // 127 is i8::MAX
//! ```
//!
//! ## Thread Safety
//!
//! Mutating operations take `&mut self`, so a counter has a single owner at
//! a time. Wrap it in a `Mutex` if several threads must share it.
//!
//! ## Bindings
//!
//! The same lifecycle is exposed to other languages behind feature flags:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `serde` | `serialization` | Serialize a counter as its optional value |
//! | `capi` | `capi` | C ABI with errno status codes (`include/contatore.h`) |
//! | `python` | `python` | PyO3 `contatore.Counter` class |
//! | `full` | All of the above | |
//!
//! ## Logging
//!
//! State transitions and failed C calls are reported as [`tracing`] events.
//! Install any subscriber (e.g. `tracing-subscriber`) to see them.

pub mod counter;
pub mod error;

#[cfg(feature = "serde")]
pub mod serialization;

#[cfg(feature = "capi")]
pub mod capi;

#[cfg(feature = "python")]
pub mod python;

pub use counter::{Counter, Integer};
pub use error::{CounterError, Result};
