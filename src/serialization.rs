//! Serde support for [`Counter`].
//!
//! A counter serializes as its optional value: `null` when uninitialized,
//! the number otherwise. Deserialization re-validates the value, so a
//! negative number is rejected instead of producing a counter that breaks
//! the non-negative invariant.
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! contatore = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use contatore::counter::Counter;
//!
//! let counter = Counter::with_value(42)?;
//! assert_eq!(serde_json::to_string(&counter)?, "42");
//!
//! let restored: Counter = serde_json::from_str("42")?;
//! assert_eq!(restored, counter);
//!
//! assert!(serde_json::from_str::<Counter>("-1").is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::counter::{Counter, Integer};

impl<T: Integer + Serialize> Serialize for Counter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().ok().serialize(serializer)
    }
}

impl<'de, T: Integer + Deserialize<'de>> Deserialize<'de> for Counter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<T>::deserialize(deserializer)?;
        Counter::from_option(value).map_err(D::Error::custom)
    }
}
