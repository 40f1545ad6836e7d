//! Python bindings for [`Counter`].
//!
//! Built with PyO3 and exposed as the `contatore` extension module:
//!
//! ```python
//! import contatore
//!
//! counter = contatore.Counter(42)
//! counter.increment()
//! assert counter.value == 43
//!
//! counter.destroy()
//! counter.value          # RuntimeError
//! contatore.Counter(-1)  # ValueError
//! ```
//!
//! Errors map to the builtin exception that matches their meaning:
//!
//! | Error                               | Exception       |
//! |-------------------------------------|-----------------|
//! | [`CounterError::InvalidArgument`]   | `ValueError`    |
//! | [`CounterError::Overflow`]          | `OverflowError` |
//! | [`CounterError::InvalidState`]      | `RuntimeError`  |
//!
//! # Feature Flag
//!
//! This module requires the `python` feature. The importable shared library
//! also needs `pyo3/extension-module`, which is left to the build tool:
//!
//! ```bash
//! maturin build --features python,pyo3/extension-module
//! ```

#![allow(non_local_definitions)] // PyO3 macros generate non-local impl blocks

use pyo3::exceptions::{PyOverflowError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::counter::Counter;
use crate::error::CounterError;

/// Converts a counter error into the matching Python exception.
pub fn to_py_err(err: CounterError) -> PyErr {
    let message = err.to_string();
    match err {
        CounterError::InvalidArgument { .. } => PyValueError::new_err(message),
        CounterError::Overflow { .. } => PyOverflowError::new_err(message),
        CounterError::InvalidState => PyRuntimeError::new_err(message),
    }
}

/// Python wrapper around a C `int` wide [`Counter`].
#[pyclass(name = "Counter", module = "contatore")]
#[derive(Debug, Clone)]
pub struct PyCounter {
    inner: Counter<i32>,
}

#[pymethods]
impl PyCounter {
    #[new]
    #[pyo3(signature = (value = 0))]
    fn new(value: i32) -> PyResult<Self> {
        let inner = Counter::with_value(value).map_err(to_py_err)?;
        Ok(PyCounter { inner })
    }

    /// Adds one to the counter.
    fn increment(&mut self) -> PyResult<()> {
        self.inner.increment().map_err(to_py_err)
    }

    /// Releases the value; later reads raise `RuntimeError`.
    fn destroy(&mut self) {
        self.inner.destroy();
    }

    /// The current value.
    #[getter]
    fn value(&self) -> PyResult<i32> {
        self.inner.read().map_err(to_py_err)
    }

    #[getter]
    fn initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    fn __repr__(&self) -> String {
        format!("Counter({})", self.inner)
    }
}

/// The `contatore` Python module.
#[pymodule]
fn contatore(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyCounter>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert!(PyCounter::new(-1).is_err());
    }

    #[test]
    fn test_increment_and_value() {
        let mut counter = PyCounter::new(42).unwrap();
        counter.increment().unwrap();
        counter.increment().unwrap();
        assert_eq!(counter.value().unwrap(), 44);
        assert_eq!(counter.__repr__(), "Counter(44)");
    }

    #[test]
    fn test_overflow_keeps_value() {
        let mut counter = PyCounter::new(i32::MAX - 1).unwrap();
        counter.increment().unwrap();
        assert!(counter.increment().is_err());
        assert_eq!(counter.value().unwrap(), i32::MAX);
    }

    #[test]
    fn test_negative_value_raises_value_error() {
        pyo3::prepare_freethreaded_python();
        let err = PyCounter::new(-1).unwrap_err();
        Python::with_gil(|py| {
            assert!(err.is_instance_of::<PyValueError>(py));
            assert!(!err.is_instance_of::<PyOverflowError>(py));
            assert!(!err.is_instance_of::<PyRuntimeError>(py));
        });
    }

    #[test]
    fn test_overflow_raises_overflow_error() {
        pyo3::prepare_freethreaded_python();
        let mut counter = PyCounter::new(i32::MAX).unwrap();
        let err = counter.increment().unwrap_err();
        Python::with_gil(|py| {
            assert!(err.is_instance_of::<PyOverflowError>(py));
            assert!(!err.is_instance_of::<PyValueError>(py));
            assert!(!err.is_instance_of::<PyRuntimeError>(py));
        });
        assert_eq!(counter.value().unwrap(), i32::MAX);
    }

    #[test]
    fn test_destroyed_counter_raises_runtime_error() {
        pyo3::prepare_freethreaded_python();
        let mut counter = PyCounter::new(3).unwrap();
        counter.destroy();
        let read_err = counter.value().unwrap_err();
        let increment_err = counter.increment().unwrap_err();
        Python::with_gil(|py| {
            for err in [&read_err, &increment_err] {
                assert!(err.is_instance_of::<PyRuntimeError>(py));
                assert!(!err.is_instance_of::<PyValueError>(py));
                assert!(!err.is_instance_of::<PyOverflowError>(py));
            }
        });
    }

    #[test]
    fn test_exception_message() {
        pyo3::prepare_freethreaded_python();
        let err = to_py_err(CounterError::InvalidArgument { value: -5 });
        Python::with_gil(|py| {
            let message = err.value(py).to_string();
            assert_eq!(message, "invalid argument: initial value -5 is negative");
        });
    }

    #[test]
    fn test_destroy() {
        let mut counter = PyCounter::new(0).unwrap();
        counter.destroy();
        assert!(!counter.initialized());
        assert!(counter.value().is_err());
        assert_eq!(counter.__repr__(), "Counter(uninitialized)");
    }
}
