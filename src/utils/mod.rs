//! The `utils` module collects definitions shared across the relay:
//! the error taxonomy and the tracing setup.

pub mod error;
pub mod logging;
