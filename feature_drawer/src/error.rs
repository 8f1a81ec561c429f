//! Error types for the feature drawer
//!
//! Visibility outcomes are encoded as draw categories, not errors.
//! `Error` covers configuration, lifecycle calls on unknown features
//! and failures reported by the draw backend.

use std::fmt;

/// Result type for feature drawer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Feature drawer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Configuration rejected at load time
    InvalidConfig(String),

    /// A lifecycle call referenced a feature the registry does not hold
    UnknownFeature(String),

    /// Internal state does not allow the requested operation
    InvalidState(String),

    /// Failure reported by the draw submission backend
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::UnknownFeature(msg) => write!(f, "Unknown feature: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error and build an `Error::InvalidState` from it.
#[macro_export]
macro_rules! fd_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::fd_error!($source, "{}", message);
        $crate::fdraw::Error::InvalidState(message)
    }};
}

/// Log an error and return early with `Error::InvalidState`.
#[macro_export]
macro_rules! fd_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::fd_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
