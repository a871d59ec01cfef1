//! Shared primitives used across Shellkit crates.

use core::fmt;

/// Result alias used across the workspace.
pub type ShellResult<T> = Result<T, ShellError>;

/// Error raised by configuration validation and contract violations.
///
/// `code` is a stable dotted identifier prefixed with the owning crate
/// (`language.*`, `modal.*`); `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellError {
    pub code: &'static str,
    pub message: String,
}

impl ShellError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ShellError {}
