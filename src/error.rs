//! Error taxonomy for engine calls.

use std::ffi::NulError;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the binding.
///
/// Variants that originate in the engine carry the errno captured
/// immediately after the failing call, together with the engine-rendered
/// message copied into owned memory before anything else can touch the
/// handle's error state.
#[derive(Error, Debug)]
pub enum Error {
    /// The native open call returned a null handle.
    #[error("failed to open dtrace session: {message} (errno {errno})")]
    Open { errno: i32, message: String },

    /// Compilation of D source text failed.
    #[error("failed to compile program: {message} (errno {errno})")]
    Compile { errno: i32, message: String },

    /// Enabling instrumentation failed.
    #[error("failed to enable instrumentation: {message} (errno {errno})")]
    Activation { errno: i32, message: String },

    /// Executing a compiled program failed.
    #[error("failed to execute program: {message} (errno {errno})")]
    Execution { errno: i32, message: String },

    /// Grabbing an external process failed.
    #[error("failed to grab process {pid}: {message} (errno {errno})")]
    Attach {
        pid: i32,
        errno: i32,
        message: String,
    },

    /// Setting or reading a runtime option failed.
    #[error("failed to apply option {key:?}: {message} (errno {errno})")]
    Option {
        key: String,
        errno: i32,
        message: String,
    },

    /// The consumer loop reported an error.
    #[error("consumer loop failed: {message} (errno {errno})")]
    Work { errno: i32, message: String },

    /// A string destined for the engine contains an interior NUL byte and
    /// cannot be marshaled.
    #[error("string contains an interior NUL byte")]
    InvalidString(#[from] NulError),
}

impl Error {
    /// The engine error code behind this error, when it came from the
    /// engine.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Error::Open { errno, .. }
            | Error::Compile { errno, .. }
            | Error::Activation { errno, .. }
            | Error::Execution { errno, .. }
            | Error::Attach { errno, .. }
            | Error::Option { errno, .. }
            | Error::Work { errno, .. } => Some(*errno),
            Error::InvalidString(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_display_includes_message_and_errno() {
        let err = Error::Compile {
            errno: 17,
            message: "probe description does not match any probes".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("probe description does not match any probes"));
        assert!(text.contains("17"));
    }

    #[test]
    fn test_errno_accessor_for_engine_errors() {
        let err = Error::Activation {
            errno: 5,
            message: "x".to_string(),
        };
        assert_eq!(err.errno(), Some(5));
    }

    #[test]
    fn test_errno_accessor_for_host_errors() {
        let nul = CString::new("a\0b").unwrap_err();
        let err = Error::from(nul);
        assert_eq!(err.errno(), None);
    }

    #[test]
    fn test_attach_error_names_the_pid() {
        let err = Error::Attach {
            pid: 4242,
            errno: 3,
            message: "no such process".to_string(),
        };
        assert!(err.to_string().contains("4242"));
    }

    #[test]
    fn test_option_error_names_the_key() {
        let err = Error::Option {
            key: "bufsize".to_string(),
            errno: 22,
            message: "invalid value".to_string(),
        };
        assert!(err.to_string().contains("bufsize"));
    }
}
