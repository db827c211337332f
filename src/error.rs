//! Error types for media ingest and synchronization.
//!
//! Most conditions in this crate are deliberately *not* errors: ring overflow
//! is reported through [`RingPayload::Overflow`](crate::ring::RingPayload),
//! stalls through [`Discontinuous::Missing`](crate::types::Discontinuous), and
//! unsplittable content is buffered by the segmenter. What remains are the
//! failures a caller has to act on.
//!
//! ## Error Categories
//!
//! - **Bind Errors**: the UDP socket could not be acquired (fatal, never retried)
//! - **Receive Errors**: the socket failed while waiting for datagrams
//! - **Config Errors**: invalid configuration values
//! - **Parse Errors**: configuration documents that do not deserialize
//! - **Closed**: a component was used after shutdown
//!
//! ## Recovery
//!
//! ```rust
//! use mediasync::SyncError;
//!
//! let error = SyncError::config("ring.capacity", "must be greater than zero");
//! assert!(!error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for synchronization operations.
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Main error type for synchronization operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SyncError {
    #[error("Failed to bind UDP socket on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to receive datagram")]
    Receive {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration for {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("{component} is closed")]
    Closed { component: String },
}

impl SyncError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Bind failures are reported as non-retryable: the core never retries
    /// them and callers should fix the address or port instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Bind { .. } => false,
            SyncError::Receive { .. } => true,
            SyncError::Config { .. } => false,
            SyncError::Parse { .. } => false,
            SyncError::Closed { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SyncError::Bind { .. } => vec![
                "Check that no other process holds the port",
                "Use port 0 to let the OS choose a free port",
                "Verify the bind address exists on this host",
            ],
            SyncError::Receive { .. } => vec![
                "Check network interface state",
                "Re-create the UDP source",
            ],
            SyncError::Config { .. } => vec![
                "Check configuration values against their documented ranges",
                "Remove the field to fall back to its default",
            ],
            SyncError::Parse { .. } => vec![
                "Check the configuration document is valid YAML",
                "Verify field names and value types",
            ],
            SyncError::Closed { .. } => vec![
                "Create a new component instance",
                "Check shutdown ordering between producer and consumer",
            ],
        }
    }

    /// Helper constructor for bind errors.
    pub fn bind_failed(addr: SocketAddr, source: std::io::Error) -> Self {
        SyncError::Bind { addr, source }
    }

    /// Helper constructor for receive errors.
    pub fn receive_failed(source: std::io::Error) -> Self {
        SyncError::Receive { source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::Config { field: field.into(), reason: reason.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        SyncError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for closed-component errors.
    pub fn closed(component: impl Into<String>) -> Self {
        SyncError::Closed { component: component.into() }
    }
}

impl From<serde_yaml_ng::Error> for SyncError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SyncError::Parse { context: "configuration".to_string(), details: err.to_string() }
    }
}
