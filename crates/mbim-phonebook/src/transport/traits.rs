//! Device transport abstraction.
//!
//! Defines the `PhonebookDevice` trait for submitting phonebook commands
//! to an already-open device, allowing different backends (real MBIM
//! stack, simulator, mock). Opening and enumerating devices is the
//! caller's job; this core only borrows a handle.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::RequestEnvelope;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("operation failed: {0}")]
    CommandFailed(String),

    #[error("device closed")]
    Disconnected,

    #[error("operation failed: no reply within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("operation failed: cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An open device able to execute phonebook commands.
///
/// `command` submits one request and resolves exactly once with the
/// correlated reply's information buffer, or with a transport failure.
/// Backends own the wire encoding of the envelope.
#[async_trait]
pub trait PhonebookDevice: Send + Sync {
    async fn command(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError>;
}
