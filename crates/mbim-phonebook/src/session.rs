//! Session context: the owned device handle and cancellation token for
//! the lifetime of one action.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::protocol::{COMMAND_TIMEOUT_SECS, RequestEnvelope};
use crate::transport::{PhonebookDevice, TransportError};

/// Reference-counted claims on the open device and the process-wide
/// cancellation token, held for exactly one action and dropped exactly
/// once when the outcome is known.
pub struct SessionContext {
    device: Arc<dyn PhonebookDevice>,
    cancel: CancellationToken,
    timeout: Duration,
}

impl SessionContext {
    pub fn new(device: Arc<dyn PhonebookDevice>, cancel: CancellationToken) -> Self {
        Self {
            device,
            cancel,
            timeout: Duration::from_secs(COMMAND_TIMEOUT_SECS),
        }
    }

    /// Override the reply budget. Tests use this; production keeps the
    /// protocol default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit one request and wait for its correlated reply.
    ///
    /// Resolves exactly once: with the raw reply buffer, or with
    /// `Timeout` / `Cancelled` / the backend's failure. Timeout and
    /// cancellation are ordinary failures on the same path.
    pub async fn submit(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        debug!(kind = ?request.kind, "submitting phonebook request");
        tokio::select! {
            reply = self.device.command(request) => reply,
            _ = tokio::time::sleep(self.timeout) => Err(TransportError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }),
            _ = self.cancel.cancelled() => Err(TransportError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::transport::MockDevice;

    fn read_all_request() -> RequestEnvelope {
        RequestEnvelope::from_action(&Action::ReadAll)
    }

    #[tokio::test]
    async fn test_submit_returns_reply() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&[7, 7]);
        let ctx = SessionContext::new(device, CancellationToken::new());
        let reply = ctx.submit(&read_all_request()).await.unwrap();
        assert_eq!(reply, vec![7, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_times_out_without_reply() {
        let device = Arc::new(MockDevice::new());
        let ctx = SessionContext::new(device, CancellationToken::new());
        let err = ctx.submit(&read_all_request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout { timeout_secs: 10 }));
    }

    #[tokio::test]
    async fn test_submit_observes_cancellation() {
        let device = Arc::new(MockDevice::new());
        let cancel = CancellationToken::new();
        let ctx = SessionContext::new(device, cancel.clone());
        cancel.cancel();
        let err = ctx.submit(&read_all_request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
    }
}
