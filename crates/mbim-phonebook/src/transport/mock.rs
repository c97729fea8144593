//! Mock device for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{PhonebookDevice, TransportError};
use crate::protocol::RequestEnvelope;

/// Mock device for unit testing executor logic.
///
/// Replies are served from a queue in submission order. When the queue is
/// empty, `command` pends forever, which is how the timeout and
/// cancellation paths get exercised.
pub struct MockDevice {
    replies: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    request_log: Mutex<Vec<RequestEnvelope>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            request_log: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw reply buffer for the next command.
    pub fn queue_reply(&self, buf: &[u8]) {
        self.replies.lock().unwrap().push_back(Ok(buf.to_vec()));
    }

    /// Queue a transport failure for the next command.
    pub fn queue_failure(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// All requests submitted so far.
    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.request_log.lock().unwrap().clone()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhonebookDevice for MockDevice {
    async fn command(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        self.request_log.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(reply) => reply,
            // No canned reply: behave like a device that never answers.
            None => std::future::pending().await,
        }
    }
}
