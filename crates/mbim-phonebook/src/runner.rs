//! Single-flight action executor.
//!
//! Drives one selected action through its whole life:
//! `Idle -> Dispatched -> Completed(outcome)`. The runner owns the
//! [`SessionContext`] and is consumed by [`ActionRunner::run`], so the
//! context's claims are released exactly once on every exit path and no
//! state can re-enter `Dispatched` — one action per invocation holds by
//! construction.

use std::fmt;

use tracing::debug;

use crate::action::{Action, RawAction};
use crate::protocol::{
    RequestEnvelope, decode_configuration, decode_delete_ack, decode_read, decode_write_ack,
};
use crate::report::{
    DELETE_CONFIRMATION, WRITE_CONFIRMATION, render_configuration, render_entries,
};
use crate::session::SessionContext;

/// Overall result reported back to the owning process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// Completion protocol states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Dispatched,
    Completed(Outcome),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Dispatched => write!(f, "dispatched"),
            RunState::Completed(outcome) => write!(f, "completed({outcome})"),
        }
    }
}

/// Executes exactly one phonebook action over an open session.
pub struct ActionRunner {
    ctx: SessionContext,
    state: RunState,
}

impl ActionRunner {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            state: RunState::Idle,
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    /// Enter `Completed`, releasing the session context.
    ///
    /// Consumes the runner: the device and cancellation claims drop here
    /// and cannot drop twice.
    fn complete(mut self, outcome: Outcome) -> Outcome {
        self.transition(RunState::Completed(outcome));
        outcome
    }

    /// Run the selected action to completion.
    ///
    /// Success text goes to stdout, diagnostics to stderr prefixed
    /// `error: `; the returned outcome maps to the process exit status.
    pub async fn run(mut self, raw: RawAction) -> Outcome {
        // Parse failures happen after the context exists and still go
        // through the completion path.
        let action = match raw.resolve() {
            Ok(action) => action,
            Err(e) => {
                eprintln!("error: {e}");
                return self.complete(Outcome::Failure);
            }
        };

        let request = RequestEnvelope::from_action(&action);
        debug!(action = ?action, "asynchronously running phonebook action");
        self.transition(RunState::Dispatched);

        let reply = match self.ctx.submit(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                eprintln!("error: {e}");
                return self.complete(Outcome::Failure);
            }
        };

        // Entries and configuration snapshots live only as long as this
        // report; nothing is retained past the print.
        let report = match &action {
            Action::QueryConfiguration => {
                decode_configuration(&reply).map(|config| render_configuration(&config))
            }
            Action::ReadOne { .. } | Action::ReadAll => {
                decode_read(&reply).map(|(count, entries)| render_entries(count, &entries))
            }
            Action::Write { .. } | Action::UpdateEntry { .. } => {
                decode_write_ack(&reply).map(|()| WRITE_CONFIRMATION.to_string())
            }
            Action::DeleteOne { .. } | Action::DeleteAll => {
                decode_delete_ack(&reply).map(|()| DELETE_CONFIRMATION.to_string())
            }
        };

        match report {
            Ok(text) => {
                println!("{text}");
                self.complete(Outcome::Success)
            }
            Err(e) => {
                eprintln!("error: couldn't parse response message: {e}");
                self.complete(Outcome::Failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::protocol::response::test_buffers::{
        encode_configuration_reply, encode_read_reply,
    };
    use crate::protocol::{PHONEBOOK_WRITE_FLAG_SAVE_UNUSED, RequestKind};
    use crate::transport::{MockDevice, TransportError};

    fn runner_for(device: &Arc<MockDevice>, cancel: CancellationToken) -> ActionRunner {
        let ctx = SessionContext::new(device.clone(), cancel);
        ActionRunner::new(ctx)
    }

    #[tokio::test]
    async fn test_read_all_success() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&encode_read_reply(&[
            (1, "Alice", "5551234"),
            (2, "Bob", "5559876"),
        ]));

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner.run(RawAction::ReadAll).await;

        assert!(outcome.is_success());
        let requests = device.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, RequestKind::ReadQuery);
    }

    #[tokio::test]
    async fn test_query_configuration_success() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&encode_configuration_reply(1, 100, 5, 20, 30));

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner.run(RawAction::QueryConfiguration).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_write_success_builds_save_unused_request() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&[]);

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner
            .run(RawAction::Write {
                input: "Alice,5551234".into(),
            })
            .await;

        assert!(outcome.is_success());
        let requests = device.requests();
        assert_eq!(requests[0].kind, RequestKind::WriteSet);
        assert_eq!(requests[0].flag, PHONEBOOK_WRITE_FLAG_SAVE_UNUSED);
        assert_eq!(requests[0].index, 0);
    }

    #[tokio::test]
    async fn test_parse_failure_sends_no_request() {
        let device = Arc::new(MockDevice::new());
        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner
            .run(RawAction::Write {
                input: "OnlyName".into(),
            })
            .await;

        assert_eq!(outcome, Outcome::Failure);
        assert!(device.requests().is_empty());
        // Context released despite failing before any submission.
        assert_eq!(Arc::strong_count(&device), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_not_propagated() {
        let device = Arc::new(MockDevice::new());
        device.queue_failure(TransportError::Disconnected);

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner.run(RawAction::DeleteAll).await;
        assert_eq!(outcome, Outcome::Failure);
    }

    #[tokio::test]
    async fn test_decode_failure_completes_with_failure() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&[0u8; 4]); // far too short for a configuration

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner.run(RawAction::QueryConfiguration).await;
        assert_eq!(outcome, Outcome::Failure);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_while_dispatched() {
        let device = Arc::new(MockDevice::new()); // never replies

        let runner = runner_for(&device, CancellationToken::new());
        let outcome = runner.run(RawAction::Read { index: 1 }).await;

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(device.requests().len(), 1);
        assert_eq!(Arc::strong_count(&device), 1);
    }

    #[tokio::test]
    async fn test_cancellation_while_dispatched() {
        let device = Arc::new(MockDevice::new()); // never replies
        let cancel = CancellationToken::new();

        let ctx = SessionContext::new(device.clone(), cancel.clone())
            .with_timeout(Duration::from_secs(60));
        let runner = ActionRunner::new(ctx);

        let run = tokio::spawn(runner.run(RawAction::ReadAll));
        cancel.cancel();
        let outcome = run.await.unwrap();

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(Arc::strong_count(&device), 1);
    }

    #[tokio::test]
    async fn test_context_released_exactly_once_on_success() {
        let device = Arc::new(MockDevice::new());
        device.queue_reply(&encode_read_reply(&[]));
        assert_eq!(Arc::strong_count(&device), 1);

        let runner = runner_for(&device, CancellationToken::new());
        assert_eq!(Arc::strong_count(&device), 2);

        let outcome = runner.run(RawAction::ReadAll).await;
        assert!(outcome.is_success());
        assert_eq!(Arc::strong_count(&device), 1);
    }
}
