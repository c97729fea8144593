//! mbim-phonebook: single-flight executor for MBIM phonebook actions.
//!
//! Given exactly one requested operation against a device's phonebook
//! service, this crate builds the typed request, submits it over an
//! already-open session, waits for the single correlated reply (bounded
//! by a timeout and an external cancellation token), decodes it and
//! reports the outcome to the owning process.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Action**: option indicators, exactly-one-action selection, input parsing
//! - **Protocol**: constants, request envelopes, reply decoding
//! - **Transport**: device command abstraction (backend, mock)
//! - **Session**: device handle + cancellation claims for one action
//! - **Runner**: completion protocol driving one action to its outcome
//! - **Report**: human-readable output rendering
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use mbim_phonebook::{ActionRunner, MockDevice, RawAction, SessionContext};
//!
//! # async fn demo() {
//! let device = Arc::new(MockDevice::new());
//! let ctx = SessionContext::new(device, CancellationToken::new());
//! let outcome = ActionRunner::new(ctx).run(RawAction::ReadAll).await;
//! assert!(!outcome.is_success()); // no device ever replied
//! # }
//! ```

pub mod action;
pub mod protocol;
pub mod report;
pub mod runner;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use action::{Action, ActionSelector, ConfigError, ParseError, PhonebookOptions, RawAction};
pub use protocol::{
    PhonebookConfiguration, PhonebookEntry, PhonebookState, RequestEnvelope, RequestKind,
    ResponseError,
};
pub use runner::{ActionRunner, Outcome};
pub use session::SessionContext;
pub use transport::{MockDevice, PhonebookDevice, TransportError};
