//! Protocol module - phonebook service definitions.

pub mod constants;
pub mod request;
pub mod response;

pub use constants::*;
pub use request::{RequestEnvelope, RequestKind};
pub use response::{
    PhonebookConfiguration, PhonebookEntry, PhonebookState, ResponseError, decode_configuration,
    decode_delete_ack, decode_read, decode_write_ack,
};
