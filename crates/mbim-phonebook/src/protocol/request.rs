//! Outbound request construction.
//!
//! A [`RequestEnvelope`] is the typed, not-yet-encoded form of one
//! phonebook command. The transport backend owns the wire encoding; this
//! layer only fixes the command id, the filter/save flag and the payload
//! fields for each action.

use crate::action::Action;
use crate::protocol::constants::{
    CID_PHONEBOOK_CONFIGURATION, CID_PHONEBOOK_DELETE, CID_PHONEBOOK_READ, CID_PHONEBOOK_WRITE,
    PHONEBOOK_FLAG_ALL, PHONEBOOK_FLAG_INDEX, PHONEBOOK_WRITE_FLAG_SAVE_INDEX,
    PHONEBOOK_WRITE_FLAG_SAVE_UNUSED,
};

/// The four phonebook command kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Query the phonebook configuration (no payload).
    ConfigurationQuery,
    /// Read one entry or all entries.
    ReadQuery,
    /// Delete one entry or all entries.
    DeleteSet,
    /// Write a new entry or update an existing one.
    WriteSet,
}

impl RequestKind {
    /// Command id within the phonebook service.
    pub fn cid(self) -> u32 {
        match self {
            RequestKind::ConfigurationQuery => CID_PHONEBOOK_CONFIGURATION,
            RequestKind::ReadQuery => CID_PHONEBOOK_READ,
            RequestKind::DeleteSet => CID_PHONEBOOK_DELETE,
            RequestKind::WriteSet => CID_PHONEBOOK_WRITE,
        }
    }
}

/// One constructed outbound request.
///
/// Created, submitted and dropped within a single operation; never
/// retained past the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub kind: RequestKind,
    /// `PHONEBOOK_FLAG_*` for read/delete, `PHONEBOOK_WRITE_FLAG_*` for
    /// write; unused (zero) for the configuration query.
    pub flag: u32,
    pub index: u32,
    pub name: Option<String>,
    pub number: Option<String>,
}

impl RequestEnvelope {
    fn new(kind: RequestKind, flag: u32, index: u32) -> Self {
        Self {
            kind,
            flag,
            index,
            name: None,
            number: None,
        }
    }

    /// Build the envelope for one action.
    pub fn from_action(action: &Action) -> Self {
        match action {
            Action::QueryConfiguration => {
                Self::new(RequestKind::ConfigurationQuery, 0, 0)
            }
            Action::ReadOne { index } => {
                Self::new(RequestKind::ReadQuery, PHONEBOOK_FLAG_INDEX, *index)
            }
            Action::ReadAll => Self::new(RequestKind::ReadQuery, PHONEBOOK_FLAG_ALL, 0),
            Action::DeleteOne { index } => {
                Self::new(RequestKind::DeleteSet, PHONEBOOK_FLAG_INDEX, *index)
            }
            Action::DeleteAll => Self::new(RequestKind::DeleteSet, PHONEBOOK_FLAG_ALL, 0),
            Action::Write { name, number } => Self {
                name: Some(name.clone()),
                number: Some(number.clone()),
                ..Self::new(RequestKind::WriteSet, PHONEBOOK_WRITE_FLAG_SAVE_UNUSED, 0)
            },
            Action::UpdateEntry {
                name,
                number,
                index,
            } => Self {
                name: Some(name.clone()),
                number: Some(number.clone()),
                ..Self::new(RequestKind::WriteSet, PHONEBOOK_WRITE_FLAG_SAVE_INDEX, *index)
            },
        }
    }
}
