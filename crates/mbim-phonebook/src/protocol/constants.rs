//! Protocol constants for the MBIM Phonebook service.
//!
//! Values from the MBIM v1.0 errata, section 10.5.23 onwards.

/// Phonebook device service UUID.
pub const PHONEBOOK_SERVICE_UUID: &str = "4bf38476-1e6a-41db-b1d8-bed289c25bdb";

// ============================================================================
// Command IDs
// ============================================================================

pub const CID_PHONEBOOK_CONFIGURATION: u32 = 1;
pub const CID_PHONEBOOK_READ: u32 = 2;
pub const CID_PHONEBOOK_DELETE: u32 = 3;
pub const CID_PHONEBOOK_WRITE: u32 = 4;

// ============================================================================
// Filter flags (read / delete)
// ============================================================================

/// Operate on every stored entry.
pub const PHONEBOOK_FLAG_ALL: u32 = 0;
/// Operate on the single entry named by the index field.
pub const PHONEBOOK_FLAG_INDEX: u32 = 1;

// ============================================================================
// Save flags (write)
// ============================================================================

/// Store the entry in the first unused slot.
pub const PHONEBOOK_WRITE_FLAG_SAVE_UNUSED: u32 = 0;
/// Store the entry in the slot named by the index field.
pub const PHONEBOOK_WRITE_FLAG_SAVE_INDEX: u32 = 1;

// ============================================================================
// Timing
// ============================================================================

/// Per-command reply budget, in seconds.
pub const COMMAND_TIMEOUT_SECS: u64 = 10;
