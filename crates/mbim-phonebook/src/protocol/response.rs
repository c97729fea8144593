//! Reply decoding for the phonebook service.
//!
//! Replies arrive as a raw information buffer: little-endian u32 fields,
//! strings as (offset, size) pairs referencing UTF-16LE payload bytes,
//! and entry lists as a count followed by (offset, size) references to
//! per-entry structs. Buffers come from the device and are treated as
//! untrusted: every reference is bounds-checked before it is followed.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResponseError {
    #[error("reply truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
    #[error("string reference out of range: offset={offset} size={size} buffer={buffer}")]
    StringOutOfRange {
        offset: usize,
        size: usize,
        buffer: usize,
    },
    #[error("entry reference out of range: offset={offset} size={size} buffer={buffer}")]
    EntryOutOfRange {
        offset: usize,
        size: usize,
        buffer: usize,
    },
    #[error("string payload is not valid UTF-16")]
    BadUtf16,
}

/// Reported phonebook storage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonebookState {
    Unknown,
    Initialized,
    NotInitialized,
}

impl PhonebookState {
    /// Map the raw wire value. Values the protocol does not define
    /// collapse to `Unknown`, which renders as the literal "unknown".
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => PhonebookState::Initialized,
            2 => PhonebookState::NotInitialized,
            _ => PhonebookState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhonebookState::Unknown => "unknown",
            PhonebookState::Initialized => "initialized",
            PhonebookState::NotInitialized => "not-initialized",
        }
    }
}

impl fmt::Display for PhonebookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration snapshot, valid for a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonebookConfiguration {
    pub state: PhonebookState,
    pub total_slots: u32,
    pub used_slots: u32,
    pub max_number_length: u32,
    pub max_name_length: u32,
}

impl PhonebookConfiguration {
    /// Fixed 20-byte information buffer: five u32 fields.
    pub const SIZE: usize = 20;
}

/// One stored entry, in device-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookEntry {
    pub index: u32,
    pub name: String,
    pub number: String,
}

/// Per-entry struct layout: index u32, then (offset, size) pairs for the
/// number and name strings, offsets relative to the struct start.
const ENTRY_FIXED_SIZE: usize = 20;
/// Each list element is an (offset, size) reference pair.
const ENTRY_REF_SIZE: usize = 8;

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, ResponseError> {
    let end = offset.checked_add(4).ok_or(ResponseError::Truncated {
        needed: usize::MAX,
        got: buf.len(),
    })?;
    if end > buf.len() {
        return Err(ResponseError::Truncated {
            needed: end,
            got: buf.len(),
        });
    }
    Ok(LittleEndian::read_u32(&buf[offset..end]))
}

/// Follow a (offset, size) string reference within `region`.
///
/// A zero offset or zero size denotes the empty string, matching how
/// devices encode absent fields.
fn read_string(region: &[u8], offset: usize, size: usize) -> Result<String, ResponseError> {
    if offset == 0 || size == 0 {
        return Ok(String::new());
    }
    let end = offset
        .checked_add(size)
        .filter(|&end| end <= region.len())
        .ok_or(ResponseError::StringOutOfRange {
            offset,
            size,
            buffer: region.len(),
        })?;
    let bytes = &region[offset..end];
    if bytes.len() % 2 != 0 {
        return Err(ResponseError::BadUtf16);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .collect();
    String::from_utf16(&units).map_err(|_| ResponseError::BadUtf16)
}

/// Decode a configuration query reply.
pub fn decode_configuration(buf: &[u8]) -> Result<PhonebookConfiguration, ResponseError> {
    if buf.len() < PhonebookConfiguration::SIZE {
        return Err(ResponseError::Truncated {
            needed: PhonebookConfiguration::SIZE,
            got: buf.len(),
        });
    }
    Ok(PhonebookConfiguration {
        state: PhonebookState::from_raw(read_u32(buf, 0)?),
        total_slots: read_u32(buf, 4)?,
        used_slots: read_u32(buf, 8)?,
        max_number_length: read_u32(buf, 12)?,
        max_name_length: read_u32(buf, 16)?,
    })
}

/// Decode one entry struct out of its referenced region.
fn decode_entry(region: &[u8]) -> Result<PhonebookEntry, ResponseError> {
    if region.len() < ENTRY_FIXED_SIZE {
        return Err(ResponseError::Truncated {
            needed: ENTRY_FIXED_SIZE,
            got: region.len(),
        });
    }
    let index = read_u32(region, 0)?;
    let number_offset = read_u32(region, 4)? as usize;
    let number_size = read_u32(region, 8)? as usize;
    let name_offset = read_u32(region, 12)? as usize;
    let name_size = read_u32(region, 16)? as usize;
    Ok(PhonebookEntry {
        index,
        number: read_string(region, number_offset, number_size)?,
        name: read_string(region, name_offset, name_size)?,
    })
}

/// Decode a read query reply into the reported count and the entries in
/// device order.
pub fn decode_read(buf: &[u8]) -> Result<(u32, Vec<PhonebookEntry>), ResponseError> {
    let entry_count = read_u32(buf, 0)? as usize;

    // The reference table alone must fit before any entry is followed;
    // this bounds a hostile count field by the buffer length.
    let table_end = 4 + entry_count.saturating_mul(ENTRY_REF_SIZE);
    if table_end > buf.len() {
        return Err(ResponseError::Truncated {
            needed: table_end,
            got: buf.len(),
        });
    }

    let mut entries = Vec::with_capacity(entry_count);
    for i in 0..entry_count {
        let ref_base = 4 + i * ENTRY_REF_SIZE;
        let offset = read_u32(buf, ref_base)? as usize;
        let size = read_u32(buf, ref_base + 4)? as usize;
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= buf.len())
            .ok_or(ResponseError::EntryOutOfRange {
                offset,
                size,
                buffer: buf.len(),
            })?;
        entries.push(decode_entry(&buf[offset..end])?);
    }
    Ok((entry_count as u32, entries))
}

/// Write and update replies carry no payload; receiving the correlated
/// reply at all is the acknowledgement.
pub fn decode_write_ack(_buf: &[u8]) -> Result<(), ResponseError> {
    Ok(())
}

/// Delete replies carry no payload, same as write.
pub fn decode_delete_ack(_buf: &[u8]) -> Result<(), ResponseError> {
    Ok(())
}
