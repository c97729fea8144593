//! Simulated phonebook device.
//!
//! In-memory backend implementing [`PhonebookDevice`] so the tool runs
//! end to end without hardware. Replies are encoded exactly as a device
//! lays them out (little-endian fields, offset/size string references,
//! UTF-16LE payloads), so the core's decoder is exercised for real.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use mbim_phonebook::protocol::{
    PHONEBOOK_FLAG_ALL, PHONEBOOK_FLAG_INDEX, PHONEBOOK_WRITE_FLAG_SAVE_INDEX,
    PHONEBOOK_WRITE_FLAG_SAVE_UNUSED,
};
use mbim_phonebook::{PhonebookDevice, RequestEnvelope, RequestKind, TransportError};

#[derive(Debug, Clone)]
struct SlotEntry {
    name: String,
    number: String,
}

/// An initialized phonebook with a fixed number of slots.
pub struct SimulatedPhonebook {
    slots: Mutex<BTreeMap<u32, SlotEntry>>,
    total_slots: u32,
    max_number_length: u32,
    max_name_length: u32,
}

impl SimulatedPhonebook {
    pub fn new(total_slots: u32) -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
            total_slots,
            max_number_length: 20,
            max_name_length: 30,
        }
    }

    /// A phonebook pre-populated with a couple of entries.
    pub fn with_sample_entries() -> Self {
        let sim = Self::new(250);
        {
            let mut slots = sim.slots.lock().unwrap();
            slots.insert(
                1,
                SlotEntry {
                    name: "Alice".into(),
                    number: "5551234".into(),
                },
            );
            slots.insert(
                2,
                SlotEntry {
                    name: "Bob".into(),
                    number: "5559876".into(),
                },
            );
        }
        sim
    }

    fn configuration_reply(&self) -> Vec<u8> {
        let used = self.slots.lock().unwrap().len() as u32;
        let mut buf = Vec::with_capacity(20);
        // State 1 = initialized.
        for v in [
            1u32,
            self.total_slots,
            used,
            self.max_number_length,
            self.max_name_length,
        ] {
            buf.write_u32::<LittleEndian>(v).unwrap();
        }
        buf
    }

    fn read_reply(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        let slots = self.slots.lock().unwrap();
        let selected: Vec<(u32, SlotEntry)> = if request.flag == PHONEBOOK_FLAG_INDEX {
            let entry = slots.get(&request.index).ok_or_else(|| {
                TransportError::CommandFailed(format!("no entry at index {}", request.index))
            })?;
            vec![(request.index, entry.clone())]
        } else {
            slots.iter().map(|(i, e)| (*i, e.clone())).collect()
        };

        let structs: Vec<Vec<u8>> = selected
            .iter()
            .map(|(index, entry)| encode_entry(*index, &entry.name, &entry.number))
            .collect();

        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(structs.len() as u32).unwrap();
        let mut offset = 4 + structs.len() * 8;
        for s in &structs {
            buf.write_u32::<LittleEndian>(offset as u32).unwrap();
            buf.write_u32::<LittleEndian>(s.len() as u32).unwrap();
            offset += s.len();
        }
        for s in &structs {
            buf.extend_from_slice(s);
        }
        Ok(buf)
    }

    fn delete(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        let mut slots = self.slots.lock().unwrap();
        if request.flag == PHONEBOOK_FLAG_INDEX {
            if slots.remove(&request.index).is_none() {
                return Err(TransportError::CommandFailed(format!(
                    "no entry at index {}",
                    request.index
                )));
            }
        } else if request.flag == PHONEBOOK_FLAG_ALL {
            slots.clear();
        } else {
            return Err(TransportError::CommandFailed(format!(
                "unsupported filter flag {}",
                request.flag
            )));
        }
        Ok(Vec::new())
    }

    fn write(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        let name = request.name.clone().unwrap_or_default();
        let number = request.number.clone().unwrap_or_default();
        if name.encode_utf16().count() as u32 > self.max_name_length {
            return Err(TransportError::CommandFailed("name too long".into()));
        }
        if number.encode_utf16().count() as u32 > self.max_number_length {
            return Err(TransportError::CommandFailed("number too long".into()));
        }

        let mut slots = self.slots.lock().unwrap();
        let index = match request.flag {
            PHONEBOOK_WRITE_FLAG_SAVE_UNUSED => (1..=self.total_slots)
                .find(|i| !slots.contains_key(i))
                .ok_or_else(|| TransportError::CommandFailed("phonebook full".into()))?,
            PHONEBOOK_WRITE_FLAG_SAVE_INDEX => {
                if request.index == 0 || request.index > self.total_slots {
                    return Err(TransportError::CommandFailed(format!(
                        "index {} out of range",
                        request.index
                    )));
                }
                request.index
            }
            flag => {
                return Err(TransportError::CommandFailed(format!(
                    "unsupported save flag {flag}"
                )));
            }
        };
        slots.insert(index, SlotEntry { name, number });
        Ok(Vec::new())
    }
}

#[async_trait]
impl PhonebookDevice for SimulatedPhonebook {
    async fn command(&self, request: &RequestEnvelope) -> Result<Vec<u8>, TransportError> {
        debug!(kind = ?request.kind, flag = request.flag, index = request.index, "simulated command");
        match request.kind {
            RequestKind::ConfigurationQuery => Ok(self.configuration_reply()),
            RequestKind::ReadQuery => self.read_reply(request),
            RequestKind::DeleteSet => self.delete(request),
            RequestKind::WriteSet => self.write(request),
        }
    }
}

fn utf16_bytes(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        out.write_u16::<LittleEndian>(unit).unwrap();
    }
    out
}

/// Entry struct: index, number (offset, size), name (offset, size),
/// string offsets relative to the struct start.
fn encode_entry(index: u32, name: &str, number: &str) -> Vec<u8> {
    let number_bytes = utf16_bytes(number);
    let name_bytes = utf16_bytes(name);
    let mut buf = Vec::with_capacity(20 + number_bytes.len() + name_bytes.len());
    buf.write_u32::<LittleEndian>(index).unwrap();
    buf.write_u32::<LittleEndian>(20).unwrap();
    buf.write_u32::<LittleEndian>(number_bytes.len() as u32)
        .unwrap();
    buf.write_u32::<LittleEndian>((20 + number_bytes.len()) as u32)
        .unwrap();
    buf.write_u32::<LittleEndian>(name_bytes.len() as u32)
        .unwrap();
    buf.extend_from_slice(&number_bytes);
    buf.extend_from_slice(&name_bytes);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbim_phonebook::Action;
    use mbim_phonebook::protocol::{decode_configuration, decode_read};

    #[tokio::test]
    async fn test_write_then_read_all_round_trip() {
        let sim = SimulatedPhonebook::new(10);

        let write = RequestEnvelope::from_action(&Action::Write {
            name: "Carol".into(),
            number: "5550000".into(),
        });
        sim.command(&write).await.unwrap();

        let read = RequestEnvelope::from_action(&Action::ReadAll);
        let reply = sim.command(&read).await.unwrap();
        let (count, entries) = decode_read(&reply).unwrap();
        assert_eq!(count, 1);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].name, "Carol");
        assert_eq!(entries[0].number, "5550000");
    }

    #[tokio::test]
    async fn test_configuration_tracks_used_slots() {
        let sim = SimulatedPhonebook::with_sample_entries();
        let request = RequestEnvelope::from_action(&Action::QueryConfiguration);
        let reply = sim.command(&request).await.unwrap();
        let config = decode_configuration(&reply).unwrap();
        assert_eq!(config.used_slots, 2);
        assert_eq!(config.total_slots, 250);
    }

    #[tokio::test]
    async fn test_read_missing_index_fails() {
        let sim = SimulatedPhonebook::new(10);
        let request = RequestEnvelope::from_action(&Action::ReadOne { index: 5 });
        let err = sim.command(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::CommandFailed(_)));
    }

    #[tokio::test]
    async fn test_delete_all_clears_slots() {
        let sim = SimulatedPhonebook::with_sample_entries();
        let delete = RequestEnvelope::from_action(&Action::DeleteAll);
        sim.command(&delete).await.unwrap();

        let read = RequestEnvelope::from_action(&Action::ReadAll);
        let (count, entries) = decode_read(&sim.command(&read).await.unwrap()).unwrap();
        assert_eq!(count, 0);
        assert!(entries.is_empty());
    }
}
