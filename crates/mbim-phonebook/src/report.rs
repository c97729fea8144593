//! Human-readable report rendering.
//!
//! Pure string builders so the exact output can be unit tested; the
//! runner decides where the text goes.

use std::fmt::Write;

use crate::protocol::{PhonebookConfiguration, PhonebookEntry};

pub const WRITE_CONFIRMATION: &str = "Phonebook entry successfully written/updated";
pub const DELETE_CONFIRMATION: &str = "Phonebook entry/entries successfully deleted";

/// Fixed-label key/value block for a configuration query.
pub fn render_configuration(config: &PhonebookConfiguration) -> String {
    format!(
        "Phonebook configuration retrieved\n\
         \t   Phonebook state: {}\n\
         \t Number of entries: {}\n\
         \t      Used entries: {}\n\
         \t Max number length: {}\n\
         \t   Max name length: {}",
        config.state,
        config.total_slots,
        config.used_slots,
        config.max_number_length,
        config.max_name_length,
    )
}

/// Count line followed by one indented block per entry, in device order.
pub fn render_entries(entry_count: u32, entries: &[PhonebookEntry]) -> String {
    let mut out = String::from("Successfully read phonebook entry/entries\n");
    write!(out, "\tPhonebook entries count: {entry_count}").unwrap();
    for entry in entries {
        write!(
            out,
            "\n\tEntry index: {}\n\
             \t     Number: {}\n\
             \t       Name: {}",
            entry.index, entry.number, entry.name,
        )
        .unwrap();
    }
    out
}
