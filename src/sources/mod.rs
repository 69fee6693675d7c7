//! Loaders for the inputs of a gate run.
//!
//! These are the only parts of the crate that touch the filesystem. Loading
//! errors surface here, never during classification.

pub mod contacts;
pub mod dnc;
pub mod leads;
pub mod send_log;
pub mod table;

pub use contacts::{load_optional_recent_contacts, load_recent_contacts};
pub use dnc::{dnc_variant_rows, load_dnc_names, load_do_not_contact, write_variant_rows};
pub use leads::load_leads;
pub use send_log::{
    SendLogRecord, append_send_log, append_suppression, load_contacted_companies,
    load_suppression, record_send,
};
