//! Time-windowed re-contact policy.
//!
//! Prior contacts are classified as light (email or call only, 90 days) or
//! heavy (anything else, 365 days). A company is blocked while any of its
//! contacts is still inside its window.

pub mod contact_type;
pub mod date_repair;
pub mod ledger;


pub use contact_type::{ContactWeight, parse_contact_types};
pub use date_repair::repair_swapped_date;
pub use ledger::{ContactEvent, ContactHistory, CooldownBlock, is_in_cooldown};
