pub mod cli;
pub mod config;
pub mod cooldown;
pub mod gate;
pub mod matching;
pub mod models;
pub mod sources;

pub use config::MatchConfig;
pub use cooldown::{ContactEvent, ContactHistory, ContactWeight, CooldownBlock, is_in_cooldown};
pub use gate::{BlockReason, Lead, LeadDecision, LeadGate};
pub use matching::{
    DncMatch, MatchStrategy, SuppressionRegistry, extract_variants, is_blocked, normalize_company,
};
pub use models::{Output, Summary};
