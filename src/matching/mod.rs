//! Company-name matching against the Do-Not-Contact registry.
//!
//! The pipeline has three stages:
//! 1. Normalization (lowercase, legal suffixes dropped, punctuation collapsed)
//! 2. Variant extraction for compound and multi-brand names
//! 3. Registry lookup: an exact pass over the variants, then a guarded
//!    substring pass over the whole name

pub mod normalize;
pub mod registry;
pub mod stopwords;
pub mod variants;


pub use normalize::normalize_company;
pub use registry::{DncMatch, MatchStrategy, SuppressionRegistry, is_blocked};
pub use variants::{extract_variants, extract_variants_with_min_length};
