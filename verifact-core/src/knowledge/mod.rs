//! Curated fact table and the rule-based matcher over it.
//!
//! The matcher is a lookup, not a classifier: claims outside geography,
//! population ranking and planet classification always come back `None`.
mod matcher;
pub mod table;

pub use matcher::{verify, KbVerdict};
pub use table::KNOWLEDGE_BASE;
