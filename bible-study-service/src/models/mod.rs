//! Domain models for the bible study service.

pub mod generation;
pub mod verse;

pub use generation::{GenerationKind, GenerationRequest};
pub use verse::{translation_or_default, SearchResult, VerseRecord, DEFAULT_TRANSLATION};
