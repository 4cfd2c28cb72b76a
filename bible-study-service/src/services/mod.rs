pub mod commentary;
pub mod metrics;
pub mod orchestrator;
pub mod providers;
pub mod scripture;

pub use commentary::{CommentaryGenerator, GenerationError};
pub use orchestrator::{StudyError, StudyOrchestrator};
pub use scripture::{BibleApiResolver, ResolveError, ScriptureResolver};
