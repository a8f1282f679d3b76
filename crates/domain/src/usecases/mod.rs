//! Application use cases / business logic

pub mod draft;
pub mod reply;
pub mod research;
pub mod style;

pub use draft::{PostDraft, PostDrafter};
pub use reply::{ReplyDrafter, ReplyPolicy, worthy};
pub use research::{MonitorOutcome, ResearchConfig, ResearchError, ResearchRun};
pub use style::{StyleAnalyzer, StyleConfig};
