//! Advisory pipeline services

pub mod advisory;
pub mod context;
pub mod document;
pub mod prompt;

pub use advisory::{Advisory, AdvisoryService};
pub use context::{ContextAggregator, ContextOverrides};
pub use document::extract_document_text;
pub use prompt::PromptComposer;
