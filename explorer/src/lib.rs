//! Client-side state machines for exploring a knowledge base: grouped
//! search, cited AI chat, structured interviews and gap analysis.
//!
//! Drivers own their state, schedule backend calls on the tokio runtime and
//! apply the outcomes in `settle_next`, one settlement at a time.

pub mod backend_service;
pub mod config;
pub mod conversation_driver;
pub mod error;
pub mod gap_explorer;
pub mod gap_merger;
pub mod interview_driver;
pub mod models;
pub mod result_grouper;
pub mod sanitizer;
pub mod search_driver;
pub mod summary_viewer;
pub mod upload_service;

mod settlement;

#[cfg(test)]
mod test_support;

pub use backend_service::{HttpBackend, KnowledgeBackend};
pub use config::{ClientConfig, Role};
pub use conversation_driver::{CitationAction, ConversationDriver};
pub use error::{ExplorerError, Notice, Operation, Result};
pub use gap_explorer::GapExplorer;
pub use gap_merger::{DisplayState, GapMerger};
pub use interview_driver::{InterviewDriver, InterviewSession, InterviewStage};
pub use models::*;
pub use result_grouper::ResultGrouper;
pub use sanitizer::HtmlSanitizer;
pub use search_driver::SearchDriver;
pub use summary_viewer::SummaryViewer;
pub use upload_service::upload_file;
