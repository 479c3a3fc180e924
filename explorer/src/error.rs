//! Error taxonomy shared by the backend service and the drivers.

use std::fmt;

use thiserror::Error;

/// Backend operation kinds, used only to pick user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    GapList,
    GapAnalysis,
    Chat,
    GenerateQuestions,
    Summarize,
    Upload,
    Recommendations,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Search => "Search failed. Please try again.",
            Operation::GapList => "Failed to fetch knowledge gaps",
            Operation::GapAnalysis => "Failed to analyze topic",
            Operation::Chat => "Sorry, I couldn't process your request. Please try again.",
            Operation::GenerateQuestions => "Error generating questions",
            Operation::Summarize => "Error summarizing chat",
            Operation::Upload => "Failed to upload content",
            Operation::Recommendations => "Failed to fetch recommendations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Search => "search",
            Operation::GapList => "gap list",
            Operation::GapAnalysis => "gap analysis",
            Operation::Chat => "chat",
            Operation::GenerateQuestions => "question generation",
            Operation::Summarize => "summarization",
            Operation::Upload => "upload",
            Operation::Recommendations => "recommendations",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Blank or otherwise unusable input, rejected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Non-2xx response from a collaborator.
    #[error("{operation} failed with status {status}: {message}")]
    Backend {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose payload is missing expected fields.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    #[error("question generation failed: {0}")]
    QuestionGenerationFailed(String),

    /// Operation invoked in a state that does not accept it.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("unknown result group: {0}")]
    UnknownGroup(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::InvalidResponseShape(err.to_string())
    }
}

impl ExplorerError {
    /// True for failures the user can retry (backend or transport).
    pub fn is_network_or_backend(&self) -> bool {
        matches!(self, ExplorerError::Backend { .. } | ExplorerError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Transient, user-visible message produced by a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub message: String,
}

impl Notice {
    pub fn failure(operation: Operation) -> Self {
        Self {
            operation,
            message: operation.failure_message().to_string(),
        }
    }
}
