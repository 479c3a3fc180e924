//! Free-form chat with the AI assistant.
//!
//! Every turn appends the user's message and a loading placeholder at once;
//! the backend call runs in the background and its settlement swaps the
//! placeholder (looked up by id, never by position) for the answer or for a
//! fixed error message.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend_service::KnowledgeBackend;
use crate::error::{Operation, Result};
use crate::models::{ChatMessage, ChatReply, CitedDocument, DocType};
use crate::settlement::Settlements;
use crate::summary_viewer::SummaryViewer;

/// What a citation click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationAction {
    /// The summary text is now in the viewer.
    ShowSummary,
    /// The caller should navigate to this link.
    OpenLink(String),
    Ignored,
}

struct ChatSettlement {
    epoch: Uuid,
    placeholder: Uuid,
    outcome: Result<ChatReply>,
}

pub struct ConversationDriver {
    backend: Arc<dyn KnowledgeBackend>,
    messages: Vec<ChatMessage>,
    epoch: Uuid,
    settlements: Settlements<ChatSettlement>,
}

impl ConversationDriver {
    /// Must be created inside a tokio runtime.
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            epoch: Uuid::new_v4(),
            settlements: Settlements::new(),
        }
    }

    /// Starts a chat turn. Returns the placeholder id, or `None` for blank
    /// input (nothing appended, no request made).
    pub fn send_message(&mut self, text: &str) -> Option<Uuid> {
        if text.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        let placeholder = ChatMessage::placeholder();
        let placeholder_id = placeholder.id;
        self.messages.push(placeholder);

        let backend = Arc::clone(&self.backend);
        let query = text.to_string();
        let epoch = self.epoch;
        self.settlements.schedule(async move {
            ChatSettlement {
                epoch,
                placeholder: placeholder_id,
                outcome: backend.chat(&query).await,
            }
        });

        Some(placeholder_id)
    }

    /// Applies the next finished turn. Returns `false` if it belonged to a
    /// session that has since been reset.
    pub async fn settle_next(&mut self) -> bool {
        let settlement = self.settlements.next().await;
        self.apply(settlement)
    }

    fn apply(&mut self, settlement: ChatSettlement) -> bool {
        if settlement.epoch != self.epoch {
            log::debug!("Discarding chat reply from a previous session");
            return false;
        }

        let before = self.messages.len();
        self.messages.retain(|m| m.id != settlement.placeholder);
        if self.messages.len() == before {
            log::warn!("Placeholder {} already gone", settlement.placeholder);
        }

        let message = match settlement.outcome {
            Ok(reply) => {
                log::info!(
                    "Chat reply with {} cited documents",
                    reply.context.documents_found
                );
                ChatMessage::ai(reply.response, Some(reply.context))
            }
            Err(e) => {
                log::error!("Chat request failed: {}", e);
                ChatMessage::ai(Operation::Chat.failure_message(), None)
            }
        };
        self.messages.push(message);
        true
    }

    /// Summaries open in the viewer; documents resolve to their file link.
    pub fn cite_document(&self, doc: &CitedDocument, viewer: &mut SummaryViewer) -> CitationAction {
        if doc.doc_type == DocType::Summary {
            if let Some(content) = &doc.summary_content {
                viewer.show(content);
                return CitationAction::ShowSummary;
            }
        }

        match &doc.file_link {
            Some(link) if !link.trim().is_empty() => CitationAction::OpenLink(link.clone()),
            _ => {
                log::warn!("Citation '{}' has neither summary nor file link", doc.title);
                CitationAction::Ignored
            }
        }
    }

    /// Clears the history. Replies still in flight are dropped on arrival.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.epoch = Uuid::new_v4();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.messages.iter().any(|m| m.is_loading)
    }
}
