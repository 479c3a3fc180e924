//! Scripted in-memory backend for driver tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend_service::KnowledgeBackend;
use crate::error::{ExplorerError, Operation, Result};
use crate::models::*;

#[derive(Default)]
pub(crate) struct StubBackend {
    calls: Mutex<Vec<String>>,
    chat: Mutex<VecDeque<Result<ChatReply>>>,
    search: Mutex<VecDeque<Result<SearchResponse>>>,
    gaps: Mutex<VecDeque<Result<GapReport>>>,
    questions: Mutex<VecDeque<Result<Vec<String>>>>,
    summaries: Mutex<VecDeque<Result<InterviewSummary>>>,
    recommendations: Mutex<VecDeque<Result<Vec<Recommendation>>>>,
    uploads: Mutex<Vec<ContentUpload>>,
    summarized: Mutex<Vec<(String, Vec<QaPair>)>>,
    delays: Mutex<HashMap<String, Duration>>,
}

pub(crate) fn backend_error(operation: Operation) -> ExplorerError {
    ExplorerError::Backend {
        operation,
        status: 500,
        message: "boom".to_string(),
    }
}

pub(crate) fn reply(text: &str) -> ChatReply {
    ChatReply {
        response: text.to_string(),
        context: ChatContext {
            documents_found: 1,
            relevant_topics: vec!["rust".to_string()],
            documents: vec![CitedDocument {
                title: "Ownership".to_string(),
                original_filename: Some("ownership.pdf".to_string()),
                field: Some("engineering".to_string()),
                view_link: Some("https://files.example/ownership".to_string()),
                file_link: Some("https://files.example/ownership".to_string()),
                doc_type: DocType::Document,
                summary_content: None,
            }],
        },
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T>>>, operation: Operation) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(backend_error(operation)))
}

impl StubBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_chat(self, outcome: Result<ChatReply>) -> Self {
        self.chat.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn with_search(self, outcome: Result<SearchResponse>) -> Self {
        self.search.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn with_gaps(self, outcome: Result<GapReport>) -> Self {
        self.gaps.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn with_questions(self, outcome: Result<Vec<String>>) -> Self {
        self.questions.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn with_summary(self, outcome: Result<InterviewSummary>) -> Self {
        self.summaries.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn with_recommendations(self, outcome: Result<Vec<Recommendation>>) -> Self {
        self.recommendations.lock().unwrap().push_back(outcome);
        self
    }

    /// Delays every call whose argument equals `key`.
    pub(crate) fn with_delay(self, key: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<ContentUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub(crate) fn summarized(&self) -> Vec<(String, Vec<QaPair>)> {
        self.summarized.lock().unwrap().clone()
    }

    async fn record(&self, call: String, key: &str) {
        self.calls.lock().unwrap().push(call);
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl KnowledgeBackend for StubBackend {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.record(format!("search:{}", query), query).await;
        pop(&self.search, Operation::Search)
    }

    async fn list_gaps(&self, topic: Option<&str>) -> Result<GapReport> {
        self.record(format!("gaps:{}", topic.unwrap_or("")), "gaps").await;
        pop(&self.gaps, Operation::GapList)
    }

    async fn analyze_gaps(&self, topic: &str) -> Result<GapReport> {
        self.record(format!("detect_gaps:{}", topic), topic).await;
        pop(&self.gaps, Operation::GapAnalysis)
    }

    async fn chat(&self, query: &str) -> Result<ChatReply> {
        self.record(format!("chat:{}", query), query).await;
        pop(&self.chat, Operation::Chat)
    }

    async fn generate_questions(&self, topic: &str) -> Result<Vec<String>> {
        self.record(format!("generate:{}", topic), topic).await;
        pop(&self.questions, Operation::GenerateQuestions)
    }

    async fn summarize_interview(
        &self,
        topic: &str,
        conversation: &[QaPair],
    ) -> Result<InterviewSummary> {
        self.record(format!("summarize:{}", topic), "summarize").await;
        self.summarized
            .lock()
            .unwrap()
            .push((topic.to_string(), conversation.to_vec()));
        pop(&self.summaries, Operation::Summarize)
    }

    async fn upload(&self, upload: &ContentUpload) -> Result<()> {
        self.record(format!("upload:{}", upload.topic), "upload").await;
        self.uploads.lock().unwrap().push(upload.clone());
        Ok(())
    }

    async fn recommendations(&self) -> Result<Vec<Recommendation>> {
        self.record("recommendations".to_string(), "recommendations").await;
        pop(&self.recommendations, Operation::Recommendations)
    }
}
