use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Reads a JSON `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Document,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    pub doc_type: DocType,
    #[serde(rename = "fileLink", default)]
    pub file_link: Option<String>,
    #[serde(rename = "viewLink", default)]
    pub view_link: Option<String>,
    #[serde(default)]
    pub summary_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub score: f64,
}

/// Search results keyed by title, in backend order.
pub type GroupedResults = IndexMap<String, Vec<SearchResult>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(default)]
    pub id: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Raw search payload; `results` is reshaped by the result grouper.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: serde_json::Value,
    #[serde(default)]
    pub has_gaps: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaps: Vec<Gap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaps: Vec<Gap>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedDocument {
    pub title: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(rename = "viewLink", default)]
    pub view_link: Option<String>,
    #[serde(rename = "fileLink", default)]
    pub file_link: Option<String>,
    pub doc_type: DocType,
    #[serde(default)]
    pub summary_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub documents_found: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relevant_topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<CitedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub context: ChatContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub is_loading: bool,
    pub context: Option<ChatContext>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, false, None)
    }

    pub fn ai(text: impl Into<String>, context: Option<ChatContext>) -> Self {
        Self::new(text, Sender::Ai, false, context)
    }

    pub fn placeholder() -> Self {
        Self::new(String::new(), Sender::Ai, true, None)
    }

    fn new(
        text: impl Into<String>,
        sender: Sender,
        is_loading: bool,
        context: Option<ChatContext>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            is_loading,
            context,
        }
    }
}

/// Question/answer pair as sent to the summarization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewAnswer {
    pub question: String,
    pub answer: String,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSummary {
    pub summary: String,
    #[serde(default)]
    pub summary_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(rename = "fileLink", default)]
    pub file_link: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<Recommendation>,
}

/// File contents and topic for a knowledge upload.
#[derive(Debug, Clone)]
pub struct ContentUpload {
    pub topic: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TopicRequest<'a> {
    pub topic: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SummarizeRequest<'a> {
    pub topic: &'a str,
    pub conversation: &'a [QaPair],
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
