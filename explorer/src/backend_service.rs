use crate::config::ClientConfig;
use crate::error::{ExplorerError, Operation, Result};
use crate::models::*;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Everything the drivers need from the retrieval, conversation and storage
/// collaborators.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse>;

    async fn list_gaps(&self, topic: Option<&str>) -> Result<GapReport>;

    async fn analyze_gaps(&self, topic: &str) -> Result<GapReport>;

    async fn chat(&self, query: &str) -> Result<ChatReply>;

    async fn generate_questions(&self, topic: &str) -> Result<Vec<String>>;

    async fn summarize_interview(
        &self,
        topic: &str,
        conversation: &[QaPair],
    ) -> Result<InterviewSummary>;

    async fn upload(&self, upload: &ContentUpload) -> Result<()>;

    async fn recommendations(&self) -> Result<Vec<Recommendation>>;
}

/// [`KnowledgeBackend`] over authenticated HTTP+JSON.
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        log::info!("Knowledge backend at {}", config.base_url);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<String> {
        let request = match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.or(e.message))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            log::warn!("{} request failed ({}): {}", operation, status, message);
            return Err(ExplorerError::Backend {
                operation,
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T> {
        let body = self.send(operation, request).await?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("Malformed {} response: {}", operation, e);
            ExplorerError::InvalidResponseShape(format!("{}: {}", operation, e))
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.config.endpoint(path))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.config.endpoint(path))
    }
}

#[async_trait]
impl KnowledgeBackend for HttpBackend {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let request = self.post("search").json(&QueryRequest { query });
        self.send_json(Operation::Search, request).await
    }

    async fn list_gaps(&self, topic: Option<&str>) -> Result<GapReport> {
        let mut request = self.get("gaps");
        if let Some(topic) = topic {
            request = request.query(&[("topic", topic)]);
        }
        self.send_json(Operation::GapList, request).await
    }

    async fn analyze_gaps(&self, topic: &str) -> Result<GapReport> {
        let request = self.post("detect_gaps").json(&TopicRequest { topic });
        self.send_json(Operation::GapAnalysis, request).await
    }

    async fn chat(&self, query: &str) -> Result<ChatReply> {
        let request = self.post("chat").json(&QueryRequest { query });
        self.send_json(Operation::Chat, request).await
    }

    async fn generate_questions(&self, topic: &str) -> Result<Vec<String>> {
        let request = self.post("ai/generate-questions").json(&TopicRequest { topic });
        let set: QuestionSet = self.send_json(Operation::GenerateQuestions, request).await?;
        Ok(set.questions)
    }

    async fn summarize_interview(
        &self,
        topic: &str,
        conversation: &[QaPair],
    ) -> Result<InterviewSummary> {
        let request = self
            .post("ai/summarize-chat")
            .json(&SummarizeRequest { topic, conversation });
        self.send_json(Operation::Summarize, request).await
    }

    async fn upload(&self, upload: &ContentUpload) -> Result<()> {
        let file = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = Form::new()
            .text("topic", upload.topic.clone())
            .part("file", file);

        let path = format!("{}/knowledge/upload", self.config.role.path_segment());
        self.send(Operation::Upload, self.post(&path).multipart(form))
            .await?;

        log::info!("Uploaded {} for topic '{}'", upload.file_name, upload.topic);
        Ok(())
    }

    async fn recommendations(&self) -> Result<Vec<Recommendation>> {
        let list: RecommendationList = self
            .send_json(Operation::Recommendations, self.get("recommendations"))
            .await?;
        Ok(list.recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{backend_error, StubBackend};
    use std::sync::Arc;

    fn runbook() -> Recommendation {
        serde_json::from_value(serde_json::json!({
            "id": "r1",
            "title": "Kafka runbook",
            "fileLink": "https://drive.example/r1",
            "keywords": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn recommendations_flow_through_the_trait_object() {
        let backend: Arc<dyn KnowledgeBackend> = Arc::new(
            StubBackend::new()
                .with_recommendations(Ok(vec![runbook()]))
                .with_recommendations(Err(backend_error(Operation::Recommendations))),
        );

        let docs = backend.recommendations().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Kafka runbook");
        assert!(docs[0].keywords.is_empty());

        let err = backend.recommendations().await.unwrap_err();
        assert!(err.is_network_or_backend());
    }

    #[test]
    fn http_backend_keeps_its_config() {
        let backend = HttpBackend::new(ClientConfig::default()).unwrap();
        assert_eq!(
            backend.config().endpoint("recommendations"),
            format!("{}/recommendations", ClientConfig::default().base_url)
        );
    }
}
