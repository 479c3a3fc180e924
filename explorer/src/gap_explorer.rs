use std::sync::Arc;

use crate::backend_service::KnowledgeBackend;
use crate::error::{ExplorerError, Notice, Operation, Result};
use crate::models::GapReport;
use crate::settlement::Settlements;

struct GapSettlement {
    generation: u64,
    operation: Operation,
    outcome: Result<GapReport>,
}

/// Curator view over the knowledge base's coverage gaps.
pub struct GapExplorer {
    backend: Arc<dyn KnowledgeBackend>,
    report: Option<GapReport>,
    generation: u64,
    pending: Option<Operation>,
    notice: Option<Notice>,
    settlements: Settlements<GapSettlement>,
}

impl GapExplorer {
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            backend,
            report: None,
            generation: 0,
            pending: None,
            notice: None,
            settlements: Settlements::new(),
        }
    }

    /// Reloads the full gap list.
    pub fn refresh(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.schedule(Operation::GapList, async move { backend.list_gaps(None).await });
    }

    /// Runs gap analysis for one topic.
    pub fn analyze(&mut self, topic: &str) -> Result<()> {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return Err(ExplorerError::Validation(
                "Please enter a topic to analyze".to_string(),
            ));
        }
        let backend = Arc::clone(&self.backend);
        self.schedule(Operation::GapAnalysis, async move {
            backend.analyze_gaps(&topic).await
        });
        Ok(())
    }

    fn schedule<F>(&mut self, operation: Operation, call: F)
    where
        F: std::future::Future<Output = Result<GapReport>> + Send + 'static,
    {
        self.generation += 1;
        self.pending = Some(operation);
        self.notice = None;

        let generation = self.generation;
        self.settlements.schedule(async move {
            GapSettlement {
                generation,
                operation,
                outcome: call.await,
            }
        });
    }

    pub async fn settle_next(&mut self) -> bool {
        let settlement = self.settlements.next().await;
        self.apply(settlement)
    }

    fn apply(&mut self, settlement: GapSettlement) -> bool {
        if settlement.generation != self.generation {
            return false;
        }
        self.pending = None;

        match settlement.outcome {
            Ok(report) => {
                log::info!("{} returned {} gaps", settlement.operation, report.gaps.len());
                self.report = Some(report);
            }
            Err(e) => {
                log::error!("{} failed: {}", settlement.operation, e);
                self.notice = Some(Notice::failure(settlement.operation));
            }
        }
        true
    }

    pub fn report(&self) -> Option<&GapReport> {
        self.report.as_ref()
    }

    pub fn pending(&self) -> Option<Operation> {
        self.pending
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gap;
    use crate::test_support::{backend_error, StubBackend};

    fn report(topic: &str) -> GapReport {
        GapReport {
            gaps: vec![Gap {
                id: None,
                topic: topic.to_string(),
                reason: Some("No material yet".to_string()),
            }],
            html_content: format!("<h3>{}</h3><p>No material yet</p>", topic),
        }
    }

    #[tokio::test]
    async fn refresh_then_analyze_replaces_report() {
        let backend = Arc::new(
            StubBackend::new()
                .with_gaps(Ok(report("Observability")))
                .with_gaps(Ok(report("Kafka consumers"))),
        );
        let mut explorer = GapExplorer::new(backend.clone());

        explorer.refresh();
        assert_eq!(explorer.pending(), Some(Operation::GapList));
        explorer.settle_next().await;
        assert_eq!(explorer.report().unwrap().gaps[0].topic, "Observability");

        explorer.analyze("Kafka").unwrap();
        explorer.settle_next().await;
        assert_eq!(explorer.report().unwrap().gaps[0].topic, "Kafka consumers");
        assert_eq!(
            backend.calls(),
            vec!["gaps:".to_string(), "detect_gaps:Kafka".to_string()]
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_report() {
        let backend = Arc::new(
            StubBackend::new()
                .with_gaps(Ok(report("Observability")))
                .with_gaps(Err(backend_error(Operation::GapAnalysis))),
        );
        let mut explorer = GapExplorer::new(backend);

        explorer.refresh();
        explorer.settle_next().await;
        explorer.analyze("Kafka").unwrap();
        explorer.settle_next().await;

        assert_eq!(explorer.report().unwrap().gaps[0].topic, "Observability");
        let notice = explorer.take_notice().unwrap();
        assert_eq!(notice.message, "Failed to analyze topic");
        assert!(explorer.pending().is_none());
    }

    #[tokio::test]
    async fn blank_topic_is_rejected() {
        let backend = Arc::new(StubBackend::new());
        let mut explorer = GapExplorer::new(backend.clone());

        assert!(explorer.analyze("   ").is_err());
        assert!(explorer.pending().is_none());
        assert!(backend.calls().is_empty());
    }
}
