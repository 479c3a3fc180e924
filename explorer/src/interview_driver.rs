//! Structured interview: topic → generated questions → answers/skips →
//! summary.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend_service::KnowledgeBackend;
use crate::error::{ExplorerError, Notice, Operation, Result};
use crate::models::{InterviewAnswer, InterviewSummary, QaPair};
use crate::settlement::Settlements;

pub const SKIPPED_ANSWER: &str = "Skipped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewStage {
    Intake,
    Questioning(usize),
    Summarizing,
    Summarized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewSession {
    pub topic: String,
    pub questions: Vec<String>,
    pub answers: Vec<InterviewAnswer>,
    pub current_index: usize,
    pub summary: Option<String>,
}

impl InterviewSession {
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.answers.len() == self.questions.len()
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }
}

enum InterviewSettlement {
    Questions {
        epoch: Uuid,
        outcome: Result<Vec<String>>,
    },
    Summary {
        epoch: Uuid,
        outcome: Result<InterviewSummary>,
    },
}

pub struct InterviewDriver {
    backend: Arc<dyn KnowledgeBackend>,
    session: InterviewSession,
    epoch: Uuid,
    generating: bool,
    summarizing: bool,
    summary_failed: bool,
    notice: Option<Notice>,
    settlements: Settlements<InterviewSettlement>,
}

impl InterviewDriver {
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            backend,
            session: InterviewSession::default(),
            epoch: Uuid::new_v4(),
            generating: false,
            summarizing: false,
            summary_failed: false,
            notice: None,
            settlements: Settlements::new(),
        }
    }

    pub fn stage(&self) -> InterviewStage {
        let session = &self.session;
        if session.summary.is_some() {
            InterviewStage::Summarized
        } else if session.questions.is_empty() {
            InterviewStage::Intake
        } else if session.is_complete() {
            InterviewStage::Summarizing
        } else {
            InterviewStage::Questioning(session.current_index)
        }
    }

    /// Requests a question list for `topic`. Stays in `Intake` until the
    /// questions arrive.
    pub fn start(&mut self, topic: &str) -> Result<()> {
        if self.stage() != InterviewStage::Intake || self.generating {
            return Err(ExplorerError::InvalidTransition(
                "an interview is already in progress".to_string(),
            ));
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ExplorerError::Validation("Please enter a topic".to_string()));
        }

        self.session.topic = topic.to_string();
        self.generating = true;
        self.notice = None;

        let backend = Arc::clone(&self.backend);
        let topic = topic.to_string();
        let epoch = self.epoch;
        self.settlements.schedule(async move {
            InterviewSettlement::Questions {
                epoch,
                outcome: backend.generate_questions(&topic).await,
            }
        });
        Ok(())
    }

    pub fn answer(&mut self, text: &str) -> Result<InterviewStage> {
        if text.trim().is_empty() {
            return Err(ExplorerError::Validation("Please enter an answer".to_string()));
        }
        self.record(text.trim().to_string(), false)
    }

    pub fn skip(&mut self) -> Result<InterviewStage> {
        self.record(SKIPPED_ANSWER.to_string(), true)
    }

    fn record(&mut self, answer: String, skipped: bool) -> Result<InterviewStage> {
        let index = match self.stage() {
            InterviewStage::Questioning(index) => index,
            stage => {
                return Err(ExplorerError::InvalidTransition(format!(
                    "cannot answer while {:?}",
                    stage
                )))
            }
        };

        let question = self.session.questions[index].clone();
        self.session.answers.push(InterviewAnswer {
            question,
            answer,
            skipped,
        });
        self.session.current_index += 1;

        if self.session.is_complete() {
            self.request_summary();
        }
        Ok(self.stage())
    }

    /// Re-issues summarization after a failure.
    pub fn retry_summary(&mut self) -> Result<()> {
        if self.stage() != InterviewStage::Summarizing || self.summarizing {
            return Err(ExplorerError::InvalidTransition(
                "no failed summarization to retry".to_string(),
            ));
        }
        self.request_summary();
        Ok(())
    }

    fn request_summary(&mut self) {
        self.summarizing = true;
        self.summary_failed = false;
        self.notice = None;

        let conversation: Vec<QaPair> = self
            .session
            .answers
            .iter()
            .map(|a| QaPair {
                question: a.question.clone(),
                answer: a.answer.clone(),
            })
            .collect();
        let topic = self.session.topic.clone();
        let backend = Arc::clone(&self.backend);
        let epoch = self.epoch;

        log::info!("Summarizing interview on '{}' ({} answers)", topic, conversation.len());
        self.settlements.schedule(async move {
            InterviewSettlement::Summary {
                epoch,
                outcome: backend.summarize_interview(&topic, &conversation).await,
            }
        });
    }

    /// Applies the next finished call. `None` means the result belonged to a
    /// session that was reset meanwhile.
    pub async fn settle_next(&mut self) -> Option<Result<InterviewStage>> {
        let settlement = self.settlements.next().await;
        self.apply(settlement)
    }

    fn apply(&mut self, settlement: InterviewSettlement) -> Option<Result<InterviewStage>> {
        match settlement {
            InterviewSettlement::Questions { epoch, outcome } => {
                if epoch != self.epoch {
                    return None;
                }
                self.generating = false;
                match outcome {
                    Ok(questions) if !questions.is_empty() => {
                        log::info!("Received {} interview questions", questions.len());
                        self.session.questions = questions;
                        self.session.current_index = 0;
                        Some(Ok(self.stage()))
                    }
                    Ok(_) => Some(Err(self.generation_failed("no questions generated".to_string()))),
                    Err(e) => Some(Err(self.generation_failed(e.to_string()))),
                }
            }
            InterviewSettlement::Summary { epoch, outcome } => {
                if epoch != self.epoch {
                    return None;
                }
                self.summarizing = false;
                match outcome {
                    Ok(summary) => {
                        self.session.summary = Some(summary.summary);
                        Some(Ok(self.stage()))
                    }
                    Err(e) => {
                        log::error!("Interview summarization failed: {}", e);
                        self.summary_failed = true;
                        self.notice = Some(Notice::failure(Operation::Summarize));
                        Some(Err(e))
                    }
                }
            }
        }
    }

    fn generation_failed(&mut self, reason: String) -> ExplorerError {
        log::error!("Question generation failed: {}", reason);
        self.session.topic.clear();
        self.notice = Some(Notice::failure(Operation::GenerateQuestions));
        ExplorerError::QuestionGenerationFailed(reason)
    }

    /// Back to `Intake`; only allowed once the summary is in.
    pub fn reset(&mut self) -> Result<()> {
        if self.stage() != InterviewStage::Summarized {
            return Err(ExplorerError::InvalidTransition(
                "reset is only available after the summary".to_string(),
            ));
        }
        self.session = InterviewSession::default();
        self.epoch = Uuid::new_v4();
        self.generating = false;
        self.summarizing = false;
        self.summary_failed = false;
        self.notice = None;
        Ok(())
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn is_busy(&self) -> bool {
        self.generating || self.summarizing
    }

    pub fn summary_failed(&self) -> bool {
        self.summary_failed
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
