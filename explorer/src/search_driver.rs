use std::sync::Arc;

use crate::backend_service::KnowledgeBackend;
use crate::error::{ExplorerError, Notice, Operation, Result};
use crate::gap_merger::{DisplayState, GapMerger};
use crate::models::{SearchResponse, SearchResult};
use crate::result_grouper::ResultGrouper;
use crate::settlement::Settlements;

struct SearchSettlement {
    generation: u64,
    query: String,
    outcome: Result<SearchResponse>,
}

/// Search screen: query in, [`DisplayState`] out.
pub struct SearchDriver {
    backend: Arc<dyn KnowledgeBackend>,
    state: DisplayState,
    query: Option<String>,
    generation: u64,
    in_flight: bool,
    notice: Option<Notice>,
    settlements: Settlements<SearchSettlement>,
}

impl SearchDriver {
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            backend,
            state: DisplayState::NotSearched,
            query: None,
            generation: 0,
            in_flight: false,
            notice: None,
            settlements: Settlements::new(),
        }
    }

    /// Issues a search. A newer search supersedes any still in flight.
    pub fn search(&mut self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ExplorerError::Validation("Query is required".to_string()));
        }

        self.generation += 1;
        self.in_flight = true;
        self.notice = None;

        let backend = Arc::clone(&self.backend);
        let generation = self.generation;
        let query = query.to_string();
        self.settlements.schedule(async move {
            let outcome = backend.search(&query).await;
            SearchSettlement {
                generation,
                query,
                outcome,
            }
        });
        Ok(())
    }

    /// Applies the next finished search; `false` if it was superseded.
    pub async fn settle_next(&mut self) -> bool {
        let settlement = self.settlements.next().await;
        self.apply(settlement)
    }

    fn apply(&mut self, settlement: SearchSettlement) -> bool {
        if settlement.generation != self.generation {
            log::debug!("Dropping superseded search for '{}'", settlement.query);
            return false;
        }
        self.in_flight = false;

        let grouped = settlement.outcome.and_then(|response| {
            let groups = ResultGrouper::group(&response.results)?;
            Ok(GapMerger::merge(groups, response.has_gaps, response.gaps))
        });

        match grouped {
            Ok(state) => {
                log::info!("Search '{}' settled: {}", settlement.query, describe(&state));
                self.state = state;
                self.query = Some(settlement.query);
            }
            Err(e) => {
                log::error!("Search '{}' failed: {}", settlement.query, e);
                self.notice = Some(Notice::failure(Operation::Search));
            }
        }
        true
    }

    pub fn select_group(&mut self, key: &str) -> Result<()> {
        match &mut self.state {
            DisplayState::Results { groups, selected } if groups.contains_key(key) => {
                *selected = key.to_string();
                Ok(())
            }
            _ => Err(ExplorerError::UnknownGroup(key.to_string())),
        }
    }

    pub fn current_group(&self) -> Option<(&str, &[SearchResult])> {
        self.state.selected_group()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn last_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

fn describe(state: &DisplayState) -> String {
    match state {
        DisplayState::NotSearched => "not searched".to_string(),
        DisplayState::Empty => "no results".to_string(),
        DisplayState::GapList(gaps) => format!("{} gaps", gaps.len()),
        DisplayState::Results { groups, .. } => format!("{} groups", groups.len()),
    }
}
