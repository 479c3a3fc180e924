use crate::models::{Gap, GroupedResults};

/// What the search screen shows for the latest query.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    NotSearched,
    Empty,
    GapList(Vec<Gap>),
    Results {
        groups: GroupedResults,
        selected: String,
    },
}

impl DisplayState {
    pub fn selected_group(&self) -> Option<(&str, &[crate::models::SearchResult])> {
        match self {
            DisplayState::Results { groups, selected } => groups
                .get(selected)
                .map(|results| (selected.as_str(), results.as_slice())),
            _ => None,
        }
    }
}

pub struct GapMerger;

impl GapMerger {
    /// Gaps win over results: a query with gaps is better served by asking
    /// for more content than by showing weak matches.
    pub fn merge(groups: GroupedResults, has_gaps: bool, gaps: Vec<Gap>) -> DisplayState {
        if has_gaps {
            return DisplayState::GapList(gaps);
        }

        match groups.keys().next().cloned() {
            Some(selected) => DisplayState::Results { groups, selected },
            None => DisplayState::Empty,
        }
    }
}
