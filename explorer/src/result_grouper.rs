//! Normalizes search payloads into title-keyed groups.
//!
//! The backend answers either with an object mapping titles to result lists
//! or with a flat list of results. Both become a [`GroupedResults`] whose key
//! and entry order is exactly the backend order.

use serde_json::Value;

use crate::error::{ExplorerError, Result};
use crate::models::{DocType, GroupedResults, SearchResult};

pub struct ResultGrouper;

impl ResultGrouper {
    pub fn group(raw: &Value) -> Result<GroupedResults> {
        let mut groups = GroupedResults::new();

        match raw {
            Value::Object(map) => {
                for (title, entries) in map {
                    let entries = entries.as_array().ok_or_else(|| {
                        ExplorerError::InvalidResponseShape(format!(
                            "group '{}' is not a list",
                            title
                        ))
                    })?;
                    let results = entries
                        .iter()
                        .map(parse_entry)
                        .collect::<Result<Vec<_>>>()?;
                    groups.insert(title.clone(), results);
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    let result = parse_entry(entry)?;
                    groups.entry(result.title.clone()).or_default().push(result);
                }
            }
            Value::Null => {}
            other => {
                return Err(ExplorerError::InvalidResponseShape(format!(
                    "expected grouped or flat results, got {}",
                    kind_of(other)
                )))
            }
        }

        Ok(groups)
    }
}

fn parse_entry(entry: &Value) -> Result<SearchResult> {
    let result: SearchResult = serde_json::from_value(entry.clone())?;

    if result.doc_type == DocType::Summary && result.summary_content.is_none() {
        return Err(ExplorerError::InvalidResponseShape(format!(
            "summary '{}' has no content",
            result.id
        )));
    }

    Ok(result)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
