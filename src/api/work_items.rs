//! Batch detail and per-item comment fetches.

use serde_json::json;
use std::fmt::Display;

use super::mappers::{CommentList, WorkItemBatch, map_to_comment, map_to_work_item};
use super::options::ConnectionOptions;
use super::transport::Request;
use crate::error::{KanbanResult, ValidationError};
use crate::models::{Comment, WorkItem};

const COMMENTS_API_VERSION: &str = "6.0-preview";

/// Checks that every value is an integer and returns the ids.
///
/// Values are judged by their textual form, so integral floats such as `2.0`
/// are accepted. On failure the error lists every offending value in order.
///
/// ```rust
/// use kanban_report::api::validate_ids;
///
/// assert_eq!(validate_ids(&["1", "2"]).unwrap(), vec![1, 2]);
/// let error = validate_ids(&["1", "x", "2.5"]).unwrap_err();
/// assert_eq!(error.to_string(), r#"all items in "ids" must be integers: "x", "2.5""#);
/// ```
pub fn validate_ids<T: Display>(values: &[T]) -> Result<Vec<i64>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyList {
            name: "ids".to_string(),
        });
    }

    let mut ids = Vec::with_capacity(values.len());
    let mut invalid = Vec::new();
    for value in values {
        let text = value.to_string();
        match parse_integer(&text) {
            Some(id) => ids.push(id),
            None => invalid.push(text),
        }
    }

    if !invalid.is_empty() {
        return Err(ValidationError::NotIntegers {
            name: "ids".to_string(),
            values: invalid,
        });
    }
    Ok(ids)
}

/// Checks that a single value is an integer.
pub fn validate_id<T: Display>(value: &T) -> Result<i64, ValidationError> {
    parse_integer(&value.to_string()).ok_or_else(|| ValidationError::NotAnInteger {
        name: "id".to_string(),
    })
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(id) = text.parse::<i64>() {
        return Some(id);
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Fetches the full details of work items in one batch request.
///
/// The returned items have no comments attached.
pub async fn get_work_item_details(
    options: &ConnectionOptions,
    ids: &[i64],
) -> KanbanResult<Vec<WorkItem>> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyList {
            name: "ids".to_string(),
        }
        .into());
    }

    let url = options.project_endpoint(&["_apis", "wit", "workitemsbatch"]);
    tracing::debug!(url = %url, count = ids.len(), "fetching work item details");
    let batch: WorkItemBatch = options
        .transport()
        .fetch(
            &url,
            Request::post_json(&json!({ "$expand": "All", "ids": ids })),
        )
        .await?
        .json()?;

    let items = batch
        .value
        .into_iter()
        .map(map_to_work_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

/// Fetches the comments of one work item.
pub async fn get_work_item_comments(
    options: &ConnectionOptions,
    id: i64,
) -> KanbanResult<Vec<Comment>> {
    let id_segment = id.to_string();
    let url = format!(
        "{}?api-version={COMMENTS_API_VERSION}",
        options.project_endpoint(&["_apis", "wit", "workitems", &id_segment, "comments"])
    );
    tracing::trace!(url = %url, "fetching work item comments");
    let list: CommentList = options
        .transport()
        .fetch(&url, Request::get())
        .await?
        .json()?;

    Ok(list.comments.into_iter().map(map_to_comment).collect())
}
