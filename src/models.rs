//! Domain model returned by the client.
//!
//! Every type here is a plain value object. Optional fields follow one rule:
//! a field the service did not send is `None` and is left out of the
//! serialized output entirely, rather than being written as `null` or `""`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person as known to Azure DevOps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique name of the identity; usually the email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Person {
    /// True when both the name and the email are known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some()
    }
}

/// Settings of a team that drive the "current work items" query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamSettings {
    /// States of user stories in the "InProgress" category, in backlog order.
    pub in_progress_states: Vec<String>,
    /// Area paths owned by the team.
    pub areas: Vec<String>,
}

/// Lightweight pointer to a work item, as returned by a WIQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemReference {
    pub id: i64,
    pub url: String,
}

/// Position of a work item on the team's Kanban board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLocation {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
}

/// A comment posted on a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub work_item_id: i64,
    pub version: i64,
    pub text: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Person>,
    pub created_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
}

/// A fully mapped work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: i64,
    pub title: String,
    pub area_path: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_change_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Person>,
    pub created_date: DateTime<Utc>,
    pub project: String,
    pub revision: i64,
    pub url: String,
    pub work_item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_by: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activated_date: Option<DateTime<Utc>>,
    /// Id of the parent work item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Comments, attached by the aggregation step. `None` straight out of a detail fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

/// Work item references current at a snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemReferences {
    /// Snapshot date the service evaluated the query at.
    pub reference_date: DateTime<Utc>,
    pub items: Vec<WorkItemReference>,
}

/// Complete work items current at a snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWorkItems {
    /// Snapshot date reported by the service, never the local clock.
    pub reference_date: DateTime<Utc>,
    pub items: Vec<WorkItem>,
}
