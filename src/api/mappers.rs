//! Wire records returned by the Azure DevOps REST API and their mapping to domain types.
//!
//! The wire structs mirror the JSON payloads only as far as the client reads them.
//! Work item fields are kept as a raw JSON map and looked up by reference name,
//! because their presence varies by process template and by item.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::{BoardLocation, Comment, Person, WorkItem, WorkItemReference};

/// Reference names of the work item fields the mapper reads.
pub mod field {
    pub const ACCEPTANCE_CRITERIA: &str = "Microsoft.VSTS.Common.AcceptanceCriteria";
    pub const ACTIVATED_BY: &str = "Microsoft.VSTS.Common.ActivatedBy";
    pub const ACTIVATED_DATE: &str = "Microsoft.VSTS.Common.ActivatedDate";
    pub const AREA_PATH: &str = "System.AreaPath";
    pub const ASSIGNED_TO: &str = "System.AssignedTo";
    pub const BOARD_COLUMN: &str = "System.BoardColumn";
    pub const BOARD_COLUMN_DONE: &str = "System.BoardColumnDone";
    pub const BOARD_LANE: &str = "System.BoardLane";
    pub const CHANGED_BY: &str = "System.ChangedBy";
    pub const CHANGED_DATE: &str = "System.ChangedDate";
    pub const CLOSED_BY: &str = "Microsoft.VSTS.Common.ClosedBy";
    pub const CLOSED_DATE: &str = "Microsoft.VSTS.Common.ClosedDate";
    pub const CREATED_BY: &str = "System.CreatedBy";
    pub const CREATED_DATE: &str = "System.CreatedDate";
    pub const DESCRIPTION: &str = "System.Description";
    pub const FIRST_ACTIVATED_DATE: &str = "Custom.FirstActivatedDate";
    pub const PARENT: &str = "System.Parent";
    pub const STACK_RANK: &str = "Microsoft.VSTS.Common.StackRank";
    pub const STATE: &str = "System.State";
    pub const STATE_CHANGE_DATE: &str = "Microsoft.VSTS.Common.StateChangeDate";
    pub const STATE_REASON: &str = "System.Reason";
    pub const TAGS: &str = "System.Tags";
    pub const TEAM_PROJECT: &str = "System.TeamProject";
    pub const TITLE: &str = "System.Title";
    pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
}

/// An identity reference (`IdentityRef`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireIdentity {
    pub display_name: Option<String>,
    pub unique_name: Option<String>,
    /// Set for groups rather than people.
    #[serde(default)]
    pub is_container: bool,
}

/// A work item as returned by the batch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WireWorkItem {
    pub id: i64,
    pub rev: i64,
    #[serde(default)]
    pub fields: Map<String, Value>,
    pub url: String,
}

/// A comment as returned by the comments endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireComment {
    pub id: i64,
    pub work_item_id: i64,
    pub version: i64,
    pub text: String,
    pub url: String,
    pub created_by: Option<WireIdentity>,
    pub created_date: DateTime<Utc>,
    pub modified_by: Option<WireIdentity>,
    pub modified_date: Option<DateTime<Utc>>,
}

/// Result of `POST _apis/wit/wiql`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResult {
    pub as_of: DateTime<Utc>,
    pub work_items: Vec<WorkItemReference>,
}

/// Result of `POST _apis/wit/workitemsbatch`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemBatch {
    pub value: Vec<WireWorkItem>,
}

/// Result of `GET _apis/wit/workitems/{id}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentList {
    pub comments: Vec<WireComment>,
}

/// Result of `GET _apis/work/backlogconfiguration`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogConfiguration {
    pub work_item_type_mapped_states: Vec<WorkItemTypeStates>,
}

/// State categories of one work item type, keyed by state name in backlog order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemTypeStates {
    pub work_item_type_name: String,
    #[serde(default)]
    pub states: Map<String, Value>,
}

/// Result of `GET _apis/work/teamsettings/teamfieldvalues`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFieldValues {
    pub default_value: Option<String>,
    pub values: Vec<TeamFieldValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamFieldValue {
    pub value: String,
}

/// Result of `GET _apis/projects/{project}/teams/{team}/members`.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMembers {
    pub value: Vec<TeamMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub identity: WireIdentity,
}

/// Maps an identity to a person.
///
/// Returns `None` when there is no identity, or when it has neither a display
/// name nor a unique name.
#[must_use]
pub fn map_to_person(identity: Option<&WireIdentity>) -> Option<Person> {
    let identity = identity?;
    let name = non_empty(identity.display_name.as_deref());
    let email = non_empty(identity.unique_name.as_deref());
    if name.is_none() && email.is_none() {
        return None;
    }
    Some(Person { name, email })
}

/// Maps a wire comment to a comment.
#[must_use]
pub fn map_to_comment(comment: WireComment) -> Comment {
    Comment {
        id: comment.id,
        work_item_id: comment.work_item_id,
        version: comment.version,
        text: comment.text,
        url: comment.url,
        created_by: map_to_person(comment.created_by.as_ref()),
        created_date: comment.created_date,
        modified_by: map_to_person(comment.modified_by.as_ref()),
        modified_date: comment.modified_date,
    }
}

/// Maps the board fields of a work item. `None` when the item is not on a board.
#[must_use]
pub fn map_to_board(fields: &Map<String, Value>) -> Option<BoardLocation> {
    let column = string_field(fields, field::BOARD_COLUMN)?;
    Some(BoardLocation {
        column,
        column_done: fields.get(field::BOARD_COLUMN_DONE).and_then(Value::as_bool),
        lane: string_field(fields, field::BOARD_LANE),
        rank: fields
            .get(field::STACK_RANK)
            .and_then(Value::as_f64)
            .filter(|rank| *rank != 0.0),
    })
}

/// Maps a wire work item to a work item without comments.
pub fn map_to_work_item(item: WireWorkItem) -> Result<WorkItem, ApiError> {
    let id = item.id;
    let fields = &item.fields;
    let required = |name: &str| {
        string_field(fields, name).ok_or_else(|| ApiError::MissingField {
            id,
            field: name.to_string(),
        })
    };

    Ok(WorkItem {
        id,
        title: required(field::TITLE)?,
        area_path: required(field::AREA_PATH)?,
        state: required(field::STATE)?,
        state_reason: string_field(fields, field::STATE_REASON),
        state_change_date: date_field(fields, field::STATE_CHANGE_DATE)?,
        created_by: identity_field(fields, field::CREATED_BY)?,
        created_date: date_field(fields, field::CREATED_DATE)?.ok_or_else(|| {
            ApiError::MissingField {
                id,
                field: field::CREATED_DATE.to_string(),
            }
        })?,
        project: required(field::TEAM_PROJECT)?,
        revision: item.rev,
        work_item_type: required(field::WORK_ITEM_TYPE)?,
        board: map_to_board(fields),
        description: string_field(fields, field::DESCRIPTION),
        acceptance_criteria: string_field(fields, field::ACCEPTANCE_CRITERIA),
        activated_by: identity_field(fields, field::ACTIVATED_BY)?,
        activated_date: date_field(fields, field::ACTIVATED_DATE)?,
        assigned_to: identity_field(fields, field::ASSIGNED_TO)?,
        changed_by: identity_field(fields, field::CHANGED_BY)?,
        changed_date: date_field(fields, field::CHANGED_DATE)?,
        closed_by: identity_field(fields, field::CLOSED_BY)?,
        closed_date: date_field(fields, field::CLOSED_DATE)?,
        first_activated_date: date_field(fields, field::FIRST_ACTIVATED_DATE)?,
        parent: fields.get(field::PARENT).and_then(Value::as_i64),
        tags: string_field(fields, field::TAGS).map(|tags| split_tags(&tags)),
        comments: None,
        url: item.url,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    non_empty(fields.get(name).and_then(Value::as_str))
}

fn identity_field(fields: &Map<String, Value>, name: &str) -> Result<Option<Person>, ApiError> {
    let value = match fields.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let identity = WireIdentity::deserialize(value).map_err(|e| ApiError::InvalidField {
        field: name.to_string(),
        message: format!("not an identity: {e}"),
    })?;
    Ok(map_to_person(Some(&identity)))
}

fn date_field(fields: &Map<String, Value>, name: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = string_field(fields, name) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| Some(d.with_timezone(&Utc)))
        .map_err(|e| ApiError::InvalidField {
            field: name.to_string(),
            message: format!("'{raw}' is not a valid date: {e}"),
        })
}

/// Splits `System.Tags` ("a; b; c") into trimmed tags, keeping every segment.
fn split_tags(tags: &str) -> Vec<String> {
    tags.split(';').map(|tag| tag.trim().to_string()).collect()
}
