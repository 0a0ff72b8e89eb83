//! Query for the work items that are current for a team.
//!
//! "Current" means a user story in one of the team's in-progress states, or one
//! closed today. The closed clause keeps items that left the active states
//! during the day visible in a day-granularity report.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use super::mappers::WiqlResult;
use super::options::{ConnectionOptions, require_argument};
use super::teams::{USER_STORY, get_team_settings};
use super::transport::Request;
use crate::error::KanbanResult;
use crate::models::{TeamSettings, WorkItemReferences};

/// Builds the WIQL query selecting current user stories in the team's areas.
///
/// The `ASOF` clause is only added when a reference date is given; without it
/// the service evaluates the query at its own current time.
///
/// ```rust
/// use kanban_report::api::build_current_work_items_query;
/// use kanban_report::models::TeamSettings;
///
/// let settings = TeamSettings {
///     in_progress_states: vec!["Active".to_string()],
///     areas: vec!["Area51".to_string()],
/// };
/// let query = build_current_work_items_query(&settings, None);
/// assert!(query.ends_with("order by [Changed Date] DESC"));
/// ```
#[must_use]
pub fn build_current_work_items_query(
    settings: &TeamSettings,
    reference_date: Option<DateTime<Utc>>,
) -> String {
    let areas = quote_list(&settings.areas);
    let states = quote_list(&settings.in_progress_states);
    let as_of = reference_date
        .map(|date| format!(" ASOF '{}'", date.to_rfc3339_opts(SecondsFormat::Millis, true)))
        .unwrap_or_default();

    format!(
        "Select Id from WorkItems where [Work Item Type] = '{USER_STORY}' and [Area Path] in ({areas}) \
         and (State in ({states}) or (State = 'Closed' and [Closed Date] >= @Today)) \
         order by [Changed Date] DESC{as_of}"
    )
}

/// Joins values as a WIQL list of single-quoted literals.
fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs the current work items query for a team.
///
/// Returns the references together with the snapshot date the service used,
/// which is the reference date when one was given.
pub async fn get_current_work_item_ids(
    options: &ConnectionOptions,
    team: &str,
    reference_date: Option<DateTime<Utc>>,
) -> KanbanResult<WorkItemReferences> {
    require_argument("team", team)?;

    let settings = get_team_settings(options, team).await?;
    let query = build_current_work_items_query(&settings, reference_date);

    let url = options.project_endpoint(&["_apis", "wit", "wiql"]);
    tracing::debug!(url = %url, query = %query, "running WIQL query");
    let result: WiqlResult = options
        .transport()
        .fetch(&url, Request::post_json(&json!({ "query": query })))
        .await?
        .json()?;

    tracing::debug!(
        as_of = %result.as_of,
        count = result.work_items.len(),
        "WIQL query returned"
    );
    Ok(WorkItemReferences {
        reference_date: result.as_of,
        items: result.work_items,
    })
}
