//! Team-scoped lookups: settings that drive the work item query, and members.

use super::mappers::{BacklogConfiguration, TeamFieldValues, TeamMembers, map_to_person};
use super::options::{ConnectionOptions, require_argument};
use super::transport::Request;
use crate::error::{ApiError, KanbanResult};
use crate::models::{Person, TeamSettings};

/// Work item type whose states define "in progress".
pub const USER_STORY: &str = "User Story";

const IN_PROGRESS_CATEGORY: &str = "InProgress";

/// Fetches the in-progress states and area paths of a team.
///
/// Issues two requests: the team's backlog configuration and its team field
/// values. Nothing is cached; every call reads the current settings.
pub async fn get_team_settings(
    options: &ConnectionOptions,
    team: &str,
) -> KanbanResult<TeamSettings> {
    require_argument("team", team)?;

    let backlog_url = options.project_endpoint(&[team, "_apis", "work", "backlogconfiguration"]);
    tracing::debug!(url = %backlog_url, "fetching backlog configuration");
    let backlog: BacklogConfiguration = options
        .transport()
        .fetch(&backlog_url, Request::get())
        .await?
        .json()?;

    let fields_url = options.project_endpoint(&[
        team,
        "_apis",
        "work",
        "teamsettings",
        "teamfieldvalues",
    ]);
    tracing::debug!(url = %fields_url, "fetching team field values");
    let field_values: TeamFieldValues = options
        .transport()
        .fetch(&fields_url, Request::get())
        .await?
        .json()?;

    let in_progress_states = in_progress_states(&backlog, USER_STORY).ok_or_else(|| {
        ApiError::Configuration {
            message: format!("the backlog of team '{team}' has no state mapping for '{USER_STORY}'"),
        }
    })?;
    let areas = field_values.values.into_iter().map(|v| v.value).collect();

    Ok(TeamSettings {
        in_progress_states,
        areas,
    })
}

/// States categorized as "InProgress" for a work item type, in backlog order.
fn in_progress_states(backlog: &BacklogConfiguration, work_item_type: &str) -> Option<Vec<String>> {
    let mapping = backlog
        .work_item_type_mapped_states
        .iter()
        .find(|m| m.work_item_type_name == work_item_type)?;
    Some(
        mapping
            .states
            .iter()
            .filter(|(_, category)| category.as_str() == Some(IN_PROGRESS_CATEGORY))
            .map(|(state, _)| state.clone())
            .collect(),
    )
}

/// Fetches the people in a team. Group identities are left out.
pub async fn get_team_members(options: &ConnectionOptions, team: &str) -> KanbanResult<Vec<Person>> {
    require_argument("team", team)?;

    let url = options.endpoint(&[
        options.organization(),
        "_apis",
        "projects",
        options.project(),
        "teams",
        team,
        "members",
    ]);
    tracing::debug!(url = %url, "fetching team members");
    let members: TeamMembers = options
        .transport()
        .fetch(&url, Request::get())
        .await?
        .json()?;

    Ok(members
        .value
        .iter()
        .filter(|member| !member.identity.is_container)
        .filter_map(|member| map_to_person(Some(&member.identity)))
        .collect())
}
