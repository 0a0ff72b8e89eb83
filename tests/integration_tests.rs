//! Integration tests for the kanban-report library
//!
//! These tests drive the public API end to end: once over HTTP against a mock
//! server with the reqwest transport and PAT authentication, and once with a
//! caller-supplied transport.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kanban_report::api::{
    ConnectionOptions, Request, Response, Transport, build_current_work_items_query,
    validate_ids,
};
use kanban_report::error::{ApiError, KanbanError};
use kanban_report::models::{Person, TeamSettings};
use kanban_report::utils::TeamMembership;
use kanban_report::{AzureDevOpsClient, Config};
use mockito::Matcher;
use serde_json::json;
use std::sync::{Arc, Mutex};

const AUTHORIZATION: &str = "Basic OnNlY3JldA==";

fn backlog_configuration() -> serde_json::Value {
    json!({
        "workItemTypeMappedStates": [{
            "workItemTypeName": "User Story",
            "states": { "New": "Proposed", "Active": "InProgress", "Closed": "Completed" }
        }]
    })
}

fn wire_work_item(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "rev": 7,
        "url": format!("https://dev.azure.com/org/proj/_apis/wit/workItems/{id}"),
        "fields": {
            "System.AreaPath": "proj\\Team",
            "System.TeamProject": "proj",
            "System.State": "Active",
            "System.Reason": "Implementation started",
            "System.Title": "Show the board",
            "System.WorkItemType": "User Story",
            "System.CreatedDate": "2020-02-01T08:00:00Z",
            "System.CreatedBy": { "displayName": "John Doe", "uniqueName": "john.doe@example.com" },
            "System.BoardColumn": "Doing",
            "System.BoardColumnDone": false,
            "System.Tags": "ui; board",
            "Microsoft.VSTS.Common.StackRank": 1.5
        }
    })
}

/// # Current Work Items Over HTTP
///
/// Drives `get_current_work_items` through the reqwest transport against a
/// mock Azure DevOps server.
///
/// ## Test Scenario
/// - Mocks backlog configuration, team field values, WIQL, batch and comments
/// - Every mock requires the PAT authorization header
///
/// ## Expected Outcome
/// - Each endpoint is hit exactly once
/// - The WIQL body carries the query built from the team settings
/// - The result holds the mapped item with its comment and the server's asOf
#[tokio::test]
async fn test_current_work_items_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let reference_date = Utc.with_ymd_and_hms(2020, 2, 20, 20, 0, 0).unwrap();
    let settings = TeamSettings {
        in_progress_states: vec!["Active".to_string()],
        areas: vec!["proj\\Team".to_string()],
    };

    let backlog = server
        .mock("GET", "/org/proj/Team/_apis/work/backlogconfiguration")
        .match_header("authorization", AUTHORIZATION)
        .with_body(backlog_configuration().to_string())
        .create_async()
        .await;
    let field_values = server
        .mock("GET", "/org/proj/Team/_apis/work/teamsettings/teamfieldvalues")
        .match_header("authorization", AUTHORIZATION)
        .with_body(json!({ "values": [{ "value": "proj\\Team" }] }).to_string())
        .create_async()
        .await;
    let wiql = server
        .mock("POST", "/org/proj/_apis/wit/wiql")
        .match_header("authorization", AUTHORIZATION)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "query": build_current_work_items_query(&settings, Some(reference_date))
        })))
        .with_body(
            json!({
                "asOf": "2020-02-20T20:00:00.000Z",
                "workItems": [{ "id": 12, "url": "https://dev.azure.com/org/proj/_apis/wit/workItems/12" }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let batch = server
        .mock("POST", "/org/proj/_apis/wit/workitemsbatch")
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(json!({ "$expand": "All", "ids": [12] })))
        .with_body(json!({ "count": 1, "value": [wire_work_item(12)] }).to_string())
        .create_async()
        .await;
    let comments = server
        .mock("GET", "/org/proj/_apis/wit/workitems/12/comments")
        .match_query(Matcher::UrlEncoded(
            "api-version".to_string(),
            "6.0-preview".to_string(),
        ))
        .match_header("authorization", AUTHORIZATION)
        .with_body(
            json!({
                "totalCount": 1,
                "count": 1,
                "comments": [{
                    "id": 1,
                    "workItemId": 12,
                    "version": 1,
                    "text": "Waiting for review",
                    "url": "https://dev.azure.com/org/proj/_apis/wit/workItems/12/comments/1",
                    "createdBy": { "displayName": "John Doe", "uniqueName": "john.doe@example.com" },
                    "createdDate": "2020-02-19T10:00:00Z"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = AzureDevOpsClient::with_pat(
        "org",
        "proj",
        "secret".to_string(),
        Some(&server.url()),
        None,
    )
    .unwrap();
    let current = client
        .get_current_work_items("Team", Some(reference_date))
        .await
        .unwrap();

    for mock in [&backlog, &field_values, &wiql, &batch, &comments] {
        mock.assert_async().await;
    }

    assert_eq!(current.reference_date, reference_date);
    assert_eq!(current.items.len(), 1);
    let item = &current.items[0];
    assert_eq!(item.id, 12);
    assert_eq!(item.revision, 7);
    assert_eq!(item.state_reason.as_deref(), Some("Implementation started"));
    assert_eq!(
        item.tags.as_deref(),
        Some(&["ui".to_string(), "board".to_string()][..])
    );
    let board = item.board.as_ref().unwrap();
    assert_eq!(board.column, "Doing");
    assert_eq!(board.column_done, Some(false));
    assert_eq!(board.rank, Some(1.5));
    let comments = item.comments.as_ref().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "Waiting for review");

    let output = serde_json::to_value(&current).unwrap();
    assert_eq!(output["referenceDate"], json!("2020-02-20T20:00:00Z"));
    assert_eq!(output["items"][0]["board"]["columnDone"], json!(false));
    assert!(output["items"][0].get("closedDate").is_none());
}

#[tokio::test]
async fn test_error_status_surfaces_as_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/org/_apis/projects/proj/teams/Team/members")
        .with_status(401)
        .with_body("<html>Unauthorized</html>")
        .create_async()
        .await;

    let client = AzureDevOpsClient::with_pat(
        "org",
        "proj",
        "expired".to_string(),
        Some(&server.url()),
        None,
    )
    .unwrap();
    let error = client.get_team_members("Team").await.unwrap_err();

    match error {
        KanbanError::Api(ApiError::Parse { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Transport answering from a fixed table, keyed by URL suffix.
#[derive(Default)]
struct TableTransport {
    routes: Vec<(&'static str, serde_json::Value)>,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Transport for TableTransport {
    async fn fetch(&self, url: &str, _request: Request) -> Result<Response, ApiError> {
        self.seen.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix))
            .map(|(_, body)| Response::new(url, 200, body.to_string()))
            .ok_or_else(|| ApiError::Transport {
                url: url.to_string(),
                message: "unexpected request".to_string(),
            })
    }
}

/// # Caller-Supplied Transport
///
/// Tests that the library works over any `Transport` and that team members
/// feed the created-by-team check.
///
/// ## Test Scenario
/// - A table transport answers the team members endpoint
/// - Members include a group, which must be skipped
///
/// ## Expected Outcome
/// - Two people are returned, the group is not
/// - Membership recognizes a member and rejects an outsider
#[tokio::test]
async fn test_team_members_with_custom_transport() {
    let transport = Arc::new(TableTransport {
        routes: vec![(
            "/teams/Team/members",
            json!({
                "count": 3,
                "value": [
                    { "identity": { "displayName": "John Doe", "uniqueName": "john.doe@example.com" } },
                    { "identity": { "displayName": "[proj]\\Readers", "uniqueName": "vstfs:///group", "isContainer": true } },
                    { "identity": { "displayName": "Jane Roe", "uniqueName": "jane.roe@example.com" } }
                ]
            }),
        )],
        ..TableTransport::default()
    });
    let options = ConnectionOptions::builder()
        .organization("org")
        .project("proj")
        .transport(transport.clone())
        .build()
        .unwrap();
    let client = AzureDevOpsClient::new(options);

    let members = client.get_team_members("Team").await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(
        transport.seen.lock().unwrap().as_slice(),
        ["https://dev.azure.com/org/_apis/projects/proj/teams/Team/members"]
    );

    let team = TeamMembership::new(members).unwrap();
    let jane = Person {
        name: Some("Jane Roe".to_string()),
        email: Some("jane.roe@example.com".to_string()),
    };
    let outsider = Person {
        name: Some("Max Moe".to_string()),
        email: Some("max@example.com".to_string()),
    };
    assert!(team.was_created_by(Some(&jane)).unwrap());
    assert!(!team.was_created_by(Some(&outsider)).unwrap());
}

#[tokio::test]
async fn test_validation_happens_before_any_request() {
    let transport = Arc::new(TableTransport::default());
    let options = ConnectionOptions::builder()
        .organization("org")
        .project("proj")
        .transport(transport.clone())
        .build()
        .unwrap();
    let client = AzureDevOpsClient::new(options);

    let error = client.get_current_work_items("", None).await.unwrap_err();
    assert_eq!(error.to_string(), r#""team" is empty."#);
    let error = client.get_work_item_details(&[]).await.unwrap_err();
    assert_eq!(error.to_string(), r#""ids" must not be empty"#);
    let error = validate_ids(&["12", "twelve"]).unwrap_err();
    assert_eq!(error.to_string(), r#"all items in "ids" must be integers: "twelve""#);

    assert!(transport.seen.lock().unwrap().is_empty());
}

#[test]
fn test_config_merging() {
    let file = Config {
        organization: Some("file-org".to_string()),
        project: Some("file-project".to_string()),
        ..Config::default()
    };
    let cli = Config {
        project: Some("cli-project".to_string()),
        ..Config::default()
    };

    let merged = file.merge(cli);
    assert_eq!(merged.organization.as_deref(), Some("file-org"));
    assert_eq!(merged.project.as_deref(), Some("cli-project"));
    assert!(merged.require_pat().is_err());
}

#[test]
fn test_library_version() {
    let version = kanban_report::VERSION;
    assert!(!version.is_empty());
    assert!(version.contains('.'));
}
