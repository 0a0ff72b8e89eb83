//! Azure DevOps client and the "current work items" pipeline.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use secrecy::SecretString;
use std::sync::Arc;

use super::credential::AuthenticatedTransport;
use super::options::{ConnectionOptions, require_argument};
use super::teams::{get_team_members, get_team_settings};
use super::transport::{ReqwestTransport, Transport};
use super::wiql::get_current_work_item_ids;
use super::work_items::{get_work_item_comments, get_work_item_details};
use crate::error::KanbanResult;
use crate::models::{Comment, CurrentWorkItems, Person, TeamSettings, WorkItem};

/// Read-only client for team and work item data in one Azure DevOps project.
///
/// # Example
///
/// ```rust,no_run
/// use kanban_report::AzureDevOpsClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AzureDevOpsClient::with_pat("my-org", "my-project", "my-pat".to_string(), None, None)?;
///
/// let current = client.get_current_work_items("My Team", None).await?;
/// println!("{} items as of {}", current.items.len(), current.reference_date);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AzureDevOpsClient {
    options: ConnectionOptions,
}

impl AzureDevOpsClient {
    /// Creates a client from validated options.
    pub fn new(options: ConnectionOptions) -> Self {
        Self { options }
    }

    /// Creates a client that authenticates with a Personal Access Token over HTTPS.
    ///
    /// `base_url` defaults to the Azure DevOps services URL and
    /// `max_concurrent_requests` to [`DEFAULT_MAX_CONCURRENT_REQUESTS`](super::DEFAULT_MAX_CONCURRENT_REQUESTS).
    pub fn with_pat(
        organization: &str,
        project: &str,
        pat: String,
        base_url: Option<&str>,
        max_concurrent_requests: Option<usize>,
    ) -> KanbanResult<Self> {
        let transport = AuthenticatedTransport::new(ReqwestTransport::new()?, SecretString::from(pat))?;
        let mut builder = ConnectionOptions::builder()
            .organization(organization)
            .project(project)
            .transport(Arc::new(transport) as Arc<dyn Transport>);
        if let Some(url) = base_url {
            builder = builder.base_url(url);
        }
        if let Some(limit) = max_concurrent_requests {
            builder = builder.max_concurrent_requests(limit);
        }
        Ok(Self::new(builder.build()?))
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Gets the people in a team.
    pub async fn get_team_members(&self, team: &str) -> KanbanResult<Vec<Person>> {
        get_team_members(&self.options, team).await
    }

    /// Gets the in-progress states and area paths of a team.
    pub async fn get_team_settings(&self, team: &str) -> KanbanResult<TeamSettings> {
        get_team_settings(&self.options, team).await
    }

    /// Gets the full details of work items, without comments.
    pub async fn get_work_item_details(&self, ids: &[i64]) -> KanbanResult<Vec<WorkItem>> {
        get_work_item_details(&self.options, ids).await
    }

    /// Gets the comments of a work item.
    pub async fn get_work_item_comments(&self, id: i64) -> KanbanResult<Vec<Comment>> {
        get_work_item_comments(&self.options, id).await
    }

    /// Gets the work items that are current for a team, with their comments.
    ///
    /// With a `reference_date` the query is evaluated as of that date. The
    /// returned `reference_date` is always the snapshot date reported by the
    /// service. Comment requests run concurrently, bounded by
    /// [`ConnectionOptions::max_concurrent_requests`]; the first failure aborts
    /// the whole call.
    pub async fn get_current_work_items(
        &self,
        team: &str,
        reference_date: Option<DateTime<Utc>>,
    ) -> KanbanResult<CurrentWorkItems> {
        require_argument("team", team)?;

        let references = get_current_work_item_ids(&self.options, team, reference_date).await?;
        if references.items.is_empty() {
            tracing::debug!(team, "no current work items");
            return Ok(CurrentWorkItems {
                reference_date: references.reference_date,
                items: Vec::new(),
            });
        }

        let ids: Vec<i64> = references.items.iter().map(|r| r.id).collect();
        let details = get_work_item_details(&self.options, &ids).await?;

        let items: Vec<WorkItem> = stream::iter(details)
            .map(|item| self.with_comments(item))
            .buffered(self.options.max_concurrent_requests())
            .try_collect()
            .await?;

        tracing::debug!(team, count = items.len(), "assembled current work items");
        Ok(CurrentWorkItems {
            reference_date: references.reference_date,
            items,
        })
    }

    async fn with_comments(&self, mut item: WorkItem) -> KanbanResult<WorkItem> {
        let comments = get_work_item_comments(&self.options, item.id).await?;
        item.comments = Some(comments);
        Ok(item)
    }
}
