//! Azure DevOps API client module.
//!
//! Read-only access to the data behind a team's Kanban report: team settings
//! and members, the WIQL query selecting current work items, batch details and
//! per-item comments.
//!
//! Each query is a free function taking [`ConnectionOptions`]; [`AzureDevOpsClient`]
//! bundles them and adds the aggregated "current work items" call. All network
//! traffic goes through a [`Transport`], so authentication is a decorator
//! ([`AuthenticatedTransport`]) and tests can plug in a stub.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kanban_report::api::{
//!     AuthenticatedTransport, ConnectionOptions, ReqwestTransport, get_team_settings,
//! };
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = AuthenticatedTransport::new(
//!     ReqwestTransport::new()?,
//!     SecretString::from("my-pat".to_string()),
//! )?;
//! let options = ConnectionOptions::builder()
//!     .organization("my-org")
//!     .project("my-project")
//!     .transport(Arc::new(transport))
//!     .build()?;
//!
//! let settings = get_team_settings(&options, "My Team").await?;
//! println!("in progress: {:?}", settings.in_progress_states);
//! # Ok(())
//! # }
//! ```

mod client;
mod credential;
pub mod mappers;
mod options;
mod teams;
mod transport;
mod wiql;
mod work_items;

#[cfg(test)]
mod test_support;

pub use client::AzureDevOpsClient;
pub use credential::AuthenticatedTransport;
pub use options::{
    ConnectionOptions, ConnectionOptionsBuilder, DEFAULT_BASE_URL,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};
pub use teams::{USER_STORY, get_team_members, get_team_settings};
pub use transport::{Method, Request, ReqwestTransport, Response, Transport};
pub use wiql::{build_current_work_items_query, get_current_work_item_ids};
pub use work_items::{get_work_item_comments, get_work_item_details, validate_id, validate_ids};
