//! # Kanban Report Library
//!
//! Reads team and work item data from Azure DevOps and reshapes it into a
//! small, stable domain model for Kanban reports:
//!
//! - team settings (in-progress states and area paths) and team members
//! - the user stories that are "current" for a team, optionally as of a past date
//! - work item details, board position and comments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kanban_report::AzureDevOpsClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AzureDevOpsClient::with_pat("my-org", "my-project", "my-pat".to_string(), None, None)?;
//!
//! let current = client.get_current_work_items("My Team", None).await?;
//! for item in &current.items {
//!     let comments = item.comments.as_deref().unwrap_or_default();
//!     println!("#{} {} ({} comments)", item.id, item.title, comments.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;

pub use api::AzureDevOpsClient;
pub use config::Config;
pub use error::{KanbanError, KanbanResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
