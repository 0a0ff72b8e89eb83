use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use kanban_report::{
    AzureDevOpsClient, Config,
    api::{validate_id, validate_ids},
    logging::{LogConfig, init_logging},
    models::Comment,
    utils::{TeamMembership, parse_reference_date, previous_workday},
};

/// Reads team and work item data from Azure DevOps and prints it as JSON.
#[derive(Parser, Debug)]
#[command(name = "kanban-report", version, about)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Default)]
struct ConnectionArgs {
    /// Azure DevOps organization name
    #[arg(short, long, global = true, help_heading = "Azure DevOps Connection")]
    organization: Option<String>,

    /// Azure DevOps project name
    #[arg(short, long, global = true, help_heading = "Azure DevOps Connection")]
    project: Option<String>,

    /// Personal Access Token for Azure DevOps API authentication
    #[arg(short = 't', long, global = true, help_heading = "Azure DevOps Connection")]
    pat: Option<String>,

    /// Server URL [default: https://dev.azure.com]
    #[arg(long, global = true, help_heading = "Azure DevOps Connection")]
    url: Option<String>,

    /// Team name
    #[arg(long, global = true, help_heading = "Azure DevOps Connection")]
    team: Option<String>,

    /// Maximum concurrent comment requests [default: 10]
    #[arg(long, global = true, help_heading = "Performance Tuning")]
    max_concurrent_requests: Option<usize>,

    /// Configuration file [default: $XDG_CONFIG_HOME/kanban-report/config.toml]
    #[arg(long, global = true, help_heading = "Configuration")]
    config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
struct LoggingArgs {
    /// Log level: trace, debug, info, warn or error [env: KANBAN_LOG_LEVEL]
    #[arg(long, global = true, help_heading = "Logging")]
    log_level: Option<String>,

    /// Log to a file instead of stderr [env: KANBAN_LOG_FILE]
    #[arg(long, global = true, help_heading = "Logging")]
    log_file: Option<PathBuf>,

    /// Log format: text or json [env: KANBAN_LOG_FORMAT]
    #[arg(long, global = true, help_heading = "Logging")]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the members of the team
    Members,
    /// List the team's current user stories with their comments
    Current {
        /// Evaluate the query as of this date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, conflicts_with = "previous_workday")]
        as_of: Option<String>,

        /// Evaluate the query as of the previous business day, at the current time
        #[arg(long)]
        previous_workday: bool,
    },
    /// Show the details of work items
    Details {
        /// Work item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show the comments of a work item
    Comments {
        /// Work item id
        id: String,

        /// Only keep comments written by members of the team
        #[arg(long)]
        team_only: bool,
    },
    /// Create a sample configuration file
    Init,
}

impl ConnectionArgs {
    fn to_config(&self) -> Config {
        Config {
            organization: self.organization.clone(),
            project: self.project.clone(),
            pat: self.pat.clone(),
            url: self.url.clone(),
            team: self.team.clone(),
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

fn resolve_config(args: &ConnectionArgs) -> Result<Config> {
    let file = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_from_file()?,
    };
    let env = Config::load_from_env()?;
    Ok(file.merge(env).merge(args.to_config()))
}

/// Resolves the configuration and builds a client from it.
fn connect(args: &ConnectionArgs) -> Result<(Config, AzureDevOpsClient)> {
    let config = resolve_config(args)?;
    tracing::debug!(?config, "resolved configuration");
    let client = create_client(&config)?;
    Ok((config, client))
}

fn create_client(config: &Config) -> Result<AzureDevOpsClient> {
    let client = AzureDevOpsClient::with_pat(
        config.require_organization()?,
        config.require_project()?,
        config.require_pat()?.to_string(),
        config.url.as_deref(),
        config.max_concurrent_requests,
    )
    .context("Failed to create Azure DevOps client")?;
    Ok(client)
}

fn reference_date(as_of: Option<&str>, use_previous_workday: bool) -> Result<Option<DateTime<Utc>>> {
    if use_previous_workday {
        return Ok(Some(previous_workday(Utc::now())));
    }
    Ok(as_of.map(parse_reference_date).transpose()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn team_comments(
    client: &AzureDevOpsClient,
    team: &str,
    comments: Vec<Comment>,
) -> Result<Vec<Comment>> {
    let membership = TeamMembership::new(client.get_team_members(team).await?)?;
    let mut kept = Vec::with_capacity(comments.len());
    for comment in comments {
        if membership.was_created_by(comment.created_by.as_ref())? {
            kept.push(comment);
        }
    }
    Ok(kept)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig::resolve(
        args.logging.log_level.as_deref(),
        args.logging.log_file.as_deref(),
        args.logging.log_format.as_deref(),
    )?;
    let _log_guard = init_logging(log_config)?;

    match args.command {
        Command::Init => {
            match Config::create_sample_config()? {
                Some(path) => println!("Sample config created at: {}", path.display()),
                None => println!("Config file already exists at: {}", Config::get_config_path()?.display()),
            }
            Ok(())
        }
        Command::Members => {
            let (config, client) = connect(&args.connection)?;
            let members = client.get_team_members(config.require_team()?).await?;
            print_json(&members)
        }
        Command::Current {
            as_of,
            previous_workday,
        } => {
            let reference_date = reference_date(as_of.as_deref(), previous_workday)?;
            let (config, client) = connect(&args.connection)?;
            let current = client
                .get_current_work_items(config.require_team()?, reference_date)
                .await?;
            print_json(&current)
        }
        Command::Details { ids } => {
            let ids = validate_ids(ids.as_slice())?;
            let (_, client) = connect(&args.connection)?;
            let items = client.get_work_item_details(&ids).await?;
            print_json(&items)
        }
        Command::Comments { id, team_only } => {
            let id = validate_id(&id)?;
            let (config, client) = connect(&args.connection)?;
            let mut comments = client.get_work_item_comments(id).await?;
            if team_only {
                comments = team_comments(&client, config.require_team()?, comments).await?;
            }
            print_json(&comments)
        }
    }
}
