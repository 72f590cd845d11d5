//! `blueprint`: inspect and manage console layouts from the terminal.
//!
//! Usage:
//!   blueprint list
//!   blueprint show <id>
//!   blueprint resolve --kind teleop --session run-7
//!   blueprint bind --kind teleop --session run-7 <blueprint-id>
//!   blueprint delete <id>
//!   blueprint validate layout.json
//!   blueprint drafts clear --kind teleop --session run-7 --blueprint <id>
//!
//! Logs go to stderr; set `RUST_LOG=debug` for more.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use blueprint_client::{BlueprintApi, HttpBlueprintClient, SessionResolver};
use blueprint_console::{BlueprintManager, ConsoleConfig, NoticeLevel};
use blueprint_kernel::{DraftKey, DraftStore, FileDraftStore};
use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, SessionId, SessionKind, SessionRef,
    invariant_report,
};

/// Manage blueprint layouts for the operator console.
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(about = "Inspect and manage operator console layouts")]
struct Cli {
    /// Config file (default: ~/.config/blueprint/console.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalogue base URL, overriding the config file
    #[arg(long, global = true)]
    api: Option<String>,

    /// Request timeout in milliseconds, overriding the config file
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Draft directory, overriding the config file
    #[arg(long, global = true)]
    draft_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved blueprints
    List,
    /// Print one blueprint as JSON
    Show { id: String },
    /// Resolve the blueprint for a session, creating one if unbound
    Resolve(SessionArgs),
    /// Bind a session to a blueprint
    Bind {
        #[command(flatten)]
        session: SessionArgs,
        blueprint: String,
    },
    /// Delete a blueprint
    Delete { id: String },
    /// Check a tree or blueprint JSON file offline
    Validate { file: PathBuf },
    /// Local draft management
    Drafts {
        #[command(subcommand)]
        command: DraftCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DraftCommand {
    /// Discard the draft for one session and blueprint
    Clear {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long)]
        blueprint: String,
    },
}

#[derive(Args, Debug, Clone)]
struct SessionArgs {
    /// Session kind: recording, teleop, or inference
    #[arg(long)]
    kind: SessionKind,
    /// Session id
    #[arg(long)]
    session: String,
}

impl SessionArgs {
    fn session_ref(&self) -> SessionRef {
        SessionRef::new(self.kind, self.session.as_str())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::List => {
            let api = http_client(&config)?;
            for summary in api.list().await? {
                println!(
                    "{}\t{}\t{}",
                    summary.id,
                    summary.name,
                    summary.updated_at.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Show { id } => {
            let api = http_client(&config)?;
            let detail = api.get(&BlueprintId::from(id.as_str())).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Command::Resolve(args) => resolve(&config, args.session_ref()).await?,
        Command::Bind { session, blueprint } => {
            let api: Arc<dyn BlueprintApi> = Arc::new(http_client(&config)?);
            let resolver = SessionResolver::new(api);
            let session = session.session_ref();
            resolver
                .bind(session.kind, &session.id, &BlueprintId::from(blueprint.as_str()))
                .await?;
            println!("bound {session} to {blueprint}");
        }
        Command::Delete { id } => {
            let api = http_client(&config)?;
            api.delete(&BlueprintId::from(id.as_str())).await?;
            println!("deleted {id}");
        }
        Command::Validate { file } => validate_file(&config, file)?,
        Command::Drafts {
            command: DraftCommand::Clear { session, blueprint },
        } => {
            let store = draft_store(&config)?;
            let key = DraftKey::new(
                session.kind,
                SessionId::from(session.session.as_str()),
                BlueprintId::from(blueprint.as_str()),
            );
            store.delete(&key)?;
            println!("cleared draft {key}");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(api) = &cli.api {
        config.api_base_url = api.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }
    if let Some(dir) = &cli.draft_dir {
        config.draft_dir = Some(dir.clone());
    }
    Ok(config)
}

fn http_client(config: &ConsoleConfig) -> Result<HttpBlueprintClient> {
    HttpBlueprintClient::new(&config.api_base_url, config.request_timeout())
        .with_context(|| format!("creating client for {}", config.api_base_url))
}

fn draft_store(config: &ConsoleConfig) -> Result<FileDraftStore> {
    Ok(FileDraftStore::new(config.draft_dir()?).with_limits(config.limits()?))
}

/// Load the session's blueprint the way the console does, drafts included.
async fn resolve(config: &ConsoleConfig, session: SessionRef) -> Result<()> {
    let api: Arc<dyn BlueprintApi> = Arc::new(http_client(config)?);
    let drafts: Arc<dyn DraftStore> = Arc::new(draft_store(config)?);
    let manager = BlueprintManager::new(api, drafts, session).with_limits(config.limits()?);

    let outcome = manager.resolve_session_blueprint().await;
    for notice in manager.take_notices() {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
    outcome?;

    let snap = manager.snapshot();
    let id = snap.blueprint_id.map(|id| id.to_string()).unwrap_or_default();
    println!("blueprint: {id}");
    println!("name:      {}", snap.name);
    println!("nodes:     {}", snap.tree.node_count());
    println!("draft:     {}", if snap.has_draft { "yes" } else { "no" });
    println!("{}", serde_json::to_string_pretty(&snap.tree)?);
    Ok(())
}

/// Accepts either a bare tree or a full blueprint record.
fn validate_file(config: &ConsoleConfig, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let tree = match serde_json::from_str::<BlueprintNode>(&text) {
        Ok(tree) => tree,
        Err(_) => {
            serde_json::from_str::<BlueprintDetail>(&text)
                .with_context(|| format!("{} is neither a tree nor a blueprint", file.display()))?
                .tree
        }
    };

    let issues = invariant_report(&tree, &config.limits()?);
    if issues.is_empty() {
        println!("ok: {} nodes", tree.node_count());
        return Ok(());
    }
    for issue in &issues {
        println!("{issue}");
    }
    bail!("{} invariant violation(s) in {}", issues.len(), file.display())
}
