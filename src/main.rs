use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use board_insights::config::Config;
use board_insights::db::{self, Database};
use board_insights::harvest::{harvest_board_text, ContentHarvester};
use board_insights::interactions::collect_interactions;
use board_insights::stats;
use board_insights::text::TextConfig;

#[derive(Parser)]
#[command(name = "board-insights")]
#[command(about = "Analytics over boards, pins and member interactions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a user by id or by auth token
    User {
        #[arg(long, conflicts_with = "token", required_unless_present = "token")]
        id: Option<i64>,
        #[arg(long)]
        token: Option<String>,
    },

    /// Boards a user owns, follows and administers
    Boards {
        #[arg(long)]
        user: i64,
    },

    /// Per-board points ranking for a user
    #[command(subcommand)]
    Stats(StatsCommand),

    /// Followers of a board with their points
    Followers {
        #[arg(long)]
        board: i64,
    },

    /// Live pins on a board, optionally only those by one user
    Pins {
        #[arg(long)]
        board: i64,
        #[arg(long)]
        user: Option<i64>,
    },

    /// Pins, comments and votes on a board
    Interactions {
        #[arg(long)]
        board: i64,
    },

    /// Comment text per pin with topic and keyword analysis
    CommentText {
        #[arg(long)]
        board: i64,
    },

    /// Scrape and enrich pin content on one or more boards
    Content {
        #[arg(required = true)]
        boards: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum StatsCommand {
    /// Boards the user owns
    Owned {
        #[arg(long)]
        user: i64,
    },
    /// Boards the user actively follows
    Followed {
        #[arg(long)]
        user: i64,
    },
    /// Boards the user owns or follows in an organization
    Org {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        org: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(database = %config.database_path.display(), "Configuration loaded");

    if let Some(parent) = config.database_path.parent() {
        tokio::fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }

    let database = Database::new(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let pool = database.pool();

    match cli.command {
        Commands::User { id, token } => {
            let user_id = match (id, token) {
                (Some(id), _) => id,
                (None, Some(token)) => {
                    let tokens = db::lookup_user_by_token(pool, &token).await?;
                    match tokens.first() {
                        Some(row) => row.user_id,
                        None => bail!("No user for that token"),
                    }
                }
                (None, None) => bail!("Pass --id or --token"),
            };
            print_json(&db::get_user_by_id(pool, user_id).await?)?;
        }
        Commands::Boards { user } => {
            let (owned, followed, admin) = tokio::try_join!(
                db::get_boards_owned_by_user(pool, user),
                db::get_boards_followed_by_user(pool, user),
                db::get_boards_admin_by_user(pool, user),
            )?;
            print_json(&json!({
                "owned": owned,
                "followed": followed,
                "admin": admin,
            }))?;
        }
        Commands::Stats(StatsCommand::Owned { user }) => {
            print_json(&stats::board_stats_owned_by(pool, user).await?)?;
        }
        Commands::Stats(StatsCommand::Followed { user }) => {
            print_json(&stats::board_stats_followed_by(pool, user).await?)?;
        }
        Commands::Stats(StatsCommand::Org { user, org }) => {
            print_json(&stats::board_stats_owned_or_admin_by(pool, user, org).await?)?;
        }
        Commands::Followers { board } => {
            print_json(&db::get_board_followers(pool, board).await?)?;
        }
        Commands::Pins { board, user } => {
            let pins = match user {
                Some(user) => db::get_pin_ids_on_board_by_user(pool, board, user).await?,
                None => db::get_pin_ids_on_board(pool, board).await?,
            };
            print_json(&pins)?;
        }
        Commands::Interactions { board } => {
            let interactions =
                collect_interactions(pool, board, config.comment_vote_filter()).await?;
            print_json(&interactions)?;
        }
        Commands::CommentText { board } => {
            let text = TextConfig::from(&config);
            print_json(&harvest_board_text(pool, board, &text).await?)?;
        }
        Commands::Content { boards } => {
            let harvester = ContentHarvester::from_config(pool.clone(), &config)?;
            let cancel = CancellationToken::new();

            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                warn!("Shutdown requested, stopping content harvest");
                signal_cancel.cancel();
            });

            let report = harvester.harvest_board_content(&boards, &cancel).await?;
            info!(
                units = report.units.len(),
                failures = report.failures.len(),
                cancelled = report.cancelled,
                "Content harvest complete"
            );
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,board_insights=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays clean JSON output.
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
