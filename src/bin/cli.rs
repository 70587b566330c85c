//! Apot CLI
//!
//! Runs the notice sync pipeline once or on a schedule, lists the remote
//! collection, and manages the local archive of saved notices.

use std::path::PathBuf;
use std::sync::Arc;

use apot::{
    config,
    error::{AppError, Result},
    models::{Config, Notice},
    pipeline::Pipeline,
    scheduler::{self, IntervalScheduler, TaskOutcome, TaskRegistration},
    services::{NoticeFeed, RemoteStore},
    storage::{FileStore, LocalArchive},
    utils::url::fill_template,
};
use clap::{Parser, Subcommand};

/// Apot - Notice board push alarmer
#[derive(Parser, Debug)]
#[command(name = "apot", version, about = "Notice board scraper and sync")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and extract listing pages without dispatching
    Crawl,

    /// Run one full sync: fetch, extract, dispatch
    Sync,

    /// Register the background sync task and run it until Ctrl-C
    Schedule,

    /// Show the remote collection, newest first
    List,

    /// Manage locally saved notices
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    /// List saved notices
    List,
    /// Save a notice from the remote collection
    Save { code: i64 },
    /// Delete a saved notice
    Delete { code: String },
    /// Delete all saved notices
    Clear,
}

const LINE_TEMPLATE: &str = "{code}\t[{tag}] {title} - {writer}";

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{}", notice.format(LINE_TEMPLATE));
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Validate = cli.command {
        log::info!("Validating {}...", cli.config.display());
        let config = config::load_strict(&cli.config).inspect_err(|e| {
            log::error!("Config validation failed: {}", e);
        })?;
        log::info!("✓ Config OK");
        log::info!("  Pages: {:?}", config.crawler.pages);
        log::info!(
            "  First page: {}",
            fill_template(&config.board.list_url, "page", "1")
        );
        log::info!("  Remote: {}", config.remote.collection_url()?);
        log::info!(
            "  Task '{}' every >= {}s",
            config.schedule.task_name,
            config.schedule.minimum_interval_secs
        );
        return Ok(());
    }

    let config = config::load_all(&cli.config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Crawl => {
            let pipeline = Pipeline::from_config(&config)?;
            let outcome = pipeline.crawl().await;
            log::info!(
                "Extracted {} notices ({} of {} pages failed)",
                outcome.notices.len(),
                outcome.page_failures,
                outcome.page_total
            );
            println!("{}", serde_json::to_string_pretty(&outcome.notices)?);
        }

        Command::Sync => {
            let pipeline = Pipeline::from_config(&config)?;
            let report = pipeline.run().await;
            for failure in &report.dispatch.failed {
                log::warn!("Not synced: {} ({})", failure.notice.key(), failure.error);
            }
            if report.outcome() == TaskOutcome::Failed {
                return Err(AppError::run(format!(
                    "{} of {} pages failed, {} notices not synced",
                    report.crawl.page_failures,
                    report.crawl.page_total,
                    report.dispatch.failed.len() + report.dispatch.skipped
                )));
            }
            log::info!("Sync complete: {:?}", report.outcome());
        }

        Command::Schedule => run_scheduler(&config).await?,

        Command::List => {
            let mut feed = NoticeFeed::new(Arc::new(RemoteStore::from_config(&config)?));
            feed.refresh().await?;
            print_notices(feed.notices());
        }

        Command::Saved { action } => run_saved(&config, action).await?,

        Command::Validate => unreachable!("handled above"),
    }

    Ok(())
}

async fn run_scheduler(config: &Config) -> Result<()> {
    let host = IntervalScheduler::new(&config.schedule.state_file);

    let registration = host
        .resume_or(TaskRegistration::from_config(&config.schedule))
        .await?;

    let pipeline = Pipeline::from_config(config)?;
    scheduler::register_sync_task(&host, registration, pipeline).await?;

    host.run_until(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
    })
    .await
}

async fn run_saved(config: &Config, action: SavedAction) -> Result<()> {
    let archive = LocalArchive::new(FileStore::new(&config.archive.dir));
    log::debug!("Saved notices in {}", archive.store().root_dir().display());

    match action {
        SavedAction::List => print_notices(&archive.read_all().await),

        SavedAction::Save { code } => {
            let mut feed = NoticeFeed::new(Arc::new(RemoteStore::from_config(config)?));
            feed.refresh().await?;
            let notice = feed
                .find(code)
                .cloned()
                .ok_or_else(|| AppError::validation(format!("notice {code} not found")))?;
            if archive.save(&notice).await {
                println!("{code} was saved");
            }
        }

        SavedAction::Delete { code } => {
            if archive.delete(&code).await {
                println!("{code} was deleted");
            }
        }

        SavedAction::Clear => {
            if archive.clear().await {
                println!("Deleted All");
            }
        }
    }

    Ok(())
}
