//! CLI administration tool for short-links.
//!
//! Manages links and checks the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- links create https://example.com/very/long/path
//!
//! # List the newest links
//! cargo run --bin admin -- links list --limit 20
//!
//! # Show one link by code or id
//! cargo run --bin admin -- links show Qx3_aZ
//! cargo run --bin admin -- links show --id 42
//!
//! # Point a code at a new target
//! cargo run --bin admin -- links update Qx3_aZ https://example.org
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database and allocation variables as the server (see `config`).

use short_links::application::services::LinkService;
use short_links::config::{self, Config};
use short_links::domain::entities::Link;
use short_links::infrastructure::persistence::PgLinkRepository;
use short_links::server::connect_pool;
use short_links::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing short-links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Shorten a URL
    Create {
        /// Target URL (https:// is assumed when no scheme is given)
        url: String,
    },

    /// List the most recent links
    List {
        /// Number of links to show (1-1000)
        #[arg(short, long, default_value_t = 100)]
        limit: i64,
    },

    /// Show a single link
    Show {
        /// Short code
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        code: Option<String>,

        /// Look up by numeric id instead of code
        #[arg(long)]
        id: Option<i64>,
    },

    /// Change the target URL of a link
    Update {
        /// Short code
        code: String,

        /// New target URL
        url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repository, Arc::new(RandomCodeGenerator::new()))
        .with_policy(config.allocation_policy())
        .with_operation_timeout(config.operation_timeout());
    let base_url = config.base_url.trim_end_matches('/');

    match action {
        LinkAction::Create { url } => {
            let link = service
                .create_link(&url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            println!("{}", "✅ Link created".green().bold());
            print_link(&link, base_url);
        }
        LinkAction::List { limit } => {
            let links = service
                .list_recent(Some(limit))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
            print_link_table(&links);
        }
        LinkAction::Show { code, id } => {
            let link = match (code, id) {
                (_, Some(id)) => service.get_link_by_id(id).await,
                (Some(code), None) => service.get_link(&code).await,
                (None, None) => unreachable!("clap requires a code or an id"),
            }
            .map_err(|e| anyhow::anyhow!("{}", e))?;

            print_link(&link, base_url);
        }
        LinkAction::Update { code, url, yes } => {
            update_link(&service, &code, &url, yes, base_url).await?;
        }
    }

    Ok(())
}

/// Updates a link target after showing the current one.
async fn update_link(
    service: &LinkService,
    code: &str,
    url: &str,
    skip_confirm: bool,
    base_url: &str,
) -> Result<()> {
    println!("{}", "✏️  Update Link".bright_blue().bold());
    println!();

    let current = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Link lookup failed")?;

    println!("  Code:    {}", current.code.cyan());
    println!("  Current: {}", current.long_url.bright_black());
    println!("  New:     {}", url.bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Update this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .update_link_target(code, url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

    println!("{}", "✅ Link updated".green().bold());
    print_link(&link, base_url);

    Ok(())
}

fn print_link(link: &Link, base_url: &str) {
    println!();
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!(
        "  Short URL: {}",
        format!("{}/{}", base_url, link.code).bright_green().bold()
    );
    println!("  Target:    {}", link.long_url.cyan());
    println!("  Clicks:    {}", link.clicks.to_string().bright_white());
    println!(
        "  Created:   {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Prints links as a table.
///
/// ```text
///   ID    Code         Clicks   Created            Target
///   ─────────────────────────────────────────────────────────────
///   2     Qx3_aZ       17       2026-01-16 14:20   https://example.com
/// ```
fn print_link_table(links: &[Link]) {
    println!("{}", "📋 Recent Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return;
    }

    println!(
        "  {:<5} {:<12} {:<8} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in links {
        println!(
            "  {:<5} {:<12} {:<8} {:<18} {}",
            link.id.to_string().bright_black(),
            link.code.cyan(),
            link.clicks.to_string().green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            let clicks_total: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Clicks:     {}",
                clicks_total.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
