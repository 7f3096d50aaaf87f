// src/main.rs

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use raffleboard::display::{grid_columns, StatusFilter};
use raffleboard::metrics::format_minutes;
use raffleboard::models::ClaimSource;
use raffleboard::services::RaffleService;
use raffleboard::storage::FileStore;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "raffleboard")]
#[command(author, version, about = "Raffle winner tracking, claim reconciliation and metrics")]
struct Args {
    /// Directory holding the persisted registry
    #[arg(long, env = "RAFFLEBOARD_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a prize for the named winner, creating them on first win
    Award { name: String },

    /// Claim every outstanding prize of a winner
    Claim {
        winner_id: Uuid,
        /// Channel the claim came through
        #[arg(long, default_value = "admin")]
        source: ClaimSource,
    },

    /// Claim one specific prize of a winner
    ClaimPrize {
        winner_id: Uuid,
        prize_id: Uuid,
        #[arg(long, default_value = "admin")]
        source: ClaimSource,
    },

    /// List winners with prize/claim counts
    List {
        /// Filter by claim status
        #[arg(long, value_enum, default_value = "all")]
        status: StatusFilter,
    },

    /// Show the public display: outstanding winners and grid layout
    Display,

    /// Show the metrics dashboard counters, series and histogram
    Metrics,

    /// Write the registry to a JSON file (default: raffle-winners-<date>.json)
    Export { path: Option<PathBuf> },

    /// Replace the registry with the contents of a JSON file
    Import { path: PathBuf },

    /// Drop every winner, prize and claim
    Reset {
        /// Required; reset is destructive
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let store = FileStore::new(&args.data_dir);
    let mut service = RaffleService::load(store).context("loading registry")?;

    match args.command {
        Command::Award { name } => {
            let winner_id = service.award_prize(&name)?;
            let winner = service.find_by_id(winner_id).context("winner vanished")?;
            println!(
                "{} now has {} prize(s) ({} unclaimed)",
                winner.name,
                winner.prizes.len(),
                service.unclaimed_prizes(winner).len()
            );
        }
        Command::Claim { winner_id, source } => {
            service.record_bulk_claim(winner_id, source)?;
            println!("all outstanding prizes claimed for {winner_id}");
        }
        Command::ClaimPrize {
            winner_id,
            prize_id,
            source,
        } => {
            service.record_single_claim(winner_id, prize_id, source)?;
            println!("prize {prize_id} claimed for {winner_id}");
        }
        Command::List { status } => {
            for winner in service.list_winners(status) {
                let unclaimed = service.unclaimed_prizes(winner).len();
                println!(
                    "{}  {:<24} prizes: {:<3} unclaimed: {}",
                    winner.id,
                    winner.name,
                    winner.prizes.len(),
                    unclaimed
                );
            }
        }
        Command::Display => {
            let total = service.registry().winners().len();
            let outstanding = service.outstanding_winners();
            println!(
                "{} winner(s) outstanding, {} column(s) per row",
                outstanding.len(),
                grid_columns(total)
            );
            for winner in outstanding {
                println!(
                    "  {:<24} {} prize(s) waiting",
                    winner.name,
                    service.unclaimed_prizes(winner).len()
                );
            }
        }
        Command::Metrics => {
            let summary = service.metrics_summary();
            println!("winners:        {}", summary.unique_winners);
            println!("prizes:         {}", summary.total_prizes);
            println!("claimed:        {}", summary.total_claims);
            println!("unclaimed:      {}", summary.total_unclaimed);
            println!("claim rate:     {:.1}%", summary.claim_rate);
            for source in [ClaimSource::Display, ClaimSource::Admin] {
                println!("  via {source}: {}", summary.claims_by_source[&source]);
            }
            println!(
                "avg time to claim:     {}",
                format_minutes(Some(summary.average_time_to_claim))
            );
            println!(
                "median time to claim:  {}",
                format_minutes(Some(summary.median_time_to_claim))
            );
            println!(
                "fastest claim:         {}",
                format_minutes(summary.fastest_claim_time)
            );
            println!(
                "slowest claim:         {}",
                format_minutes(summary.slowest_claim_time)
            );
            println!("distribution:");
            for band in service.histogram() {
                println!("  {:<8} {}", band.label, band.count);
            }
            println!("series points: {}", service.time_series().len());
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(RaffleService::<FileStore>::export_file_name(
                    Utc::now().date_naive(),
                ))
            });
            let json = service.export_json()?;
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("exported to {}", path.display());
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            service.import_json(&text)?;
            println!(
                "imported {} winner(s) from {}",
                service.registry().winners().len(),
                path.display()
            );
        }
        Command::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset drops all winners, prizes and claims; pass --yes to confirm");
            }
            service.reset()?;
            info!("registry reset");
            println!("registry is now empty");
        }
    }

    Ok(())
}
