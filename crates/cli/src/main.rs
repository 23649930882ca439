//! Teamdeps CLI - cross-team dependency annotations.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use teamdeps_core::{WorkItem, EXTERNAL_DEPENDENCIES, INTERNAL_DEPENDENCIES};
use teamdeps_engine::{DependencyEngine, EngineConfig};
use teamdeps_host::{Host, MemoryHost, Portfolio, RosterConfig};
use tracing::{info, Level};

mod feed;

use feed::{ChangeFeed, FileFeed, StdinFeed};

#[derive(Parser)]
#[command(name = "teamdeps")]
#[command(about = "Cross-team dependency annotations", long_about = None)]
struct Cli {
    /// Portfolio snapshot file
    #[arg(long, default_value = "portfolio.json")]
    snapshot: PathBuf,

    /// Program roster configuration file
    #[arg(long, default_value = "programs.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full resync and write the snapshot back
    Sync,
    /// Full resync, then apply a change feed event by event
    Watch {
        /// JSON-lines event file; stdin when omitted
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Print the derived annotations per monitored program
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let portfolio = Portfolio::load(&cli.snapshot)?;
    let config = RosterConfig::load(&cli.config)?;
    let engine_config = EngineConfig {
        program_pattern: config.program_pattern.clone(),
        inverted_match: config.inverted_match,
    };
    let host = MemoryHost::new(portfolio, config);
    let mut engine = DependencyEngine::new(host, engine_config);
    engine.initialize();

    match cli.command {
        Commands::Sync => {
            engine.host().to_portfolio().save(&cli.snapshot)?;
            info!("snapshot updated");
        }
        Commands::Watch { events } => {
            let mut feed: Box<dyn ChangeFeed> = match events {
                Some(path) => Box::new(FileFeed::open(&path).await?),
                None => Box::new(StdinFeed::new()),
            };
            let mut applied = 0usize;
            while let Some(event) = feed.next_event().await? {
                engine.on_change(&event);
                applied += 1;
            }
            info!(applied, "change feed drained");
            engine.host().to_portfolio().save(&cli.snapshot)?;
        }
        Commands::Show => {
            show(&engine)?;
        }
    }

    Ok(())
}

fn show(engine: &DependencyEngine<MemoryHost>) -> Result<()> {
    if !engine.enabled() {
        println!("Engine is disabled (program discovery failed)");
        return Ok(());
    }
    let host = engine.host();
    for program in engine.programs() {
        println!("Program: {program}");
        for id in host.milestones_of(&program.name)? {
            let WorkItem::Milestone(milestone) = host.item(id)? else {
                continue;
            };
            let marker = if host.color(id).is_some() { " [!]" } else { "" };
            println!("  Milestone: {}{}", milestone.name, marker);
            for child in milestone.children {
                let WorkItem::Leaf(leaf) = host.item(child)? else {
                    continue;
                };
                println!("    {}", leaf.name);
                for field in [INTERNAL_DEPENDENCIES, EXTERNAL_DEPENDENCIES] {
                    let value = host.custom_field(child, field).unwrap_or_default();
                    if !value.is_empty() {
                        println!("      {field}: {value}");
                    }
                }
            }
        }
    }
    Ok(())
}
