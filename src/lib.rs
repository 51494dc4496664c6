pub mod allocation;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod services;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::info;
use serde::Deserialize;

use crate::allocation::{
    AllocationResult, BalancePolicy, BeefRelation, PlayerCandidate, Team, TeamAllocator,
};
use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::services::server::ServerService;
use crate::services::TeamGenerationService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init_db(reset: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.server.database_path)?;
    let conn = database::get_connection(&pool)?;

    if reset {
        database::setup::reset_database(&conn)?;
    } else {
        database::setup::ensure_schema(&conn)?;
    }
    info!("Database ready at {}", config.server.database_path);
    Ok(())
}

pub fn handle_generate_teams(game_id: i32) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.server.database_path)?;
    let mut conn = database::get_connection(&pool)?;

    let result = TeamGenerationService::new(&config)
        .generate(&mut conn, game_id)
        .with_context(|| format!("Failed to generate teams for game {}", game_id))?;
    print_teams(&result);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct AllocationInput {
    candidates: Vec<PlayerCandidate>,
    #[serde(default)]
    beef: Vec<BeefRelation>,
}

pub fn handle_allocate(input: &Path, margin: Option<u32>) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let parsed: AllocationInput =
        serde_json::from_str(&raw).context("Failed to parse roster JSON")?;

    let policy = match margin {
        Some(margin) => BalancePolicy::Threshold { margin },
        None => AppConfig::from_env().allocation.balance_policy,
    };
    let result = TeamAllocator::new(policy).allocate(&parsed.candidates, &parsed.beef)?;
    print_teams(&result);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn print_teams(result: &AllocationResult) {
    for team in [Team::Red, Team::Blue] {
        let stats = match team {
            Team::Red => result.red_stats,
            Team::Blue => result.blue_stats,
        };
        let header = format!(
            "{} ({} players, overall {}, defence {}, fitness {})",
            team,
            result.team(team).len(),
            stats.overall,
            stats.defense,
            stats.fitness
        );
        let header = match team {
            Team::Red => header.red().bold(),
            Team::Blue => header.blue().bold(),
        };
        println!("{}", header);

        for (pick, player) in result.team(team).iter().enumerate() {
            let keeper = if player.position.is_goalkeeper() {
                " (GK)".yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "  {:>2}. {}{} [{}]",
                pick + 1,
                player.display_name,
                keeper,
                player.overall_rating.to_string().dimmed()
            );
        }
    }
}
