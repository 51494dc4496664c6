use anyhow::Result;

use footy_booking::cli::Command;
use footy_booking::{
    handle_allocate, handle_completions, handle_generate_teams, handle_init_db, handle_serve,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::InitDb { reset } => handle_init_db(*reset),
        Command::GenerateTeams { game } => handle_generate_teams(*game),
        Command::Allocate { input, margin } => handle_allocate(input, *margin),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
