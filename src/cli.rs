use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "footy booking backend and team generator")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    InitDb {
        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },
    /// Generate and store teams for a game
    GenerateTeams {
        /// Game id
        #[arg(short, long)]
        game: i32,
    },
    /// Allocate teams from a JSON roster without touching the database
    Allocate {
        /// File with `candidates` and optional `beef`
        #[arg(short, long)]
        input: PathBuf,
        /// Only balance overall ratings when the gap exceeds this margin
        #[arg(short, long)]
        margin: Option<u32>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
