pub mod beef;
pub mod connection;
pub mod credits;
pub mod discipline;
pub mod games;
pub mod models;
pub mod motm;
pub mod players;
pub mod registrations;
pub mod setup;
pub mod teams;
pub mod venues;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
