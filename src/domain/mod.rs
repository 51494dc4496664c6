pub mod discipline;
pub mod motm;
pub mod roster;
pub mod schedule;
pub mod visibility;

pub use discipline::{next_tier_threshold, Offence, Tier, TierThreshold};
pub use visibility::Viewer;
