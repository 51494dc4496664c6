pub mod allocator;
pub mod rules;
pub mod types;

pub use allocator::{allocate, TeamAllocator};
pub use types::{
    AllocationError, AllocationResult, BalancePolicy, BeefLevel, BeefRelation, Placement,
    PlayerCandidate, PlayerId, PositionPreference, Rule, Team, TeamStats,
};
