use std::collections::HashSet;

use log::{debug, info, warn};

use super::rules::{BeefIndex, Lineups, RuleSet};
use super::types::{
    AllocationError, AllocationResult, BalancePolicy, BeefRelation, PlayerCandidate, Rule, Team,
    MIN_CANDIDATES,
};

/// Splits a confirmed roster into Red and Blue.
///
/// Pure and deterministic: no I/O, no randomness. The same roster in the same
/// registration order always yields the same teams.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamAllocator {
    policy: BalancePolicy,
}

impl TeamAllocator {
    pub fn new(policy: BalancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BalancePolicy {
        self.policy
    }

    pub fn allocate(
        &self,
        candidates: &[PlayerCandidate],
        beef: &[BeefRelation],
    ) -> Result<AllocationResult, AllocationError> {
        let roster = dedupe(candidates);
        if roster.len() < MIN_CANDIDATES {
            return Err(AllocationError::InsufficientCandidates {
                found: roster.len(),
                required: MIN_CANDIDATES,
            });
        }

        let (seeded, queue) = seed_goalkeepers(order_by_rating(roster));
        info!(
            "Allocating {} players (Red starts with {}, Blue with {})",
            queue.len(),
            seeded.size(Team::Red),
            seeded.size(Team::Blue)
        );

        let index = BeefIndex::build(beef);
        let rules = RuleSet::new(&index, self.policy);

        let lineups = queue.into_iter().fold(seeded, |lineups, candidate| {
            let (team, rule) = rules.decide(&lineups, &candidate);
            debug!("Assigned {} to {} ({:?})", candidate.display_name, team, rule);
            lineups.place(candidate, team, rule)
        });

        info!(
            "Teams allocated: Red={}, Blue={}",
            lineups.size(Team::Red),
            lineups.size(Team::Blue)
        );
        Ok(lineups.into_result())
    }
}

/// Allocates with the default (always balance) policy.
pub fn allocate(
    candidates: &[PlayerCandidate],
    beef: &[BeefRelation],
) -> Result<AllocationResult, AllocationError> {
    TeamAllocator::default().allocate(candidates, beef)
}

fn dedupe(candidates: &[PlayerCandidate]) -> Vec<PlayerCandidate> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| {
            let first = seen.insert(c.player_id);
            if !first {
                warn!("Ignoring duplicate candidate {}", c.player_id);
            }
            first
        })
        .cloned()
        .collect()
}

/// Highest overall first; `sort_by` is stable so ties keep registration order.
fn order_by_rating(mut roster: Vec<PlayerCandidate>) -> Vec<PlayerCandidate> {
    roster.sort_by(|a, b| b.overall_rating.cmp(&a.overall_rating));
    roster
}

/// First keeper to Red, second to Blue, any others queue up after the outfielders.
fn seed_goalkeepers(ordered: Vec<PlayerCandidate>) -> (Lineups, Vec<PlayerCandidate>) {
    let (goalkeepers, mut queue): (Vec<_>, Vec<_>) =
        ordered.into_iter().partition(|p| p.position.is_goalkeeper());

    let mut lineups = Lineups::default();
    for (idx, keeper) in goalkeepers.into_iter().enumerate() {
        match idx {
            0 => lineups = lineups.place(keeper, Team::Red, Rule::GoalkeeperSeed),
            1 => lineups = lineups.place(keeper, Team::Blue, Rule::GoalkeeperSeed),
            _ => queue.push(keeper),
        }
    }

    (lineups, queue)
}
