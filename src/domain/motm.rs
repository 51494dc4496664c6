use std::collections::HashSet;

use crate::allocation::PlayerId;

/// Winning team players are nominated automatically; admins may add extras.
/// Order is winners first, then extras, without repeats.
pub fn seed_nominees(winners: &[PlayerId], extras: &[PlayerId]) -> Vec<PlayerId> {
    let mut seen = HashSet::new();
    winners
        .iter()
        .chain(extras.iter())
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}
