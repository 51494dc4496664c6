use std::collections::HashSet;

use crate::allocation::{BeefRelation, PlayerCandidate, PlayerId, PositionPreference};
use crate::database::models::RosterEntry;

/// Alias when set, full name otherwise.
pub fn display_name(full_name: &str, alias: Option<&str>) -> String {
    match alias.map(str::trim) {
        Some(alias) if !alias.is_empty() => alias.to_string(),
        _ => full_name.to_string(),
    }
}

fn rating(value: Option<i64>) -> u32 {
    value.map(|v| v.clamp(0, u32::MAX as i64) as u32).unwrap_or(0)
}

pub fn to_candidate(entry: &RosterEntry) -> PlayerCandidate {
    PlayerCandidate {
        player_id: entry.player_id,
        display_name: display_name(&entry.full_name, entry.alias.as_deref()),
        overall_rating: rating(entry.overall_rating),
        defending_rating: rating(entry.defending_rating),
        fitness_rating: rating(entry.fitness_rating),
        goalkeeper_rating: rating(entry.goalkeeper_rating),
        position: PositionPreference::from_free_text(entry.position_preference.as_deref()),
        pairs: entry.pairs.iter().copied().collect(),
        avoids: entry.avoids.iter().copied().collect(),
    }
}

pub fn to_candidates(entries: &[RosterEntry]) -> Vec<PlayerCandidate> {
    entries.iter().map(to_candidate).collect()
}

/// Beef relations that can matter for this roster.
pub fn relevant_beef(
    relations: Vec<BeefRelation>,
    candidates: &[PlayerCandidate],
) -> Vec<BeefRelation> {
    let ids: HashSet<PlayerId> = candidates.iter().map(|c| c.player_id).collect();
    relations
        .into_iter()
        .filter(|r| r.rating >= 2 && ids.contains(&r.from_player) && ids.contains(&r.to_player))
        .collect()
}
