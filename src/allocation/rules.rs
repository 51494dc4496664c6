use std::collections::{BTreeSet, HashMap};

use super::types::{
    AllocationResult, BalancePolicy, BeefLevel, BeefRelation, Placement, PlayerCandidate,
    PlayerId, Rule, Team, TeamStats,
};

/// Beef lookup keyed by player. Every stored direction is indexed both ways,
/// so a grudge held by either player keeps the pair apart.
#[derive(Debug, Clone, Default)]
pub struct BeefIndex {
    high: HashMap<PlayerId, BTreeSet<PlayerId>>,
    low: HashMap<PlayerId, BTreeSet<PlayerId>>,
}

impl BeefIndex {
    pub fn build(relations: &[BeefRelation]) -> Self {
        let mut index = BeefIndex::default();

        for relation in relations {
            if relation.from_player == relation.to_player {
                continue;
            }
            let bucket = match relation.level() {
                Some(BeefLevel::High) => &mut index.high,
                Some(BeefLevel::Low) => &mut index.low,
                None => continue,
            };
            bucket
                .entry(relation.from_player)
                .or_default()
                .insert(relation.to_player);
            bucket
                .entry(relation.to_player)
                .or_default()
                .insert(relation.from_player);
        }

        index
    }

    fn targets(&self, level: BeefLevel, player_id: PlayerId) -> Option<&BTreeSet<PlayerId>> {
        match level {
            BeefLevel::High => self.high.get(&player_id),
            BeefLevel::Low => self.low.get(&player_id),
        }
    }

    pub fn clashes_with(
        &self,
        level: BeefLevel,
        player_id: PlayerId,
        members: &[PlayerCandidate],
    ) -> bool {
        self.targets(level, player_id)
            .map(|targets| members.iter().any(|m| targets.contains(&m.player_id)))
            .unwrap_or(false)
    }
}

/// Accumulator carried through the allocation fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineups {
    red: Vec<PlayerCandidate>,
    blue: Vec<PlayerCandidate>,
    red_stats: TeamStats,
    blue_stats: TeamStats,
    placements: Vec<Placement>,
}

impl Lineups {
    pub fn members(&self, team: Team) -> &[PlayerCandidate] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn size(&self, team: Team) -> usize {
        self.members(team).len()
    }

    pub fn stats(&self, team: Team) -> TeamStats {
        match team {
            Team::Red => self.red_stats,
            Team::Blue => self.blue_stats,
        }
    }

    pub fn place(mut self, candidate: PlayerCandidate, team: Team, rule: Rule) -> Self {
        self.placements.push(Placement {
            player_id: candidate.player_id,
            team,
            rule,
        });
        match team {
            Team::Red => {
                self.red_stats = self.red_stats.with(&candidate);
                self.red.push(candidate);
            }
            Team::Blue => {
                self.blue_stats = self.blue_stats.with(&candidate);
                self.blue.push(candidate);
            }
        }
        self
    }

    pub fn into_result(self) -> AllocationResult {
        AllocationResult {
            red_team: self.red,
            blue_team: self.blue,
            red_stats: self.red_stats,
            blue_stats: self.blue_stats,
            placements: self.placements,
        }
    }
}

/// `Some(Red)` when only the red side pulls, `Some(Blue)` when only blue does.
fn pulled_towards(red: bool, blue: bool) -> Option<Team> {
    match (red, blue) {
        (true, false) => Some(Team::Red),
        (false, true) => Some(Team::Blue),
        _ => None,
    }
}

fn wants_any(targets: &BTreeSet<PlayerId>, members: &[PlayerCandidate]) -> bool {
    members.iter().any(|m| targets.contains(&m.player_id))
}

/// The ordered placement rules. The first rule with an opinion wins.
pub struct RuleSet<'a> {
    beef: &'a BeefIndex,
    policy: BalancePolicy,
}

impl<'a> RuleSet<'a> {
    pub fn new(beef: &'a BeefIndex, policy: BalancePolicy) -> Self {
        Self { beef, policy }
    }

    pub fn decide(&self, lineups: &Lineups, candidate: &PlayerCandidate) -> (Team, Rule) {
        let decided = |team: Option<Team>, rule: Rule| team.map(|team| (team, rule));

        decided(size_balance(lineups), Rule::SizeBalance)
            .or_else(|| {
                decided(self.beef_avoidance(BeefLevel::High, lineups, candidate), Rule::HighBeef)
            })
            .or_else(|| decided(self.overall_balance(lineups), Rule::OverallBalance))
            .or_else(|| decided(pair_preference(lineups, candidate), Rule::PairPreference))
            .or_else(|| decided(avoid_preference(lineups, candidate), Rule::AvoidPreference))
            .or_else(|| decided(defence_fitness_balance(lineups), Rule::DefenceFitnessBalance))
            .or_else(|| {
                decided(self.beef_avoidance(BeefLevel::Low, lineups, candidate), Rule::LowBeef)
            })
            .unwrap_or_else(|| (snake_draft(lineups), Rule::SnakeDraft))
    }

    fn beef_avoidance(
        &self,
        level: BeefLevel,
        lineups: &Lineups,
        candidate: &PlayerCandidate,
    ) -> Option<Team> {
        let red = lineups.members(Team::Red);
        let blue = lineups.members(Team::Blue);
        let red_clash = self.beef.clashes_with(level, candidate.player_id, red);
        let blue_clash = self.beef.clashes_with(level, candidate.player_id, blue);
        // A clash on one side pushes the player to the other.
        pulled_towards(blue_clash, red_clash)
    }

    fn overall_balance(&self, lineups: &Lineups) -> Option<Team> {
        let red_total = lineups.stats(Team::Red).overall;
        let blue_total = lineups.stats(Team::Blue).overall;

        match self.policy {
            BalancePolicy::Always => {
                Some(if red_total <= blue_total { Team::Red } else { Team::Blue })
            }
            BalancePolicy::Threshold { margin } => {
                if red_total.abs_diff(blue_total) > u64::from(margin) {
                    Some(if red_total < blue_total { Team::Red } else { Team::Blue })
                } else {
                    None
                }
            }
        }
    }
}

fn size_balance(lineups: &Lineups) -> Option<Team> {
    let red = lineups.size(Team::Red);
    let blue = lineups.size(Team::Blue);
    if red > blue {
        Some(Team::Blue)
    } else if blue > red {
        Some(Team::Red)
    } else {
        None
    }
}

fn pair_preference(lineups: &Lineups, candidate: &PlayerCandidate) -> Option<Team> {
    let red = lineups.members(Team::Red);
    let blue = lineups.members(Team::Blue);
    let red_pair = wants_any(&candidate.pairs, red);
    let blue_pair = wants_any(&candidate.pairs, blue);

    match (red_pair, blue_pair) {
        (true, false) if !wants_any(&candidate.avoids, red) => Some(Team::Red),
        (false, true) if !wants_any(&candidate.avoids, blue) => Some(Team::Blue),
        _ => None,
    }
}

fn avoid_preference(lineups: &Lineups, candidate: &PlayerCandidate) -> Option<Team> {
    let red_avoid = wants_any(&candidate.avoids, lineups.members(Team::Red));
    let blue_avoid = wants_any(&candidate.avoids, lineups.members(Team::Blue));
    pulled_towards(blue_avoid, red_avoid)
}

fn defence_fitness_balance(lineups: &Lineups) -> Option<Team> {
    let red = lineups.stats(Team::Red);
    let blue = lineups.stats(Team::Blue);

    if red.defense < blue.defense || red.fitness < blue.fitness {
        Some(Team::Red)
    } else if blue.defense < red.defense || blue.fitness < red.fitness {
        Some(Team::Blue)
    } else {
        None
    }
}

fn snake_draft(lineups: &Lineups) -> Team {
    if lineups.size(Team::Red) <= lineups.size(Team::Blue) {
        Team::Red
    } else {
        Team::Blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, overall: u32) -> PlayerCandidate {
        PlayerCandidate {
            overall_rating: overall,
            ..PlayerCandidate::new(id, format!("P{id}"))
        }
    }

    fn lineups(red: Vec<PlayerCandidate>, blue: Vec<PlayerCandidate>) -> Lineups {
        let state = red
            .into_iter()
            .fold(Lineups::default(), |l, p| l.place(p, Team::Red, Rule::SnakeDraft));
        blue.into_iter()
            .fold(state, |l, p| l.place(p, Team::Blue, Rule::SnakeDraft))
    }

    #[test]
    fn test_size_balance_beats_everything() {
        let beef = BeefIndex::build(&[BeefRelation { from_player: 3, to_player: 2, rating: 5 }]);
        let rules = RuleSet::new(&beef, BalancePolicy::Always);
        let state = lineups(vec![player(1, 10)], vec![]);

        // Blue is short a player, even though player 3 has beef with nobody there.
        let (team, rule) = rules.decide(&state, &player(3, 99));
        assert_eq!((team, rule), (Team::Blue, Rule::SizeBalance));
    }

    #[test]
    fn test_high_beef_pushes_to_other_team() {
        let beef = BeefIndex::build(&[BeefRelation { from_player: 3, to_player: 2, rating: 4 }]);
        let rules = RuleSet::new(&beef, BalancePolicy::Always);
        // Blue has the lower total, but 3 cannot stand 2.
        let state = lineups(vec![player(1, 90)], vec![player(2, 10)]);

        assert_eq!(rules.decide(&state, &player(3, 50)), (Team::Red, Rule::HighBeef));
    }

    #[test]
    fn test_beef_is_checked_in_both_directions() {
        let beef = BeefIndex::build(&[BeefRelation { from_player: 2, to_player: 3, rating: 3 }]);
        assert!(beef.clashes_with(BeefLevel::High, 3, &[player(2, 0)]));
        assert!(beef.clashes_with(BeefLevel::High, 2, &[player(3, 0)]));
        assert!(!beef.clashes_with(BeefLevel::Low, 2, &[player(3, 0)]));
    }

    #[test]
    fn test_beef_on_both_sides_falls_through() {
        let beef = BeefIndex::build(&[
            BeefRelation { from_player: 3, to_player: 1, rating: 5 },
            BeefRelation { from_player: 3, to_player: 2, rating: 5 },
        ]);
        let rules = RuleSet::new(&beef, BalancePolicy::Always);
        let state = lineups(vec![player(1, 70)], vec![player(2, 60)]);

        assert_eq!(rules.decide(&state, &player(3, 50)), (Team::Blue, Rule::OverallBalance));
    }

    #[test]
    fn test_rating_one_and_self_beef_are_ignored() {
        let beef = BeefIndex::build(&[
            BeefRelation { from_player: 3, to_player: 1, rating: 1 },
            BeefRelation { from_player: 3, to_player: 3, rating: 5 },
        ]);
        assert!(!beef.clashes_with(BeefLevel::High, 3, &[player(1, 0), player(3, 0)]));
        assert!(!beef.clashes_with(BeefLevel::Low, 3, &[player(1, 0)]));
    }

    #[test]
    fn test_overall_balance_ties_go_red() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Always);
        let state = lineups(vec![player(1, 50)], vec![player(2, 50)]);

        assert_eq!(rules.decide(&state, &player(3, 40)), (Team::Red, Rule::OverallBalance));
    }

    #[test]
    fn test_threshold_policy_only_balances_large_gaps() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });

        let close = lineups(vec![player(1, 60)], vec![player(2, 52)]);
        assert_eq!(rules.decide(&close, &player(3, 40)).1, Rule::SnakeDraft);

        let wide = lineups(vec![player(1, 80)], vec![player(2, 52)]);
        assert_eq!(rules.decide(&wide, &player(3, 40)), (Team::Blue, Rule::OverallBalance));
    }

    #[test]
    fn test_pair_preference_respects_avoids_on_same_team() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });
        let state = lineups(vec![player(1, 50), player(4, 50)], vec![player(2, 50), player(5, 50)]);

        let mut wants_red = player(3, 50);
        wants_red.pairs.insert(1);
        assert_eq!(rules.decide(&state, &wants_red), (Team::Red, Rule::PairPreference));

        // Pair target on red but also someone to avoid there: the avoid rule decides.
        wants_red.avoids.insert(4);
        assert_eq!(rules.decide(&state, &wants_red), (Team::Blue, Rule::AvoidPreference));
    }

    #[test]
    fn test_pairs_on_both_teams_fall_through() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });
        let state = lineups(vec![player(1, 50)], vec![player(2, 50)]);

        let mut torn = player(3, 50);
        torn.pairs.extend([1, 2]);
        assert_eq!(rules.decide(&state, &torn).1, Rule::SnakeDraft);
    }

    #[test]
    fn test_defence_and_fitness_balance() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });
        let mut strong_defender = player(1, 50);
        strong_defender.defending_rating = 8;
        let state = lineups(vec![strong_defender], vec![player(2, 50)]);

        assert_eq!(rules.decide(&state, &player(3, 50)), (Team::Blue, Rule::DefenceFitnessBalance));
    }

    #[test]
    fn test_low_beef_is_last_resort() {
        let beef = BeefIndex::build(&[BeefRelation { from_player: 3, to_player: 1, rating: 2 }]);
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });
        let state = lineups(vec![player(1, 50)], vec![player(2, 50)]);

        assert_eq!(rules.decide(&state, &player(3, 50)), (Team::Blue, Rule::LowBeef));
    }

    #[test]
    fn test_snake_draft_prefers_red_on_equal_sizes() {
        let beef = BeefIndex::default();
        let rules = RuleSet::new(&beef, BalancePolicy::Threshold { margin: 10 });

        let decision = rules.decide(&Lineups::default(), &player(1, 50));
        assert_eq!(decision, (Team::Red, Rule::SnakeDraft));
    }

    #[test]
    fn test_place_updates_running_totals() {
        let mut p = player(1, 30);
        p.defending_rating = 4;
        p.fitness_rating = 7;
        let state = Lineups::default().place(p, Team::Blue, Rule::SnakeDraft);

        assert_eq!(state.stats(Team::Blue), TeamStats { overall: 30, defense: 4, fitness: 7 });
        assert_eq!(state.stats(Team::Red), TeamStats::default());
        assert_eq!(state.size(Team::Blue), 1);
    }
}
