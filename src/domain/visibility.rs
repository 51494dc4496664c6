use chrono::{Duration, NaiveDateTime};

use super::discipline::Tier;
use crate::config::settings::VisibilitySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Admin,
    Player(Tier),
}

/// How far past `now` the viewer may look. `None` means nothing is visible.
pub fn horizon(tier: Tier, settings: &VisibilitySettings) -> Option<Duration> {
    if tier.is_banned() {
        return None;
    }
    let hours = match tier {
        Tier::Gold => settings.gold_hours,
        Tier::Bronze => settings.bronze_hours,
        _ => settings.silver_hours,
    };
    Some(Duration::hours(hours))
}

pub fn is_visible(
    game_date: NaiveDateTime,
    now: NaiveDateTime,
    viewer: Viewer,
    settings: &VisibilitySettings,
) -> bool {
    if game_date < now {
        return false;
    }
    match viewer {
        Viewer::Admin => true,
        Viewer::Player(tier) => horizon(tier, settings)
            .map(|window| game_date <= now + window)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_silver_sees_three_days() {
        let settings = VisibilitySettings::default();
        let now = at(1, 12);
        let viewer = Viewer::Player(Tier::Silver);

        assert!(is_visible(at(4, 12), now, viewer, &settings));
        assert!(!is_visible(at(4, 13), now, viewer, &settings));
    }

    #[test]
    fn test_bronze_and_gold_windows() {
        let settings = VisibilitySettings::default();
        let now = at(1, 12);

        assert!(is_visible(at(2, 12), now, Viewer::Player(Tier::Bronze), &settings));
        assert!(!is_visible(at(2, 13), now, Viewer::Player(Tier::Bronze), &settings));
        assert!(is_visible(at(29, 12), now, Viewer::Player(Tier::Gold), &settings));
    }

    #[test]
    fn test_banned_tiers_see_nothing() {
        let settings = VisibilitySettings::default();
        let now = at(1, 12);

        assert!(!is_visible(at(1, 13), now, Viewer::Player(Tier::White), &settings));
        assert!(!is_visible(at(1, 13), now, Viewer::Player(Tier::Black), &settings));
    }

    #[test]
    fn test_admin_sees_all_upcoming_but_not_past() {
        let settings = VisibilitySettings::default();
        let now = at(1, 12);

        assert!(is_visible(at(31, 12), now, Viewer::Admin, &settings));
        assert!(!is_visible(at(1, 11), now, Viewer::Admin, &settings));
    }
}
