use chrono::{Duration, NaiveDateTime};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledGame {
    pub game_date: NaiveDateTime,
    pub series_id: Option<String>,
}

/// Base id of the `number`th series, e.g. `TF0001`.
pub fn series_base_id(prefix: &str, number: i64) -> String {
    format!("{}{:04}", prefix, number)
}

/// `TF0001-05` -> `TF0001`
pub fn base_of(series_id: &str) -> &str {
    series_id.split('-').next().unwrap_or(series_id)
}

pub fn one_off(game_date: NaiveDateTime) -> Vec<ScheduledGame> {
    vec![ScheduledGame {
        game_date,
        series_id: None,
    }]
}

/// One game per week starting at `first`, tagged `<base>-01`, `<base>-02`, ...
pub fn weekly_series(first: NaiveDateTime, weeks: u32, base_id: &str) -> Vec<ScheduledGame> {
    (0..weeks)
        .map(|week| ScheduledGame {
            game_date: first + Duration::weeks(week as i64),
            series_id: Some(format!("{}-{:02}", base_id, week + 1)),
        })
        .collect()
}

/// Random 12 hex character token used in shareable game links.
pub fn game_url_token() -> String {
    let bytes: [u8; 6] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn kickoff() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 6)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_weekly_series_dates_and_ids() {
        let games = weekly_series(kickoff(), 26, "TF0003");

        assert_eq!(games.len(), 26);
        assert_eq!(games[0].game_date, kickoff());
        assert_eq!(games[1].game_date, kickoff() + Duration::days(7));
        assert_eq!(games[0].series_id.as_deref(), Some("TF0003-01"));
        assert_eq!(games[25].series_id.as_deref(), Some("TF0003-26"));
    }

    #[test]
    fn test_series_ids() {
        assert_eq!(series_base_id("TF", 1), "TF0001");
        assert_eq!(series_base_id("TF", 12), "TF0012");
        assert_eq!(base_of("TF0012-07"), "TF0012");
        assert_eq!(base_of("TF0012"), "TF0012");
    }

    #[test]
    fn test_game_url_token_shape() {
        let token = game_url_token();
        assert_eq!(token.len(), 12);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
