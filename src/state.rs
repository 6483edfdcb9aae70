use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const DEFAULT_SIMULATION_COUNT: usize = 10_000;

/// One team's standing as supplied by the caller's standings feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeasonState {
    pub team_id: String,
    // Display decoration owned by the caller; passed through untouched.
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub points_for: f64,
    #[serde(default)]
    pub points_against: f64,
    #[serde(default)]
    pub remaining_schedule: Vec<String>,
}

impl TeamSeasonState {
    pub fn new(team_id: impl Into<String>, wins: u32, losses: u32, points_for: f64) -> Self {
        Self {
            team_id: team_id.into(),
            team_name: None,
            wins,
            losses,
            ties: 0,
            points_for,
            points_against: 0.0,
            remaining_schedule: Vec::new(),
        }
    }

    pub fn with_schedule<I, S>(mut self, opponents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remaining_schedule = opponents.into_iter().map(Into::into).collect();
        self
    }

    pub fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses).saturating_add(self.ties)
    }

    /// `"W-L"`, or `"W-L-T"` once the team has a tie.
    pub fn record(&self) -> String {
        format_record(self.wins, self.losses, self.ties)
    }
}

pub fn format_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSimulationSettings {
    pub playoff_spots: u32,
    pub regular_season_weeks: u32,
    pub current_week: u32,
}

impl LeagueSimulationSettings {
    pub fn remaining_weeks(&self) -> usize {
        self.regular_season_weeks.saturating_sub(self.current_week) as usize
    }

    pub fn validate(&self, team_count: usize) -> Result<()> {
        if self.regular_season_weeks == 0 {
            return Err(SimError::settings(
                "regularSeasonWeeks",
                "must be a positive number of weeks",
            ));
        }
        if self.current_week == 0 {
            return Err(SimError::settings("currentWeek", "weeks are numbered from 1"));
        }
        if self.current_week > self.regular_season_weeks {
            return Err(SimError::settings(
                "currentWeek",
                format!(
                    "week {} is past the {}-week regular season",
                    self.current_week, self.regular_season_weeks
                ),
            ));
        }
        if self.playoff_spots == 0 {
            return Err(SimError::settings("playoffSpots", "must be at least 1"));
        }
        if self.playoff_spots as usize > team_count {
            return Err(SimError::settings(
                "playoffSpots",
                format!(
                    "{} spots requested for a {team_count}-team league",
                    self.playoff_spots
                ),
            ));
        }
        Ok(())
    }
}

/// Checks the team list at the boundary: unique ids, sane point totals and
/// schedules that only name league members.
pub fn validate_teams(teams: &[TeamSeasonState], settings: &LeagueSimulationSettings) -> Result<()> {
    let ids: HashSet<&str> = teams.iter().map(|t| t.team_id.as_str()).collect();
    if ids.len() != teams.len() {
        let mut seen = HashSet::new();
        for t in teams {
            if !seen.insert(t.team_id.as_str()) {
                return Err(SimError::team(&t.team_id, "duplicate team id"));
            }
        }
    }

    let remaining = settings.remaining_weeks();
    for t in teams {
        if t.team_id.trim().is_empty() {
            return Err(SimError::team(&t.team_id, "team id is blank"));
        }
        for (label, v) in [("pointsFor", t.points_for), ("pointsAgainst", t.points_against)] {
            if !v.is_finite() || v < 0.0 {
                return Err(SimError::team(
                    &t.team_id,
                    format!("{label} must be a finite non-negative number, got {v}"),
                ));
            }
        }
        let season_games = t
            .wins
            .checked_add(t.losses)
            .and_then(|g| g.checked_add(t.ties))
            .and_then(|g| g.checked_add(remaining as u32));
        if season_games.is_none() {
            return Err(SimError::team(
                &t.team_id,
                format!(
                    "record {} cannot be extended through the season",
                    t.record()
                ),
            ));
        }
        if t.remaining_schedule.len() > remaining {
            return Err(SimError::team(
                &t.team_id,
                format!(
                    "{} scheduled games but only {remaining} weeks remain",
                    t.remaining_schedule.len()
                ),
            ));
        }
        for opp in &t.remaining_schedule {
            if opp == &t.team_id {
                return Err(SimError::team(&t.team_id, "scheduled against itself"));
            }
            if !ids.contains(opp.as_str()) {
                return Err(SimError::team(
                    &t.team_id,
                    format!("scheduled against unknown team `{opp}`"),
                ));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOptions {
    #[serde(default = "default_simulation_count")]
    pub simulation_count: usize,
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_simulation_count() -> usize {
    DEFAULT_SIMULATION_COUNT
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            simulation_count: DEFAULT_SIMULATION_COUNT,
            random_seed: None,
        }
    }
}

impl SimulationOptions {
    pub fn seeded(simulation_count: usize, seed: u64) -> Self {
        Self {
            simulation_count,
            random_seed: Some(seed),
        }
    }
}

/// Final standings of a single trial. Vectors are indexed like the input
/// team slice; `order` lists team indices from first place down.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub wins: Vec<u32>,
    pub losses: Vec<u32>,
    pub ties: Vec<u32>,
    pub points_for: Vec<f64>,
    pub order: Vec<usize>,
}

impl TrialOutcome {
    pub fn rank_of(&self, team_idx: usize) -> Option<usize> {
        self.order.iter().position(|&i| i == team_idx).map(|p| p + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityResult {
    pub team_id: String,
    #[serde(default)]
    pub team_name: Option<String>,
    pub playoff_probability: f64,
    pub championship_probability: f64,
    pub projected_wins: f64,
    pub projected_losses: f64,
    pub projected_points_for: f64,
    pub current_record: String,
    pub clinch_scenarios: Vec<String>,
    pub elimination_scenarios: Vec<String>,
    /// Percent chance of finishing at each final rank, first place first.
    pub seed_probabilities: Vec<f64>,
}

impl ProbabilityResult {
    pub fn playoff_display(&self) -> String {
        format!("{:.1}%", self.playoff_probability)
    }

    pub fn championship_display(&self) -> String {
        format!("{:.1}%", self.championship_probability)
    }

    pub fn projected_record(&self) -> String {
        format!("{:.1}-{:.1}", self.projected_wins, self.projected_losses)
    }

    pub fn is_eliminated(&self) -> bool {
        !self.elimination_scenarios.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub simulation_count: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    pub settings: LeagueSimulationSettings,
    pub results: Vec<ProbabilityResult>,
}

/// Standings feed as the surrounding application serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsFeed {
    pub settings: LeagueSimulationSettings,
    pub teams: Vec<TeamSeasonState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(spots: u32, weeks: u32, current: u32) -> LeagueSimulationSettings {
        LeagueSimulationSettings {
            playoff_spots: spots,
            regular_season_weeks: weeks,
            current_week: current,
        }
    }

    #[test]
    fn record_omits_ties_when_none() {
        let mut t = TeamSeasonState::new("a", 7, 3, 1200.0);
        assert_eq!(t.record(), "7-3");
        t.ties = 1;
        assert_eq!(t.record(), "7-3-1");
        assert_eq!(t.games_played(), 11);
    }

    #[test]
    fn records_that_overflow_the_season_are_rejected() {
        let s = settings(1, 14, 10);
        let huge = vec![
            TeamSeasonState::new("a", u32::MAX - 2, 0, 100.0),
            TeamSeasonState::new("b", 5, 5, 900.0),
        ];
        assert_eq!(huge[0].games_played(), u32::MAX - 2);
        assert!(matches!(
            validate_teams(&huge, &s),
            Err(SimError::InvalidTeam { ref team_id, .. }) if team_id == "a"
        ));

        let mut saturated = TeamSeasonState::new("c", u32::MAX, 1, 0.0);
        saturated.ties = 1;
        assert_eq!(saturated.games_played(), u32::MAX);
    }

    #[test]
    fn settings_reject_bad_values() {
        assert!(settings(4, 14, 10).validate(10).is_ok());
        assert!(matches!(
            settings(0, 14, 10).validate(10),
            Err(SimError::InvalidSettings { field: "playoffSpots", .. })
        ));
        assert!(settings(11, 14, 10).validate(10).is_err());
        assert!(settings(4, 0, 0).validate(10).is_err());
        assert!(settings(4, 14, 0).validate(10).is_err());
        assert!(settings(4, 14, 15).validate(10).is_err());
        // Final week is a legal, fully-played state.
        assert!(settings(4, 14, 14).validate(10).is_ok());
    }

    #[test]
    fn teams_reject_duplicates_and_unknown_opponents() {
        let s = settings(1, 4, 2);
        let dup = vec![
            TeamSeasonState::new("a", 1, 0, 100.0),
            TeamSeasonState::new("a", 0, 1, 90.0),
        ];
        assert!(matches!(
            validate_teams(&dup, &s),
            Err(SimError::InvalidTeam { ref team_id, .. }) if team_id == "a"
        ));

        let unknown = vec![
            TeamSeasonState::new("a", 1, 0, 100.0).with_schedule(["z"]),
            TeamSeasonState::new("b", 0, 1, 90.0),
        ];
        assert!(validate_teams(&unknown, &s).is_err());

        let selfish = vec![
            TeamSeasonState::new("a", 1, 0, 100.0).with_schedule(["a"]),
            TeamSeasonState::new("b", 0, 1, 90.0),
        ];
        assert!(validate_teams(&selfish, &s).is_err());

        let too_long = vec![
            TeamSeasonState::new("a", 1, 0, 100.0).with_schedule(["b", "b", "b"]),
            TeamSeasonState::new("b", 0, 1, 90.0),
        ];
        assert!(validate_teams(&too_long, &s).is_err());
    }

    #[test]
    fn teams_reject_non_finite_points() {
        let s = settings(1, 4, 2);
        let teams = vec![
            TeamSeasonState::new("a", 1, 0, f64::NAN),
            TeamSeasonState::new("b", 0, 1, 90.0),
        ];
        assert!(validate_teams(&teams, &s).is_err());
    }

    #[test]
    fn feed_parses_camel_case_json() {
        let raw = r#"{
            "settings": {"playoffSpots": 2, "regularSeasonWeeks": 4, "currentWeek": 3},
            "teams": [
                {"teamId": "a", "teamName": "Alpha", "wins": 2, "losses": 0, "pointsFor": 240.5, "remainingSchedule": ["b"]},
                {"teamId": "b", "wins": 0, "losses": 2, "pointsFor": 190.0}
            ]
        }"#;
        let feed: StandingsFeed = serde_json::from_str(raw).unwrap();
        assert_eq!(feed.settings.remaining_weeks(), 1);
        assert_eq!(feed.teams[0].team_name.as_deref(), Some("Alpha"));
        assert_eq!(feed.teams[1].ties, 0);
        assert!(feed.teams[1].remaining_schedule.is_empty());
    }
}
