use serde::{Deserialize, Serialize};

use crate::state::TeamSeasonState;

const K_STRENGTH: f64 = 4.0;
const POINTS_WEIGHT: f64 = 1.0;

// Win percentage assumed for a team that has not played yet.
const BASELINE_WIN_PCT: f64 = 0.5;
// Points per game assumed when nobody in the league has scored yet.
const BASELINE_PPG: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthModel {
    /// Logistic slope applied to the strength gap.
    pub k: f64,
    /// How much scoring above the league average adds to strength.
    pub points_weight: f64,
}

impl Default for StrengthModel {
    fn default() -> Self {
        Self {
            k: K_STRENGTH,
            points_weight: POINTS_WEIGHT,
        }
    }
}

/// Per-team inputs to the game model, computed once per simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamRating {
    pub strength: f64,
    pub points_per_game: f64,
}

pub fn win_pct(wins: u32, losses: u32, ties: u32) -> f64 {
    let games = wins.saturating_add(losses).saturating_add(ties);
    if games == 0 {
        return 0.0;
    }
    (wins as f64 + 0.5 * ties as f64) / games as f64
}

pub fn league_points_per_game(teams: &[TeamSeasonState]) -> f64 {
    let mut points = 0.0;
    let mut games = 0u64;
    for t in teams {
        points += t.points_for;
        games += u64::from(t.games_played());
    }
    if games == 0 || points <= 0.0 {
        BASELINE_PPG
    } else {
        points / games as f64
    }
}

impl StrengthModel {
    pub fn rate_league(&self, teams: &[TeamSeasonState]) -> Vec<TeamRating> {
        let league_ppg = league_points_per_game(teams);
        teams
            .iter()
            .map(|t| self.rate_team(t, league_ppg))
            .collect()
    }

    pub fn rate_team(&self, team: &TeamSeasonState, league_ppg: f64) -> TeamRating {
        let games = team.games_played();
        let (pct, ppg) = if games == 0 {
            (BASELINE_WIN_PCT, league_ppg)
        } else {
            (
                win_pct(team.wins, team.losses, team.ties),
                team.points_for / games as f64,
            )
        };
        let scoring_edge = if league_ppg > 0.0 {
            ppg / league_ppg - 1.0
        } else {
            0.0
        };
        TeamRating {
            strength: pct + self.points_weight * scoring_edge,
            points_per_game: ppg,
        }
    }

    /// Probability that `a` beats `b` in a single game.
    /// `game_win_prob(a, b) + game_win_prob(b, a) == 1`.
    pub fn game_win_prob(&self, a: &TeamRating, b: &TeamRating) -> f64 {
        sigmoid(self.k * (a.strength - b.strength))
    }
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
