use std::collections::HashMap;

use crate::state::{LeagueSimulationSettings, TeamSeasonState};

/// One game still to be played, as indices into the team slice.
///
/// A pairing both teams list for the same week is `mutual` and settles both
/// records, with `home < away`. A pairing only one team listed counts for
/// that team alone: `home` is the lister and `away` only supplies the
/// opposing rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matchup {
    pub week: usize,
    pub home: usize,
    pub away: usize,
    pub mutual: bool,
}

impl Matchup {
    pub fn opponent_of(&self, team_idx: usize) -> Option<usize> {
        if self.home == team_idx {
            Some(self.away)
        } else if self.away == team_idx {
            Some(self.home)
        } else {
            None
        }
    }

    /// Whether this game adds a win or loss to `team_idx`.
    pub fn settles(&self, team_idx: usize) -> bool {
        self.home == team_idx || (self.mutual && self.away == team_idx)
    }

    /// The opponent whose record moves opposite to `team_idx`'s in this game.
    pub fn rival_of(&self, team_idx: usize) -> Option<usize> {
        if self.mutual {
            self.opponent_of(team_idx)
        } else {
            None
        }
    }
}

/// Round-robin projection of a team's remaining opponents: remaining week
/// `w` faces `other_teams[w % other_teams.len()]`, where `other_teams` is
/// the league roster in order with `team_id` removed.
pub fn project_schedule<S: AsRef<str>>(
    team_id: &str,
    league_team_ids: &[S],
    current_week: u32,
    regular_season_weeks: u32,
) -> Vec<String> {
    let others: Vec<&str> = league_team_ids
        .iter()
        .map(|s| s.as_ref())
        .filter(|id| *id != team_id)
        .collect();
    if others.is_empty() || current_week >= regular_season_weeks {
        return Vec::new();
    }

    let remaining = (regular_season_weeks - current_week) as usize;
    (0..remaining)
        .map(|w| others[w % others.len()].to_string())
        .collect()
}

/// Copies the teams, projecting a schedule for any team that arrived with
/// none while weeks remain. Supplied schedules are kept as-is.
pub fn fill_missing_schedules(
    teams: &[TeamSeasonState],
    settings: &LeagueSimulationSettings,
) -> Vec<TeamSeasonState> {
    let ids: Vec<&str> = teams.iter().map(|t| t.team_id.as_str()).collect();
    teams
        .iter()
        .map(|t| {
            let mut t = t.clone();
            if t.remaining_schedule.is_empty() && settings.remaining_weeks() > 0 {
                t.remaining_schedule = project_schedule(
                    &t.team_id,
                    &ids[..],
                    settings.current_week,
                    settings.regular_season_weeks,
                );
            }
            t
        })
        .collect()
}

/// Flattens every team's schedule into the league's game list, ordered by
/// week. A pairing listed by both teams for the same week is one mutual
/// game. A pairing listed by one side only is played by that side alone, so
/// every team plays exactly as many games as its schedule holds.
pub fn build_matchups(teams: &[TeamSeasonState]) -> Vec<Matchup> {
    let index: HashMap<&str, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.team_id.as_str(), i))
        .collect();

    let weeks = teams
        .iter()
        .map(|t| t.remaining_schedule.len())
        .max()
        .unwrap_or(0);

    let mut out = Vec::new();
    for week in 0..weeks {
        let listed = |i: usize| -> Option<usize> {
            let opp = teams[i].remaining_schedule.get(week)?;
            index.get(opp.as_str()).copied()
        };
        for i in 0..teams.len() {
            let Some(j) = listed(i) else {
                continue;
            };
            if i == j {
                continue;
            }
            if listed(j) == Some(i) {
                if i < j {
                    out.push(Matchup {
                        week,
                        home: i,
                        away: j,
                        mutual: true,
                    });
                }
            } else {
                out.push(Matchup {
                    week,
                    home: i,
                    away: j,
                    mutual: false,
                });
            }
        }
    }
    out
}

/// Number of games each team still plays according to `matchups`.
pub fn games_remaining(matchups: &[Matchup], team_count: usize) -> Vec<u32> {
    let mut out = vec![0u32; team_count];
    for m in matchups {
        out[m.home] += 1;
        if m.mutual {
            out[m.away] += 1;
        }
    }
    out
}
