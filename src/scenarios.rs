//! Deterministic clinch and elimination checks.
//!
//! These run on the current standings and the remaining game list, outside
//! the Monte Carlo loop. Simulated games never end in a tie, so a team's
//! final win percentage is bounded by losing out and by winning out.
//! Equal percentages fall to the points tiebreak, which is uncertain, so
//! "could catch" comparisons use `>=` and "guaranteed ahead" uses `>`.

use crate::schedule::{Matchup, games_remaining};
use crate::state::TeamSeasonState;
use crate::win_prob::win_pct;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenarios {
    pub clinch: Vec<String>,
    pub elimination: Vec<String>,
}

struct Bounds {
    wins: u32,
    losses: u32,
    ties: u32,
    remaining: u32,
}

impl Bounds {
    fn pct_with(&self, extra_wins: u32, extra_losses: u32) -> f64 {
        win_pct(self.wins + extra_wins, self.losses + extra_losses, self.ties)
    }

    fn floor(&self) -> f64 {
        self.pct_with(0, self.remaining)
    }

    fn ceiling(&self) -> f64 {
        self.pct_with(self.remaining, 0)
    }
}

pub fn league_scenarios(
    teams: &[TeamSeasonState],
    matchups: &[Matchup],
    playoff_spots: u32,
) -> Vec<Scenarios> {
    let remaining = games_remaining(matchups, teams.len());
    let bounds: Vec<Bounds> = teams
        .iter()
        .zip(&remaining)
        .map(|(t, &r)| Bounds {
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            remaining: r,
        })
        .collect();

    (0..teams.len())
        .map(|idx| team_scenarios(idx, teams, &bounds, matchups, playoff_spots as usize))
        .collect()
}

fn team_scenarios(
    idx: usize,
    teams: &[TeamSeasonState],
    bounds: &[Bounds],
    matchups: &[Matchup],
    spots: usize,
) -> Scenarios {
    let mut out = Scenarios::default();
    if spots == 0 {
        return out;
    }
    let me = &bounds[idx];

    let mut head_to_head = vec![0u32; teams.len()];
    for m in matchups {
        if let Some(opp) = m.rival_of(idx) {
            head_to_head[opp] += 1;
        }
    }

    let ahead: Vec<usize> = (0..teams.len())
        .filter(|&i| i != idx && bounds[i].floor() > me.ceiling())
        .collect();
    if ahead.len() >= spots {
        let best = format_best_case(me);
        out.elimination.push(format!(
            "Mathematically eliminated: even finishing {best} leaves {} teams guaranteed to finish ahead",
            ahead.len()
        ));
        let names: Vec<&str> = ahead.iter().map(|&i| display_name(&teams[i])).collect();
        out.elimination
            .push(format!("Guaranteed to finish ahead: {}", names.join(", ")));
        return out;
    }

    if let Some(k) = wins_needed(idx, bounds, &head_to_head, spots) {
        out.clinch.push(clinch_line(k, me.remaining, "a playoff spot"));
    }
    if spots > 1 {
        if let Some(k) = wins_needed(idx, bounds, &head_to_head, 1) {
            out.clinch.push(clinch_line(k, me.remaining, "the #1 seed"));
        }
    }

    out
}

/// Smallest number of remaining wins that guarantees a top-`spots` finish,
/// whatever happens elsewhere.
fn wins_needed(idx: usize, bounds: &[Bounds], head_to_head: &[u32], spots: usize) -> Option<u32> {
    let me = &bounds[idx];

    // Short of winning out, a rival may beat us head to head, so it keeps its
    // full ceiling.
    for k in 0..me.remaining.max(1) {
        let pct = me.pct_with(k, me.remaining - k);
        let threats = (0..bounds.len())
            .filter(|&i| i != idx && bounds[i].ceiling() >= pct)
            .count();
        if threats < spots {
            return Some(k);
        }
    }
    if me.remaining == 0 {
        return None;
    }

    // Winning out hands every head-to-head opponent those losses.
    let pct = me.ceiling();
    let threats = (0..bounds.len())
        .filter(|&i| i != idx)
        .filter(|&i| {
            let b = &bounds[i];
            let lost = head_to_head[i];
            b.pct_with(b.remaining - lost, lost) >= pct
        })
        .count();
    (threats < spots).then_some(me.remaining)
}

fn clinch_line(wins: u32, remaining: u32, prize: &str) -> String {
    if wins == 0 {
        return format!("Clinched {prize}");
    }
    if wins < remaining {
        return format!("Win {wins} of your remaining {remaining} games to clinch {prize}");
    }
    if remaining == 1 {
        format!("Win your final game to clinch {prize}")
    } else {
        format!("Win all remaining games to clinch {prize}")
    }
}

fn format_best_case(b: &Bounds) -> String {
    crate::state::format_record(b.wins + b.remaining, b.losses, b.ties)
}

fn display_name(team: &TeamSeasonState) -> &str {
    team.team_name.as_deref().unwrap_or(&team.team_id)
}
