use rand::Rng;

use crate::state::{LeagueSimulationSettings, StandingsFeed, TeamSeasonState};

const TEAM_NAMES: &[&str] = &[
    "Gridiron Gurus",
    "End Zone Elite",
    "Blitz Brigade",
    "Pigskin Prophets",
    "Hail Mary Heroes",
    "Red Zone Raiders",
    "Fourth & Long",
    "Waiver Wire Warriors",
    "Touchdown Titans",
    "Sack Masters",
    "Fantasy Phenoms",
    "Bye Week Bandits",
    "Two Point Conversion",
    "Monday Night Mayhem",
];

/// Pairings for one week of a circle-method round robin. With an odd team
/// count one team sits out each week.
pub fn round_robin_week(team_count: usize, week: usize) -> Vec<(usize, usize)> {
    if team_count < 2 {
        return Vec::new();
    }
    let slots = team_count + team_count % 2;
    let rounds = slots - 1;
    let r = week % rounds;

    // Slot 0 stays put; the rest rotate by one each round.
    let slot_team = |pos: usize| -> usize {
        if pos == 0 { 0 } else { 1 + (pos - 1 + r) % rounds }
    };

    (0..slots / 2)
        .filter_map(|i| {
            let a = slot_team(i);
            let b = slot_team(slots - 1 - i);
            // The phantom slot is the bye.
            if a >= team_count || b >= team_count {
                None
            } else {
                Some((a, b))
            }
        })
        .collect()
}

/// Mock league in the shape the standings feed delivers: records played out
/// through `current_week` and a proper round-robin for the weeks left.
pub fn generate_league<R: Rng>(
    team_count: usize,
    regular_season_weeks: u32,
    current_week: u32,
    playoff_spots: u32,
    rng: &mut R,
) -> StandingsFeed {
    let current_week = current_week.min(regular_season_weeks);
    let mut teams: Vec<TeamSeasonState> = (0..team_count)
        .map(|i| {
            let mut t = TeamSeasonState::new(format!("team-{}", i + 1), 0, 0, 0.0);
            t.team_name = Some(
                TEAM_NAMES
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("Team {}", i + 1)),
            );
            t
        })
        .collect();
    let true_ppg: Vec<f64> = (0..team_count).map(|_| rng.gen_range(95.0..130.0)).collect();

    for week in 0..current_week as usize {
        for (a, b) in round_robin_week(team_count, week) {
            let score_a = (true_ppg[a] + rng.gen_range(-25.0..25.0)).max(40.0);
            let score_b = (true_ppg[b] + rng.gen_range(-25.0..25.0)).max(40.0);
            teams[a].points_for += score_a;
            teams[a].points_against += score_b;
            teams[b].points_for += score_b;
            teams[b].points_against += score_a;
            if score_a > score_b {
                teams[a].wins += 1;
                teams[b].losses += 1;
            } else if score_b > score_a {
                teams[b].wins += 1;
                teams[a].losses += 1;
            } else {
                teams[a].ties += 1;
                teams[b].ties += 1;
            }
        }
    }

    for week in current_week as usize..regular_season_weeks as usize {
        for (a, b) in round_robin_week(team_count, week) {
            let (id_a, id_b) = (teams[a].team_id.clone(), teams[b].team_id.clone());
            teams[a].remaining_schedule.push(id_b);
            teams[b].remaining_schedule.push(id_a);
        }
    }

    for t in &mut teams {
        t.points_for = (t.points_for * 100.0).round() / 100.0;
        t.points_against = (t.points_against * 100.0).round() / 100.0;
    }

    StandingsFeed {
        settings: LeagueSimulationSettings {
            playoff_spots: playoff_spots.clamp(1, team_count.max(1) as u32),
            regular_season_weeks,
            current_week,
        },
        teams,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn every_team_plays_once_per_week() {
        for n in [4usize, 10, 12] {
            for week in 0..n - 1 {
                let pairs = round_robin_week(n, week);
                assert_eq!(pairs.len(), n / 2);
                let seen: HashSet<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
                assert_eq!(seen.len(), n);
            }
        }
    }

    #[test]
    fn full_cycle_meets_everyone_once() {
        let n = 8;
        let mut met = HashSet::new();
        for week in 0..n - 1 {
            for (a, b) in round_robin_week(n, week) {
                assert!(met.insert((a.min(b), a.max(b))));
            }
        }
        assert_eq!(met.len(), n * (n - 1) / 2);
    }

    #[test]
    fn odd_leagues_get_a_bye() {
        let pairs = round_robin_week(5, 2);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn generated_league_is_consistent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let feed = generate_league(10, 14, 9, 4, &mut rng);
        assert_eq!(feed.teams.len(), 10);
        for t in &feed.teams {
            assert_eq!(t.games_played(), 9);
            assert_eq!(t.remaining_schedule.len(), 5);
        }
        let wins: u32 = feed.teams.iter().map(|t| t.wins).sum();
        let losses: u32 = feed.teams.iter().map(|t| t.losses).sum();
        assert_eq!(wins, losses);
        assert!(crate::state::validate_teams(&feed.teams, &feed.settings).is_ok());
    }
}
