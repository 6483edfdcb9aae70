use crate::scenarios::Scenarios;
use crate::simulator::PreparedLeague;
use crate::state::{ProbabilityResult, TrialOutcome};

/// Running per-team counters for a batch of trials. Merging is plain
/// addition, so shard tallies can be combined in any grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialTally {
    pub trials: usize,
    pub playoff: Vec<u64>,
    pub championship: Vec<u64>,
    pub wins: Vec<u64>,
    pub losses: Vec<u64>,
    pub points_for: Vec<f64>,
    // Row-major `team * team_count + (rank - 1)`.
    pub seeds: Vec<u64>,
}

impl TrialTally {
    pub fn new(team_count: usize) -> Self {
        Self {
            trials: 0,
            playoff: vec![0; team_count],
            championship: vec![0; team_count],
            wins: vec![0; team_count],
            losses: vec![0; team_count],
            points_for: vec![0.0; team_count],
            seeds: vec![0; team_count * team_count],
        }
    }

    pub fn team_count(&self) -> usize {
        self.playoff.len()
    }

    pub fn record(&mut self, outcome: &TrialOutcome, playoff_spots: usize) {
        let n = self.team_count();
        self.trials += 1;
        for (rank0, &team) in outcome.order.iter().enumerate() {
            if rank0 < playoff_spots {
                self.playoff[team] += 1;
            }
            if rank0 == 0 {
                self.championship[team] += 1;
            }
            self.seeds[team * n + rank0] += 1;
        }
        for team in 0..n {
            self.wins[team] += outcome.wins[team] as u64;
            self.losses[team] += outcome.losses[team] as u64;
            self.points_for[team] += outcome.points_for[team];
        }
    }

    pub fn merge(&mut self, other: &TrialTally) {
        self.trials += other.trials;
        add_into(&mut self.playoff, &other.playoff);
        add_into(&mut self.championship, &other.championship);
        add_into(&mut self.wins, &other.wins);
        add_into(&mut self.losses, &other.losses);
        add_into(&mut self.seeds, &other.seeds);
        for (a, b) in self.points_for.iter_mut().zip(&other.points_for) {
            *a += b;
        }
    }
}

fn add_into(acc: &mut [u64], other: &[u64]) {
    for (a, b) in acc.iter_mut().zip(other) {
        *a += b;
    }
}

fn percent(count: u64, trials: usize) -> f64 {
    count as f64 / trials as f64 * 100.0
}

/// One result per team, in input order. Empty when no trials ran.
pub fn summarize(
    league: &PreparedLeague,
    tally: &TrialTally,
    scenarios: &[Scenarios],
) -> Vec<ProbabilityResult> {
    let n = league.team_count();
    if tally.trials == 0 || n == 0 {
        return Vec::new();
    }
    let trials = tally.trials;

    league
        .teams
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let scenario = scenarios.get(i).cloned().unwrap_or_default();
            ProbabilityResult {
                team_id: team.team_id.clone(),
                team_name: team.team_name.clone(),
                playoff_probability: percent(tally.playoff[i], trials),
                championship_probability: percent(tally.championship[i], trials),
                projected_wins: tally.wins[i] as f64 / trials as f64,
                projected_losses: tally.losses[i] as f64 / trials as f64,
                projected_points_for: tally.points_for[i] / trials as f64,
                current_record: team.record(),
                clinch_scenarios: scenario.clinch,
                elimination_scenarios: scenario.elimination,
                seed_probabilities: tally.seeds[i * n..(i + 1) * n]
                    .iter()
                    .map(|&c| percent(c, trials))
                    .collect(),
            }
        })
        .collect()
}
