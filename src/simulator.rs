use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregate::{self, TrialTally};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::rng::{self, RandomSource, SeededStreams, SourceFactory};
use crate::scenarios;
use crate::schedule::{self, Matchup};
use crate::standings::rank_order;
use crate::state::{
    LeagueSimulationSettings, ProbabilityResult, SimulationOptions, TeamSeasonState, TrialOutcome,
    validate_teams,
};
use crate::win_prob::TeamRating;

// Simulated weekly score spread around a team's scoring average.
const POINT_SPREAD: f64 = 0.25;

/// Validated league with schedules filled in, ready for trials.
#[derive(Debug, Clone)]
pub struct PreparedLeague {
    pub settings: LeagueSimulationSettings,
    pub teams: Vec<TeamSeasonState>,
    pub matchups: Vec<Matchup>,
    pub ratings: Vec<TeamRating>,
}

impl PreparedLeague {
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

pub struct SimulationEngine<F> {
    config: EngineConfig,
    factory: F,
}

impl SimulationEngine<SeededStreams> {
    /// ChaCha streams from `config.seed`. When unset, every run draws fresh
    /// entropy, so repeated `simulate` calls differ.
    pub fn seeded(config: EngineConfig) -> Self {
        let factory = match config.seed {
            Some(seed) => SeededStreams::new(seed),
            None => SeededStreams::from_entropy(),
        };
        Self::new(config, factory)
    }
}

impl<F: SourceFactory> SimulationEngine<F> {
    pub fn new(config: EngineConfig, factory: F) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn prepare(
        &self,
        teams: &[TeamSeasonState],
        settings: &LeagueSimulationSettings,
    ) -> Result<PreparedLeague> {
        settings.validate(teams.len())?;
        validate_teams(teams, settings)?;

        let teams = schedule::fill_missing_schedules(teams, settings);
        let matchups = schedule::build_matchups(&teams);
        let ratings = self.config.model.rate_league(&teams);
        Ok(PreparedLeague {
            settings: *settings,
            teams,
            matchups,
            ratings,
        })
    }

    /// Runs every trial and reduces them to one result per team. No teams or
    /// zero trials yields an empty list; bad settings fail before any trial.
    pub fn simulate(
        &self,
        teams: &[TeamSeasonState],
        settings: &LeagueSimulationSettings,
    ) -> Result<Vec<ProbabilityResult>> {
        if teams.is_empty() {
            return Ok(Vec::new());
        }
        let league = self.prepare(teams, settings)?;
        let count = self.config.simulation_count;
        if count == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let tally = self.run_trials(&league, count)?;
        let scenarios = scenarios::league_scenarios(
            &league.teams,
            &league.matchups,
            league.settings.playoff_spots,
        );
        let results = aggregate::summarize(&league, &tally, &scenarios);

        info!(
            teams = league.team_count(),
            games = league.matchups.len(),
            trials = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "playoff simulation finished"
        );
        Ok(results)
    }

    /// Splits `count` trials into shards, runs them on the pool and sums the
    /// tallies in shard order. Any shard error fails the whole batch.
    pub fn run_trials(&self, league: &PreparedLeague, count: usize) -> Result<TrialTally> {
        let shards = self.config.shards.clamp(1, count.max(1));
        let base = count / shards;
        let extra = count % shards;

        let partials = with_pool(self.config.parallelism, || {
            (0..shards)
                .into_par_iter()
                .map(|shard| {
                    let trials = base + usize::from(shard < extra);
                    self.run_shard(league, shard, trials)
                })
                .collect::<Result<Vec<TrialTally>>>()
        })?;

        let mut total = TrialTally::new(league.team_count());
        for part in &partials {
            total.merge(part);
        }
        Ok(total)
    }

    fn run_shard(&self, league: &PreparedLeague, shard: usize, trials: usize) -> Result<TrialTally> {
        let mut source = self.factory.for_shard(shard);
        let mut tally = TrialTally::new(league.team_count());
        for _ in 0..trials {
            let outcome = self.run_trial(league, &mut source)?;
            tally.record(&outcome, league.settings.playoff_spots as usize);
        }
        debug!(shard, trials, "shard complete");
        Ok(tally)
    }

    /// Plays out one season from the current standings. Each game takes one
    /// draw for the result and one per settled team for its score.
    pub fn run_trial<R: RandomSource>(
        &self,
        league: &PreparedLeague,
        source: &mut R,
    ) -> Result<TrialOutcome> {
        let model = &self.config.model;
        let mut wins: Vec<u32> = league.teams.iter().map(|t| t.wins).collect();
        let mut losses: Vec<u32> = league.teams.iter().map(|t| t.losses).collect();
        let ties: Vec<u32> = league.teams.iter().map(|t| t.ties).collect();
        let mut points: Vec<f64> = league.teams.iter().map(|t| t.points_for).collect();

        for m in &league.matchups {
            let home = &league.ratings[m.home];
            let away = &league.ratings[m.away];
            let home_won = rng::draw(source)? < model.game_win_prob(home, away);

            let sides = [(m.home, home, home_won), (m.away, away, !home_won)];
            let settled = if m.mutual { &sides[..] } else { &sides[..1] };
            for &(idx, rating, won) in settled {
                if won {
                    wins[idx] += 1;
                } else {
                    losses[idx] += 1;
                }
                let u = rng::draw(source)?;
                points[idx] += rating.points_per_game * (1.0 - POINT_SPREAD + 2.0 * POINT_SPREAD * u);
            }
        }

        let order = rank_order(&wins, &losses, &ties, &points);
        Ok(TrialOutcome {
            wins,
            losses,
            ties,
            points_for: points,
            order,
        })
    }
}

fn with_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(err) => {
            warn!(%err, "simulation pool unavailable, running on the global pool");
            action()
        }
    }
}

/// Library entry point: seeded ChaCha streams when `random_seed` is set,
/// otherwise a fresh seed per call.
pub fn simulate(
    teams: &[TeamSeasonState],
    settings: &LeagueSimulationSettings,
    options: &SimulationOptions,
) -> Result<Vec<ProbabilityResult>> {
    let config = EngineConfig {
        simulation_count: options.simulation_count,
        seed: options.random_seed,
        ..EngineConfig::default()
    };
    SimulationEngine::seeded(config).simulate(teams, settings)
}
