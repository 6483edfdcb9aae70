pub mod aggregate;
pub mod config;
pub mod error;
pub mod rng;
pub mod sample_league;
pub mod scenarios;
pub mod schedule;
pub mod simulator;
pub mod standings;
pub mod state;
pub mod win_prob;

pub use error::SimError;
pub use simulator::{SimulationEngine, simulate};
pub use state::{
    LeagueSimulationSettings, ProbabilityResult, SimulationOptions, TeamSeasonState, TrialOutcome,
};
