use std::env;

use crate::state::DEFAULT_SIMULATION_COUNT;
use crate::win_prob::StrengthModel;

const DEFAULT_SHARDS: usize = 16;
const MAX_SIMULATIONS: usize = 1_000_000;

/// Engine tuning. Build it with [`EngineConfig::from_env`] in binaries, or
/// start from `Default` and override fields directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub simulation_count: usize,
    pub seed: Option<u64>,
    /// Worker threads in the simulation pool.
    pub parallelism: usize,
    /// Fixed number of trial batches, each with its own random stream.
    /// Results for a given seed depend on this, not on `parallelism`.
    pub shards: usize,
    pub model: StrengthModel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulation_count: DEFAULT_SIMULATION_COUNT,
            seed: None,
            parallelism: default_parallelism(),
            shards: DEFAULT_SHARDS,
            model: StrengthModel::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let model = StrengthModel {
            k: parse_var(&lookup, "SIM_LOGISTIC_K")
                .unwrap_or(defaults.model.k)
                .clamp(0.1, 20.0),
            points_weight: parse_var(&lookup, "SIM_POINTS_WEIGHT")
                .unwrap_or(defaults.model.points_weight)
                .clamp(0.0, 5.0),
        };
        Self {
            simulation_count: parse_var(&lookup, "SIM_COUNT")
                .unwrap_or(defaults.simulation_count)
                .min(MAX_SIMULATIONS),
            seed: parse_var(&lookup, "SIM_SEED"),
            parallelism: parse_var(&lookup, "SIM_PARALLELISM")
                .unwrap_or(defaults.parallelism)
                .clamp(1, 64),
            shards: parse_var(&lookup, "SIM_SHARDS")
                .unwrap_or(defaults.shards)
                .clamp(1, 256),
            model,
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|val| val.trim().parse::<T>().ok())
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(1, 64)
}
