use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SimError};

/// Uniform draws in `[0, 1)`. Implementations may fail; a failure aborts
/// the whole simulation batch.
pub trait RandomSource {
    fn next_unit(&mut self) -> Result<f64>;
}

/// Hands each shard of trials its own private source.
pub trait SourceFactory: Sync {
    type Source: RandomSource;

    fn for_shard(&self, shard: usize) -> Self::Source;
}

impl<F, S> SourceFactory for F
where
    F: Fn(usize) -> S + Sync,
    S: RandomSource,
{
    type Source = S;

    fn for_shard(&self, shard: usize) -> S {
        self(shard)
    }
}

#[derive(Debug, Clone)]
pub struct ChaChaSource(ChaCha8Rng);

impl ChaChaSource {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for ChaChaSource {
    fn next_unit(&mut self) -> Result<f64> {
        Ok(self.0.gen_range(0.0..1.0))
    }
}

/// One ChaCha stream per shard, all derived from a single base seed. Without
/// a seed each shard is seeded from entropy whenever a run asks for it.
#[derive(Debug, Clone, Copy)]
pub struct SeededStreams {
    seed: Option<u64>,
}

impl SeededStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { seed: None }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl SourceFactory for SeededStreams {
    type Source = ChaChaSource;

    fn for_shard(&self, shard: usize) -> ChaChaSource {
        let Some(seed) = self.seed else {
            return ChaChaSource::seeded(rand::random());
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(shard as u64);
        ChaChaSource(rng)
    }
}

/// Pulls one draw and rejects anything outside `[0, 1)`.
pub(crate) fn draw<R: RandomSource>(source: &mut R) -> Result<f64> {
    let u = source.next_unit()?;
    if !(0.0..1.0).contains(&u) {
        return Err(SimError::RandomSource {
            message: format!("draw {u} is outside [0, 1)"),
        });
    }
    Ok(u)
}
