//! Common test utilities for stepwise-algorithms tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stepwise_algorithms::AlgorithmRegistry;
use stepwise_core::testing::TestHarness;
use stepwise_core::{RunInput, RunOutcome};

/// Resolve `name` in the standard registry, validate `input` and run it to
/// completion against a fresh harness.
#[allow(dead_code)]
pub async fn run(name: &str, input: RunInput) -> (RunOutcome, TestHarness) {
    let registry = AlgorithmRegistry::standard();
    let algorithm = registry.get(name).expect("algorithm is registered");
    algorithm.validate(&input).expect("input is valid");

    let harness = TestHarness::new();
    let outcome = algorithm
        .run(&harness.ctx, input)
        .await
        .expect("run completes");
    (outcome, harness)
}

/// Seeded values in `-range..range`; the same seed gives the same values.
#[allow(dead_code)]
pub fn scrambled(len: usize, seed: u64, range: i64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-range..range)).collect()
}
