//! Monte-Carlo cross-check of the analytical DPS
//!
//! Rolls every use of the skill: hit or miss, the per-channel damage roll and
//! the critical hit. Runs outside the engine, which never touches an RNG.

use build_core::damage::CalculationResult;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Simulated fight length
    pub seconds: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seconds: 600.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub seconds: f64,
    pub uses: u64,
    pub hits: u64,
    pub crits: u64,
    pub total_damage: f64,
    /// Hit DPS observed in the samples
    pub sampled_dps: f64,
    /// Hit DPS the engine computed
    pub analytical_dps: f64,
}

impl SimulationReport {
    /// Relative gap between sampled and analytical DPS
    pub fn deviation(&self) -> f64 {
        if self.analytical_dps <= 0.0 {
            return 0.0;
        }
        (self.sampled_dps - self.analytical_dps).abs() / self.analytical_dps
    }
}

/// Sample the skill over `config.seconds` of continuous use
pub fn simulate(result: &CalculationResult, config: &SimulationConfig) -> SimulationReport {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let uses = (config.seconds * result.uses_per_second).round().max(0.0) as u64;

    let mut hits = 0;
    let mut crits = 0;
    let mut total_damage = 0.0;
    for _ in 0..uses {
        if rng.gen::<f64>() * 100.0 >= result.hit_chance {
            continue;
        }
        hits += 1;

        let mut damage: f64 = result
            .details
            .channels
            .iter()
            .filter(|channel| channel.max_damage > 0.0)
            .map(|channel| {
                if channel.max_damage > channel.min_damage {
                    rng.gen_range(channel.min_damage..=channel.max_damage)
                } else {
                    channel.max_damage
                }
            })
            .sum();

        if rng.gen::<f64>() * 100.0 < result.crit_chance {
            crits += 1;
            damage *= result.crit_multiplier / 100.0;
        }
        total_damage += damage;
    }

    // Measure over the time the sampled uses actually took
    let elapsed = if result.uses_per_second > 0.0 {
        uses as f64 / result.uses_per_second
    } else {
        config.seconds
    };
    let sampled_dps = if elapsed > 0.0 { total_damage / elapsed } else { 0.0 };

    SimulationReport {
        seed: config.seed,
        seconds: config.seconds,
        uses,
        hits,
        crits,
        total_damage,
        sampled_dps,
        analytical_dps: result.total_dps,
    }
}
