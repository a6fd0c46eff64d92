//! Simulated annealing over crate placements.
//!
//! Each iteration moves one crate, scores the move, and accepts it with the
//! Metropolis rule. Temperature decays geometrically until it reaches the
//! configured floor; the best solution seen is returned.

use rand::Rng;

use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::generator::SolutionGenerator;
use crate::instruction::Solution;

/// Configuration for the annealing loop.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Fraction of the temperature removed each iteration.
    pub cooling_rate: f64,
    /// The loop runs while the temperature is above this value.
    pub min_temperature: f64,
    /// Sampling attempts per crate before giving up.
    pub max_attempts: usize,
    /// Fresh construction passes allowed after one strands a crate.
    pub max_restarts: usize,
    /// Return as soon as the best solution has zero energy.
    pub stop_at_zero_energy: bool,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.003,
            min_temperature: 1.0,
            max_attempts: 100_000,
            max_restarts: 100,
            stop_at_zero_energy: false,
        }
    }
}

impl AnnealingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, temperature: f64) -> Self {
        self.min_temperature = temperature;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }

    pub fn with_stop_at_zero_energy(mut self, stop: bool) -> Self {
        self.stop_at_zero_energy = stop;
        self
    }

    /// Checks that the schedule terminates and sampling is bounded.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(Error::invalid(format!(
                "initial temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(Error::invalid(format!(
                "minimum temperature must be positive and finite, got {}",
                self.min_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::invalid(format!(
                "cooling rate must lie in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        // rates below f64 precision leave the temperature unchanged
        if 1.0 - self.cooling_rate >= 1.0 {
            return Err(Error::invalid(format!(
                "cooling rate {} is too small to lower the temperature",
                self.cooling_rate
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::invalid("max attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Counters collected over one annealing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnealingStats {
    pub iterations: u64,
    pub accepted_moves: u64,
    /// Times the best solution was replaced.
    pub improvements: u64,
    pub final_temperature: f64,
    pub initial_energy: u64,
    pub best_energy: u64,
}

/// Probability of moving from a solution of `current_energy` to one of
/// `new_energy` at `temperature`.
///
/// Improvements are always taken; ties and worsening moves are taken with
/// probability `exp((current - new) / temperature)`.
#[inline]
pub fn acceptance_probability(current_energy: u64, new_energy: u64, temperature: f64) -> f64 {
    if new_energy < current_energy {
        return 1.0;
    }
    ((current_energy as f64 - new_energy as f64) / temperature).exp()
}

/// Drives the annealing loop for one loading problem.
pub struct Annealer<'a> {
    evaluator: &'a Evaluator,
    generator: SolutionGenerator<'a>,
    config: AnnealingConfig,
}

impl<'a> Annealer<'a> {
    /// Creates an annealer after validating the configuration.
    pub fn new(evaluator: &'a Evaluator, config: AnnealingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            evaluator,
            generator: SolutionGenerator::new(evaluator, config.max_attempts)
                .with_max_restarts(config.max_restarts),
            config,
        })
    }

    pub fn generator(&self) -> &SolutionGenerator<'a> {
        &self.generator
    }

    /// Anneals from `initial` and returns the best solution seen.
    ///
    /// The returned solution never has more energy than `initial`.
    pub fn anneal<R: Rng + ?Sized>(
        &self,
        initial: Solution,
        rng: &mut R,
    ) -> Result<(Solution, AnnealingStats)> {
        let initial_energy = self.evaluator.energy(&initial)?;
        let mut stats = AnnealingStats {
            initial_energy,
            best_energy: initial_energy,
            ..AnnealingStats::default()
        };

        let mut temperature = self.config.initial_temperature;
        let mut current = initial.clone();
        let mut current_energy = initial_energy;
        let mut best = initial;
        let mut best_energy = initial_energy;

        while temperature > self.config.min_temperature {
            if self.config.stop_at_zero_energy && best_energy == 0 {
                tracing::debug!("Best energy reached zero after {} iterations", stats.iterations);
                break;
            }

            let candidate = self.generator.neighbor(&current, rng)?;
            let candidate_energy = self.evaluator.energy(&candidate)?;

            let energy_before = current_energy;
            let accept = acceptance_probability(current_energy, candidate_energy, temperature)
                > rng.gen::<f64>();
            if candidate_energy < best_energy {
                best = candidate.clone();
                best_energy = candidate_energy;
                stats.improvements += 1;
            }
            if accept {
                current = candidate;
                current_energy = candidate_energy;
                stats.accepted_moves += 1;
            }

            temperature *= 1.0 - self.config.cooling_rate;
            stats.iterations += 1;
            tracing::debug!(
                "Temperature: {:.2}, Current Energy: {}, Best Energy: {}",
                temperature,
                energy_before,
                best_energy
            );
        }

        stats.final_temperature = temperature;
        stats.best_energy = best_energy;
        tracing::info!(
            "Annealing finished after {} iterations: energy {} -> {}, {} moves accepted",
            stats.iterations,
            stats.initial_energy,
            stats.best_energy,
            stats.accepted_moves
        );

        Ok((best, stats))
    }
}
