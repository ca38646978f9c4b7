//! Brain configuration with documented constants
//!
//! All magic numbers of the simulation are collected here with explanations
//! of their purpose and how they interact with each other.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{BrainError, Result};
use crate::core::types::TaskId;

/// Top-level configuration: personality traits plus run pacing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub traits: TraitParameters,
    pub run: RunParameters,
}

/// Personality traits, fixed at construction
///
/// `switch_probability` is only the starting value: the brain keeps a
/// runtime copy in its state that compounds under sleep deprivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitParameters {
    /// Capacity of working memory (notes)
    ///
    /// Once full, every new note evicts the oldest one.
    pub max_memory_size: usize,

    /// Starting probability of abandoning the current task
    ///
    /// Used both by the per-tick switch trigger and by every
    /// interruption roll inside a task attempt.
    pub switch_probability: f64,

    /// Rolls above this value fire an impulsive switch
    ///
    /// At 0.7, roughly 30% of ticks contain an impulsive action.
    pub impulsivity_threshold: f64,

    /// Probability that a task attempt opens with an uninterruptible focus period
    pub hyperfocus_chance: f64,

    /// Energy below this level counts as sleep deprived
    ///
    /// Every task attempt started while deprived multiplies the switch
    /// probability by `RunParameters::switch_growth`.
    pub sleep_deprivation_threshold: i32,

    /// Probability per tick that the addiction task takes over
    pub addiction_probability: f64,

    /// The task addiction forces
    pub addiction_task: TaskId,
}

impl Default for TraitParameters {
    fn default() -> Self {
        Self {
            max_memory_size: 10,
            switch_probability: 0.5,
            impulsivity_threshold: 0.7,
            hyperfocus_chance: 0.2,
            sleep_deprivation_threshold: 40,
            addiction_probability: 0.3,
            addiction_task: TaskId::SocialMedia,
        }
    }
}

/// Run pacing and the fixed constants of the cycle driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    // === CYCLE DRIVER ===
    /// Number of ticks in one run (a "day" in the brain)
    pub ticks: u64,

    /// Time units a task needs without interruption to complete
    pub task_duration: u64,

    /// Length of a hyperfocus period in time units
    pub hyperfocus_duration: u64,

    /// When true, the hyperfocus period counts toward `task_duration`
    ///
    /// With the default (false) a hyperfocused attempt still has to survive
    /// the full interruption loop afterwards.
    pub hyperfocus_completes_task: bool,

    // === ENERGY ===
    /// Energy at the start of a run
    pub initial_energy: i32,

    /// Energy lost at the end of every tick
    ///
    /// At 10 per tick from 100, deprivation (< 40) begins after tick 7
    /// and the forced sleep (< 20) fires on tick 9.
    pub energy_drain: i32,

    /// Energy below this level forces the Sleep task
    pub critical_energy: i32,

    /// Energy restored after a forced sleep
    pub rested_energy: i32,

    // === DISTRACTION & MEMORY ===
    /// Rolls above this value pull attention to external stimuli
    pub distraction_threshold: f64,

    /// Working memory larger than this drops its newest note each tick
    pub forget_threshold: usize,

    // === SLEEP DEPRIVATION ===
    /// Factor applied to the switch probability per deprived attempt
    pub switch_growth: f64,

    /// Optional ceiling for the compounded switch probability
    ///
    /// None keeps growth unbounded. Any cap below 1.0 guarantees that
    /// interruption chains terminate on their own.
    pub switch_probability_cap: Option<f64>,

    // === INTERRUPTION CHAINS ===
    /// Optional limit on attempts in one interruption chain
    ///
    /// None lets a chain run until an attempt completes. A chain is always
    /// abandoned once the switch probability reaches 1.0, since every roll
    /// then interrupts and no attempt can complete.
    pub max_interruption_chain: Option<usize>,

    /// Return an error instead of abandoning an exhausted chain
    pub fail_on_exhausted_chain: bool,

    // === RANDOMNESS ===
    /// Seed for the deterministic RNG; None draws one from entropy
    pub seed: Option<u64>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            ticks: 10,
            task_duration: 5,
            hyperfocus_duration: 5,
            hyperfocus_completes_task: false,

            initial_energy: 100,
            energy_drain: 10,
            critical_energy: 20,
            rested_energy: 100,

            distraction_threshold: 0.5,
            forget_threshold: 5,

            switch_growth: 1.5,
            switch_probability_cap: None,

            max_interruption_chain: None,
            fail_on_exhausted_chain: false,

            seed: None,
        }
    }
}

impl BrainConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BrainConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let traits = &self.traits;
        let run = &self.run;

        if traits.max_memory_size == 0 {
            return Err(BrainError::InvalidConfig(
                "max_memory_size must be greater than 0".into(),
            ));
        }

        let probabilities = [
            ("switch_probability", traits.switch_probability),
            ("impulsivity_threshold", traits.impulsivity_threshold),
            ("hyperfocus_chance", traits.hyperfocus_chance),
            ("addiction_probability", traits.addiction_probability),
            ("distraction_threshold", run.distraction_threshold),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(BrainError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, value
                )));
            }
        }

        if run.task_duration == 0 {
            return Err(BrainError::InvalidConfig(
                "task_duration must be greater than 0".into(),
            ));
        }

        if run.switch_growth < 1.0 {
            return Err(BrainError::InvalidConfig(format!(
                "switch_growth ({}) must be >= 1.0",
                run.switch_growth
            )));
        }

        if let Some(cap) = run.switch_probability_cap {
            if !(0.0..=1.0).contains(&cap) {
                return Err(BrainError::InvalidConfig(format!(
                    "switch_probability_cap ({}) must be within [0, 1]",
                    cap
                )));
            }
        }

        if run.max_interruption_chain == Some(0) {
            return Err(BrainError::InvalidConfig(
                "max_interruption_chain must be greater than 0".into(),
            ));
        }

        if run.critical_energy > traits.sleep_deprivation_threshold {
            tracing::warn!(
                "critical_energy ({}) is above sleep_deprivation_threshold ({}); deprivation will never apply",
                run.critical_energy,
                traits.sleep_deprivation_threshold
            );
        }

        Ok(())
    }
}
