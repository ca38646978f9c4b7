//! The brain engine and its cycle driver
//!
//! A run is one initial task attempt followed by a fixed number of ticks.
//! Each tick evaluates the behavior triggers in order, records a memory of
//! the current task, forgets, drains energy and checks for forced sleep.

use serde::{Deserialize, Serialize};

use crate::brain::events::{ActivityLog, BrainEvent};
use crate::brain::lifecycle::TaskOutcome;
use crate::brain::memory::Note;
use crate::brain::output::SimulationSummary;
use crate::brain::random::{RandomSource, SeededRandom};
use crate::brain::state::BrainState;
use crate::brain::triggers::Trigger;
use crate::core::config::BrainConfig;
use crate::core::error::Result;
use crate::core::types::{task_or_none, TaskId, Tick};

/// Counters accumulated over a run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub ticks: Tick,
    pub attempts: usize,
    pub hyperfocus_episodes: usize,
    pub deprivation_episodes: usize,
    pub forced_sleeps: usize,
    pub abandoned_chains: usize,
    pub longest_chain: usize,
}

/// Snapshot handed to the observer after every tick
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub current_task: Option<TaskId>,
    pub energy: i32,
    pub memory_len: usize,
    pub switch_probability: f64,
    pub completed: usize,
    pub interrupted: usize,
}

/// The simulation engine: configuration, state, randomness and history
pub struct Brain<R: RandomSource = SeededRandom> {
    pub config: BrainConfig,
    pub state: BrainState,
    pub log: ActivityLog,
    pub(crate) rng: R,
    pub(crate) tick: Tick,
    pub(crate) stats: RunStats,
}

impl Brain<SeededRandom> {
    /// Build a brain seeded from `config.run.seed`, or from entropy if unset
    pub fn new(config: BrainConfig) -> Result<Self> {
        let rng = match config.run.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Self::with_random(config, rng)
    }
}

impl<R: RandomSource> Brain<R> {
    /// Build a brain drawing every roll from `rng`
    pub fn with_random(config: BrainConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let state = BrainState::new(&config);

        Ok(Self {
            config,
            state,
            log: ActivityLog::new(),
            rng,
            tick: 0,
            stats: RunStats::default(),
        })
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Run a full simulation and summarize it
    pub fn run(&mut self) -> Result<SimulationSummary> {
        self.run_with(|_| {})
    }

    /// Run a full simulation, calling `observer` after every tick
    ///
    /// The observer is where interactive callers add real-time pacing; the
    /// engine itself only advances its logical clock.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<SimulationSummary>
    where
        F: FnMut(&TickReport),
    {
        tracing::info!(
            "Brain simulation starting: {} ticks, switch probability {:.2}",
            self.config.run.ticks,
            self.state.switch_probability()
        );

        self.start()?;
        for _ in 0..self.config.run.ticks {
            let report = self.step()?;
            observer(&report);
        }

        let summary = self.summary();
        tracing::info!(
            "Brain simulation finished: {} completed, {} interrupted, energy {}",
            summary.completed_tasks.len(),
            summary.interrupted_tasks.len(),
            summary.final_energy
        );
        Ok(summary)
    }

    /// Pick the initial task, attend to it and perform it once
    pub fn start(&mut self) -> Result<TaskOutcome> {
        let initial = self.random_task();
        self.state.current_task = Some(initial);
        tracing::info!("Initial task: {}", initial);
        self.perform_task(initial)
    }

    /// Advance one tick
    pub fn step(&mut self) -> Result<TickReport> {
        self.tick += 1;
        self.stats.ticks = self.tick;

        for trigger in Trigger::TICK_ORDER {
            self.fire(trigger)?;
        }

        let note = Note::new(format!(
            "Task performed: {}",
            task_or_none(self.state.current_task)
        ));
        self.remember(note);
        self.forget_recent();

        self.state.energy -= self.config.run.energy_drain;
        self.record(BrainEvent::EnergyDrained {
            energy: self.state.energy,
        });
        tracing::debug!("Energy drained to {}", self.state.energy);

        self.fire(Trigger::Sleep)?;

        Ok(TickReport {
            tick: self.tick,
            current_task: self.state.current_task,
            energy: self.state.energy,
            memory_len: self.state.memory.len(),
            switch_probability: self.state.switch_probability(),
            completed: self.state.completed_tasks.len(),
            interrupted: self.state.interrupted_tasks.len(),
        })
    }

    /// Store a note; the memory container evicts the oldest on overflow
    pub fn remember(&mut self, note: Note) {
        tracing::debug!("Remembering: {}", note);
        self.record(BrainEvent::Remembered {
            note: note.0.clone(),
        });
        if let Some(evicted) = self.state.memory.remember(note) {
            tracing::debug!("Memory full, lost: {}", evicted);
            self.record(BrainEvent::Evicted { note: evicted.0 });
        }
    }

    /// Drop the newest note if memory holds more than the forget threshold
    pub fn forget_recent(&mut self) {
        if let Some(forgotten) = self
            .state
            .memory
            .forget_recent(self.config.run.forget_threshold)
        {
            tracing::debug!("Forgot: {}", forgotten);
            self.record(BrainEvent::Forgot { note: forgotten.0 });
        }
    }

    /// Summary of the run so far
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::new(&self.state, &self.stats, &self.log, self.rng.seed())
    }

    pub(crate) fn random_task(&mut self) -> TaskId {
        TaskId::ALL[self.rng.pick(TaskId::ALL.len())]
    }

    pub(crate) fn record(&mut self, event: BrainEvent) {
        self.log.record(event, self.tick, self.state.clock);
    }
}

/// Build a brain from `config` and run it to completion
pub fn run_brain_simulation(config: BrainConfig) -> Result<SimulationSummary> {
    let mut brain = Brain::new(config)?;
    brain.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::random::{FixedRandom, ScriptedRandom};

    fn calm_config() -> BrainConfig {
        BrainConfig::default()
    }

    #[test]
    fn test_quiet_run_drains_ten_per_tick() {
        // 0.99 never opens a `<` gate and opens every `>` gate below it, so
        // disable those by pushing the thresholds to 1.0.
        let mut config = calm_config();
        config.traits.impulsivity_threshold = 1.0;
        config.run.distraction_threshold = 1.0;
        config.run.ticks = 5;
        let mut brain = Brain::with_random(config, FixedRandom(0.99)).unwrap();

        brain.start().unwrap();
        let mut energies = Vec::new();
        for _ in 0..5 {
            energies.push(brain.step().unwrap().energy);
        }

        assert_eq!(energies, vec![90, 80, 70, 60, 50]);
        assert!(brain.state.interrupted_tasks.is_empty());
        assert_eq!(brain.state.completed_tasks.len(), 1);
    }

    #[test]
    fn test_forced_sleep_resets_energy() {
        let mut config = calm_config();
        config.traits.impulsivity_threshold = 1.0;
        config.run.distraction_threshold = 1.0;
        config.run.initial_energy = 25;
        config.traits.sleep_deprivation_threshold = 10;
        let mut brain = Brain::with_random(config, FixedRandom(0.99)).unwrap();
        brain.start().unwrap();
        let initial = brain.state.current_task;

        // 25 -> 15 triggers the sleep check on this very tick
        let report = brain.step().unwrap();
        assert_eq!(report.energy, 100);
        // a forced sleep is performed without taking over attention
        assert_eq!(report.current_task, initial);
        assert_eq!(brain.stats().forced_sleeps, 1);
        assert_eq!(brain.state.completed_tasks.last(), Some(&TaskId::Sleep));
    }

    #[test]
    fn test_memory_note_names_current_task() {
        let mut config = calm_config();
        config.traits.impulsivity_threshold = 1.0;
        config.run.distraction_threshold = 1.0;
        // pick roll for the initial task selects Code (index 2)
        let rng = ScriptedRandom::new([ScriptedRandom::pick_roll(2, 8)], 0.99);
        let mut brain = Brain::with_random(config, rng).unwrap();
        brain.start().unwrap();
        brain.step().unwrap();

        let notes: Vec<_> = brain.state.memory.iter().map(|n| n.as_str().to_string()).collect();
        assert_eq!(notes, vec!["Task performed: Code".to_string()]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = calm_config();
        config.traits.max_memory_size = 0;
        assert!(Brain::with_random(config, FixedRandom(0.5)).is_err());
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let mut config = calm_config();
        config.run.seed = Some(3);
        config.run.ticks = 4;
        let mut brain = Brain::new(config).unwrap();
        let mut ticks = Vec::new();
        brain.run_with(|report| ticks.push(report.tick)).unwrap();
        assert_eq!(ticks, vec![1, 2, 3, 4]);
    }
}
