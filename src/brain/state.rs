//! BrainState - the single mutable state container of a run

use serde::{Deserialize, Serialize};

use crate::brain::memory::WorkingMemory;
use crate::core::config::BrainConfig;
use crate::core::types::{TaskId, TimeUnits};

/// Everything the brain mutates while it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainState {
    /// Task presently being attended to
    pub current_task: Option<TaskId>,
    /// Conceptually 0..=100; decrements are not clamped
    pub energy: i32,
    /// Bounded notes, oldest first
    pub memory: WorkingMemory,
    /// Append-only log of completed attempts
    pub completed_tasks: Vec<TaskId>,
    /// Append-only log of interrupted tasks; None if nothing was assigned yet
    pub interrupted_tasks: Vec<Option<TaskId>>,
    /// Runtime switch probability, compounded by sleep deprivation
    switch_probability: f64,
    /// Logical time units spent on focus and hyperfocus
    pub clock: TimeUnits,
}

impl BrainState {
    pub fn new(config: &BrainConfig) -> Self {
        Self {
            current_task: None,
            energy: config.run.initial_energy,
            memory: WorkingMemory::new(config.traits.max_memory_size),
            completed_tasks: Vec::new(),
            interrupted_tasks: Vec::new(),
            switch_probability: config.traits.switch_probability,
            clock: 0,
        }
    }

    pub fn switch_probability(&self) -> f64 {
        self.switch_probability
    }

    /// Multiply the switch probability by `growth`, optionally capped
    ///
    /// Returns the new value. The effect persists for the rest of the run.
    pub fn compound_switch_probability(&mut self, growth: f64, cap: Option<f64>) -> f64 {
        let grown = self.switch_probability * growth;
        self.switch_probability = match cap {
            Some(cap) => grown.min(cap.max(self.switch_probability)),
            None => grown,
        };
        self.switch_probability
    }

    pub fn is_sleep_deprived(&self, threshold: i32) -> bool {
        self.energy < threshold
    }

    /// Log the current task as interrupted without moving attention
    pub fn interrupt_current(&mut self) -> Option<TaskId> {
        let previous = self.current_task;
        self.interrupted_tasks.push(previous);
        previous
    }

    /// Log the current task as interrupted and move attention to `next`
    ///
    /// Returns the task that was displaced.
    pub fn redirect(&mut self, next: TaskId) -> Option<TaskId> {
        let previous = self.interrupt_current();
        self.current_task = Some(next);
        previous
    }
}
