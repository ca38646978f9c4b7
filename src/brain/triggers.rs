//! Behavior triggers evaluated once per tick
//!
//! A trigger that fires logs the current task as interrupted and hands its
//! target to the task lifecycle. Only Switch and Impulsive also move
//! attention to the target; the others leave `current_task` alone unless
//! the lifecycle itself is interrupted. Triggers never complete tasks
//! themselves.

use serde::{Deserialize, Serialize};

use crate::brain::events::BrainEvent;
use crate::brain::lifecycle::TaskOutcome;
use crate::brain::random::RandomSource;
use crate::brain::simulation::Brain;
use crate::core::error::Result;
use crate::core::types::{task_or_none, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// `roll < switch_probability`, random target
    Switch,
    /// `roll > impulsivity_threshold`, random target
    Impulsive,
    /// `roll > distraction_threshold`, random target
    Distraction,
    /// `roll < addiction_probability`, always the addiction task
    Addiction,
    /// `energy < critical_energy`, always Sleep, then energy is restored
    Sleep,
}

impl Trigger {
    /// Triggers evaluated before the memory step of each tick, in order
    pub const TICK_ORDER: [Trigger; 4] = [
        Trigger::Switch,
        Trigger::Impulsive,
        Trigger::Distraction,
        Trigger::Addiction,
    ];

    /// Whether the target is drawn at random rather than fixed
    pub fn picks_random_task(&self) -> bool {
        matches!(self, Trigger::Switch | Trigger::Impulsive | Trigger::Distraction)
    }

    /// Whether firing makes the target the current task
    pub fn moves_attention(&self) -> bool {
        matches!(self, Trigger::Switch | Trigger::Impulsive)
    }
}

impl<R: RandomSource> Brain<R> {
    /// Evaluate one trigger; returns the lifecycle outcome if it fired
    pub fn fire(&mut self, trigger: Trigger) -> Result<Option<TaskOutcome>> {
        if !self.gate_open(trigger) {
            return Ok(None);
        }

        let target = self.target_for(trigger);
        let from = if trigger.moves_attention() {
            self.state.redirect(target)
        } else {
            self.state.interrupt_current()
        };
        self.narrate(trigger, from, target);
        self.record(BrainEvent::TriggerFired {
            trigger,
            from,
            to: target,
        });

        let outcome = self.perform_task(target)?;

        if trigger == Trigger::Sleep {
            self.state.energy = self.config.run.rested_energy;
            self.stats.forced_sleeps += 1;
            self.record(BrainEvent::EnergyRestored {
                energy: self.state.energy,
            });
            tracing::debug!("Slept; energy restored to {}", self.state.energy);
        }

        Ok(Some(outcome))
    }

    /// Probability gate (or energy check) for `trigger`
    fn gate_open(&mut self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Switch => self.rng.roll() < self.state.switch_probability(),
            Trigger::Impulsive => self.rng.roll() > self.config.traits.impulsivity_threshold,
            Trigger::Distraction => self.rng.roll() > self.config.run.distraction_threshold,
            Trigger::Addiction => self.rng.roll() < self.config.traits.addiction_probability,
            Trigger::Sleep => self.state.energy < self.config.run.critical_energy,
        }
    }

    fn target_for(&mut self, trigger: Trigger) -> TaskId {
        if trigger.picks_random_task() {
            return self.random_task();
        }
        match trigger {
            Trigger::Addiction => self.config.traits.addiction_task,
            _ => TaskId::Sleep,
        }
    }

    fn narrate(&self, trigger: Trigger, from: Option<TaskId>, to: TaskId) {
        match trigger {
            Trigger::Switch => {
                tracing::debug!("Switching from {} to {}", task_or_none(from), to)
            }
            Trigger::Impulsive => tracing::debug!("Impulsively switching to a new task: {}", to),
            Trigger::Distraction => {
                tracing::debug!("Got distracted by external stimuli! Drifting to {}", to)
            }
            Trigger::Addiction => tracing::debug!("Addiction takes over. Prioritizing {}", to),
            Trigger::Sleep => tracing::info!(
                "Energy critically low ({})! Must sleep.",
                self.state.energy
            ),
        }
    }
}
