//! Task lifecycle: perform, interrupt, switch, complete
//!
//! A `perform_task` call runs a chain of attempts. Each attempt moves through
//! `Starting -> Focusing -> {Interrupted, Completed}`. An interruption hands a
//! freshly picked task to the next attempt of the same chain; the loop keeps
//! the pending task on the heap, so chain length never touches the call stack.

use serde::{Deserialize, Serialize};

use crate::brain::events::BrainEvent;
use crate::brain::random::RandomSource;
use crate::brain::simulation::Brain;
use crate::core::error::{BrainError, Result};
use crate::core::types::{TaskId, TimeUnits};

/// How a `perform_task` chain ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// The last attempt of the chain ran its full duration
    Completed { task: TaskId, attempts: usize },
    /// No attempt could complete any more, or the explicit attempt limit was
    /// reached; `pending` became current but was never attempted
    Abandoned { last: TaskId, pending: TaskId, attempts: usize },
}

impl TaskOutcome {
    pub fn attempts(&self) -> usize {
        match self {
            TaskOutcome::Completed { attempts, .. } | TaskOutcome::Abandoned { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn completed_task(&self) -> Option<TaskId> {
        match self {
            TaskOutcome::Completed { task, .. } => Some(*task),
            TaskOutcome::Abandoned { .. } => None,
        }
    }
}

/// Phases of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptPhase {
    Starting,
    Focusing { elapsed: TimeUnits },
    Interrupted { next: TaskId },
    Completed,
}

/// Terminal result of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptEnd {
    Interrupted { next: TaskId },
    Completed,
}

impl<R: RandomSource> Brain<R> {
    /// Perform `task`, following interruptions until an attempt completes
    ///
    /// Every attempt appends to exactly one of `completed_tasks` or
    /// `interrupted_tasks`. A chain is only cut short once no attempt can
    /// complete any more, or when an explicit `max_interruption_chain` is
    /// reached. Fails only when that happens and `fail_on_exhausted_chain`
    /// is set.
    pub fn perform_task(&mut self, task: TaskId) -> Result<TaskOutcome> {
        let budget = self.config.run.max_interruption_chain;
        let mut pending = task;
        let mut attempts = 0;

        loop {
            attempts += 1;
            self.stats.attempts += 1;
            self.stats.longest_chain = self.stats.longest_chain.max(attempts);

            let next = match self.attempt(pending, attempts) {
                AttemptEnd::Completed => {
                    return Ok(TaskOutcome::Completed {
                        task: pending,
                        attempts,
                    });
                }
                AttemptEnd::Interrupted { next } => next,
            };

            let exhausted = budget.is_some_and(|limit| attempts >= limit);
            if exhausted || !self.chain_can_complete() {
                return self.abandon_chain(pending, next, attempts);
            }
            pending = next;
        }
    }

    /// Whether any future attempt can still reach completion
    ///
    /// Switch probability never decreases, so once every roll interrupts
    /// only a completing hyperfocus can end the chain.
    fn chain_can_complete(&self) -> bool {
        self.state.switch_probability() < 1.0
            || (self.config.run.hyperfocus_completes_task
                && self.config.traits.hyperfocus_chance > 0.0)
    }

    fn abandon_chain(
        &mut self,
        last: TaskId,
        pending: TaskId,
        attempts: usize,
    ) -> Result<TaskOutcome> {
        self.stats.abandoned_chains += 1;
        self.record(BrainEvent::ChainAbandoned {
            last,
            pending,
            attempts,
        });

        if self.config.run.fail_on_exhausted_chain {
            return Err(BrainError::InterruptionChainExhausted {
                task: last,
                attempts,
            });
        }

        tracing::warn!(
            "Attention collapsed after {} interruptions (switch probability {:.3}); abandoning {}",
            attempts,
            self.state.switch_probability(),
            pending
        );
        Ok(TaskOutcome::Abandoned {
            last,
            pending,
            attempts,
        })
    }

    /// Run one attempt on `task` to its terminal phase
    fn attempt(&mut self, task: TaskId, attempt: usize) -> AttemptEnd {
        let duration = self.config.run.task_duration;
        let mut phase = AttemptPhase::Starting;

        loop {
            phase = match phase {
                AttemptPhase::Starting => {
                    tracing::debug!("Starting task: {}", task);
                    self.record(BrainEvent::AttemptStarted { task, attempt });
                    self.apply_sleep_deprivation(task);
                    let elapsed = self.roll_hyperfocus(task);
                    AttemptPhase::Focusing { elapsed }
                }
                AttemptPhase::Focusing { elapsed } if elapsed >= duration => {
                    AttemptPhase::Completed
                }
                AttemptPhase::Focusing { elapsed } => {
                    if self.rng.roll() < self.state.switch_probability() {
                        let next = self.random_task();
                        AttemptPhase::Interrupted { next }
                    } else {
                        self.state.clock += 1;
                        tracing::trace!("Focused on {} for {} units", task, elapsed + 1);
                        AttemptPhase::Focusing {
                            elapsed: elapsed + 1,
                        }
                    }
                }
                AttemptPhase::Interrupted { next } => {
                    tracing::debug!("Interrupted while performing: {} (now {})", task, next);
                    self.state.interrupted_tasks.push(Some(task));
                    self.state.current_task = Some(next);
                    self.record(BrainEvent::Interrupted { task, next });
                    return AttemptEnd::Interrupted { next };
                }
                AttemptPhase::Completed => {
                    tracing::debug!("Completed task: {}", task);
                    self.state.completed_tasks.push(task);
                    self.record(BrainEvent::Completed { task });
                    return AttemptEnd::Completed;
                }
            };
        }
    }

    /// Compound the switch probability if energy is below the deprivation threshold
    fn apply_sleep_deprivation(&mut self, task: TaskId) {
        if !self
            .state
            .is_sleep_deprived(self.config.traits.sleep_deprivation_threshold)
        {
            return;
        }

        let switch_probability = self.state.compound_switch_probability(
            self.config.run.switch_growth,
            self.config.run.switch_probability_cap,
        );
        self.stats.deprivation_episodes += 1;
        tracing::debug!(
            "Suffering from sleep deprivation (energy {}), switch probability now {:.3}",
            self.state.energy,
            switch_probability
        );
        self.record(BrainEvent::SleepDeprived {
            task,
            switch_probability,
        });
    }

    /// Roll for hyperfocus; returns the units that count toward the task
    fn roll_hyperfocus(&mut self, task: TaskId) -> TimeUnits {
        if self.rng.roll() >= self.config.traits.hyperfocus_chance {
            return 0;
        }

        let duration = self.config.run.hyperfocus_duration;
        tracing::debug!("Entering hyperfocus mode on {}. Ignoring distractions.", task);
        self.state.clock += duration;
        self.stats.hyperfocus_episodes += 1;
        self.record(BrainEvent::HyperfocusEntered { task, duration });

        if self.config.run.hyperfocus_completes_task {
            duration
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::random::{FixedRandom, ScriptedRandom};
    use crate::core::config::BrainConfig;

    fn pick(task: TaskId) -> f64 {
        let idx = TaskId::ALL.iter().position(|t| *t == task).unwrap();
        ScriptedRandom::pick_roll(idx, TaskId::ALL.len())
    }

    #[test]
    fn test_uninterrupted_attempt_completes() {
        let mut brain = Brain::with_random(BrainConfig::default(), FixedRandom(0.99)).unwrap();
        let outcome = brain.perform_task(TaskId::Study).unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                task: TaskId::Study,
                attempts: 1
            }
        );
        assert_eq!(brain.state.completed_tasks, vec![TaskId::Study]);
        assert!(brain.state.interrupted_tasks.is_empty());
        assert_eq!(brain.state.clock, 5);
    }

    #[test]
    fn test_interruption_switches_to_new_task() {
        // hyperfocus miss, interrupt on unit 1, pick Eat, then Eat runs clean
        let rng = ScriptedRandom::new([0.9, 0.1, pick(TaskId::Eat)], 0.99);
        let mut brain = Brain::with_random(BrainConfig::default(), rng).unwrap();
        brain.state.current_task = Some(TaskId::Code);

        let outcome = brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(outcome.completed_task(), Some(TaskId::Eat));
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(brain.state.interrupted_tasks, vec![Some(TaskId::Code)]);
        assert_eq!(brain.state.completed_tasks, vec![TaskId::Eat]);
        assert_eq!(brain.state.current_task, Some(TaskId::Eat));
    }

    #[test]
    fn test_interruption_after_partial_focus() {
        // two clean units, then interrupted on the third
        let rng = ScriptedRandom::new([0.9, 0.8, 0.8, 0.1, pick(TaskId::Clean)], 0.99);
        let mut brain = Brain::with_random(BrainConfig::default(), rng).unwrap();
        brain.perform_task(TaskId::Exercise).unwrap();

        assert_eq!(brain.state.interrupted_tasks, vec![Some(TaskId::Exercise)]);
        assert_eq!(brain.state.completed_tasks, vec![TaskId::Clean]);
        // 2 units on Exercise + 5 on Clean
        assert_eq!(brain.state.clock, 7);
    }

    #[test]
    fn test_hyperfocus_does_not_complete_by_default() {
        // hyperfocus hit, then interrupted on the first unit afterwards
        let rng = ScriptedRandom::new([0.1, 0.1, pick(TaskId::Sleep)], 0.99);
        let mut brain = Brain::with_random(BrainConfig::default(), rng).unwrap();
        brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(brain.stats().hyperfocus_episodes, 1);
        assert_eq!(brain.state.interrupted_tasks, vec![Some(TaskId::Code)]);
        assert_eq!(brain.state.completed_tasks, vec![TaskId::Sleep]);
    }

    #[test]
    fn test_hyperfocus_can_complete_when_configured() {
        let mut config = BrainConfig::default();
        config.run.hyperfocus_completes_task = true;
        let mut brain = Brain::with_random(config, FixedRandom(0.0)).unwrap();

        let outcome = brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(outcome.completed_task(), Some(TaskId::Code));
        assert!(brain.state.interrupted_tasks.is_empty());
        assert_eq!(brain.state.clock, 5);
    }

    #[test]
    fn test_deprivation_compounds_each_attempt() {
        let mut config = BrainConfig::default();
        config.traits.switch_probability = 0.25;
        let mut brain = Brain::with_random(config, FixedRandom(0.99)).unwrap();
        brain.state.energy = 30;

        brain.perform_task(TaskId::Study).unwrap();
        assert_eq!(brain.state.switch_probability(), 0.375);

        // still below the 0.99 roll, so the second attempt completes and compounds again
        brain.perform_task(TaskId::Study).unwrap();
        assert_eq!(brain.state.switch_probability(), 0.5625);
        assert_eq!(brain.stats().deprivation_episodes, 2);
        assert_eq!(brain.state.completed_tasks.len(), 2);
    }

    #[test]
    fn test_rested_brain_does_not_compound() {
        let mut brain = Brain::with_random(BrainConfig::default(), FixedRandom(0.99)).unwrap();
        brain.state.energy = 40;
        brain.perform_task(TaskId::Study).unwrap();
        assert_eq!(brain.state.switch_probability(), 0.5);
    }

    #[test]
    fn test_certain_interruption_abandons_chain() {
        let mut config = BrainConfig::default();
        config.run.max_interruption_chain = Some(8);
        let mut brain = Brain::with_random(config, FixedRandom(0.0)).unwrap();

        let outcome = brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Abandoned {
                last: TaskId::Study,
                pending: TaskId::Study,
                attempts: 8
            }
        );
        assert_eq!(brain.state.interrupted_tasks.len(), 8);
        assert_eq!(brain.state.interrupted_tasks[0], Some(TaskId::Code));
        assert!(brain.state.completed_tasks.is_empty());
        assert_eq!(brain.stats().abandoned_chains, 1);
    }

    #[test]
    fn test_long_chain_below_certainty_runs_to_completion() {
        // 149 attempts each miss hyperfocus, interrupt on unit 1 and pick Code;
        // the 150th attempt runs clean on the fallback roll
        let mut script = Vec::new();
        for _ in 0..149 {
            script.extend([0.9, 0.1, pick(TaskId::Code)]);
        }
        let rng = ScriptedRandom::new(script, 0.99);
        let mut brain = Brain::with_random(BrainConfig::default(), rng).unwrap();

        let outcome = brain.perform_task(TaskId::Study).unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                task: TaskId::Code,
                attempts: 150
            }
        );
        assert_eq!(brain.state.interrupted_tasks.len(), 149);
        assert_eq!(brain.state.completed_tasks, vec![TaskId::Code]);
        assert_eq!(brain.stats().abandoned_chains, 0);
    }

    #[test]
    fn test_certain_interruption_abandons_without_limit() {
        let mut config = BrainConfig::default();
        config.traits.switch_probability = 1.0;
        // 0.5 misses hyperfocus, interrupts, and picks index 4 (Eat)
        let mut brain = Brain::with_random(config, FixedRandom(0.5)).unwrap();

        let outcome = brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Abandoned {
                last: TaskId::Code,
                pending: TaskId::Eat,
                attempts: 1
            }
        );
        assert_eq!(brain.state.interrupted_tasks, vec![Some(TaskId::Code)]);
        assert_eq!(brain.state.current_task, Some(TaskId::Eat));
    }

    #[test]
    fn test_completing_hyperfocus_keeps_certain_chain_alive() {
        let mut config = BrainConfig::default();
        config.traits.switch_probability = 1.0;
        config.run.hyperfocus_completes_task = true;
        // miss hyperfocus and get interrupted, then hyperfocus on Eat
        let rng = ScriptedRandom::new([0.9, 0.1, pick(TaskId::Eat), 0.1], 0.99);
        let mut brain = Brain::with_random(config, rng).unwrap();

        let outcome = brain.perform_task(TaskId::Code).unwrap();

        assert_eq!(outcome.completed_task(), Some(TaskId::Eat));
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(brain.stats().abandoned_chains, 0);
    }

    #[test]
    fn test_strict_budget_returns_error() {
        let mut config = BrainConfig::default();
        config.run.max_interruption_chain = Some(3);
        config.run.fail_on_exhausted_chain = true;
        let mut brain = Brain::with_random(config, FixedRandom(0.0)).unwrap();

        let err = brain.perform_task(TaskId::Eat).unwrap_err();
        assert!(matches!(
            err,
            BrainError::InterruptionChainExhausted { attempts: 3, .. }
        ));
        assert_eq!(brain.state.interrupted_tasks.len(), 3);
    }

    #[test]
    fn test_long_chain_stays_off_the_stack() {
        let mut config = BrainConfig::default();
        config.run.max_interruption_chain = Some(50_000);
        let mut brain = Brain::with_random(config, FixedRandom(0.0)).unwrap();

        let outcome = brain.perform_task(TaskId::Code).unwrap();
        assert_eq!(outcome.attempts(), 50_000);
        assert_eq!(brain.stats().longest_chain, 50_000);
    }
}
