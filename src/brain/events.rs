//! Brain events and the activity log

use serde::{Deserialize, Serialize};

use crate::brain::triggers::Trigger;
use crate::core::types::{TaskId, Tick, TimeUnits};

/// One logged occurrence inside the brain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub tick: Tick,
    pub clock: TimeUnits,
    pub event_type: BrainEvent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrainEvent {
    // Task lifecycle
    AttemptStarted { task: TaskId, attempt: usize },
    SleepDeprived { task: TaskId, switch_probability: f64 },
    HyperfocusEntered { task: TaskId, duration: TimeUnits },
    Interrupted { task: TaskId, next: TaskId },
    Completed { task: TaskId },
    ChainAbandoned { last: TaskId, pending: TaskId, attempts: usize },

    // Behavior
    TriggerFired { trigger: Trigger, from: Option<TaskId>, to: TaskId },

    // Memory
    Remembered { note: String },
    Evicted { note: String },
    Forgot { note: String },

    // Energy
    EnergyDrained { energy: i32 },
    EnergyRestored { energy: i32 },
}

/// Ordered record of everything that happened during a run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event_type: BrainEvent, tick: Tick, clock: TimeUnits) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;

        self.events.push(Event {
            id,
            tick,
            clock,
            event_type,
        });

        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_tick(&self, tick: Tick) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Tasks handed to the lifecycle, in order
    pub fn attempted_tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.events.iter().filter_map(|e| match e.event_type {
            BrainEvent::AttemptStarted { task, .. } => Some(task),
            _ => None,
        })
    }

    pub fn triggers_fired(&self) -> impl Iterator<Item = (Trigger, TaskId)> + '_ {
        self.events.iter().filter_map(|e| match e.event_type {
            BrainEvent::TriggerFired { trigger, to, .. } => Some((trigger, to)),
            _ => None,
        })
    }

    pub fn count(&self, predicate: impl Fn(&BrainEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(&e.event_type)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut log = ActivityLog::new();
        let a = log.record(BrainEvent::Completed { task: TaskId::Eat }, 0, 5);
        let b = log.record(BrainEvent::EnergyDrained { energy: 90 }, 1, 5);
        assert_eq!((a, b), (0, 1));
        assert_eq!(log.events_for_tick(1).count(), 1);
    }

    #[test]
    fn test_attempted_tasks_in_order() {
        let mut log = ActivityLog::new();
        log.record(BrainEvent::AttemptStarted { task: TaskId::Code, attempt: 1 }, 0, 0);
        log.record(BrainEvent::Interrupted { task: TaskId::Code, next: TaskId::Eat }, 0, 0);
        log.record(BrainEvent::AttemptStarted { task: TaskId::Eat, attempt: 2 }, 0, 0);

        let tasks: Vec<_> = log.attempted_tasks().collect();
        assert_eq!(tasks, vec![TaskId::Code, TaskId::Eat]);
        assert_eq!(log.count(|e| matches!(e, BrainEvent::Interrupted { .. })), 1);
    }
}
