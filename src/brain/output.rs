//! Simulation summary and serialization

use serde::{Deserialize, Serialize};

use crate::brain::events::ActivityLog;
use crate::brain::simulation::RunStats;
use crate::brain::state::BrainState;
use crate::core::types::{task_or_none, TaskId, Tick, TimeUnits};

/// Everything a finished (or aborted) run produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub completed_tasks: Vec<TaskId>,
    pub interrupted_tasks: Vec<Option<TaskId>>,
    pub remaining_memory: Vec<String>,
    pub final_energy: i32,
    pub statistics: SimulationStats,
    pub history: ActivityLog,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub seed: Option<u64>,
    pub ticks: Tick,
    pub time_units: TimeUnits,
    pub attempts: usize,
    pub hyperfocus_episodes: usize,
    pub deprivation_episodes: usize,
    pub forced_sleeps: usize,
    pub abandoned_chains: usize,
    pub longest_chain: usize,
    pub final_switch_probability: f64,
}

impl SimulationSummary {
    pub fn new(state: &BrainState, stats: &RunStats, log: &ActivityLog, seed: Option<u64>) -> Self {
        Self {
            completed_tasks: state.completed_tasks.clone(),
            interrupted_tasks: state.interrupted_tasks.clone(),
            remaining_memory: state.memory.iter().map(|n| n.to_string()).collect(),
            final_energy: state.energy,
            statistics: SimulationStats {
                seed,
                ticks: stats.ticks,
                time_units: state.clock,
                attempts: stats.attempts,
                hyperfocus_episodes: stats.hyperfocus_episodes,
                deprivation_episodes: stats.deprivation_episodes,
                forced_sleeps: stats.forced_sleeps,
                abandoned_chains: stats.abandoned_chains,
                longest_chain: stats.longest_chain,
                final_switch_probability: state.switch_probability(),
            },
            history: log.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    /// The four-line summary block
    pub fn summary(&self) -> String {
        let completed = list(self.completed_tasks.iter().map(|t| t.to_string()));
        let interrupted = list(self.interrupted_tasks.iter().map(|t| task_or_none(*t)));
        let memory = list(self.remaining_memory.iter().cloned());

        format!(
            "--- Summary ---\nCompleted tasks: {}\nInterrupted tasks: {}\nRemaining memory: {}\nFinal energy level: {}",
            completed, interrupted, memory, self.final_energy
        )
    }

    /// One line of run statistics
    pub fn statistics_line(&self) -> String {
        let s = &self.statistics;
        let seed = s
            .seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "seed {} | {} ticks, {} time units | {} attempts, longest chain {} | hyperfocus {}, deprived {}, forced sleeps {}, abandoned chains {} | switch probability {:.3}",
            seed,
            s.ticks,
            s.time_units,
            s.attempts,
            s.longest_chain,
            s.hyperfocus_episodes,
            s.deprivation_episodes,
            s.forced_sleeps,
            s.abandoned_chains,
            s.final_switch_probability,
        )
    }
}

fn list(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(", "))
}
