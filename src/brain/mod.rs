//! Brain simulation engine
//!
//! A single brain selects, performs, interrupts and resumes tasks under
//! randomized traits: impulsivity, distractibility, hyperfocus, fatigue and
//! addiction bias.

pub mod events;
pub mod lifecycle;
pub mod memory;
pub mod output;
pub mod random;
pub mod simulation;
pub mod state;
pub mod triggers;

pub use events::{ActivityLog, BrainEvent, Event};
pub use lifecycle::TaskOutcome;
pub use memory::{Note, WorkingMemory};
pub use output::{SimulationStats, SimulationSummary};
pub use random::{FixedRandom, RandomSource, ScriptedRandom, SeededRandom};
pub use simulation::{run_brain_simulation, Brain, RunStats, TickReport};
pub use state::BrainState;
pub use triggers::Trigger;
