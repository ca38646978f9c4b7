pub mod config;
pub mod error;
pub mod types;

pub use config::{BrainConfig, RunParameters, TraitParameters};
pub use error::{BrainError, Result};
pub use types::{TaskId, Tick, TimeUnits};
