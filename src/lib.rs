//! Scatterbrain - stochastic task-switching brain simulator

pub mod brain;
pub mod core;
