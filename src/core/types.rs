//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation tick counter (one outer brain cycle)
pub type Tick = u64;

/// Logical time units (one unit = one slice of focused work)
pub type TimeUnits = u64;

/// The fixed set of tasks a brain can attend to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskId {
    Study,
    Clean,
    Code,
    Exercise,
    Eat,
    Sleep,
    #[serde(rename = "Social Media", alias = "SocialMedia")]
    SocialMedia,
    #[serde(rename = "Video Games", alias = "VideoGames")]
    VideoGames,
}

impl TaskId {
    /// Every task, in selection order. Uniform picks index into this.
    pub const ALL: [TaskId; 8] = [
        TaskId::Study,
        TaskId::Clean,
        TaskId::Code,
        TaskId::Exercise,
        TaskId::Eat,
        TaskId::Sleep,
        TaskId::SocialMedia,
        TaskId::VideoGames,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskId::Study => "Study",
            TaskId::Clean => "Clean",
            TaskId::Code => "Code",
            TaskId::Exercise => "Exercise",
            TaskId::Eat => "Eat",
            TaskId::Sleep => "Sleep",
            TaskId::SocialMedia => "Social Media",
            TaskId::VideoGames => "Video Games",
        }
    }

    /// Look up a task by its display label or variant name
    pub fn from_label(label: &str) -> Option<TaskId> {
        let trimmed = label.trim();
        Self::ALL.into_iter().find(|task| {
            task.label().eq_ignore_ascii_case(trimmed)
                || format!("{:?}", task).eq_ignore_ascii_case(trimmed)
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render an optional task the way the interrupted log shows it
pub fn task_or_none(task: Option<TaskId>) -> String {
    match task {
        Some(task) => task.to_string(),
        None => "None".to_string(),
    }
}
