//! Bounded working memory

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// An opaque record of something the brain noticed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note(pub String);

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered notes with a hard capacity
///
/// The container enforces its own bound: pushing past capacity evicts the
/// oldest note. `forget_recent` is a separate path that drops the newest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemory {
    notes: VecDeque<Note>,
    capacity: usize,
}

impl WorkingMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            notes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Store a note, returning the oldest note if it was evicted
    pub fn remember(&mut self, note: Note) -> Option<Note> {
        if self.capacity == 0 {
            return Some(note);
        }
        let evicted = if self.notes.len() >= self.capacity {
            self.notes.pop_front()
        } else {
            None
        };
        self.notes.push_back(note);
        evicted
    }

    /// Drop the newest note when more than `threshold` notes are held
    pub fn forget_recent(&mut self, threshold: usize) -> Option<Note> {
        if self.notes.len() > threshold {
            self.notes.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn newest(&self) -> Option<&Note> {
        self.notes.back()
    }
}
