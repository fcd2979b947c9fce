use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::AudioArtifact;

/// Whether an entry was recorded locally or returned by the conversion
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

/// One conversation entry. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntry {
    pub id: Uuid,
    pub artifact: AudioArtifact,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

impl MessageEntry {
    pub fn sent(artifact: AudioArtifact) -> Self {
        Self::new(artifact, Direction::Sent)
    }

    pub fn received(artifact: AudioArtifact) -> Self {
        Self::new(artifact, Direction::Received)
    }

    fn new(artifact: AudioArtifact, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            artifact,
            direction,
            created_at: Utc::now(),
        }
    }
}

/// Append-only conversation log. Insertion order is chronological order is
/// display order; entries are never mutated or removed.
#[derive(Debug, Default)]
pub struct MessageHistory {
    entries: Vec<MessageEntry>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: MessageEntry) {
        self.entries.push(entry);
    }

    /// Read-only snapshot in insertion order.
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Most recently recorded Sent entry, if any. Used by the submit flow.
    pub fn last_sent(&self) -> Option<&MessageEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.direction == Direction::Sent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
