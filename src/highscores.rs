//! High score leaderboard
//!
//! Lives in memory for the lifetime of the host; each new run is seeded
//! with the current best so the HUD can show it.

use serde::{Deserialize, Serialize};

use crate::config::GameMode;
use crate::sim::{TerminalEvent, TerminalReason};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub distance: f32,
    pub mode: GameMode,
    /// Crash or clock
    pub reason: TerminalReason,
}

/// High score leaderboard (sorted descending by score)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn record(&mut self, event: &TerminalEvent) -> Option<usize> {
        let score = event.stats.score;
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            distance: event.stats.distance,
            mode: event.mode,
            reason: event.reason,
        };

        // Ties keep the earlier run ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        log::debug!("Score {} entered the leaderboard at #{}", score, rank);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score across all modes (0 if none)
    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Best score for one mode (0 if none); the starting high score of a new run
    pub fn best_for(&self, mode: GameMode) -> u64 {
        self.entries
            .iter()
            .find(|e| e.mode == mode)
            .map(|e| e.score)
            .unwrap_or(0)
    }
}
