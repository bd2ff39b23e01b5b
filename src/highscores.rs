//! High score leaderboard
//!
//! Persisted as JSON, tracks the top 10 pilots. One entry per name; a pilot
//! only moves up when they beat their own best.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::sim::RunSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest name stored on the board
pub const MAX_NAME_LEN: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Trim and cut a name to the board's width
fn board_name(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "pilot" } else { name };
    name.chars().take(MAX_NAME_LEN).collect()
}

impl HighScores {
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

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed), or None
    /// if the run didn't make (or improve) the board.
    pub fn record(&mut self, name: &str, summary: &RunSummary) -> Option<usize> {
        let name = board_name(name);
        let score = summary.score;

        if let Some(i) = self.entries.iter().position(|e| e.name == name) {
            if self.entries[i].score >= score {
                return None;
            }
            self.entries.remove(i);
        }
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name,
            score,
            level: summary.level,
        };

        // Sorted descending by score; ties keep the earlier run first
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
        log::info!("New high score #{rank}: {score}");
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Plain-text table for a results screen
    pub fn format_table(&self) -> String {
        let mut out = format!("{:<4}{:<width$}  {:>10}\n", "#", "NAME", "SCORE", width = MAX_NAME_LEN);
        for (i, e) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "{:<4}{:<width$}  {:>10}\n",
                i + 1,
                e.name,
                e.score,
                width = MAX_NAME_LEN
            ));
        }
        out
    }

    /// Load the board; a missing file is an empty board
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::info!("No high scores found, starting fresh");
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
