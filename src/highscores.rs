//! High score leaderboard
//!
//! Top 10 scores, highest first. Serves as the local score sink for the
//! native runner and persists as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::submission::{ScoreSink, Submission};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Display name of the player
    pub username: String,
    /// Run that produced the score
    pub run_id: u64,
}

/// High score leaderboard
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
        // Must beat the lowest entry
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

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    /// Ties keep the earlier entry ahead.
    pub fn add_score(&mut self, score: u64, username: &str, run_id: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            username: username.to_string(),
            run_id,
        };

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

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file. A missing or unreadable file starts fresh.
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str::<HighScores>(&json).ok());

        match loaded {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    /// Accepts every submission; scores that don't make the top 10 are dropped
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
        match self.add_score(submission.score, &submission.username, submission.run_id) {
            Some(rank) => log::info!("{} placed #{}", submission.username, rank),
            None => log::debug!("Score {} did not make the board", submission.score),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[u64]) -> HighScores {
        let mut hs = HighScores::new();
        for (i, &s) in scores.iter().enumerate() {
            hs.add_score(s, "p", i as u64);
        }
        hs
    }

    #[test]
    fn test_sorted_descending() {
        let hs = board(&[5, 20, 10]);
        let scores: Vec<u64> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![20, 10, 5]);
        assert_eq!(hs.top_score(), Some(20));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut hs = HighScores::new();
        assert!(!hs.qualifies(0));
        assert_eq!(hs.add_score(0, "p", 1), None);
        assert!(hs.is_empty());
    }

    #[test]
    fn test_full_board_keeps_top_ten() {
        let mut hs = board(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(!hs.qualifies(10));
        assert_eq!(hs.potential_rank(55), Some(6));
        assert_eq!(hs.add_score(55, "late", 99), Some(6));
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_ties_rank_behind_existing() {
        let mut hs = board(&[30]);
        assert_eq!(hs.add_score(30, "second", 7), Some(2));
        assert_eq!(hs.entries[0].run_id, 0);
    }

    #[test]
    fn test_sink_records_username() {
        let mut hs = HighScores::new();
        let submission = Submission {
            run_id: 3,
            score: 20,
            username: "ada".into(),
            identity: crate::submission::Identity::new("u", Some("ada@example.com".into())),
        };
        hs.submit(&submission).unwrap();
        assert_eq!(hs.entries[0].username, "ada");
        assert_eq!(hs.entries[0].run_id, 3);
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("bug_invaders_hs_{}.json", std::process::id()));
        let hs = board(&[3, 1, 2]);
        hs.save(&path).unwrap();
        let loaded = HighScores::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.entries, hs.entries);
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let path = std::env::temp_dir().join("bug_invaders_no_such_board.json");
        assert!(HighScores::load(&path).is_empty());
    }
}
