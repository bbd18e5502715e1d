//! Local match history
//!
//! Persisted to LocalStorage, keeps the most recent 50 outcomes.

use serde::{Deserialize, Serialize};

use crate::game::{GameMode, MatchOutcome, OutcomeSink, UserId};

/// Maximum number of outcomes to keep
pub const MAX_HISTORY: usize = 50;

/// Finished matches, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchHistory {
    pub entries: Vec<MatchOutcome>,
}

impl MatchHistory {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arena_duel_history";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: MatchOutcome) {
        self.entries.insert(0, outcome);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Matches won by `user` (any mode)
    pub fn wins_for(&self, user: UserId) -> usize {
        self.entries.iter().filter(|o| o.winner_id == user).count()
    }

    pub fn losses_for(&self, user: UserId) -> usize {
        self.entries.iter().filter(|o| o.loser_id == user).count()
    }

    /// Up to `n` outcomes, newest first
    pub fn recent(&self, n: usize) -> &[MatchOutcome] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Longest paddle-ball rally on record
    pub fn best_rally(&self) -> Option<u32> {
        self.entries
            .iter()
            .filter(|o| o.mode == GameMode::PaddleBall)
            .map(|o| o.longest_rally)
            .max()
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(history) = serde_json::from_str::<MatchHistory>(&json) {
                    log::info!("Loaded {} past matches", history.entries.len());
                    return history;
                }
            }
        }

        log::info!("No match history found, starting fresh");
        Self::new()
    }

    /// Save history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Match history saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl OutcomeSink for MatchHistory {
    fn record(&mut self, outcome: &MatchOutcome) {
        self.push(outcome.clone());
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{StatLine, WinMethod};

    fn outcome(winner: UserId, loser: UserId, mode: GameMode, rally: u32) -> MatchOutcome {
        MatchOutcome {
            mode,
            winner_id: winner,
            loser_id: loser,
            win_method: WinMethod::Points,
            winner_stats: StatLine::default(),
            loser_stats: StatLine::default(),
            longest_rally: rally,
            duration_ms: 0.0,
        }
    }

    #[test]
    fn test_records_newest_first() {
        let mut history = MatchHistory::new();
        history.record(&outcome(1, 2, GameMode::PaddleBall, 3));
        history.record(&outcome(2, 1, GameMode::PaddleBall, 7));
        assert_eq!(history.recent(1)[0].winner_id, 2);
        assert_eq!(history.recent(10).len(), 2);
        assert_eq!(history.wins_for(1), 1);
        assert_eq!(history.losses_for(1), 1);
        assert_eq!(history.best_rally(), Some(7));
    }

    #[test]
    fn test_trims_to_max() {
        let mut history = MatchHistory::new();
        for i in 0..(MAX_HISTORY as u64 + 5) {
            history.record(&outcome(i, i + 1, GameMode::PlatformCombat, 0));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.recent(1)[0].winner_id, MAX_HISTORY as u64 + 4);
        assert_eq!(history.best_rally(), None);
    }

    #[test]
    fn test_serde_roundtrip_keeps_mode() {
        let mut history = MatchHistory::new();
        history.push(outcome(1, 2, GameMode::PlatformCombat, 0));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("platform_combat"));
        let back: MatchHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, history.entries);
    }
}
