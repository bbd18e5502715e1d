//! Match results and the persistence boundary
//!
//! `MatchOutcome` is the only record that leaves the simulation. Its field
//! names are part of the contract with the persistence layer.

use serde::{Deserialize, Serialize};

use super::context::UserId;
use crate::sim::PlayerSlot;

/// Which mini-game a match is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    PlatformCombat,
    PaddleBall,
}

impl GameMode {
    pub fn title(self) -> &'static str {
        match self {
            GameMode::PlatformCombat => "Platform Combat",
            GameMode::PaddleBall => "Paddle Ball",
        }
    }
}

/// How a match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinMethod {
    /// Opponent's health reached zero
    #[serde(rename = "KO")]
    Ko,
    /// Coin threshold reached first
    #[serde(rename = "economy")]
    Economy,
    /// Paddle-ball point total reached first
    #[serde(rename = "points")]
    Points,
}

impl WinMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            WinMethod::Ko => "KO",
            WinMethod::Economy => "economy",
            WinMethod::Points => "points",
        }
    }
}

/// Per-player stat deltas accumulated over one match
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub coins_collected: u32,
    pub shots_fired: u32,
    pub points_scored: u32,
    /// Paddle-ball returns
    pub returns: u32,
    /// Projectiles and mines that connected
    #[serde(default)]
    pub hits: u32,
}

/// The record handed to persistence after every match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub mode: GameMode,
    pub winner_id: UserId,
    pub loser_id: UserId,
    pub win_method: WinMethod,
    pub winner_stats: StatLine,
    pub loser_stats: StatLine,
    /// Longest paddle-ball rally (0 for platform combat)
    pub longest_rally: u32,
    pub duration_ms: f64,
}

impl MatchOutcome {
    pub fn stats_for(&self, user: UserId) -> Option<&StatLine> {
        if user == self.winner_id {
            Some(&self.winner_stats)
        } else if user == self.loser_id {
            Some(&self.loser_stats)
        } else {
            None
        }
    }

    /// Secondary ranking value for `user`: coins or points depending on mode
    pub fn tie_break_for(&self, user: UserId) -> u32 {
        self.stats_for(user)
            .map(|s| match self.mode {
                GameMode::PlatformCombat => s.coins_collected,
                GameMode::PaddleBall => s.points_scored,
            })
            .unwrap_or(0)
    }
}

/// External persistence collaborator
pub trait OutcomeSink {
    fn record(&mut self, outcome: &MatchOutcome);
}

/// Values diffed every frame to build a `StatLine`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatSnapshot {
    pub health: f32,
    pub coins: u32,
    pub shots: u32,
    pub points: u32,
    pub returns: u32,
}

/// Incremental per-slot stat accumulation
#[derive(Debug, Clone, Default)]
pub struct StatTracker {
    lines: [StatLine; 2],
}

impl StatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, slot: PlayerSlot) -> &StatLine {
        &self.lines[slot.index()]
    }

    /// Fold one frame's change for both players
    pub fn apply(&mut self, before: [StatSnapshot; 2], after: [StatSnapshot; 2]) {
        for slot in [PlayerSlot::One, PlayerSlot::Two] {
            let (b, a) = (before[slot.index()], after[slot.index()]);
            let lost = (b.health - a.health).max(0.0);

            let line = &mut self.lines[slot.index()];
            line.damage_taken += lost;
            line.coins_collected += a.coins.saturating_sub(b.coins);
            line.shots_fired += a.shots.saturating_sub(b.shots);
            line.points_scored += a.points.saturating_sub(b.points);
            line.returns += a.returns.saturating_sub(b.returns);

            self.lines[slot.other().index()].damage_dealt += lost;
        }
    }

    /// Credit hits landed by `slot` this frame
    pub fn record_hits(&mut self, slot: PlayerSlot, hits: u32) {
        self.lines[slot.index()].hits += hits;
    }

    /// Build the outcome with `winner` as the winning slot
    pub fn outcome(
        &self,
        mode: GameMode,
        ids: [UserId; 2],
        winner: PlayerSlot,
        win_method: WinMethod,
        longest_rally: u32,
        duration_ms: f64,
    ) -> MatchOutcome {
        let loser = winner.other();
        MatchOutcome {
            mode,
            winner_id: ids[winner.index()],
            loser_id: ids[loser.index()],
            win_method,
            winner_stats: self.lines[winner.index()],
            loser_stats: self.lines[loser.index()],
            longest_rally,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(health: f32, coins: u32, shots: u32) -> StatSnapshot {
        StatSnapshot {
            health,
            coins,
            shots,
            ..Default::default()
        }
    }

    #[test]
    fn test_tracker_accumulates_deltas() {
        let mut tracker = StatTracker::new();
        tracker.apply(
            [snap(100.0, 0, 0), snap(100.0, 0, 0)],
            [snap(100.0, 1, 2), snap(92.0, 0, 0)],
        );
        tracker.apply(
            [snap(100.0, 1, 2), snap(92.0, 0, 0)],
            [snap(80.0, 1, 3), snap(84.0, 0, 1)],
        );
        let one = tracker.line(PlayerSlot::One);
        let two = tracker.line(PlayerSlot::Two);
        assert_eq!(one.damage_dealt, 16.0);
        assert_eq!(one.damage_taken, 20.0);
        assert_eq!(one.coins_collected, 1);
        assert_eq!(one.shots_fired, 3);
        assert_eq!(two.damage_dealt, 20.0);
        assert_eq!(two.damage_taken, 16.0);
        assert_eq!(two.shots_fired, 1);
    }

    #[test]
    fn test_win_method_wire_names() {
        assert_eq!(serde_json::to_string(&WinMethod::Ko).unwrap(), "\"KO\"");
        assert_eq!(serde_json::to_string(&WinMethod::Economy).unwrap(), "\"economy\"");
        assert_eq!(WinMethod::Points.as_str(), "points");
    }

    #[test]
    fn test_outcome_orders_winner_first() {
        let mut tracker = StatTracker::new();
        tracker.apply(
            [StatSnapshot::default(); 2],
            [
                StatSnapshot::default(),
                StatSnapshot {
                    points: 5,
                    ..Default::default()
                },
            ],
        );
        let outcome = tracker.outcome(
            GameMode::PaddleBall,
            [7, 9],
            PlayerSlot::Two,
            WinMethod::Points,
            4,
            1000.0,
        );
        assert_eq!(outcome.winner_id, 9);
        assert_eq!(outcome.loser_id, 7);
        assert_eq!(outcome.winner_stats.points_scored, 5);
        assert_eq!(outcome.tie_break_for(9), 5);
        assert_eq!(outcome.tie_break_for(7), 0);
        assert_eq!(outcome.tie_break_for(1), 0);
    }
}
