//! Four-player round robin
//!
//! Contestants keep their registration index (0-3) for the whole tournament;
//! the bracket always refers to those indices, so every pair meets exactly
//! once no matter how the standings move.

use serde::Serialize;

use super::context::User;
use super::outcome::{GameMode, MatchOutcome};
use crate::error::{GameError, Result};

pub const TOURNAMENT_SIZE: usize = 4;

/// Fixed match order over registration indices
pub const BRACKET: [(usize, usize); 6] = [(0, 1), (2, 3), (0, 2), (1, 3), (3, 0), (2, 1)];

/// A contestant and their running totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentPlayer {
    pub user: User,
    pub points: u32,
    /// Coins (platform combat) or points scored (paddle-ball)
    pub tie_break: u32,
    /// 1-based standing after the latest match
    pub place: usize,
}

impl TournamentPlayer {
    pub fn new(user: User) -> Self {
        Self {
            user,
            points: 0,
            tie_break: 0,
            place: 1,
        }
    }
}

/// Bracket state for one tournament
#[derive(Debug, Clone)]
pub struct Tournament {
    pub mode: GameMode,
    /// Registration order; bracket indices point here
    pub entries: Vec<TournamentPlayer>,
    pub results: Vec<MatchOutcome>,
    points_per_win: u32,
    match_index: usize,
}

impl Tournament {
    pub fn new(mode: GameMode, users: Vec<User>, points_per_win: u32) -> Result<Self> {
        if users.len() != TOURNAMENT_SIZE {
            return Err(GameError::TournamentSize { found: users.len() });
        }
        log::info!(
            "{} tournament: {}",
            mode.title(),
            users.iter().map(|u| u.name.as_str()).collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            mode,
            entries: users.into_iter().map(TournamentPlayer::new).collect(),
            results: Vec::new(),
            points_per_win,
            match_index: 0,
        })
    }

    /// Matches played so far
    pub fn matches_played(&self) -> usize {
        self.match_index
    }

    pub fn is_complete(&self) -> bool {
        self.match_index == BRACKET.len()
    }

    fn check_roster(&self) -> Result<()> {
        if self.entries.len() != TOURNAMENT_SIZE {
            return Err(GameError::TournamentSize {
                found: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Registration indices of the next match
    pub fn next_pairing(&self) -> Result<(usize, usize)> {
        self.check_roster()?;
        BRACKET
            .get(self.match_index)
            .copied()
            .ok_or(GameError::BracketExhausted)
    }

    /// Users of the next match, player one first
    pub fn next_users(&self) -> Result<(User, User)> {
        let (a, b) = self.next_pairing()?;
        Ok((self.entries[a].user.clone(), self.entries[b].user.clone()))
    }

    /// Fold the result of the scheduled match into the standings
    pub fn record_result(&mut self, outcome: &MatchOutcome) -> Result<()> {
        let (a, b) = self.next_pairing()?;
        let ids = (self.entries[a].user.id, self.entries[b].user.id);
        let matches_pairing = (outcome.winner_id, outcome.loser_id) == ids
            || (outcome.loser_id, outcome.winner_id) == ids;
        if !matches_pairing {
            return Err(GameError::MatchCounter {
                expected: self.match_index + 1,
            });
        }

        for idx in [a, b] {
            let entry = &mut self.entries[idx];
            entry.tie_break += outcome.tie_break_for(entry.user.id);
            if entry.user.id == outcome.winner_id {
                entry.points += self.points_per_win;
            }
        }

        self.results.push(outcome.clone());
        self.match_index += 1;
        self.update_places();
        log::info!(
            "Tournament match {}/{} recorded ({} via {})",
            self.match_index,
            BRACKET.len(),
            outcome.winner_id,
            outcome.win_method.as_str()
        );
        Ok(())
    }

    /// Entries ordered by (points, tie-break) descending, registration order on ties
    pub fn standings(&self) -> Vec<&TournamentPlayer> {
        sorted(&self.entries)
    }

    fn update_places(&mut self) {
        let order: Vec<u64> = self.standings().iter().map(|e| e.user.id).collect();
        for entry in &mut self.entries {
            if let Some(pos) = order.iter().position(|id| *id == entry.user.id) {
                entry.place = pos + 1;
            }
        }
    }

    /// Every contestant tied with the leader on both stats
    pub fn winners(&self) -> Result<Vec<&TournamentPlayer>> {
        self.check_roster()?;
        if !self.is_complete() {
            return Err(GameError::TournamentIncomplete {
                played: self.match_index,
            });
        }
        Ok(determine_winners(&self.entries))
    }
}

fn sorted(entries: &[TournamentPlayer]) -> Vec<&TournamentPlayer> {
    let mut order: Vec<&TournamentPlayer> = entries.iter().collect();
    order.sort_by(|a, b| (b.points, b.tie_break).cmp(&(a.points, a.tie_break)));
    order
}

/// All entries sharing the top (points, tie-break) pair; ties are not broken
pub fn determine_winners(entries: &[TournamentPlayer]) -> Vec<&TournamentPlayer> {
    let order = sorted(entries);
    let Some(top) = order.first().map(|e| (e.points, e.tie_break)) else {
        return Vec::new();
    };
    order
        .into_iter()
        .take_while(|e| (e.points, e.tie_break) == top)
        .collect()
}
