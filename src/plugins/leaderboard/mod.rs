//! Leaderboard collaborator: an ordered list of integer scores.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

#[derive(Resource, Debug, Clone)]
pub struct Leaderboard {
    /// Sorted descending.
    scores: Vec<u32>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

impl Leaderboard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { scores: Vec::with_capacity(capacity), capacity: capacity.max(1) }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn top(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    /// Insert a score; returns its 1-based rank, or `None` when it does not make the board.
    ///
    /// Ties rank below existing equal scores.
    pub fn submit_score(&mut self, score: u32) -> Option<usize> {
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        if pos >= self.capacity {
            return None;
        }
        self.scores.insert(pos, score);
        self.scores.truncate(self.capacity);
        Some(pos + 1)
    }

    /// Display lines, best first.
    pub fn render(&self) -> Vec<String> {
        self.scores
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect()
    }
}

pub fn plugin(app: &mut App) {
    let size = app
        .world()
        .get_resource::<Tunables>()
        .map(|t| t.leaderboard_size)
        .unwrap_or(10);
    app.insert_resource(Leaderboard::with_capacity(size));
}
