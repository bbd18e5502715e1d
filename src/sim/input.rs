//! Keyboard state supplied by the host
//!
//! The host flips keys on and off as events arrive; the simulation only reads.
//! Keys are identified by their DOM `KeyboardEvent.key` names.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Key name to pressed flag, plus last frame's snapshot for edge detection
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashMap<String, bool>,
    previous: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, pressed: bool) {
        self.down.insert(key.to_string(), pressed);
    }

    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.down.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.get(key).copied().unwrap_or(false)
    }

    /// Pressed now but not at the end of the previous frame
    pub fn just_pressed(&self, key: &str) -> bool {
        self.is_down(key) && !self.previous.contains(key)
    }

    /// Latch the current state; call once after every frame
    pub fn end_frame(&mut self) {
        self.previous = self
            .down
            .iter()
            .filter(|(_, pressed)| **pressed)
            .map(|(key, _)| key.clone())
            .collect();
    }
}

/// Key names one player uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub shoot: String,
    pub switch_weapon: String,
}

impl ControlBindings {
    /// Left-hand keyboard cluster
    pub fn player_one() -> Self {
        Self {
            up: "w".into(),
            down: "s".into(),
            left: "a".into(),
            right: "d".into(),
            shoot: "f".into(),
            switch_weapon: "g".into(),
        }
    }

    /// Arrow keys plus the right-hand cluster
    pub fn player_two() -> Self {
        Self {
            up: "ArrowUp".into(),
            down: "ArrowDown".into(),
            left: "ArrowLeft".into(),
            right: "ArrowRight".into(),
            shoot: "l".into(),
            switch_weapon: "k".into(),
        }
    }

    /// Resolve these bindings against the current key state
    pub fn read(&self, keys: &KeyState) -> ControlInput {
        ControlInput {
            up: keys.is_down(&self.up),
            down: keys.is_down(&self.down),
            left: keys.is_down(&self.left),
            right: keys.is_down(&self.right),
            shoot: keys.is_down(&self.shoot),
            switch_weapon: keys.just_pressed(&self.switch_weapon),
        }
    }
}

/// One player's intent for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    /// Edge-triggered
    pub switch_weapon: bool,
}

impl ControlInput {
    /// -1, 0 or 1 along x
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// -1 (up), 0 or 1 (down) along y
    pub fn vertical(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
