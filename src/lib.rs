//! Arena Duel - two-player arena games and a round-robin tournament
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (collision, platforms, players, weapons, coins)
//! - `game`: Match controllers, tournament scheduler and the top-level state machine
//! - `render`: Drawing surface contract shared by every game object
//! - `settings`: Data-driven rules and physics tuning
//! - `history`: Local record of finished matches

pub mod error;
pub mod game;
pub mod history;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use history::MatchHistory;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Screen space is y-down: the floor is at `FIELD_HEIGHT`, "up" is negative y.
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 540.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1400.0;
    /// Horizontal run speed (pixels/s)
    pub const MOVE_SPEED: f32 = 260.0;
    /// Initial upward speed of a jump (pixels/s)
    pub const JUMP_VELOCITY: f32 = 640.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const MAX_HEALTH: f32 = 100.0;

    /// Platform body
    pub const PLATFORM_WIDTH: f32 = 140.0;
    pub const PLATFORM_HEIGHT: f32 = 16.0;

    /// Coins
    pub const COIN_RADIUS: f32 = 10.0;
    /// Rough radius of a player used for coin pickup (center-to-center)
    pub const PLAYER_PICKUP_RADIUS: f32 = 20.0;

    /// Paddle-ball geometry
    pub const PADDLE_WIDTH: f32 = 14.0;
    pub const PADDLE_HEIGHT: f32 = 96.0;
    pub const PADDLE_MARGIN: f32 = 36.0;
    pub const PADDLE_SPEED: f32 = 420.0;
    pub const BALL_SIZE: f32 = 14.0;
    pub const BALL_START_SPEED: f32 = 320.0;
    pub const BALL_MAX_SPEED: f32 = 900.0;
    /// Speed boost when the ball is returned (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.06;
    /// Maximum vertical deflection (fraction of speed) from an off-center hit
    pub const PADDLE_ENGLISH: f32 = 0.75;
}

/// Axis-aligned rectangle overlap test on top-left positions
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Center of a rectangle given its top-left corner
#[inline]
pub fn rect_center(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}
