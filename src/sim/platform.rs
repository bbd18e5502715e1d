//! Oscillating platforms
//!
//! A platform is a kinematic body: it never reacts to what stands on it, it
//! just bounces between the ends of its range (or the play-field edge,
//! whichever comes first).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionShape, ShapeKind, ShapeOwner};
use crate::consts::*;
use crate::render::{Color, Draw, Surface};

/// Axis a platform travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Oscillation {
    Vertical,
    Horizontal,
    Stationary,
}

/// A moving or fixed platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: usize,
    /// Center of the oscillation range (top-left position)
    pub origin: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub axis: Oscillation,
    /// Maximum distance from `origin` along `axis`
    pub range: f32,
    /// Coin slot guard: at most one coin per platform
    pub has_coin: bool,
    pub shape: CollisionShape,
    /// Actual displacement applied by the last `update`
    pub last_delta: Vec2,
}

impl Platform {
    pub fn new(id: usize, origin: Vec2, axis: Oscillation, range: f32, speed: f32) -> Self {
        let size = Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT);
        let vel = match axis {
            Oscillation::Vertical => Vec2::new(0.0, speed),
            Oscillation::Horizontal => Vec2::new(speed, 0.0),
            Oscillation::Stationary => Vec2::ZERO,
        };
        Self {
            id,
            origin,
            pos: origin,
            vel,
            size,
            axis,
            range: range.max(0.0),
            has_coin: false,
            shape: CollisionShape::new(origin, size, ShapeKind::Platform, ShapeOwner::Platform(id)),
            last_delta: Vec2::ZERO,
        }
    }

    pub fn stationary(id: usize, origin: Vec2) -> Self {
        Self::new(id, origin, Oscillation::Stationary, 0.0, 0.0)
    }

    /// Lowest and highest allowed coordinate along the travel axis
    pub fn travel_bounds(&self, field: Vec2) -> (f32, f32) {
        let (origin, size, edge) = match self.axis {
            Oscillation::Horizontal => (self.origin.x, self.size.x, field.x),
            Oscillation::Vertical => (self.origin.y, self.size.y, field.y),
            Oscillation::Stationary => return (0.0, 0.0),
        };
        let lo = (origin - self.range).max(0.0);
        let hi = (origin + self.range).min(edge - size);
        (lo, hi.max(lo))
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, field: Vec2) {
        let before = self.pos;
        let (lo, hi) = self.travel_bounds(field);

        match self.axis {
            Oscillation::Horizontal => {
                let (p, v) = bounce(self.pos.x, self.vel.x, dt, lo, hi);
                self.pos.x = p;
                self.vel.x = v;
            }
            Oscillation::Vertical => {
                let (p, v) = bounce(self.pos.y, self.vel.y, dt, lo, hi);
                self.pos.y = p;
                self.vel.y = v;
            }
            Oscillation::Stationary => {}
        }

        self.last_delta = self.pos - before;
        self.shape.sync(self.pos);
    }

    /// Point a coin sits at: centered, resting on top
    pub fn coin_anchor(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y - COIN_RADIUS - 2.0)
    }
}

/// Integrate one axis and reverse exactly at either bound
fn bounce(pos: f32, vel: f32, dt: f32, lo: f32, hi: f32) -> (f32, f32) {
    let next = pos + vel * dt;
    if next >= hi {
        (hi, -vel.abs())
    } else if next <= lo {
        (lo, vel.abs())
    } else {
        (next, vel)
    }
}

impl Draw for Platform {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, Color::PLATFORM);
    }
}

/// Standard arena: two low side shuttles, a fixed center step, two lifts and
/// a fast top shuttle
pub fn arena_layout() -> Vec<Platform> {
    vec![
        Platform::new(0, Vec2::new(110.0, 400.0), Oscillation::Horizontal, 80.0, 60.0),
        Platform::new(1, Vec2::new(710.0, 400.0), Oscillation::Horizontal, 80.0, -60.0),
        Platform::stationary(2, Vec2::new(410.0, 330.0)),
        Platform::new(3, Vec2::new(200.0, 240.0), Oscillation::Vertical, 60.0, 50.0),
        Platform::new(4, Vec2::new(620.0, 240.0), Oscillation::Vertical, 60.0, -50.0),
        Platform::new(5, Vec2::new(410.0, 150.0), Oscillation::Horizontal, 120.0, 90.0),
    ]
}
