//! Paddle-ball bodies
//!
//! Two vertical paddles guard the left and right edges. The ball reflects off
//! the top and bottom walls, speeds up on every return and takes "english"
//! from where it meets the paddle.

use glam::Vec2;

use super::collision::{CollisionShape, ShapeKind, ShapeOwner};
use super::player::PlayerSlot;
use crate::consts::*;
use crate::render::{Color, Draw, Surface};

/// A player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub slot: PlayerSlot,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub shape: CollisionShape,
}

impl Paddle {
    /// Paddle for `slot`, vertically centered on its side of the field
    pub fn new(slot: PlayerSlot, field: Vec2) -> Self {
        let size = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
        let x = match slot {
            PlayerSlot::One => PADDLE_MARGIN,
            PlayerSlot::Two => field.x - PADDLE_MARGIN - size.x,
        };
        let pos = Vec2::new(x, (field.y - size.y) / 2.0);
        Self {
            slot,
            pos,
            size,
            speed: PADDLE_SPEED,
            shape: CollisionShape::new(pos, size, ShapeKind::Player, ShapeOwner::Player(slot)),
        }
    }

    pub fn center(&self) -> Vec2 {
        crate::rect_center(self.pos, self.size)
    }

    /// Move by `dir` (-1 up, 1 down) and stay on the field
    pub fn update(&mut self, dt: f32, dir: f32, field: Vec2) {
        let y = (self.pos.y + dir * self.speed * dt).clamp(0.0, field.y - self.size.y);
        self.pos.y = y;
        self.shape.sync(self.pos);
    }
}

impl Draw for Paddle {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, self.slot.color());
    }
}

/// What the ball did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    None,
    WallBounce,
    /// Crossed the left edge: a point for player two
    PassedLeft,
    /// Crossed the right edge: a point for player one
    PassedRight,
}

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub shape: CollisionShape,
}

impl Ball {
    pub fn new(field: Vec2) -> Self {
        let size = Vec2::splat(BALL_SIZE);
        let pos = (field - size) / 2.0;
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            shape: CollisionShape::new(pos, size, ShapeKind::None, ShapeOwner::Unowned),
        }
    }

    pub fn center(&self) -> Vec2 {
        crate::rect_center(self.pos, self.size)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.shape.sync(pos);
    }

    /// Re-center and launch toward `receiver` at `angle` radians off horizontal
    pub fn serve(&mut self, receiver: PlayerSlot, angle: f32, field: Vec2) {
        self.set_position((field - self.size) / 2.0);
        let dir_x = match receiver {
            PlayerSlot::One => -1.0,
            PlayerSlot::Two => 1.0,
        };
        self.vel = Vec2::new(dir_x * angle.cos(), angle.sin()) * BALL_START_SPEED;
    }

    pub fn update(&mut self, dt: f32, field: Vec2) -> BallEvent {
        self.set_position(self.pos + self.vel * dt);

        if self.pos.x + self.size.x < 0.0 {
            return BallEvent::PassedLeft;
        }
        if self.pos.x > field.x {
            return BallEvent::PassedRight;
        }

        if self.pos.y <= 0.0 {
            self.set_position(Vec2::new(self.pos.x, 0.0));
            self.vel.y = self.vel.y.abs();
            BallEvent::WallBounce
        } else if self.pos.y + self.size.y >= field.y {
            self.set_position(Vec2::new(self.pos.x, field.y - self.size.y));
            self.vel.y = -self.vel.y.abs();
            BallEvent::WallBounce
        } else {
            BallEvent::None
        }
    }

    /// Reflect off `paddle` if touching it while heading its way
    pub fn bounce_off(&mut self, paddle: &Paddle) -> bool {
        let heading_to_paddle = match paddle.slot {
            PlayerSlot::One => self.vel.x < 0.0,
            PlayerSlot::Two => self.vel.x > 0.0,
        };
        if !heading_to_paddle || !self.shape.overlaps(&paddle.shape) {
            return false;
        }

        let speed = (self.speed() * PADDLE_BOOST).min(BALL_MAX_SPEED);
        let half = paddle.size.y / 2.0;
        let offset = ((self.center().y - paddle.center().y) / half).clamp(-1.0, 1.0);
        let dir = Vec2::new(-self.vel.x.signum(), offset * PADDLE_ENGLISH).normalize();
        self.vel = dir * speed;

        let x = match paddle.slot {
            PlayerSlot::One => paddle.shape.right(),
            PlayerSlot::Two => paddle.shape.left() - self.size.x,
        };
        self.set_position(Vec2::new(x, self.pos.y));
        true
    }
}

impl Draw for Ball {
    fn draw(&self, surface: &mut dyn Surface) {
        let c = self.center();
        surface.arc(c.x, c.y, self.size.x / 2.0, Color::TEXT);
    }
}
