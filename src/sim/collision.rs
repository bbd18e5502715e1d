//! Collision shapes and classification
//!
//! Every physical entity owns exactly one axis-aligned box. Classification is
//! discrete: it samples the box at the previous and current frame only, so a
//! body moving further than a platform's thickness in one frame can pass
//! through it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerSlot;
use crate::rects_overlap;

/// What kind of body a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Player,
    Platform,
    /// Landing surface that is only solid from above
    FallingEdge,
    Projectile,
    None,
}

/// Non-owning back-reference from a shape to the entity that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeOwner {
    Player(PlayerSlot),
    /// Index into the match's platform list
    Platform(usize),
    /// Projectile id (unique per weapon)
    Projectile(u32),
    Unowned,
}

/// Result of classifying a moving shape against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    None,
    /// Generic overlap (side or bottom push)
    Solid,
    /// Moving body came down onto the target's top edge this frame
    FallingEdge,
}

/// Axis-aligned collision box, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ShapeKind,
    pub owner: ShapeOwner,
}

impl CollisionShape {
    pub fn new(pos: Vec2, size: Vec2, kind: ShapeKind, owner: ShapeOwner) -> Self {
        Self {
            pos,
            size,
            kind,
            owner,
        }
    }

    /// Move the shape to its owner's new position
    #[inline]
    pub fn sync(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        crate::rect_center(self.pos, self.size)
    }

    /// Horizontal extents intersect
    #[inline]
    pub fn overlaps_horizontally(&self, other: &CollisionShape) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Full four-sided overlap test
    #[inline]
    pub fn overlaps(&self, other: &CollisionShape) -> bool {
        rects_overlap(self.pos, self.size, other.pos, other.size)
    }

    /// Classify this (moving) shape against `other`
    ///
    /// `previous` is this shape's top-left position on the previous frame.
    pub fn check_collision(&self, other: &CollisionShape, previous: Vec2) -> CollisionKind {
        if !self.overlaps_horizontally(other) {
            return CollisionKind::None;
        }

        let previous_bottom = previous.y + self.size.y;
        let bottom = self.bottom();
        if previous_bottom <= other.top() && bottom >= other.top() && bottom <= other.bottom() {
            return CollisionKind::FallingEdge;
        }

        if self.overlaps(other) {
            CollisionKind::Solid
        } else {
            CollisionKind::None
        }
    }

    /// Damage-dealing overlap test for a projectile against a player
    ///
    /// Returns the damage actually applied, or `None` when the pair is not a
    /// (projectile, player) pair or the boxes do not touch. The caller is
    /// responsible for invalidating the projectile on a hit.
    pub fn check_bullet_collision<T: Hittable + ?Sized>(
        &self,
        other: &mut T,
        damage: f32,
    ) -> Option<f32> {
        if self.kind != ShapeKind::Projectile || other.shape().kind != ShapeKind::Player {
            return None;
        }
        if !self.overlaps(other.shape()) {
            return None;
        }
        Some(other.take_damage(damage))
    }
}

/// A body that projectiles can damage
pub trait Hittable {
    fn shape(&self) -> &CollisionShape;
    /// Apply damage, returning how much health was actually removed
    fn take_damage(&mut self, amount: f32) -> f32;
}
