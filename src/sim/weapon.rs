//! Weapons and the projectiles they own
//!
//! A weapon is a cooldown-gated spawner. It owns every projectile it fires,
//! moves them, tests them against the opposing player and drops the dead ones
//! once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionShape, Hittable, ShapeKind, ShapeOwner};
use super::platform::Platform;
use crate::render::{Color, Draw, Surface};

/// Weapon catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Blaster,
    Mine,
}

/// Static weapon stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub name: &'static str,
    /// Minimum gap between shots (ms, wall clock)
    pub cooldown_ms: f64,
    pub damage: f32,
    /// Pixels/s; zero for stationary ordnance
    pub projectile_speed: f32,
    /// Edge length of the square projectile
    pub projectile_size: f32,
    pub color: Color,
    /// Wall-clock lifespan; `None` flies until it leaves the field or hits
    pub lifetime_ms: Option<f64>,
}

impl WeaponKind {
    pub fn spec(self) -> WeaponSpec {
        match self {
            WeaponKind::Pistol => WeaponSpec {
                name: "Pistol",
                cooldown_ms: 300.0,
                damage: 8.0,
                projectile_speed: 620.0,
                projectile_size: 6.0,
                color: Color::rgb(253, 224, 71),
                lifetime_ms: None,
            },
            WeaponKind::Rifle => WeaponSpec {
                name: "Rifle",
                cooldown_ms: 900.0,
                damage: 20.0,
                projectile_speed: 1100.0,
                projectile_size: 5.0,
                color: Color::rgb(165, 243, 252),
                lifetime_ms: None,
            },
            WeaponKind::Blaster => WeaponSpec {
                name: "Blaster",
                cooldown_ms: 1400.0,
                damage: 30.0,
                projectile_speed: 300.0,
                projectile_size: 14.0,
                color: Color::rgb(251, 146, 60),
                lifetime_ms: None,
            },
            WeaponKind::Mine => WeaponSpec {
                name: "Mine",
                cooldown_ms: 2500.0,
                damage: 35.0,
                projectile_speed: 0.0,
                projectile_size: 12.0,
                color: Color::rgb(239, 68, 68),
                lifetime_ms: Some(8000.0),
            },
        }
    }

    /// Ordnance that sits where it was dropped instead of flying
    pub fn is_stationary(self) -> bool {
        self == WeaponKind::Mine
    }
}

/// Direction a player faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// How a projectile moves each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Integrates its own velocity
    Free,
    /// Rides the platform with this id
    Attached(usize),
    /// Lies on the floor
    Resting,
}

/// Where a shot leaves the shooter
#[derive(Debug, Clone, Copy)]
pub struct ShotOrigin {
    /// Front edge of the shooter, at chest height
    pub muzzle: Vec2,
    /// Bottom center of the shooter
    pub feet: Vec2,
    pub facing: Facing,
    /// Platform the shooter stands on, if any
    pub platform: Option<usize>,
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub valid: bool,
    pub motion: Motion,
    pub expires_at: Option<f64>,
    pub color: Color,
    pub shape: CollisionShape,
}

impl Projectile {
    fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, motion: Motion) -> Self {
        let size = Vec2::splat(size);
        Self {
            id,
            pos,
            vel,
            size,
            valid: true,
            motion,
            expires_at: None,
            color: Color::TEXT,
            shape: CollisionShape::new(
                pos,
                size,
                ShapeKind::Projectile,
                ShapeOwner::Projectile(id),
            ),
        }
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Move one frame according to the motion mode
    pub fn advance(&mut self, dt: f32, platforms: &[Platform]) {
        match self.motion {
            Motion::Free => self.pos += self.vel * dt,
            Motion::Attached(id) => {
                if let Some(platform) = platforms.iter().find(|p| p.id == id) {
                    self.pos += platform.last_delta;
                }
            }
            Motion::Resting => {}
        }
        self.shape.sync(self.pos);
    }

    /// Entirely outside the play field
    pub fn out_of_bounds(&self, field: Vec2) -> bool {
        self.pos.x + self.size.x < 0.0
            || self.pos.x > field.x
            || self.pos.y + self.size.y < 0.0
            || self.pos.y > field.y
    }

    /// Damage `victim` on contact and invalidate; returns damage applied
    pub fn check_hit<T: Hittable + ?Sized>(&mut self, victim: &mut T, damage: f32) -> Option<f32> {
        if !self.valid {
            return None;
        }
        let dealt = self.shape.check_bullet_collision(victim, damage);
        if dealt.is_some() {
            self.invalidate();
        }
        dealt
    }
}

impl Draw for Projectile {
    fn draw(&self, surface: &mut dyn Surface) {
        match self.motion {
            Motion::Free => {
                surface.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, self.color)
            }
            Motion::Attached(_) | Motion::Resting => {
                let c = crate::rect_center(self.pos, self.size);
                surface.arc(c.x, c.y, self.size.x / 2.0, self.color);
            }
        }
    }
}

/// Hits landed by one weapon during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitReport {
    pub hits: u32,
    pub damage: f32,
}

impl std::ops::AddAssign for HitReport {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.damage += rhs.damage;
    }
}

/// A weapon and its live projectiles
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub spec: WeaponSpec,
    pub last_fired: Option<f64>,
    pub projectiles: Vec<Projectile>,
    pub shots_fired: u32,
    next_id: u32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            spec: kind.spec(),
            last_fired: None,
            projectiles: Vec::new(),
            shots_fired: 0,
            next_id: 1,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Still cooling down at `now_ms`
    pub fn on_cooldown(&self, now_ms: f64) -> bool {
        self.last_fired
            .is_some_and(|last| now_ms - last < self.spec.cooldown_ms)
    }

    /// Fire once if the cooldown has elapsed; returns whether a projectile spawned
    pub fn shoot(&mut self, now_ms: f64, origin: ShotOrigin) -> bool {
        if self.on_cooldown(now_ms) {
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;
        let size = self.spec.projectile_size;

        let mut projectile = if self.kind.is_stationary() {
            let pos = origin.feet - Vec2::new(size / 2.0, size);
            let motion = match origin.platform {
                Some(platform) => Motion::Attached(platform),
                None => Motion::Resting,
            };
            Projectile::new(id, pos, Vec2::ZERO, size, motion)
        } else {
            let pos = origin.muzzle - Vec2::splat(size / 2.0);
            let vel = Vec2::new(self.spec.projectile_speed * origin.facing.sign(), 0.0);
            Projectile::new(id, pos, vel, size, Motion::Free)
        };
        projectile.color = self.spec.color;
        projectile.expires_at = self.spec.lifetime_ms.map(|life| now_ms + life);

        self.projectiles.push(projectile);
        self.last_fired = Some(now_ms);
        self.shots_fired += 1;
        true
    }

    /// Advance projectiles, apply hits to `opponent`, reap invalid ones
    pub fn update<T: Hittable + ?Sized>(
        &mut self,
        dt: f32,
        now_ms: f64,
        platforms: &[Platform],
        opponent: &mut T,
        field: Vec2,
    ) -> HitReport {
        let mut report = HitReport::default();
        let damage = self.spec.damage;

        for projectile in &mut self.projectiles {
            projectile.advance(dt, platforms);
            if projectile.out_of_bounds(field) || projectile.expires_at.is_some_and(|t| now_ms >= t)
            {
                projectile.invalidate();
                continue;
            }
            if let Some(dealt) = projectile.check_hit(opponent, damage) {
                report.hits += 1;
                report.damage += dealt;
                log::debug!("{} hit for {:.1}", self.spec.name, dealt);
            }
        }

        self.projectiles.retain(|p| p.valid);
        report
    }
}

impl Draw for Weapon {
    fn draw(&self, surface: &mut dyn Surface) {
        for projectile in &self.projectiles {
            projectile.draw(surface);
        }
    }
}
