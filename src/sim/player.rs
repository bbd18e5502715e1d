//! Player body for platform combat
//!
//! Both players are the same type; only their control bindings and spawn
//! facing differ. Every position change goes through `set_position` so the
//! collision shape is never stale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionKind, CollisionShape, Hittable, ShapeKind, ShapeOwner};
use super::input::{ControlBindings, ControlInput};
use super::platform::{Oscillation, Platform};
use super::weapon::{Facing, HitReport, ShotOrigin, Weapon, WeaponKind};
use crate::consts::*;
use crate::render::{Color, Draw, Surface};
use crate::settings::PhysicsTuning;

/// Which side of a duel a player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    pub fn color(self) -> Color {
        match self {
            PlayerSlot::One => Color::PLAYER_ONE,
            PlayerSlot::Two => Color::PLAYER_TWO,
        }
    }
}

/// A combatant
#[derive(Debug, Clone)]
pub struct Player {
    pub slot: PlayerSlot,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub on_ground: bool,
    /// Platform id this player is standing on (not owned)
    pub carried_by: Option<usize>,
    pub weapons: [Weapon; 2],
    pub current_weapon: usize,
    pub coins: u32,
    pub is_dead: bool,
    pub has_won: bool,
    pub facing: Facing,
    pub controls: ControlBindings,
    pub shape: CollisionShape,
}

impl Player {
    pub fn new(
        slot: PlayerSlot,
        spawn: Vec2,
        controls: ControlBindings,
        loadout: [WeaponKind; 2],
    ) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let facing = match slot {
            PlayerSlot::One => Facing::Right,
            PlayerSlot::Two => Facing::Left,
        };
        Self {
            slot,
            pos: spawn,
            vel: Vec2::ZERO,
            size,
            health: MAX_HEALTH,
            on_ground: false,
            carried_by: None,
            weapons: [Weapon::new(loadout[0]), Weapon::new(loadout[1])],
            current_weapon: 0,
            coins: 0,
            is_dead: false,
            has_won: false,
            facing,
            controls,
            shape: CollisionShape::new(spawn, size, ShapeKind::Player, ShapeOwner::Player(slot)),
        }
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.shape.sync(pos);
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.pos + delta);
    }

    pub fn center(&self) -> Vec2 {
        crate::rect_center(self.pos, self.size)
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.current_weapon]
    }

    pub fn switch_weapon(&mut self) {
        self.current_weapon = (self.current_weapon + 1) % self.weapons.len();
        log::debug!("{:?} switched to {}", self.slot, self.weapon().name());
    }

    /// Shots fired across both weapons
    pub fn shots_fired(&self) -> u32 {
        self.weapons.iter().map(|w| w.shots_fired).sum()
    }

    /// Fire the current weapon; returns whether a projectile spawned
    pub fn shoot(&mut self, now_ms: f64) -> bool {
        let center = self.center();
        let origin = ShotOrigin {
            muzzle: Vec2::new(center.x + self.facing.sign() * self.size.x / 2.0, center.y - 6.0),
            feet: Vec2::new(center.x, self.pos.y + self.size.y),
            facing: self.facing,
            platform: if self.on_ground { self.carried_by } else { None },
        };
        let current = self.current_weapon;
        self.weapons[current].shoot(now_ms, origin)
    }

    /// Remove health, never below zero; returns how much was removed
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        if self.is_dead || amount <= 0.0 {
            return 0.0;
        }
        let dealt = amount.min(self.health);
        self.health = (self.health - dealt).clamp(0.0, MAX_HEALTH);
        if self.health <= 0.0 {
            self.health = 0.0;
            self.is_dead = true;
            log::info!("{:?} is down", self.slot);
        }
        dealt
    }

    /// Apply input and integrate one frame of physics
    ///
    /// Platforms must already have been updated this frame: ride-along uses
    /// their `last_delta`.
    pub fn update(
        &mut self,
        dt: f32,
        input: &ControlInput,
        platforms: &[Platform],
        tuning: &PhysicsTuning,
        field: Vec2,
    ) {
        if self.is_dead {
            return;
        }
        let previous = self.pos;

        let dir = input.horizontal();
        if dir < 0.0 {
            self.facing = Facing::Left;
        } else if dir > 0.0 {
            self.facing = Facing::Right;
        }
        self.vel.x = dir * tuning.move_speed;

        if input.up && self.on_ground {
            self.vel.y = -tuning.jump_velocity;
            self.on_ground = false;
            self.carried_by = None;
        }

        let riding = self
            .carried_by
            .filter(|_| self.on_ground)
            .and_then(|id| platforms.iter().find(|p| p.id == id));

        match riding {
            Some(platform) => {
                let step = if dir == 0.0 {
                    platform.last_delta
                } else if platform.axis == Oscillation::Vertical {
                    Vec2::new(self.vel.x * dt, platform.last_delta.y)
                } else {
                    Vec2::new(self.vel.x * dt, 0.0)
                };
                self.translate(step);
                self.set_position(Vec2::new(self.pos.x, platform.pos.y - self.size.y));
                self.vel.y = 0.0;
            }
            None => {
                if !self.on_ground {
                    self.vel.y += tuning.gravity * dt;
                }
                self.translate(self.vel * dt);
            }
        }

        self.resolve_ground(field);
        self.resolve_walls(field);
        self.check_platform_departure(platforms);
        self.resolve_platforms(platforms, previous);
    }

    fn resolve_ground(&mut self, field: Vec2) {
        if self.pos.y + self.size.y >= field.y {
            self.set_position(Vec2::new(self.pos.x, field.y - self.size.y));
            self.vel.y = 0.0;
            self.on_ground = true;
            self.carried_by = None;
        }
    }

    fn resolve_walls(&mut self, field: Vec2) {
        let max_x = field.x - self.size.x;
        if self.pos.x < 0.0 || self.pos.x > max_x {
            self.set_position(Vec2::new(self.pos.x.clamp(0.0, max_x), self.pos.y));
            self.vel.x = 0.0;
        }
    }

    fn check_platform_departure(&mut self, platforms: &[Platform]) {
        let Some(id) = self.carried_by else {
            return;
        };
        let still_over = platforms
            .iter()
            .find(|p| p.id == id)
            .is_some_and(|p| self.shape.overlaps_horizontally(&p.shape));
        if !still_over {
            self.carried_by = None;
            self.on_ground = false;
        }
    }

    fn resolve_platforms(&mut self, platforms: &[Platform], previous: Vec2) {
        if self.carried_by.is_some() {
            return;
        }
        for platform in platforms {
            // Previous position in the platform's frame, so a lift rising
            // into a falling body still reads as a landing
            let relative = previous + Vec2::new(0.0, platform.last_delta.y);
            match self.shape.check_collision(&platform.shape, relative) {
                CollisionKind::FallingEdge if self.vel.y >= 0.0 => {
                    self.set_position(Vec2::new(self.pos.x, platform.pos.y - self.size.y));
                    self.vel.y = 0.0;
                    self.on_ground = true;
                    self.carried_by = Some(platform.id);
                    return;
                }
                CollisionKind::FallingEdge | CollisionKind::Solid => {
                    self.push_out_of(platform, previous);
                }
                CollisionKind::None => {}
            }
        }
    }

    /// Separate from a platform we ran or jumped into
    fn push_out_of(&mut self, platform: &Platform, previous: Vec2) {
        if self.vel.y < 0.0 && previous.y >= platform.shape.bottom() - 1.0 {
            self.set_position(Vec2::new(self.pos.x, platform.shape.bottom()));
            self.vel.y = 0.0;
            return;
        }
        let x = if self.center().x < platform.shape.center().x {
            platform.shape.left() - self.size.x
        } else {
            platform.shape.right()
        };
        self.set_position(Vec2::new(x, self.pos.y));
        self.vel.x = 0.0;
    }

    /// Move projectiles of both weapons and apply their hits to `opponent`
    pub fn update_weapons(
        &mut self,
        dt: f32,
        now_ms: f64,
        platforms: &[Platform],
        opponent: &mut Player,
        field: Vec2,
    ) -> HitReport {
        let mut report = HitReport::default();
        for weapon in &mut self.weapons {
            report += weapon.update(dt, now_ms, platforms, opponent, field);
        }
        report
    }
}

impl Hittable for Player {
    fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    fn take_damage(&mut self, amount: f32) -> f32 {
        self.apply_damage(amount)
    }
}

impl Draw for Player {
    fn draw(&self, surface: &mut dyn Surface) {
        let color = if self.is_dead { Color::GROUND } else { self.slot.color() };
        surface.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, color);

        let bar = self.size.x * (self.health / MAX_HEALTH);
        surface.fill_rect(self.pos.x, self.pos.y - 8.0, self.size.x, 4.0, Color::GROUND);
        surface.fill_rect(self.pos.x, self.pos.y - 8.0, bar, 4.0, Color::HEALTH);

        for weapon in &self.weapons {
            weapon.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(
            PlayerSlot::One,
            pos,
            ControlBindings::player_one(),
            [WeaponKind::Pistol, WeaponKind::Mine],
        )
    }

    fn idle() -> ControlInput {
        ControlInput::default()
    }

    /// Drop a player onto `platform` and let it settle
    fn land_on(player: &mut Player, platforms: &mut [Platform]) {
        for _ in 0..120 {
            for p in platforms.iter_mut() {
                p.update(DT, field());
            }
            player.update(DT, &idle(), platforms, &PhysicsTuning::default(), field());
            if player.carried_by.is_some() {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_falls_to_floor() {
        let mut player = player_at(Vec2::new(100.0, 100.0));
        for _ in 0..240 {
            player.update(DT, &idle(), &[], &PhysicsTuning::default(), field());
        }
        assert!(player.on_ground);
        assert_eq!(player.pos.y, FIELD_HEIGHT - PLAYER_HEIGHT);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_walls_clamp_and_stop() {
        let mut player = player_at(Vec2::new(2.0, FIELD_HEIGHT - PLAYER_HEIGHT));
        let left = ControlInput {
            left: true,
            ..Default::default()
        };
        player.update(DT, &left, &[], &PhysicsTuning::default(), field());
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_lands_on_platform_from_above() {
        let mut platforms = vec![Platform::stationary(0, Vec2::new(50.0, 300.0))];
        let mut player = player_at(Vec2::new(80.0, 200.0));
        land_on(&mut player, &mut platforms);
        assert!(player.on_ground);
        assert_eq!(player.carried_by, Some(0));
        assert_eq!(player.pos.y, 300.0 - PLAYER_HEIGHT);
    }

    #[test]
    fn test_walking_off_platform_detaches() {
        let mut platforms = vec![Platform::stationary(0, Vec2::new(50.0, 300.0))];
        let mut player = player_at(Vec2::new(60.0, 200.0));
        land_on(&mut player, &mut platforms);

        let left = ControlInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..30 {
            player.update(DT, &left, &platforms, &PhysicsTuning::default(), field());
        }
        assert_eq!(player.carried_by, None);
        assert!(player.pos.y > 300.0 - PLAYER_HEIGHT);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut player = player_at(Vec2::new(100.0, 100.0));
        let jump = ControlInput {
            up: true,
            ..Default::default()
        };
        player.update(DT, &jump, &[], &PhysicsTuning::default(), field());
        assert!(player.vel.y > 0.0, "mid-air jump must not fire");

        let mut grounded = player_at(Vec2::new(100.0, FIELD_HEIGHT - PLAYER_HEIGHT));
        grounded.on_ground = true;
        grounded.update(DT, &jump, &[], &PhysicsTuning::default(), field());
        assert!(grounded.vel.y < 0.0);
        assert!(!grounded.on_ground);
    }

    #[test]
    fn test_vertical_lift_carries_player_while_walking() {
        let mut platforms = vec![Platform::new(
            0,
            Vec2::new(300.0, 300.0),
            Oscillation::Vertical,
            60.0,
            50.0,
        )];
        let mut player = player_at(Vec2::new(330.0, 200.0));
        land_on(&mut player, &mut platforms);

        let right = ControlInput {
            right: true,
            ..Default::default()
        };
        platforms[0].update(DT, field());
        player.update(DT, &right, &platforms, &PhysicsTuning::default(), field());
        assert_eq!(player.pos.y, platforms[0].pos.y - PLAYER_HEIGHT);
        assert_eq!(player.carried_by, Some(0));
    }

    #[test]
    fn test_lands_on_rising_lift() {
        let mut platforms = vec![Platform::new(
            0,
            Vec2::new(300.0, 300.0),
            Oscillation::Vertical,
            60.0,
            -50.0,
        )];
        platforms[0].update(DT, field());
        let top = platforms[0].pos.y;
        assert!(top < 300.0);

        // Previous bottom sits between the lift's old and new top
        let mut player = player_at(Vec2::new(330.0, 299.5 - PLAYER_HEIGHT));
        player.vel.y = 300.0;
        player.update(DT, &idle(), &platforms, &PhysicsTuning::default(), field());

        assert_eq!(player.carried_by, Some(0));
        assert!(player.on_ground);
        assert_eq!(player.pos.x, 330.0);
        assert_eq!(player.pos.y, top - PLAYER_HEIGHT);
    }

    #[test]
    fn test_damage_clamps_and_kills_once() {
        let mut player = player_at(Vec2::ZERO);
        assert_eq!(player.apply_damage(60.0), 60.0);
        assert_eq!(player.apply_damage(60.0), 40.0);
        assert!(player.is_dead);
        assert_eq!(player.health, 0.0);
        assert_eq!(player.apply_damage(10.0), 0.0);
        assert_eq!(player.health, 0.0);
    }

    #[test]
    fn test_shape_synced_after_update() {
        let mut player = player_at(Vec2::new(100.0, 100.0));
        player.update(DT, &idle(), &[], &PhysicsTuning::default(), field());
        assert_eq!(player.shape.pos, player.pos);
    }

    #[test]
    fn test_switch_weapon_cycles() {
        let mut player = player_at(Vec2::ZERO);
        assert_eq!(player.weapon().kind, WeaponKind::Pistol);
        player.switch_weapon();
        assert_eq!(player.weapon().kind, WeaponKind::Mine);
        player.switch_weapon();
        assert_eq!(player.weapon().kind, WeaponKind::Pistol);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(hits in proptest::collection::vec(-20.0f32..80.0, 0..40)) {
            let mut player = player_at(Vec2::ZERO);
            let mut deaths = 0;
            for hit in hits {
                let was_dead = player.is_dead;
                player.apply_damage(hit);
                prop_assert!(player.health >= 0.0 && player.health <= MAX_HEALTH);
                if player.is_dead && !was_dead {
                    deaths += 1;
                }
                prop_assert!(player.is_dead == (player.health == 0.0));
            }
            prop_assert!(deaths <= 1);
        }

        #[test]
        fn prop_ride_along_matches_platform(speed in 20.0f32..120.0, frames in 1usize..90) {
            let mut platforms = vec![Platform::new(
                0,
                Vec2::new(400.0, 300.0),
                Oscillation::Horizontal,
                60.0,
                speed,
            )];
            let mut player = player_at(Vec2::new(450.0, 300.0 - PLAYER_HEIGHT));
            player.on_ground = true;
            player.carried_by = Some(0);
            for _ in 0..frames {
                platforms[0].update(DT, field());
                let before = player.pos.x;
                player.update(DT, &idle(), &platforms, &PhysicsTuning::default(), field());
                prop_assert!((player.pos.x - before - platforms[0].last_delta.x).abs() < 1e-3);
                prop_assert_eq!(player.carried_by, Some(0));
            }
        }
    }
}
