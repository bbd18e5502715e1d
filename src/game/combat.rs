//! Platform-combat match controller
//!
//! Per frame: platforms move, players act and integrate, weapons resolve hits
//! against the opposing player, coins spawn and get picked up. A match ends on
//! a KO or when a player reaches the coin threshold.

use glam::Vec2;

use super::context::{User, UserId};
use super::match_state::MatchController;
use super::outcome::{GameMode, MatchOutcome, StatSnapshot, StatTracker, WinMethod};
use super::state::Frame;
use crate::consts::*;
use crate::render::{Color, Draw, Surface};
use crate::settings::{PhysicsTuning, Settings};
use crate::sim::{CoinSpawner, ControlBindings, Platform, Player, PlayerSlot, arena_layout};

pub struct PlatformMatch {
    pub names: [String; 2],
    pub ids: [UserId; 2],
    pub players: [Player; 2],
    pub platforms: Vec<Platform>,
    pub coins: CoinSpawner,
    pub stats: StatTracker,
    tuning: PhysicsTuning,
    field: Vec2,
    started_at: f64,
}

impl PlatformMatch {
    fn snapshot(&self) -> [StatSnapshot; 2] {
        self.players.each_ref().map(|p| StatSnapshot {
            health: p.health,
            coins: p.coins,
            shots: p.shots_fired(),
            ..Default::default()
        })
    }

    /// Winner and method if the match is decided
    ///
    /// A KO outranks an economy win. When both players meet the same
    /// condition in one frame, damage dealt (KO) or coins then health
    /// (economy) decide, and player one takes an exact tie.
    pub fn decide(&self) -> Option<(PlayerSlot, WinMethod)> {
        let [one, two] = &self.players;
        let favor_one = |a: f32, b: f32| if a >= b { PlayerSlot::One } else { PlayerSlot::Two };

        match (one.is_dead, two.is_dead) {
            (false, true) => return Some((PlayerSlot::One, WinMethod::Ko)),
            (true, false) => return Some((PlayerSlot::Two, WinMethod::Ko)),
            (true, true) => {
                let dealt_one = self.stats.line(PlayerSlot::One).damage_dealt;
                let dealt_two = self.stats.line(PlayerSlot::Two).damage_dealt;
                return Some((favor_one(dealt_one, dealt_two), WinMethod::Ko));
            }
            (false, false) => {}
        }

        match (one.has_won, two.has_won) {
            (true, false) => Some((PlayerSlot::One, WinMethod::Economy)),
            (false, true) => Some((PlayerSlot::Two, WinMethod::Economy)),
            (true, true) => {
                let slot = if one.coins != two.coins {
                    favor_one(one.coins as f32, two.coins as f32)
                } else {
                    favor_one(one.health, two.health)
                };
                Some((slot, WinMethod::Economy))
            }
            (false, false) => None,
        }
    }
}

impl MatchController for PlatformMatch {
    const MODE: GameMode = GameMode::PlatformCombat;

    fn begin(users: [User; 2], settings: &Settings, now_ms: f64) -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        let floor = field.y - PLAYER_HEIGHT;
        let mut players = [
            Player::new(
                PlayerSlot::One,
                Vec2::new(80.0, floor),
                ControlBindings::player_one(),
                settings.loadout,
            ),
            Player::new(
                PlayerSlot::Two,
                Vec2::new(field.x - 80.0 - PLAYER_WIDTH, floor),
                ControlBindings::player_two(),
                settings.loadout,
            ),
        ];
        for player in &mut players {
            player.on_ground = true;
        }

        let mut coins = CoinSpawner::new(
            settings.coin_spawn_interval_ms,
            settings.coins_to_win,
            settings.seed ^ users[0].id.rotate_left(17) ^ users[1].id,
        );
        coins.start(now_ms);

        let [a, b] = users;
        Self {
            ids: [a.id, b.id],
            names: [a.name, b.name],
            players,
            platforms: arena_layout(),
            coins,
            stats: StatTracker::new(),
            tuning: settings.physics.clone(),
            field,
            started_at: now_ms,
        }
    }

    fn step(&mut self, frame: &Frame) -> Option<MatchOutcome> {
        let before = self.snapshot();
        let (dt, now) = (frame.dt, frame.now_ms);

        for platform in &mut self.platforms {
            platform.update(dt, self.field);
        }

        for player in &mut self.players {
            let input = player.controls.read(frame.keys);
            if input.switch_weapon {
                player.switch_weapon();
            }
            player.update(dt, &input, &self.platforms, &self.tuning, self.field);
            if input.shoot && !player.is_dead {
                player.shoot(now);
            }
        }

        let [one, two] = &mut self.players;
        let landed_one = one.update_weapons(dt, now, &self.platforms, two, self.field);
        let landed_two = two.update_weapons(dt, now, &self.platforms, one, self.field);

        self.coins.update(now, &mut self.platforms, &mut self.players);

        self.stats.apply(before, self.snapshot());
        self.stats.record_hits(PlayerSlot::One, landed_one.hits);
        self.stats.record_hits(PlayerSlot::Two, landed_two.hits);

        let (winner, method) = self.decide()?;
        Some(self.stats.outcome(
            Self::MODE,
            self.ids,
            winner,
            method,
            0,
            now - self.started_at,
        ))
    }

    fn halt(&mut self) {
        self.coins.stop();
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(0.0, self.field.y - 4.0, self.field.x, 4.0, Color::GROUND);
        for platform in &self.platforms {
            platform.draw(surface);
        }
        self.coins.draw(surface);
        for player in &self.players {
            player.draw(surface);
        }

        for (i, player) in self.players.iter().enumerate() {
            let x = if i == 0 { 20.0 } else { self.field.x - 260.0 };
            let hud = format!(
                "{}  HP {:.0}  Coins {}/{}  {}",
                self.names[i],
                player.health,
                player.coins,
                self.coins.coins_to_win,
                player.weapon().name()
            );
            surface.fill_text(&hud, x, 24.0, 16.0, player.slot.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{KeyState, WeaponKind};

    fn users() -> [User; 2] {
        [User::new(1, "one"), User::new(2, "two")]
    }

    fn frame<'a>(keys: &'a KeyState, now_ms: f64) -> Frame<'a> {
        Frame {
            dt: 1.0 / 60.0,
            now_ms,
            keys,
        }
    }

    #[test]
    fn test_begin_places_players_on_floor() {
        let m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        for p in &m.players {
            assert!(p.on_ground);
            assert_eq!(p.pos.y, FIELD_HEIGHT - PLAYER_HEIGHT);
        }
        assert!(m.coins.is_active());
    }

    #[test]
    fn test_shots_are_counted_in_stats() {
        let mut m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        let mut keys = KeyState::new();
        keys.press("f");
        // 1 second of holding fire with a 300ms pistol: shots at 0, 300, 600, 900
        for i in 0..60 {
            let now = i as f64 * 1000.0 / 60.0;
            assert!(m.step(&frame(&keys, now)).is_none());
            keys.end_frame();
        }
        assert_eq!(m.stats.line(PlayerSlot::One).shots_fired, 4);
        assert_eq!(m.stats.line(PlayerSlot::Two).shots_fired, 0);
    }

    #[test]
    fn test_pistol_duel_on_floor_damages_opponent() {
        let mut m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        let mut keys = KeyState::new();
        keys.press("f");
        for i in 0..120 {
            m.step(&frame(&keys, i as f64 * 1000.0 / 60.0));
            keys.end_frame();
        }
        let (one, two) = (m.stats.line(PlayerSlot::One), m.stats.line(PlayerSlot::Two));
        assert!(two.damage_taken > 0.0);
        assert_eq!(two.damage_taken, one.damage_dealt);
        assert_eq!(m.players[1].health, MAX_HEALTH - two.damage_taken);
        // Every pistol hit is worth its full damage on a healthy target
        assert!(one.hits > 0);
        assert_eq!(one.damage_dealt, one.hits as f32 * WeaponKind::Pistol.spec().damage);
        assert_eq!(two.hits, 0);
    }

    #[test]
    fn test_economy_win() {
        let mut m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        m.players[1].coins = 10;
        m.players[1].has_won = true;
        let keys = KeyState::new();
        let outcome = m.step(&frame(&keys, 16.0)).unwrap();
        assert_eq!(outcome.win_method, WinMethod::Economy);
        assert_eq!(outcome.winner_id, 2);
    }

    #[test]
    fn test_double_ko_goes_to_bigger_hitter() {
        let mut m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        let before = m.snapshot();
        m.players[0].apply_damage(30.0);
        m.stats.apply(before, m.snapshot());
        m.players[0].apply_damage(100.0);
        m.players[1].apply_damage(100.0);
        assert_eq!(m.decide(), Some((PlayerSlot::Two, WinMethod::Ko)));
    }

    #[test]
    fn test_halt_stops_coin_timer_twice() {
        let mut m = PlatformMatch::begin(users(), &Settings::default(), 0.0);
        m.halt();
        m.halt();
        assert!(!m.coins.is_active());
        assert!(!m.coins.timer_running());
    }
}
