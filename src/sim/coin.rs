//! Timer-driven coin placement and proximity pickup
//!
//! A platform's `has_coin` flag is the only guard against stacking two coins on
//! it. When every platform holds a coin the spawn timer is stopped outright and
//! restarted as soon as a coin is picked up.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::IntervalTimer;
use super::platform::Platform;
use super::player::{Player, PlayerSlot};
use crate::consts::*;
use crate::render::{Color, Draw, Surface};

/// A coin resting on a platform
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    /// Host platform id
    pub platform: usize,
    /// Center, refreshed from the host every frame
    pub pos: Vec2,
    pub collected: bool,
}

impl Draw for Coin {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.arc(self.pos.x, self.pos.y, COIN_RADIUS, Color::COIN);
    }
}

/// What happened to coins during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinFrame {
    pub spawned: u32,
    /// Slot of each collector, in pickup order
    pub collected_by: Vec<PlayerSlot>,
}

/// Spawns coins on free platforms and hands them to nearby players
#[derive(Debug, Clone)]
pub struct CoinSpawner {
    pub coins: Vec<Coin>,
    /// Every platform holds a coin and spawning is suspended
    pub platforms_full: bool,
    pub coins_to_win: u32,
    timer: IntervalTimer,
    /// Cleared by `stop`; a stopped spawner never restarts by itself
    active: bool,
    rng: Pcg32,
}

impl CoinSpawner {
    pub fn new(interval_ms: f64, coins_to_win: u32, seed: u64) -> Self {
        Self {
            coins: Vec::new(),
            platforms_full: false,
            coins_to_win,
            timer: IntervalTimer::new(interval_ms),
            active: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.active = true;
        self.platforms_full = false;
        self.timer.start(now_ms);
    }

    /// Cancel the spawn interval; safe to call any number of times
    pub fn stop(&mut self) {
        if self.active {
            log::debug!("Coin spawner stopped ({} coins live)", self.coins.len());
        }
        self.active = false;
        self.timer.stop();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The spawn interval is currently counting
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Run spawn, follow, pickup and reap for one frame
    pub fn update(
        &mut self,
        now_ms: f64,
        platforms: &mut [Platform],
        players: &mut [Player],
    ) -> CoinFrame {
        let mut frame = CoinFrame::default();
        if !self.active {
            return frame;
        }

        self.follow_hosts(platforms);

        while self.timer.fire(now_ms) {
            if self.spawn(platforms) {
                frame.spawned += 1;
            }
            if platforms.iter().all(|p| p.has_coin) {
                self.platforms_full = true;
                self.timer.stop();
                log::debug!("All platforms hold a coin, spawning suspended");
                break;
            }
        }

        self.collect(platforms, players, &mut frame);
        self.coins.retain(|c| !c.collected);

        if self.platforms_full && platforms.iter().any(|p| !p.has_coin) {
            self.platforms_full = false;
            self.timer.start(now_ms);
            log::debug!("Platform freed, spawning resumed");
        }

        frame
    }

    fn follow_hosts(&mut self, platforms: &[Platform]) {
        for coin in &mut self.coins {
            if let Some(host) = platforms.iter().find(|p| p.id == coin.platform) {
                coin.pos = host.coin_anchor();
            }
        }
    }

    /// Place one coin on a uniformly chosen free platform
    fn spawn(&mut self, platforms: &mut [Platform]) -> bool {
        let free: Vec<usize> = platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.has_coin)
            .map(|(i, _)| i)
            .collect();
        if free.is_empty() {
            return false;
        }

        let host = &mut platforms[free[self.rng.random_range(0..free.len())]];
        host.has_coin = true;
        self.coins.push(Coin {
            platform: host.id,
            pos: host.coin_anchor(),
            collected: false,
        });
        log::debug!("Coin spawned on platform {}", host.id);
        true
    }

    fn collect(
        &mut self,
        platforms: &mut [Platform],
        players: &mut [Player],
        frame: &mut CoinFrame,
    ) {
        let reach = COIN_RADIUS + PLAYER_PICKUP_RADIUS;
        for coin in &mut self.coins {
            for player in players.iter_mut() {
                if player.is_dead || coin.pos.distance(player.center()) >= reach {
                    continue;
                }
                coin.collected = true;
                if let Some(host) = platforms.iter_mut().find(|p| p.id == coin.platform) {
                    host.has_coin = false;
                }
                player.coins += 1;
                if player.coins >= self.coins_to_win {
                    player.has_won = true;
                }
                frame.collected_by.push(player.slot);
                break;
            }
        }
    }
}

impl Draw for CoinSpawner {
    fn draw(&self, surface: &mut dyn Surface) {
        for coin in &self.coins {
            coin.draw(surface);
        }
    }
}
