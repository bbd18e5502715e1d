//! Paddle-ball match controller

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::context::{User, UserId};
use super::match_state::MatchController;
use super::outcome::{GameMode, MatchOutcome, StatSnapshot, StatTracker, WinMethod};
use super::state::Frame;
use crate::consts::*;
use crate::render::{Color, Draw, Surface};
use crate::settings::Settings;
use crate::sim::{Ball, BallEvent, ControlBindings, Paddle, PlayerSlot};

/// Largest serve angle off horizontal (radians)
const MAX_SERVE_ANGLE: f32 = 0.35;

pub struct PaddleMatch {
    pub names: [String; 2],
    pub ids: [UserId; 2],
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub scores: [u32; 2],
    pub returns: [u32; 2],
    pub stats: StatTracker,
    controls: [ControlBindings; 2],
    /// Returns in the point being played
    rally: u32,
    longest_rally: u32,
    points_to_win: u32,
    rng: Pcg32,
    field: Vec2,
    started_at: f64,
}

impl PaddleMatch {
    fn snapshot(&self) -> [StatSnapshot; 2] {
        [0usize, 1].map(|i| StatSnapshot {
            health: MAX_HEALTH,
            points: self.scores[i],
            returns: self.returns[i],
            ..Default::default()
        })
    }

    fn serve(&mut self, receiver: PlayerSlot) {
        let angle = self.rng.random_range(-MAX_SERVE_ANGLE..=MAX_SERVE_ANGLE);
        self.ball.serve(receiver, angle, self.field);
        self.rally = 0;
    }

    fn score(&mut self, scorer: PlayerSlot) {
        self.scores[scorer.index()] += 1;
        self.longest_rally = self.longest_rally.max(self.rally);
        log::debug!(
            "{:?} scores ({}-{}) after a rally of {}",
            scorer,
            self.scores[0],
            self.scores[1],
            self.rally
        );
        // The player who conceded receives the next serve
        self.serve(scorer.other());
    }

    pub fn longest_rally(&self) -> u32 {
        self.longest_rally.max(self.rally)
    }

    fn leader(&self) -> Option<PlayerSlot> {
        [PlayerSlot::One, PlayerSlot::Two]
            .into_iter()
            .find(|slot| self.scores[slot.index()] >= self.points_to_win)
    }
}

impl MatchController for PaddleMatch {
    const MODE: GameMode = GameMode::PaddleBall;

    fn begin(users: [User; 2], settings: &Settings, now_ms: f64) -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        let rng = Pcg32::seed_from_u64(settings.seed ^ users[0].id ^ users[1].id.rotate_left(29));
        let [a, b] = users;
        let mut this = Self {
            ids: [a.id, b.id],
            names: [a.name, b.name],
            paddles: [Paddle::new(PlayerSlot::One, field), Paddle::new(PlayerSlot::Two, field)],
            ball: Ball::new(field),
            scores: [0; 2],
            returns: [0; 2],
            stats: StatTracker::new(),
            controls: [ControlBindings::player_one(), ControlBindings::player_two()],
            rally: 0,
            longest_rally: 0,
            points_to_win: settings.points_to_win.max(1),
            rng,
            field,
            started_at: now_ms,
        };
        this.serve(PlayerSlot::Two);
        this
    }

    fn step(&mut self, frame: &Frame) -> Option<MatchOutcome> {
        let before = self.snapshot();

        for (paddle, controls) in self.paddles.iter_mut().zip(&self.controls) {
            let dir = controls.read(frame.keys).vertical();
            paddle.update(frame.dt, dir, self.field);
        }

        match self.ball.update(frame.dt, self.field) {
            BallEvent::PassedLeft => self.score(PlayerSlot::Two),
            BallEvent::PassedRight => self.score(PlayerSlot::One),
            BallEvent::WallBounce | BallEvent::None => {
                for paddle in &self.paddles {
                    if self.ball.bounce_off(paddle) {
                        self.returns[paddle.slot.index()] += 1;
                        self.rally += 1;
                    }
                }
            }
        }

        self.stats.apply(before, self.snapshot());

        let winner = self.leader()?;
        Some(self.stats.outcome(
            Self::MODE,
            self.ids,
            winner,
            WinMethod::Points,
            self.longest_rally(),
            frame.now_ms - self.started_at,
        ))
    }

    fn halt(&mut self) {
        self.ball.vel = Vec2::ZERO;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let mid = self.field.x / 2.0;
        let mut y = 0.0;
        while y < self.field.y {
            surface.fill_rect(mid - 1.0, y, 2.0, 14.0, Color::GROUND);
            y += 28.0;
        }
        for paddle in &self.paddles {
            paddle.draw(surface);
        }
        self.ball.draw(surface);

        surface.fill_text(&self.scores[0].to_string(), mid - 60.0, 48.0, 36.0, Color::PLAYER_ONE);
        surface.fill_text(&self.scores[1].to_string(), mid + 40.0, 48.0, 36.0, Color::PLAYER_TWO);
        surface.fill_text(&self.names[0], 20.0, 24.0, 16.0, Color::PLAYER_ONE);
        surface.fill_text(&self.names[1], self.field.x - 160.0, 24.0, 16.0, Color::PLAYER_TWO);
        surface.fill_text(
            &format!("Rally {}", self.rally),
            mid - 30.0,
            self.field.y - 16.0,
            14.0,
            Color::TEXT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::KeyState;

    fn begin() -> PaddleMatch {
        PaddleMatch::begin([User::new(1, "one"), User::new(2, "two")], &Settings::default(), 0.0)
    }

    fn frame<'a>(keys: &'a KeyState, now_ms: f64) -> Frame<'a> {
        Frame {
            dt: 1.0 / 60.0,
            now_ms,
            keys,
        }
    }

    #[test]
    fn test_first_serve_heads_to_player_two() {
        let m = begin();
        assert!(m.ball.vel.x > 0.0);
        assert!(m.ball.vel.y.abs() <= m.ball.speed() * MAX_SERVE_ANGLE.sin() + 1e-3);
    }

    #[test]
    fn test_conceder_receives_next_serve() {
        let mut m = begin();
        m.ball.pos.x = FIELD_WIDTH + 1.0;
        m.ball.vel = Vec2::new(100.0, 0.0);
        let keys = KeyState::new();
        assert!(m.step(&frame(&keys, 16.0)).is_none());
        assert_eq!(m.scores, [1, 0]);
        assert_eq!(m.stats.line(PlayerSlot::One).points_scored, 1);
        assert!(m.ball.vel.x > 0.0);
        assert_eq!(m.ball.pos, (Vec2::new(FIELD_WIDTH, FIELD_HEIGHT) - m.ball.size) / 2.0);
    }

    #[test]
    fn test_return_counts_toward_rally() {
        let mut m = begin();
        let paddle = m.paddles[1].clone();
        m.ball.pos = Vec2::new(paddle.pos.x - m.ball.size.x + 2.0, paddle.center().y);
        m.ball.vel = Vec2::new(BALL_START_SPEED, 0.0);
        let keys = KeyState::new();
        m.step(&frame(&keys, 16.0));
        assert_eq!(m.returns, [0, 1]);
        assert_eq!(m.stats.line(PlayerSlot::Two).returns, 1);
        assert!(m.ball.vel.x < 0.0);
        assert_eq!(m.longest_rally(), 1);
    }

    #[test]
    fn test_reaching_target_ends_match() {
        let mut m = begin();
        m.scores = [0, 4];
        m.ball.pos.x = -m.ball.size.x - 1.0;
        m.ball.vel = Vec2::new(-100.0, 0.0);
        let keys = KeyState::new();
        let outcome = m.step(&frame(&keys, 1000.0)).unwrap();
        assert_eq!(outcome.win_method, WinMethod::Points);
        assert_eq!(outcome.winner_id, 2);
        assert_eq!(outcome.duration_ms, 1000.0);
    }
}
