//! Menu, match intro, tournament scoreboard and end screen

use super::combat::PlatformMatch;
use super::context::{MatchContext, Session, UserId};
use super::match_state::{MatchState, Route};
use super::outcome::{GameMode, MatchOutcome};
use super::rally::PaddleMatch;
use super::state::{Frame, State, Transition};
use super::tournament::Tournament;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::GameError;
use crate::render::{Color, Surface};
use crate::sim::{Deadline, KeyState};

fn confirmed(keys: &KeyState) -> bool {
    keys.just_pressed("Enter") || keys.just_pressed(" ")
}

fn display_name(session: &Session, id: UserId) -> String {
    session
        .lobby
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| format!("Player {}", id))
}

fn draw_error(surface: &mut dyn Surface, error: Option<&GameError>) {
    if let Some(error) = error {
        surface.fill_text(&error.to_string(), 40.0, FIELD_HEIGHT - 40.0, 18.0, Color::ERROR);
    }
}

/// Match state for `mode`, boxed for the state machine
pub fn match_state(
    session: Session,
    mode: GameMode,
    context: MatchContext,
    route: Route,
) -> Box<dyn State> {
    match mode {
        GameMode::PlatformCombat => {
            Box::new(MatchState::<PlatformMatch>::new(session, context, route))
        }
        GameMode::PaddleBall => Box::new(MatchState::<PaddleMatch>::new(session, context, route)),
    }
}

/// Title screen
///
/// `1`/`2` start a quick platform/paddle match between the first two lobby
/// users, `3`/`4` start a tournament in the same modes.
pub struct MenuState {
    session: Session,
    error: Option<GameError>,
}

impl MenuState {
    pub fn new(session: Session) -> Self {
        Self { session, error: None }
    }

    pub fn error(&self) -> Option<&GameError> {
        self.error.as_ref()
    }

    fn quick_match(&self, mode: GameMode) -> Result<Box<dyn State>, GameError> {
        let lobby = &self.session.lobby;
        let [one, two, ..] = lobby.as_slice() else {
            return Err(GameError::NotEnoughPlayers {
                needed: 2,
                found: lobby.len(),
            });
        };
        let context = MatchContext::resolved(one.clone(), two.clone());
        Ok(Box::new(MatchIntroState::new(
            self.session.clone(),
            mode,
            context,
            Route::Single,
        )))
    }

    fn tournament(&self, mode: GameMode) -> Result<Box<dyn State>, GameError> {
        let tournament = Tournament::new(
            mode,
            self.session.lobby.to_vec(),
            self.session.settings.points_per_win,
        )?;
        Ok(Box::new(TournamentState::new(self.session.clone(), tournament)))
    }
}

impl State for MenuState {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn update(&mut self, frame: &Frame) -> Transition {
        let keys = frame.keys;
        let next = if keys.just_pressed("1") {
            self.quick_match(GameMode::PlatformCombat)
        } else if keys.just_pressed("2") {
            self.quick_match(GameMode::PaddleBall)
        } else if keys.just_pressed("3") {
            self.tournament(GameMode::PlatformCombat)
        } else if keys.just_pressed("4") {
            self.tournament(GameMode::PaddleBall)
        } else {
            return Transition::Stay;
        };

        match next {
            Ok(state) => Transition::Change(state),
            Err(e) => {
                log::warn!("{}", e);
                self.error = Some(e);
                Transition::Stay
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BACKGROUND);
        surface.fill_text("ARENA DUEL", 360.0, 140.0, 48.0, Color::TEXT);
        let options = [
            "1  Quick match: platform combat",
            "2  Quick match: paddle-ball",
            "3  Tournament: platform combat",
            "4  Tournament: paddle-ball",
        ];
        for (i, line) in options.iter().enumerate() {
            surface.fill_text(line, 320.0, 220.0 + i as f32 * 36.0, 20.0, Color::TEXT);
        }
        draw_error(surface, self.error());
    }
}

/// Versus card shown before every match
pub struct MatchIntroState {
    session: Session,
    mode: GameMode,
    context: MatchContext,
    route: Option<Route>,
    deadline: Deadline,
}

impl MatchIntroState {
    pub fn new(session: Session, mode: GameMode, context: MatchContext, route: Route) -> Self {
        Self {
            session,
            mode,
            context,
            route: Some(route),
            deadline: Deadline::cancelled(),
        }
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }
}

impl State for MatchIntroState {
    fn name(&self) -> &'static str {
        "intro"
    }

    fn enter(&mut self, now_ms: f64) {
        self.deadline = Deadline::after(now_ms, self.session.settings.intro_duration_ms);
    }

    fn exit(&mut self) {
        self.deadline.cancel();
    }

    fn update(&mut self, frame: &Frame) -> Transition {
        if !(confirmed(frame.keys) || self.deadline.expired(frame.now_ms)) {
            return Transition::Stay;
        }
        let Some(route) = self.route.take() else {
            return Transition::Stay;
        };
        Transition::Change(match_state(
            self.session.clone(),
            self.mode,
            self.context.clone(),
            route,
        ))
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BACKGROUND);
        surface.fill_text(self.mode.title(), 380.0, 120.0, 28.0, Color::TEXT);
        match self.context.users() {
            Some([one, two]) => {
                surface.fill_text(&one.name, 200.0, 270.0, 32.0, Color::PLAYER_ONE);
                surface.fill_text("vs", 460.0, 270.0, 24.0, Color::TEXT);
                surface.fill_text(&two.name, 620.0, 270.0, 32.0, Color::PLAYER_TWO);
                for (user, x) in [(one, 200.0), (two, 620.0)] {
                    let rating = format!("Rating {}", user.rating);
                    surface.fill_text(&rating, x, 300.0, 16.0, Color::TEXT);
                }
            }
            None => surface.fill_text("Loading players...", 380.0, 270.0, 24.0, Color::TEXT),
        }
        if let Some(Route::Tournament(t)) = &self.route {
            let label = format!("Tournament match {} of 6", t.matches_played() + 1);
            surface.fill_text(&label, 380.0, 340.0, 18.0, Color::TEXT);
        }
    }
}

/// Standings between tournament matches
pub struct TournamentState {
    session: Session,
    tournament: Option<Tournament>,
    error: Option<GameError>,
}

impl TournamentState {
    pub fn new(session: Session, tournament: Tournament) -> Self {
        Self {
            session,
            tournament: Some(tournament),
            error: None,
        }
    }

    pub fn tournament(&self) -> Option<&Tournament> {
        self.tournament.as_ref()
    }

    pub fn error(&self) -> Option<&GameError> {
        self.error.as_ref()
    }

    fn advance(
        &mut self,
        tournament: Tournament,
    ) -> Result<Box<dyn State>, (Tournament, GameError)> {
        if tournament.is_complete() {
            let names = match tournament.winners() {
                Ok(winners) => winners.iter().map(|w| w.user.name.clone()).collect(),
                Err(e) => return Err((tournament, e)),
            };
            return Ok(Box::new(EndScreenState::champions(self.session.clone(), names)));
        }

        match tournament.next_users() {
            Ok((one, two)) => Ok(Box::new(MatchIntroState::new(
                self.session.clone(),
                tournament.mode,
                MatchContext::resolved(one, two),
                Route::Tournament(tournament),
            ))),
            Err(e) => Err((tournament, e)),
        }
    }
}

impl State for TournamentState {
    fn name(&self) -> &'static str {
        "tournament"
    }

    fn update(&mut self, frame: &Frame) -> Transition {
        if !confirmed(frame.keys) {
            return Transition::Stay;
        }
        let Some(tournament) = self.tournament.take() else {
            return Transition::Stay;
        };
        match self.advance(tournament) {
            Ok(next) => Transition::Change(next),
            Err((tournament, e)) => {
                log::warn!("{}", e);
                self.tournament = Some(tournament);
                self.error = Some(e);
                Transition::Stay
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BACKGROUND);
        let Some(t) = &self.tournament else {
            return;
        };
        let title = format!("{} tournament: {}/6 played", t.mode.title(), t.matches_played());
        surface.fill_text(&title, 300.0, 80.0, 26.0, Color::TEXT);

        for (row, entry) in t.standings().iter().enumerate() {
            let line = format!(
                "{}. {:<16} {:>3} pts  {:>3} tb",
                entry.place, entry.user.name, entry.points, entry.tie_break
            );
            surface.fill_text(&line, 300.0, 150.0 + row as f32 * 34.0, 20.0, Color::TEXT);
        }

        let footer = match t.next_users() {
            Ok((one, two)) => format!("Next: {} vs {}  (Enter)", one.name, two.name),
            Err(_) => "Tournament complete  (Enter)".to_string(),
        };
        surface.fill_text(&footer, 300.0, 330.0, 20.0, Color::TEXT);
        draw_error(surface, self.error());
    }
}

/// Final card for a match or a tournament
pub struct EndScreenState {
    session: Session,
    headline: String,
    lines: Vec<String>,
}

impl EndScreenState {
    pub fn match_result(session: Session, outcome: &MatchOutcome) -> Self {
        let winner = display_name(&session, outcome.winner_id);
        let loser = display_name(&session, outcome.loser_id);
        let stats = &outcome.winner_stats;
        let method = outcome.win_method.as_str();
        let mut lines = vec![format!("{} defeated {} by {}", winner, loser, method)];
        match outcome.mode {
            GameMode::PlatformCombat => lines.push(format!(
                "Damage dealt {:.0}  Coins {}  Hits {}/{}",
                stats.damage_dealt, stats.coins_collected, stats.hits, stats.shots_fired
            )),
            GameMode::PaddleBall => lines.push(format!(
                "Score {}-{}  Longest rally {}",
                stats.points_scored, outcome.loser_stats.points_scored, outcome.longest_rally
            )),
        }
        Self {
            headline: format!("{} wins!", winner),
            session,
            lines,
        }
    }

    /// Every co-champion of a finished tournament
    pub fn champions(session: Session, names: Vec<String>) -> Self {
        let headline = match names.len() {
            1 => "Tournament champion".to_string(),
            _ => "Tournament co-champions".to_string(),
        };
        Self {
            session,
            headline,
            lines: names,
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl State for EndScreenState {
    fn name(&self) -> &'static str {
        "end"
    }

    fn update(&mut self, frame: &Frame) -> Transition {
        if confirmed(frame.keys) {
            Transition::Change(Box::new(MenuState::new(self.session.clone())))
        } else {
            Transition::Stay
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BACKGROUND);
        let left = FIELD_WIDTH / 2.0 - 180.0;
        surface.fill_text(&self.headline, left, 160.0, 36.0, Color::TEXT);
        for (i, line) in self.lines.iter().enumerate() {
            surface.fill_text(line, left, 230.0 + i as f32 * 30.0, 20.0, Color::TEXT);
        }
        let prompt_x = FIELD_WIDTH / 2.0 - 100.0;
        surface.fill_text("Enter: back to menu", prompt_x, FIELD_HEIGHT - 60.0, 16.0, Color::TEXT);
    }
}
