//! Loading / playing / ended wrapper shared by both match controllers

use super::context::{MatchContext, Session, User};
use super::outcome::{GameMode, MatchOutcome};
use super::screens::{EndScreenState, TournamentState};
use super::state::{Frame, State, Transition};
use super::tournament::Tournament;
use crate::error::GameError;
use crate::render::{Color, Surface};
use crate::settings::Settings;

/// Per-mode match rules
pub trait MatchController {
    const MODE: GameMode;

    /// Build the match once both users are known
    fn begin(users: [User; 2], settings: &Settings, now_ms: f64) -> Self;

    /// Run one frame; returns the outcome on the frame the match is decided
    fn step(&mut self, frame: &Frame) -> Option<MatchOutcome>;

    /// Cancel every timer the match started; must be idempotent
    fn halt(&mut self);

    fn draw(&self, surface: &mut dyn Surface);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Waiting for user data; frames do nothing
    Loading,
    Playing,
    /// Terminal for this instance
    Ended,
}

/// Where to go once the match is over
pub enum Route {
    /// Show the end screen
    Single,
    /// Report back to the tournament scoreboard
    Tournament(Tournament),
}

/// A match as a top-level state
pub struct MatchState<C: MatchController> {
    session: Session,
    context: MatchContext,
    route: Option<Route>,
    phase: MatchPhase,
    controller: Option<C>,
    outcome: Option<MatchOutcome>,
    error: Option<GameError>,
}

impl<C: MatchController> MatchState<C> {
    pub fn new(session: Session, context: MatchContext, route: Route) -> Self {
        Self {
            session,
            context,
            route: Some(route),
            phase: MatchPhase::Loading,
            controller: None,
            outcome: None,
            error: None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn controller(&self) -> Option<&C> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut C> {
        self.controller.as_mut()
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&GameError> {
        self.error.as_ref()
    }

    /// Start playing now; refuses while user data is still loading
    pub fn try_begin(&mut self, now_ms: f64) -> Result<(), GameError> {
        if self.phase != MatchPhase::Loading {
            return Ok(());
        }
        let users = self.context.users().ok_or(GameError::DataNotReady)?;
        log::info!("{}: {} vs {}", C::MODE.title(), users[0].name, users[1].name);
        self.controller = Some(C::begin(users, &self.session.settings, now_ms));
        self.phase = MatchPhase::Playing;
        Ok(())
    }

    fn finish(&mut self) -> Transition {
        let Some(outcome) = self.outcome.clone() else {
            return Transition::Stay;
        };
        match self.route.take() {
            Some(Route::Single) => {
                let end = EndScreenState::match_result(self.session.clone(), &outcome);
                Transition::Change(Box::new(end))
            }
            Some(Route::Tournament(mut tournament)) => match tournament.record_result(&outcome) {
                Ok(()) => Transition::Change(Box::new(TournamentState::new(
                    self.session.clone(),
                    tournament,
                ))),
                Err(e) => {
                    log::warn!("{}", e);
                    self.error = Some(e);
                    self.route = Some(Route::Tournament(tournament));
                    Transition::Stay
                }
            },
            None => Transition::Stay,
        }
    }
}

impl<C: MatchController> State for MatchState<C> {
    fn name(&self) -> &'static str {
        "match"
    }

    fn exit(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.halt();
        }
    }

    fn update(&mut self, frame: &Frame) -> Transition {
        match self.phase {
            MatchPhase::Loading => {
                // DataNotReady just means another idle frame
                let _ = self.try_begin(frame.now_ms);
                Transition::Stay
            }
            MatchPhase::Playing => {
                let Some(controller) = self.controller.as_mut() else {
                    return Transition::Stay;
                };
                let Some(outcome) = controller.step(frame) else {
                    return Transition::Stay;
                };
                controller.halt();
                log::info!(
                    "Match ended: {} beat {} ({})",
                    outcome.winner_id,
                    outcome.loser_id,
                    outcome.win_method.as_str()
                );
                self.session.sink.borrow_mut().record(&outcome);
                self.outcome = Some(outcome);
                self.phase = MatchPhase::Ended;
                self.finish()
            }
            MatchPhase::Ended => Transition::Stay,
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BACKGROUND);
        match &self.controller {
            Some(controller) => controller.draw(surface),
            None => surface.fill_text("Loading players...", 380.0, 270.0, 24.0, Color::TEXT),
        }
        if let Some(error) = &self.error {
            surface.fill_text(&error.to_string(), 20.0, 30.0, 18.0, Color::ERROR);
        }
    }
}
