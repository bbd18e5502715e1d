//! Orchestration on top of the simulation
//!
//! Everything the host drives is a `State`: menu, match intro, a match of
//! either mode, the tournament scoreboard and the end screen.

pub mod combat;
pub mod context;
pub mod match_state;
pub mod outcome;
pub mod rally;
pub mod screens;
pub mod state;
pub mod tournament;

pub use combat::PlatformMatch;
pub use context::{MatchContext, Session, User, UserId, UserSlot};
pub use match_state::{MatchController, MatchPhase, MatchState, Route};
pub use outcome::{GameMode, MatchOutcome, OutcomeSink, StatLine, StatTracker, WinMethod};
pub use rally::PaddleMatch;
pub use screens::{EndScreenState, MatchIntroState, MenuState, TournamentState, match_state};
pub use state::{Frame, State, StateMachine, Transition};
pub use tournament::{BRACKET, TOURNAMENT_SIZE, Tournament, TournamentPlayer, determine_winners};
