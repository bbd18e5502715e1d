//! End-to-end match and tournament scenarios driven through the public API

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use arena_duel::game::{
    Frame, GameMode, MatchContext, MatchPhase, MatchState, MenuState, PaddleMatch, PlatformMatch,
    Route, Session, State, StateMachine, Tournament, Transition, User, UserSlot, WinMethod,
};
use arena_duel::render::CommandBuffer;
use arena_duel::sim::{Clock, Facing, KeyState, ShotOrigin, Weapon, WeaponKind};
use arena_duel::{GameError, MatchHistory, Settings};

const DT: f32 = 1.0 / 60.0;

fn lobby(n: usize) -> Vec<User> {
    (0..n)
        .map(|i| User::new(i as u64 + 1, format!("p{}", i + 1)))
        .collect()
}

fn session(n: usize) -> (Session, Rc<RefCell<MatchHistory>>) {
    let history = Rc::new(RefCell::new(MatchHistory::new()));
    (Session::new(Settings::default(), lobby(n), history.clone()), history)
}

fn resolved(session: &Session) -> MatchContext {
    MatchContext::resolved(session.lobby[0].clone(), session.lobby[1].clone())
}

fn tick<S: State + ?Sized>(state: &mut S, clock: &mut Clock, keys: &KeyState) -> Transition {
    clock.advance(DT);
    state.update(&Frame {
        dt: DT,
        now_ms: clock.now(),
        keys,
    })
}

#[test]
fn pistol_fires_once_inside_cooldown() {
    let mut pistol = Weapon::new(WeaponKind::Pistol);
    let origin = ShotOrigin {
        muzzle: Vec2::new(100.0, 400.0),
        feet: Vec2::new(100.0, 420.0),
        facing: Facing::Right,
        platform: None,
    };
    assert!(pistol.shoot(1000.0, origin));
    assert!(!pistol.shoot(1100.0, origin));
    assert_eq!(pistol.projectiles.len(), 1);
    assert_eq!(pistol.shots_fired, 1);
    assert!(pistol.shoot(1300.0, origin));
}

#[test]
fn knockout_ends_match_and_reaches_sink() {
    let (session, history) = session(2);
    let context = resolved(&session);
    let mut state = MatchState::<PlatformMatch>::new(session.clone(), context, Route::Single);
    let mut clock = Clock::new();
    let keys = KeyState::new();
    state.enter(clock.now());

    assert!(matches!(tick(&mut state, &mut clock, &keys), Transition::Stay));
    assert_eq!(state.phase(), MatchPhase::Playing);

    let controller = state.controller_mut().unwrap();
    controller.players[1].apply_damage(60.0);
    controller.players[1].apply_damage(60.0);
    assert_eq!(controller.players[1].health, 0.0);

    let next = match tick(&mut state, &mut clock, &keys) {
        Transition::Change(next) => next,
        Transition::Stay => panic!("match should have ended"),
    };
    assert_eq!(next.name(), "end");
    assert_eq!(state.phase(), MatchPhase::Ended);

    let outcome = state.outcome().unwrap();
    assert_eq!(outcome.win_method, WinMethod::Ko);
    assert_eq!(outcome.winner_id, 1);
    assert_eq!(outcome.loser_id, 2);
    assert!(!state.controller().unwrap().coins.timer_running());
    assert_eq!(history.borrow().wins_for(1), 1);

    // Ended is terminal
    assert!(matches!(tick(&mut state, &mut clock, &keys), Transition::Stay));
    assert_eq!(history.borrow().len(), 1);
}

#[test]
fn paddle_ball_first_to_five_wins_on_points() {
    let (session, _) = session(2);
    let context = resolved(&session);
    let mut state = MatchState::<PaddleMatch>::new(session.clone(), context, Route::Single);
    let mut clock = Clock::new();
    let mut keys = KeyState::new();
    tick(&mut state, &mut clock, &keys);

    let mut frames = 0;
    while state.phase() == MatchPhase::Playing && frames < 60 * 120 {
        // Player two runs from the ball
        let rally = state.controller().unwrap();
        let flee_up = rally.ball.center().y > rally.paddles[1].center().y;
        keys.release_all();
        keys.press(if flee_up { "ArrowUp" } else { "ArrowDown" });
        tick(&mut state, &mut clock, &keys);
        keys.end_frame();
        frames += 1;
    }

    let outcome = state.outcome().unwrap();
    assert_eq!(outcome.win_method, WinMethod::Points);
    assert_eq!(outcome.winner_id, 1);
    assert_eq!(outcome.winner_stats.points_scored, 5);
    assert_eq!(outcome.loser_stats.points_scored, 0);
    assert_eq!(outcome.loser_stats.returns, 0);
    assert_eq!(state.controller().unwrap().scores, [5, 0]);
}

#[test]
fn loading_waits_for_pending_users() {
    let (session, _) = session(2);
    let fetch = UserSlot::pending();
    let context = MatchContext::new(UserSlot::ready(session.lobby[0].clone()), fetch.clone());
    let mut state = MatchState::<PlatformMatch>::new(session.clone(), context, Route::Single);
    let mut clock = Clock::new();
    let keys = KeyState::new();

    for _ in 0..10 {
        tick(&mut state, &mut clock, &keys);
    }
    assert_eq!(state.phase(), MatchPhase::Loading);
    assert!(state.controller().is_none());
    assert!(matches!(state.try_begin(clock.now()), Err(GameError::DataNotReady)));

    let mut screen = CommandBuffer::new();
    state.render(&mut screen);
    assert!(screen.contains_text("Loading"));

    fetch.fill(session.lobby[1].clone());
    tick(&mut state, &mut clock, &keys);
    assert_eq!(state.phase(), MatchPhase::Playing);
}

#[test]
fn leaving_a_match_stops_coin_timer_idempotently() {
    let (session, _) = session(2);
    let context = resolved(&session);
    let mut state = MatchState::<PlatformMatch>::new(session.clone(), context, Route::Single);
    let mut clock = Clock::new();
    let keys = KeyState::new();
    tick(&mut state, &mut clock, &keys);
    assert!(state.controller().unwrap().coins.timer_running());

    state.exit();
    state.exit();
    let coins = &state.controller().unwrap().coins;
    assert!(!coins.timer_running());
    assert!(!coins.is_active());
}

#[test]
fn result_for_wrong_pairing_is_shown_inline() {
    let (session, history) = session(4);
    let tournament = Tournament::new(GameMode::PaddleBall, session.lobby.to_vec(), 10).unwrap();
    // Bracket opens with p1 vs p2; play p3 vs p4 instead
    let context = MatchContext::resolved(session.lobby[2].clone(), session.lobby[3].clone());
    let mut state = MatchState::<PaddleMatch>::new(session, context, Route::Tournament(tournament));
    let mut clock = Clock::new();
    let mut keys = KeyState::new();
    keys.press("ArrowUp");
    tick(&mut state, &mut clock, &keys);

    state.controller_mut().unwrap().scores = [4, 0];
    let mut frames = 0;
    while state.phase() == MatchPhase::Playing && frames < 60 * 30 {
        assert!(matches!(tick(&mut state, &mut clock, &keys), Transition::Stay));
        frames += 1;
    }

    assert_eq!(state.phase(), MatchPhase::Ended);
    assert!(matches!(state.error(), Some(GameError::MatchCounter { expected: 1 })));
    assert_eq!(history.borrow().len(), 1);

    let mut screen = CommandBuffer::new();
    state.render(&mut screen);
    assert!(screen.contains_text("tournament data error"));
}

#[test]
fn paddle_tournament_runs_all_six_matches() {
    let (session, history) = session(4);
    let mut clock = Clock::new();
    let mut machine = StateMachine::new(Box::new(MenuState::new(session)), clock.now());
    let mut keys = KeyState::new();

    let mut frames = 0;
    while machine.current_name() != "end" && frames < 60 * 600 {
        keys.release_all();
        let tap = frames % 2 == 0;
        match machine.current_name() {
            "menu" if tap => keys.press("4"),
            "tournament" | "intro" if tap => keys.press("Enter"),
            // Player two parks at the top; every serve goes past them
            "match" => keys.press("ArrowUp"),
            _ => {}
        }
        clock.advance(DT);
        machine.update(&Frame {
            dt: DT,
            now_ms: clock.now(),
            keys: &keys,
        });
        keys.end_frame();
        frames += 1;
    }

    assert_eq!(machine.current_name(), "end");
    let history = history.borrow();
    assert_eq!(history.len(), 6);
    // Player one of each pairing wins: p1 and p3 finish on 20 points and 10 scored
    for (id, wins) in [(1, 2), (2, 1), (3, 2), (4, 1)] {
        assert_eq!(history.wins_for(id), wins, "wins for {}", id);
    }

    let mut screen = CommandBuffer::new();
    machine.render(&mut screen);
    assert!(screen.contains_text("co-champions"));
    assert!(screen.contains_text("p1"));
    assert!(screen.contains_text("p3"));
    assert!(!screen.contains_text("p2"));
}
