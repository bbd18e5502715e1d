//! Arena Duel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use arena_duel::consts::*;
    use arena_duel::game::{Frame, MenuState, Session, StateMachine, User};
    use arena_duel::render::{Color, Surface};
    use arena_duel::sim::{Clock, KeyState};
    use arena_duel::{MatchHistory, Settings};

    /// `Surface` backed by a 2D canvas context
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    impl Surface for CanvasSurface {
        fn clear(&mut self, color: Color) {
            self.fill_rect(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT, color);
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }

        fn arc(&mut self, x: f32, y: f32, radius: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(x as f64, y as f64, radius as f64, 0.0, std::f64::consts::TAU);
            self.ctx.fill();
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.set_font(&format!("{}px monospace", size as u32));
            let _ = self.ctx.fill_text(text, x as f64, y as f64);
        }
    }

    /// Game instance holding all state
    struct Game {
        machine: StateMachine,
        keys: KeyState,
        clock: Clock,
        surface: CanvasSurface,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                // Clamp long gaps (tab switches) so bodies do not teleport
                ((time - self.last_time) / 1000.0).min(0.1) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;
            self.clock.advance(dt);

            let frame = Frame {
                dt,
                now_ms: self.clock.now(),
                keys: &self.keys,
            };
            self.machine.update(&frame);
            self.keys.end_frame();
            self.machine.render(&mut self.surface);
        }
    }

    fn lobby() -> Vec<User> {
        ["Ada", "Brook", "Cass", "Dune"]
            .iter()
            .enumerate()
            .map(|(i, name)| User::new(i as u64 + 1, *name))
            .collect()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Arena Duel starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let history = Rc::new(RefCell::new(MatchHistory::load()));
        let session = Session::new(Settings::load(), lobby(), history);
        let clock = Clock::new();
        let machine = StateMachine::new(Box::new(MenuState::new(session)), clock.now());

        let game = Rc::new(RefCell::new(Game {
            machine,
            keys: KeyState::new(),
            clock,
            surface: CanvasSurface { ctx },
            last_time: 0.0,
        }));

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Arena Duel running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        for (event, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.set(&event.key(), pressed);
            });
            let _ =
                window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop held keys when focus leaves so nobody keeps running
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().keys.release_all();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless bot tournament against a virtual clock
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use arena_duel::game::{Frame, MenuState, Session, StateMachine, User};
    use arena_duel::render::CommandBuffer;
    use arena_duel::sim::{Clock, KeyState};
    use arena_duel::{MatchHistory, Settings};

    const DT: f32 = 1.0 / 60.0;
    /// One hour of game time
    const MAX_FRAMES: u64 = 60 * 60 * 60;

    const BOT_KEYS: [[&str; 5]; 2] = [
        ["w", "s", "a", "d", "g"],
        ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "k"],
    ];
    const FIRE_KEYS: [&str; 2] = ["f", "l"];

    /// Random key mashing; both bots always hold fire
    fn mash(keys: &mut KeyState, rng: &mut Pcg32) {
        for (bot, fire) in BOT_KEYS.iter().zip(FIRE_KEYS) {
            for key in bot {
                keys.set(key, rng.random_bool(0.3));
            }
            keys.press(fire);
        }
    }

    pub fn run(settings: Settings, paddle: bool) {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let lobby: Vec<User> = ["Ada", "Brook", "Cass", "Dune"]
            .iter()
            .enumerate()
            .map(|(i, name)| User::new(i as u64 + 1, *name))
            .collect();

        let history = Rc::new(RefCell::new(MatchHistory::new()));
        let session = Session::new(settings, lobby.clone(), history.clone());
        let mut clock = Clock::new();
        let mut machine = StateMachine::new(Box::new(MenuState::new(session)), clock.now());
        let mut keys = KeyState::new();
        let start_key = if paddle { "4" } else { "3" };

        let mut frames = 0;
        while frames < MAX_FRAMES {
            keys.release_all();
            let tap = frames % 2 == 0;
            match machine.current_name() {
                "menu" if tap => keys.press(start_key),
                "tournament" | "intro" if tap => keys.press("Enter"),
                "match" => mash(&mut keys, &mut rng),
                "end" => break,
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

        if machine.current_name() != "end" {
            log::warn!("Gave up after {} frames in {}", frames, machine.current_name());
        }

        let mut screen = CommandBuffer::new();
        machine.render(&mut screen);
        for line in screen.texts() {
            log::info!("{}", line);
        }

        let history = history.borrow();
        for user in &lobby {
            log::info!(
                "{}: {} wins, {} losses",
                user.name,
                history.wins_for(user.id),
                history.losses_for(user.id)
            );
        }
        if let Some(rally) = history.best_rally() {
            log::info!("Longest rally: {}", rally);
        }
        log::info!("{} matches in {:.1}s of game time", history.len(), clock.now() / 1000.0);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let paddle = std::env::args().nth(1).is_some_and(|mode| mode == "paddle");
    log::info!("Arena Duel (headless) starting...");

    let settings = arena_duel::Settings::load();
    if !arena_duel::Settings::path().exists() {
        // First run leaves an editable copy of the defaults
        settings.save();
    }
    headless::run(settings, paddle);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
