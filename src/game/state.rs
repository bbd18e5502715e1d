//! Top-level state machine
//!
//! Exactly one state is active. Any state may replace any other; the machine
//! only guarantees `exit` on the outgoing state before `enter` on the new one.

use crate::render::Surface;
use crate::sim::KeyState;

/// Everything a state sees for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Measured gap since the previous frame (seconds)
    pub dt: f32,
    /// Wall clock (ms)
    pub now_ms: f64,
    pub keys: &'a KeyState,
}

/// What a state wants after its update
pub enum Transition {
    Stay,
    Change(Box<dyn State>),
}

/// Contract shared by menus, intros, matches, scoreboards and end screens
pub trait State {
    fn name(&self) -> &'static str;

    /// Called once when the state becomes current
    fn enter(&mut self, _now_ms: f64) {}

    /// Called once when the state is replaced; cancel any timers here
    fn exit(&mut self) {}

    fn update(&mut self, frame: &Frame) -> Transition;

    fn render(&self, surface: &mut dyn Surface);
}

/// Holds and drives the current state
pub struct StateMachine {
    current: Box<dyn State>,
}

impl StateMachine {
    pub fn new(mut initial: Box<dyn State>, now_ms: f64) -> Self {
        log::info!("Entering {}", initial.name());
        initial.enter(now_ms);
        Self { current: initial }
    }

    pub fn current_name(&self) -> &'static str {
        self.current.name()
    }

    /// Unconditionally swap states
    pub fn change_state(&mut self, mut next: Box<dyn State>, now_ms: f64) {
        self.current.exit();
        log::info!("{} -> {}", self.current.name(), next.name());
        next.enter(now_ms);
        self.current = next;
    }

    pub fn update(&mut self, frame: &Frame) {
        if let Transition::Change(next) = self.current.update(frame) {
            self.change_state(next, frame.now_ms);
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.current.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, CommandBuffer};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        next: Option<Box<dyn State>>,
    }

    impl State for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn enter(&mut self, _now_ms: f64) {
            self.log.borrow_mut().push(format!("enter {}", self.name));
        }

        fn exit(&mut self) {
            self.log.borrow_mut().push(format!("exit {}", self.name));
        }

        fn update(&mut self, _frame: &Frame) -> Transition {
            self.log.borrow_mut().push(format!("update {}", self.name));
            match self.next.take() {
                Some(next) => Transition::Change(next),
                None => Transition::Stay,
            }
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_text(self.name, 0.0, 0.0, 12.0, Color::TEXT);
        }
    }

    fn probe(name: &'static str, log: &Log, next: Option<Box<dyn State>>) -> Box<dyn State> {
        Box::new(Probe {
            name,
            log: log.clone(),
            next,
        })
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let log: Log = Rc::default();
        let b = probe("b", &log, None);
        let mut machine = StateMachine::new(probe("a", &log, Some(b)), 0.0);
        let keys = KeyState::new();
        machine.update(&Frame {
            dt: 0.016,
            now_ms: 16.0,
            keys: &keys,
        });
        assert_eq!(
            *log.borrow(),
            vec!["enter a", "update a", "exit a", "enter b"]
        );
        assert_eq!(machine.current_name(), "b");
    }

    #[test]
    fn test_render_delegates_to_current() {
        let log: Log = Rc::default();
        let mut machine = StateMachine::new(probe("a", &log, None), 0.0);
        machine.change_state(probe("c", &log, None), 0.0);
        let mut buf = CommandBuffer::new();
        machine.render(&mut buf);
        assert_eq!(buf.texts(), vec!["c"]);
    }
}
