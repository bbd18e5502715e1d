//! Context objects passed into screens and controllers
//!
//! Nothing here is global: a `Session` is created by the host and cloned into
//! every screen, a `MatchContext` is created per match.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::outcome::OutcomeSink;
use crate::settings::Settings;

pub type UserId = u64;

/// Identity record supplied by the account collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Ranking stat shown on the versus screen
    #[serde(default)]
    pub rating: i32,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rating: 0,
        }
    }
}

/// A user record that may still be in flight from an external fetch
///
/// Clones share the slot, so the fetcher can fill it while the match polls.
#[derive(Debug, Clone, Default)]
pub struct UserSlot(Rc<RefCell<Option<User>>>);

impl UserSlot {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn ready(user: User) -> Self {
        Self(Rc::new(RefCell::new(Some(user))))
    }

    pub fn fill(&self, user: User) {
        *self.0.borrow_mut() = Some(user);
    }

    pub fn get(&self) -> Option<User> {
        self.0.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.0.borrow().is_some()
    }
}

/// The two participants of one match
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    pub players: [UserSlot; 2],
}

impl MatchContext {
    pub fn new(one: UserSlot, two: UserSlot) -> Self {
        Self { players: [one, two] }
    }

    pub fn resolved(one: User, two: User) -> Self {
        Self::new(UserSlot::ready(one), UserSlot::ready(two))
    }

    /// Both users, once both fetches have landed
    pub fn users(&self) -> Option<[User; 2]> {
        Some([self.players[0].get()?, self.players[1].get()?])
    }
}

/// Per-run services shared by every screen
#[derive(Clone)]
pub struct Session {
    pub settings: Rc<Settings>,
    /// Users available for quick matches and tournaments
    pub lobby: Rc<Vec<User>>,
    pub sink: Rc<RefCell<dyn OutcomeSink>>,
}

impl Session {
    pub fn new(settings: Settings, lobby: Vec<User>, sink: Rc<RefCell<dyn OutcomeSink>>) -> Self {
        Self {
            settings: Rc::new(settings),
            lobby: Rc::new(lobby),
            sink,
        }
    }
}
