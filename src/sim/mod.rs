//! Frame-driven simulation module
//!
//! All per-frame gameplay physics lives here:
//! - Variable timestep (`dt` in seconds), integrated linearly
//! - Wall-clock timers read from an explicit `Clock`
//! - Seeded RNG only
//! - No host or platform dependencies beyond the `Surface` drawing trait

pub mod clock;
pub mod coin;
pub mod collision;
pub mod input;
pub mod paddle;
pub mod platform;
pub mod player;
pub mod weapon;

pub use clock::{Clock, Deadline, IntervalTimer};
pub use coin::{Coin, CoinFrame, CoinSpawner};
pub use collision::{CollisionKind, CollisionShape, Hittable, ShapeKind, ShapeOwner};
pub use input::{ControlBindings, ControlInput, KeyState};
pub use paddle::{Ball, BallEvent, Paddle};
pub use platform::{Oscillation, Platform, arena_layout};
pub use player::{Player, PlayerSlot};
pub use weapon::{Facing, HitReport, Motion, Projectile, ShotOrigin, Weapon, WeaponKind, WeaponSpec};
