//! Rules and physics tuning
//!
//! Persisted as JSON: LocalStorage on the web, a file named by
//! `ARENA_DUEL_SETTINGS` natively. Missing fields fall back to defaults.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::sim::WeaponKind;

/// Player physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Horizontal run speed (pixels/s)
    pub move_speed: f32,
    /// Initial upward speed of a jump (pixels/s)
    pub jump_velocity: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,

    // === Platform combat ===
    /// Milliseconds between coin spawn attempts
    pub coin_spawn_interval_ms: f64,
    /// Coins needed for an economy win
    pub coins_to_win: u32,
    /// Weapons each combatant carries
    pub loadout: [WeaponKind; 2],

    // === Paddle-ball ===
    /// Points needed to win a paddle-ball match
    pub points_to_win: u32,

    // === Tournament ===
    /// Tournament points awarded for a match win
    pub points_per_win: u32,

    // === Flow ===
    /// How long the versus screen shows before a match (ms)
    pub intro_duration_ms: f64,
    /// Seed for coin placement and serve angles
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            coin_spawn_interval_ms: 3000.0,
            coins_to_win: 10,
            loadout: [WeaponKind::Pistol, WeaponKind::Mine],
            points_to_win: 5,
            points_per_win: 10,
            intro_duration_ms: 2500.0,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// LocalStorage key / default file name
    const STORAGE_KEY: &'static str = "arena_duel_settings";

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Settings file: `ARENA_DUEL_SETTINGS`, or `arena_duel_settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path() -> PathBuf {
        std::env::var_os("ARENA_DUEL_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", Self::STORAGE_KEY)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load settings from [`Settings::path`], falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = Self::path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
        }
    }
}
