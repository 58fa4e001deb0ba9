//! Santa Sled - a single-screen terminal arcade game.
//!
//! - `entities`: the scene tree and game state (pure data)
//! - `compute`: per-frame update logic
//! - `display`: draw traversal and the terminal framebuffer
//! - `input`, `clock`, `audio`, `config`: loop plumbing used by the binary

pub mod audio;
pub mod clock;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;

pub use error::GameError;

/// Gameplay tuning. Distances are logical pixels, times are milliseconds.
pub mod consts {
    pub const TITLE: &str = "Santa Sled";

    /// Logical screen size; the framebuffer scales this to the terminal.
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;
    pub const FPS: u32 = 30;

    /// Length of one round.
    pub const ROUND_MS: f32 = 120_000.0;

    // Player
    pub const FUEL_MAX: f32 = 100.0;
    pub const FUEL_DRAIN_PER_MS: f32 = 0.003;
    pub const PLAYER_MAX_SPEED: f32 = 0.08;
    pub const FALL_ACCEL: f32 = 0.00005;
    /// Ground threshold as a multiple of the screen height.
    pub const GROUND_FACTOR: f32 = 1.25;
    pub const DROP_COOLDOWN_MS: f32 = 1000.0;
    pub const GIFT_LAUNCH: (f32, f32) = (0.2, -0.3);
    pub const TWINKLE_OFFSET: (f32, f32) = (-100.0, 80.0);
    pub const TWINKLE_JITTER: f32 = 0.05;

    // Projectiles and pickups
    pub const GIFT_GRAVITY: f32 = 0.0005;
    pub const GIFT_TIMEOUT_MS: f32 = 5000.0;
    pub const TWINKLE_TIMEOUT_MS: f32 = 4000.0;
    pub const PICKUP_TIMEOUT_MS: f32 = 10_000.0;
    pub const STAR_FUEL: f32 = 25.0;
    pub const FREEZE_MS: f32 = 5000.0;

    // Scenery
    pub const BACKGROUND_SPEED: f32 = -0.05;
    pub const FOREGROUND_SPEED: f32 = -0.15;

    // Emitters
    pub const STAR_SPEED: (f32, f32) = (-0.13, 0.0);
    pub const STAR_INTERVAL_MS: (u32, u32) = (4000, 10_000);
    pub const FLAKE_SPEED: (f32, f32) = (-0.2, 0.02);
    pub const FLAKE_INTERVAL_MS: (u32, u32) = (1000, 5000);

    // HUD thresholds
    pub const FUEL_CRITICAL: f32 = 10.0;
    pub const FUEL_WARNING: f32 = 25.0;
    pub const TIME_CRITICAL_MS: f32 = 10_000.0;
    pub const TIME_WARNING_MS: f32 = 20_000.0;
    pub const FROZEN_CRITICAL_MS: f32 = 1000.0;
}
