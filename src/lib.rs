//! Slingshot - A physics puzzle game
//!
//! Core modules:
//! - `view`: Navigation stack of screens composed from singleton layers
//! - `router`: Route fragment <-> navigation stack synchronization
//! - `sim`: Level state machine (aim, launch, settle, win/loss, camera)
//! - `physics`: Rigid-body capability and the rapier adapter
//! - `level`: Bundled/custom level geometry and per-level progress
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native platform abstraction

pub mod app;
pub mod draw;
pub mod input;
pub mod level;
pub mod persistence;
pub mod physics;
pub mod platform;
pub mod router;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod ui;
pub mod view;

pub use app::{App, AppContext};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per displayed frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions in pixels (y grows upward from the ground)
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 1500.0;

    /// Canvas size in pixels
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Height of the ground strip drawn at the bottom of the canvas
    pub const GROUND_THICKNESS: f32 = 30.0;

    /// Where the loaded bird sits (world coordinates)
    pub const SLINGSHOT_X: f32 = 250.0;
    pub const SLINGSHOT_Y: f32 = 105.0;
    /// How far the cursor can pull the bird back, in pixels
    pub const MAX_PULL: f32 = 200.0;
    /// Pull distance to launch speed (px/s per px)
    pub const LAUNCH_POWER: f32 = 5.0;

    /// Manual pan speed (pixels per frame)
    pub const PAN_SPEED: f32 = 8.0;
    /// Return-to-slingshot animation length in frames
    pub const RETURN_ANIMATION_STEPS: f32 = 60.0;
    /// Never animate slower than this (pixels per frame)
    pub const MIN_ANIMATION_STEP: f32 = 10.0;
    /// Look at the level for this long before panning back (ms)
    pub const AUTO_CHECK_DELAY_MS: f64 = 2000.0;
    /// Margin right of the rightmost object where auto-follow stops
    pub const FOLLOW_MARGIN: f32 = 250.0;

    /// Delay before eager layer construction (ms)
    pub const PRELOAD_DELAY_MS: f64 = 200.0;
    /// How long a pig poof stays on screen (ms)
    pub const POOF_MS: f64 = 833.0;

    /// Birds
    pub const BIRD_RADIUS: f32 = 20.0;
    pub const BIRD_DENSITY: f32 = 15.0;
    pub const BIRD_MAX_DENSITY: f32 = 500_000.0;
    pub const BIRD_RESTITUTION: f32 = 0.1;
    pub const BIRD_LINEAR_DAMPING: f32 = 0.5;
    pub const BIRD_ANGULAR_DAMPING: f32 = 0.7;
    /// Queued birds are lined up this far apart left of the slingshot
    pub const BIRD_QUEUE_SPACING: f32 = 45.0;
    pub const MIN_BIRDS: u32 = 1;
    pub const MAX_BIRDS: u32 = 5;

    /// Pigs (fat pigs)
    pub const PIG_RADIUS: f32 = 30.0;
    pub const PIG_DENSITY: f32 = 5.0;
    pub const PIG_ANGULAR_DAMPING: f32 = 0.7;

    /// Blocks
    pub const WOOD_DENSITY: f32 = 6.0;
    pub const STEEL_DENSITY: f32 = 15.0;
    pub const LEAD_DENSITY: f32 = 30.0;
    pub const BLOCK_FRICTION: f32 = 0.5;
    pub const GROUND_FRICTION: f32 = 1.0;

    /// Contact impulse (N·s) above which a pig dies
    pub const KILL_IMPULSE: f32 = 3.0;
    /// Contact impulse (N·s) above which a pig looks squished
    pub const SQUISH_IMPULSE: f32 = 1.7;
}

/// Clamp `delta` to a forward-only launch vector no longer than `max_len`
#[inline]
pub fn clamp_pull(delta: Vec2, max_len: f32) -> Vec2 {
    Vec2::new(delta.x.max(0.0), delta.y).clamp_length_max(max_len)
}
