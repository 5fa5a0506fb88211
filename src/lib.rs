//! Paddle Pong - classic two-paddle table tennis against the computer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, round lifecycle)
//! - `driver`: Frame driver that turns wall-clock frames into simulation steps
//! - `input`: Key bindings and input event mapping
//! - `render`: Read-only render snapshot and drawing surface contract
//! - `settings`: Data-driven game tuning

pub mod driver;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use driver::FrameDriver;
pub use input::{Controls, KeyAction};
pub use render::{RenderSnapshot, Surface};
pub use settings::Settings;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    use std::f32::consts::PI;

    /// Drawing surface dimensions
    pub const SURFACE_WIDTH: f32 = 800.0;
    pub const SURFACE_HEIGHT: f32 = 500.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 12.0;
    pub const PADDLE_HEIGHT: f32 = 90.0;
    /// Horizontal inset of each paddle from its side edge
    pub const PADDLE_MARGIN: f32 = 20.0;
    /// Human paddle speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 420.0;
    /// Computer paddle tracking speed (pixels/s)
    pub const AI_SPEED: f32 = 300.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 360.0;
    /// Speed boost when ball hits a paddle (multiplicative)
    pub const SPEED_INCREASE: f32 = 1.05;
    /// Deflection at the very edge of a paddle (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = PI / 3.0;
    /// Serves leave within +/- this angle of the horizontal
    pub const SERVE_ANGLE_BAND: f32 = PI / 8.0;

    /// Seconds the ball waits at center before a rally starts
    pub const SERVE_DELAY: f32 = 1.0;
    /// First side to reach this wins
    pub const WIN_SCORE: u32 = 10;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Delta used for the very first frame, before a previous timestamp exists
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;
}

/// Bound `value` to `[lo, hi]`
///
/// Unlike `f32::clamp` this never panics: an inverted range collapses to `hi`.
#[inline]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}
