//! Game settings and tuning
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall
//! back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input::Controls;

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Surface ===
    pub surface_width: f32,
    pub surface_height: f32,
    /// Draw the dashed center divider
    pub show_divider: bool,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_margin: f32,
    /// Human paddle speed (pixels/s)
    pub paddle_speed: f32,
    /// Computer paddle max tracking speed (pixels/s)
    pub ai_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_speed: f32,
    /// Multiplier applied to ball speed on every paddle hit (> 1)
    pub speed_increase: f32,
    /// Radians
    pub max_bounce_angle: f32,
    /// Radians, serve angle is drawn from [-band, band]
    pub serve_angle_band: f32,

    // === Rounds ===
    /// Seconds
    pub serve_delay: f32,
    pub win_score: u32,

    // === Frame driver ===
    /// Seconds
    pub max_frame_dt: f32,

    pub controls: Controls,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            show_divider: true,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,
            paddle_speed: PADDLE_SPEED,
            ai_speed: AI_SPEED,

            ball_radius: BALL_RADIUS,
            ball_start_speed: BALL_START_SPEED,
            speed_increase: SPEED_INCREASE,
            max_bounce_angle: MAX_BOUNCE_ANGLE,
            serve_angle_band: SERVE_ANGLE_BAND,

            serve_delay: SERVE_DELAY,
            win_score: WIN_SCORE,

            max_frame_dt: MAX_FRAME_DT,

            controls: Controls::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document (partial documents allowed)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Replace values the simulation cannot work with by their defaults
    ///
    /// Keeps the paddle inside the surface and the ball smaller than the
    /// field so position clamps always have a non-empty range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        self.surface_width = positive(self.surface_width, defaults.surface_width);
        self.surface_height = positive(self.surface_height, defaults.surface_height);
        self.paddle_width = positive(self.paddle_width, defaults.paddle_width)
            .min(self.surface_width / 2.0);
        self.paddle_height = positive(self.paddle_height, defaults.paddle_height)
            .min(self.surface_height);
        self.paddle_speed = positive(self.paddle_speed, defaults.paddle_speed);
        self.ai_speed = positive(self.ai_speed, defaults.ai_speed);
        self.ball_radius = positive(self.ball_radius, defaults.ball_radius)
            .min(self.surface_height / 2.0)
            .min(self.surface_width / 2.0);
        self.ball_start_speed = positive(self.ball_start_speed, defaults.ball_start_speed);
        self.max_frame_dt = positive(self.max_frame_dt, defaults.max_frame_dt);

        if !self.paddle_margin.is_finite() || self.paddle_margin < 0.0 {
            self.paddle_margin = defaults.paddle_margin;
        }
        // Each paddle stays on its own half
        self.paddle_margin = self
            .paddle_margin
            .min(self.surface_width / 2.0 - self.paddle_width);
        if !self.speed_increase.is_finite() || self.speed_increase <= 1.0 {
            self.speed_increase = defaults.speed_increase;
        }
        if !self.serve_delay.is_finite() || self.serve_delay < 0.0 {
            self.serve_delay = defaults.serve_delay;
        }
        let quarter_turn = std::f32::consts::FRAC_PI_2;
        if !(self.max_bounce_angle.is_finite()
            && self.max_bounce_angle >= 0.0
            && self.max_bounce_angle < quarter_turn)
        {
            self.max_bounce_angle = defaults.max_bounce_angle;
        }
        if !(self.serve_angle_band.is_finite()
            && self.serve_angle_band >= 0.0
            && self.serve_angle_band < quarter_turn)
        {
            self.serve_angle_band = defaults.serve_angle_band;
        }
        if self.win_score == 0 {
            self.win_score = defaults.win_score;
        }

        self
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    let path = path.display();
                    log::warn!("Invalid settings in {}: {}; using defaults", path, err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "paddle_pong_settings";

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
                    Err(err) => log::warn!("Stored settings invalid: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
