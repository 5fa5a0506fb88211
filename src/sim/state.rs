//! Game state and core simulation types
//!
//! Everything one match needs lives in [`GameState`]; nothing is global, so
//! several independent games can run side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled paddle
    Left,
    /// Computer-controlled paddle
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Which way a serve travels horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServeDirection {
    TowardLeft,
    TowardRight,
    /// Coin flip
    Random,
}

impl From<Side> for ServeDirection {
    /// Serve toward the given side
    fn from(side: Side) -> Self {
        match side {
            Side::Left => ServeDirection::TowardLeft,
            Side::Right => ServeDirection::TowardRight,
        }
    }
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball waits at center; physics frozen until the countdown runs out
    Serving { remaining: f32 },
    /// Ball in play
    Rallying,
    /// A side reached the winning score. Terminal until reset.
    MatchEnded { winner: Side },
}

/// Notifications for the host (score display, outcome dialog, sounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { side: Side, score: u32 },
    MatchEnded { winner: Side },
    PaddleHit { side: Side },
    WallBounce,
    Served { direction: ServeDirection },
}

/// A rectangular paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (pixels/s, positive is down)
    pub vel_y: f32,
}

impl Paddle {
    /// Paddle vertically centered on `side`, inset by the configured margin
    pub fn new(side: Side, settings: &Settings) -> Self {
        let x = match side {
            Side::Left => settings.paddle_margin,
            Side::Right => settings.surface_width - settings.paddle_margin - settings.paddle_width,
        };
        Self {
            pos: Vec2::new(x, (settings.surface_height - settings.paddle_height) / 2.0),
            width: settings.paddle_width,
            height: settings.paddle_height,
            vel_y: 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Keep the paddle fully on the surface
    pub fn clamp_to(&mut self, surface_height: f32) {
        self.pos.y = crate::clamp(self.pos.y, 0.0, surface_height - self.height);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    /// Velocity (pixels/s)
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball resting at the center of the surface
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.surface_width / 2.0, settings.surface_height / 2.0),
            vel: Vec2::ZERO,
            radius: settings.ball_radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Complete state of one match (the simulation context)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning this match was created with
    pub settings: Settings,
    /// Seed for reproducibility
    pub seed: u64,
    /// Human paddle
    pub left: Paddle,
    /// Computer paddle
    pub right: Paddle,
    pub ball: Ball,
    pub left_score: u32,
    pub right_score: u32,
    pub phase: GamePhase,
    /// Manual pause (also set when the match ends)
    pub paused: bool,
    /// False once the match has ended; the frame driver stops scheduling
    pub running: bool,
    /// Simulation tick counter (advanced frames only)
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given seed; the first serve is random
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let mut state = Self {
            left: Paddle::new(Side::Left, &settings),
            right: Paddle::new(Side::Right, &settings),
            ball: Ball::new(&settings),
            settings,
            seed,
            left_score: 0,
            right_score: 0,
            phase: GamePhase::Rallying,
            paused: false,
            running: true,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        state.serve(ServeDirection::Random);
        state.begin_serve_delay();
        state
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Take all pending notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
