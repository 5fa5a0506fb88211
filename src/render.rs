//! Render surface contract
//!
//! The simulation never draws. Hosts take a [`RenderSnapshot`] after each
//! frame and replay it onto anything implementing [`Surface`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, Paddle};

/// Axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectView {
    pub pos: Vec2,
    pub size: Vec2,
}

impl From<&Paddle> for RectView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            pos: paddle.pos,
            size: paddle.size(),
        }
    }
}

/// Read-only view of everything drawable in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    pub left: RectView,
    pub right: RectView,
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    pub draw_divider: bool,
    pub left_score: u32,
    pub right_score: u32,
    pub paused: bool,
    pub match_over: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            width: state.settings.surface_width,
            height: state.settings.surface_height,
            left: RectView::from(&state.left),
            right: RectView::from(&state.right),
            ball_pos: state.ball.pos,
            ball_radius: state.ball.radius,
            draw_divider: state.settings.show_divider,
            left_score: state.left_score,
            right_score: state.right_score,
            paused: state.paused,
            match_over: matches!(state.phase, GamePhase::MatchEnded { .. }),
        }
    }
}

/// Drawing primitives a host has to provide
pub trait Surface {
    /// Wipe the whole surface to the background
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn dashed_line(&mut self, from: Vec2, to: Vec2, dash: f32);
}

/// Dash length of the center divider
pub const DIVIDER_DASH: f32 = 10.0;

/// Draw one frame: background, divider, paddles, ball
pub fn draw<S: Surface + ?Sized>(surface: &mut S, snapshot: &RenderSnapshot) {
    surface.clear(snapshot.width, snapshot.height);

    if snapshot.draw_divider {
        let x = snapshot.width / 2.0;
        surface.dashed_line(
            Vec2::new(x, 0.0),
            Vec2::new(x, snapshot.height),
            DIVIDER_DASH,
        );
    }

    surface.fill_rect(snapshot.left.pos, snapshot.left.size);
    surface.fill_rect(snapshot.right.pos, snapshot.right.size);
    surface.fill_circle(snapshot.ball_pos, snapshot.ball_radius);
}
