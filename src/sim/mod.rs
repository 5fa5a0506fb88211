//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time deltas only, no clocks
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::{circle_intersects_rect, closest_point_on_rect};
pub use state::{Ball, GameEvent, GamePhase, GameState, Paddle, ServeDirection, Side};
pub use tick::{TickInput, advance};
