//! Per-frame simulation step
//!
//! Advances paddles and ball by `dt` seconds, resolves wall and paddle
//! bounces and hands scoring to the round controller.

use glam::Vec2;

use super::collision::circle_intersects_rect;
use super::state::{GameEvent, GamePhase, GameState, Paddle, Side};
use crate::clamp;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-up key held
    pub up: bool,
    /// Move-down key held
    pub down: bool,
    /// Pointer position (surface y) received since the last frame; takes
    /// priority over the keys
    pub pointer_y: Option<f32>,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Demo mode - the left paddle tracks the ball like the computer does
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
///
/// `dt` is expected to be pre-clamped by the frame driver. Frozen states
/// (manual pause, match over) are left untouched; during the serve delay
/// only the countdown moves.
pub fn advance(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.toggle_pause {
        state.toggle_pause();
    }

    if !state.running || state.paused {
        return;
    }

    let dt = dt.max(0.0);

    if let GamePhase::Serving { remaining } = state.phase {
        let remaining = remaining - dt;
        state.phase = if remaining > 0.0 {
            GamePhase::Serving { remaining }
        } else {
            GamePhase::Rallying
        };
        return;
    }

    state.time_ticks += 1;

    let height = state.settings.surface_height;

    // Human paddle
    if input.autopilot {
        // Drifting aim point so demo rallies get angled returns
        let t = state.time_ticks as f32 * 0.01;
        let offset = (t.sin() * 0.3 + (t * 0.7).sin() * 0.15) * state.left.height;
        let target = state.ball.pos.y + offset;
        track(&mut state.left, target, state.settings.ai_speed, dt);
    } else if let Some(pointer_y) = input.pointer_y {
        state.left.vel_y = 0.0;
        state.left.pos.y = pointer_y - state.left.height / 2.0;
    } else {
        let speed = state.settings.paddle_speed;
        state.left.vel_y = match (input.up, input.down) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };
        state.left.pos.y += state.left.vel_y * dt;
    }
    state.left.clamp_to(height);

    // Computer paddle
    let target = state.ball.pos.y;
    track(&mut state.right, target, state.settings.ai_speed, dt);
    state.right.clamp_to(height);

    // Ball
    state.ball.pos += state.ball.vel * dt;

    // Top/bottom walls
    let r = state.ball.radius;
    if state.ball.pos.y - r < 0.0 {
        state.ball.pos.y = r;
        state.ball.vel.y = state.ball.vel.y.abs();
        state.emit(GameEvent::WallBounce);
    } else if state.ball.pos.y + r > height {
        state.ball.pos.y = height - r;
        state.ball.vel.y = -state.ball.vel.y.abs();
        state.emit(GameEvent::WallBounce);
    }

    // Paddles, only the one the ball is heading for
    if state.ball.vel.x < 0.0 {
        resolve_paddle_hit(state, Side::Left);
    } else if state.ball.vel.x > 0.0 {
        resolve_paddle_hit(state, Side::Right);
    }

    // Scoring
    let width = state.settings.surface_width;
    if state.ball.pos.x - r < 0.0 {
        state.award_point(Side::Right);
    } else if state.ball.pos.x + r > width {
        state.award_point(Side::Left);
    }
}

/// Move a paddle's center toward `target_y`, at most `speed * dt`
///
/// Snaps exactly onto the target once within reach so it never oscillates.
fn track(paddle: &mut Paddle, target_y: f32, speed: f32, dt: f32) {
    let target = target_y - paddle.height / 2.0;
    let diff = target - paddle.pos.y;
    let max_move = speed * dt;

    let step = if diff.abs() > max_move {
        diff.signum() * max_move
    } else {
        diff
    };
    paddle.vel_y = if dt > 0.0 { step / dt } else { 0.0 };
    paddle.pos.y += step;
}

/// Bounce the ball off `side`'s paddle if they overlap
///
/// The deflection angle scales with how far from the paddle's center the
/// ball struck; speed grows by the configured factor on every hit.
fn resolve_paddle_hit(state: &mut GameState, side: Side) {
    let paddle = state.paddle(side).clone();
    let ball = &mut state.ball;

    if !circle_intersects_rect(ball.pos, ball.radius, paddle.pos, paddle.size()) {
        return;
    }

    let relative = clamp(
        (paddle.center_y() - ball.pos.y) / (paddle.height / 2.0),
        -1.0,
        1.0,
    );
    let bounce_angle = relative * state.settings.max_bounce_angle;
    let speed = ball.speed() * state.settings.speed_increase;
    let away = match side {
        Side::Left => 1.0,
        Side::Right => -1.0,
    };

    ball.vel = Vec2::new(
        away * speed * bounce_angle.cos(),
        -speed * bounce_angle.sin(),
    );
    ball.pos.x = match side {
        Side::Left => paddle.pos.x + paddle.width + ball.radius,
        Side::Right => paddle.pos.x - ball.radius,
    };

    log::debug!(
        "{} paddle hit: angle {:.1} deg, speed {:.0}",
        side.as_str(),
        bounce_angle.to_degrees(),
        speed
    );
    state.emit(GameEvent::PaddleHit { side });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_FRAME_DT;
    use crate::settings::Settings;
    use proptest::prelude::*;

    const DT: f32 = NOMINAL_FRAME_DT;

    /// Fresh match with the serve delay already over
    fn rallying(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        state.phase = GamePhase::Rallying;
        state.drain_events();
        state
    }

    /// Ball parked just in front of `side`'s paddle, moving into it
    fn aimed_at(state: &mut GameState, side: Side, offset_from_center: f32) {
        let paddle = state.paddle(side).clone();
        let r = state.ball.radius;
        let speed = state.settings.ball_start_speed;
        state.ball.pos.y = paddle.center_y() - offset_from_center;
        match side {
            Side::Left => {
                state.ball.pos.x = paddle.pos.x + paddle.width + r - 1.0;
                state.ball.vel = Vec2::new(-speed, 0.0);
            }
            Side::Right => {
                state.ball.pos.x = paddle.pos.x - r + 1.0;
                state.ball.vel = Vec2::new(speed, 0.0);
            }
        }
    }

    #[test]
    fn test_serve_delay_counts_down() {
        let mut state = GameState::new(1, Settings::default());
        let start = state.ball.pos;
        let delay = state.settings.serve_delay;

        let frames = (delay / 0.1).round() as usize;
        for _ in 0..frames - 1 {
            advance(&mut state, &TickInput::default(), 0.1);
            assert!(matches!(state.phase, GamePhase::Serving { .. }));
            assert_eq!(state.ball.pos, start);
        }
        advance(&mut state, &TickInput::default(), 0.1 + 1e-4);
        assert_eq!(state.phase, GamePhase::Rallying);

        advance(&mut state, &TickInput::default(), DT);
        assert_ne!(state.ball.pos, start);
    }

    #[test]
    fn test_manual_pause_freezes_serve_countdown() {
        let mut state = GameState::new(1, Settings::default());
        let toggle = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        advance(&mut state, &toggle, 5.0);
        assert!(state.paused);
        assert!(matches!(state.phase, GamePhase::Serving { .. }));

        advance(&mut state, &TickInput::default(), 5.0);
        assert!(matches!(state.phase, GamePhase::Serving { .. }));
    }

    #[test]
    fn test_keyboard_moves_human_paddle() {
        let mut state = rallying(3);
        let y0 = state.left.pos.y;
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        advance(&mut state, &up, 0.1);
        assert!((state.left.pos.y - (y0 - state.settings.paddle_speed * 0.1)).abs() < 1e-3);
        assert_eq!(state.left.vel_y, -state.settings.paddle_speed);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut state = rallying(3);
        let y0 = state.left.pos.y;
        let both = TickInput {
            up: true,
            down: true,
            ..Default::default()
        };
        advance(&mut state, &both, 0.1);
        assert_eq!(state.left.pos.y, y0);
        assert_eq!(state.left.vel_y, 0.0);
    }

    #[test]
    fn test_pointer_overrides_keys() {
        let mut state = rallying(3);
        let input = TickInput {
            down: true,
            pointer_y: Some(100.0),
            ..Default::default()
        };
        advance(&mut state, &input, DT);
        assert_eq!(state.left.center_y(), 100.0);

        // Pointer far outside is clamped
        let input = TickInput {
            pointer_y: Some(-400.0),
            ..Default::default()
        };
        advance(&mut state, &input, DT);
        assert_eq!(state.left.pos.y, 0.0);
    }

    #[test]
    fn test_computer_paddle_rate_limited() {
        let mut state = rallying(5);
        state.ball.pos = Vec2::new(400.0, 20.0);
        state.ball.vel = Vec2::ZERO;
        let y0 = state.right.pos.y;

        advance(&mut state, &TickInput::default(), 0.1);
        let moved = y0 - state.right.pos.y;
        assert!((moved - state.settings.ai_speed * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_computer_paddle_snaps_when_close() {
        let mut state = rallying(5);
        let center = state.right.center_y();
        state.ball.pos = Vec2::new(400.0, center + 3.0);
        state.ball.vel = Vec2::ZERO;

        advance(&mut state, &TickInput::default(), 0.1);
        assert!((state.right.center_y() - (center + 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_top() {
        let mut state = rallying(9);
        state.ball.pos = Vec2::new(400.0, state.ball.radius + 1.0);
        state.ball.vel = Vec2::new(100.0, -300.0);

        advance(&mut state, &TickInput::default(), 0.1);

        assert_eq!(state.ball.pos.y, state.ball.radius);
        assert!(state.ball.vel.y > 0.0);
        assert!(state.drain_events().contains(&GameEvent::WallBounce));
    }

    #[test]
    fn test_wall_bounce_bottom() {
        let mut state = rallying(9);
        let height = state.settings.surface_height;
        state.ball.pos = Vec2::new(400.0, height - state.ball.radius - 1.0);
        state.ball.vel = Vec2::new(-100.0, 300.0);

        advance(&mut state, &TickInput::default(), 0.1);

        assert_eq!(state.ball.pos.y, height - state.ball.radius);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_center_hit_rebounds_horizontally() {
        let mut state = rallying(11);
        aimed_at(&mut state, Side::Left, 0.0);
        let speed = state.ball.speed();

        advance(&mut state, &TickInput::default(), 0.0);

        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.vel.y.abs() < 1e-3);
        assert!((state.ball.speed() - speed * state.settings.speed_increase).abs() < 1e-2);
        assert_eq!(
            state.ball.pos.x,
            state.left.pos.x + state.left.width + state.ball.radius
        );
        assert!(state.drain_events().contains(&GameEvent::PaddleHit { side: Side::Left }));
    }

    #[test]
    fn test_edge_hit_uses_max_angle() {
        let mut state = rallying(11);
        let half = state.settings.paddle_height / 2.0;
        aimed_at(&mut state, Side::Left, half);

        advance(&mut state, &TickInput::default(), 0.0);

        let angle = (-state.ball.vel.y).atan2(state.ball.vel.x);
        assert!((angle - state.settings.max_bounce_angle).abs() < 1e-4);
        assert!(state.ball.vel.y < 0.0, "top-edge hit goes up");
    }

    #[test]
    fn test_right_paddle_hit_sends_ball_left() {
        let mut state = rallying(13);
        // dt = 0 keeps the computer paddle where it is
        aimed_at(&mut state, Side::Right, -20.0);
        let speed = state.ball.speed();

        advance(&mut state, &TickInput::default(), 0.0);

        assert!(state.ball.vel.x < 0.0);
        assert!(state.ball.vel.y > 0.0, "hit below center goes down");
        assert!((state.ball.speed() - speed * state.settings.speed_increase).abs() < 1e-2);
        assert_eq!(state.ball.pos.x, state.right.pos.x - state.ball.radius);
    }

    #[test]
    fn test_receding_ball_not_bounced() {
        let mut state = rallying(11);
        aimed_at(&mut state, Side::Left, 0.0);
        state.ball.vel.x = -state.ball.vel.x;
        let vel = state.ball.vel;

        advance(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.ball.vel, vel);
    }

    #[test]
    fn test_ball_past_left_edge_scores_right() {
        let mut state = rallying(17);
        state.ball.pos = Vec2::new(0.0, 30.0);
        state.ball.vel = Vec2::new(-200.0, 0.0);

        advance(&mut state, &TickInput::default(), DT);

        assert_eq!(state.right_score, 1);
        assert_eq!(state.left_score, 0);
        assert!(state.ball.vel.x < 0.0, "re-serve toward the left");
        assert!(matches!(state.phase, GamePhase::Serving { .. }));
    }

    #[test]
    fn test_ball_past_right_edge_scores_left() {
        let mut state = rallying(17);
        state.ball.pos = Vec2::new(state.settings.surface_width, 30.0);
        state.ball.vel = Vec2::new(200.0, 0.0);

        advance(&mut state, &TickInput::default(), DT);

        assert_eq!(state.left_score, 1);
        assert_eq!(state.right_score, 0);
        assert!(state.ball.vel.x > 0.0, "re-serve toward the right");
    }

    #[test]
    fn test_winning_point_stops_simulation() {
        let mut state = rallying(19);
        state.right_score = state.settings.win_score - 1;
        state.ball.pos = Vec2::new(0.0, 30.0);
        state.ball.vel = Vec2::new(-200.0, 0.0);

        advance(&mut state, &TickInput::default(), DT);
        assert!(!state.running);
        assert_eq!(state.phase, GamePhase::MatchEnded { winner: Side::Right });

        let ball = state.ball.pos;
        let paddle = state.left.pos;
        for _ in 0..10 {
            let input = TickInput {
                up: true,
                ..Default::default()
            };
            advance(&mut state, &input, DT);
        }
        assert_eq!(state.ball.pos, ball);
        assert_eq!(state.left.pos, paddle);

        let outcomes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MatchEnded { .. }))
            .count();
        assert_eq!(outcomes, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Settings::default());
        let mut state2 = GameState::new(99999, Settings::default());

        let inputs = [
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput {
                pointer_y: Some(300.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            advance(&mut state1, input, DT);
            advance(&mut state2, input, DT);
        }

        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.left_score, state2.left_score);
        assert_eq!(state1.right_score, state2.right_score);
    }

    #[test]
    fn test_autopilot_match_finishes() {
        let mut state = GameState::new(2024, Settings::default());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut frames = 0;
        while state.running && frames < 60 * 60 * 30 {
            advance(&mut state, &input, DT);
            frames += 1;
        }
        assert!(!state.running, "match should end");
        let winner = state.left_score.max(state.right_score);
        assert_eq!(winner, state.settings.win_score);
    }

    fn tick_input() -> impl Strategy<Value = TickInput> {
        (
            any::<bool>(),
            any::<bool>(),
            proptest::option::of(-200.0f32..800.0),
        )
            .prop_map(|(up, down, pointer_y)| TickInput {
                up,
                down,
                pointer_y,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn prop_paddles_stay_on_surface(
            seed in any::<u64>(),
            frames in proptest::collection::vec((tick_input(), 0.0f32..0.05), 1..300),
        ) {
            let mut state = GameState::new(seed, Settings::default());
            let height = state.settings.surface_height;
            for (input, dt) in &frames {
                advance(&mut state, input, *dt);
                for paddle in [&state.left, &state.right] {
                    prop_assert!(paddle.pos.y >= 0.0);
                    prop_assert!(paddle.pos.y <= height - paddle.height);
                }
            }
        }

        #[test]
        fn prop_paused_advance_is_noop(
            seed in any::<u64>(),
            input in tick_input(),
            dt in 0.0f32..10.0,
        ) {
            let mut state = rallying(seed);
            state.paused = true;
            let ball = state.ball.clone();
            let (left, right) = (state.left.pos, state.right.pos);

            advance(&mut state, &input, dt);

            prop_assert_eq!(state.ball.pos, ball.pos);
            prop_assert_eq!(state.ball.vel, ball.vel);
            prop_assert_eq!(state.left.pos, left);
            prop_assert_eq!(state.right.pos, right);
            prop_assert_eq!(state.left_score, 0);
            prop_assert_eq!(state.right_score, 0);
        }

        #[test]
        fn prop_bounce_scales_speed(
            seed in any::<u64>(),
            offset in -45.0f32..45.0,
            side in prop_oneof![Just(Side::Left), Just(Side::Right)],
        ) {
            let mut state = rallying(seed);
            aimed_at(&mut state, side, offset);
            let speed = state.ball.speed();

            advance(&mut state, &TickInput::default(), 0.0);

            let expected = speed * state.settings.speed_increase;
            prop_assert!((state.ball.speed() - expected).abs() < 1e-2);
            match side {
                Side::Left => prop_assert!(state.ball.vel.x > 0.0),
                Side::Right => prop_assert!(state.ball.vel.x < 0.0),
            }
        }
    }
}
