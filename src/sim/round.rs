//! Round lifecycle: serves, scoring, match end, reset

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, GameEvent, GamePhase, GameState, Paddle, ServeDirection, Side};

impl GameState {
    /// Put the ball back at center and launch it at the initial speed
    ///
    /// The angle is drawn uniformly from the configured band around the
    /// horizontal, so serves are never close to vertical.
    pub fn serve(&mut self, direction: ServeDirection) {
        let band = self.settings.serve_angle_band;
        let angle = if band > 0.0 {
            self.rng.random_range(-band..=band)
        } else {
            0.0
        };
        let toward_right = match direction {
            ServeDirection::TowardLeft => false,
            ServeDirection::TowardRight => true,
            ServeDirection::Random => self.rng.random_bool(0.5),
        };
        let sign = if toward_right { 1.0 } else { -1.0 };
        let speed = self.settings.ball_start_speed;

        self.ball = Ball::new(&self.settings);
        self.ball.vel = Vec2::new(sign * angle.cos(), angle.sin()) * speed;

        let resolved = if toward_right {
            ServeDirection::TowardRight
        } else {
            ServeDirection::TowardLeft
        };
        log::info!("Serve {:?} at {:.1} deg", resolved, angle.to_degrees());
        self.emit(GameEvent::Served {
            direction: resolved,
        });
    }

    /// Freeze physics for the serve delay; the countdown runs in `advance`
    pub fn begin_serve_delay(&mut self) {
        let remaining = self.settings.serve_delay;
        self.phase = if remaining > 0.0 {
            GamePhase::Serving { remaining }
        } else {
            GamePhase::Rallying
        };
    }

    /// Credit a point to `scorer`
    ///
    /// Either re-serves toward the side that conceded (after the serve delay)
    /// or, when `scorer` reaches the winning score, ends the match.
    pub fn award_point(&mut self, scorer: Side) {
        if !self.running {
            return;
        }

        let score = match scorer {
            Side::Left => {
                self.left_score += 1;
                self.left_score
            }
            Side::Right => {
                self.right_score += 1;
                self.right_score
            }
        };
        let (left, right) = (self.left_score, self.right_score);
        log::info!("{} scores: {} - {}", scorer.as_str(), left, right);
        self.emit(GameEvent::ScoreChanged {
            side: scorer,
            score,
        });

        if score >= self.settings.win_score {
            self.running = false;
            self.paused = true;
            self.phase = GamePhase::MatchEnded { winner: scorer };
            self.ball.vel = Vec2::ZERO;
            log::info!("Match over, {} wins", scorer.as_str());
            self.emit(GameEvent::MatchEnded { winner: scorer });
            return;
        }

        self.serve(scorer.opponent().into());
        self.begin_serve_delay();
    }

    /// Start over without rebuilding the game: zero scores, fresh serve,
    /// unpaused and running
    pub fn reset(&mut self) {
        self.left_score = 0;
        self.right_score = 0;
        self.left = Paddle::new(Side::Left, &self.settings);
        self.right = Paddle::new(Side::Right, &self.settings);
        self.paused = false;
        self.running = true;
        self.phase = GamePhase::Rallying;

        log::info!("Match reset");
        self.emit(GameEvent::ScoreChanged {
            side: Side::Left,
            score: 0,
        });
        self.emit(GameEvent::ScoreChanged {
            side: Side::Right,
            score: 0,
        });
        self.serve(ServeDirection::Random);
    }

    /// Flip the manual pause; ignored once the match has ended
    pub fn toggle_pause(&mut self) {
        if !self.running {
            return;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }
}
