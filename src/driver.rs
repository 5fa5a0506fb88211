//! Frame driver
//!
//! Hosts call [`FrameDriver::frame`] once per display refresh with their
//! wall-clock timestamp. The driver turns that into a clamped `dt`, runs one
//! simulation step and reports whether another frame should be scheduled.
//! Input events arrive between frames and are folded into the next step.

use crate::consts::NOMINAL_FRAME_DT;
use crate::input::KeyAction;
use crate::render::RenderSnapshot;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, advance};

/// Owns one match and the input collected for its next frame
#[derive(Debug, Clone)]
pub struct FrameDriver {
    pub state: GameState,
    input: TickInput,
    last_time: Option<f64>,
}

impl FrameDriver {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            state: GameState::new(seed, settings),
            input: TickInput::default(),
            last_time: None,
        }
    }

    /// Elapsed seconds since the previous frame, clamped to `[0, max_frame_dt]`
    fn frame_dt(&mut self, now: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => (now - last) as f32,
            None => NOMINAL_FRAME_DT,
        };
        self.last_time = Some(now);
        crate::clamp(dt, 0.0, self.state.settings.max_frame_dt)
    }

    /// Run one frame at wall-clock time `now` (seconds)
    ///
    /// Returns `true` while the match is running, i.e. the host should
    /// request another frame.
    pub fn frame(&mut self, now: f64) -> bool {
        let dt = self.frame_dt(now);
        advance(&mut self.state, &self.input, dt);

        // Clear one-shot inputs after processing
        self.input.pointer_y = None;
        self.input.toggle_pause = false;

        self.state.running
    }

    /// Key pressed; returns whether the key is bound
    ///
    /// Auto-repeated presses of the pause key are swallowed so holding it
    /// does not flicker the pause state.
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        match self.state.settings.controls.action_for(code) {
            Some(KeyAction::Up) => self.input.up = true,
            Some(KeyAction::Down) => self.input.down = true,
            Some(KeyAction::TogglePause) => {
                if !repeat {
                    self.toggle_pause();
                }
            }
            None => return false,
        }
        true
    }

    /// Key released; returns whether the key is bound
    pub fn key_up(&mut self, code: &str) -> bool {
        match self.state.settings.controls.action_for(code) {
            Some(KeyAction::Up) => self.input.up = false,
            Some(KeyAction::Down) => self.input.down = false,
            Some(KeyAction::TogglePause) => {}
            None => return false,
        }
        true
    }

    /// Pointer moved to surface height `y`; drives the paddle next frame
    pub fn pointer_move(&mut self, y: f32) {
        self.input.pointer_y = Some(y);
    }

    /// Queue a manual pause toggle for the next frame
    pub fn toggle_pause(&mut self) {
        self.input.toggle_pause = !self.input.toggle_pause;
    }

    /// Let the computer drive the human paddle too
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Restart the match in place
    ///
    /// Held keys and the frame clock are kept; after a finished match the
    /// host must start scheduling frames again.
    pub fn reset(&mut self) {
        self.input.toggle_pause = false;
        self.input.pointer_y = None;
        self.state.reset();
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }
}
