//! Key bindings for the human paddle
//!
//! Hosts forward raw key codes; this maps them to the handful of actions the
//! game understands.

use serde::{Deserialize, Serialize};

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    /// Move the human paddle up while held
    Up,
    /// Move the human paddle down while held
    Down,
    /// Toggle the manual pause (on key-down only)
    TogglePause,
}

/// Key code bindings (browser `KeyboardEvent.key` values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            up: vec!["ArrowUp".into(), "w".into(), "W".into()],
            down: vec!["ArrowDown".into(), "s".into(), "S".into()],
            pause: vec!["p".into(), "P".into()],
        }
    }
}

impl Controls {
    /// Look up the action bound to `code`, if any
    pub fn action_for(&self, code: &str) -> Option<KeyAction> {
        let bound = |keys: &[String]| keys.iter().any(|k| k == code);
        if bound(&self.up) {
            Some(KeyAction::Up)
        } else if bound(&self.down) {
            Some(KeyAction::Down)
        } else if bound(&self.pause) {
            Some(KeyAction::TogglePause)
        } else {
            None
        }
    }
}
