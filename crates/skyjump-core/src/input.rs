use serde::{Deserialize, Serialize};

/// Keys the game reacts to. Names follow `KeyboardEvent.key` in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    /// `d`: toggle debug mode.
    ToggleDebug,
    /// `l`: toggle the debug log.
    ToggleDebugLog,
    /// `r`: reset the level.
    Reset,
    /// `t`: toggle the test panel.
    ToggleTestPanel,
}

impl Key {
    /// Map a `KeyboardEvent.key` value. Unknown keys map to `None`.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            " " | "Space" | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "d" => Some(Key::ToggleDebug),
            "l" => Some(Key::ToggleDebugLog),
            "r" => Some(Key::Reset),
            "t" => Some(Key::ToggleTestPanel),
            _ => None,
        }
    }
}

/// A single key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}
