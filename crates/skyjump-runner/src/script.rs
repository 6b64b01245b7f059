use std::fmt;
use std::path::Path;

use serde::Deserialize;

use skyjump_core::input::{Key, KeyEvent};

/// Frames between hops in the built-in script.
const DEFAULT_JUMP_INTERVAL: u64 = 30;

#[derive(Debug)]
pub enum ScriptError {
    Io(String),
    Parse(String),
    UnknownKey(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(msg) => write!(f, "cannot read script: {msg}"),
            ScriptError::Parse(msg) => write!(f, "malformed script: {msg}"),
            ScriptError::UnknownKey(key) => write!(f, "unknown key {key:?}"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// On-disk form: `[[events]]` tables with a frame number and a browser key name.
#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    events: Vec<ScriptEntry>,
}

#[derive(Debug, Deserialize)]
struct ScriptEntry {
    frame: u64,
    key: String,
    #[serde(default = "default_pressed")]
    pressed: bool,
}

fn default_pressed() -> bool {
    true
}

/// Key events keyed by the frame they fire on, in frame order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputScript {
    events: Vec<(u64, KeyEvent)>,
}

impl InputScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(text).map_err(|e| ScriptError::Parse(e.to_string()))?;
        let mut events = file
            .events
            .into_iter()
            .map(|entry| {
                let key = Key::from_dom_key(&entry.key)
                    .ok_or_else(|| ScriptError::UnknownKey(entry.key.clone()))?;
                Ok((
                    entry.frame,
                    KeyEvent {
                        key,
                        pressed: entry.pressed,
                    },
                ))
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;
        events.sort_by_key(|(frame, _)| *frame);
        Ok(Self { events })
    }

    /// Hold right for the whole run and hop at a fixed interval.
    pub fn run_and_jump(frames: u64) -> Self {
        let mut events = vec![(0, KeyEvent::down(Key::ArrowRight))];
        events.extend(
            (1..frames)
                .filter(|f| f % DEFAULT_JUMP_INTERVAL == 0)
                .map(|f| (f, KeyEvent::down(Key::Space))),
        );
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events scheduled for `frame`, in script order.
    pub fn at(&self, frame: u64) -> impl Iterator<Item = KeyEvent> + '_ {
        let start = self.events.partition_point(|(f, _)| *f < frame);
        self.events[start..]
            .iter()
            .take_while(move |(f, _)| *f == frame)
            .map(|(_, event)| *event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_key_names() {
        let script = InputScript::parse(
            r#"
            [[events]]
            frame = 10
            key = " "

            [[events]]
            frame = 0
            key = "ArrowRight"

            [[events]]
            frame = 90
            key = "ArrowRight"
            pressed = false
            "#,
        )
        .unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(
            script.at(0).collect::<Vec<_>>(),
            vec![KeyEvent::down(Key::ArrowRight)]
        );
        assert_eq!(
            script.at(10).collect::<Vec<_>>(),
            vec![KeyEvent::down(Key::Space)]
        );
        assert_eq!(
            script.at(90).collect::<Vec<_>>(),
            vec![KeyEvent::up(Key::ArrowRight)]
        );
        assert_eq!(script.at(5).count(), 0);
    }

    #[test]
    fn same_frame_keeps_order() {
        let script = InputScript::parse(
            r#"
            [[events]]
            frame = 3
            key = "d"

            [[events]]
            frame = 3
            key = "l"
            "#,
        )
        .unwrap();
        assert_eq!(
            script.at(3).collect::<Vec<_>>(),
            vec![
                KeyEvent::down(Key::ToggleDebug),
                KeyEvent::down(Key::ToggleDebugLog)
            ]
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let err = InputScript::parse("[[events]]\nframe = 1\nkey = \"q\"\n").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownKey(ref k) if k == "q"));
    }

    #[test]
    fn malformed_script_rejected() {
        assert!(matches!(
            InputScript::parse("[[events]]\nframe = \"soon\""),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn empty_script() {
        assert!(InputScript::parse("").unwrap().is_empty());
    }

    #[test]
    fn default_script_holds_right_and_hops() {
        let script = InputScript::run_and_jump(100);
        assert_eq!(
            script.at(0).collect::<Vec<_>>(),
            vec![KeyEvent::down(Key::ArrowRight)]
        );
        assert_eq!(script.at(30).count(), 1);
        assert_eq!(script.at(31).count(), 0);
        assert_eq!(script.len(), 4);
    }
}
