#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// Goal placement found no platform to anchor on.
    NoPlatforms,
    /// A config value is out of range.
    InvalidConfig(String),
    /// The TOML text could not be parsed or merged.
    ConfigParse(String),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlatforms => write!(f, "no platforms available for goal placement"),
            Self::InvalidConfig(m) => write!(f, "invalid level config: {m}"),
            Self::ConfigParse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {}
