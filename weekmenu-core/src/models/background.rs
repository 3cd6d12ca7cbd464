use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#67e8f9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Dots,
    Grid,
    Solid,
    None,
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundKind::Dots => write!(f, "dots"),
            BackgroundKind::Grid => write!(f, "grid"),
            BackgroundKind::Solid => write!(f, "solid"),
            BackgroundKind::None => write!(f, "none"),
        }
    }
}

impl FromStr for BackgroundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dots" => Ok(BackgroundKind::Dots),
            "grid" => Ok(BackgroundKind::Grid),
            "solid" => Ok(BackgroundKind::Solid),
            "none" => Ok(BackgroundKind::None),
            _ => Err(format!(
                "Invalid background type '{}'. Valid options: dots, grid, solid, none",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub color: String,
}

impl BackgroundSettings {
    pub fn new(kind: BackgroundKind, color: impl Into<String>) -> Self {
        Self {
            kind,
            color: color.into(),
        }
    }
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self::new(BackgroundKind::Dots, DEFAULT_BACKGROUND_COLOR)
    }
}
