use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an ingredient is a main or a supporting ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    #[default]
    Main,
    Sub,
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientKind::Main => write!(f, "main"),
            IngredientKind::Sub => write!(f, "sub"),
        }
    }
}

impl FromStr for IngredientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(IngredientKind::Main),
            "sub" => Ok(IngredientKind::Sub),
            _ => Err(format!(
                "Invalid ingredient type '{}'. Valid options: main, sub",
                s
            )),
        }
    }
}

/// Named ingredient color preset.
///
/// Older saves stored one of these names in a single `color` field; the
/// current format stores the expanded background/text pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngredientColor {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

impl IngredientColor {
    pub const ALL: [IngredientColor; 10] = [
        IngredientColor::Default,
        IngredientColor::Gray,
        IngredientColor::Brown,
        IngredientColor::Orange,
        IngredientColor::Yellow,
        IngredientColor::Green,
        IngredientColor::Blue,
        IngredientColor::Purple,
        IngredientColor::Pink,
        IngredientColor::Red,
    ];

    /// Background color of the preset.
    pub fn bg(self) -> &'static str {
        match self {
            IngredientColor::Default => "#F1F1EF",
            IngredientColor::Gray => "#E3E2E0",
            IngredientColor::Brown => "#EEE0DA",
            IngredientColor::Orange => "#FADEC9",
            IngredientColor::Yellow => "#FDECC8",
            IngredientColor::Green => "#DBEDDB",
            IngredientColor::Blue => "#D3E5EF",
            IngredientColor::Purple => "#E8DEEE",
            IngredientColor::Pink => "#F5E0E9",
            IngredientColor::Red => "#FFE2DD",
        }
    }

    /// Text color of the preset.
    pub fn text(self) -> &'static str {
        match self {
            IngredientColor::Default => "#37352F",
            IngredientColor::Gray => "#32302C",
            IngredientColor::Brown => "#442A1E",
            IngredientColor::Orange => "#49290E",
            IngredientColor::Yellow => "#402C1B",
            IngredientColor::Green => "#1C3829",
            IngredientColor::Blue => "#183347",
            IngredientColor::Purple => "#412454",
            IngredientColor::Pink => "#4C2337",
            IngredientColor::Red => "#5D1715",
        }
    }
}

impl fmt::Display for IngredientColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngredientColor::Default => "default",
            IngredientColor::Gray => "gray",
            IngredientColor::Brown => "brown",
            IngredientColor::Orange => "orange",
            IngredientColor::Yellow => "yellow",
            IngredientColor::Green => "green",
            IngredientColor::Blue => "blue",
            IngredientColor::Purple => "purple",
            IngredientColor::Pink => "pink",
            IngredientColor::Red => "red",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for IngredientColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        IngredientColor::ALL
            .into_iter()
            .find(|c| c.to_string() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid ingredient color '{}'. Valid options: default, gray, brown, orange, \
                     yellow, green, blue, purple, pink, red",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub bg_color: String,
    pub text_color: String,
    #[serde(rename = "type")]
    pub kind: IngredientKind,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_preset(name, IngredientColor::Default)
    }

    pub fn with_preset(name: impl Into<String>, color: IngredientColor) -> Self {
        Self {
            name: name.into(),
            bg_color: color.bg().to_string(),
            text_color: color.text().to_string(),
            kind: IngredientKind::Main,
        }
    }

    pub fn with_colors(mut self, bg_color: impl Into<String>, text_color: impl Into<String>) -> Self {
        self.bg_color = bg_color.into();
        self.text_color = text_color.into();
        self
    }

    pub fn with_kind(mut self, kind: IngredientKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.kind)
    }
}

/// Partial update for an ingredient. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub kind: Option<IngredientKind>,
}

impl IngredientUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
