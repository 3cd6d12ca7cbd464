use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-defined dish category such as "大荤", keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.color)
    }
}

/// Partial update for a tag. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TagUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        let tag = Tag::new("海鲜", "#3b82f6");
        assert_eq!(format!("{}", tag), "海鲜 (#3b82f6)");
    }

    #[test]
    fn test_tag_update_builder() {
        let update = TagUpdate::rename("蔬食").with_color("#22c55e");
        assert_eq!(update.name.as_deref(), Some("蔬食"));
        assert_eq!(update.color.as_deref(), Some("#22c55e"));
    }
}
