use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::normalize_names;

/// One slot in a day.
///
/// `dish_name` is a weak reference into the dish catalog: it may be empty or
/// name a dish that no longer exists. `tags` is the slot's filter template
/// for generation, independent of the referenced dish's own tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: String,
    pub dish_name: String,
    pub tags: Vec<String>,
}

impl MenuEntry {
    /// Creates an entry with a fresh id.
    pub fn new<I, S>(dish_name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_id(new_entry_id(), dish_name, tags)
    }

    pub fn with_id<I, S>(id: impl Into<String>, dish_name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            dish_name: dish_name.into(),
            tags: normalize_names(tags),
        }
    }

    /// Copy of this entry under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_entry_id(),
            dish_name: self.dish_name.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dish_name.is_empty()
    }
}

pub(crate) fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// A day container. `day` is an editable label, not a key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMenu {
    pub day: String,
    pub color: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub entries: Vec<MenuEntry>,
}

impl DayMenu {
    pub fn new(day: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            color: color.into(),
            locked: false,
            note: None,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(mut self, entries: Vec<MenuEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn entry_index(&self, entry_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == entry_id)
    }

    pub fn entry(&self, entry_id: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}

impl fmt::Display for DayMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lock = if self.locked { " [locked]" } else { "" };
        writeln!(f, "{} ({}){}", self.day, self.color, lock)?;

        if let Some(note) = &self.note {
            writeln!(f, "  Note: {}", note)?;
        }

        for entry in &self.entries {
            let dish = if entry.dish_name.is_empty() {
                "(empty)"
            } else {
                entry.dish_name.as_str()
            };
            if entry.tags.is_empty() {
                writeln!(f, "  - {}", dish)?;
            } else {
                writeln!(f, "  - {} [{}]", dish, entry.tags.join(", "))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new_has_unique_id() {
        let a = MenuEntry::new("白米饭", ["主食"]);
        let b = MenuEntry::new("白米饭", ["主食"]);
        assert_ne!(a.id, b.id);
        assert_eq!(a.tags, vec!["主食"]);
    }

    #[test]
    fn test_entry_duplicate_keeps_dish_and_template() {
        let entry = MenuEntry::with_id("entry-1", "虾仁炒蛋", ["小荤", "海鲜"]);
        let copy = entry.duplicate();
        assert_ne!(copy.id, entry.id);
        assert_eq!(copy.dish_name, entry.dish_name);
        assert_eq!(copy.tags, entry.tags);
    }

    #[test]
    fn test_day_entry_lookup() {
        let day = DayMenu::new("周一", "#FF9A9E").with_entries(vec![
            MenuEntry::with_id("a", "糖醋排骨", ["大荤"]),
            MenuEntry::with_id("b", "", ["汤"]),
        ]);
        assert_eq!(day.entry_index("b"), Some(1));
        assert!(day.entry("b").unwrap().is_empty());
        assert!(day.entry("missing").is_none());
    }

    #[test]
    fn test_day_json_shape() {
        let day = DayMenu::new("周二", "#A18CD1");
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["locked"], false);
        assert!(json.get("note").is_none());

        let noted = serde_json::to_value(day.with_note("加班")).unwrap();
        assert_eq!(noted["note"], "加班");
    }

    #[test]
    fn test_day_display() {
        let day = DayMenu::new("周三", "#FBC2EB")
            .locked()
            .with_entries(vec![MenuEntry::with_id("x", "", ["汤"])]);
        let output = format!("{}", day);
        assert!(output.contains("周三"));
        assert!(output.contains("[locked]"));
        assert!(output.contains("(empty) [汤]"));
    }
}
