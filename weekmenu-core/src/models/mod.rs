mod background;
mod dish;
mod ingredient;
mod menu;
mod tag;

pub use background::{BackgroundKind, BackgroundSettings, DEFAULT_BACKGROUND_COLOR};
pub use dish::{Dish, DishUpdate, NewDish};
pub use ingredient::{Ingredient, IngredientColor, IngredientKind, IngredientUpdate};
pub use menu::{DayMenu, MenuEntry};
pub use tag::{Tag, TagUpdate};

/// Trims every name, drops empty ones and keeps the first occurrence of each.
///
/// Dish tag/ingredient sets and entry templates are stored as ordered lists;
/// this is what keeps them behaving as sets.
pub(crate) fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.as_ref().trim();
        if !trimmed.is_empty() && !out.iter().any(|n| n == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Replaces `old` with `new` in a name set, collapsing a resulting duplicate.
///
/// Returns `None` when `old` was not present.
pub(crate) fn rename_in(names: &[String], old: &str, new: &str) -> Option<Vec<String>> {
    if !names.iter().any(|n| n == old) {
        return None;
    }
    Some(normalize_names(
        names.iter().map(|n| if n == old { new } else { n.as_str() }),
    ))
}

/// Removes `name` from a name set. Returns `None` when it was not present.
pub(crate) fn remove_from(names: &[String], name: &str) -> Option<Vec<String>> {
    if !names.iter().any(|n| n == name) {
        return None;
    }
    Some(names.iter().filter(|n| *n != name).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_names() {
        let names = normalize_names([" 大荤", "海鲜", "", "大荤", "  "]);
        assert_eq!(names, vec!["大荤".to_string(), "海鲜".to_string()]);
    }

    #[test]
    fn test_rename_in_collapses_duplicates() {
        let names = vec!["素菜".to_string(), "蔬食".to_string()];
        assert_eq!(rename_in(&names, "素菜", "蔬食"), Some(vec!["蔬食".to_string()]));
        assert_eq!(rename_in(&names, "汤", "羹"), None);
    }

    #[test]
    fn test_remove_from() {
        let names = vec!["汤".to_string(), "海鲜".to_string()];
        assert_eq!(remove_from(&names, "汤"), Some(vec!["海鲜".to_string()]));
        assert_eq!(remove_from(&names, "主食"), None);
    }
}
