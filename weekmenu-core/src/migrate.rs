//! Upgrades whatever blob the key-value store hands back into a current
//! [`PersistedState`].
//!
//! Migration is total and idempotent. Each top-level field is reconciled on
//! its own; a field that is missing or has the wrong shape falls back to the
//! built-in default without affecting the others. Unknown fields are dropped.

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::defaults::{self, FALLBACK_TAG_COLOR, MAX_DAYS};
use crate::models::{
    normalize_names, BackgroundKind, BackgroundSettings, DayMenu, Dish, Ingredient,
    IngredientColor, IngredientKind, MenuEntry, Tag, DEFAULT_BACKGROUND_COLOR,
};
use crate::state::PersistedState;

/// Parses and migrates stored text. Text that is not JSON migrates like `null`.
pub fn migrate_str(text: &str) -> PersistedState {
    let value = serde_json::from_str(text).unwrap_or_else(|err| {
        tracing::info!(error = %err, "Stored state is not valid JSON, using defaults");
        Value::Null
    });
    migrate(&value)
}

pub fn migrate(value: &Value) -> PersistedState {
    let empty = Map::new();
    let fields = unwrap_envelope(value).as_object().unwrap_or(&empty);

    PersistedState {
        dishes: reconcile_dishes(fields.get("dishes")),
        weekly_menu: reconcile_weekly_menu(fields.get("weeklyMenu")),
        ingredients: reconcile_ingredients(fields.get("ingredients")),
        tags: reconcile_tags(fields.get("tags")),
        background_settings: reconcile_background(fields),
    }
}

/// Older saves wrap the record as `{ "state": {...}, "version": n }`.
fn unwrap_envelope(value: &Value) -> &Value {
    match value.get("state") {
        Some(inner @ Value::Object(_))
            if value.get("weeklyMenu").is_none() && value.get("dishes").is_none() =>
        {
            inner
        }
        _ => value,
    }
}

/// A trimmed, non-empty string field.
fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn name_list(value: Option<&Value>) -> Vec<String> {
    let items = value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    normalize_names(items.iter().filter_map(Value::as_str))
}

fn dedupe_by_name<T, F>(items: Vec<T>, kind: &str, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let keep = seen.insert(name(item).to_string());
            if !keep {
                tracing::debug!(kind, name = name(item), "Dropped duplicate catalog entry");
            }
            keep
        })
        .collect()
}

fn array_or_default<'a, T>(
    value: Option<&'a Value>,
    field: &str,
    default: fn() -> Vec<T>,
) -> Result<&'a Vec<Value>, Vec<T>> {
    match value.and_then(Value::as_array) {
        Some(items) => Ok(items),
        None => {
            tracing::info!(field, "Field missing or malformed, using built-in default");
            Err(default())
        }
    }
}

// =============================================================================
// Catalogs
// =============================================================================

fn reconcile_tags(value: Option<&Value>) -> Vec<Tag> {
    let items = match array_or_default(value, "tags", defaults::default_tags) {
        Ok(items) => items,
        Err(fallback) => return fallback,
    };

    let tags: Vec<Tag> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => make_tag(name, None),
            Value::Object(obj) => make_tag(str_field(obj, "name")?, str_field(obj, "color")),
            _ => None,
        })
        .collect();
    dedupe_by_name(tags, "tag", |t| t.name.as_str())
}

fn make_tag(name: &str, color: Option<&str>) -> Option<Tag> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let color = color
        .or_else(|| defaults::default_tag_color(name))
        .unwrap_or(FALLBACK_TAG_COLOR);
    Some(Tag::new(name, color))
}

fn reconcile_ingredients(value: Option<&Value>) -> Vec<Ingredient> {
    let items = match array_or_default(value, "ingredients", defaults::default_ingredients) {
        Ok(items) => items,
        Err(fallback) => return fallback,
    };

    let ingredients: Vec<Ingredient> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => {
                Some(name.trim()).filter(|n| !n.is_empty()).map(Ingredient::new)
            }
            Value::Object(obj) => {
                let name = str_field(obj, "name")?;
                let preset = str_field(obj, "color")
                    .and_then(|c| c.parse::<IngredientColor>().ok())
                    .unwrap_or(IngredientColor::Default);
                let kind = str_field(obj, "type")
                    .and_then(|k| k.parse::<IngredientKind>().ok())
                    .unwrap_or_default();
                Some(
                    Ingredient::new(name)
                        .with_colors(
                            str_field(obj, "bgColor").unwrap_or(preset.bg()),
                            str_field(obj, "textColor").unwrap_or(preset.text()),
                        )
                        .with_kind(kind),
                )
            }
            _ => None,
        })
        .collect();
    dedupe_by_name(ingredients, "ingredient", |i| i.name.as_str())
}

fn reconcile_dishes(value: Option<&Value>) -> Vec<Dish> {
    let items = match array_or_default(value, "dishes", defaults::default_dishes) {
        Ok(items) => items,
        Err(fallback) => return fallback,
    };

    let dishes: Vec<Dish> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name.trim()).filter(|n| !n.is_empty()).map(Dish::new),
            Value::Object(obj) => Some(reconcile_dish(str_field(obj, "name")?, obj)),
            _ => None,
        })
        .collect();
    dedupe_by_name(dishes, "dish", |d| d.name.as_str())
}

fn reconcile_dish(name: &str, obj: &Map<String, Value>) -> Dish {
    // `ingredients` predates the main/sub split.
    let main = obj
        .get("mainIngredients")
        .filter(|v| v.is_array())
        .or_else(|| obj.get("ingredients"));

    let dish = Dish::new(name)
        .with_tags(name_list(obj.get("tags")))
        .with_main_ingredients(name_list(main))
        .with_sub_ingredients(name_list(obj.get("subIngredients")))
        .with_steps(obj.get("steps").and_then(Value::as_str).unwrap_or_default());

    match obj.get("lastUsedAt").and_then(parse_timestamp) {
        Some(at) => dish.with_last_used_at(at),
        None => dish,
    }
}

/// Epoch milliseconds or an RFC 3339 string, truncated to milliseconds so a
/// second pass reads back the same instant.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3)),
        _ => None,
    }
}

// =============================================================================
// Weekly menu
// =============================================================================

fn reconcile_weekly_menu(value: Option<&Value>) -> Vec<DayMenu> {
    let items = match value.and_then(Value::as_array).filter(|a| !a.is_empty()) {
        Some(items) => items,
        None => {
            tracing::info!(field = "weeklyMenu", "Field missing or empty, using built-in default");
            return defaults::initial_weekly_menu();
        }
    };
    if items.len() > MAX_DAYS {
        tracing::info!(days = items.len(), max = MAX_DAYS, "Truncating weekly menu");
    }

    let template = defaults::initial_weekly_menu();
    let mut days: Vec<DayMenu> = items
        .iter()
        .take(MAX_DAYS)
        .enumerate()
        .map(|(index, item)| reconcile_day(index, item, template.get(index)))
        .collect();
    assign_entry_ids(&mut days);
    days
}

fn reconcile_day(index: usize, value: &Value, template: Option<&DayMenu>) -> DayMenu {
    let label = || {
        template
            .map(|t| t.day.clone())
            .unwrap_or_else(|| defaults::weekday_label(index))
    };
    let color = || {
        template
            .map(|t| t.color.clone())
            .unwrap_or_else(|| defaults::palette_color(index).to_string())
    };

    let Some(obj) = value.as_object() else {
        tracing::debug!(index, "Day is not an object, using template day");
        return template
            .cloned()
            .unwrap_or_else(|| DayMenu::new(label(), color()));
    };

    let entries = match obj.get("entries").and_then(Value::as_array) {
        Some(items) => items.iter().filter_map(reconcile_entry).collect(),
        None => {
            tracing::debug!(index, "Day has no entry list, using template entries");
            template.map(|t| t.entries.clone()).unwrap_or_default()
        }
    };

    DayMenu {
        day: str_field(obj, "day").map(String::from).unwrap_or_else(label),
        color: str_field(obj, "color").map(String::from).unwrap_or_else(color),
        locked: obj.get("locked").and_then(Value::as_bool).unwrap_or(false),
        note: str_field(obj, "note").map(String::from),
        entries,
    }
}

/// Entry ids are repaired afterwards by [`assign_entry_ids`].
fn reconcile_entry(value: &Value) -> Option<MenuEntry> {
    match value {
        Value::Object(obj) => Some(MenuEntry::with_id(
            obj.get("id").and_then(Value::as_str).unwrap_or_default(),
            obj.get("dishName")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default(),
            name_list(obj.get("tags")),
        )),
        Value::String(dish) => Some(MenuEntry::with_id("", dish.trim(), Vec::<String>::new())),
        _ => None,
    }
}

/// Gives every entry with an empty or already-seen id a deterministic id
/// `entry-d<day>-<index>`, suffixed when that id is taken.
fn assign_entry_ids(days: &mut [DayMenu]) {
    let reserved: HashSet<String> = days
        .iter()
        .flat_map(|d| &d.entries)
        .filter(|e| !e.id.is_empty())
        .map(|e| e.id.clone())
        .collect();
    let mut used = HashSet::new();

    for (day_index, day) in days.iter_mut().enumerate() {
        for (entry_index, entry) in day.entries.iter_mut().enumerate() {
            if !entry.id.is_empty() && used.insert(entry.id.clone()) {
                continue;
            }

            let base = format!("entry-d{}-{}", day_index, entry_index);
            let mut id = base.clone();
            let mut suffix = 2;
            while reserved.contains(&id) || used.contains(&id) {
                id = format!("{}-{}", base, suffix);
                suffix += 1;
            }

            tracing::debug!(old = %entry.id, new = %id, "Assigned entry id");
            used.insert(id.clone());
            entry.id = id;
        }
    }
}

// =============================================================================
// Background
// =============================================================================

fn reconcile_background(fields: &Map<String, Value>) -> BackgroundSettings {
    if let Some(obj) = fields.get("backgroundSettings").and_then(Value::as_object) {
        let kind = str_field(obj, "type")
            .and_then(|k| k.parse::<BackgroundKind>().ok())
            .unwrap_or_default();
        let color = str_field(obj, "color").unwrap_or(DEFAULT_BACKGROUND_COLOR);
        return BackgroundSettings::new(kind, color);
    }

    // Flat color string from before background types existed.
    if let Some(color) = str_field(fields, "backgroundColor") {
        tracing::info!("Upgrading legacy backgroundColor");
        return BackgroundSettings::new(BackgroundKind::Dots, color);
    }

    BackgroundSettings::default()
}
