//! Create, rename and delete for the three catalogs, with cascades.
//!
//! Every function here is a pure transition: it returns the next state, or
//! `None` when the input is rejected (empty or duplicate name, unknown key,
//! rename collision) or would change nothing. A rejected call never applies
//! part of its update.

use chrono::{DateTime, Utc};

use crate::defaults::FALLBACK_TAG_COLOR;
use crate::models::{
    normalize_names, remove_from, rename_in, Dish, DishUpdate, Ingredient, IngredientKind,
    IngredientUpdate, MenuEntry, NewDish, Tag, TagUpdate,
};
use crate::state::{rewrite, MenuState};

// =============================================================================
// Dishes
// =============================================================================

pub(crate) fn add_dish(
    state: &MenuState,
    name: &str,
    fields: NewDish,
    now: DateTime<Utc>,
) -> Option<MenuState> {
    let name = name.trim();
    if name.is_empty() || state.dish(name).is_some() {
        return None;
    }

    let dish = Dish::new(name)
        .with_tags(fields.tags)
        .with_main_ingredients(fields.main_ingredients)
        .with_sub_ingredients(fields.sub_ingredients)
        .with_steps(fields.steps)
        .with_last_used_at(now);

    let mut dishes = state.dishes().to_vec();
    dishes.push(dish);
    Some(state.with_dishes(dishes))
}

/// Deletes a dish and clears `dish_name` on every entry that pointed at it.
/// The entries themselves and their tag templates stay.
pub(crate) fn remove_dish(state: &MenuState, name: &str) -> Option<MenuState> {
    state.dish(name)?;

    let dishes = state
        .dishes()
        .iter()
        .filter(|d| d.name != name)
        .cloned()
        .collect();
    let next = state.with_dishes(dishes);

    let cleared = next.map_entries(|entry| {
        (entry.dish_name == name).then(|| MenuEntry {
            dish_name: String::new(),
            ..entry.clone()
        })
    });
    Some(cleared.unwrap_or(next))
}

pub(crate) fn update_dish(state: &MenuState, name: &str, update: &DishUpdate) -> Option<MenuState> {
    let index = state.dishes().iter().position(|d| d.name == name)?;
    let current = &state.dishes()[index];

    let new_name = update.new_name().unwrap_or(&current.name).to_string();
    let renamed = new_name != current.name;
    if renamed && state.dish(&new_name).is_some() {
        return None;
    }

    let merged = Dish {
        name: new_name.clone(),
        tags: update
            .tags
            .as_ref()
            .map(normalize_names)
            .unwrap_or_else(|| current.tags.clone()),
        main_ingredients: update
            .main_ingredients
            .as_ref()
            .map(normalize_names)
            .unwrap_or_else(|| current.main_ingredients.clone()),
        sub_ingredients: update
            .sub_ingredients
            .as_ref()
            .map(normalize_names)
            .unwrap_or_else(|| current.sub_ingredients.clone()),
        steps: update.steps.clone().unwrap_or_else(|| current.steps.clone()),
        last_used_at: current.last_used_at,
    };
    if merged == *current {
        return None;
    }

    let mut dishes = state.dishes().to_vec();
    dishes[index] = merged;
    let next = state.with_dishes(dishes);

    if !renamed {
        return Some(next);
    }
    let relinked = next.map_entries(|entry| {
        (entry.dish_name == name).then(|| MenuEntry {
            dish_name: new_name.clone(),
            ..entry.clone()
        })
    });
    Some(relinked.unwrap_or(next))
}

pub(crate) fn mark_dish_used(state: &MenuState, name: &str, at: DateTime<Utc>) -> Option<MenuState> {
    let dishes = rewrite(state.dishes().as_slice(), |dish| {
        (dish.name == name && dish.last_used_at != Some(at)).then(|| Dish {
            last_used_at: Some(at),
            ..dish.clone()
        })
    })?;
    Some(state.with_dishes(dishes))
}

// =============================================================================
// Tags
// =============================================================================

pub(crate) fn add_tag(state: &MenuState, name: &str, color: &str) -> Option<MenuState> {
    let name = name.trim();
    if name.is_empty() || state.tag(name).is_some() {
        return None;
    }

    let color = match color.trim() {
        "" => FALLBACK_TAG_COLOR,
        c => c,
    };
    let mut tags = state.tags().to_vec();
    tags.push(Tag::new(name, color));
    Some(state.with_tags(tags))
}

/// Deletes a tag and purges it from every dish and every entry template.
/// Dishes are never deleted.
pub(crate) fn remove_tag(state: &MenuState, name: &str) -> Option<MenuState> {
    state.tag(name)?;

    let tags = state.tags().iter().filter(|t| t.name != name).cloned().collect();
    let mut next = state.with_tags(tags);

    let dishes = rewrite(next.dishes().as_slice(), |dish| {
        remove_from(&dish.tags, name).map(|tags| Dish {
            tags,
            ..dish.clone()
        })
    });
    if let Some(dishes) = dishes {
        next = next.with_dishes(dishes);
    }

    let purged = next.map_entries(|entry| {
        remove_from(&entry.tags, name).map(|tags| MenuEntry {
            tags,
            ..entry.clone()
        })
    });
    Some(purged.unwrap_or(next))
}

pub(crate) fn update_tag(state: &MenuState, name: &str, update: &TagUpdate) -> Option<MenuState> {
    let index = state.tags().iter().position(|t| t.name == name)?;
    let current = &state.tags()[index];

    let new_name = trimmed(update.name.as_deref()).unwrap_or(&current.name).to_string();
    let renamed = new_name != current.name;
    if renamed && state.tag(&new_name).is_some() {
        return None;
    }

    let merged = Tag {
        name: new_name.clone(),
        color: trimmed(update.color.as_deref())
            .unwrap_or(&current.color)
            .to_string(),
    };
    if merged == *current {
        return None;
    }

    let mut tags = state.tags().to_vec();
    tags[index] = merged;
    let mut next = state.with_tags(tags);

    if !renamed {
        return Some(next);
    }

    let dishes = rewrite(next.dishes().as_slice(), |dish| {
        rename_in(&dish.tags, name, &new_name).map(|tags| Dish {
            tags,
            ..dish.clone()
        })
    });
    if let Some(dishes) = dishes {
        next = next.with_dishes(dishes);
    }

    let relinked = next.map_entries(|entry| {
        rename_in(&entry.tags, name, &new_name).map(|tags| MenuEntry {
            tags,
            ..entry.clone()
        })
    });
    Some(relinked.unwrap_or(next))
}

// =============================================================================
// Ingredients
// =============================================================================

pub(crate) fn add_ingredient(
    state: &MenuState,
    name: &str,
    bg_color: &str,
    text_color: &str,
    kind: IngredientKind,
) -> Option<MenuState> {
    let name = name.trim();
    if name.is_empty() || state.ingredient(name).is_some() {
        return None;
    }

    let ingredient = Ingredient::new(name).with_kind(kind);
    let ingredient = Ingredient {
        bg_color: non_empty_or(bg_color, &ingredient.bg_color),
        text_color: non_empty_or(text_color, &ingredient.text_color),
        ..ingredient
    };

    let mut ingredients = state.ingredients().to_vec();
    ingredients.push(ingredient);
    Some(state.with_ingredients(ingredients))
}

/// Deletes an ingredient and removes it from every dish's main and sub lists.
pub(crate) fn remove_ingredient(state: &MenuState, name: &str) -> Option<MenuState> {
    state.ingredient(name)?;

    let ingredients = state
        .ingredients()
        .iter()
        .filter(|i| i.name != name)
        .cloned()
        .collect();
    let next = state.with_ingredients(ingredients);

    let dishes = rewrite(next.dishes().as_slice(), |dish| {
        let main = remove_from(&dish.main_ingredients, name);
        let sub = remove_from(&dish.sub_ingredients, name);
        (main.is_some() || sub.is_some()).then(|| Dish {
            main_ingredients: main.unwrap_or_else(|| dish.main_ingredients.clone()),
            sub_ingredients: sub.unwrap_or_else(|| dish.sub_ingredients.clone()),
            ..dish.clone()
        })
    });
    Some(match dishes {
        Some(dishes) => next.with_dishes(dishes),
        None => next,
    })
}

pub(crate) fn update_ingredient(
    state: &MenuState,
    name: &str,
    update: &IngredientUpdate,
) -> Option<MenuState> {
    let index = state.ingredients().iter().position(|i| i.name == name)?;
    let current = &state.ingredients()[index];

    let new_name = trimmed(update.name.as_deref()).unwrap_or(&current.name).to_string();
    let renamed = new_name != current.name;
    if renamed && state.ingredient(&new_name).is_some() {
        return None;
    }

    let merged = Ingredient {
        name: new_name.clone(),
        bg_color: trimmed(update.bg_color.as_deref())
            .unwrap_or(&current.bg_color)
            .to_string(),
        text_color: trimmed(update.text_color.as_deref())
            .unwrap_or(&current.text_color)
            .to_string(),
        kind: update.kind.unwrap_or(current.kind),
    };
    if merged == *current {
        return None;
    }

    let mut ingredients = state.ingredients().to_vec();
    ingredients[index] = merged;
    let next = state.with_ingredients(ingredients);

    if !renamed {
        return Some(next);
    }

    let dishes = rewrite(next.dishes().as_slice(), |dish| {
        let main = rename_in(&dish.main_ingredients, name, &new_name);
        let sub = rename_in(&dish.sub_ingredients, name, &new_name);
        (main.is_some() || sub.is_some()).then(|| Dish {
            main_ingredients: main.unwrap_or_else(|| dish.main_ingredients.clone()),
            sub_ingredients: sub.unwrap_or_else(|| dish.sub_ingredients.clone()),
            ..dish.clone()
        })
    });
    Some(match dishes {
        Some(dishes) => next.with_dishes(dishes),
        None => next,
    })
}

// =============================================================================
// Queries
// =============================================================================

/// Number of dishes carrying `tag`.
pub fn tag_usage_count(state: &MenuState, tag: &str) -> usize {
    state.dishes().iter().filter(|d| d.has_tag(tag)).count()
}

/// Dishes ordered by `last_used_at`, most recent first. Dishes never used go
/// last; ties keep catalog order.
pub fn dishes_by_recency(state: &MenuState) -> Vec<&Dish> {
    let mut dishes: Vec<&Dish> = state.dishes().iter().collect();
    dishes.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at));
    dishes
}

fn trimmed(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayMenu;
    use crate::state::PersistedState;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn fixture() -> MenuState {
        MenuState::from_persisted(PersistedState {
            dishes: vec![
                Dish::new("糖醋排骨")
                    .with_tags(["大荤"])
                    .with_main_ingredients(["排骨"]),
                Dish::new("清炒小青菜")
                    .with_tags(["蔬菜", "素菜"])
                    .with_main_ingredients(["青菜"]),
                Dish::new("水果沙拉").with_tags(["点心", "素菜"]),
                Dish::new("罗宋汤")
                    .with_tags(["汤"])
                    .with_main_ingredients(["牛肉"])
                    .with_sub_ingredients(["土豆"]),
            ],
            weekly_menu: vec![
                DayMenu::new("周一", "#FF9A9E").with_entries(vec![
                    MenuEntry::with_id("a", "糖醋排骨", ["大荤"]),
                    MenuEntry::with_id("b", "清炒小青菜", ["蔬菜", "素菜"]),
                ]),
                DayMenu::new("周二", "#A18CD1").with_entries(vec![
                    MenuEntry::with_id("c", "罗宋汤", ["汤"]),
                    MenuEntry::with_id("d", "糖醋排骨", ["大荤"]),
                ]),
            ],
            ingredients: vec![
                Ingredient::new("排骨"),
                Ingredient::new("青菜"),
                Ingredient::new("牛肉"),
                Ingredient::new("土豆").with_kind(IngredientKind::Sub),
            ],
            tags: ["大荤", "蔬菜", "素菜", "点心", "汤"]
                .into_iter()
                .map(|t| Tag::new(t, "#6b7280"))
                .collect(),
            background_settings: Default::default(),
        })
    }

    fn assert_unique_names(state: &MenuState) {
        let dishes: HashSet<_> = state.dishes().iter().map(|d| &d.name).collect();
        assert_eq!(dishes.len(), state.dishes().len());
        let tags: HashSet<_> = state.tags().iter().map(|t| &t.name).collect();
        assert_eq!(tags.len(), state.tags().len());
        let ingredients: HashSet<_> = state.ingredients().iter().map(|i| &i.name).collect();
        assert_eq!(ingredients.len(), state.ingredients().len());
    }

    #[test]
    fn test_add_dish_trims_and_stamps() {
        let state = fixture();
        let next = add_dish(&state, "  白米饭 ", NewDish::with_tags(["主食"]), at(1000)).unwrap();

        let dish = next.dish("白米饭").unwrap();
        assert_eq!(dish.tags, vec!["主食"]);
        assert_eq!(dish.last_used_at, Some(at(1000)));
        assert!(dish.main_ingredients.is_empty());
        assert!(Arc::ptr_eq(state.weekly_menu(), next.weekly_menu()));
    }

    #[test]
    fn test_add_dish_rejects_empty_and_duplicate() {
        let state = fixture();
        assert!(add_dish(&state, "   ", NewDish::default(), at(0)).is_none());
        assert!(add_dish(&state, "糖醋排骨", NewDish::default(), at(0)).is_none());
        assert!(add_dish(&state, " 糖醋排骨 ", NewDish::default(), at(0)).is_none());
    }

    #[test]
    fn test_remove_dish_clears_entries() {
        let state = fixture();
        let next = remove_dish(&state, "糖醋排骨").unwrap();

        assert!(next.dish("糖醋排骨").is_none());
        let a = next.day(0).unwrap().entry("a").unwrap();
        assert_eq!(a.dish_name, "");
        assert_eq!(a.tags, vec!["大荤"]);
        let d = next.day(1).unwrap().entry("d").unwrap();
        assert_eq!(d.dish_name, "");
        assert_eq!(next.entries().count(), state.entries().count());
    }

    #[test]
    fn test_remove_dish_unknown_is_noop() {
        assert!(remove_dish(&fixture(), "不存在").is_none());
    }

    #[test]
    fn test_remove_dish_shares_unreferencing_days() {
        let state = fixture();
        let next = remove_dish(&state, "清炒小青菜").unwrap();
        assert!(Arc::ptr_eq(&state.weekly_menu()[1], &next.weekly_menu()[1]));
        assert!(!Arc::ptr_eq(&state.weekly_menu()[0], &next.weekly_menu()[0]));
    }

    #[test]
    fn test_update_dish_rename_cascades() {
        let state = fixture();
        let next = update_dish(&state, "糖醋排骨", &DishUpdate::rename(" 红烧排骨 ")).unwrap();

        assert!(next.dish("糖醋排骨").is_none());
        assert!(next.dish("红烧排骨").is_some());
        assert_eq!(next.day(0).unwrap().entry("a").unwrap().dish_name, "红烧排骨");
        assert_eq!(next.day(1).unwrap().entry("d").unwrap().dish_name, "红烧排骨");
        assert!(next.entries().all(|e| e.dish_name != "糖醋排骨"));
    }

    #[test]
    fn test_update_dish_collision_rejected() {
        let state = fixture();
        let update = DishUpdate::rename("罗宋汤").with_steps("changed");
        assert!(update_dish(&state, "糖醋排骨", &update).is_none());
        assert!(state.dish("糖醋排骨").is_some());
        assert!(state.dish("罗宋汤").is_some());
    }

    #[test]
    fn test_update_dish_fields_without_rename() {
        let state = fixture();
        let update = DishUpdate::default()
            .with_tags(["大荤", "大荤", "下饭"])
            .with_steps("焯水，炸，糖醋汁");
        let next = update_dish(&state, "糖醋排骨", &update).unwrap();

        let dish = next.dish("糖醋排骨").unwrap();
        assert_eq!(dish.tags, vec!["大荤", "下饭"]);
        assert_eq!(dish.steps, "焯水，炸，糖醋汁");
        assert!(Arc::ptr_eq(state.weekly_menu(), next.weekly_menu()));
    }

    #[test]
    fn test_update_dish_blank_name_keeps_old() {
        let state = fixture();
        let update = DishUpdate::rename("  ").with_steps("x");
        let next = update_dish(&state, "糖醋排骨", &update).unwrap();
        assert_eq!(next.dish("糖醋排骨").unwrap().steps, "x");
    }

    #[test]
    fn test_update_dish_same_values_is_noop() {
        let state = fixture();
        assert!(update_dish(&state, "糖醋排骨", &DishUpdate::rename("糖醋排骨")).is_none());
        assert!(update_dish(&state, "不存在", &DishUpdate::rename("x")).is_none());
    }

    #[test]
    fn test_mark_dish_used() {
        let state = fixture();
        let next = mark_dish_used(&state, "罗宋汤", at(5000)).unwrap();
        assert_eq!(next.dish("罗宋汤").unwrap().last_used_at, Some(at(5000)));
        assert!(mark_dish_used(&state, "不存在", at(5000)).is_none());
    }

    #[test]
    fn test_add_tag() {
        let state = fixture();
        let next = add_tag(&state, " 海鲜 ", "#3b82f6").unwrap();
        assert_eq!(next.tag("海鲜").unwrap().color, "#3b82f6");

        let blank_color = add_tag(&state, "甜品", " ").unwrap();
        assert_eq!(blank_color.tag("甜品").unwrap().color, FALLBACK_TAG_COLOR);

        assert!(add_tag(&state, "汤", "#000000").is_none());
        assert!(add_tag(&state, "", "#000000").is_none());
    }

    #[test]
    fn test_remove_tag_purges_dishes_and_entries() {
        let state = fixture();
        let next = remove_tag(&state, "素菜").unwrap();

        assert!(next.tag("素菜").is_none());
        assert_eq!(next.dishes().len(), state.dishes().len());
        assert!(next.dishes().iter().all(|d| !d.has_tag("素菜")));
        assert!(next.entries().all(|e| !e.tags.iter().any(|t| t == "素菜")));
        assert_eq!(next.day(0).unwrap().entry("b").unwrap().tags, vec!["蔬菜"]);
        assert!(Arc::ptr_eq(&state.weekly_menu()[1], &next.weekly_menu()[1]));
    }

    #[test]
    fn test_rename_tag_cascades() {
        let state = fixture();
        let next = update_tag(&state, "素菜", &TagUpdate::rename("蔬食")).unwrap();

        assert!(next.tag("素菜").is_none());
        assert!(next.tag("蔬食").is_some());
        assert!(next.dish("清炒小青菜").unwrap().has_tag("蔬食"));
        assert!(next.dish("水果沙拉").unwrap().has_tag("蔬食"));
        assert!(next.dishes().iter().all(|d| !d.has_tag("素菜")));
        assert_eq!(
            next.day(0).unwrap().entry("b").unwrap().tags,
            vec!["蔬菜", "蔬食"]
        );
        assert!(next.entries().all(|e| !e.tags.iter().any(|t| t == "素菜")));
    }

    #[test]
    fn test_update_tag_collision_rejected() {
        let state = fixture();
        let update = TagUpdate::rename("汤").with_color("#000000");
        assert!(update_tag(&state, "素菜", &update).is_none());
    }

    #[test]
    fn test_update_tag_color_only() {
        let state = fixture();
        let next = update_tag(&state, "汤", &TagUpdate::default().with_color("#06b6d4")).unwrap();
        assert_eq!(next.tag("汤").unwrap().color, "#06b6d4");
        assert!(Arc::ptr_eq(state.dishes(), next.dishes()));
    }

    #[test]
    fn test_add_ingredient() {
        let state = fixture();
        let next = add_ingredient(&state, "虾", "#F5E0E9", "#4C2337", IngredientKind::Main).unwrap();
        let shrimp = next.ingredient("虾").unwrap();
        assert_eq!(shrimp.bg_color, "#F5E0E9");
        assert_eq!(shrimp.kind, IngredientKind::Main);

        let defaulted = add_ingredient(&state, "葱", "", "", IngredientKind::Sub).unwrap();
        assert_eq!(defaulted.ingredient("葱").unwrap(), &Ingredient::new("葱").with_kind(IngredientKind::Sub));

        assert!(add_ingredient(&state, "排骨", "", "", IngredientKind::Main).is_none());
    }

    #[test]
    fn test_remove_ingredient_cascades() {
        let state = fixture();
        let next = remove_ingredient(&state, "土豆").unwrap();
        assert!(next.ingredient("土豆").is_none());
        assert!(next.dish("罗宋汤").unwrap().sub_ingredients.is_empty());
        assert_eq!(next.dish("罗宋汤").unwrap().main_ingredients, vec!["牛肉"]);
        assert!(remove_ingredient(&state, "不存在").is_none());
    }

    #[test]
    fn test_rename_ingredient_cascades() {
        let state = fixture();
        let next = update_ingredient(&state, "牛肉", &IngredientUpdate::rename("牛腩")).unwrap();
        assert_eq!(next.dish("罗宋汤").unwrap().main_ingredients, vec!["牛腩"]);
        assert!(next.dishes().iter().all(|d| !d.uses_ingredient("牛肉")));

        assert!(update_ingredient(&state, "牛肉", &IngredientUpdate::rename("排骨")).is_none());
    }

    #[test]
    fn test_sequence_keeps_names_unique() {
        let mut state = fixture();
        let steps: Vec<Box<dyn Fn(&MenuState) -> Option<MenuState>>> = vec![
            Box::new(|s: &MenuState| add_dish(s, "罗宋汤", NewDish::default(), at(0))),
            Box::new(|s: &MenuState| update_dish(s, "水果沙拉", &DishUpdate::rename("罗宋汤"))),
            Box::new(|s: &MenuState| add_tag(s, "汤", "")),
            Box::new(|s: &MenuState| update_tag(s, "点心", &TagUpdate::rename("大荤"))),
            Box::new(|s: &MenuState| add_ingredient(s, "青菜", "", "", IngredientKind::Main)),
            Box::new(|s: &MenuState| update_ingredient(s, "土豆", &IngredientUpdate::rename("牛肉"))),
            Box::new(|s: &MenuState| update_dish(s, "水果沙拉", &DishUpdate::rename("果盘"))),
            Box::new(|s: &MenuState| add_dish(s, "果盘", NewDish::default(), at(0))),
        ];
        for step in steps {
            if let Some(next) = step(&state) {
                state = next;
            }
            assert_unique_names(&state);
        }
        assert!(state.dish("果盘").is_some());
    }

    #[test]
    fn test_tag_usage_count() {
        let state = fixture();
        assert_eq!(tag_usage_count(&state, "素菜"), 2);
        assert_eq!(tag_usage_count(&state, "海鲜"), 0);
    }

    #[test]
    fn test_dishes_by_recency() {
        let state = fixture();
        let state = mark_dish_used(&state, "罗宋汤", at(2000)).unwrap();
        let state = mark_dish_used(&state, "水果沙拉", at(1000)).unwrap();

        let names: Vec<_> = dishes_by_recency(&state)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["罗宋汤", "水果沙拉", "糖醋排骨", "清炒小青菜"]);
    }
}
