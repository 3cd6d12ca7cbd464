//! The store object: owns one [`MenuState`] and exposes every operation.
//!
//! Mutating methods return `true` when the state changed and `false` when
//! the call was rejected or had nothing to do. A rejected call leaves the
//! state exactly as it was.

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde_json::Value;

use crate::catalog;
use crate::error::Result;
use crate::generator;
use crate::migrate;
use crate::models::{
    BackgroundSettings, DayMenu, Dish, DishUpdate, Ingredient, IngredientKind, IngredientUpdate,
    MenuEntry, NewDish, Tag, TagUpdate,
};
use crate::reorder;
use crate::state::{MenuState, PersistedState};

#[derive(Debug, Clone, Default)]
pub struct MenuStore {
    state: MenuState,
}

/// Timestamps are kept at the millisecond precision they are saved with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl MenuStore {
    /// A store holding the built-in catalogs and the initial weekly menu.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            state: MenuState::from_persisted(persisted),
        }
    }

    /// Loads a saved blob of any shape through the migration engine.
    pub fn from_value(value: &Value) -> Self {
        Self::from_persisted(migrate::migrate(value))
    }

    /// Like [`MenuStore::from_value`]; unparseable text loads as defaults.
    pub fn from_json(text: &str) -> Self {
        Self::from_persisted(migrate::migrate_str(text))
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// A cheap handle on the current state for later `Arc::ptr_eq` checks.
    pub fn snapshot(&self) -> MenuState {
        self.state.clone()
    }

    pub fn persisted(&self) -> PersistedState {
        self.state.to_persisted()
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.persisted())?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.persisted())?)
    }

    /// Back to the built-in defaults.
    pub fn reset(&mut self) -> bool {
        let fresh = MenuState::default();
        let next = (fresh != self.state).then_some(fresh);
        self.commit("reset", "", next)
    }

    fn commit(&mut self, op: &str, key: &str, next: Option<MenuState>) -> bool {
        match next {
            Some(state) => {
                self.state = state;
                true
            }
            None => {
                tracing::debug!(op, key, "No changes");
                false
            }
        }
    }

    // =========================================================================
    // Dishes
    // =========================================================================

    pub fn add_dish(&mut self, name: &str, fields: NewDish) -> bool {
        let next = catalog::add_dish(&self.state, name, fields, now());
        self.commit("add_dish", name, next)
    }

    pub fn update_dish(&mut self, name: &str, update: &DishUpdate) -> bool {
        let next = catalog::update_dish(&self.state, name, update);
        self.commit("update_dish", name, next)
    }

    pub fn remove_dish(&mut self, name: &str) -> bool {
        let next = catalog::remove_dish(&self.state, name);
        self.commit("remove_dish", name, next)
    }

    /// Stamps the dish's `last_used_at` with the current time.
    pub fn mark_dish_used(&mut self, name: &str) -> bool {
        let next = catalog::mark_dish_used(&self.state, name, now());
        self.commit("mark_dish_used", name, next)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// A blank color falls back to the neutral tag color.
    pub fn add_tag(&mut self, name: &str, color: &str) -> bool {
        let next = catalog::add_tag(&self.state, name, color);
        self.commit("add_tag", name, next)
    }

    pub fn update_tag(&mut self, name: &str, update: &TagUpdate) -> bool {
        let next = catalog::update_tag(&self.state, name, update);
        self.commit("update_tag", name, next)
    }

    pub fn remove_tag(&mut self, name: &str) -> bool {
        let next = catalog::remove_tag(&self.state, name);
        self.commit("remove_tag", name, next)
    }

    // =========================================================================
    // Ingredients
    // =========================================================================

    /// Blank colors fall back to the default preset.
    pub fn add_ingredient(
        &mut self,
        name: &str,
        bg_color: &str,
        text_color: &str,
        kind: IngredientKind,
    ) -> bool {
        let next = catalog::add_ingredient(&self.state, name, bg_color, text_color, kind);
        self.commit("add_ingredient", name, next)
    }

    pub fn update_ingredient(&mut self, name: &str, update: &IngredientUpdate) -> bool {
        let next = catalog::update_ingredient(&self.state, name, update);
        self.commit("update_ingredient", name, next)
    }

    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        let next = catalog::remove_ingredient(&self.state, name);
        self.commit("remove_ingredient", name, next)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    pub fn generate_new_menu(&mut self) -> bool {
        self.generate_new_menu_with(&mut rand::rng())
    }

    pub fn generate_new_menu_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let next = generator::generate_menu(&self.state, rng);
        self.commit("generate_new_menu", "", next)
    }

    pub fn randomize_entry(&mut self, day: usize, entry_id: &str) -> bool {
        self.randomize_entry_with(day, entry_id, &mut rand::rng())
    }

    pub fn randomize_entry_with<R: Rng + ?Sized>(
        &mut self,
        day: usize,
        entry_id: &str,
        rng: &mut R,
    ) -> bool {
        let next = generator::randomize_entry(&self.state, day, entry_id, rng);
        self.commit("randomize_entry", entry_id, next)
    }

    // =========================================================================
    // Entries
    // =========================================================================

    pub fn add_entry<I, S>(&mut self, day: usize, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next = reorder::add_entry(&self.state, day, tags);
        self.commit("add_entry", "", next)
    }

    pub fn remove_entry(&mut self, day: usize, entry_id: &str) -> bool {
        let next = reorder::remove_entry(&self.state, day, entry_id);
        self.commit("remove_entry", entry_id, next)
    }

    pub fn set_entry_dish(&mut self, day: usize, entry_id: &str, dish_name: &str) -> bool {
        let next = reorder::set_entry_dish(&self.state, day, entry_id, dish_name);
        self.commit("set_entry_dish", entry_id, next)
    }

    pub fn set_entry_tags<I, S>(&mut self, day: usize, entry_id: &str, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next = reorder::set_entry_tags(&self.state, day, entry_id, tags);
        self.commit("set_entry_tags", entry_id, next)
    }

    pub fn duplicate_entry(&mut self, day: usize, entry_id: &str) -> bool {
        let next = reorder::duplicate_entry(&self.state, day, entry_id);
        self.commit("duplicate_entry", entry_id, next)
    }

    /// `to_index` is the entry's position after the move.
    pub fn move_entry(&mut self, from_day: usize, to_day: usize, entry_id: &str, to_index: usize) -> bool {
        let next = reorder::move_entry(&self.state, from_day, to_day, entry_id, to_index);
        self.commit("move_entry", entry_id, next)
    }

    // =========================================================================
    // Days
    // =========================================================================

    pub fn swap_days(&mut self, a: usize, b: usize) -> bool {
        let next = reorder::swap_days(&self.state, a, b);
        self.commit("swap_days", "", next)
    }

    pub fn set_day_label(&mut self, day: usize, label: &str) -> bool {
        let next = reorder::set_day_label(&self.state, day, label);
        self.commit("set_day_label", label, next)
    }

    pub fn set_day_color(&mut self, day: usize, color: &str) -> bool {
        let next = reorder::set_day_color(&self.state, day, color);
        self.commit("set_day_color", color, next)
    }

    pub fn set_day_note(&mut self, day: usize, note: &str) -> bool {
        let next = reorder::set_day_note(&self.state, day, note);
        self.commit("set_day_note", "", next)
    }

    pub fn set_day_locked(&mut self, day: usize, locked: bool) -> bool {
        let next = reorder::set_day_locked(&self.state, day, locked);
        self.commit("set_day_locked", "", next)
    }

    pub fn toggle_day_lock(&mut self, day: usize) -> bool {
        let next = reorder::toggle_day_lock(&self.state, day);
        self.commit("toggle_day_lock", "", next)
    }

    pub fn add_day(&mut self) -> bool {
        let next = reorder::add_day(&self.state);
        self.commit("add_day", "", next)
    }

    pub fn remove_day(&mut self, day: usize) -> bool {
        let next = reorder::remove_day(&self.state, day);
        self.commit("remove_day", "", next)
    }

    pub fn set_weekly_menu(&mut self, days: Vec<DayMenu>) -> bool {
        let next = reorder::set_weekly_menu(&self.state, days);
        self.commit("set_weekly_menu", "", next)
    }

    pub fn set_background(&mut self, settings: BackgroundSettings) -> bool {
        let next = (**self.state.background() != settings)
            .then(|| self.state.with_background(settings));
        self.commit("set_background", "", next)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn dishes(&self) -> &[Dish] {
        self.state.dishes()
    }

    pub fn tags(&self) -> &[Tag] {
        self.state.tags()
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        self.state.ingredients()
    }

    pub fn weekly_menu(&self) -> Vec<&DayMenu> {
        self.state.weekly_menu().iter().map(|d| d.as_ref()).collect()
    }

    pub fn background(&self) -> &BackgroundSettings {
        self.state.background()
    }

    pub fn day(&self, index: usize) -> Option<&DayMenu> {
        self.state.day(index)
    }

    pub fn dish(&self, name: &str) -> Option<&Dish> {
        self.state.dish(name)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.state.tag(name)
    }

    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.state.ingredient(name)
    }

    pub fn tag_usage_count(&self, tag: &str) -> usize {
        catalog::tag_usage_count(&self.state, tag)
    }

    /// Dishes carrying every tag in `tags`.
    pub fn dishes_matching(&self, tags: &[String]) -> Vec<&Dish> {
        generator::candidates(self.state.dishes(), tags)
    }

    pub fn dishes_by_recency(&self) -> Vec<&Dish> {
        catalog::dishes_by_recency(&self.state)
    }

    /// The dish an entry points at. Dangling entries resolve to `None`.
    pub fn resolve_entry_dish(&self, entry: &MenuEntry) -> Option<&Dish> {
        self.state.dish(&entry.dish_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackgroundKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn assert_invariants(store: &MenuStore) {
        let dishes: HashSet<_> = store.dishes().iter().map(|d| &d.name).collect();
        assert_eq!(dishes.len(), store.dishes().len());
        let tags: HashSet<_> = store.tags().iter().map(|t| &t.name).collect();
        assert_eq!(tags.len(), store.tags().len());
        let ingredients: HashSet<_> = store.ingredients().iter().map(|i| &i.name).collect();
        assert_eq!(ingredients.len(), store.ingredients().len());

        let ids: Vec<_> = store.state().entries().map(|e| &e.id).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_new_store_has_defaults() {
        let store = MenuStore::new();
        assert_eq!(store.weekly_menu().len(), 5);
        assert_eq!(store.background().kind, BackgroundKind::Dots);
        assert_invariants(&store);
    }

    #[test]
    fn test_rejected_call_keeps_state_pointer() {
        let mut store = MenuStore::new();
        let before = store.snapshot();

        assert!(!store.add_dish("糖醋排骨", NewDish::default()));
        assert!(!store.add_dish("   ", NewDish::default()));
        assert!(!store.remove_tag("不存在"));
        assert!(!store.move_entry(0, 1, "missing", 0));
        assert!(!store.update_dish("糖醋排骨", &DishUpdate::rename("罗宋汤")));

        assert!(Arc::ptr_eq(before.dishes(), store.state().dishes()));
        assert!(Arc::ptr_eq(before.weekly_menu(), store.state().weekly_menu()));
        assert_eq!(before, *store.state());
    }

    #[test]
    fn test_add_dish_stamps_last_used() {
        let mut store = MenuStore::new();
        assert!(store.add_dish(" 酸辣土豆丝 ", NewDish::with_tags(["蔬菜"])));

        let dish = store.dish("酸辣土豆丝").unwrap();
        assert!(dish.last_used_at.is_some());
        assert_eq!(store.dishes_by_recency()[0].name, "酸辣土豆丝");
    }

    #[test]
    fn test_mark_dish_used_moves_to_front() {
        let mut store = MenuStore::new();
        assert!(store.mark_dish_used("罗宋汤"));
        assert_eq!(store.dishes_by_recency()[0].name, "罗宋汤");
        assert!(!store.mark_dish_used("不存在"));
    }

    #[test]
    fn test_cascade_rename_tag() {
        let mut store = MenuStore::new();
        let before = store.tag_usage_count("素菜");
        assert!(before > 0);

        assert!(store.update_tag("素菜", &TagUpdate::rename("蔬食")));
        assert_eq!(store.tag_usage_count("素菜"), 0);
        assert_eq!(store.tag_usage_count("蔬食"), before);
        assert!(store.state().entries().all(|e| !e.tags.iter().any(|t| t == "素菜")));
        assert!(store.state().entries().any(|e| e.tags.iter().any(|t| t == "蔬食")));
        assert_invariants(&store);
    }

    #[test]
    fn test_remove_dish_leaves_dangling_entry() {
        let mut store = MenuStore::new();
        let entry = store.day(0).unwrap().entries[0].clone();
        assert_eq!(entry.dish_name, "糖醋排骨");
        assert!(store.resolve_entry_dish(&entry).is_some());

        assert!(store.remove_dish("糖醋排骨"));
        let after = store.day(0).unwrap().entry(&entry.id).unwrap();
        assert_eq!(after.dish_name, "");
        assert_eq!(after.tags, entry.tags);
        assert!(store.resolve_entry_dish(after).is_none());
    }

    #[test]
    fn test_generate_respects_locks_and_tags() {
        let mut store = MenuStore::new();
        assert!(store.set_day_locked(2, true));
        let locked = store.day(2).unwrap().clone();
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..20 {
            assert!(store.generate_new_menu_with(&mut rng));
            assert_eq!(store.day(2).unwrap(), &locked);
            for entry in store.state().entries() {
                let dish = store.resolve_entry_dish(entry).unwrap();
                assert!(dish.matches_template(&entry.tags), "{} vs {:?}", dish.name, entry.tags);
            }
        }
        assert_invariants(&store);
    }

    #[test]
    fn test_generate_unseeded() {
        let mut store = MenuStore::new();
        assert!(store.generate_new_menu());
        assert_invariants(&store);
    }

    #[test]
    fn test_dishes_matching() {
        let store = MenuStore::new();
        let template = vec!["小荤".to_string(), "海鲜".to_string()];
        let names: Vec<_> = store.dishes_matching(&template).iter().map(|d| d.name.clone()).collect();
        assert!(names.contains(&"虾仁炒蛋".to_string()));
        assert!(!names.contains(&"肉末茄子".to_string()));
    }

    #[test]
    fn test_entry_and_day_edits_keep_ids_unique() {
        let mut store = MenuStore::new();
        let id = store.day(0).unwrap().entries[0].id.clone();

        assert!(store.duplicate_entry(0, &id));
        assert!(store.add_entry(1, ["汤"]));
        assert!(store.move_entry(0, 1, &id, 0));
        assert!(store.add_day());
        assert!(store.swap_days(0, 5));
        assert!(store.randomize_entry(1, &id));
        assert_invariants(&store);
        assert_eq!(store.day(1).unwrap().entries[0].id, id);
    }

    #[test]
    fn test_set_background() {
        let mut store = MenuStore::new();
        assert!(!store.set_background(BackgroundSettings::default()));
        assert!(store.set_background(BackgroundSettings::new(BackgroundKind::Grid, "#000")));
        assert_eq!(store.background().kind, BackgroundKind::Grid);
    }

    #[test]
    fn test_json_round_trip_preserves_state() {
        let mut store = MenuStore::new();
        store.add_dish("新菜", NewDish::default());
        store.set_day_note(0, "早点下班");

        let text = store.to_json().unwrap();
        let restored = MenuStore::from_json(&text);
        assert_eq!(restored.persisted(), store.persisted());
    }

    #[test]
    fn test_from_value_migrates() {
        let store = MenuStore::from_value(&json!({"tags": ["大荤"], "weeklyMenu": "broken"}));
        assert_eq!(store.tags().len(), 1);
        assert_eq!(store.weekly_menu().len(), 5);
        assert_eq!(store.to_value().unwrap()["tags"][0]["color"], "#ef4444");
    }

    #[test]
    fn test_reset() {
        let mut store = MenuStore::new();
        assert!(!store.reset());
        store.remove_day(0);
        assert!(store.reset());
        assert_eq!(store.persisted(), PersistedState::default());
    }
}
