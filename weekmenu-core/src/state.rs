//! Store state in its two shapes.
//!
//! [`PersistedState`] is the plain record written to the key-value store.
//! [`MenuState`] is the live value owned by the store: every collection sits
//! behind an `Arc`, and each transition builds new `Arc`s only for the
//! containers it changes. Observers holding an older `MenuState` can detect
//! changes with `Arc::ptr_eq` instead of deep comparison.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::defaults;
use crate::models::{BackgroundSettings, DayMenu, Dish, Ingredient, MenuEntry, Tag};

/// The subset of state that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub dishes: Vec<Dish>,
    pub weekly_menu: Vec<DayMenu>,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
    pub background_settings: BackgroundSettings,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            dishes: defaults::default_dishes(),
            weekly_menu: defaults::initial_weekly_menu(),
            ingredients: defaults::default_ingredients(),
            tags: defaults::default_tags(),
            background_settings: BackgroundSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    dishes: Arc<Vec<Dish>>,
    tags: Arc<Vec<Tag>>,
    ingredients: Arc<Vec<Ingredient>>,
    weekly_menu: Arc<Vec<Arc<DayMenu>>>,
    background: Arc<BackgroundSettings>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::from_persisted(PersistedState::default())
    }
}

impl MenuState {
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            dishes: Arc::new(persisted.dishes),
            tags: Arc::new(persisted.tags),
            ingredients: Arc::new(persisted.ingredients),
            weekly_menu: Arc::new(persisted.weekly_menu.into_iter().map(Arc::new).collect()),
            background: Arc::new(persisted.background_settings),
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            dishes: self.dishes.to_vec(),
            weekly_menu: self.weekly_menu.iter().map(|d| (**d).clone()).collect(),
            ingredients: self.ingredients.to_vec(),
            tags: self.tags.to_vec(),
            background_settings: (*self.background).clone(),
        }
    }

    pub fn dishes(&self) -> &Arc<Vec<Dish>> {
        &self.dishes
    }

    pub fn tags(&self) -> &Arc<Vec<Tag>> {
        &self.tags
    }

    pub fn ingredients(&self) -> &Arc<Vec<Ingredient>> {
        &self.ingredients
    }

    pub fn weekly_menu(&self) -> &Arc<Vec<Arc<DayMenu>>> {
        &self.weekly_menu
    }

    pub fn background(&self) -> &Arc<BackgroundSettings> {
        &self.background
    }

    pub fn day(&self, index: usize) -> Option<&DayMenu> {
        self.weekly_menu.get(index).map(|d| d.as_ref())
    }

    pub fn dish(&self, name: &str) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.name == name)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.name == name)
    }

    /// All entries of the week in day order.
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.weekly_menu.iter().flat_map(|d| d.entries.iter())
    }

    pub fn contains_entry_id(&self, entry_id: &str) -> bool {
        self.entries().any(|e| e.id == entry_id)
    }

    pub(crate) fn with_dishes(&self, dishes: Vec<Dish>) -> Self {
        Self {
            dishes: Arc::new(dishes),
            ..self.clone()
        }
    }

    pub(crate) fn with_tags(&self, tags: Vec<Tag>) -> Self {
        Self {
            tags: Arc::new(tags),
            ..self.clone()
        }
    }

    pub(crate) fn with_ingredients(&self, ingredients: Vec<Ingredient>) -> Self {
        Self {
            ingredients: Arc::new(ingredients),
            ..self.clone()
        }
    }

    pub(crate) fn with_background(&self, background: BackgroundSettings) -> Self {
        Self {
            background: Arc::new(background),
            ..self.clone()
        }
    }

    pub(crate) fn with_days(&self, days: Vec<Arc<DayMenu>>) -> Self {
        Self {
            weekly_menu: Arc::new(days),
            ..self.clone()
        }
    }

    /// Replaces the days for which `f` returns `Some`, sharing the rest.
    ///
    /// Returns `None` when `f` changed nothing, so callers can keep the
    /// current `weekly_menu` allocation.
    pub(crate) fn map_days<F>(&self, mut f: F) -> Option<Self>
    where
        F: FnMut(usize, &DayMenu) -> Option<DayMenu>,
    {
        let mut changed = false;
        let days = self
            .weekly_menu
            .iter()
            .enumerate()
            .map(|(index, day)| match f(index, day) {
                Some(next) => {
                    changed = true;
                    Arc::new(next)
                }
                None => Arc::clone(day),
            })
            .collect();
        changed.then(|| self.with_days(days))
    }

    /// Replaces the entries of every day where `f` rewrote at least one.
    pub(crate) fn map_entries<F>(&self, mut f: F) -> Option<Self>
    where
        F: FnMut(&MenuEntry) -> Option<MenuEntry>,
    {
        self.map_days(|_, day| {
            rewrite(&day.entries, &mut f).map(|entries| DayMenu {
                entries,
                ..day.clone()
            })
        })
    }

    /// Replaces the day at `index`. Out-of-range indexes are ignored.
    pub(crate) fn replace_day(&self, index: usize, day: DayMenu) -> Option<Self> {
        self.map_days(|i, _| (i == index).then(|| day.clone()))
    }
}

/// Applies `f` to every item, returning a new list only if some item changed.
pub(crate) fn rewrite<T, F>(items: &[T], mut f: F) -> Option<Vec<T>>
where
    T: Clone,
    F: FnMut(&T) -> Option<T>,
{
    let mut changed = false;
    let out = items
        .iter()
        .map(|item| match f(item) {
            Some(next) => {
                changed = true;
                next
            }
            None => item.clone(),
        })
        .collect();
    changed.then_some(out)
}
