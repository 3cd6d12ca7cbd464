//! Weekmenu Core Library
//!
//! The in-memory domain store behind the weekly menu planner: dish, tag and
//! ingredient catalogs, the weekly arrangement, and the migration of saved
//! state.

pub mod catalog;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod migrate;
pub mod models;
pub mod reorder;
pub mod state;
pub mod store;

pub use catalog::{dishes_by_recency, tag_usage_count};
pub use error::{Error, Result};
pub use generator::candidates;
pub use migrate::{migrate, migrate_str};
pub use models::{
    BackgroundKind, BackgroundSettings, DayMenu, Dish, DishUpdate, Ingredient, IngredientColor,
    IngredientKind, IngredientUpdate, MenuEntry, NewDish, Tag, TagUpdate,
};
pub use state::{MenuState, PersistedState};
pub use store::MenuStore;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
