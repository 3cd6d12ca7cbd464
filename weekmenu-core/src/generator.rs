//! Randomized menu assignment.
//!
//! Every function takes the random source explicitly so callers can seed it.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::defaults::DAY_PALETTE;
use crate::models::{DayMenu, Dish, MenuEntry};
use crate::state::MenuState;

/// Dishes whose tags include every tag of `template` (AND semantics).
/// An empty template matches every dish.
pub fn candidates<'a>(dishes: &'a [Dish], template: &[String]) -> Vec<&'a Dish> {
    dishes
        .iter()
        .filter(|d| d.matches_template(template))
        .collect()
}

/// Draws `count` colors from a shuffled copy of the day palette. Colors are
/// distinct until the palette is exhausted, then repeat in the same order.
pub(crate) fn draw_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let mut palette = DAY_PALETTE.to_vec();
    palette.shuffle(rng);
    (0..count)
        .map(|i| palette[i % palette.len()].to_string())
        .collect()
}

/// Refills every entry of every unlocked day and gives each unlocked day a
/// fresh color. Locked days keep their `Arc` untouched. Entries whose
/// template matches no dish keep their current dish.
pub(crate) fn generate_menu<R: Rng + ?Sized>(state: &MenuState, rng: &mut R) -> Option<MenuState> {
    let unlocked = state.weekly_menu().iter().filter(|d| !d.locked).count();
    if unlocked == 0 {
        return None;
    }

    let mut colors = draw_colors(unlocked, rng).into_iter();
    let dishes = state.dishes();

    state.map_days(|_, day| {
        if day.locked {
            return None;
        }

        let color = colors.next().unwrap_or_else(|| day.color.clone());
        let entries = day
            .entries
            .iter()
            .map(|entry| match candidates(dishes, &entry.tags).choose(&mut *rng) {
                Some(dish) => MenuEntry {
                    dish_name: dish.name.clone(),
                    ..entry.clone()
                },
                None => entry.clone(),
            })
            .collect();

        let next = DayMenu {
            color,
            entries,
            ..day.clone()
        };
        (next != *day).then_some(next)
    })
}

/// Re-rolls a single entry. When more than one dish fits the template, the
/// current dish is excluded so the re-roll is visible.
pub(crate) fn randomize_entry<R: Rng + ?Sized>(
    state: &MenuState,
    day_index: usize,
    entry_id: &str,
    rng: &mut R,
) -> Option<MenuState> {
    let day = state.day(day_index)?;
    let index = day.entry_index(entry_id)?;
    let entry = &day.entries[index];

    let mut pool = candidates(state.dishes(), &entry.tags);
    if pool.len() > 1 {
        pool.retain(|d| d.name != entry.dish_name);
    }

    let pick = pool.choose(rng)?;
    if pick.name == entry.dish_name {
        return None;
    }

    let mut entries = day.entries.clone();
    entries[index].dish_name = pick.name.clone();
    state.replace_day(
        day_index,
        DayMenu {
            entries,
            ..day.clone()
        },
    )
}
