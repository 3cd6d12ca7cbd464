//! Arrangement of the weekly menu: moving entries, swapping day contents,
//! and the per-day and per-entry edits.
//!
//! Day indexes are positions in `weekly_menu`. Out-of-range indexes and
//! unknown entry ids are soft failures (`None`).

use std::collections::HashSet;
use std::sync::Arc;

use crate::defaults::{self, MAX_DAYS};
use crate::models::{normalize_names, DayMenu, MenuEntry};
use crate::state::MenuState;

fn edit_day<F>(state: &MenuState, index: usize, f: F) -> Option<MenuState>
where
    F: FnOnce(&DayMenu) -> Option<DayMenu>,
{
    let next = f(state.day(index)?)?;
    if next == *state.day(index)? {
        return None;
    }
    state.replace_day(index, next)
}

fn edit_entry<F>(state: &MenuState, day: usize, entry_id: &str, f: F) -> Option<MenuState>
where
    F: FnOnce(&MenuEntry) -> MenuEntry,
{
    edit_day(state, day, |d| {
        let index = d.entry_index(entry_id)?;
        let mut entries = d.entries.clone();
        entries[index] = f(&entries[index]);
        Some(DayMenu {
            entries,
            ..d.clone()
        })
    })
}

// =============================================================================
// Relocation
// =============================================================================

/// Exchanges the contents of two day slots. Entries, color, lock and note
/// travel; each slot keeps its own label.
pub(crate) fn swap_days(state: &MenuState, a: usize, b: usize) -> Option<MenuState> {
    if a == b {
        return None;
    }
    let first = state.day(a)?;
    let second = state.day(b)?;

    let take = |label: &DayMenu, content: &DayMenu| DayMenu {
        day: label.day.clone(),
        ..content.clone()
    };
    let next_a = take(first, second);
    let next_b = take(second, first);
    if next_a == *first && next_b == *second {
        return None;
    }

    state.map_days(|i, _| match i {
        i if i == a => Some(next_a.clone()),
        i if i == b => Some(next_b.clone()),
        _ => None,
    })
}

/// Moves an entry to `to_index` in `to_day`, where `to_index` is the
/// position the entry occupies afterwards. Indexes past the end append.
///
/// Within one day the entry is removed first, so moving `x` in `[x, y, z]`
/// to index 2 yields `[y, z, x]` and to index 1 yields `[y, x, z]`. The
/// target is never decremented for a forward move: `to_index` always names
/// the final slot, unlike a drop-before-index rule that would turn the
/// index-1 move into a no-op.
pub(crate) fn move_entry(
    state: &MenuState,
    from_day: usize,
    to_day: usize,
    entry_id: &str,
    to_index: usize,
) -> Option<MenuState> {
    let source = state.day(from_day)?;
    let target = state.day(to_day)?;
    let from_index = source.entry_index(entry_id)?;

    let mut source_entries = source.entries.clone();
    let entry = source_entries.remove(from_index);

    if from_day == to_day {
        let to_index = to_index.min(source_entries.len());
        if to_index == from_index {
            return None;
        }
        source_entries.insert(to_index, entry);
        return state.replace_day(
            from_day,
            DayMenu {
                entries: source_entries,
                ..source.clone()
            },
        );
    }

    let mut target_entries = target.entries.clone();
    target_entries.insert(to_index.min(target_entries.len()), entry);

    let next_source = DayMenu {
        entries: source_entries,
        ..source.clone()
    };
    let next_target = DayMenu {
        entries: target_entries,
        ..target.clone()
    };
    state.map_days(|i, _| match i {
        i if i == from_day => Some(next_source.clone()),
        i if i == to_day => Some(next_target.clone()),
        _ => None,
    })
}

// =============================================================================
// Entries
// =============================================================================

/// Appends an empty entry with the given tag template.
pub(crate) fn add_entry<I, S>(state: &MenuState, day: usize, tags: I) -> Option<MenuState>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entry = MenuEntry::new("", tags);
    while state.contains_entry_id(&entry.id) {
        entry = entry.duplicate();
    }
    edit_day(state, day, |d| {
        let mut entries = d.entries.clone();
        entries.push(entry);
        Some(DayMenu {
            entries,
            ..d.clone()
        })
    })
}

pub(crate) fn remove_entry(state: &MenuState, day: usize, entry_id: &str) -> Option<MenuState> {
    edit_day(state, day, |d| {
        let index = d.entry_index(entry_id)?;
        let mut entries = d.entries.clone();
        entries.remove(index);
        Some(DayMenu {
            entries,
            ..d.clone()
        })
    })
}

/// Points an entry at a dish by name. The name is not checked against the
/// catalog; an empty name clears the slot.
pub(crate) fn set_entry_dish(
    state: &MenuState,
    day: usize,
    entry_id: &str,
    dish_name: &str,
) -> Option<MenuState> {
    edit_entry(state, day, entry_id, |e| MenuEntry {
        dish_name: dish_name.trim().to_string(),
        ..e.clone()
    })
}

pub(crate) fn set_entry_tags<I, S>(
    state: &MenuState,
    day: usize,
    entry_id: &str,
    tags: I,
) -> Option<MenuState>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tags = normalize_names(tags);
    edit_entry(state, day, entry_id, |e| MenuEntry {
        tags,
        ..e.clone()
    })
}

/// Inserts a copy of the entry, under a fresh id, right after it.
pub(crate) fn duplicate_entry(state: &MenuState, day: usize, entry_id: &str) -> Option<MenuState> {
    edit_day(state, day, |d| {
        let index = d.entry_index(entry_id)?;
        let mut copy = d.entries[index].duplicate();
        while state.contains_entry_id(&copy.id) {
            copy = copy.duplicate();
        }
        let mut entries = d.entries.clone();
        entries.insert(index + 1, copy);
        Some(DayMenu {
            entries,
            ..d.clone()
        })
    })
}

// =============================================================================
// Days
// =============================================================================

pub(crate) fn set_day_label(state: &MenuState, day: usize, label: &str) -> Option<MenuState> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    edit_day(state, day, |d| {
        Some(DayMenu {
            day: label.to_string(),
            ..d.clone()
        })
    })
}

pub(crate) fn set_day_color(state: &MenuState, day: usize, color: &str) -> Option<MenuState> {
    let color = color.trim();
    if color.is_empty() {
        return None;
    }
    edit_day(state, day, |d| {
        Some(DayMenu {
            color: color.to_string(),
            ..d.clone()
        })
    })
}

/// Sets the day's note. A blank note clears it.
pub(crate) fn set_day_note(state: &MenuState, day: usize, note: &str) -> Option<MenuState> {
    let note = Some(note.trim()).filter(|n| !n.is_empty()).map(String::from);
    edit_day(state, day, |d| {
        Some(DayMenu {
            note,
            ..d.clone()
        })
    })
}

pub(crate) fn set_day_locked(state: &MenuState, day: usize, locked: bool) -> Option<MenuState> {
    edit_day(state, day, |d| {
        Some(DayMenu {
            locked,
            ..d.clone()
        })
    })
}

pub(crate) fn toggle_day_lock(state: &MenuState, day: usize) -> Option<MenuState> {
    let locked = state.day(day)?.locked;
    set_day_locked(state, day, !locked)
}

/// Appends an empty day named and colored for its position.
pub(crate) fn add_day(state: &MenuState) -> Option<MenuState> {
    let index = state.weekly_menu().len();
    if index >= MAX_DAYS {
        return None;
    }
    let mut days = state.weekly_menu().to_vec();
    days.push(Arc::new(DayMenu::new(
        defaults::weekday_label(index),
        defaults::palette_color(index),
    )));
    Some(state.with_days(days))
}

/// Removes a day with its entries. The last remaining day stays.
pub(crate) fn remove_day(state: &MenuState, day: usize) -> Option<MenuState> {
    let days = state.weekly_menu();
    if day >= days.len() || days.len() == 1 {
        return None;
    }
    let mut days = days.to_vec();
    days.remove(day);
    Some(state.with_days(days))
}

/// Replaces the whole arrangement. Rejected when empty, longer than
/// [`MAX_DAYS`], or when any entry id is empty or repeated.
pub(crate) fn set_weekly_menu(state: &MenuState, days: Vec<DayMenu>) -> Option<MenuState> {
    if days.is_empty() || days.len() > MAX_DAYS {
        return None;
    }

    let mut seen = HashSet::new();
    let ids_valid = days
        .iter()
        .flat_map(|d| &d.entries)
        .all(|e| !e.id.is_empty() && seen.insert(e.id.as_str()));
    if !ids_valid {
        return None;
    }

    let current = state.weekly_menu();
    if current.len() == days.len() && current.iter().zip(&days).all(|(a, b)| **a == *b) {
        return None;
    }

    // Keep the allocation of days that did not change.
    let days = days
        .into_iter()
        .enumerate()
        .map(|(i, day)| match current.get(i) {
            Some(existing) if **existing == day => Arc::clone(existing),
            _ => Arc::new(day),
        })
        .collect();
    Some(state.with_days(days))
}
