use clap::{Args, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{finish, parse_day, OutputFormat};
use crate::db::MenuRepository;
use weekmenu_core::{BackgroundKind, BackgroundSettings, DayMenu, MenuStore};

#[derive(Args)]
pub struct MenuCommand {
    #[command(subcommand)]
    pub command: MenuSubcommand,
}

/// Days are addressed by position, starting at 1.
#[derive(Subcommand)]
pub enum MenuSubcommand {
    /// Show the weekly menu
    Show {
        /// Only this day
        #[arg(value_parser = parse_day)]
        day: Option<usize>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Refill every unlocked day from the dish catalog
    Generate {
        /// Seed for a reproducible menu
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Add an empty slot to a day
    AddEntry {
        #[arg(value_parser = parse_day)]
        day: usize,

        /// Tag template for generation (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Remove a slot
    RemoveEntry {
        #[arg(value_parser = parse_day)]
        day: usize,
        entry: String,
    },

    /// Point a slot at a dish ("" clears it)
    SetDish {
        #[arg(value_parser = parse_day)]
        day: usize,
        entry: String,
        dish: String,
    },

    /// Replace a slot's tag template
    SetTags {
        #[arg(value_parser = parse_day)]
        day: usize,
        entry: String,

        /// Tags (can be repeated; none clears the template)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Copy a slot right after itself
    Duplicate {
        #[arg(value_parser = parse_day)]
        day: usize,
        entry: String,
    },

    /// Pick another dish for one slot
    Randomize {
        #[arg(value_parser = parse_day)]
        day: usize,
        entry: String,

        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Move a slot, possibly to another day
    Move {
        #[arg(value_parser = parse_day)]
        from: usize,
        entry: String,
        #[arg(value_parser = parse_day)]
        to: usize,

        /// Position in the target day after the move, starting at 0 (default: last)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Swap the plans of two days; labels stay in place
    Swap {
        #[arg(value_parser = parse_day)]
        a: usize,
        #[arg(value_parser = parse_day)]
        b: usize,
    },

    /// Lock a day against regeneration
    Lock {
        #[arg(value_parser = parse_day)]
        day: usize,
    },

    /// Unlock a day
    Unlock {
        #[arg(value_parser = parse_day)]
        day: usize,
    },

    /// Set a day's card color
    Color {
        #[arg(value_parser = parse_day)]
        day: usize,
        color: String,
    },

    /// Set a day's note (omit to clear)
    Note {
        #[arg(value_parser = parse_day)]
        day: usize,
        note: Option<String>,
    },

    /// Rename a day
    Label {
        #[arg(value_parser = parse_day)]
        day: usize,
        label: String,
    },

    /// Append a day
    AddDay,

    /// Remove a day with its slots
    RemoveDay {
        #[arg(value_parser = parse_day)]
        day: usize,
    },

    /// Set the page background
    Background {
        /// Background type (dots, grid, solid, none)
        kind: BackgroundKind,

        /// Background color
        #[arg(long)]
        color: Option<String>,
    },
}

impl MenuCommand {
    pub async fn run(&self, repo: &MenuRepository) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = repo.load().await?;

        let (changed, message) = match &self.command {
            MenuSubcommand::Show { day, format } => {
                return show(&store, *day, format);
            }

            MenuSubcommand::Generate { seed } => {
                let changed = match seed {
                    Some(seed) => store.generate_new_menu_with(&mut StdRng::seed_from_u64(*seed)),
                    None => store.generate_new_menu(),
                };
                (changed, render_week(&store))
            }

            MenuSubcommand::AddEntry { day, tags } => {
                let changed = store.add_entry(*day, tags);
                let id = store
                    .day(*day)
                    .and_then(|d| d.entries.last())
                    .map(|e| e.id.clone())
                    .unwrap_or_default();
                (changed, format!("Added entry {} to day {}", id, day + 1))
            }

            MenuSubcommand::RemoveEntry { day, entry } => (
                store.remove_entry(*day, entry),
                format!("Removed entry {}", entry),
            ),

            MenuSubcommand::SetDish { day, entry, dish } => {
                if !dish.trim().is_empty() && store.dish(dish.trim()).is_none() {
                    tracing::warn!(dish = %dish, "Dish is not in the catalog");
                }
                (
                    store.set_entry_dish(*day, entry, dish),
                    format!("Entry {} now holds {}", entry, display_dish(dish)),
                )
            }

            MenuSubcommand::SetTags { day, entry, tags } => (
                store.set_entry_tags(*day, entry, tags),
                format!("Entry {} template: [{}]", entry, tags.join(", ")),
            ),

            MenuSubcommand::Duplicate { day, entry } => (
                store.duplicate_entry(*day, entry),
                format!("Duplicated entry {}", entry),
            ),

            MenuSubcommand::Randomize { day, entry, seed } => {
                let changed = match seed {
                    Some(seed) => store.randomize_entry_with(
                        *day,
                        entry,
                        &mut StdRng::seed_from_u64(*seed),
                    ),
                    None => store.randomize_entry(*day, entry),
                };
                let dish = store
                    .day(*day)
                    .and_then(|d| d.entry(entry))
                    .map(|e| e.dish_name.clone())
                    .unwrap_or_default();
                (changed, format!("Entry {} now holds {}", entry, display_dish(&dish)))
            }

            MenuSubcommand::Move {
                from,
                entry,
                to,
                index,
            } => (
                store.move_entry(*from, *to, entry, index.unwrap_or(usize::MAX)),
                format!("Moved entry {} to day {}", entry, to + 1),
            ),

            MenuSubcommand::Swap { a, b } => (
                store.swap_days(*a, *b),
                format!("Swapped days {} and {}", a + 1, b + 1),
            ),

            MenuSubcommand::Lock { day } => (
                store.set_day_locked(*day, true),
                format!("Locked day {}", day + 1),
            ),

            MenuSubcommand::Unlock { day } => (
                store.set_day_locked(*day, false),
                format!("Unlocked day {}", day + 1),
            ),

            MenuSubcommand::Color { day, color } => (
                store.set_day_color(*day, color),
                format!("Day {} color: {}", day + 1, color.trim()),
            ),

            MenuSubcommand::Note { day, note } => {
                let note = note.as_deref().unwrap_or("");
                let message = if note.trim().is_empty() {
                    format!("Cleared note on day {}", day + 1)
                } else {
                    format!("Day {} note: {}", day + 1, note.trim())
                };
                (store.set_day_note(*day, note), message)
            }

            MenuSubcommand::Label { day, label } => (
                store.set_day_label(*day, label),
                format!("Day {} is now {}", day + 1, label.trim()),
            ),

            MenuSubcommand::AddDay => {
                let changed = store.add_day();
                let label = store
                    .weekly_menu()
                    .last()
                    .map(|d| d.day.clone())
                    .unwrap_or_default();
                (changed, format!("Added day {}", label))
            }

            MenuSubcommand::RemoveDay { day } => (
                store.remove_day(*day),
                format!("Removed day {}", day + 1),
            ),

            MenuSubcommand::Background { kind, color } => {
                let color = color
                    .clone()
                    .unwrap_or_else(|| store.background().color.clone());
                let settings = BackgroundSettings::new(*kind, color);
                let message = format!("Background: {} {}", settings.kind, settings.color);
                (store.set_background(settings), message)
            }
        };

        finish(repo, &store, changed, message).await
    }
}

fn show(
    store: &MenuStore,
    day: Option<usize>,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let days: Vec<(usize, &DayMenu)> = match day {
        Some(index) => match store.day(index) {
            Some(d) => vec![(index, d)],
            None => return Err(format!("Day not found: {}", index + 1).into()),
        },
        None => store.weekly_menu().into_iter().enumerate().collect(),
    };

    match format {
        OutputFormat::Json => {
            let days: Vec<&DayMenu> = days.into_iter().map(|(_, d)| d).collect();
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        OutputFormat::Text => {
            for (index, d) in days {
                print!("{}", render_day(store, index, d));
            }
        }
    }
    Ok(())
}

fn render_week(store: &MenuStore) -> String {
    store
        .weekly_menu()
        .into_iter()
        .enumerate()
        .map(|(index, day)| render_day(store, index, day))
        .collect::<Vec<_>>()
        .join("")
}

/// One day with entry ids, marking slots whose dish is gone from the catalog.
fn render_day(store: &MenuStore, index: usize, day: &DayMenu) -> String {
    let mut out = format!("{}. {} ({})", index + 1, day.day, day.color);
    if day.locked {
        out.push_str(" [locked]");
    }
    out.push('\n');

    if let Some(note) = &day.note {
        out.push_str(&format!("   Note: {}\n", note));
    }

    for entry in &day.entries {
        let mut dish = display_dish(&entry.dish_name);
        if !entry.is_empty() && store.resolve_entry_dish(entry).is_none() {
            dish.push_str(" (not in catalog)");
        }
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.tags.join(", "))
        };
        out.push_str(&format!("   {:<14} {}{}\n", entry.id, dish, tags));
    }
    out
}

fn display_dish(name: &str) -> String {
    match name.trim() {
        "" => "(empty)".to_string(),
        name => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekmenu_core::{DishUpdate, MenuEntry, PersistedState};

    fn store() -> MenuStore {
        MenuStore::from_persisted(PersistedState {
            dishes: vec![weekmenu_core::Dish::new("罗宋汤")],
            weekly_menu: vec![DayMenu::new("周一", "#FF9A9E")
                .with_note("早点吃")
                .locked()
                .with_entries(vec![
                    MenuEntry::with_id("a", "罗宋汤", ["汤"]),
                    MenuEntry::with_id("b", "", Vec::<String>::new()),
                    MenuEntry::with_id("c", "红烧肉", ["大荤"]),
                ])],
            ..PersistedState::default()
        })
    }

    #[test]
    fn test_render_day() {
        let store = store();
        let text = render_day(&store, 0, store.day(0).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "1. 周一 (#FF9A9E) [locked]");
        assert_eq!(lines[1], "   Note: 早点吃");
        assert!(lines[2].contains("罗宋汤 [汤]"));
        assert!(lines[3].contains("(empty)"));
        assert!(lines[4].contains("红烧肉 (not in catalog) [大荤]"));
    }

    #[test]
    fn test_render_week_after_rename() {
        let mut store = store();
        assert!(store.update_dish("罗宋汤", &DishUpdate::rename("红菜汤")));
        let text = render_week(&store);
        assert!(text.contains("红菜汤 [汤]"));
        assert!(!text.contains("罗宋汤"));
    }

    #[test]
    fn test_display_dish() {
        assert_eq!(display_dish(""), "(empty)");
        assert_eq!(display_dish(" 罗宋汤 "), "罗宋汤");
    }
}
