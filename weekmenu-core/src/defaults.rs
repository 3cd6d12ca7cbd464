//! Built-in palettes and seed data.
//!
//! A fresh store starts from these, and the migration engine falls back to
//! them field by field when a saved blob is missing or malformed.

use crate::models::{DayMenu, Dish, Ingredient, IngredientColor, IngredientKind, MenuEntry, Tag};

/// Number of days in a fresh weekly menu.
pub const DEFAULT_WEEK_LENGTH: usize = 5;

/// Upper bound on the number of days a weekly menu may hold.
pub const MAX_DAYS: usize = 7;

/// Color for tags that have no entry in the default tag list.
pub const FALLBACK_TAG_COLOR: &str = "#6b7280";

/// Soft card colors drawn from when regenerating a menu.
pub const DAY_PALETTE: [&str; 10] = [
    "#FF9A9E", "#A18CD1", "#FBC2EB", "#84FAB0", "#FFD1FF", "#8FD3F4", "#FFECD2", "#A6C1EE",
    "#FDCBF1", "#E0C3FC",
];

pub const WEEKDAY_LABELS: [&str; MAX_DAYS] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

const DEFAULT_TAGS: [(&str, &str); 8] = [
    ("大荤", "#ef4444"),
    ("小荤", "#f97316"),
    ("蔬菜", "#22c55e"),
    ("素菜", "#84cc16"),
    ("汤", "#06b6d4"),
    ("主食", "#eab308"),
    ("点心", "#ec4899"),
    ("海鲜", "#3b82f6"),
];

/// Label for the day at `index`, falling back to a numbered label past Sunday.
pub fn weekday_label(index: usize) -> String {
    WEEKDAY_LABELS
        .get(index)
        .map(|l| (*l).to_string())
        .unwrap_or_else(|| format!("第{}天", index + 1))
}

/// Palette color for the day at `index`, cycling through the palette.
pub fn palette_color(index: usize) -> &'static str {
    DAY_PALETTE[index % DAY_PALETTE.len()]
}

/// Color of `name` in the default tag list, if it is one of the defaults.
pub fn default_tag_color(name: &str) -> Option<&'static str> {
    DEFAULT_TAGS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, color)| *color)
}

pub fn default_tags() -> Vec<Tag> {
    DEFAULT_TAGS
        .iter()
        .map(|(name, color)| Tag::new(*name, *color))
        .collect()
}

pub fn default_ingredients() -> Vec<Ingredient> {
    use IngredientColor as C;

    let presets = [
        ("猪肉", C::Red),
        ("排骨", C::Red),
        ("牛肉", C::Brown),
        ("鸡腿", C::Orange),
        ("鸡翅", C::Orange),
        ("鸭肉", C::Brown),
        ("鱼", C::Blue),
        ("虾", C::Pink),
        ("鸡蛋", C::Yellow),
        ("豆腐", C::Default),
        ("土豆", C::Yellow),
        ("番茄", C::Red),
        ("青菜", C::Green),
        ("白菜", C::Green),
        ("萝卜", C::Default),
        ("西兰花", C::Green),
        ("茄子", C::Purple),
        ("青椒", C::Green),
        ("洋葱", C::Default),
        ("胡萝卜", C::Orange),
        ("黄瓜", C::Green),
        ("豆角", C::Green),
        ("菌菇", C::Brown),
        ("木耳", C::Gray),
        ("粉丝", C::Default),
        ("面条", C::Yellow),
        ("大米", C::Default),
    ];

    presets
        .into_iter()
        .map(|(name, color)| {
            let kind = if matches!(name, "洋葱" | "木耳" | "粉丝") {
                IngredientKind::Sub
            } else {
                IngredientKind::Main
            };
            Ingredient::with_preset(name, color).with_kind(kind)
        })
        .collect()
}

fn dish(name: &str, tags: &[&str], main: &[&str], sub: &[&str]) -> Dish {
    Dish::new(name)
        .with_tags(tags)
        .with_main_ingredients(main)
        .with_sub_ingredients(sub)
}

pub fn default_dishes() -> Vec<Dish> {
    vec![
        dish("糖醋排骨", &["大荤"], &["排骨"], &[]),
        dish("虾仁炒蛋", &["小荤", "海鲜"], &["虾", "鸡蛋"], &[]),
        dish("清炒小青菜", &["蔬菜", "素菜"], &["青菜"], &[]),
        dish("菌菇豆腐汤", &["汤"], &["菌菇", "豆腐"], &[]),
        dish("白米饭", &["主食"], &["大米"], &[]),
        dish("清蒸鲈鱼", &["大荤", "海鲜"], &["鱼"], &[]),
        dish("肉末茄子", &["小荤"], &["茄子"], &["猪肉"]),
        dish("西兰花炒胡萝卜", &["蔬菜", "素菜"], &["西兰花", "胡萝卜"], &[]),
        dish("番茄鸡蛋汤", &["汤"], &["番茄", "鸡蛋"], &[]),
        dish("杂粮饭", &["主食"], &["大米"], &[]),
        dish("水果沙拉", &["点心", "素菜"], &[], &[]),
        dish("土豆炖牛肉", &["大荤"], &["牛肉", "土豆"], &["洋葱"]),
        dish("西葫芦炒蛋", &["小荤"], &["鸡蛋"], &[]),
        dish("耗油生菜", &["蔬菜"], &[], &[]),
        dish("紫菜蛋花汤", &["汤", "海鲜"], &["鸡蛋"], &[]),
        dish("南瓜饼", &["点心"], &[], &[]),
        dish("照烧鸡腿", &["大荤"], &["鸡腿"], &[]),
        dish("烂糊肉丝", &["小荤"], &["白菜"], &["猪肉"]),
        dish("醋溜绿豆芽", &["蔬菜"], &[], &[]),
        dish("萝卜小排汤", &["汤"], &["排骨", "萝卜"], &[]),
        dish("上海炒饭", &["主食"], &["大米"], &["鸡蛋"]),
        dish("油焖大虾", &["大荤", "海鲜"], &["虾"], &[]),
        dish("百叶包肉", &["小荤"], &["猪肉"], &[]),
        dish("荷塘小炒", &["蔬菜"], &[], &["木耳"]),
        dish("罗宋汤", &["汤"], &["牛肉", "番茄"], &["土豆", "洋葱"]),
        dish("意大利肉酱面", &["主食"], &["面条"], &["牛肉", "番茄"]),
        dish("自制蛋挞", &["点心"], &["鸡蛋"], &[]),
        dish("青椒炒肉", &["小荤"], &["青椒", "猪肉"], &[]),
    ]
}

fn slots(dishes: &[(&str, &str)]) -> Vec<(String, Vec<String>)> {
    dishes
        .iter()
        .map(|(dish, tags)| {
            (
                (*dish).to_string(),
                tags.split(',').map(str::to_string).collect(),
            )
        })
        .collect()
}

/// The weekly arrangement a fresh store starts with.
///
/// Entry ids are `entry-0`, `entry-1`, … numbered across the whole week.
pub fn initial_weekly_menu() -> Vec<DayMenu> {
    let days = [
        slots(&[
            ("糖醋排骨", "大荤"),
            ("虾仁炒蛋", "小荤,海鲜"),
            ("清炒小青菜", "蔬菜,素菜"),
            ("菌菇豆腐汤", "汤"),
            ("白米饭", "主食"),
        ]),
        slots(&[
            ("清蒸鲈鱼", "大荤,海鲜"),
            ("肉末茄子", "小荤"),
            ("西兰花炒胡萝卜", "蔬菜,素菜"),
            ("番茄鸡蛋汤", "汤"),
            ("杂粮饭", "主食"),
            ("水果沙拉", "点心,素菜"),
        ]),
        slots(&[
            ("土豆炖牛肉", "大荤"),
            ("西葫芦炒蛋", "小荤"),
            ("耗油生菜", "蔬菜"),
            ("紫菜蛋花汤", "汤,海鲜"),
            ("白米饭", "主食"),
            ("南瓜饼", "点心"),
        ]),
        slots(&[
            ("照烧鸡腿", "大荤"),
            ("烂糊肉丝", "小荤"),
            ("醋溜绿豆芽", "蔬菜"),
            ("萝卜小排汤", "汤"),
            ("上海炒饭", "主食"),
        ]),
        slots(&[
            ("油焖大虾", "大荤,海鲜"),
            ("百叶包肉", "小荤"),
            ("荷塘小炒", "蔬菜"),
            ("罗宋汤", "汤"),
            ("意大利肉酱面", "主食"),
            ("自制蛋挞", "点心"),
        ]),
    ];

    let mut counter = 0;
    days.into_iter()
        .enumerate()
        .map(|(index, day_slots)| {
            let entries = day_slots
                .into_iter()
                .map(|(dish, tags)| {
                    let entry = MenuEntry::with_id(format!("entry-{}", counter), dish, tags);
                    counter += 1;
                    entry
                })
                .collect();
            DayMenu::new(weekday_label(index), palette_color(index)).with_entries(entries)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_initial_menu_shape() {
        let menu = initial_weekly_menu();
        assert_eq!(menu.len(), DEFAULT_WEEK_LENGTH);
        assert_eq!(menu[0].day, "周一");
        assert_eq!(menu[0].color, "#FF9A9E");
        assert_eq!(menu[0].entries[0].id, "entry-0");
        assert_eq!(menu[1].entries[0].id, "entry-5");
    }

    #[test]
    fn test_initial_menu_ids_unique() {
        let ids: Vec<_> = initial_weekly_menu()
            .into_iter()
            .flat_map(|d| d.entries.into_iter().map(|e| e.id))
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_initial_menu_references_default_dishes() {
        let dishes = default_dishes();
        for day in initial_weekly_menu() {
            for entry in day.entries {
                let dish = dishes.iter().find(|d| d.name == entry.dish_name);
                assert!(dish.is_some(), "missing dish {}", entry.dish_name);
                assert!(dish.unwrap().matches_template(&entry.tags));
            }
        }
    }

    #[test]
    fn test_default_catalog_names_unique() {
        let dishes = default_dishes();
        let names: HashSet<_> = dishes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), dishes.len());

        let ingredients = default_ingredients();
        let names: HashSet<_> = ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names.len(), ingredients.len());
    }

    #[test]
    fn test_default_tag_color_lookup() {
        assert_eq!(default_tag_color("海鲜"), Some("#3b82f6"));
        assert_eq!(default_tag_color("甜品"), None);
        assert_eq!(default_tags().len(), 8);
    }

    #[test]
    fn test_weekday_label_past_sunday() {
        assert_eq!(weekday_label(6), "周日");
        assert_eq!(weekday_label(7), "第8天");
    }
}
