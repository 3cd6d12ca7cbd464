use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize_names;

/// A catalog dish, keyed by name.
///
/// Tags and ingredients are referenced by name; the lists behave as sets
/// (no duplicates, no empty names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub name: String,
    pub tags: Vec<String>,
    pub main_ingredients: Vec<String>,
    pub sub_ingredients: Vec<String>,
    pub steps: String,
    /// Last time the dish was picked for a menu slot (epoch milliseconds on disk)
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Dish {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            main_ingredients: Vec::new(),
            sub_ingredients: Vec::new(),
            steps: String::new(),
            last_used_at: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_names(tags);
        self
    }

    pub fn with_main_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.main_ingredients = normalize_names(names);
        self
    }

    pub fn with_sub_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sub_ingredients = normalize_names(names);
        self
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn with_last_used_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_used_at = Some(at);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// AND semantics: true when the dish carries every non-empty tag in
    /// `template`. An empty template matches every dish.
    pub fn matches_template(&self, template: &[String]) -> bool {
        template
            .iter()
            .filter(|t| !t.is_empty())
            .all(|t| self.has_tag(t))
    }

    pub fn uses_ingredient(&self, name: &str) -> bool {
        self.main_ingredients.iter().any(|i| i == name)
            || self.sub_ingredients.iter().any(|i| i == name)
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count().max(1) * 2))?;

        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if !self.main_ingredients.is_empty() {
            writeln!(f, "Main ingredients: {}", self.main_ingredients.join(", "))?;
        }

        if !self.sub_ingredients.is_empty() {
            writeln!(f, "Sub ingredients: {}", self.sub_ingredients.join(", "))?;
        }

        if let Some(at) = self.last_used_at {
            writeln!(f, "Last used: {}", at.format("%Y-%m-%d %H:%M"))?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\nSteps:\n{}", self.steps)?;
        }

        Ok(())
    }
}

/// Fields supplied when adding a dish. The name is passed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDish {
    pub tags: Vec<String>,
    pub main_ingredients: Vec<String>,
    pub sub_ingredients: Vec<String>,
    pub steps: String,
}

impl NewDish {
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Partial update for a dish. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub main_ingredients: Option<Vec<String>>,
    pub sub_ingredients: Option<Vec<String>>,
    pub steps: Option<String>,
}

impl DishUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = Some(steps.into());
        self
    }

    /// Trimmed, non-empty new name, if any.
    pub(crate) fn new_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}
