mod config_cmd;
mod data;
mod dish;
mod ingredient;
mod menu;
mod tag;

pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use dish::DishCommand;
pub use ingredient::IngredientCommand;
pub use menu::MenuCommand;
pub use tag::TagCommand;

use clap::ValueEnum;
use std::io::{self, Write};
use weekmenu_core::MenuStore;

use crate::db::MenuRepository;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Saves the store if the operation changed it, and reports the outcome.
pub(crate) async fn finish(
    repo: &MenuRepository,
    store: &MenuStore,
    changed: bool,
    message: impl std::fmt::Display,
) -> Result<(), Box<dyn std::error::Error>> {
    if !changed {
        println!("No changes.");
        return Ok(());
    }
    repo.save(store).await?;
    println!("{}", message);
    Ok(())
}

/// Asks a yes/no question on stdin. Anything but `y` is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Parses a 1-based day position into an index.
pub(crate) fn parse_day(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Invalid day '{}'. Use a position starting at 1", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("1"), Ok(0));
        assert_eq!(parse_day(" 7 "), Ok(6));
        assert!(parse_day("0").is_err());
        assert!(parse_day("周一").is_err());
    }
}
