use clap::{Args, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{confirm, finish};
use crate::db::MenuRepository;
use weekmenu_core::MenuStore;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Print the saved menu state as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the stored text as is, without migrating it
        #[arg(long)]
        raw: bool,
    },

    /// Replace the saved state with a JSON file ("-" reads stdin).
    /// Older formats are upgraded on the way in.
    Import { path: PathBuf },

    /// Delete the saved state; the next command starts from the defaults
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Restore the built-in dishes, tags, ingredients and menu
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DataCommand {
    pub async fn run(&self, repo: &MenuRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Export { output, raw } => {
                let text = if *raw {
                    let entry = repo
                        .raw_entry()
                        .await?
                        .ok_or_else(|| format!("Nothing saved under '{}'", repo.key()))?;
                    if let Some(saved) = entry.updated_at {
                        eprintln!("Last saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                    entry.value
                } else {
                    let store = repo.load().await?;
                    serde_json::to_string_pretty(&store.to_value()?)?
                };

                match output {
                    Some(path) => {
                        std::fs::write(path, format!("{}\n", text))?;
                        println!("Exported to {}", path.display());
                    }
                    None => println!("{}", text),
                }
                Ok(())
            }

            DataSubcommand::Import { path } => {
                let text = read_input(path)?;
                let value: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;

                let store = MenuStore::from_value(&value);
                repo.save(&store).await?;
                println!(
                    "Imported {} dish(es), {} tag(s), {} ingredient(s), {} day(s)",
                    store.dishes().len(),
                    store.tags().len(),
                    store.ingredients().len(),
                    store.weekly_menu().len()
                );
                Ok(())
            }

            DataSubcommand::Clear { force } => {
                if !force && !confirm(&format!("Delete the menu saved under '{}'?", repo.key()))? {
                    println!("Clear cancelled.");
                    return Ok(());
                }

                if repo.clear().await? {
                    println!("Deleted saved menu.");
                } else {
                    println!("Nothing saved under '{}'.", repo.key());
                }
                Ok(())
            }

            DataSubcommand::Reset { force } => {
                if !force && !confirm("Replace all saved data with the defaults?")? {
                    println!("Reset cancelled.");
                    return Ok(());
                }

                let mut store = repo.load().await?;
                let changed = store.reset();
                finish(repo, &store, changed, "Restored defaults").await
            }
        }
    }
}

fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_input_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("menu.json");
        std::fs::write(&path, "{}").unwrap();

        assert_eq!(read_input(&path).unwrap(), "{}");
    }

    #[test]
    fn test_read_input_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = read_input(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
