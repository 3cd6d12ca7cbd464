use clap::{Args, Subcommand};
use serde::Serialize;

use super::{confirm, finish, OutputFormat};
use crate::db::MenuRepository;
use weekmenu_core::TagUpdate;

#[derive(Args)]
pub struct TagCommand {
    #[command(subcommand)]
    pub command: TagSubcommand,
}

#[derive(Subcommand)]
pub enum TagSubcommand {
    /// List tags with the number of dishes using each
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a tag
    Add {
        name: String,

        /// Display color (e.g. "#ef4444")
        #[arg(long, default_value = "")]
        color: String,
    },

    /// Rename or recolor a tag. Renames carry over to dishes and menu entries.
    Update {
        name: String,

        /// New name
        #[arg(long = "name", value_name = "NAME")]
        new_name: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a tag and strip it from every dish and menu entry
    Remove {
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Serialize)]
struct TagRow<'a> {
    name: &'a str,
    color: &'a str,
    dishes: usize,
}

impl TagCommand {
    pub async fn run(&self, repo: &MenuRepository) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = repo.load().await?;

        match &self.command {
            TagSubcommand::List { format } => {
                let rows: Vec<TagRow> = store
                    .tags()
                    .iter()
                    .map(|t| TagRow {
                        name: &t.name,
                        color: &t.color,
                        dishes: store.tag_usage_count(&t.name),
                    })
                    .collect();

                if rows.is_empty() {
                    println!("No tags found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<12}  {:<10}  DISHES", "NAME", "COLOR");
                        println!("{}", "-".repeat(34));
                        for row in &rows {
                            println!("{:<12}  {:<10}  {}", row.name, row.color, row.dishes);
                        }
                    }
                }
                Ok(())
            }

            TagSubcommand::Add { name, color } => {
                if name.trim().is_empty() {
                    return Err("Tag name cannot be empty".into());
                }
                let changed = store.add_tag(name, color);
                finish(repo, &store, changed, format!("Added tag: {}", name.trim())).await
            }

            TagSubcommand::Update {
                name,
                new_name,
                color,
            } => {
                if new_name.is_none() && color.is_none() {
                    return Err("Nothing to update. Provide --name or --color.".into());
                }
                if store.tag(name).is_none() {
                    return Err(format!("Tag not found: {}", name).into());
                }

                let update = TagUpdate {
                    name: new_name.clone(),
                    color: color.clone(),
                };
                let changed = store.update_tag(name, &update);
                let shown = new_name.as_deref().map(str::trim).unwrap_or(name);
                finish(repo, &store, changed, format!("Updated tag: {}", shown)).await
            }

            TagSubcommand::Remove { name, force } => {
                if store.tag(name).is_none() {
                    return Err(format!("Tag not found: {}", name).into());
                }
                let used = store.tag_usage_count(name);
                if !force
                    && !confirm(&format!("Delete tag '{}' (used by {} dish(es))?", name, used))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let changed = store.remove_tag(name);
                finish(repo, &store, changed, format!("Deleted tag: {}", name)).await
            }
        }
    }
}
