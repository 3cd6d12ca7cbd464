use clap::{Args, Subcommand};

use super::{confirm, finish, OutputFormat};
use crate::db::MenuRepository;
use weekmenu_core::{Ingredient, IngredientColor, IngredientKind, IngredientUpdate};

#[derive(Args)]
pub struct IngredientCommand {
    #[command(subcommand)]
    pub command: IngredientSubcommand,
}

#[derive(Subcommand)]
pub enum IngredientSubcommand {
    /// List ingredients
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only ingredients of this type (main, sub)
        #[arg(long)]
        kind: Option<IngredientKind>,
    },

    /// Add an ingredient
    Add {
        name: String,

        /// Color preset (default, gray, brown, orange, yellow, green, blue, purple, pink, red)
        #[arg(long)]
        color: Option<IngredientColor>,

        /// Background color, overrides the preset
        #[arg(long)]
        bg: Option<String>,

        /// Text color, overrides the preset
        #[arg(long)]
        text: Option<String>,

        /// Ingredient type (main, sub)
        #[arg(long, default_value = "main")]
        kind: IngredientKind,
    },

    /// Update an ingredient. Renames carry over to every dish.
    Update {
        name: String,

        /// New name
        #[arg(long = "name", value_name = "NAME")]
        new_name: Option<String>,

        /// Color preset, sets both colors
        #[arg(long)]
        color: Option<IngredientColor>,

        /// Background color
        #[arg(long)]
        bg: Option<String>,

        /// Text color
        #[arg(long)]
        text: Option<String>,

        /// Ingredient type (main, sub)
        #[arg(long)]
        kind: Option<IngredientKind>,
    },

    /// Delete an ingredient and strip it from every dish
    Remove {
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl IngredientCommand {
    pub async fn run(&self, repo: &MenuRepository) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = repo.load().await?;

        match &self.command {
            IngredientSubcommand::List { format, kind } => {
                let ingredients: Vec<&Ingredient> = store
                    .ingredients()
                    .iter()
                    .filter(|i| kind.map_or(true, |k| i.kind == k))
                    .collect();

                if ingredients.is_empty() {
                    println!("No ingredients found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&ingredients)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<12}  {:<5}  {:<8}  TEXT", "NAME", "TYPE", "BG");
                        println!("{}", "-".repeat(40));
                        for ingredient in &ingredients {
                            println!(
                                "{:<12}  {:<5}  {:<8}  {}",
                                ingredient.name,
                                ingredient.kind,
                                ingredient.bg_color,
                                ingredient.text_color
                            );
                        }
                        println!("\nTotal: {} ingredient(s)", ingredients.len());
                    }
                }
                Ok(())
            }

            IngredientSubcommand::Add {
                name,
                color,
                bg,
                text,
                kind,
            } => {
                if name.trim().is_empty() {
                    return Err("Ingredient name cannot be empty".into());
                }

                let preset = color.unwrap_or(IngredientColor::Default);
                let bg = bg.as_deref().unwrap_or(preset.bg());
                let text = text.as_deref().unwrap_or(preset.text());
                let changed = store.add_ingredient(name, bg, text, *kind);
                finish(repo, &store, changed, format!("Added ingredient: {}", name.trim())).await
            }

            IngredientSubcommand::Update {
                name,
                new_name,
                color,
                bg,
                text,
                kind,
            } => {
                if store.ingredient(name).is_none() {
                    return Err(format!("Ingredient not found: {}", name).into());
                }

                let update = IngredientUpdate {
                    name: new_name.clone(),
                    bg_color: bg.clone().or_else(|| color.map(|c| c.bg().to_string())),
                    text_color: text.clone().or_else(|| color.map(|c| c.text().to_string())),
                    kind: *kind,
                };
                if update == IngredientUpdate::default() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let changed = store.update_ingredient(name, &update);
                let shown = new_name.as_deref().map(str::trim).unwrap_or(name);
                finish(repo, &store, changed, format!("Updated ingredient: {}", shown)).await
            }

            IngredientSubcommand::Remove { name, force } => {
                if store.ingredient(name).is_none() {
                    return Err(format!("Ingredient not found: {}", name).into());
                }
                if !force && !confirm(&format!("Delete ingredient '{}'?", name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let changed = store.remove_ingredient(name);
                finish(repo, &store, changed, format!("Deleted ingredient: {}", name)).await
            }
        }
    }
}
