use clap::{Args, Subcommand};

use super::{confirm, finish, OutputFormat};
use crate::db::MenuRepository;
use weekmenu_core::{Dish, DishUpdate, NewDish};

#[derive(Args)]
pub struct DishCommand {
    #[command(subcommand)]
    pub command: DishSubcommand,
}

#[derive(Subcommand)]
pub enum DishSubcommand {
    /// List dishes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only dishes carrying every given tag (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Most recently used first
        #[arg(long)]
        recent: bool,
    },

    /// Show a dish's details
    Show {
        name: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new dish
    Add {
        name: String,

        /// Tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Main ingredients (can be repeated)
        #[arg(long = "main", value_name = "INGREDIENT")]
        main_ingredients: Vec<String>,

        /// Sub ingredients (can be repeated)
        #[arg(long = "sub", value_name = "INGREDIENT")]
        sub_ingredients: Vec<String>,

        /// Cooking steps
        #[arg(long)]
        steps: Option<String>,
    },

    /// Update a dish. Renames carry over to every menu entry.
    Update {
        name: String,

        /// New name
        #[arg(long = "name", value_name = "NAME")]
        new_name: Option<String>,

        /// Replace the tags (can be repeated; pass "" to clear)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Option<Vec<String>>,

        /// Replace the main ingredients (can be repeated)
        #[arg(long = "main", value_name = "INGREDIENT")]
        main_ingredients: Option<Vec<String>>,

        /// Replace the sub ingredients (can be repeated)
        #[arg(long = "sub", value_name = "INGREDIENT")]
        sub_ingredients: Option<Vec<String>>,

        /// Replace the cooking steps
        #[arg(long)]
        steps: Option<String>,
    },

    /// Delete a dish. Menu entries pointing at it become empty.
    Remove {
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Mark a dish as used now
    Used { name: String },
}

impl DishCommand {
    pub async fn run(&self, repo: &MenuRepository) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = repo.load().await?;

        match &self.command {
            DishSubcommand::List {
                format,
                tags,
                recent,
            } => {
                let dishes: Vec<&Dish> = if *recent {
                    store
                        .dishes_by_recency()
                        .into_iter()
                        .filter(|d| d.matches_template(tags))
                        .collect()
                } else {
                    store.dishes_matching(tags)
                };

                if dishes.is_empty() {
                    println!("No dishes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dishes)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<20}  {:<16}  TAGS", "NAME", "LAST USED");
                        println!("{}", "-".repeat(60));
                        for dish in &dishes {
                            let last_used = dish
                                .last_used_at
                                .map(|at| at.format("%Y-%m-%d").to_string())
                                .unwrap_or_else(|| "-".to_string());
                            println!(
                                "{:<20}  {:<16}  {}",
                                truncate(&dish.name, 20),
                                last_used,
                                dish.tags.join(", ")
                            );
                        }
                        println!("\nTotal: {} dish(es)", dishes.len());
                    }
                }
                Ok(())
            }

            DishSubcommand::Show { name, format } => match store.dish(name) {
                Some(dish) => {
                    match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(dish)?);
                        }
                        OutputFormat::Text => {
                            print!("{}", dish);
                        }
                    }
                    Ok(())
                }
                None => Err(format!("Dish not found: {}", name).into()),
            },

            DishSubcommand::Add {
                name,
                tags,
                main_ingredients,
                sub_ingredients,
                steps,
            } => {
                if name.trim().is_empty() {
                    return Err("Dish name cannot be empty".into());
                }

                let fields = NewDish {
                    tags: tags.clone(),
                    main_ingredients: main_ingredients.clone(),
                    sub_ingredients: sub_ingredients.clone(),
                    steps: steps.clone().unwrap_or_default(),
                };
                let changed = store.add_dish(name, fields);
                finish(repo, &store, changed, format!("Added dish: {}", name.trim())).await
            }

            DishSubcommand::Update {
                name,
                new_name,
                tags,
                main_ingredients,
                sub_ingredients,
                steps,
            } => {
                let update = DishUpdate {
                    name: new_name.clone(),
                    tags: tags.clone(),
                    main_ingredients: main_ingredients.clone(),
                    sub_ingredients: sub_ingredients.clone(),
                    steps: steps.clone(),
                };
                if update == DishUpdate::default() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }
                if store.dish(name).is_none() {
                    return Err(format!("Dish not found: {}", name).into());
                }

                let changed = store.update_dish(name, &update);
                let shown = new_name.as_deref().map(str::trim).unwrap_or(name);
                finish(repo, &store, changed, format!("Updated dish: {}", shown)).await
            }

            DishSubcommand::Remove { name, force } => {
                if store.dish(name).is_none() {
                    return Err(format!("Dish not found: {}", name).into());
                }
                if !force && !confirm(&format!("Delete dish '{}'?", name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let changed = store.remove_dish(name);
                finish(repo, &store, changed, format!("Deleted dish: {}", name)).await
            }

            DishSubcommand::Used { name } => {
                if store.dish(name).is_none() {
                    return Err(format!("Dish not found: {}", name).into());
                }
                let changed = store.mark_dish_used(name);
                finish(repo, &store, changed, format!("Marked as used: {}", name)).await
            }
        }
    }
}

/// Cuts a name to `width` characters, marking the cut with `...`.
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let kept: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}
