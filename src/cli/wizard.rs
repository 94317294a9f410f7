//! Interactive prompts for item and location input
//!
//! Used by `add -i`, `edit -i` and the shell. All prompts share one
//! [`ColorfulTheme`].

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::{LocationFilter, QuerySpec, QuitChoice, SortColumn};
use crate::entities::{InventoryItem, ItemDraft, ItemUpdate};

/// Where an entered item should be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationChoice {
    /// A location already in the set
    Existing(String),
    /// A location typed in that must be added first
    New(String),
    /// No location
    Unset,
}

impl LocationChoice {
    pub fn name(&self) -> &str {
        match self {
            LocationChoice::Existing(name) | LocationChoice::New(name) => name,
            LocationChoice::Unset => "",
        }
    }
}

/// Prompt collection for inventory data
pub struct ItemWizard {
    theme: ColorfulTheme,
}

impl Default for ItemWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Free text; `required` rejects blank input
    pub fn text(&self, prompt: &str, default: &str, required: bool) -> Result<String> {
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(!required);
        let input = if default.is_empty() {
            input
        } else {
            input.default(default.to_string())
        };
        let value = if required {
            input
                .validate_with(|v: &String| -> std::result::Result<(), &'static str> {
                    if v.trim().is_empty() {
                        Err("a value is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .into_diagnostic()?
        } else {
            input.interact_text().into_diagnostic()?
        };
        Ok(value.trim().to_string())
    }

    /// Non-negative whole number
    pub fn quantity(&self, default: u32) -> Result<i64> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt("Quantity")
            .default(default.to_string())
            .validate_with(|v: &String| -> std::result::Result<(), &'static str> {
                match v.trim().parse::<i64>() {
                    Ok(n) if n >= 0 => Ok(()),
                    Ok(_) => Err("quantity cannot be negative"),
                    Err(_) => Err("enter a whole number"),
                }
            })
            .interact_text()
            .into_diagnostic()?;
        value.trim().parse().into_diagnostic()
    }

    /// Yes/No selection
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&["Yes", "No"])
            .default(if default { 0 } else { 1 })
            .interact()
            .into_diagnostic()?;
        Ok(selection == 0)
    }

    /// Pick an existing location, type a new one, or leave it empty
    pub fn location(&self, locations: &[String], current: &str) -> Result<LocationChoice> {
        let mut items: Vec<String> = locations.to_vec();
        items.push(style("<new location>").italic().to_string());
        items.push(style("<none>").dim().to_string());

        let default_idx = locations
            .iter()
            .position(|l| l.to_lowercase() == current.to_lowercase())
            .unwrap_or(if current.is_empty() { locations.len() + 1 } else { locations.len() });

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Location")
            .items(&items)
            .default(default_idx)
            .interact()
            .into_diagnostic()?;

        if selection < locations.len() {
            return Ok(LocationChoice::Existing(locations[selection].clone()));
        }
        if selection == locations.len() + 1 {
            return Ok(LocationChoice::Unset);
        }

        let name = self.text("New location name", current, true)?;
        match locations.iter().find(|l| l.to_lowercase() == name.to_lowercase()) {
            Some(existing) => Ok(LocationChoice::Existing(existing.clone())),
            None => Ok(LocationChoice::New(name)),
        }
    }

    /// Collect every field of a new item
    pub fn draft(&self, locations: &[String]) -> Result<(ItemDraft, LocationChoice)> {
        println!();
        println!("{} Adding new item", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());

        let number = self.text("Inventory number", "", true)?;
        let name = self.text("Name", "", true)?;
        let description = self.text("Description", "", false)?;
        let quantity = self.quantity(0)?;
        let location = self.location(locations, "")?;

        let draft = ItemDraft::new(number, name)
            .with_description(description)
            .with_quantity(quantity)
            .with_location(location.name());
        Ok((draft, location))
    }

    /// Edit every field of `item`, pre-filled with its current values
    pub fn update(&self, item: &InventoryItem, locations: &[String]) -> Result<(ItemUpdate, LocationChoice)> {
        println!();
        println!("{} Editing item {} ({})", style("◆").cyan(), style(item.id).cyan(), item.name);
        println!("{}", style("─".repeat(50)).dim());

        let number = self.text("Inventory number", &item.inventory_number, true)?;
        let name = self.text("Name", &item.name, true)?;
        let description = self.text("Description", &item.description, false)?;
        let quantity = self.quantity(item.quantity)?;
        let location = self.location(locations, &item.location)?;

        let update = ItemUpdate {
            inventory_number: Some(number),
            name: Some(name),
            description: Some(description),
            quantity: Some(quantity),
            location: Some(location.name().to_string()),
        };
        Ok((update, location))
    }

    /// Pick one item from a list; `None` when the list is empty or the
    /// prompt was dismissed
    pub fn pick_item(&self, prompt: &str, items: &[&InventoryItem]) -> Result<Option<u32>> {
        if items.is_empty() {
            return Ok(None);
        }
        let labels: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .into_diagnostic()?;
        Ok(selection.map(|idx| items[idx].id))
    }

    /// Pick one entry from `options`; `None` when dismissed
    pub fn pick(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()
            .into_diagnostic()
    }

    /// Edit sort column, direction, text and location filter
    pub fn query(&self, current: &QuerySpec, locations: &[String]) -> Result<QuerySpec> {
        let columns: Vec<String> = SortColumn::ALL.iter().map(|c| c.to_string()).collect();
        let column_idx = SortColumn::ALL
            .iter()
            .position(|c| *c == current.sort_column)
            .unwrap_or(0);
        let column = Select::with_theme(&self.theme)
            .with_prompt("Sort by")
            .items(&columns)
            .default(column_idx)
            .interact()
            .into_diagnostic()?;

        let direction = Select::with_theme(&self.theme)
            .with_prompt("Direction")
            .items(&["Ascending", "Descending"])
            .default(if current.ascending { 0 } else { 1 })
            .interact()
            .into_diagnostic()?;

        let text = self.text("Search text (empty for none)", &current.text_filter, false)?;

        let mut location_items = vec!["All locations".to_string()];
        location_items.extend(locations.iter().cloned());
        let location_idx = match &current.location_filter {
            LocationFilter::All => 0,
            LocationFilter::Only(loc) => locations
                .iter()
                .position(|l| l.to_lowercase() == loc.to_lowercase())
                .map_or(0, |i| i + 1),
        };
        let location = Select::with_theme(&self.theme)
            .with_prompt("Location")
            .items(&location_items)
            .default(location_idx)
            .interact()
            .into_diagnostic()?;

        Ok(QuerySpec {
            sort_column: SortColumn::ALL[column],
            ascending: direction == 0,
            text_filter: text,
            location_filter: if location == 0 {
                LocationFilter::All
            } else {
                LocationFilter::Only(locations[location - 1].clone())
            },
        })
    }

    /// The unsaved-changes prompt shown on quit
    pub fn quit_choice(&self) -> QuitChoice {
        let selection = Select::with_theme(&self.theme)
            .with_prompt("You have unsaved changes")
            .items(&["Save and Quit", "Discard and Quit", "Cancel"])
            .default(0)
            .interact_opt();
        match selection {
            Ok(Some(0)) => QuitChoice::SaveAndQuit,
            Ok(Some(1)) => QuitChoice::DiscardAndQuit,
            _ => QuitChoice::Cancel,
        }
    }
}
