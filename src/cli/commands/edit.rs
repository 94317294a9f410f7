//! `inv edit` command - change fields of an existing item

use console::style;
use miette::Result;

use crate::cli::commands::utils::resolve_location;
use crate::cli::helpers::{load_config, open_session_for_update, report_success};
use crate::cli::wizard::{ItemWizard, LocationChoice};
use crate::cli::GlobalOpts;
use crate::core::{InventoryError, UpdateOutcome};
use crate::entities::ItemUpdate;

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Item id
    pub id: u32,

    /// New inventory number
    #[arg(long = "inventory-number", short = 'N')]
    pub inventory_number: Option<String>,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New quantity
    #[arg(long, short = 'Q', allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// New location (empty string clears it)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Add the location if it does not exist yet
    #[arg(long)]
    pub create_location: bool,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut session = open_session_for_update(&config)?;

    let item = session
        .store()
        .get(args.id)
        .cloned()
        .ok_or(InventoryError::NotFound(args.id))?;

    let update = if args.interactive {
        let wizard = ItemWizard::new();
        let (update, location) = wizard.update(&item, session.store().locations())?;
        if let LocationChoice::New(name) = &location {
            if !wizard.confirm(&format!("Location '{}' does not exist. Add it?", name), true)? {
                return Err(miette::miette!("item not changed: unknown location '{}'", name));
            }
            session.store_mut().add_location(name)?;
        }
        update
    } else {
        let location = match args.location.as_deref() {
            Some(loc) => Some(resolve_location(&mut session, loc, args.create_location)?),
            None => None,
        };
        let update = ItemUpdate {
            inventory_number: args.inventory_number,
            name: args.name,
            description: args.description,
            quantity: args.quantity,
            location,
        };
        if update.is_empty() {
            return Err(miette::miette!(
                "nothing to change: pass at least one field flag, or use -i"
            ));
        }
        update
    };

    match session.store_mut().update_item(args.id, &update)? {
        UpdateOutcome::Changed => {
            session.save()?;
            report_success(global, format!("Updated item {}", style(args.id).cyan()));
        }
        UpdateOutcome::Unchanged => {
            if session.has_unsaved_changes() {
                // a location was added along the way
                session.save()?;
            }
            if !global.quiet {
                println!("No changes to item {}", style(args.id).cyan());
            }
        }
    }
    Ok(())
}
