//! `inv add` command - add an item

use console::style;
use miette::Result;

use crate::cli::commands::utils::resolve_location;
use crate::cli::helpers::{load_config, open_session_for_update, report_success};
use crate::cli::wizard::{ItemWizard, LocationChoice};
use crate::cli::GlobalOpts;
use crate::entities::ItemDraft;

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Inventory number shared by the components of one asset
    #[arg(long = "inventory-number", short = 'N')]
    pub inventory_number: Option<String>,

    /// Component name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Number of pieces
    #[arg(long, short = 'Q', default_value_t = 0, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Storage location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Add the location if it does not exist yet
    #[arg(long)]
    pub create_location: bool,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut session = open_session_for_update(&config)?;

    let draft = if args.interactive {
        let wizard = ItemWizard::new();
        let (draft, location) = wizard.draft(session.store().locations())?;
        if let LocationChoice::New(name) = &location {
            if !wizard.confirm(&format!("Location '{}' does not exist. Add it?", name), true)? {
                return Err(miette::miette!("item not added: unknown location '{}'", name));
            }
            session.store_mut().add_location(name)?;
        }
        draft
    } else {
        let number = args
            .inventory_number
            .ok_or_else(|| miette::miette!("--inventory-number is required (or use -i)"))?;
        let name = args
            .name
            .ok_or_else(|| miette::miette!("--name is required (or use -i)"))?;
        let location = resolve_location(
            &mut session,
            args.location.as_deref().unwrap_or_default(),
            args.create_location,
        )?;
        ItemDraft::new(number, name)
            .with_description(args.description.unwrap_or_default())
            .with_quantity(args.quantity)
            .with_location(location)
    };

    let id = session.store_mut().add_item(draft)?;
    session.save()?;

    if let Some(item) = session.store().get(id) {
        report_success(
            global,
            format!("Added item {} {}", style(id).cyan(), style(item).dim()),
        );
    }
    Ok(())
}
