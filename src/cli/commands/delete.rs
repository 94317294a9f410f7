//! `inv delete` command - remove an item

use console::style;
use miette::Result;

use crate::cli::helpers::{load_config, open_session_for_update, report_success};
use crate::cli::wizard::ItemWizard;
use crate::cli::GlobalOpts;
use crate::core::{InventoryError, RemoveOutcome};

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Item id
    pub id: u32,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut session = open_session_for_update(&config)?;

    let item = session
        .store()
        .get(args.id)
        .ok_or(InventoryError::NotFound(args.id))?;

    if !args.yes {
        let prompt = format!("Delete {}?", item);
        if !ItemWizard::new().confirm(&prompt, false)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match session.store_mut().delete_item(args.id) {
        RemoveOutcome::Removed(removed) => {
            session.save()?;
            report_success(
                global,
                format!("Deleted item {} ({})", style(removed.id).cyan(), removed.name),
            );
            Ok(())
        }
        RemoveOutcome::NotFound => Err(InventoryError::NotFound(args.id).into()),
    }
}
