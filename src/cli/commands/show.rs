//! `inv show` command - one item's details

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::render_detail;
use crate::cli::helpers::{load_config, open_session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::InventoryError;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Item id
    pub id: u32,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);
    let item = session
        .store()
        .get(args.id)
        .ok_or(InventoryError::NotFound(args.id))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", item.id),
        _ => {
            println!("{}", render_detail(item));
            let siblings = session
                .store()
                .items()
                .iter()
                .filter(|i| i.id != item.id && i.inventory_number == item.inventory_number)
                .count();
            if siblings > 0 && !global.quiet {
                println!(
                    "{} {} other component(s) share inventory number {}",
                    style("→").blue(),
                    siblings,
                    style(&item.inventory_number).yellow()
                );
            }
        }
    }

    Ok(())
}
