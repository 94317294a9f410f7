//! `inv location` command - manage the location set

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_config, open_session, open_session_for_update, report_success};
use crate::cli::wizard::ItemWizard;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::RemoveOutcome;

#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    /// List known locations with their item counts
    List,

    /// Add a location
    Add {
        /// Location name
        name: String,
    },

    /// Remove a location (items keep their location text)
    Remove {
        /// Location name (case-insensitive)
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub fn run(cmd: LocationCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LocationCommands::List => run_list(global),
        LocationCommands::Add { name } => run_add(&name, global),
        LocationCommands::Remove { name, yes } => run_remove(&name, yes, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);
    let store = session.store();

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(store.locations()).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id | OutputFormat::Csv => {
            for location in store.locations() {
                println!("{}", location);
            }
        }
        _ => {
            if store.locations().is_empty() {
                if !global.quiet {
                    println!("No locations defined.");
                }
                return Ok(());
            }
            for location in store.locations() {
                println!("{}\t{}", location, store.items_at_location(location));
            }
            if !global.quiet {
                println!();
                println!("{} location(s)", style(store.locations().len()).cyan());
            }
        }
    }
    Ok(())
}

fn run_add(name: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut session = open_session_for_update(&config)?;
    session.store_mut().add_location(name)?;
    session.save()?;
    report_success(global, format!("Added location {}", style(name.trim()).yellow()));
    Ok(())
}

fn run_remove(name: &str, yes: bool, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut session = open_session_for_update(&config)?;

    let Some(stored) = session.store().find_location(name).map(str::to_string) else {
        return Err(miette::miette!("location '{}' does not exist", name.trim()));
    };

    let in_use = session.store().items_at_location(&stored);
    if in_use > 0 {
        eprintln!(
            "{} {} item(s) are stored at '{}' and will keep that location text",
            style("!").yellow(),
            in_use,
            stored
        );
    }

    if !yes && !ItemWizard::new().confirm(&format!("Remove location '{}'?", stored), false)? {
        println!("Cancelled.");
        return Ok(());
    }

    if let RemoveOutcome::Removed(removed) = session.store_mut().remove_location(&stored) {
        session.save()?;
        report_success(global, format!("Removed location {}", style(removed).yellow()));
    }
    Ok(())
}
