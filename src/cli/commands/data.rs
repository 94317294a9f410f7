//! `inv import` / `inv export` commands - CSV interchange

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, open_session, open_session_for_update, report_success};
use crate::cli::GlobalOpts;
use crate::core::interchange::{self, RowError};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file with InventoryNumber and Name columns
    pub file: PathBuf,

    /// Skip invalid rows instead of aborting
    #[arg(long)]
    pub skip_errors: bool,

    /// Validate the file without changing the inventory
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Destination CSV file (replaced if it exists)
    pub file: PathBuf,
}

pub fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    if args.dry_run {
        let parsed = interchange::import_file(&args.file, args.skip_errors)?;
        let invalid: Vec<(usize, String)> = parsed
            .drafts
            .iter()
            .enumerate()
            .filter_map(|(idx, d)| d.validate().err().map(|e| (idx + 1, e.to_string())))
            .collect();

        print_rejected(&parsed.rejected);
        for (entry, message) in &invalid {
            eprintln!("{} Entry {}: {}", style("✗").red(), entry, message);
        }
        print_summary(
            parsed.rows_processed,
            parsed.drafts.len() - invalid.len(),
            parsed.locations.len(),
            parsed.rejected.len() + invalid.len(),
        );
        println!();
        println!(
            "{}",
            style("Dry run complete. The inventory was not changed.").yellow()
        );
        return Ok(());
    }

    let mut session = open_session_for_update(&config)?;
    let report = session.import_csv(&args.file, args.skip_errors)?;
    session.save()?;

    print_rejected(&report.rejected);
    if !global.quiet {
        print_summary(
            report.rows_processed,
            report.imported,
            report.new_locations.len(),
            report.rejected.len(),
        );
        for location in &report.new_locations {
            println!("  {} new location {}", style("+").green(), style(location).yellow());
        }
    }
    Ok(())
}

pub fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);
    let count = session.export_csv(&args.file)?;
    report_success(
        global,
        format!(
            "Exported {} item(s) to {}",
            style(count).cyan(),
            style(args.file.display()).yellow()
        ),
    );
    Ok(())
}

fn print_rejected(rejected: &[RowError]) {
    for err in rejected {
        eprintln!("{} Row {}: {}", style("✗").red(), err.row, err.message);
    }
}

fn print_summary(rows: usize, imported: usize, locations: usize, errors: usize) {
    println!();
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:   {}", style(rows).cyan());
    println!("  Items imported:   {}", style(imported).green());
    if locations > 0 {
        println!("  New locations:    {}", style(locations).yellow());
    }
    if errors > 0 {
        println!("  Errors:           {}", style(errors).red());
    }
}
