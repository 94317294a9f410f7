//! `inv labels` command - printable label sheets

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, open_session, report_success};
use crate::cli::GlobalOpts;
use crate::core::labels::render_sheet;
use crate::core::LabelSelection;

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Only items at this location
    #[arg(long, short = 'l', conflicts_with = "pattern")]
    pub location: Option<String>,

    /// Only items whose inventory number contains this text
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Write the sheet to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl LabelsArgs {
    fn selection(&self) -> LabelSelection {
        match (&self.location, &self.pattern) {
            (Some(loc), _) => LabelSelection::Location(loc.clone()),
            (None, Some(p)) => LabelSelection::Pattern(p.clone()),
            (None, None) => LabelSelection::All,
        }
    }
}

pub fn run(args: LabelsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);

    let selection = args.selection();
    let items = selection.select(session.store().items());
    if items.is_empty() {
        if !global.quiet {
            println!("No items to label for {}.", selection);
        }
        return Ok(());
    }

    let sheet = render_sheet(&selection.title(), &items);
    match &args.output {
        Some(path) => {
            fs::write(path, &sheet).into_diagnostic()?;
            report_success(
                global,
                format!(
                    "Wrote {} label(s) to {}",
                    style(items.len()).cyan(),
                    style(path.display()).yellow()
                ),
            );
        }
        None => print!("{}", sheet),
    }
    Ok(())
}
