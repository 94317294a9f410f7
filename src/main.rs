use clap::Parser;
use miette::Result;
use inventory::cli::logging::{init_logging, LogConfig};
use inventory::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(
        &LogConfig::from_verbosity(global.verbose, global.quiet)
            .with_ansi(console::colors_enabled_stderr()),
    );

    match cli.command {
        Commands::List(args) => inventory::cli::commands::list::run(args, &global),
        Commands::Show(args) => inventory::cli::commands::show::run(args, &global),
        Commands::Add(args) => inventory::cli::commands::add::run(args, &global),
        Commands::Edit(args) => inventory::cli::commands::edit::run(args, &global),
        Commands::Delete(args) => inventory::cli::commands::delete::run(args, &global),
        Commands::Find(cmd) => inventory::cli::commands::find::run(cmd, &global),
        Commands::Location(cmd) => inventory::cli::commands::location::run(cmd, &global),
        Commands::Import(args) => inventory::cli::commands::data::run_import(args, &global),
        Commands::Export(args) => inventory::cli::commands::data::run_export(args, &global),
        Commands::Labels(args) => inventory::cli::commands::labels::run(args, &global),
        Commands::Shell(args) => inventory::cli::commands::shell::run(args, &global),
        Commands::Config(cmd) => inventory::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => inventory::cli::commands::completions::run(args),
    }
}
