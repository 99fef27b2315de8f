use anyhow::Result;
use clap::Parser;

use pygraph::cli::commands;
use pygraph::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Summary => commands::run_summary(&cli.store, &cli.format)?,

        Commands::Packages => commands::run_packages(&cli.store, &cli.format)?,

        Commands::Tree { ref node } => commands::run_tree(&cli.store, node, &cli.format)?,

        Commands::Resolve {
            ref package,
            ref path,
            ref version,
            from_file,
        } => commands::run_resolve(
            &cli.store,
            package,
            version.as_deref(),
            path,
            from_file,
            &cli.format,
        )?,

        Commands::Class { ref node, ref name } => {
            commands::run_class(&cli.store, node, name, &cli.format)?
        }

        Commands::Function { ref node, ref name } => {
            commands::run_function(&cli.store, node, name, &cli.format)?
        }

        Commands::Method {
            ref node,
            ref class,
            ref name,
        } => commands::run_method(&cli.store, node, class, name, &cli.format)?,

        Commands::Symbols { ref node } => commands::run_symbols(&cli.store, node, &cli.format)?,
    };

    println!("{}", output);
    Ok(())
}
