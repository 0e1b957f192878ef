use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the lazyres binary.
#[derive(Parser, Debug)]
#[command(
    name = "lazyres",
    version,
    about = "Lazy descriptor resolution over JSON project fixtures"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Force-resolve every declaration of a project and print the result.
    Resolve(ResolveArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Project fixture (JSON).
    pub project: PathBuf,

    /// Resolution options file (JSON). Flags below override it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Resolve top-level classes on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Also print the builtins package.
    #[arg(long = "include-builtins")]
    pub include_builtins: bool,

    /// Package holding the root class and primitives.
    #[arg(long = "builtins-package")]
    pub builtins_package: Option<String>,

    /// Do not add the builtin prelude to the project.
    #[arg(long = "no-builtins")]
    pub no_builtins: bool,

    /// Do not synthesize `componentN`/`copy` for data classes.
    #[arg(long = "no-data-members")]
    pub no_data_members: bool,

    /// Do not generate members for `by` delegation.
    #[arg(long = "no-delegation")]
    pub no_delegation: bool,

    /// Force colored output even when stdout is not a terminal.
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
