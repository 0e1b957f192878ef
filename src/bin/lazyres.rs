use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use lazyres::cli::args::{CliArgs, Command, OutputFormat, ResolveArgs};
use lazyres::cli::driver::{self, DriverOptions};
use lazyres::cli::{config, reporter::Reporter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if LAZYRES_LOG or RUST_LOG is set.
    lazyres::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let status = match args.command {
        Command::Resolve(resolve) => run_resolve(&resolve)?,
    };
    std::process::exit(status);
}

fn run_resolve(args: &ResolveArgs) -> Result<i32> {
    let options = DriverOptions {
        resolve: config::resolve_options(args)?,
        parallel: args.parallel,
        include_builtins: args.include_builtins,
    };
    let report = driver::resolve_file(&args.project, &options)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let color = !args.no_color && (args.color || std::io::stdout().is_terminal());
            print!("{}", Reporter::new(color).render(&report));
        }
    }

    Ok(if report.has_errors() {
        EXIT_DIAGNOSTICS_REPORTED
    } else {
        EXIT_SUCCESS
    })
}
