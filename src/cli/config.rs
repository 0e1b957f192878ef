//! Resolution options from a config file plus CLI overrides.

use anyhow::{Context, Result};
use lazyres_resolve::ResolveOptions;
use std::path::Path;
use tracing::debug;

use super::args::ResolveArgs;

/// Read a JSON options file. Missing fields keep their defaults.
pub fn load_options(path: &Path) -> Result<ResolveOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let options: ResolveOptions = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    debug!(config = %path.display(), ?options, "loaded resolve options");
    Ok(options)
}

/// Options for a `resolve` run: the config file if given, then flags.
pub fn resolve_options(args: &ResolveArgs) -> Result<ResolveOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => ResolveOptions::default(),
    };
    if let Some(package) = &args.builtins_package {
        options.builtins_package = package.clone();
    }
    if args.no_builtins {
        options.inject_builtins = false;
    }
    if args.no_data_members {
        options.synthesize_data_members = false;
    }
    if args.no_delegation {
        options.generate_delegated_members = false;
    }
    Ok(options)
}
