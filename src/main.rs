//! route-meta - resolve route metadata from a manifest.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use route_meta::cli::{Cli, Commands, resolve};
use route_meta::config::RouteManifest;
use route_meta::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);
    let manifest = RouteManifest::load(&cli.config)?;
    if manifest.resolve.verbose {
        logger::set_verbose(true);
    }

    match &cli.command {
        Commands::Resolve { args } => resolve::run_resolve(manifest, args),
        Commands::Check => resolve::run_check(&manifest),
    }
}
