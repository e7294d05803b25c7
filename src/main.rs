//! Spriteforge - an SVG sprite generator with incremental rebuilds.

#![allow(dead_code)]

mod cli;
mod config;
mod logger;
mod sprite;
mod svg;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let mut config = ProjectConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Build { output } => {
            if let Some(output) = output {
                config.build.output = if output.is_relative() {
                    config.root.join(output)
                } else {
                    output.clone()
                };
            }
            cli::build::run(&config)
        }
        Commands::Serve {
            interface,
            port,
            watch,
        } => {
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
            if let Some(watch) = watch {
                config.serve.watch = *watch;
            }
            cli::serve::run(config)
        }
    }
}
