//
//  bitbucket-checkout
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_checkout::cli::{Cli, Commands};
use bitbucket_checkout::exit_codes;
use bitbucket_checkout::output::OutputWriter;

fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.global.output_format());

    // Execute command
    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            writer.write_error(&format!("{e:#}"));
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BB_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Uri(cmd) => cmd.run(&cli.global),
        Commands::Plan(cmd) => cmd.run(&cli.global),
        Commands::Version => {
            println!(
                "{} version {}",
                bitbucket_checkout::APP_NAME,
                bitbucket_checkout::VERSION
            );
            Ok(())
        }
    }
}
