// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eph - open, renew and close ephemeral resources from a config file

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{open, validate};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "eph",
    version,
    about = "Ephemeral resources - open, renew and close short-lived provider objects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a configuration file without opening anything
    Validate(validate::ValidateArgs),
    /// Open every ephemeral resource in a configuration file, then close them
    Open(open::OpenArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging();
    let cli = Cli::parse();

    let clean = match cli.command {
        Commands::Validate(args) => validate::validate(args).await?,
        Commands::Open(args) => open::open(args).await?,
    };

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // EPH_LOG wins over RUST_LOG
    let filter = EnvFilter::try_from_env("EPH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
