// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `eph open <file>` - Open, print and close every ephemeral resource

use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use eph_core::SystemClock;
use eph_engine::{EngineSettings, Resources, Walk, WalkOperation};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Args)]
pub struct OpenArgs {
    /// Configuration file (TOML)
    pub file: PathBuf,

    /// Engine settings file (TOML)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print sensitive and ephemeral values instead of redacting them
    #[arg(long)]
    pub show_values: bool,

    /// Write a run record of the opened instances to this file
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,
}

/// Returns false when any instance failed to open or close cleanly
pub async fn open(args: OpenArgs) -> Result<bool> {
    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("cannot load settings {}", path.display()))?,
        None => EngineSettings::default(),
    };
    let config = super::load(&args.file)?;
    let stop = CancellationToken::new();
    super::cancel_on_interrupt(&stop);

    let resources = Resources::new(SystemClock, settings.renew_early);
    let ctx = super::demo_context(&config, resources, stop).await?;
    let walk = Walk::new(ctx, &config, &settings);
    let result = walk.execute(WalkOperation::Apply).await;

    for (addr, value) in &result.values {
        println!("{} = {}", addr, output::render(value, args.show_values));
    }
    if let Some(path) = &args.record {
        std::fs::write(path, output::render_record(&result.values))
            .with_context(|| format!("cannot write run record {}", path.display()))?;
    }
    output::print_diagnostics(&result.diagnostics);
    Ok(!result.diagnostics.has_errors())
}
