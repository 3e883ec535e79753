// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `eph validate <file>` - Check configuration against provider schemas

use crate::output;
use anyhow::Result;
use clap::Args;
use eph_core::SystemClock;
use eph_engine::{EngineSettings, Resources, Walk, WalkOperation};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration file (TOML)
    pub file: PathBuf,
}

/// Returns false when validation produced errors
pub async fn validate(args: ValidateArgs) -> Result<bool> {
    let config = super::load(&args.file)?;
    let stop = CancellationToken::new();
    super::cancel_on_interrupt(&stop);

    let ctx = super::demo_context(&config, Resources::new(SystemClock, Duration::ZERO), stop).await?;
    let walk = Walk::new(ctx, &config, &EngineSettings::default());
    let result = walk.execute(WalkOperation::Validate).await;

    output::print_diagnostics(&result.diagnostics);
    if result.diagnostics.has_errors() {
        return Ok(false);
    }
    println!(
        "Configuration is valid ({} ephemeral resource{}).",
        config.resources.len(),
        if config.resources.len() == 1 { "" } else { "s" }
    );
    Ok(true)
}
