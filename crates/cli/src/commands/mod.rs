// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod open;
pub mod validate;

use anyhow::{Context, Result};
use eph_adapters::{DemoProvider, TracedProvider};
use eph_configs::Configuration;
use eph_core::{Clock, ProviderConfigAddr};
use eph_engine::{BuiltinEvalContext, ProviderBinding, Resources};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The only provider the CLI knows
const DEMO: &str = "demo";

fn load(path: &Path) -> Result<Configuration> {
    eph_configs::load_configuration(path)
        .with_context(|| format!("cannot load configuration {}", path.display()))
}

/// Build a context with the demo provider bound under every configuration
/// the file refers to (`demo` and any `demo.<alias>`)
async fn demo_context<C: Clock>(
    config: &Configuration,
    resources: Resources<C>,
    stop: CancellationToken,
) -> Result<BuiltinEvalContext<C>> {
    let binding = ProviderBinding::resolve(Arc::new(TracedProvider::new(
        DEMO,
        DemoProvider::new(),
    )))
    .await?;

    let mut ctx = BuiltinEvalContext::new(resources, stop)
        .with_provider(ProviderConfigAddr::new(DEMO), binding.clone());
    for resource in &config.resources {
        if resource.provider.local_name == DEMO {
            ctx = ctx.with_provider(resource.provider.clone(), binding.clone());
        }
    }
    Ok(ctx)
}

/// Cancel `stop` on Ctrl-C
fn cancel_on_interrupt(stop: &CancellationToken) {
    let stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping");
            stop.cancel();
        }
    });
}
