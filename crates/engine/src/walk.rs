// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal walk over ephemeral resources
//!
//! Opens every instance (bounded by `parallelism`), snapshots the opened
//! values, then closes each resource through its close node and finally
//! anything left behind. Dependency ordering between resources is the
//! scheduler's business and is not modelled here.

use crate::close::NodeEphemeralResourceClose;
use crate::context::{BuiltinEvalContext, EvalContext};
use crate::node::{GraphNode, GraphNodeExecutable, NodeEphemeralResourceInstance, WalkOperation};
use crate::settings::EngineSettings;
use eph_configs::Configuration;
use eph_core::{Clock, Diagnostic, Diagnostics, MarkedValue, ResourceConfig, ResourceInstanceAddr};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// What a walk produced
#[derive(Debug, Default)]
pub struct WalkResult {
    /// Values of every instance that opened, as seen before closing
    pub values: BTreeMap<ResourceInstanceAddr, MarkedValue>,
    pub diagnostics: Diagnostics,
}

pub struct Walk<C: Clock> {
    ctx: Arc<BuiltinEvalContext<C>>,
    resources: Vec<Arc<ResourceConfig>>,
    parallelism: usize,
}

impl<C: Clock> Walk<C> {
    pub fn new(
        mut ctx: BuiltinEvalContext<C>,
        config: &Configuration,
        settings: &EngineSettings,
    ) -> Self {
        for resource in &config.resources {
            ctx.expand(resource);
        }
        Self {
            ctx: Arc::new(ctx),
            resources: config.resources.clone(),
            parallelism: settings.parallelism.max(1),
        }
    }

    pub fn context(&self) -> &BuiltinEvalContext<C> {
        &self.ctx
    }

    pub async fn execute(&self, op: WalkOperation) -> WalkResult {
        let span = tracing::info_span!("walk", %op, resources = self.resources.len());
        self.execute_inner(op).instrument(span).await
    }

    async fn execute_inner(&self, op: WalkOperation) -> WalkResult {
        let start = std::time::Instant::now();

        let instance_nodes = self
            .resources
            .iter()
            .flat_map(|resource| {
                resource.instances().into_iter().map(move |(addr, _)| {
                    Box::new(NodeEphemeralResourceInstance {
                        addr,
                        config: Arc::clone(resource),
                    }) as Box<dyn GraphNodeExecutable<BuiltinEvalContext<C>>>
                })
            })
            .collect();
        let mut diagnostics = self.run_nodes(instance_nodes, op).await;

        let values = self.ctx.ephemeral_resources().values();

        let close_nodes = self
            .resources
            .iter()
            .map(|resource| {
                Box::new(NodeEphemeralResourceClose::new(resource.addr.clone()))
                    as Box<dyn GraphNodeExecutable<BuiltinEvalContext<C>>>
            })
            .collect();
        diagnostics.append(self.run_nodes(close_nodes, op).await);
        diagnostics.append(
            self.ctx
                .ephemeral_resources()
                .close_all(self.ctx.stop())
                .await,
        );

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            opened = values.len(),
            errors = diagnostics.errors().count(),
            "walk complete"
        );
        WalkResult {
            values,
            diagnostics,
        }
    }

    /// Run nodes concurrently, at most `parallelism` at a time
    ///
    /// Diagnostics come back ordered by node name.
    async fn run_nodes(
        &self,
        nodes: Vec<Box<dyn GraphNodeExecutable<BuiltinEvalContext<C>>>>,
        op: WalkOperation,
    ) -> Diagnostics {
        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut tasks = JoinSet::new();
        for node in nodes {
            let ctx = Arc::clone(&self.ctx);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let name = node.name();
                let diags = match semaphore.acquire_owned().await {
                    Ok(_permit) => node.execute(&*ctx, op).await,
                    Err(e) => Diagnostic::error("Walk aborted", e.to_string()).into(),
                };
                (name, diags)
            });
        }

        let mut results = Vec::new();
        let mut diagnostics = Diagnostics::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => diagnostics.push(Diagnostic::error("Graph node failed", e.to_string())),
            }
        }
        results.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, diags) in results {
            diagnostics.append(diags);
        }
        diagnostics
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
