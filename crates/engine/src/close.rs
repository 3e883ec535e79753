// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Close node for a configured ephemeral resource

use crate::context::EvalContext;
use crate::node::{GraphNode, GraphNodeExecutable, GraphNodeModulePath, WalkOperation};
use async_trait::async_trait;
use eph_core::{ConfigResource, Diagnostics, ModulePath};

/// Closes every open instance of one resource once its consumers are done
///
/// Keyed by the configured resource rather than an instance, since plan
/// graphs work on whole resources while apply graphs work on instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEphemeralResourceClose {
    pub addr: ConfigResource,
}

impl NodeEphemeralResourceClose {
    pub fn new(addr: ConfigResource) -> Self {
        Self { addr }
    }
}

impl GraphNode for NodeEphemeralResourceClose {
    fn name(&self) -> String {
        format!("{} (close)", self.addr)
    }
}

impl GraphNodeModulePath for NodeEphemeralResourceClose {
    fn module_path(&self) -> ModulePath {
        self.addr.module.clone()
    }
}

#[async_trait]
impl<Ctx: EvalContext + ?Sized> GraphNodeExecutable<Ctx> for NodeEphemeralResourceClose {
    async fn execute(&self, ctx: &Ctx, op: WalkOperation) -> Diagnostics {
        tracing::trace!(resource = %self.addr, %op, "closing instances");
        ctx.ephemeral_resources()
            .close_instances(ctx.stop(), &self.addr)
            .await
    }
}
