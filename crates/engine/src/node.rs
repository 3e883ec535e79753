// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph-placeable units of work

use crate::context::EvalContext;
use crate::open::{ephemeral_resource_open, ephemeral_resource_validate};
use async_trait::async_trait;
use eph_core::{Diagnostics, ModulePath, ResourceConfig, ResourceInstanceAddr};
use std::fmt;
use std::sync::Arc;

/// Which kind of walk a node runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOperation {
    Validate,
    Plan,
    Apply,
}

impl fmt::Display for WalkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkOperation::Validate => f.write_str("validate"),
            WalkOperation::Plan => f.write_str("plan"),
            WalkOperation::Apply => f.write_str("apply"),
        }
    }
}

pub trait GraphNode: Send + Sync {
    fn name(&self) -> String;
}

pub trait GraphNodeModulePath {
    fn module_path(&self) -> ModulePath;
}

#[async_trait]
pub trait GraphNodeExecutable<Ctx: EvalContext + ?Sized>: GraphNode {
    async fn execute(&self, ctx: &Ctx, op: WalkOperation) -> Diagnostics;
}

/// Opens (or, when validating, only validates) one expanded instance
pub struct NodeEphemeralResourceInstance {
    pub addr: ResourceInstanceAddr,
    pub config: Arc<ResourceConfig>,
}

impl GraphNode for NodeEphemeralResourceInstance {
    fn name(&self) -> String {
        self.addr.to_string()
    }
}

impl GraphNodeModulePath for NodeEphemeralResourceInstance {
    fn module_path(&self) -> ModulePath {
        self.addr.module.clone()
    }
}

#[async_trait]
impl<Ctx: EvalContext + ?Sized> GraphNodeExecutable<Ctx> for NodeEphemeralResourceInstance {
    async fn execute(&self, ctx: &Ctx, op: WalkOperation) -> Diagnostics {
        match op {
            WalkOperation::Validate => ephemeral_resource_validate(ctx, &self.addr, &self.config).await,
            WalkOperation::Plan | WalkOperation::Apply => {
                let (_, diags) = ephemeral_resource_open(ctx, &self.addr, &self.config).await;
                diags
            }
        }
    }
}
