// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Ephemeral resource lifecycle engine

mod close;
mod context;
mod error;
mod instance;
mod node;
mod open;
mod registry;
mod settings;
mod walk;

pub use close::NodeEphemeralResourceClose;
pub use context::{BuiltinEvalContext, EvalContext, ProviderBinding};
pub use error::{EngineError, RegistryError, SettingsError};
pub use instance::{ProviderInstance, ResourceInstance};
pub use node::{
    GraphNode, GraphNodeExecutable, GraphNodeModulePath, NodeEphemeralResourceInstance,
    WalkOperation,
};
pub use open::{ephemeral_resource_open, ephemeral_resource_validate};
pub use registry::{Registration, Resources};
pub use settings::EngineSettings;
pub use walk::{Walk, WalkResult};
