// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Evaluation context handed to graph nodes

use crate::error::EngineError;
use crate::registry::Resources;
use eph_adapters::Provider;
use eph_core::{
    CheckKind, CheckRule, Clock, ConfigBody, Diagnostics, MarkedValue, ProviderConfigAddr,
    ProviderSchema, RepetitionData, ResourceConfig, ResourceInstanceAddr, Schema, SystemClock,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A configured provider and the schema it reported
#[derive(Clone)]
pub struct ProviderBinding {
    pub provider: Arc<dyn Provider>,
    pub schema: ProviderSchema,
}

impl ProviderBinding {
    /// Fetch the provider's schema and bind it
    pub async fn resolve(provider: Arc<dyn Provider>) -> Result<Self, EngineError> {
        let schema = provider.get_schema().await?;
        Ok(Self { provider, schema })
    }
}

/// Everything a node needs from the walk it runs in
pub trait EvalContext: Send + Sync {
    type Clock: Clock;

    fn provider(&self, addr: &ProviderConfigAddr) -> Option<&ProviderBinding>;

    /// `count.index` / `each.*` data for an expanded instance
    fn instance_data(&self, addr: &ResourceInstanceAddr) -> RepetitionData;

    fn evaluate_check_rules(
        &self,
        kind: CheckKind,
        rules: &[CheckRule],
        data: &RepetitionData,
    ) -> Diagnostics;

    fn evaluate_block(
        &self,
        body: &ConfigBody,
        schema: &Schema,
        data: &RepetitionData,
    ) -> (MarkedValue, Diagnostics);

    fn ephemeral_resources(&self) -> &Resources<Self::Clock>;

    /// Fires when the walk is asked to stop
    fn stop(&self) -> &CancellationToken;
}

/// The context used by real walks
pub struct BuiltinEvalContext<C: Clock = SystemClock> {
    providers: HashMap<ProviderConfigAddr, ProviderBinding>,
    instances: HashMap<ResourceInstanceAddr, RepetitionData>,
    resources: Resources<C>,
    stop: CancellationToken,
}

impl<C: Clock> BuiltinEvalContext<C> {
    pub fn new(resources: Resources<C>, stop: CancellationToken) -> Self {
        Self {
            providers: HashMap::new(),
            instances: HashMap::new(),
            resources,
            stop,
        }
    }

    pub fn with_provider(mut self, addr: ProviderConfigAddr, binding: ProviderBinding) -> Self {
        self.providers.insert(addr, binding);
        self
    }

    /// Record the instances a resource expands into
    pub fn expand(&mut self, resource: &ResourceConfig) -> Vec<ResourceInstanceAddr> {
        resource
            .instances()
            .into_iter()
            .map(|(addr, data)| {
                self.instances.insert(addr.clone(), data);
                addr
            })
            .collect()
    }
}

impl<C: Clock> EvalContext for BuiltinEvalContext<C> {
    type Clock = C;

    fn provider(&self, addr: &ProviderConfigAddr) -> Option<&ProviderBinding> {
        self.providers.get(addr)
    }

    fn instance_data(&self, addr: &ResourceInstanceAddr) -> RepetitionData {
        self.instances.get(addr).cloned().unwrap_or_default()
    }

    fn evaluate_check_rules(
        &self,
        kind: CheckKind,
        rules: &[CheckRule],
        data: &RepetitionData,
    ) -> Diagnostics {
        eph_configs::evaluate_check_rules(kind, rules, data)
    }

    fn evaluate_block(
        &self,
        body: &ConfigBody,
        schema: &Schema,
        data: &RepetitionData,
    ) -> (MarkedValue, Diagnostics) {
        eph_configs::evaluate_body(body, schema, data)
    }

    fn ephemeral_resources(&self) -> &Resources<C> {
        &self.resources
    }

    fn stop(&self) -> &CancellationToken {
        &self.stop
    }
}
