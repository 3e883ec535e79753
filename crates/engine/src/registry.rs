// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of open ephemeral resource instances
//!
//! Each open instance sits behind its own async mutex, which serializes its
//! renewals against each other and against close. The map itself is only
//! locked for inserts and removals. Instances are removed from the map
//! before they are closed, so no instance can be closed twice.

use crate::error::RegistryError;
use crate::instance::ResourceInstance;
use eph_adapters::EphemeralRenew;
use eph_core::{
    Clock, ConfigBody, ConfigResource, Diagnostic, Diagnostics, MarkedValue, ResourceInstanceAddr,
    SystemClock,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// What a successful open hands to the registry
pub struct Registration {
    pub value: MarkedValue,
    /// For attributing close and renew diagnostics
    pub config_body: Arc<ConfigBody>,
    pub instance: Arc<dyn ResourceInstance>,
    /// First renewal, when the provider asked for one
    pub renew: Option<EphemeralRenew>,
}

struct InstanceState {
    instance: Arc<dyn ResourceInstance>,
    renew_diags: Diagnostics,
    closed: bool,
}

struct Renewal {
    /// Stops the task between renewals; an in-flight renewal only yields to stop
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct ActiveInstance {
    value: MarkedValue,
    config_body: Arc<ConfigBody>,
    state: Arc<tokio::sync::Mutex<InstanceState>>,
    renewal: Option<Renewal>,
}

type ActiveMap = BTreeMap<ConfigResource, BTreeMap<ResourceInstanceAddr, ActiveInstance>>;

/// Concurrency-safe store of open instances
pub struct Resources<C: Clock = SystemClock> {
    clock: C,
    renew_early: Duration,
    active: Mutex<ActiveMap>,
}

impl<C: Clock> Resources<C> {
    pub fn new(clock: C, renew_early: Duration) -> Self {
        Self {
            clock,
            renew_early,
            active: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ActiveMap> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a newly opened instance and start its renewals
    ///
    /// Must be called from within a tokio runtime when a renewal is due.
    pub fn register_instance(
        &self,
        stop: &CancellationToken,
        addr: ResourceInstanceAddr,
        registration: Registration,
    ) -> Result<(), RegistryError> {
        let mut active = self.lock();
        let instances = active.entry(addr.containing_resource()).or_default();
        if instances.contains_key(&addr) {
            return Err(RegistryError::AlreadyOpen(addr.to_string()));
        }

        let state = Arc::new(tokio::sync::Mutex::new(InstanceState {
            instance: registration.instance,
            renew_diags: Diagnostics::new(),
            closed: false,
        }));
        let renewal = registration.renew.map(|first| {
            let cancel = stop.child_token();
            let task = tokio::spawn(renew_loop(
                self.clock.clone(),
                self.renew_early,
                addr.clone(),
                Arc::clone(&state),
                first,
                cancel.clone(),
                stop.clone(),
            ));
            Renewal { cancel, task }
        });

        tracing::debug!(%addr, renews = renewal.is_some(), "registered");
        instances.insert(
            addr,
            ActiveInstance {
                value: registration.value,
                config_body: registration.config_body,
                state,
                renewal,
            },
        );
        Ok(())
    }

    /// The registered value of an open instance
    pub fn instance_value(&self, addr: &ResourceInstanceAddr) -> Option<MarkedValue> {
        self.lock()
            .get(&addr.containing_resource())
            .and_then(|instances| instances.get(addr))
            .map(|active| active.value.clone())
    }

    pub fn is_open(&self, addr: &ResourceInstanceAddr) -> bool {
        self.lock()
            .get(&addr.containing_resource())
            .is_some_and(|instances| instances.contains_key(addr))
    }

    /// Number of open instances
    pub fn len(&self) -> usize {
        self.lock().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every open instance's value
    pub fn values(&self) -> BTreeMap<ResourceInstanceAddr, MarkedValue> {
        self.lock()
            .values()
            .flat_map(|instances| instances.iter())
            .map(|(addr, active)| (addr.clone(), active.value.clone()))
            .collect()
    }

    /// Close every open instance of one configured resource
    pub async fn close_instances(
        &self,
        stop: &CancellationToken,
        resource: &ConfigResource,
    ) -> Diagnostics {
        let removed = self.lock().remove(resource).unwrap_or_default();
        if stop.is_cancelled() {
            tracing::debug!(%resource, "closing after stop");
        }
        close_removed(stop, removed.into_iter().collect()).await
    }

    /// Close everything still open; the end-of-walk and shutdown path
    pub async fn close_all(&self, stop: &CancellationToken) -> Diagnostics {
        let removed: Vec<_> = std::mem::take(&mut *self.lock())
            .into_values()
            .flatten()
            .collect();
        if !removed.is_empty() {
            tracing::debug!(
                count = removed.len(),
                stopped = stop.is_cancelled(),
                "closing remaining instances"
            );
        }
        close_removed(stop, removed).await
    }
}

impl<C: Clock> Drop for Resources<C> {
    fn drop(&mut self) {
        let open = self.lock().values().map(BTreeMap::len).sum::<usize>();
        if open > 0 {
            tracing::warn!(open, "registry dropped with instances still open");
        }
    }
}

/// Close removed instances concurrently
///
/// Close is never abandoned, even after stop.
async fn close_removed(
    stop: &CancellationToken,
    removed: Vec<(ResourceInstanceAddr, ActiveInstance)>,
) -> Diagnostics {
    let mut tasks = JoinSet::new();
    for (addr, active) in removed {
        let stop = stop.clone();
        tasks.spawn(async move {
            let diags = close_one(&stop, &addr, active).await;
            (addr, diags)
        });
    }

    let mut results = Vec::new();
    let mut diags = Diagnostics::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => diags.push(Diagnostic::error("Close task failed", e.to_string())),
        }
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, close_diags) in results {
        diags.append(close_diags);
    }
    diags
}

async fn close_one(
    stop: &CancellationToken,
    addr: &ResourceInstanceAddr,
    active: ActiveInstance,
) -> Diagnostics {
    if let Some(renewal) = &active.renewal {
        renewal.cancel.cancel();
    }

    // waits for any in-flight renewal
    let mut state = active.state.lock().await;
    state.closed = true;
    let mut diags = std::mem::take(&mut state.renew_diags);
    diags.append(state.instance.close(stop).await);
    drop(state);

    if let Some(renewal) = active.renewal {
        renewal.task.abort();
    }
    tracing::debug!(%addr, errors = diags.errors().count(), "closed");
    diags.in_config_body(&active.config_body, &addr.to_string())
}

async fn renew_loop<C: Clock>(
    clock: C,
    renew_early: Duration,
    addr: ResourceInstanceAddr,
    state: Arc<tokio::sync::Mutex<InstanceState>>,
    mut next: EphemeralRenew,
    cancel: CancellationToken,
    stop: CancellationToken,
) {
    loop {
        let due = next
            .renew_at
            .checked_sub(renew_early)
            .unwrap_or(next.renew_at);
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(clock.until(due)) => {}
        }

        let mut guard = state.lock().await;
        if guard.closed || cancel.is_cancelled() {
            return;
        }
        let instance = Arc::clone(&guard.instance);
        let (renewed, diags) = instance.renew(&stop, next).await;
        if renewed.is_none() && stop.is_cancelled() {
            tracing::debug!(%addr, "renewal abandoned on stop");
        }
        if !diags.is_empty() {
            tracing::warn!(%addr, count = diags.len(), "renewal reported diagnostics");
            guard.renew_diags.append(diags);
        }
        drop(guard);

        match renewed {
            Some(renew) => next = renew,
            None => {
                tracing::debug!(%addr, "no further renewal");
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
