// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instance bridge from the registry to the provider

use async_trait::async_trait;
use eph_adapters::{
    normalize_renew_at, CloseEphemeralResourceRequest, EphemeralRenew, Provider,
    RenewEphemeralResourceRequest,
};
use eph_core::{Diagnostic, Diagnostics, ResourceInstanceAddr};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// The close and renew half of an open ephemeral resource instance
///
/// The registry serializes calls per instance; implementations may assume
/// they are never invoked concurrently for the same instance.
#[async_trait]
pub trait ResourceInstance: Send + Sync {
    /// Release the instance, returning the provider's diagnostics unchanged
    ///
    /// Close runs to completion even once `stop` has fired.
    async fn close(&self, stop: &CancellationToken) -> Diagnostics;

    /// Renew with the caller's latest private blob
    ///
    /// Returns `None` when the provider wants no further renewal, when the
    /// renewal failed, or when `stop` fired first.
    async fn renew(
        &self,
        stop: &CancellationToken,
        req: EphemeralRenew,
    ) -> (Option<EphemeralRenew>, Diagnostics);
}

/// [`ResourceInstance`] backed by a provider binding
pub struct ProviderInstance {
    provider: Arc<dyn Provider>,
    addr: ResourceInstanceAddr,
    private: Mutex<Vec<u8>>,
}

impl ProviderInstance {
    pub fn new(provider: Arc<dyn Provider>, addr: ResourceInstanceAddr, private: Vec<u8>) -> Self {
        Self {
            provider,
            addr,
            private: Mutex::new(private),
        }
    }

    pub fn addr(&self) -> &ResourceInstanceAddr {
        &self.addr
    }

    /// The private blob close will send
    pub fn private(&self) -> Vec<u8> {
        self.private.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ResourceInstance for ProviderInstance {
    async fn close(&self, stop: &CancellationToken) -> Diagnostics {
        tracing::trace!(addr = %self.addr, stopped = stop.is_cancelled(), "closing");
        let resp = self
            .provider
            .close_ephemeral_resource(CloseEphemeralResourceRequest {
                type_name: self.addr.type_name().to_string(),
                private: self.private(),
            })
            .await;
        resp.diagnostics
    }

    async fn renew(
        &self,
        stop: &CancellationToken,
        req: EphemeralRenew,
    ) -> (Option<EphemeralRenew>, Diagnostics) {
        tracing::trace!(addr = %self.addr, "renewing");
        let call = self
            .provider
            .renew_ephemeral_resource(RenewEphemeralResourceRequest {
                type_name: self.addr.type_name().to_string(),
                private: req.private,
            });
        let resp = tokio::select! {
            resp = call => resp,
            _ = stop.cancelled() => {
                let cancelled = Diagnostic::error(
                    "Operation cancelled",
                    format!("Renewal of {} was interrupted before the provider responded.", self.addr),
                )
                .with_address(self.addr.to_string());
                return (None, cancelled.into());
            }
        };

        // a failed renewal is not rescheduled and leaves the cached blob alone
        if resp.diagnostics.has_errors() {
            return (None, resp.diagnostics);
        }
        let next = normalize_renew_at(resp.renew_at).map(|renew_at| EphemeralRenew {
            renew_at,
            private: resp.private,
        });
        if let Some(next) = &next {
            *self.private.lock().unwrap_or_else(|e| e.into_inner()) = next.private.clone();
        }
        (next, resp.diagnostics)
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
