// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced provider wrapper for consistent observability

use crate::provider::{
    CloseEphemeralResourceRequest, CloseEphemeralResourceResponse, OpenEphemeralResourceRequest,
    OpenEphemeralResourceResponse, Provider, ProviderError, RenewEphemeralResourceRequest,
    RenewEphemeralResourceResponse, ValidateEphemeralResourceConfigRequest,
    ValidateEphemeralResourceConfigResponse,
};
use async_trait::async_trait;
use eph_core::{Diagnostics, ProviderSchema};
use tracing::Instrument;

/// Wrapper that adds tracing to any Provider
///
/// Values and private blobs are never logged; only sizes and counts.
#[derive(Clone)]
pub struct TracedProvider<P> {
    name: String,
    inner: P,
}

impl<P> TracedProvider<P> {
    pub fn new(name: impl Into<String>, inner: P) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

fn log_diagnostics(diagnostics: &Diagnostics, elapsed: std::time::Duration, done: &str) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if diagnostics.has_errors() {
        let first = diagnostics
            .errors()
            .next()
            .map(|d| d.summary.clone())
            .unwrap_or_default();
        tracing::error!(
            elapsed_ms,
            errors = diagnostics.errors().count(),
            first_error = %first,
            "failed"
        );
    } else {
        tracing::info!(
            elapsed_ms,
            warnings = diagnostics.warnings().count(),
            "{}",
            done
        );
    }
}

#[async_trait]
impl<P: Provider> Provider for TracedProvider<P> {
    async fn get_schema(&self) -> Result<ProviderSchema, ProviderError> {
        let span = tracing::info_span!("provider.schema", provider = %self.name);
        async {
            let result = self.inner.get_schema().await;
            match &result {
                Ok(schema) => tracing::debug!(
                    types = schema.ephemeral_resource_types.len(),
                    "schema loaded"
                ),
                Err(e) => tracing::error!(error = %e, "schema unavailable"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> ValidateEphemeralResourceConfigResponse {
        let span = tracing::info_span!(
            "provider.validate",
            provider = %self.name,
            type_name = %req.type_name
        );
        async {
            let start = std::time::Instant::now();
            let resp = self.inner.validate_ephemeral_resource_config(req).await;
            log_diagnostics(&resp.diagnostics, start.elapsed(), "validated");
            resp
        }
        .instrument(span)
        .await
    }

    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse {
        let span = tracing::info_span!(
            "provider.open",
            provider = %self.name,
            type_name = %req.type_name
        );
        async {
            tracing::info!("opening");
            let start = std::time::Instant::now();
            let resp = self.inner.open_ephemeral_resource(req).await;
            if resp.deferred.is_some() {
                tracing::warn!("provider deferred the open");
            }
            tracing::debug!(
                private_len = resp.private.len(),
                renews = resp.renew_at.is_some(),
                "open response"
            );
            log_diagnostics(&resp.diagnostics, start.elapsed(), "opened");
            resp
        }
        .instrument(span)
        .await
    }

    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse {
        let span = tracing::info_span!(
            "provider.renew",
            provider = %self.name,
            type_name = %req.type_name
        );
        async {
            tracing::debug!(private_len = req.private.len(), "renewing");
            let start = std::time::Instant::now();
            let resp = self.inner.renew_ephemeral_resource(req).await;
            tracing::debug!(renews_again = resp.renew_at.is_some(), "renew response");
            log_diagnostics(&resp.diagnostics, start.elapsed(), "renewed");
            resp
        }
        .instrument(span)
        .await
    }

    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> CloseEphemeralResourceResponse {
        let span = tracing::info_span!(
            "provider.close",
            provider = %self.name,
            type_name = %req.type_name
        );
        async {
            let start = std::time::Instant::now();
            let resp = self.inner.close_ephemeral_resource(req).await;
            // close failures are reported to the caller, who decides severity
            if resp.diagnostics.has_errors() {
                tracing::warn!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    errors = resp.diagnostics.errors().count(),
                    "close failed"
                );
            } else {
                tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "closed");
            }
            resp
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
