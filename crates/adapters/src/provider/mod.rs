// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider capability interface for ephemeral resources
//!
//! Providers report problems as [`Diagnostics`] inside each response rather
//! than as `Err`, because a single call may produce warnings alongside a
//! usable result. Only schema retrieval, which has no result to salvage,
//! returns a [`ProviderError`].

mod demo;

pub use demo::{DemoProvider, DEMO_TOKEN};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProvider, ProviderCall};

use async_trait::async_trait;
use eph_core::{Diagnostics, ProviderSchema, Value};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

/// Errors from provider schema retrieval
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider schema unavailable: {0}")]
    SchemaUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateEphemeralResourceConfigRequest {
    pub type_name: String,
    pub config: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateEphemeralResourceConfigResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEphemeralResourceRequest {
    pub type_name: String,
    pub config: Value,
}

/// Why a provider postponed its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredReason {
    ResourceConfigUnknown,
    ProviderConfigUnknown,
    AbsentPrereq,
}

/// A provider's request to decide later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub reason: DeferredReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenEphemeralResourceResponse {
    pub result: Value,
    /// Opaque provider state threaded into renew and close
    pub private: Vec<u8>,
    pub renew_at: Option<SystemTime>,
    pub deferred: Option<Deferred>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewEphemeralResourceRequest {
    pub type_name: String,
    pub private: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenewEphemeralResourceResponse {
    pub renew_at: Option<SystemTime>,
    pub private: Vec<u8>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEphemeralResourceRequest {
    pub type_name: String,
    pub private: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseEphemeralResourceResponse {
    pub diagnostics: Diagnostics,
}

/// When to renew next, and with which private state
///
/// Passed to a renewal and, when the provider wants another one, returned
/// from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeralRenew {
    pub renew_at: SystemTime,
    pub private: Vec<u8>,
}

/// Treat a zero timestamp the same as an absent one
///
/// Providers signal "no further renewal" either way.
pub fn normalize_renew_at(renew_at: Option<SystemTime>) -> Option<SystemTime> {
    renew_at.filter(|at| *at != SystemTime::UNIX_EPOCH)
}

/// Operations a provider plugin offers for ephemeral resources
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Schemas for every ephemeral resource type this provider serves
    async fn get_schema(&self) -> Result<ProviderSchema, ProviderError>;

    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> ValidateEphemeralResourceConfigResponse;

    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse;

    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse;

    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> CloseEphemeralResourceResponse;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    async fn get_schema(&self) -> Result<ProviderSchema, ProviderError> {
        (**self).get_schema().await
    }

    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> ValidateEphemeralResourceConfigResponse {
        (**self).validate_ephemeral_resource_config(req).await
    }

    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse {
        (**self).open_ephemeral_resource(req).await
    }

    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse {
        (**self).renew_ephemeral_resource(req).await
    }

    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> CloseEphemeralResourceResponse {
        (**self).close_ephemeral_resource(req).await
    }
}
