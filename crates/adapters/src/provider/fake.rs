// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    CloseEphemeralResourceRequest, CloseEphemeralResourceResponse, OpenEphemeralResourceRequest,
    OpenEphemeralResourceResponse, Provider, ProviderError, RenewEphemeralResourceRequest,
    RenewEphemeralResourceResponse, ValidateEphemeralResourceConfigRequest,
    ValidateEphemeralResourceConfigResponse,
};
use async_trait::async_trait;
use eph_core::{Diagnostics, ProviderSchema, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    GetSchema,
    Validate { type_name: String, config: Value },
    Open { type_name: String, config: Value },
    Renew { type_name: String, private: Vec<u8> },
    Close { type_name: String, private: Vec<u8> },
}

#[derive(Default)]
struct FakeState {
    schema: ProviderSchema,
    schema_unavailable: bool,
    calls: Vec<ProviderCall>,
    validate_diagnostics: Diagnostics,
    open_responses: VecDeque<OpenEphemeralResourceResponse>,
    open_hangs: bool,
    renew_hangs: bool,
    renew_responses: VecDeque<RenewEphemeralResourceResponse>,
    close_diagnostics: Diagnostics,
}

/// Fake provider that records calls and replays scripted responses
///
/// With no scripted open response, open echoes the configuration back as the
/// result with empty private state and no renewal.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvider {
    pub fn new(schema: ProviderSchema) -> Self {
        let provider = Self::default();
        provider.lock().schema = schema;
        provider
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ProviderCall) {
        self.lock().calls.push(call);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    pub fn open_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Open { .. }))
    }

    pub fn validate_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Validate { .. }))
    }

    pub fn renew_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Renew { .. }))
    }

    pub fn close_count(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::Close { .. }))
    }

    fn count(&self, pred: impl Fn(&ProviderCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Make schema retrieval fail
    pub fn set_schema_unavailable(&self) {
        self.lock().schema_unavailable = true;
    }

    /// Diagnostics returned by every validate call
    pub fn set_validate_diagnostics(&self, diagnostics: Diagnostics) {
        self.lock().validate_diagnostics = diagnostics;
    }

    /// Queue a response for the next open call
    pub fn push_open_response(&self, response: OpenEphemeralResourceResponse) {
        self.lock().open_responses.push_back(response);
    }

    /// Make open calls never complete, to exercise cancellation
    pub fn set_open_hangs(&self) {
        self.lock().open_hangs = true;
    }

    /// Make renew calls never complete, to exercise cancellation
    pub fn set_renew_hangs(&self) {
        self.lock().renew_hangs = true;
    }

    /// Queue a response for the next renew call
    pub fn push_renew_response(&self, response: RenewEphemeralResourceResponse) {
        self.lock().renew_responses.push_back(response);
    }

    /// Diagnostics returned by every close call
    pub fn set_close_diagnostics(&self, diagnostics: Diagnostics) {
        self.lock().close_diagnostics = diagnostics;
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn get_schema(&self) -> Result<ProviderSchema, ProviderError> {
        self.record(ProviderCall::GetSchema);
        let state = self.lock();
        if state.schema_unavailable {
            return Err(ProviderError::SchemaUnavailable(
                "fake provider configured to fail".to_string(),
            ));
        }
        Ok(state.schema.clone())
    }

    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> ValidateEphemeralResourceConfigResponse {
        self.record(ProviderCall::Validate {
            type_name: req.type_name,
            config: req.config,
        });
        ValidateEphemeralResourceConfigResponse {
            diagnostics: self.lock().validate_diagnostics.clone(),
        }
    }

    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse {
        self.record(ProviderCall::Open {
            type_name: req.type_name,
            config: req.config.clone(),
        });

        let (hangs, scripted) = {
            let mut state = self.lock();
            (state.open_hangs, state.open_responses.pop_front())
        };
        if hangs {
            std::future::pending::<()>().await;
        }

        scripted.unwrap_or_else(|| OpenEphemeralResourceResponse {
            result: req.config,
            ..Default::default()
        })
    }

    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse {
        self.record(ProviderCall::Renew {
            type_name: req.type_name,
            private: req.private,
        });
        let (hangs, scripted) = {
            let mut state = self.lock();
            (state.renew_hangs, state.renew_responses.pop_front())
        };
        if hangs {
            std::future::pending::<()>().await;
        }
        scripted.unwrap_or_default()
    }

    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> CloseEphemeralResourceResponse {
        self.record(ProviderCall::Close {
            type_name: req.type_name,
            private: req.private,
        });
        CloseEphemeralResourceResponse {
            diagnostics: self.lock().close_diagnostics.clone(),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
