// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Provider adapters for ephemeral resources

pub mod provider;
pub mod traced;

pub use provider::{
    normalize_renew_at, CloseEphemeralResourceRequest, CloseEphemeralResourceResponse, Deferred,
    DeferredReason, DemoProvider, EphemeralRenew, OpenEphemeralResourceRequest,
    OpenEphemeralResourceResponse, Provider, ProviderError, RenewEphemeralResourceRequest,
    RenewEphemeralResourceResponse, ValidateEphemeralResourceConfigRequest,
    ValidateEphemeralResourceConfigResponse, DEMO_TOKEN,
};
pub use traced::TracedProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use provider::{FakeProvider, ProviderCall};
