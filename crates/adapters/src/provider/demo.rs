// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in demo provider issuing short-lived tokens
//!
//! Serves the single ephemeral resource type `demo_token`. The lease state
//! (token, ttl, renewal count) rides in the private blob as JSON, so renew
//! and close work from the blob alone.

use super::{
    CloseEphemeralResourceRequest, CloseEphemeralResourceResponse, OpenEphemeralResourceRequest,
    OpenEphemeralResourceResponse, Provider, ProviderError, RenewEphemeralResourceRequest,
    RenewEphemeralResourceResponse, ValidateEphemeralResourceConfigRequest,
    ValidateEphemeralResourceConfigResponse,
};
use async_trait::async_trait;
use eph_core::{
    AttrType, Attribute, Clock, Diagnostic, Diagnostics, Path, ProviderSchema, Schema, Severity,
    SystemClock, Value,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

pub const DEMO_TOKEN: &str = "demo_token";

#[derive(Debug, Serialize, Deserialize)]
struct Lease {
    token: String,
    ttl_seconds: Option<u64>,
    renewals: u64,
}

/// Demo provider for the CLI and examples
#[derive(Clone, Debug, Default)]
pub struct DemoProvider<C: Clock = SystemClock> {
    clock: C,
}

impl DemoProvider<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> DemoProvider<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn schema() -> ProviderSchema {
        ProviderSchema::new().with_resource_type(
            DEMO_TOKEN,
            Schema::new()
                .attribute(
                    "prefix",
                    Attribute::optional(AttrType::String)
                        .with_description("Prepended to generated tokens"),
                )
                .attribute(
                    "value",
                    Attribute::optional_computed(AttrType::String)
                        .with_description("The token; generated when not set"),
                )
                .attribute(
                    "ttl_seconds",
                    Attribute::optional(AttrType::Number)
                        .with_description("Lease length; enables renewal"),
                )
                .attribute("renewals", Attribute::computed(AttrType::Number)),
        )
    }

    fn renew_at(&self, ttl_seconds: Option<u64>) -> Option<SystemTime> {
        ttl_seconds.map(|ttl| self.clock.now() + Duration::from_secs(ttl))
    }
}

fn ttl_of(config: &Value) -> Result<Option<u64>, Diagnostic> {
    match config.get_attr("ttl_seconds") {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_u64() {
            Some(ttl) if ttl > 0 => Ok(Some(ttl)),
            _ => Err(Diagnostic::attribute_value(
                Severity::Error,
                "Invalid lease length",
                format!("ttl_seconds must be a positive whole number, got {}.", n),
                Path::root().attr("ttl_seconds"),
            )),
        },
        other => Err(Diagnostic::attribute_value(
            Severity::Error,
            "Invalid lease length",
            format!("ttl_seconds must be a number, got {}.", other.type_name()),
            Path::root().attr("ttl_seconds"),
        )),
    }
}

fn decode_lease(private: &[u8]) -> Result<Lease, Diagnostic> {
    serde_json::from_slice(private).map_err(|e| {
        Diagnostic::error(
            "Corrupt lease state",
            format!("The demo provider could not read its private state: {}.", e),
        )
    })
}

fn encode_lease(lease: &Lease) -> Result<Vec<u8>, Diagnostic> {
    serde_json::to_vec(lease).map_err(|e| {
        Diagnostic::error(
            "Cannot encode lease state",
            format!("The demo provider could not write its private state: {}.", e),
        )
    })
}

fn unsupported(type_name: &str) -> Diagnostics {
    Diagnostic::error(
        "Unsupported ephemeral resource type",
        format!("The demo provider does not serve {:?}.", type_name),
    )
    .into()
}

#[async_trait]
impl<C: Clock> Provider for DemoProvider<C> {
    async fn get_schema(&self) -> Result<ProviderSchema, ProviderError> {
        Ok(Self::schema())
    }

    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> ValidateEphemeralResourceConfigResponse {
        if req.type_name != DEMO_TOKEN {
            return ValidateEphemeralResourceConfigResponse {
                diagnostics: unsupported(&req.type_name),
            };
        }
        let mut diagnostics = Diagnostics::new();
        if let Err(diag) = ttl_of(&req.config) {
            diagnostics.push(diag);
        }
        if let Some(prefix) = req.config.get_attr("prefix").as_str() {
            if prefix.chars().any(char::is_whitespace) {
                diagnostics.push(Diagnostic::attribute_value(
                    Severity::Error,
                    "Invalid token prefix",
                    "prefix must not contain whitespace.",
                    Path::root().attr("prefix"),
                ));
            }
        }
        ValidateEphemeralResourceConfigResponse { diagnostics }
    }

    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse {
        if req.type_name != DEMO_TOKEN {
            return OpenEphemeralResourceResponse {
                diagnostics: unsupported(&req.type_name),
                ..Default::default()
            };
        }
        let ttl_seconds = match ttl_of(&req.config) {
            Ok(ttl) => ttl,
            Err(diag) => {
                return OpenEphemeralResourceResponse {
                    diagnostics: diag.into(),
                    ..Default::default()
                }
            }
        };

        let token = match req.config.get_attr("value").as_str() {
            Some(fixed) => fixed.to_string(),
            None => {
                let prefix = req.config.get_attr("prefix").as_str().unwrap_or_default();
                let id = uuid::Uuid::new_v4().simple().to_string();
                format!("{}{}", prefix, &id[..12])
            }
        };
        let lease = Lease {
            token: token.clone(),
            ttl_seconds,
            renewals: 0,
        };
        let private = match encode_lease(&lease) {
            Ok(bytes) => bytes,
            Err(diag) => {
                return OpenEphemeralResourceResponse {
                    diagnostics: diag.into(),
                    ..Default::default()
                }
            }
        };

        tracing::debug!(type_name = DEMO_TOKEN, ttl_seconds, "issued token");
        OpenEphemeralResourceResponse {
            result: Value::object([
                ("prefix", req.config.get_attr("prefix").clone()),
                ("value", Value::String(token)),
                ("ttl_seconds", req.config.get_attr("ttl_seconds").clone()),
                ("renewals", Value::number(0)),
            ]),
            private,
            renew_at: self.renew_at(ttl_seconds),
            deferred: None,
            diagnostics: Diagnostics::new(),
        }
    }

    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse {
        let mut lease = match decode_lease(&req.private) {
            Ok(lease) => lease,
            Err(diag) => {
                return RenewEphemeralResourceResponse {
                    diagnostics: diag.into(),
                    ..Default::default()
                }
            }
        };
        lease.renewals += 1;
        match encode_lease(&lease) {
            Ok(private) => RenewEphemeralResourceResponse {
                renew_at: self.renew_at(lease.ttl_seconds),
                private,
                diagnostics: Diagnostics::new(),
            },
            Err(diag) => RenewEphemeralResourceResponse {
                diagnostics: diag.into(),
                ..Default::default()
            },
        }
    }

    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> CloseEphemeralResourceResponse {
        match decode_lease(&req.private) {
            Ok(lease) => {
                tracing::debug!(renewals = lease.renewals, "revoked token");
                CloseEphemeralResourceResponse::default()
            }
            Err(diag) => CloseEphemeralResourceResponse {
                diagnostics: diag.into(),
            },
        }
    }
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod tests;
