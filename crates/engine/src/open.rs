// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opening ephemeral resource instances
//!
//! Every step reports into one [`Diagnostics`] and the sequence stops at the
//! first step that produced an error. Nothing reaches the registry unless
//! every step succeeded.

use crate::context::{EvalContext, ProviderBinding};
use crate::instance::{ProviderInstance, ResourceInstance};
use crate::registry::Registration;
use eph_adapters::{
    normalize_renew_at, EphemeralRenew, OpenEphemeralResourceRequest,
    ValidateEphemeralResourceConfigRequest,
};
use eph_core::{
    assert_plan_valid, taint_ephemeral, CheckKind, Diagnostic, Diagnostics, MarkedValue,
    ResourceConfig, ResourceInstanceAddr, Schema, Severity, Value,
};
use std::future::Future;
use std::sync::Arc;

/// Open one instance and register it
///
/// Returns the registered value on success. The value is always marked
/// ephemeral on top of whatever marks the configuration carried.
pub async fn ephemeral_resource_open<Ctx: EvalContext + ?Sized>(
    ctx: &Ctx,
    addr: &ResourceInstanceAddr,
    config: &ResourceConfig,
) -> (Option<MarkedValue>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let addr_str = addr.to_string();

    let (binding, schema) = match resolve_schema(ctx, addr, config) {
        Ok(found) => found,
        Err(diag) => {
            diags.push(diag);
            return (None, diags);
        }
    };
    let data = ctx.instance_data(addr);

    let checks = ctx.evaluate_check_rules(CheckKind::ResourcePrecondition, &config.preconditions, &data);
    diags.append(checks.in_config_body(&config.config, &addr_str));
    if diags.has_errors() {
        return (None, diags);
    }

    let (config_val, eval_diags) = ctx.evaluate_block(&config.config, schema, &data);
    diags.append(eval_diags.in_config_body(&config.config, &addr_str));
    if diags.has_errors() {
        return (None, diags);
    }

    let (unmarked, marks) = config_val.clone().unmark_deep_with_paths();

    let validated = until_stopped(
        ctx,
        addr,
        binding
            .provider
            .validate_ephemeral_resource_config(ValidateEphemeralResourceConfigRequest {
                type_name: addr.type_name().to_string(),
                config: unmarked.clone(),
            }),
    )
    .await;
    let validated = match validated {
        Ok(resp) => resp,
        Err(diag) => {
            diags.push(diag);
            return (None, diags);
        }
    };
    diags.append(validated.diagnostics.in_config_body(&config.config, &addr_str));
    if diags.has_errors() {
        return (None, diags);
    }

    let opened = until_stopped(
        ctx,
        addr,
        binding
            .provider
            .open_ephemeral_resource(OpenEphemeralResourceRequest {
                type_name: addr.type_name().to_string(),
                config: unmarked,
            }),
    )
    .await;
    let resp = match opened {
        Ok(resp) => resp,
        Err(diag) => {
            diags.push(diag);
            return (None, diags);
        }
    };
    if let Some(deferred) = resp.deferred {
        tracing::debug!(%addr, reason = ?deferred.reason, "provider deferred open");
        let deferral: Diagnostics = Diagnostic::error(
            "Provider deferred an ephemeral resource",
            format!(
                "The provider for {} asked to defer opening {}, but deferral of ephemeral resource instances is not supported.",
                addr.type_name(),
                addr
            ),
        )
        .into();
        diags.append(resp.diagnostics.in_config_body(&config.config, &addr_str));
        diags.append(deferral.in_config_body(&config.config, &addr_str));
        return (None, diags);
    }
    diags.append(resp.diagnostics.in_config_body(&config.config, &addr_str));
    if diags.has_errors() {
        return (None, diags);
    }

    let result = MarkedValue::new(resp.result.clone());
    let violations = assert_plan_valid(schema, &Value::Null, &config_val, &result);
    if !violations.is_empty() {
        let inconsistent: Diagnostics = violations
            .into_iter()
            .map(|violation| {
                Diagnostic::attribute_value(
                    Severity::Error,
                    "Provider produced invalid ephemeral resource instance",
                    format!(
                        "The provider for {} produced an inconsistent result: {}.",
                        addr.type_name(),
                        violation
                    ),
                    violation.path,
                )
            })
            .collect();
        diags.append(inconsistent.in_config_body(&config.config, &addr_str));
        return (None, diags);
    }

    let value = taint_ephemeral(resp.result, &marks);
    let renew = normalize_renew_at(resp.renew_at).map(|renew_at| EphemeralRenew {
        renew_at,
        private: resp.private.clone(),
    });
    let instance = Arc::new(ProviderInstance::new(
        Arc::clone(&binding.provider),
        addr.clone(),
        resp.private,
    ));

    let registration = Registration {
        value: value.clone(),
        config_body: Arc::clone(&config.config),
        instance: instance.clone(),
        renew,
    };
    if let Err(e) = ctx
        .ephemeral_resources()
        .register_instance(ctx.stop(), addr.clone(), registration)
    {
        diags.push(Diagnostic::from_error(&e).with_address(addr_str.clone()));
        // the provider opened it, so it still needs closing
        let closed = instance.close(ctx.stop()).await;
        diags.append(closed.in_config_body(&config.config, &addr_str));
        return (None, diags);
    }

    tracing::debug!(%addr, "opened");
    (Some(value), diags)
}

/// Validate one instance's configuration without opening it
pub async fn ephemeral_resource_validate<Ctx: EvalContext + ?Sized>(
    ctx: &Ctx,
    addr: &ResourceInstanceAddr,
    config: &ResourceConfig,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let addr_str = addr.to_string();

    let (binding, schema) = match resolve_schema(ctx, addr, config) {
        Ok(found) => found,
        Err(diag) => {
            diags.push(diag);
            return diags;
        }
    };

    let data = ctx.instance_data(addr);
    let (config_val, eval_diags) = ctx.evaluate_block(&config.config, schema, &data);
    diags.append(eval_diags.in_config_body(&config.config, &addr_str));
    if diags.has_errors() {
        return diags;
    }

    let (unmarked, _) = config_val.unmark_deep_with_paths();
    let validated = until_stopped(
        ctx,
        addr,
        binding
            .provider
            .validate_ephemeral_resource_config(ValidateEphemeralResourceConfigRequest {
                type_name: addr.type_name().to_string(),
                config: unmarked,
            }),
    )
    .await;
    match validated {
        Ok(resp) => diags.append(resp.diagnostics.in_config_body(&config.config, &addr_str)),
        Err(diag) => diags.push(diag),
    }
    diags
}

fn resolve_schema<'c, Ctx: EvalContext + ?Sized>(
    ctx: &'c Ctx,
    addr: &ResourceInstanceAddr,
    config: &ResourceConfig,
) -> Result<(&'c ProviderBinding, &'c Schema), Diagnostic> {
    let binding = ctx.provider(&config.provider).ok_or_else(|| {
        Diagnostic::error(
            "Provider configuration not present",
            format!(
                "To work with {} its provider configuration {} is required, but it is not configured.",
                addr, config.provider
            ),
        )
        .with_subject(config.range.clone())
        .with_address(addr.to_string())
    })?;
    let schema = binding
        .schema
        .schema_for_resource(&addr.resource)
        .ok_or_else(|| {
            Diagnostic::error(
                "Missing resource type schema",
                format!(
                    "Provider {} does not support ephemeral resource type {:?}.",
                    config.provider,
                    addr.type_name()
                ),
            )
            .with_subject(config.range.clone())
            .with_address(addr.to_string())
        })?;
    Ok((binding, schema))
}

/// Race a provider call against the walk's stop signal
async fn until_stopped<Ctx, F, T>(ctx: &Ctx, addr: &ResourceInstanceAddr, call: F) -> Result<T, Diagnostic>
where
    Ctx: EvalContext + ?Sized,
    F: Future<Output = T>,
{
    tokio::select! {
        result = call => Ok(result),
        _ = ctx.stop().cancelled() => Err(Diagnostic::error(
            "Operation cancelled",
            format!("Work on {} was interrupted before the provider responded.", addr),
        )
        .with_address(addr.to_string())),
    }
}

#[cfg(test)]
#[path = "open_tests.rs"]
mod tests;
