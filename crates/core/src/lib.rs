// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eph-core: shared model for the ephemeral resource lifecycle
//!
//! This crate provides:
//! - Addresses, values and path-indexed marks
//! - Provider schemas and configuration bodies
//! - Diagnostics
//! - The consistency checker and the ephemeral taint propagator

pub mod addr;
pub mod body;
pub mod clock;
pub mod consistency;
pub mod diagnostics;
pub mod marks;
pub mod schema;
pub mod taint;
pub mod value;

pub use addr::{
    ConfigResource, InstanceKey, ModulePath, ProviderConfigAddr, ResourceAddr,
    ResourceInstanceAddr,
};
pub use body::{
    BodyAttribute, CheckKind, CheckRule, ConfigBody, Expr, Repetition, RepetitionData,
    ResourceConfig,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use consistency::{assert_plan_valid, PlanViolation};
pub use diagnostics::{Diagnostic, Diagnostics, Severity, SourcePos, SourceRange};
pub use marks::{Mark, MarkedValue, PathMarks};
pub use schema::{AttrType, Attribute, NestedBlock, NestingMode, ProviderSchema, Schema};
pub use taint::{reject_ephemeral, taint_ephemeral};
pub use value::{Path, PathStep, Value};
