// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::ProviderBinding;
use crate::registry::Resources;
use eph_adapters::{DemoProvider, FakeProvider, Provider};
use eph_configs::parse_configuration;
use eph_core::{FakeClock, Mark, ProviderConfigAddr, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TOKENS: &str = r#"
[ephemeral.demo_token.api]
count = 3

[ephemeral.demo_token.api.config]
prefix = "api{count.index}-"

[[ephemeral.demo_token.api.precondition]]
condition = { not_equal = ["{count.index}", "1"] }
error_message = "instance {count.index} is reserved"

[ephemeral.demo_token.db.config]
value = "fixed"
"#;

fn walk_with(provider: Arc<dyn Provider>, parallelism: usize) -> Walk<FakeClock> {
    let config = parse_configuration(TOKENS, "main.toml").unwrap();
    let ctx = BuiltinEvalContext::new(
        Resources::new(FakeClock::new(), Duration::ZERO),
        CancellationToken::new(),
    )
    .with_provider(
        ProviderConfigAddr::new("demo"),
        ProviderBinding {
            provider,
            schema: DemoProvider::<FakeClock>::schema(),
        },
    );
    let settings = EngineSettings {
        parallelism,
        ..Default::default()
    };
    Walk::new(ctx, &config, &settings)
}

fn names(result: &WalkResult) -> Vec<String> {
    result.values.keys().map(|addr| addr.to_string()).collect()
}

#[tokio::test]
async fn apply_opens_every_passing_instance() {
    let provider = DemoProvider::with_clock(FakeClock::new());
    let walk = walk_with(Arc::new(provider), 10);

    let result = walk.execute(WalkOperation::Apply).await;

    assert_eq!(
        names(&result),
        vec![
            "ephemeral.demo_token.api[0]",
            "ephemeral.demo_token.api[2]",
            "ephemeral.demo_token.db",
        ]
    );
    for value in result.values.values() {
        assert!(value.is_wholly_marked(Mark::Ephemeral));
    }
    let api2 = result
        .values
        .iter()
        .find(|(addr, _)| addr.to_string() == "ephemeral.demo_token.api[2]")
        .map(|(_, value)| value.value().get_attr("value").as_str().unwrap().to_string())
        .unwrap();
    assert!(api2.starts_with("api2-"));

    assert_eq!(result.diagnostics.errors().count(), 1);
    let diag = result.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Resource precondition failed");
    assert_eq!(diag.detail, "instance 1 is reserved");
    assert_eq!(diag.address.as_deref(), Some("ephemeral.demo_token.api[1]"));
}

#[tokio::test]
async fn apply_closes_everything_it_opened() {
    let fake = FakeProvider::new(DemoProvider::<FakeClock>::schema());
    let walk = walk_with(Arc::new(fake.clone()), 10);

    let result = walk.execute(WalkOperation::Apply).await;

    assert_eq!(result.values.len(), 3);
    assert_eq!(fake.open_count(), 3);
    assert_eq!(fake.close_count(), 3);
    assert!(walk.context().ephemeral_resources().is_empty());
}

#[tokio::test]
async fn validate_never_opens() {
    let fake = FakeProvider::new(DemoProvider::<FakeClock>::schema());
    let walk = walk_with(Arc::new(fake.clone()), 10);

    let result = walk.execute(WalkOperation::Validate).await;

    assert!(result.values.is_empty());
    assert!(!result.diagnostics.has_errors());
    assert_eq!(fake.validate_count(), 4);
    assert_eq!(fake.open_count(), 0);
    assert_eq!(fake.close_count(), 0);
}

#[tokio::test]
async fn parallelism_of_one_still_completes() {
    let fake = FakeProvider::new(DemoProvider::<FakeClock>::schema());
    let walk = walk_with(Arc::new(fake.clone()), 1);

    let result = walk.execute(WalkOperation::Plan).await;

    assert_eq!(result.values.len(), 3);
    assert_eq!(fake.close_count(), 3);
}

#[tokio::test]
async fn close_failures_surface_in_walk_diagnostics() {
    let fake = FakeProvider::new(DemoProvider::<FakeClock>::schema());
    fake.set_close_diagnostics(eph_core::Diagnostic::error("Revoke failed", "").into());
    let walk = walk_with(Arc::new(fake.clone()), 10);

    let result = walk.execute(WalkOperation::Apply).await;

    let revoke_failures = result
        .diagnostics
        .iter()
        .filter(|d| d.summary == "Revoke failed")
        .count();
    assert_eq!(revoke_failures, 3);
    assert_eq!(
        result
            .values
            .values()
            .filter(|v| v.value().get_attr("value") == &Value::string("fixed"))
            .count(),
        1
    );
}

#[tokio::test]
async fn stopped_walk_reports_cancellation() {
    let fake = FakeProvider::new(DemoProvider::<FakeClock>::schema());
    fake.set_open_hangs();
    let walk = walk_with(Arc::new(fake.clone()), 10);
    walk.context().stop().cancel();

    let result = walk.execute(WalkOperation::Apply).await;

    assert!(result.values.is_empty());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.summary == "Operation cancelled"));
}
