// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn root_instance_renders_without_module_prefix() {
    let resource = ConfigResource::new(ModulePath::root(), ResourceAddr::new("demo_token", "main"));
    assert_eq!(resource.to_string(), "ephemeral.demo_token.main");
    assert_eq!(
        resource.instance(InstanceKey::Int(2)).to_string(),
        "ephemeral.demo_token.main[2]"
    );
    assert_eq!(
        resource.instance(InstanceKey::Str("a".into())).to_string(),
        "ephemeral.demo_token.main[\"a\"]"
    );
}

#[test]
fn nested_module_instance_renders_module_path() {
    let module = ModulePath::root().child("net").child("vault");
    let addr = ConfigResource::new(module, ResourceAddr::new("demo_token", "t"))
        .instance(InstanceKey::NoKey);
    assert_eq!(
        addr.to_string(),
        "module.net.module.vault.ephemeral.demo_token.t"
    );
}

#[test]
fn instance_round_trips_to_containing_resource() {
    let resource = ConfigResource::new(ModulePath::root(), ResourceAddr::new("demo_token", "main"));
    let addr = resource.instance(InstanceKey::Int(0));
    assert_eq!(addr.containing_resource(), resource);
    assert_eq!(addr.type_name(), "demo_token");
}

#[test]
fn implied_provider_uses_type_prefix() {
    assert_eq!(ResourceAddr::new("demo_token", "x").implied_provider(), "demo");
    assert_eq!(ResourceAddr::new("vault", "x").implied_provider(), "vault");
}

#[test]
fn provider_addr_renders_alias() {
    assert_eq!(ProviderConfigAddr::new("demo").to_string(), "provider[\"demo\"]");
    assert_eq!(
        ProviderConfigAddr::new("demo").with_alias("east").to_string(),
        "provider[\"demo\"].east"
    );
}
