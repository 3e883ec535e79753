// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource configuration as handed over by the configuration loader
//!
//! Bodies carry unevaluated expressions plus source ranges. Evaluating them
//! is the evaluator's job; this module only describes the shapes.

use crate::addr::{ConfigResource, InstanceKey, ProviderConfigAddr, ResourceInstanceAddr};
use crate::diagnostics::SourceRange;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An expression in a configuration body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Value),
    /// String with `{count.index}`, `{each.key}` or `{each.value}` placeholders
    Template(String),
    /// The inner value, marked sensitive
    Sensitive(Box<Expr>),
    /// A value only known later in the walk
    Unknown,
    List(Vec<Expr>),
    Object(BTreeMap<String, Expr>),
    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),
}

/// One attribute assignment in a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyAttribute {
    pub expr: Expr,
    pub range: SourceRange,
}

/// The `config` block of an ephemeral resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBody {
    pub attributes: BTreeMap<String, BodyAttribute>,
    pub range: SourceRange,
}

impl ConfigBody {
    pub fn new(range: SourceRange) -> Self {
        Self {
            attributes: BTreeMap::new(),
            range,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, expr: Expr, range: SourceRange) -> Self {
        self.attributes
            .insert(name.into(), BodyAttribute { expr, range });
        self
    }

    pub fn attribute_range(&self, name: &str) -> Option<&SourceRange> {
        self.attributes.get(name).map(|a| &a.range)
    }
}

/// Which kind of user-authored assertion a rule is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    ResourcePrecondition,
    ResourcePostcondition,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::ResourcePrecondition => f.write_str("Resource precondition"),
            CheckKind::ResourcePostcondition => f.write_str("Resource postcondition"),
        }
    }
}

/// A user-authored assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRule {
    pub condition: Expr,
    /// Template rendered into the diagnostic when the condition is false
    pub error_message: String,
    pub range: SourceRange,
}

/// How many instances a resource block expands into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Repetition {
    #[default]
    Single,
    Count(u32),
    ForEach(BTreeMap<String, Value>),
}

/// Per-instance data available to expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionData {
    pub count_index: Option<u32>,
    pub each_key: Option<String>,
    pub each_value: Option<Value>,
}

/// A fully-loaded ephemeral resource block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub addr: ConfigResource,
    pub provider: ProviderConfigAddr,
    pub repetition: Repetition,
    pub preconditions: Vec<CheckRule>,
    pub config: Arc<ConfigBody>,
    /// Range of the whole resource block
    pub range: SourceRange,
}

impl ResourceConfig {
    /// Expand into one address per instance, with that instance's data
    pub fn instances(&self) -> Vec<(ResourceInstanceAddr, RepetitionData)> {
        match &self.repetition {
            Repetition::Single => vec![(
                self.addr.instance(InstanceKey::NoKey),
                RepetitionData::default(),
            )],
            Repetition::Count(n) => (0..*n)
                .map(|i| {
                    (
                        self.addr.instance(InstanceKey::Int(i)),
                        RepetitionData {
                            count_index: Some(i),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
            Repetition::ForEach(items) => items
                .iter()
                .map(|(key, value)| {
                    (
                        self.addr.instance(InstanceKey::Str(key.clone())),
                        RepetitionData {
                            each_key: Some(key.clone()),
                            each_value: Some(value.clone()),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::{ModulePath, ResourceAddr};

    fn resource(repetition: Repetition) -> ResourceConfig {
        ResourceConfig {
            addr: ConfigResource::new(ModulePath::root(), ResourceAddr::new("demo_token", "t")),
            provider: ProviderConfigAddr::new("demo"),
            repetition,
            preconditions: Vec::new(),
            config: Arc::new(ConfigBody::default()),
            range: SourceRange::default(),
        }
    }

    #[test]
    fn single_expands_to_unkeyed_instance() {
        let instances = resource(Repetition::Single).instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].0.key, InstanceKey::NoKey);
        assert_eq!(instances[0].1, RepetitionData::default());
    }

    #[test]
    fn count_expands_to_indexed_instances() {
        let instances = resource(Repetition::Count(3)).instances();
        let keys: Vec<_> = instances.iter().map(|(a, _)| a.key.clone()).collect();
        assert_eq!(
            keys,
            vec![InstanceKey::Int(0), InstanceKey::Int(1), InstanceKey::Int(2)]
        );
        assert_eq!(instances[2].1.count_index, Some(2));
    }

    #[test]
    fn count_zero_expands_to_nothing() {
        assert!(resource(Repetition::Count(0)).instances().is_empty());
    }

    #[test]
    fn for_each_carries_key_and_value() {
        let items = [("east".to_string(), Value::string("us-east-1"))]
            .into_iter()
            .collect();
        let instances = resource(Repetition::ForEach(items)).instances();
        assert_eq!(instances[0].0.key, InstanceKey::Str("east".into()));
        assert_eq!(instances[0].1.each_key.as_deref(), Some("east"));
        assert_eq!(
            instances[0].1.each_value,
            Some(Value::string("us-east-1"))
        );
    }
}
