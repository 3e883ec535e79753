// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consistency checking of provider results against configuration
//!
//! This is the same rule used when planning the creation of an ordinary
//! resource: anything the configuration decided must come back unchanged,
//! while anything the configuration left null (on a computed attribute) or
//! unknown is the provider's to fill in. For ephemeral resources the prior
//! value is always null.

use crate::marks::{Mark, MarkedValue, PathMarks};
use crate::schema::{Attribute, NestingMode, Schema};
use crate::value::{Path, Value};
use std::fmt;

/// One way in which a provider result contradicts the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanViolation {
    pub path: Path,
    pub message: String,
}

impl fmt::Display for PlanViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Check `planned` against `config` for a block described by `schema`
///
/// Values under a sensitive attribute or a sensitive mark are never
/// rendered into the violation messages.
pub fn assert_plan_valid(
    schema: &Schema,
    prior: &Value,
    config: &MarkedValue,
    planned: &MarkedValue,
) -> Vec<PlanViolation> {
    let checker = Checker {
        config_marks: config.marks(),
        planned_marks: planned.marks(),
        violations: Vec::new(),
    };
    checker.run(schema, prior, config.value(), planned.value())
}

struct Checker<'a> {
    config_marks: &'a PathMarks,
    planned_marks: &'a PathMarks,
    violations: Vec<PlanViolation>,
}

impl Checker<'_> {
    fn run(mut self, schema: &Schema, prior: &Value, config: &Value, planned: &Value) -> Vec<PlanViolation> {
        self.block(schema, prior, config, planned, &Path::root());
        self.violations
    }

    fn violation(&mut self, path: &Path, message: impl Into<String>) {
        self.violations.push(PlanViolation {
            path: path.clone(),
            message: message.into(),
        });
    }

    fn is_sensitive(&self, attr: &Attribute, path: &Path) -> bool {
        attr.sensitive
            || self.config_marks.marks_at(path).contains(&Mark::Sensitive)
            || self.planned_marks.marks_at(path).contains(&Mark::Sensitive)
    }

    fn block(&mut self, schema: &Schema, prior: &Value, config: &Value, planned: &Value, path: &Path) {
        if planned.is_null() && !config.is_null() {
            self.violation(path, "planned for absence but config wants existence");
            return;
        }
        if config.is_null() && !planned.is_null() {
            self.violation(path, "planned for existence but config wants absence");
            return;
        }
        if planned.is_null() {
            return;
        }

        for (name, attr) in &schema.attributes {
            self.attribute(
                attr,
                prior.get_attr(name),
                config.get_attr(name),
                planned.get_attr(name),
                &path.attr(name),
            );
        }

        for (name, nested) in &schema.blocks {
            let path = path.attr(name);
            let planned_v = planned.get_attr(name);
            let config_v = config.get_attr(name);
            let prior_v = prior.get_attr(name);

            if conforms(config_v, planned_v) {
                continue;
            }
            if !config_v.is_known() {
                continue;
            }
            if !planned_v.is_known() {
                self.violation(
                    &path,
                    "attribute representing nested block must not be unknown itself; set nested attribute values to unknown instead",
                );
                continue;
            }

            match nested.nesting {
                NestingMode::Single => self.block(&nested.block, prior_v, config_v, planned_v, &path),
                NestingMode::List => self.block_list(&nested.block, prior_v, config_v, planned_v, &path),
            }
        }
    }

    fn block_list(&mut self, block: &Schema, prior: &Value, config: &Value, planned: &Value, path: &Path) {
        let planned_items = match planned {
            Value::List(items) => items,
            Value::Null => {
                self.violation(
                    path,
                    "attribute representing a list of nested blocks must be empty to indicate no blocks, not null",
                );
                return;
            }
            other => {
                self.violation(
                    path,
                    format!("planned {} where a list of nested blocks is required", other.type_name()),
                );
                return;
            }
        };
        let config_items: &[Value] = match config {
            Value::List(items) => items,
            _ => &[],
        };
        if planned_items.len() != config_items.len() {
            self.violation(
                path,
                format!(
                    "block count in plan ({}) disagrees with count in config ({})",
                    planned_items.len(),
                    config_items.len()
                ),
            );
            return;
        }

        let prior_items: &[Value] = match prior {
            Value::List(items) => items,
            _ => &[],
        };
        for (i, (planned_ev, config_ev)) in planned_items.iter().zip(config_items).enumerate() {
            let prior_ev = prior_items.get(i).unwrap_or(&Value::Null);
            self.block(block, prior_ev, config_ev, planned_ev, &path.index(i));
        }
    }

    fn attribute(&mut self, attr: &Attribute, prior: &Value, config: &Value, planned: &Value, path: &Path) {
        if conforms(config, planned) {
            return;
        }
        // The provider returned the prior value unchanged
        if planned == prior && !prior.is_null() && !config.is_null() {
            return;
        }
        if attr.computed && !attr.optional {
            return;
        }
        if config.is_null() && attr.computed {
            return;
        }

        let sensitive = self.is_sensitive(attr, path);
        if config.is_null() {
            if sensitive {
                self.violation(path, "planned value for a non-computed attribute");
            } else {
                self.violation(path, format!("planned value {} for a non-computed attribute", planned));
            }
            return;
        }

        if sensitive {
            self.violation(path, "sensitive planned value does not match config value");
        } else {
            self.violation(
                path,
                format!("planned value {} does not match config value {}", planned, config),
            );
        }
    }
}

/// True if `planned` agrees with `config`, where unknown parts of the
/// configuration accept anything
fn conforms(config: &Value, planned: &Value) -> bool {
    match (config, planned) {
        (Value::Unknown, _) => true,
        (Value::List(c), Value::List(p)) => {
            c.len() == p.len() && c.iter().zip(p).all(|(c, p)| conforms(c, p))
        }
        (Value::Object(c), Value::Object(p)) => {
            c.len() == p.len()
                && c.iter()
                    .all(|(name, c)| p.get(name).is_some_and(|p| conforms(c, p)))
        }
        _ => config == planned,
    }
}

#[cfg(test)]
#[path = "consistency_tests.rs"]
mod tests;
