// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-authored precondition evaluation

use crate::eval::evaluate_expr;
use crate::template::render;
use eph_core::{CheckKind, CheckRule, Diagnostic, Diagnostics, RepetitionData, Value};

/// Evaluate check rules for one instance
///
/// A false condition reports the rule's rendered error message. Conditions
/// that are not yet known are skipped; they cannot block anything yet.
pub fn evaluate_check_rules(
    kind: CheckKind,
    rules: &[CheckRule],
    data: &RepetitionData,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for rule in rules {
        let result = match evaluate_expr(&rule.condition, data) {
            Ok(result) => result,
            Err(e) => {
                diags.push(
                    Diagnostic::error("Invalid reference", e.to_string())
                        .with_subject(rule.range.clone()),
                );
                continue;
            }
        };
        let passed = match result.value() {
            Value::Unknown => continue,
            Value::Bool(b) => *b,
            Value::String(s) if s == "true" || s == "false" => s == "true",
            other => {
                diags.push(
                    Diagnostic::error(
                        "Invalid condition result",
                        format!(
                            "Invalid condition result value: a bool is required, got {}.",
                            other.type_name()
                        ),
                    )
                    .with_subject(rule.range.clone()),
                );
                continue;
            }
        };
        if !passed {
            diags.push(
                Diagnostic::error(format!("{} failed", kind), render(&rule.error_message, data))
                    .with_subject(rule.range.clone()),
            );
        }
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use eph_core::{Expr, SourceRange};
    use yare::parameterized;

    fn rule(condition: Expr) -> CheckRule {
        CheckRule {
            condition,
            error_message: "index {count.index} is reserved".to_string(),
            range: SourceRange::default(),
        }
    }

    fn index(i: u32) -> RepetitionData {
        RepetitionData {
            count_index: Some(i),
            ..Default::default()
        }
    }

    fn not_three() -> Expr {
        Expr::NotEqual(
            Box::new(Expr::Template("{count.index}".into())),
            Box::new(Expr::Literal(Value::string("3"))),
        )
    }

    #[test]
    fn passing_rule_reports_nothing() {
        let diags = evaluate_check_rules(CheckKind::ResourcePrecondition, &[rule(not_three())], &index(1));
        assert!(diags.is_empty());
    }

    #[test]
    fn failing_rule_renders_message() {
        let diags = evaluate_check_rules(CheckKind::ResourcePrecondition, &[rule(not_three())], &index(3));
        let diag = diags.iter().next().unwrap();
        assert!(diag.is_error());
        assert_eq!(diag.summary, "Resource precondition failed");
        assert_eq!(diag.detail, "index 3 is reserved");
    }

    #[parameterized(
        unknown = { Expr::Unknown, 0 },
        literal_true = { Expr::Literal(Value::Bool(true)), 0 },
        literal_false = { Expr::Literal(Value::Bool(false)), 1 },
        string_false = { Expr::Literal(Value::string("false")), 1 },
        number = { Expr::Literal(Value::number(1)), 1 },
    )]
    fn condition_results(condition: Expr, errors: usize) {
        let diags = evaluate_check_rules(CheckKind::ResourcePrecondition, &[rule(condition)], &index(0));
        assert_eq!(diags.errors().count(), errors);
    }

    #[test]
    fn non_bool_condition_is_invalid() {
        let diags = evaluate_check_rules(
            CheckKind::ResourcePrecondition,
            &[rule(Expr::Literal(Value::string("yes")))],
            &index(0),
        );
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "Invalid condition result"
        );
    }

    #[test]
    fn every_rule_is_evaluated() {
        let rules = [
            rule(Expr::Literal(Value::Bool(false))),
            rule(Expr::Literal(Value::Bool(false))),
        ];
        let diags = evaluate_check_rules(CheckKind::ResourcePrecondition, &rules, &index(0));
        assert_eq!(diags.len(), 2);
    }
}
