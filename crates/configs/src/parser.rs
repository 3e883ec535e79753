// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration TOML parsing
//!
//! ```toml
//! [ephemeral.demo_token.main]
//! count = 2
//!
//! [ephemeral.demo_token.main.config]
//! prefix = "tok-{count.index}"
//!
//! [[ephemeral.demo_token.main.precondition]]
//! condition = { not_equal = ["{count.index}", "3"] }
//! error_message = "index 3 is reserved"
//! ```

use crate::template::VAR_PATTERN;
use eph_core::{
    CheckRule, ConfigBody, ConfigResource, Expr, ModulePath, ProviderConfigAddr, Repetition,
    ResourceAddr, ResourceConfig, SourcePos, SourceRange, Value,
};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use toml::Spanned;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_-]*$").expect("constant regex pattern is valid")
});

/// Errors that can occur during configuration parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// A parsed configuration file
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub resources: Vec<Arc<ResourceConfig>>,
}

impl Configuration {
    pub fn resource(&self, addr: &ConfigResource) -> Option<&Arc<ResourceConfig>> {
        self.resources.iter().find(|r| &r.addr == addr)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFile {
    #[serde(default)]
    ephemeral: BTreeMap<String, BTreeMap<String, Spanned<RawResource>>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResource {
    provider: Option<String>,
    count: Option<u32>,
    for_each: Option<BTreeMap<String, toml::Value>>,
    #[serde(default)]
    config: BTreeMap<String, Spanned<toml::Value>>,
    #[serde(default)]
    precondition: Vec<RawCheck>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCheck {
    condition: Spanned<toml::Value>,
    error_message: String,
}

/// Byte offset to line/column translation
struct LineIndex<'a> {
    filename: &'a str,
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(filename: &'a str, content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            filename,
            content,
            line_starts,
        }
    }

    fn pos(&self, byte: usize) -> SourcePos {
        let line = self.line_starts.partition_point(|start| *start <= byte);
        let line_start = self.line_starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        let column = self
            .content
            .get(line_start..byte)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;
        SourcePos { line, column, byte }
    }

    fn range(&self, span: Range<usize>) -> SourceRange {
        SourceRange {
            filename: self.filename.to_string(),
            start: self.pos(span.start),
            end: self.pos(span.end),
        }
    }
}

/// Parse a configuration from TOML content
///
/// `filename` only labels source ranges.
pub fn parse_configuration(content: &str, filename: &str) -> Result<Configuration, ParseError> {
    let raw: RawFile = toml::from_str(content)?;
    let lines = LineIndex::new(filename, content);

    let mut config = Configuration::default();
    for (type_name, blocks) in raw.ephemeral {
        check_name(&type_name, "resource type")?;
        for (name, block) in blocks {
            check_name(&name, "resource name")?;
            let range = lines.range(block.span());
            let resource = parse_resource(&type_name, &name, block.into_inner(), range, &lines)?;
            config.resources.push(Arc::new(resource));
        }
    }
    Ok(config)
}

/// Load and parse a configuration file
pub fn load_configuration(path: &std::path::Path) -> Result<Configuration, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_configuration(&content, &path.display().to_string())
}

fn check_name(name: &str, what: &str) -> Result<(), ParseError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ParseError::InvalidFormat(format!(
            "invalid {} {:?}: must start with a letter or underscore",
            what, name
        )))
    }
}

fn parse_resource(
    type_name: &str,
    name: &str,
    raw: RawResource,
    range: SourceRange,
    lines: &LineIndex<'_>,
) -> Result<ResourceConfig, ParseError> {
    let addr = ConfigResource::new(ModulePath::root(), ResourceAddr::new(type_name, name));
    let ctx = format!("ephemeral.{}.{}", type_name, name);

    let repetition = match (raw.count, raw.for_each) {
        (Some(_), Some(_)) => {
            return Err(ParseError::InvalidFormat(format!(
                "{}: count and for_each cannot both be set",
                ctx
            )))
        }
        (Some(n), None) => Repetition::Count(n),
        (None, Some(items)) => Repetition::ForEach(
            items
                .into_iter()
                .map(|(k, v)| Ok((k, to_value(v, &ctx)?)))
                .collect::<Result<_, ParseError>>()?,
        ),
        (None, None) => Repetition::Single,
    };

    let provider = match raw.provider {
        Some(p) => parse_provider(&p, &ctx)?,
        None => ProviderConfigAddr::new(addr.resource.implied_provider()),
    };

    let mut body = ConfigBody::new(range.clone());
    for (attr, value) in raw.config {
        let attr_range = lines.range(value.span());
        let expr = to_expr(value.into_inner(), &format!("{}.config.{}", ctx, attr))?;
        body = body.with_attribute(attr, expr, attr_range);
    }

    let preconditions = raw
        .precondition
        .into_iter()
        .map(|check| {
            let range = lines.range(check.condition.span());
            Ok(CheckRule {
                condition: to_expr(check.condition.into_inner(), &format!("{}.precondition", ctx))?,
                error_message: check.error_message,
                range,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(ResourceConfig {
        addr,
        provider,
        repetition,
        preconditions,
        config: Arc::new(body),
        range,
    })
}

/// `demo` or `demo.alias`
fn parse_provider(s: &str, ctx: &str) -> Result<ProviderConfigAddr, ParseError> {
    let mut parts = s.splitn(2, '.');
    let local = parts.next().unwrap_or_default();
    check_name(local, "provider name")
        .map_err(|e| ParseError::InvalidFormat(format!("{}.provider: {}", ctx, e)))?;
    Ok(match parts.next() {
        Some(alias) => ProviderConfigAddr::new(local).with_alias(alias),
        None => ProviderConfigAddr::new(local),
    })
}

/// Convert a literal TOML value (no expressions allowed)
fn to_value(value: toml::Value, ctx: &str) -> Result<Value, ParseError> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::number(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| ParseError::InvalidFormat(format!("{}: {} is not a finite number", ctx, f)))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| to_value(item, ctx))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| Ok((k, to_value(v, ctx)?)))
                .collect::<Result<_, ParseError>>()?,
        ),
    })
}

/// Convert a TOML value into an expression
///
/// Single-key tables named `sensitive`, `unknown`, `equal` or `not_equal`
/// are expression forms; any other table is an object.
fn to_expr(value: toml::Value, ctx: &str) -> Result<Expr, ParseError> {
    match value {
        toml::Value::String(s) if VAR_PATTERN.is_match(&s) => Ok(Expr::Template(s)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| to_expr(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Expr::List),
        toml::Value::Table(table) if table.len() == 1 => {
            let Some((key, inner)) = table.into_iter().next() else {
                return Ok(Expr::Object(BTreeMap::new()));
            };
            match key.as_str() {
                "sensitive" => Ok(Expr::Sensitive(Box::new(to_expr(inner, ctx)?))),
                "unknown" => match inner {
                    toml::Value::Boolean(true) => Ok(Expr::Unknown),
                    _ => Err(ParseError::InvalidFormat(format!(
                        "{}: unknown must be set to true",
                        ctx
                    ))),
                },
                "equal" => {
                    let (a, b) = operands(inner, ctx)?;
                    Ok(Expr::Equal(Box::new(a), Box::new(b)))
                }
                "not_equal" => {
                    let (a, b) = operands(inner, ctx)?;
                    Ok(Expr::NotEqual(Box::new(a), Box::new(b)))
                }
                _ => Ok(Expr::Object(BTreeMap::from([(key, to_expr(inner, ctx)?)]))),
            }
        }
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(k, v)| Ok((k, to_expr(v, ctx)?)))
            .collect::<Result<BTreeMap<_, _>, ParseError>>()
            .map(Expr::Object),
        other => to_value(other, ctx).map(Expr::Literal),
    }
}

fn operands(value: toml::Value, ctx: &str) -> Result<(Expr, Expr), ParseError> {
    match value {
        toml::Value::Array(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            match (items.next(), items.next()) {
                (Some(a), Some(b)) => Ok((to_expr(a, ctx)?, to_expr(b, ctx)?)),
                _ => Err(ParseError::InvalidFormat(format!(
                    "{}: comparison needs exactly two operands",
                    ctx
                ))),
            }
        }
        _ => Err(ParseError::InvalidFormat(format!(
            "{}: comparison needs exactly two operands",
            ctx
        ))),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
