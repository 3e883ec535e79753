// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Ephemeral resource configuration: parsing and evaluation

mod check;
mod eval;
mod parser;
mod template;

pub use check::evaluate_check_rules;
pub use eval::{evaluate_body, evaluate_expr};
pub use parser::{load_configuration, parse_configuration, Configuration, ParseError};
pub use template::{interpolate, render, TemplateError};
