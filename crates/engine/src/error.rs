// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lifecycle engine

use eph_adapters::ProviderError;
use thiserror::Error;

/// Errors that can occur while wiring up a walk
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("configuration error: {0}")]
    Configuration(#[from] eph_configs::ParseError),
}

/// Errors from the instance registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("ephemeral resource instance {0} is already open")]
    AlreadyOpen(String),
}

/// Errors loading engine settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}
