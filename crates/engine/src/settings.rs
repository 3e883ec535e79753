// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine settings

use crate::error::SettingsError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Tunables for a walk
///
/// ```toml
/// parallelism = 4
/// renew_early = "5s"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Maximum instances opened at once
    pub parallelism: usize,
    /// How long before a provider's renew-at the renewal fires
    #[serde(with = "humantime_serde")]
    pub renew_early: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            parallelism: 10,
            renew_early: Duration::ZERO,
        }
    }
}

impl EngineSettings {
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = toml::from_str(content)?;
        if settings.parallelism == 0 {
            return Err(SettingsError::Invalid(
                "parallelism must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        assert_eq!(EngineSettings::parse("").unwrap(), EngineSettings::default());
    }

    #[test]
    fn parses_humantime_durations() {
        let settings = EngineSettings::parse("parallelism = 2\nrenew_early = \"1m 30s\"\n").unwrap();
        assert_eq!(settings.parallelism, 2);
        assert_eq!(settings.renew_early, Duration::from_secs(90));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            EngineSettings::parse("paralelism = 2\n"),
            Err(SettingsError::Toml(_))
        ));
    }

    #[test]
    fn rejects_zero_parallelism() {
        assert!(matches!(
            EngineSettings::parse("parallelism = 0\n"),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "renew_early = \"10s\"\n").unwrap();
        let settings = EngineSettings::load(&path).unwrap();
        assert_eq!(settings.renew_early, Duration::from_secs(10));
        assert_eq!(settings.parallelism, 10);
    }
}
