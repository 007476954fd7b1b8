//! Aksar configuration system
//!
//! Centralized configuration for the glyph engine, loading settings and
//! override rules from `aksar.toml`. Specs are plain serde types; they
//! compile into the core crate's runtime rule table here (regex patterns
//! included), so the engine itself never parses configuration.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use aksar_text::{OverrideAction, OverrideRule, OverrideTable, ZoneRegion};

/// Errors raised while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid override pattern `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid override rule: {0}")]
    InvalidRule(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AksarConfig {
    /// Text rendering settings.
    pub text: TextConfig,
    /// Override rules, applied in file order within each priority tier.
    #[serde(rename = "override")]
    pub overrides: Vec<OverrideRuleSpec>,
}

/// Text rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TextConfig {
    /// Path to the Khmer font file (.ttf/.otf).
    pub font: Option<PathBuf>,
    /// Font index within a collection file.
    pub font_index: u32,
    /// Default render size in pixels per em.
    pub size: Option<f32>,
    /// Padding added around the aggregate view box.
    pub padding: Option<f32>,
}

/// One override rule as written in `aksar.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRuleSpec {
    /// Exact cluster text (NFC).
    #[serde(default)]
    pub word: Option<String>,
    /// Regex matched against the cluster text.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Restrict to one font (cache key name, i.e. the file stem).
    #[serde(default)]
    pub font: Option<String>,
    pub action: ActionSpec,
    /// Replacement character, required for `set-primary`.
    #[serde(default)]
    pub primary: Option<char>,
    /// Hit zones, required for `set-hit-zones`.
    #[serde(default)]
    pub zones: Option<Vec<ZoneSpec>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionSpec {
    Split,
    Merge,
    SetPrimary,
    SetHitZones,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneSpec {
    Top,
    Bottom,
    Center,
}

impl From<ZoneSpec> for ZoneRegion {
    fn from(zone: ZoneSpec) -> Self {
        match zone {
            ZoneSpec::Top => ZoneRegion::Top,
            ZoneSpec::Bottom => ZoneRegion::Bottom,
            ZoneSpec::Center => ZoneRegion::Center,
        }
    }
}

impl AksarConfig {
    /// Load configuration from a specific TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `aksar.toml` from the working directory, falling back to the
    /// default configuration when the file is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from_file("aksar.toml").unwrap_or_default()
    }

    /// Compile the override specs into the engine's runtime table.
    pub fn override_table(&self) -> Result<OverrideTable, ConfigError> {
        let rules = self
            .overrides
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OverrideTable::new(rules))
    }
}

fn compile_rule(spec: &OverrideRuleSpec) -> Result<OverrideRule, ConfigError> {
    if spec.word.is_none() && spec.pattern.is_none() {
        return Err(ConfigError::InvalidRule(
            "rule needs a `word` or a `pattern`".into(),
        ));
    }

    let pattern = spec
        .pattern
        .as_ref()
        .map(|p| {
            Regex::new(p).map_err(|source| ConfigError::BadPattern {
                pattern: p.clone(),
                source,
            })
        })
        .transpose()?;

    let action = match spec.action {
        ActionSpec::Split => OverrideAction::Split,
        ActionSpec::Merge => OverrideAction::Merge,
        ActionSpec::SetPrimary => {
            let primary = spec.primary.ok_or_else(|| {
                ConfigError::InvalidRule("`set-primary` needs a `primary` character".into())
            })?;
            OverrideAction::SetPrimary(primary)
        }
        ActionSpec::SetHitZones => {
            let zones = spec
                .zones
                .as_ref()
                .filter(|z| !z.is_empty())
                .ok_or_else(|| {
                    ConfigError::InvalidRule("`set-hit-zones` needs non-empty `zones`".into())
                })?;
            OverrideAction::SetHitZones(zones.iter().map(|&z| z.into()).collect())
        }
    };

    Ok(OverrideRule {
        word: spec.word.clone(),
        pattern,
        font: spec.font.clone(),
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [text]
        font = "fonts/KhmerOSsiemreap.ttf"
        size = 120.0
        padding = 40.0

        [[override]]
        word = "កា"
        font = "KhmerOSsiemreap"
        action = "merge"

        [[override]]
        pattern = "^ក"
        action = "set-primary"
        primary = "ក"

        [[override]]
        word = "ការ"
        action = "set-hit-zones"
        zones = ["top", "bottom"]
    "#;

    #[test]
    fn parses_sample_config() {
        let config = AksarConfig::parse_str(SAMPLE).unwrap();
        assert_eq!(
            config.text.font.as_deref(),
            Some(Path::new("fonts/KhmerOSsiemreap.ttf"))
        );
        assert_eq!(config.text.size, Some(120.0));
        assert_eq!(config.overrides.len(), 3);
        assert_eq!(config.overrides[0].action, ActionSpec::Merge);
    }

    #[test]
    fn compiles_to_runtime_table() {
        let config = AksarConfig::parse_str(SAMPLE).unwrap();
        let table = config.override_table().unwrap();
        assert_eq!(table.len(), 3);
        let hit = table.lookup("កា", Some("KhmerOSsiemreap")).unwrap();
        assert_eq!(hit.action, OverrideAction::Merge);
        let hit = table.lookup("ការ", None).unwrap();
        assert_eq!(
            hit.action,
            OverrideAction::SetHitZones(vec![ZoneRegion::Top, ZoneRegion::Bottom])
        );
    }

    #[test]
    fn bad_pattern_is_reported() {
        let config = AksarConfig::parse_str(
            r#"
            [[override]]
            pattern = "("
            action = "merge"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.override_table(),
            Err(ConfigError::BadPattern { .. })
        ));
    }

    #[test]
    fn set_primary_requires_a_character() {
        let config = AksarConfig::parse_str(
            r#"
            [[override]]
            word = "ក"
            action = "set-primary"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.override_table(),
            Err(ConfigError::InvalidRule(_))
        ));
    }

    #[test]
    fn rule_without_matcher_is_rejected() {
        let config = AksarConfig::parse_str(
            r#"
            [[override]]
            action = "merge"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.override_table(),
            Err(ConfigError::InvalidRule(_))
        ));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = AksarConfig::parse_str("").unwrap();
        assert!(config.override_table().unwrap().is_empty());
        assert_eq!(config.text.font_index, 0);
    }
}
