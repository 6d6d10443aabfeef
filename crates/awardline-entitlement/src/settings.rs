//! Runtime settings, deserialised from an optional TOML file layered with
//! `AWARDLINE_`-prefixed environment variables.
//!
//! Nested keys use a double underscore in the environment, so
//! `AWARDLINE_RESOLVER__REQUIRE_CONTIGUOUS=false` sets
//! `resolver.require_contiguous`.

use std::path::Path;

use awardline_core::RestrictMode;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub log:      LogSettings,
  pub resolver: ResolverSettings,
  pub timeline: TimelineSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
  /// `EnvFilter` directives used when `RUST_LOG` is unset.
  pub filter: String,
}

impl Default for LogSettings {
  fn default() -> Self { Self { filter: "info".to_string() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
  /// Reject current-entitlement views with gaps when resolving for a
  /// reassessment.
  pub require_contiguous: bool,
}

impl Default for ResolverSettings {
  fn default() -> Self { Self { require_contiguous: true } }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
  pub mode: RestrictMode,
}

impl Settings {
  /// Load from `path` (if given and present) and the environment.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings = builder
      .add_source(
        config::Environment::with_prefix("AWARDLINE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()?;
    Ok(settings)
  }

  /// Parse settings from TOML text alone, ignoring the environment.
  pub fn from_toml_str(toml: &str) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()?
      .try_deserialize()?;
    Ok(settings)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.log.filter, "info");
    assert!(settings.resolver.require_contiguous);
    assert_eq!(settings.timeline.mode, RestrictMode::ExactSlice);
  }

  #[test]
  fn empty_toml_gives_defaults() {
    assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
  }

  #[test]
  fn partial_toml_overrides_only_named_keys() {
    let settings = Settings::from_toml_str(
      r#"
        [resolver]
        require_contiguous = false

        [timeline]
        mode = "reseed_for_new_period"
      "#,
    )
    .unwrap();

    assert_eq!(settings.log, LogSettings::default());
    assert!(!settings.resolver.require_contiguous);
    assert_eq!(settings.timeline.mode, RestrictMode::ReseedForNewPeriod);
  }

  #[test]
  fn unknown_mode_is_rejected() {
    let result = Settings::from_toml_str("[timeline]\nmode = \"masked\"\n");
    assert!(result.is_err());
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let path = Path::new("/nonexistent/awardline.toml");
    assert!(Settings::load(Some(path)).is_ok());
  }
}
