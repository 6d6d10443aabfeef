//! Tracing subscriber setup for hosts embedding the engine.
//!
//! The library only emits events; nothing here runs unless the host calls
//! [`init`].

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result, settings::LogSettings};

/// Build the filter: `RUST_LOG` when set, otherwise the configured
/// directives, with `info` for anything neither names.
pub fn env_filter(settings: &LogSettings) -> Result<EnvFilter> {
  let directives = std::env::var(EnvFilter::DEFAULT_ENV)
    .ok()
    .filter(|d| !d.is_empty())
    .unwrap_or_else(|| settings.filter.clone());
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .parse(directives)?;
  Ok(filter)
}

/// Install a global fmt subscriber. Fails if one is already installed.
pub fn init(settings: &LogSettings) -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter(settings)?)
    .try_init()
    .map_err(|e| Error::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_malformed_directives() {
    if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
      return;
    }
    let settings = LogSettings { filter: "awardline=loud".to_string() };
    assert!(matches!(env_filter(&settings), Err(Error::LogFilter(_))));
  }

  #[test]
  fn second_init_fails() {
    let settings = LogSettings::default();
    let _ = init(&settings);
    assert!(matches!(init(&settings), Err(Error::Telemetry(_))));
  }
}
