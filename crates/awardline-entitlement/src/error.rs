//! Error type for `awardline-entitlement`.

use awardline_core::Period;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] awardline_core::Error),

  #[error("case {case_id} has two decisions created at {created_at}")]
  DuplicateCreatedAt {
    case_id:    Uuid,
    created_at: DateTime<Utc>,
  },

  #[error("decision for case {found} mixed into case {expected}")]
  MixedCases { expected: Uuid, found: Uuid },

  #[error("decision {0} is a rejection and cannot enter a timeline")]
  NotReassessable(Uuid),

  #[error("timeline segments overlap: {first} and {second}")]
  OverlappingSegments { first: Period, second: Period },

  #[error("timeline has a gap between {before} and {after}")]
  NonContiguousTimeline { before: Period, after: Period },

  #[error("disability condition not evaluated for {0}")]
  DisabilityNotEvaluated(Period),

  #[error("decision not found: {0}")]
  DecisionNotFound(Uuid),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid log filter: {0}")]
  LogFilter(#[from] tracing_subscriber::filter::ParseError),

  #[error("failed to install tracing subscriber: {0}")]
  Telemetry(String),
}

impl Error {
  /// True for broken domain rules, as opposed to bad input, lookups that
  /// came up empty, or environment problems.
  pub fn is_invariant_violation(&self) -> bool {
    match self {
      Self::Core(e) => e.is_invariant_violation(),
      Self::DuplicateCreatedAt { .. }
      | Self::MixedCases { .. }
      | Self::NotReassessable(_)
      | Self::OverlappingSegments { .. }
      | Self::NonContiguousTimeline { .. }
      | Self::DisabilityNotEvaluated(_) => true,
      Self::DecisionNotFound(_)
      | Self::Config(_)
      | Self::LogFilter(_)
      | Self::Telemetry(_) => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
