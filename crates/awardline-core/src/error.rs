//! Error types for `awardline-core`.

use thiserror::Error;

use crate::{
  decision::{DocumentState, ProceedingKind},
  period::{Month, Period},
};

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The caller supplied malformed input (a reversed period, a bad month).
  InvalidInput,
  /// A domain rule was broken. Indicates a programming or data-integrity
  /// defect upstream; callers are expected to abort the operation.
  InvariantViolation,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid month: {year}-{month}")]
  InvalidMonth { year: i32, month: u32 },

  #[error("cannot parse month from {0:?}, expected YYYY-MM")]
  MonthParse(String),

  #[error("period starts after it ends: {from}..{to}")]
  InvalidPeriod { from: Month, to: Month },

  #[error("decision period {decision} differs from proceeding period {proceeding}")]
  PeriodMismatch { decision: Period, proceeding: Period },

  #[error("proceeding requires a letter but document state is not_needed")]
  LetterRequired,

  #[error("{0} proceedings must not send a letter")]
  LetterForbidden(ProceedingKind),

  #[error("decision requires every condition to be met")]
  ConditionsNotMet,

  #[error("rejection on conditions requires at least one unmet condition")]
  NoUnmetCondition,

  #[error("initial application spans {months} months, at most 12 allowed")]
  InitialApplicationTooLong { months: u32 },

  #[error("document state cannot move from {from} to {to}")]
  DocumentStateRegression { from: DocumentState, to: DocumentState },

  #[error("expected a {expected} proceeding, got {actual}")]
  WrongProceeding {
    expected: ProceedingKind,
    actual:   ProceedingKind,
  },
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidMonth { .. } | Self::MonthParse(_) | Self::InvalidPeriod { .. } => {
        ErrorKind::InvalidInput
      }
      _ => ErrorKind::InvariantViolation,
    }
  }

  pub fn is_invariant_violation(&self) -> bool {
    self.kind() == ErrorKind::InvariantViolation
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
