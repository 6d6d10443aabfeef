//! Lightweight decision projection used for cross-case reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{Error, Result, case::CaseInfo, period::Period};

/// Longest period an initial application may be granted for.
pub const MAX_INITIAL_APPLICATION_MONTHS: u32 = 12;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecisionCategory {
  ApprovedApplication,
  ApprovedReassessment,
  Discontinuation,
  Suspension,
  Resumption,
  Adjustment,
  NoChange,
}

impl DecisionCategory {
  pub fn is_discontinuation(&self) -> bool {
    matches!(self, Self::Discontinuation)
  }
}

/// Creation time, period, category and case identity of a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDecisionSummary")]
pub struct DecisionSummary {
  created_at: DateTime<Utc>,
  period:     Period,
  category:   DecisionCategory,
  case:       CaseInfo,
}

#[derive(Deserialize)]
struct RawDecisionSummary {
  created_at: DateTime<Utc>,
  period:     Period,
  category:   DecisionCategory,
  case:       CaseInfo,
}

impl TryFrom<RawDecisionSummary> for DecisionSummary {
  type Error = Error;

  fn try_from(raw: RawDecisionSummary) -> Result<Self> {
    Self::new(raw.created_at, raw.period, raw.category, raw.case)
  }
}

impl DecisionSummary {
  /// Rejects approved initial applications spanning more than
  /// [`MAX_INITIAL_APPLICATION_MONTHS`].
  pub fn new(
    created_at: DateTime<Utc>,
    period: Period,
    category: DecisionCategory,
    case: CaseInfo,
  ) -> Result<Self> {
    if category == DecisionCategory::ApprovedApplication {
      check_initial_application(&period)?;
    }
    Ok(Self { created_at, period, category, case })
  }

  pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

  pub fn period(&self) -> &Period { &self.period }

  pub fn category(&self) -> DecisionCategory { self.category }

  pub fn case(&self) -> &CaseInfo { &self.case }
}

pub(crate) fn check_initial_application(period: &Period) -> Result<()> {
  let months = period.month_count();
  if months > MAX_INITIAL_APPLICATION_MONTHS {
    tracing::warn!(%period, months, "initial application period too long");
    return Err(Error::InitialApplicationTooLong { months });
  }
  Ok(())
}
