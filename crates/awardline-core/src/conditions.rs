//! Condition assessments: periodized evaluations of the legal conditions for
//! entitlement.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use crate::{
  Error, Result,
  grounds::{DisabilityGround, RestrictToPeriod, restrict_all},
  period::Period,
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumIter,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConditionType {
  Disability,
  LawfulResidence,
  Assets,
  Abroad,
  PersonalAppearance,
  DutyToInform,
  Institution,
  FixedAbode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Met,
  Unmet,
}

// ─── Assessment periods ──────────────────────────────────────────────────────

/// One evaluated slice of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentPeriod {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub period:     Period,
  pub outcome:    Outcome,
  /// Set only for the disability condition.
  pub ground:     Option<DisabilityGround>,
}

impl RestrictToPeriod for AssessmentPeriod {
  fn restrict_to(&self, period: &Period) -> Option<Self> {
    let sliced = self.period.intersection(period)?;
    Some(Self {
      period: sliced,
      ground: self.ground.as_ref().and_then(|g| g.restrict_to(&sliced)),
      ..self.clone()
    })
  }
}

// ─── Condition ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Condition {
  #[default]
  NotEvaluated,
  Evaluated { periods: Vec<AssessmentPeriod> },
}

impl Condition {
  /// An evaluated condition; an empty list is treated as not evaluated.
  pub fn evaluated(periods: Vec<AssessmentPeriod>) -> Self {
    if periods.is_empty() {
      Self::NotEvaluated
    } else {
      Self::Evaluated { periods }
    }
  }

  pub fn is_evaluated(&self) -> bool { matches!(self, Self::Evaluated { .. }) }

  /// `Unmet` if any period is unmet, `Met` if all are met, `None` when not
  /// evaluated.
  pub fn outcome(&self) -> Option<Outcome> {
    match self {
      Self::NotEvaluated => None,
      Self::Evaluated { periods } => {
        if periods.iter().any(|p| p.outcome == Outcome::Unmet) {
          Some(Outcome::Unmet)
        } else {
          Some(Outcome::Met)
        }
      }
    }
  }

  pub fn periods(&self) -> &[AssessmentPeriod] {
    match self {
      Self::NotEvaluated => &[],
      Self::Evaluated { periods } => periods,
    }
  }

  /// A condition with no assessment inside `period` becomes not evaluated.
  pub fn restricted_to(&self, period: &Period) -> Self {
    Self::evaluated(restrict_all(self.periods(), period))
  }
}

static NOT_EVALUATED: Condition = Condition::NotEvaluated;

// ─── Condition assessments ───────────────────────────────────────────────────

/// The combined verdict over every assessed condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallOutcome {
  AllMet,
  SomeUnmet,
  /// Nothing assessed, or some condition still not evaluated.
  Undetermined,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionAssessments {
  conditions: BTreeMap<ConditionType, Condition>,
}

impl ConditionAssessments {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, kind: ConditionType, condition: Condition) -> Self {
    self.conditions.insert(kind, condition);
    self
  }

  pub fn insert(&mut self, kind: ConditionType, condition: Condition) {
    self.conditions.insert(kind, condition);
  }

  /// Missing condition types read as not evaluated.
  pub fn get(&self, kind: ConditionType) -> &Condition {
    self.conditions.get(&kind).unwrap_or(&NOT_EVALUATED)
  }

  pub fn iter(&self) -> impl Iterator<Item = (ConditionType, &Condition)> {
    self.conditions.iter().map(|(kind, c)| (*kind, c))
  }

  pub fn is_empty(&self) -> bool { self.conditions.is_empty() }

  pub fn disability(&self) -> &Condition { self.get(ConditionType::Disability) }

  /// The disability grounds owned by the disability condition's assessment
  /// periods, in assessment order.
  pub fn disability_grounds(&self) -> Vec<DisabilityGround> {
    self
      .disability()
      .periods()
      .iter()
      .filter_map(|p| p.ground.clone())
      .collect()
  }

  pub fn restricted_to(&self, period: &Period) -> Self {
    Self {
      conditions: self
        .conditions
        .iter()
        .map(|(kind, c)| (*kind, c.restricted_to(period)))
        .collect(),
    }
  }

  pub fn overall(&self) -> OverallOutcome {
    let outcomes: Vec<_> =
      self.conditions.values().map(Condition::outcome).collect();
    if outcomes.contains(&Some(Outcome::Unmet)) {
      OverallOutcome::SomeUnmet
    } else if !outcomes.is_empty() && outcomes.iter().all(Option::is_some) {
      OverallOutcome::AllMet
    } else {
      OverallOutcome::Undetermined
    }
  }

  pub fn require_all_met(&self) -> Result<()> {
    match self.overall() {
      OverallOutcome::AllMet => Ok(()),
      _ => Err(Error::ConditionsNotMet),
    }
  }

  pub fn require_some_unmet(&self) -> Result<()> {
    match self.overall() {
      OverallOutcome::SomeUnmet => Ok(()),
      _ => Err(Error::NoUnmetCondition),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::period::Month;

  fn m(year: i32, month: u32) -> Month { Month::new(year, month).unwrap() }

  fn assessment(period: Period, outcome: Outcome) -> AssessmentPeriod {
    AssessmentPeriod {
      id: Uuid::new_v4(),
      created_at: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
      period,
      outcome,
      ground: None,
    }
  }

  fn disability_assessment(period: Period) -> AssessmentPeriod {
    let created_at = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    AssessmentPeriod {
      ground: Some(DisabilityGround {
        id: Uuid::new_v4(),
        created_at,
        period,
        degree: 60,
        expected_income: 0,
      }),
      ..assessment(period, Outcome::Met)
    }
  }

  #[test]
  fn missing_condition_reads_as_not_evaluated() {
    let assessments = ConditionAssessments::new();
    assert!(!assessments.get(ConditionType::Assets).is_evaluated());
    assert_eq!(assessments.overall(), OverallOutcome::Undetermined);
  }

  #[test]
  fn overall_outcome() {
    let year = Period::year(2021).unwrap();
    let all_met = ConditionAssessments::new()
      .with(
        ConditionType::Disability,
        Condition::evaluated(vec![assessment(year, Outcome::Met)]),
      )
      .with(
        ConditionType::Assets,
        Condition::evaluated(vec![assessment(year, Outcome::Met)]),
      );
    assert_eq!(all_met.overall(), OverallOutcome::AllMet);
    assert!(all_met.require_all_met().is_ok());
    assert!(all_met.require_some_unmet().is_err());

    let one_unmet = all_met.clone().with(
      ConditionType::Abroad,
      Condition::evaluated(vec![assessment(year, Outcome::Unmet)]),
    );
    assert_eq!(one_unmet.overall(), OverallOutcome::SomeUnmet);
    assert!(matches!(
      one_unmet.require_all_met(),
      Err(Error::ConditionsNotMet)
    ));

    let pending = all_met.with(ConditionType::Institution, Condition::NotEvaluated);
    assert_eq!(pending.overall(), OverallOutcome::Undetermined);
  }

  #[test]
  fn restriction_slices_periods_and_owned_grounds() {
    let year = Period::year(2021).unwrap();
    let slice = Period::new(m(2021, 3), m(2021, 5)).unwrap();
    let assessments = ConditionAssessments::new().with(
      ConditionType::Disability,
      Condition::evaluated(vec![disability_assessment(year)]),
    );

    let restricted = assessments.restricted_to(&slice);
    let periods = restricted.disability().periods();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].period, slice);
    assert_eq!(restricted.disability_grounds()[0].period, slice);
  }

  #[test]
  fn restriction_outside_coverage_is_not_evaluated() {
    let first_half = Period::new(m(2021, 1), m(2021, 6)).unwrap();
    let condition =
      Condition::evaluated(vec![assessment(first_half, Outcome::Met)]);
    let restricted = condition.restricted_to(&Period::year(2022).unwrap());
    assert_eq!(restricted, Condition::NotEvaluated);
  }
}
