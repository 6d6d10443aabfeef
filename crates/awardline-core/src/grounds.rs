//! Grounds data: the periodized input facts a decision relied on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use crate::period::Period;

// ─── Restriction ─────────────────────────────────────────────────────────────

/// Narrow a periodized value to a sub-period.
///
/// Returns `None` when the value has no months inside `period`.
pub trait RestrictToPeriod: Sized {
  fn restrict_to(&self, period: &Period) -> Option<Self>;
}

/// How grounds are carried into a timeline segment.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RestrictMode {
  /// Slice every item to the segment, unchanged otherwise.
  #[default]
  ExactSlice,
  /// Slice as above and drop items derived from other grounds, so a new
  /// proceeding recomputes them.
  ReseedForNewPeriod,
}

// ─── Disability ──────────────────────────────────────────────────────────────

/// Degree of disability and expected income, owned 1:1 by an assessment
/// period of the disability condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabilityGround {
  pub id:              Uuid,
  pub created_at:      DateTime<Utc>,
  pub period:          Period,
  /// Percentage, `0..=100`.
  pub degree:          u8,
  /// Expected yearly income, in whole currency units.
  pub expected_income: u32,
}

impl RestrictToPeriod for DisabilityGround {
  fn restrict_to(&self, period: &Period) -> Option<Self> {
    let period = self.period.intersection(period)?;
    Some(Self { period, ..self.clone() })
  }
}

// ─── Deductions ──────────────────────────────────────────────────────────────

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
pub enum DeductionType {
  EmploymentIncome,
  /// Copied from the disability ground's expected income.
  ExpectedIncome,
  PublicPension,
  OccupationalPension,
  CapitalIncome,
  ChildSupport,
  /// Recovery of a previous overpayment against ongoing payments.
  OverpaymentOffset,
  Other,
}

impl DeductionType {
  /// True for deduction types computed from other grounds rather than
  /// entered directly.
  pub fn is_derived(&self) -> bool { matches!(self, Self::ExpectedIncome) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beneficiary {
  Applicant,
  Spouse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionGround {
  pub id:             Uuid,
  pub created_at:     DateTime<Utc>,
  pub period:         Period,
  pub deduction_type: DeductionType,
  pub monthly_amount: u32,
  pub beneficiary:    Beneficiary,
}

impl RestrictToPeriod for DeductionGround {
  fn restrict_to(&self, period: &Period) -> Option<Self> {
    let period = self.period.intersection(period)?;
    Some(Self { period, ..self.clone() })
  }
}

// ─── Residency ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingSituation {
  LivesAlone,
  SharesWithOtherAdults,
  WithSpouse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidencyGround {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub period:     Period,
  pub situation:  HousingSituation,
}

impl RestrictToPeriod for ResidencyGround {
  fn restrict_to(&self, period: &Period) -> Option<Self> {
    let period = self.period.intersection(period)?;
    Some(Self { period, ..self.clone() })
  }
}

// ─── Grounds data ────────────────────────────────────────────────────────────

/// Every grounds item a proceeding fed into its decision.
///
/// Disability grounds are listed here for completeness but are owned by the
/// disability condition's assessment periods; see
/// [`ConditionAssessments::disability_grounds`](crate::conditions::ConditionAssessments::disability_grounds).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundsData {
  pub disability: Vec<DisabilityGround>,
  pub deductions: Vec<DeductionGround>,
  pub residency:  Vec<ResidencyGround>,
}

impl GroundsData {
  /// Slice every item to `period`, dropping those with no overlap.
  pub fn restrict(&self, period: &Period, mode: RestrictMode) -> Self {
    let deductions = self
      .deductions
      .iter()
      .filter(|d| {
        mode == RestrictMode::ExactSlice || !d.deduction_type.is_derived()
      })
      .filter_map(|d| d.restrict_to(period))
      .collect();

    Self {
      disability: restrict_all(&self.disability, period),
      deductions,
      residency: restrict_all(&self.residency, period),
    }
  }

  pub fn has_deduction(&self, deduction_type: DeductionType) -> bool {
    self.deductions.iter().any(|d| d.deduction_type == deduction_type)
  }

  /// Give every deduction and residency item a fresh identity stamped with
  /// `as_of`. Disability grounds keep theirs.
  pub fn reissue(self, as_of: DateTime<Utc>) -> Self {
    Self {
      disability: self.disability,
      deductions: self
        .deductions
        .into_iter()
        .map(|d| DeductionGround {
          id: Uuid::new_v4(),
          created_at: as_of,
          ..d
        })
        .collect(),
      residency:  self
        .residency
        .into_iter()
        .map(|r| ResidencyGround {
          id: Uuid::new_v4(),
          created_at: as_of,
          ..r
        })
        .collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.disability.is_empty()
      && self.deductions.is_empty()
      && self.residency.is_empty()
  }
}

pub(crate) fn restrict_all<T: RestrictToPeriod>(
  items: &[T],
  period: &Period,
) -> Vec<T> {
  items.iter().filter_map(|item| item.restrict_to(period)).collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::period::Month;

  fn m(year: i32, month: u32) -> Month { Month::new(year, month).unwrap() }

  fn ts() -> DateTime<Utc> { Utc.timestamp_opt(1_600_000_000, 0).unwrap() }

  fn deduction(kind: DeductionType, period: Period) -> DeductionGround {
    DeductionGround {
      id: Uuid::new_v4(),
      created_at: ts(),
      period,
      deduction_type: kind,
      monthly_amount: 1_000,
      beneficiary: Beneficiary::Applicant,
    }
  }

  fn sample() -> GroundsData {
    let year = Period::year(2021).unwrap();
    GroundsData {
      disability: vec![DisabilityGround {
        id: Uuid::new_v4(),
        created_at: ts(),
        period: year,
        degree: 100,
        expected_income: 12_000,
      }],
      deductions: vec![
        deduction(DeductionType::ExpectedIncome, year),
        deduction(
          DeductionType::PublicPension,
          Period::new(m(2021, 1), m(2021, 3)).unwrap(),
        ),
      ],
      residency:  vec![ResidencyGround {
        id: Uuid::new_v4(),
        created_at: ts(),
        period: year,
        situation: HousingSituation::LivesAlone,
      }],
    }
  }

  #[test]
  fn exact_slice_trims_and_drops_non_overlapping() {
    let slice = Period::new(m(2021, 4), m(2021, 6)).unwrap();
    let restricted = sample().restrict(&slice, RestrictMode::ExactSlice);

    assert_eq!(restricted.deductions.len(), 1, "pension ends in March");
    assert_eq!(
      restricted.deductions[0].deduction_type,
      DeductionType::ExpectedIncome
    );
    assert!(restricted.disability.iter().all(|d| d.period == slice));
    assert!(restricted.residency.iter().all(|r| r.period == slice));
  }

  #[test]
  fn reseed_drops_derived_deductions() {
    let slice = Period::new(m(2021, 1), m(2021, 2)).unwrap();
    let restricted =
      sample().restrict(&slice, RestrictMode::ReseedForNewPeriod);

    assert!(!restricted.has_deduction(DeductionType::ExpectedIncome));
    assert!(restricted.has_deduction(DeductionType::PublicPension));
  }

  #[test]
  fn reissue_stamps_new_identities() {
    let original = sample();
    let later = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let reissued = original.clone().reissue(later);

    assert_eq!(reissued.disability, original.disability);
    for (new, old) in reissued.deductions.iter().zip(&original.deductions) {
      assert_ne!(new.id, old.id);
      assert_eq!(new.created_at, later);
      assert_eq!(new.period, old.period);
    }
    assert!(reissued.residency.iter().all(|r| r.created_at == later));
  }

  #[test]
  fn only_expected_income_is_derived() {
    use strum::IntoEnumIterator;
    let derived: Vec<_> =
      DeductionType::iter().filter(DeductionType::is_derived).collect();
    assert_eq!(derived, vec![DeductionType::ExpectedIncome]);
  }
}
