//! Decision taxonomy.
//!
//! A decision is the immutable, finalized outcome of a proceeding. Variants
//! split into [`ReassessableDecision`]s, which occupy slots on a case's
//! timeline, and [`RejectedDecision`]s, which never do. Every constructor
//! enforces the construction contract through
//! [`ReassessableDecision::validate`] / [`RejectedDecision::validate`]; the
//! same checks run again whenever a decision enters a timeline, so values that
//! arrive through deserialisation are held to the same rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::{
  Error, Result,
  case::CaseInfo,
  conditions::ConditionAssessments,
  grounds::{DeductionType, GroundsData},
  period::Period,
  summary::{DecisionCategory, DecisionSummary, check_initial_application},
};

// ─── Document state ──────────────────────────────────────────────────────────

/// Where the decision letter is in its lifecycle. Declaration order is the
/// order states advance in.
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
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentState {
  NotNeeded,
  NotYetGenerated,
  Generated,
  Journaled,
  Sent,
}

impl DocumentState {
  pub fn is_generated(&self) -> bool { *self >= Self::Generated }

  /// Move to `next`. A letter-less decision stays letter-less and no state
  /// moves backwards, so a generated letter is never generated again.
  pub fn advance_to(self, next: DocumentState) -> Result<DocumentState> {
    let from_not_needed = self == Self::NotNeeded && next != Self::NotNeeded;
    if from_not_needed || next < self {
      return Err(Error::DocumentStateRegression { from: self, to: next });
    }
    Ok(next)
  }
}

// ─── Proceeding ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProceedingKind {
  Application,
  Reassessment,
  Suspension,
  Resumption,
  Adjustment,
}

/// The processing that produced a decision, as it stood when the decision
/// was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proceeding {
  pub id:                  Uuid,
  pub kind:                ProceedingKind,
  pub period:              Period,
  pub sends_letter:        bool,
  /// Waiting for a debt claim from the collection side before the letter
  /// can be written.
  pub awaiting_debt_claim: bool,
  pub grounds:             GroundsData,
  pub conditions:          ConditionAssessments,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Identity of the payment order a decision issued.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PaymentId(pub Uuid);

/// The already-computed benefit calculation a decision carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
  pub id:             Uuid,
  pub monthly_amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionHeader {
  pub id:             Uuid,
  pub created_at:     DateTime<Utc>,
  pub period:         Period,
  pub case:           CaseInfo,
  pub caseworker:     String,
  pub approver:       String,
  pub document_state: DocumentState,
}

/// Input for the decision constructors.
#[derive(Debug, Clone)]
pub struct NewDecision {
  pub created_at:     DateTime<Utc>,
  pub case:           CaseInfo,
  pub caseworker:     String,
  pub approver:       String,
  /// Defaults to the proceeding's period.
  pub period:         Option<Period>,
  /// Defaults to `NotYetGenerated` when the proceeding sends a letter and
  /// `NotNeeded` otherwise.
  pub document_state: Option<DocumentState>,
}

impl NewDecision {
  pub fn new(
    created_at: DateTime<Utc>,
    case: CaseInfo,
    caseworker: impl Into<String>,
    approver: impl Into<String>,
  ) -> Self {
    Self {
      created_at,
      case,
      caseworker: caseworker.into(),
      approver: approver.into(),
      period: None,
      document_state: None,
    }
  }

  pub fn with_document_state(mut self, state: DocumentState) -> Self {
    self.document_state = Some(state);
    self
  }

  pub fn with_period(mut self, period: Period) -> Self {
    self.period = Some(period);
    self
  }

  fn into_header(self, proceeding: &Proceeding) -> DecisionHeader {
    let default_state = if proceeding.sends_letter {
      DocumentState::NotYetGenerated
    } else {
      DocumentState::NotNeeded
    };
    DecisionHeader {
      id:             Uuid::new_v4(),
      created_at:     self.created_at,
      period:         self.period.unwrap_or(proceeding.period),
      case:           self.case,
      caseworker:     self.caseworker,
      approver:       self.approver,
      document_state: self.document_state.unwrap_or(default_state),
    }
  }
}

/// A decision that changes (or confirms) the monthly payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentChange {
  pub header:      DecisionHeader,
  pub proceeding:  Proceeding,
  pub calculation: Calculation,
  pub payment_id:  PaymentId,
}

/// A discontinuation fully absorbed by offsetting an earlier overpayment, so
/// no payment order was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetDiscontinuation {
  pub header:      DecisionHeader,
  pub proceeding:  Proceeding,
  pub calculation: Calculation,
}

/// Suspension or resumption of payments; carries no calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHold {
  pub header:     DecisionHeader,
  pub proceeding: Proceeding,
  pub payment_id: PaymentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoChange {
  pub header:      DecisionHeader,
  pub proceeding:  Proceeding,
  pub calculation: Calculation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
  ConditionsNotMet,
  AmountTooLow,
  AmountZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
  pub header:      DecisionHeader,
  pub proceeding:  Proceeding,
  pub calculation: Option<Calculation>,
  pub reasons:     Vec<RejectionReason>,
}

// ─── Reassessable decisions ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ReassessableDecision {
  ApprovedNewApplication(PaymentChange),
  ApprovedReassessment(PaymentChange),
  DiscontinuedWithPayment(PaymentChange),
  DiscontinuedByOffsetOnly(OffsetDiscontinuation),
  SuspendedPayments(PaymentHold),
  ResumedPayments(PaymentHold),
  ApprovedAdjustment(PaymentChange),
  NoChange(NoChange),
}

impl ReassessableDecision {
  pub fn approved_new_application(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let change = PaymentChange {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
      payment_id,
    };
    Self::ApprovedNewApplication(change).validated()
  }

  pub fn approved_reassessment(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let change = PaymentChange {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
      payment_id,
    };
    Self::ApprovedReassessment(change).validated()
  }

  pub fn discontinued_with_payment(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let change = PaymentChange {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
      payment_id,
    };
    Self::DiscontinuedWithPayment(change).validated()
  }

  pub fn discontinued_by_offset_only(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
  ) -> Result<Self> {
    let discontinuation = OffsetDiscontinuation {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
    };
    Self::DiscontinuedByOffsetOnly(discontinuation).validated()
  }

  pub fn suspended_payments(
    new: NewDecision,
    proceeding: Proceeding,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let hold = PaymentHold {
      header: new.into_header(&proceeding),
      proceeding,
      payment_id,
    };
    Self::SuspendedPayments(hold).validated()
  }

  pub fn resumed_payments(
    new: NewDecision,
    proceeding: Proceeding,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let hold = PaymentHold {
      header: new.into_header(&proceeding),
      proceeding,
      payment_id,
    };
    Self::ResumedPayments(hold).validated()
  }

  pub fn approved_adjustment(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
    payment_id: PaymentId,
  ) -> Result<Self> {
    let change = PaymentChange {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
      payment_id,
    };
    Self::ApprovedAdjustment(change).validated()
  }

  pub fn no_change(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
  ) -> Result<Self> {
    let no_change = NoChange {
      header: new.into_header(&proceeding),
      proceeding,
      calculation,
    };
    Self::NoChange(no_change).validated()
  }

  fn validated(self) -> Result<Self> {
    self.validate()?;
    Ok(self)
  }

  /// Check the construction contract.
  pub fn validate(&self) -> Result<()> {
    let (header, proceeding) = self.parts();
    validate_common(header, proceeding)?;

    let expected = match self {
      Self::ApprovedNewApplication(_) => ProceedingKind::Application,
      Self::ApprovedReassessment(_)
      | Self::DiscontinuedWithPayment(_)
      | Self::DiscontinuedByOffsetOnly(_)
      | Self::NoChange(_) => ProceedingKind::Reassessment,
      Self::SuspendedPayments(_) => ProceedingKind::Suspension,
      Self::ResumedPayments(_) => ProceedingKind::Resumption,
      Self::ApprovedAdjustment(_) => ProceedingKind::Adjustment,
    };
    if proceeding.kind != expected {
      return Err(Error::WrongProceeding {
        expected,
        actual: proceeding.kind,
      });
    }

    match self {
      Self::ApprovedNewApplication(_) => {
        require_letter(header)?;
        proceeding.conditions.require_all_met()
      }
      Self::ApprovedReassessment(_) | Self::ApprovedAdjustment(_) => {
        proceeding.conditions.require_all_met()
      }
      Self::SuspendedPayments(_) | Self::ResumedPayments(_) => {
        if proceeding.sends_letter
          || header.document_state != DocumentState::NotNeeded
        {
          return Err(Error::LetterForbidden(proceeding.kind));
        }
        Ok(())
      }
      Self::DiscontinuedWithPayment(_)
      | Self::DiscontinuedByOffsetOnly(_)
      | Self::NoChange(_) => Ok(()),
    }
  }

  fn parts(&self) -> (&DecisionHeader, &Proceeding) {
    match self {
      Self::ApprovedNewApplication(c)
      | Self::ApprovedReassessment(c)
      | Self::DiscontinuedWithPayment(c)
      | Self::ApprovedAdjustment(c) => (&c.header, &c.proceeding),
      Self::DiscontinuedByOffsetOnly(d) => (&d.header, &d.proceeding),
      Self::SuspendedPayments(h) | Self::ResumedPayments(h) => {
        (&h.header, &h.proceeding)
      }
      Self::NoChange(n) => (&n.header, &n.proceeding),
    }
  }

  pub fn header(&self) -> &DecisionHeader { self.parts().0 }

  pub fn proceeding(&self) -> &Proceeding { self.parts().1 }

  pub fn id(&self) -> Uuid { self.header().id }

  pub fn created_at(&self) -> DateTime<Utc> { self.header().created_at }

  pub fn period(&self) -> &Period { &self.header().period }

  pub fn case(&self) -> &CaseInfo { &self.header().case }

  pub fn document_state(&self) -> DocumentState {
    self.header().document_state
  }

  pub fn grounds(&self) -> &GroundsData { &self.proceeding().grounds }

  pub fn conditions(&self) -> &ConditionAssessments {
    &self.proceeding().conditions
  }

  pub fn category(&self) -> DecisionCategory {
    match self {
      Self::ApprovedNewApplication(_) => DecisionCategory::ApprovedApplication,
      Self::ApprovedReassessment(_) => DecisionCategory::ApprovedReassessment,
      Self::DiscontinuedWithPayment(_) | Self::DiscontinuedByOffsetOnly(_) => {
        DecisionCategory::Discontinuation
      }
      Self::SuspendedPayments(_) => DecisionCategory::Suspension,
      Self::ResumedPayments(_) => DecisionCategory::Resumption,
      Self::ApprovedAdjustment(_) => DecisionCategory::Adjustment,
      Self::NoChange(_) => DecisionCategory::NoChange,
    }
  }

  pub fn is_discontinuation(&self) -> bool {
    self.category().is_discontinuation()
  }

  pub fn is_offset_discontinuation(&self) -> bool {
    matches!(self, Self::DiscontinuedByOffsetOnly(_))
  }

  pub fn is_suspension(&self) -> bool {
    matches!(self, Self::SuspendedPayments(_))
  }

  pub fn is_resumption(&self) -> bool {
    matches!(self, Self::ResumedPayments(_))
  }

  /// `None` for decisions that issued no payment order.
  pub fn payment_id(&self) -> Option<PaymentId> {
    match self {
      Self::ApprovedNewApplication(c)
      | Self::ApprovedReassessment(c)
      | Self::DiscontinuedWithPayment(c)
      | Self::ApprovedAdjustment(c) => Some(c.payment_id),
      Self::SuspendedPayments(h) | Self::ResumedPayments(h) => {
        Some(h.payment_id)
      }
      Self::DiscontinuedByOffsetOnly(_) | Self::NoChange(_) => None,
    }
  }

  /// The payable monthly amount. A no-change decision occupies its slot
  /// without one.
  pub fn monthly_amount(&self) -> Option<u32> {
    match self {
      Self::ApprovedNewApplication(c)
      | Self::ApprovedReassessment(c)
      | Self::DiscontinuedWithPayment(c)
      | Self::ApprovedAdjustment(c) => Some(c.calculation.monthly_amount),
      _ => None,
    }
  }

  /// Whether finalizing this decision should produce a letter now.
  pub fn should_generate_document_on_finalize(&self) -> Result<bool> {
    let (header, proceeding) = self.parts();
    let state = header.document_state;
    match self {
      Self::ApprovedNewApplication(_) => letter_pending(state),
      Self::ApprovedReassessment(_) | Self::NoChange(_) => {
        Ok(state == DocumentState::NotYetGenerated
          && !proceeding.awaiting_debt_claim)
      }
      Self::DiscontinuedWithPayment(_) | Self::DiscontinuedByOffsetOnly(_) => {
        Ok(proceeding.sends_letter
          && !proceeding.awaiting_debt_claim
          && !state.is_generated())
      }
      Self::SuspendedPayments(_)
      | Self::ResumedPayments(_)
      | Self::ApprovedAdjustment(_) => Ok(false),
    }
  }

  /// True while an earlier overpayment is being offset against this
  /// decision's payments.
  pub fn has_ongoing_offset(&self) -> bool {
    self.grounds().has_deduction(DeductionType::OverpaymentOffset)
  }

  pub fn to_summary(&self) -> Result<DecisionSummary> {
    DecisionSummary::new(
      self.created_at(),
      *self.period(),
      self.category(),
      self.case().clone(),
    )
  }
}

// ─── Rejected decisions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RejectedDecision {
  OnConditions(Rejection),
  OnCalculation(Rejection),
}

impl RejectedDecision {
  pub fn on_conditions(
    new: NewDecision,
    proceeding: Proceeding,
    reasons: Vec<RejectionReason>,
  ) -> Result<Self> {
    let rejection = Rejection {
      header: new.into_header(&proceeding),
      proceeding,
      calculation: None,
      reasons,
    };
    let decision = Self::OnConditions(rejection);
    decision.validate()?;
    Ok(decision)
  }

  pub fn on_calculation(
    new: NewDecision,
    proceeding: Proceeding,
    calculation: Calculation,
    reasons: Vec<RejectionReason>,
  ) -> Result<Self> {
    let rejection = Rejection {
      header: new.into_header(&proceeding),
      proceeding,
      calculation: Some(calculation),
      reasons,
    };
    let decision = Self::OnCalculation(rejection);
    decision.validate()?;
    Ok(decision)
  }

  fn rejection(&self) -> &Rejection {
    match self {
      Self::OnConditions(r) | Self::OnCalculation(r) => r,
    }
  }

  pub fn validate(&self) -> Result<()> {
    let rejection = self.rejection();
    validate_common(&rejection.header, &rejection.proceeding)?;
    if rejection.proceeding.kind != ProceedingKind::Application {
      return Err(Error::WrongProceeding {
        expected: ProceedingKind::Application,
        actual:   rejection.proceeding.kind,
      });
    }
    require_letter(&rejection.header)?;
    match self {
      Self::OnConditions(_) => {
        rejection.proceeding.conditions.require_some_unmet()
      }
      Self::OnCalculation(_) => rejection.proceeding.conditions.require_all_met(),
    }
  }

  pub fn id(&self) -> Uuid { self.rejection().header.id }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.rejection().header.created_at
  }

  pub fn case(&self) -> &CaseInfo { &self.rejection().header.case }

  pub fn reasons(&self) -> &[RejectionReason] { &self.rejection().reasons }

  pub fn should_generate_document_on_finalize(&self) -> Result<bool> {
    letter_pending(self.rejection().header.document_state)
  }
}

// ─── Decision ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Decision {
  Reassessable(ReassessableDecision),
  Rejected(RejectedDecision),
}

impl Decision {
  pub fn id(&self) -> Uuid {
    match self {
      Self::Reassessable(d) => d.id(),
      Self::Rejected(d) => d.id(),
    }
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    match self {
      Self::Reassessable(d) => d.created_at(),
      Self::Rejected(d) => d.created_at(),
    }
  }

  pub fn case(&self) -> &CaseInfo {
    match self {
      Self::Reassessable(d) => d.case(),
      Self::Rejected(d) => d.case(),
    }
  }

  pub fn as_reassessable(&self) -> Option<&ReassessableDecision> {
    match self {
      Self::Reassessable(d) => Some(d),
      Self::Rejected(_) => None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    match self {
      Self::Reassessable(d) => d.validate(),
      Self::Rejected(d) => d.validate(),
    }
  }
}

impl From<ReassessableDecision> for Decision {
  fn from(decision: ReassessableDecision) -> Self {
    Self::Reassessable(decision)
  }
}

impl From<RejectedDecision> for Decision {
  fn from(decision: RejectedDecision) -> Self { Self::Rejected(decision) }
}

// ─── Contract helpers ────────────────────────────────────────────────────────

fn validate_common(header: &DecisionHeader, proceeding: &Proceeding) -> Result<()> {
  if header.period != proceeding.period {
    tracing::warn!(
      decision = %header.id,
      "decision period differs from proceeding period"
    );
    return Err(Error::PeriodMismatch {
      decision:   header.period,
      proceeding: proceeding.period,
    });
  }
  if proceeding.sends_letter {
    require_letter(header)?;
  }
  if proceeding.kind == ProceedingKind::Application {
    check_initial_application(&header.period)?;
  }
  Ok(())
}

fn require_letter(header: &DecisionHeader) -> Result<()> {
  if header.document_state == DocumentState::NotNeeded {
    return Err(Error::LetterRequired);
  }
  Ok(())
}

fn letter_pending(state: DocumentState) -> Result<bool> {
  match state {
    DocumentState::NotNeeded => Err(Error::LetterRequired),
    DocumentState::NotYetGenerated => Ok(true),
    DocumentState::Generated | DocumentState::Journaled | DocumentState::Sent => {
      Ok(false)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{
    case::{CaseNumber, PersonId},
    conditions::{AssessmentPeriod, Condition, ConditionType, Outcome},
    grounds::{Beneficiary, DeductionGround},
    period::Month,
  };

  fn m(year: i32, month: u32) -> Month { Month::new(year, month).unwrap() }

  fn case() -> CaseInfo {
    CaseInfo {
      case_id:     Uuid::nil(),
      case_number: CaseNumber(2021),
      person_id:   PersonId::new("12345678901"),
    }
  }

  fn new_decision() -> NewDecision {
    NewDecision::new(
      Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
      case(),
      "caseworker",
      "approver",
    )
  }

  fn conditions(period: Period, outcome: Outcome) -> ConditionAssessments {
    let assessment = AssessmentPeriod {
      id: Uuid::new_v4(),
      created_at: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
      period,
      outcome,
      ground: None,
    };
    ConditionAssessments::new()
      .with(ConditionType::Disability, Condition::evaluated(vec![assessment]))
  }

  fn proceeding(kind: ProceedingKind, period: Period) -> Proceeding {
    Proceeding {
      id: Uuid::new_v4(),
      kind,
      period,
      sends_letter: !matches!(
        kind,
        ProceedingKind::Suspension | ProceedingKind::Resumption
      ),
      awaiting_debt_claim: false,
      grounds: GroundsData::default(),
      conditions: conditions(period, Outcome::Met),
    }
  }

  fn calculation() -> Calculation {
    Calculation { id: Uuid::new_v4(), monthly_amount: 20_000 }
  }

  fn payment() -> PaymentId { PaymentId(Uuid::new_v4()) }

  #[test]
  fn new_application_defaults_to_pending_letter() {
    let year = Period::year(2021).unwrap();
    let decision = ReassessableDecision::approved_new_application(
      new_decision(),
      proceeding(ProceedingKind::Application, year),
      calculation(),
      payment(),
    )
    .unwrap();

    assert_eq!(decision.document_state(), DocumentState::NotYetGenerated);
    assert_eq!(decision.category(), DecisionCategory::ApprovedApplication);
    assert_eq!(decision.monthly_amount(), Some(20_000));
    assert!(decision.should_generate_document_on_finalize().unwrap());
  }

  #[test]
  fn new_application_longer_than_twelve_months_is_rejected() {
    let long = Period::new(m(2021, 1), m(2022, 1)).unwrap();
    let err = ReassessableDecision::approved_new_application(
      new_decision(),
      proceeding(ProceedingKind::Application, long),
      calculation(),
      payment(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InitialApplicationTooLong { months: 13 }));
  }

  #[test]
  fn period_must_match_proceeding() {
    let year = Period::year(2021).unwrap();
    let err = ReassessableDecision::approved_reassessment(
      new_decision().with_period(Period::new(m(2021, 1), m(2021, 6)).unwrap()),
      proceeding(ProceedingKind::Reassessment, year),
      calculation(),
      payment(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::PeriodMismatch { .. }));
  }

  #[test]
  fn letter_bearing_proceeding_rejects_not_needed() {
    let year = Period::year(2021).unwrap();
    let err = ReassessableDecision::approved_reassessment(
      new_decision().with_document_state(DocumentState::NotNeeded),
      proceeding(ProceedingKind::Reassessment, year),
      calculation(),
      payment(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::LetterRequired));
  }

  #[test]
  fn approval_requires_all_conditions_met() {
    let year = Period::year(2021).unwrap();
    let mut unmet = proceeding(ProceedingKind::Reassessment, year);
    unmet.conditions = conditions(year, Outcome::Unmet);

    let err = ReassessableDecision::approved_reassessment(
      new_decision(),
      unmet.clone(),
      calculation(),
      payment(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ConditionsNotMet));

    // Discontinuations carry unmet conditions by nature.
    assert!(
      ReassessableDecision::discontinued_with_payment(
        new_decision(),
        unmet,
        calculation(),
        payment(),
      )
      .is_ok()
    );
  }

  #[test]
  fn suspension_must_not_send_a_letter() {
    let year = Period::year(2021).unwrap();
    let mut with_letter = proceeding(ProceedingKind::Suspension, year);
    with_letter.sends_letter = true;

    let err = ReassessableDecision::suspended_payments(
      new_decision(),
      with_letter,
      payment(),
    )
    .unwrap_err();
    assert!(matches!(
      err,
      Error::LetterForbidden(ProceedingKind::Suspension)
    ));

    let ok = ReassessableDecision::suspended_payments(
      new_decision(),
      proceeding(ProceedingKind::Suspension, year),
      payment(),
    )
    .unwrap();
    assert!(ok.is_suspension());
    assert!(!ok.should_generate_document_on_finalize().unwrap());
  }

  #[test]
  fn variant_requires_matching_proceeding_kind() {
    let year = Period::year(2021).unwrap();
    let err = ReassessableDecision::resumed_payments(
      new_decision(),
      proceeding(ProceedingKind::Suspension, year),
      payment(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::WrongProceeding {
      expected: ProceedingKind::Resumption,
      actual:   ProceedingKind::Suspension,
    }));
  }

  #[test]
  fn no_change_and_offset_only_carry_no_payment() {
    let year = Period::year(2021).unwrap();
    let no_change = ReassessableDecision::no_change(
      new_decision(),
      proceeding(ProceedingKind::Reassessment, year),
      calculation(),
    )
    .unwrap();
    let offset = ReassessableDecision::discontinued_by_offset_only(
      new_decision(),
      proceeding(ProceedingKind::Reassessment, year),
      calculation(),
    )
    .unwrap();

    for decision in [&no_change, &offset] {
      assert_eq!(decision.payment_id(), None);
      assert_eq!(decision.monthly_amount(), None);
    }
    assert!(offset.is_discontinuation());
    assert!(offset.is_offset_discontinuation());
    assert!(!no_change.is_discontinuation());
  }

  #[test]
  fn discontinuation_waits_for_debt_claim() {
    let year = Period::year(2021).unwrap();
    let mut awaiting = proceeding(ProceedingKind::Reassessment, year);
    awaiting.awaiting_debt_claim = true;
    let decision = ReassessableDecision::discontinued_with_payment(
      new_decision(),
      awaiting,
      calculation(),
      payment(),
    )
    .unwrap();
    assert!(!decision.should_generate_document_on_finalize().unwrap());
  }

  #[test]
  fn generated_letter_is_not_generated_again() {
    let year = Period::year(2021).unwrap();
    let decision = ReassessableDecision::approved_reassessment(
      new_decision().with_document_state(DocumentState::Journaled),
      proceeding(ProceedingKind::Reassessment, year),
      calculation(),
      payment(),
    )
    .unwrap();
    assert!(!decision.should_generate_document_on_finalize().unwrap());
  }

  #[test]
  fn document_state_only_advances() {
    let state = DocumentState::NotYetGenerated
      .advance_to(DocumentState::Generated)
      .unwrap();
    assert!(state.is_generated());
    assert!(matches!(
      state.advance_to(DocumentState::NotYetGenerated),
      Err(Error::DocumentStateRegression { .. })
    ));
    assert!(
      DocumentState::NotNeeded
        .advance_to(DocumentState::Generated)
        .is_err()
    );
    assert_eq!(
      DocumentState::Sent.advance_to(DocumentState::Sent).unwrap(),
      DocumentState::Sent
    );
  }

  #[test]
  fn ongoing_offset_follows_deductions() {
    let year = Period::year(2021).unwrap();
    let mut with_offset = proceeding(ProceedingKind::Reassessment, year);
    with_offset.grounds.deductions.push(DeductionGround {
      id: Uuid::new_v4(),
      created_at: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
      period: year,
      deduction_type: DeductionType::OverpaymentOffset,
      monthly_amount: 500,
      beneficiary: Beneficiary::Applicant,
    });
    let decision = ReassessableDecision::approved_reassessment(
      new_decision(),
      with_offset,
      calculation(),
      payment(),
    )
    .unwrap();
    assert!(decision.has_ongoing_offset());
  }

  #[test]
  fn rejections() {
    let year = Period::year(2021).unwrap();
    let mut unmet = proceeding(ProceedingKind::Application, year);
    unmet.conditions = conditions(year, Outcome::Unmet);

    let on_conditions = RejectedDecision::on_conditions(
      new_decision(),
      unmet.clone(),
      vec![RejectionReason::ConditionsNotMet],
    )
    .unwrap();
    assert!(on_conditions.should_generate_document_on_finalize().unwrap());

    let err = RejectedDecision::on_calculation(
      new_decision(),
      unmet,
      calculation(),
      vec![RejectionReason::AmountTooLow],
    )
    .unwrap_err();
    assert!(matches!(err, Error::ConditionsNotMet));

    let err = RejectedDecision::on_conditions(
      new_decision(),
      proceeding(ProceedingKind::Application, year),
      vec![],
    )
    .unwrap_err();
    assert!(matches!(err, Error::NoUnmetCondition));
  }

  #[test]
  fn decision_round_trips_through_json() {
    let year = Period::year(2021).unwrap();
    let decision: Decision = ReassessableDecision::approved_new_application(
      new_decision(),
      proceeding(ProceedingKind::Application, year),
      calculation(),
      payment(),
    )
    .unwrap()
    .into();
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["type"], "reassessable");
    assert_eq!(json["data"]["type"], "approved_new_application");
    let back: Decision = serde_json::from_value(json).unwrap();
    assert_eq!(back, decision);
  }
}
