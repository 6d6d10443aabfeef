//! Core domain types for the Awardline benefit decision engine.
//!
//! This crate is deliberately free of configuration and I/O. It defines the
//! month/period algebra, the decision taxonomy with its construction
//! contract, and the grounds and condition data decisions carry. The
//! timeline and entitlement views live in `awardline-entitlement`.

pub mod case;
pub mod conditions;
pub mod decision;
pub mod error;
pub mod grounds;
pub mod period;
pub mod summary;

pub use self::{
  case::{CaseInfo, CaseNumber, PersonId},
  conditions::{
    AssessmentPeriod, Condition, ConditionAssessments, ConditionType, Outcome,
    OverallOutcome,
  },
  decision::{
    Calculation, Decision, DecisionHeader, DocumentState, NewDecision,
    PaymentId, Proceeding, ProceedingKind, ReassessableDecision,
    RejectedDecision, RejectionReason,
  },
  error::{Error, ErrorKind, Result},
  grounds::{
    Beneficiary, DeductionGround, DeductionType, DisabilityGround,
    GroundsData, HousingSituation, ResidencyGround, RestrictMode,
    RestrictToPeriod,
  },
  period::{Month, Period},
  summary::{DecisionCategory, DecisionSummary, MAX_INITIAL_APPLICATION_MONTHS},
};
