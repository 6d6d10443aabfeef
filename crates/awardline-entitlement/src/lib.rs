//! Timeline and entitlement views over Awardline decisions.
//!
//! Everything here is a pure, synchronous computation over a borrowed
//! snapshot of decisions; views are recomputed on demand and never cached.
//!
//! - [`timeline`] reduces overlapping decisions to non-overlapping segments.
//! - [`current`] resolves the governing decisions, grounds and conditions
//!   for a reassessment.
//! - [`monthly`] answers month-level reporting queries across cases.
//! - [`case`] bundles the per-case queries a workflow needs.

pub mod case;
pub mod current;
pub mod error;
pub mod monthly;
pub mod settings;
pub mod telemetry;
pub mod timeline;


use awardline_core::{Period, ReassessableDecision, RestrictMode};
use chrono::{DateTime, Utc};

pub use self::{
  case::CaseHistory,
  current::CurrentEntitlement,
  error::{Error, Result},
  monthly::{
    CaseMonths, EntitledFromOnward, MonthlyEntitlement, case_month_categories,
    monthly_entitlement, monthly_entitlement_from_onward,
  },
  settings::Settings,
  timeline::{Segment, Timeline},
};

/// Segments of `period` governed by `decisions`, restricted exactly to each
/// slice.
pub fn build_timeline<'a>(
  decisions: &'a [ReassessableDecision],
  period: &Period,
) -> Result<Vec<Segment<'a>>> {
  Timeline::build(decisions, period, RestrictMode::ExactSlice)
    .map(Timeline::into_segments)
}

pub fn resolve_current_entitlement(
  decisions: &[ReassessableDecision],
  period: Period,
  as_of: DateTime<Utc>,
) -> Result<CurrentEntitlement<'_>> {
  CurrentEntitlement::resolve(decisions, period, as_of)
}
