//! Queries over one case's full decision history.

use awardline_core::{
  CaseInfo, Decision, DecisionSummary, Month, Period, ReassessableDecision,
  RestrictMode, period::coalesce,
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  current::CurrentEntitlement,
  settings::Settings,
  timeline::{Timeline, coverage},
};

/// Every decision of one case, rejections included.
#[derive(Debug, Clone)]
pub struct CaseHistory {
  case:      CaseInfo,
  decisions: Vec<Decision>,
}

impl CaseHistory {
  /// Fails with [`Error::MixedCases`] if any decision belongs to another
  /// case.
  pub fn new(case: CaseInfo, decisions: Vec<Decision>) -> Result<Self> {
    if let Some(other) =
      decisions.iter().find(|d| d.case().case_id != case.case_id)
    {
      return Err(Error::MixedCases {
        expected: case.case_id,
        found:    other.case().case_id,
      });
    }
    Ok(Self { case, decisions })
  }

  pub fn case(&self) -> &CaseInfo { &self.case }

  pub fn decisions(&self) -> &[Decision] { &self.decisions }

  pub fn reassessable(&self) -> impl Iterator<Item = &ReassessableDecision> {
    self.decisions.iter().filter_map(Decision::as_reassessable)
  }

  fn has_reassessable(&self) -> bool { self.reassessable().next().is_some() }

  /// `None` when the case has no reassessable decisions.
  pub fn current_entitlement(
    &self,
    period: Period,
    as_of: DateTime<Utc>,
  ) -> Result<Option<CurrentEntitlement<'_>>> {
    if !self.has_reassessable() {
      return Ok(None);
    }
    CurrentEntitlement::resolve(self.reassessable(), period, as_of).map(Some)
  }

  /// Current entitlement from `from` to the last month any decision covers.
  /// `None` when nothing is covered from `from` onward.
  pub fn copy_current_entitlement(
    &self,
    from: Month,
    as_of: DateTime<Utc>,
    mode: RestrictMode,
  ) -> Result<Option<CurrentEntitlement<'_>>> {
    let Some(last) = self.reassessable().map(|d| d.period().to()).max() else {
      return Ok(None);
    };
    if last < from {
      return Ok(None);
    }
    let period = Period::new(from, last)?;
    CurrentEntitlement::resolve_with_mode(self.reassessable(), period, as_of, mode)
      .map(Some)
  }

  /// Current entitlement for a reassessment of `period`, in the configured
  /// restriction mode and, if configured, with gaps rejected.
  pub fn current_entitlement_for_reassessment(
    &self,
    period: Period,
    as_of: DateTime<Utc>,
    settings: &Settings,
  ) -> Result<Option<CurrentEntitlement<'_>>> {
    if !self.has_reassessable() {
      return Ok(None);
    }
    let current = CurrentEntitlement::resolve_with_mode(
      self.reassessable(),
      period,
      as_of,
      settings.timeline.mode,
    )?;
    if settings.resolver.require_contiguous {
      current.require_contiguous()?;
    }
    Ok(Some(current))
  }

  /// What governed decision `id`'s period just before it was made: the
  /// decisions created strictly earlier, restricted to its period.
  ///
  /// `None` when no earlier decision exists.
  pub fn historical_grounds_for_decision(
    &self,
    id: Uuid,
    as_of: DateTime<Utc>,
  ) -> Result<Option<CurrentEntitlement<'_>>> {
    let target = match self.decisions.iter().find(|d| d.id() == id) {
      Some(Decision::Reassessable(d)) => d,
      Some(Decision::Rejected(_)) => return Err(Error::NotReassessable(id)),
      None => return Err(Error::DecisionNotFound(id)),
    };
    let cutoff = target.created_at();
    let earlier: Vec<_> = self
      .reassessable()
      .filter(|d| d.created_at() < cutoff)
      .collect();
    if earlier.is_empty() {
      return Ok(None);
    }
    CurrentEntitlement::resolve(earlier, *target.period(), as_of).map(Some)
  }

  /// Periods with payments running, as the minimal set of contiguous
  /// periods.
  pub fn periods_with_ongoing_entitlement(&self) -> Result<Vec<Period>> {
    let timeline = self.full_timeline()?;
    Ok(coalesce(
      timeline
        .segments()
        .iter()
        .filter(|s| !s.is_discontinuation())
        .map(|s| s.period),
    ))
  }

  /// The ongoing-entitlement period containing `today`.
  pub fn current_entitlement_period(
    &self,
    today: NaiveDate,
  ) -> Result<Option<Period>> {
    Ok(
      self
        .periods_with_ongoing_entitlement()?
        .into_iter()
        .find(|p| p.contains_date(today)),
    )
  }

  pub fn has_current_or_future_entitlement(
    &self,
    today: NaiveDate,
  ) -> Result<bool> {
    let month = Month::containing(today);
    Ok(
      self
        .periods_with_ongoing_entitlement()?
        .iter()
        .any(|p| p.to() >= month),
    )
  }

  /// True when the last segment of the case's timeline pays out and ends
  /// together with `period`.
  pub fn entitlement_expires_with(&self, period: &Period) -> Result<bool> {
    let timeline = self.full_timeline()?;
    Ok(
      timeline
        .last()
        .is_some_and(|s| !s.is_discontinuation() && s.period.ends_with(period)),
    )
  }

  pub fn summaries(&self) -> Result<Vec<DecisionSummary>> {
    Ok(
      self
        .reassessable()
        .map(ReassessableDecision::to_summary)
        .collect::<awardline_core::Result<_>>()?,
    )
  }

  /// Span of every reassessable decision's period.
  pub fn coverage(&self) -> Option<Period> {
    coverage(&self.reassessable().collect::<Vec<_>>())
  }

  fn full_timeline(&self) -> Result<Timeline<'_>> {
    Timeline::build_full(self.reassessable(), RestrictMode::ExactSlice)
  }
}
