//! Current-entitlement resolver.
//!
//! Answers "what governs this period right now, and what did it rely on?"
//! for a reassessment that is about to start.

use std::collections::BTreeMap;

use awardline_core::{
  AssessmentPeriod, Condition, ConditionAssessments, ConditionType,
  GroundsData, Month, Period, ReassessableDecision, RestrictMode,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result, timeline::Timeline};

/// The governing decisions for a period, as seen at `as_of`.
#[derive(Debug, Clone)]
pub struct CurrentEntitlement<'a> {
  period:   Period,
  as_of:    DateTime<Utc>,
  timeline: Timeline<'a>,
}

impl<'a> CurrentEntitlement<'a> {
  pub fn resolve<I>(
    decisions: I,
    period: Period,
    as_of: DateTime<Utc>,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = &'a ReassessableDecision>,
  {
    Self::resolve_with_mode(decisions, period, as_of, RestrictMode::ExactSlice)
  }

  pub fn resolve_with_mode<I>(
    decisions: I,
    period: Period,
    as_of: DateTime<Utc>,
    mode: RestrictMode,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = &'a ReassessableDecision>,
  {
    let timeline = Timeline::build(decisions, &period, mode)?;
    Ok(Self { period, as_of, timeline })
  }

  pub fn period(&self) -> &Period { &self.period }

  pub fn as_of(&self) -> DateTime<Utc> { self.as_of }

  pub fn timeline(&self) -> &Timeline<'a> { &self.timeline }

  pub fn decision_governing(
    &self,
    date: NaiveDate,
  ) -> Option<&'a ReassessableDecision> {
    self.timeline.governing_at(date)
  }

  pub fn governing_for_month(
    &self,
    month: Month,
  ) -> Option<&'a ReassessableDecision> {
    self.timeline.governing_for_month(month)
  }

  /// Every segment's conditions stitched into one set covering the whole
  /// timeline.
  ///
  /// The disability condition must be evaluated in every segment, since it
  /// owns the disability grounds.
  pub fn merged_condition_assessments(&self) -> Result<ConditionAssessments> {
    let mut merged: BTreeMap<ConditionType, Vec<AssessmentPeriod>> =
      BTreeMap::new();

    for segment in self.timeline.segments() {
      if !segment.conditions.disability().is_evaluated() {
        tracing::warn!(
          period = %segment.period,
          decision = %segment.decision.id(),
          "disability condition not evaluated"
        );
        return Err(Error::DisabilityNotEvaluated(segment.period));
      }
      for (kind, condition) in segment.conditions.iter() {
        merged
          .entry(kind)
          .or_default()
          .extend(condition.periods().iter().cloned());
      }
    }

    Ok(merged.into_iter().fold(
      ConditionAssessments::new(),
      |acc, (kind, periods)| acc.with(kind, Condition::evaluated(periods)),
    ))
  }

  /// Every segment's grounds flattened into one set.
  ///
  /// Disability grounds come from the merged disability condition. Deduction
  /// and residency grounds get fresh identities stamped with `as_of`.
  pub fn merged_grounds_data(&self) -> Result<GroundsData> {
    let disability = self.merged_condition_assessments()?.disability_grounds();
    let segments = self.timeline.segments();
    let grounds = GroundsData {
      disability,
      deductions: segments
        .iter()
        .flat_map(|s| s.grounds.deductions.iter().cloned())
        .collect(),
      residency: segments
        .iter()
        .flat_map(|s| s.grounds.residency.iter().cloned())
        .collect(),
    };
    Ok(grounds.reissue(self.as_of))
  }

  pub fn is_contiguous(&self) -> bool { self.timeline.is_contiguous() }

  pub fn require_contiguous(&self) -> Result<()> {
    match self.timeline.first_gap() {
      Some((before, after)) => {
        tracing::warn!(%before, %after, "gap in current entitlement");
        Err(Error::NonContiguousTimeline { before, after })
      }
      None => Ok(()),
    }
  }

  pub fn contains_discontinuation(&self) -> bool {
    self.timeline.segments().iter().any(|s| s.is_discontinuation())
  }

  pub fn contains_offset_discontinuation(&self) -> bool {
    self
      .timeline
      .segments()
      .iter()
      .any(|s| s.decision.is_offset_discontinuation())
  }
}
