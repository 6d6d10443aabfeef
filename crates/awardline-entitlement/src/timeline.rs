//! Timeline builder.
//!
//! Reduces a case's unordered, possibly overlapping reassessable decisions to
//! ordered, non-overlapping segments, each governed by exactly one decision.
//! Decisions are overlaid in creation order, so for every month the most
//! recently created covering decision wins.

use awardline_core::{
  ConditionAssessments, Decision, GroundsData, Month, Period,
  ReassessableDecision, RestrictMode,
  period::{first_gap, first_overlap},
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── Segment ─────────────────────────────────────────────────────────────────

/// A period slice and the single decision governing it.
///
/// Grounds and conditions are the governing decision's, restricted to
/// exactly `period`.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
  pub period:     Period,
  pub decision:   &'a ReassessableDecision,
  pub grounds:    GroundsData,
  pub conditions: ConditionAssessments,
}

impl Segment<'_> {
  /// Creation time of the governing decision. Slicing never changes it.
  pub fn created_at(&self) -> DateTime<Utc> { self.decision.created_at() }

  pub fn is_discontinuation(&self) -> bool {
    self.decision.is_discontinuation()
  }
}

// ─── Timeline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Timeline<'a> {
  segments: Vec<Segment<'a>>,
}

impl<'a> Timeline<'a> {
  /// Build the timeline for `period` from the decisions of one case.
  ///
  /// Fails when any decision breaks its construction contract, when the
  /// decisions span more than one case, or when two share a creation time.
  pub fn build<I>(decisions: I, period: &Period, mode: RestrictMode) -> Result<Self>
  where
    I: IntoIterator<Item = &'a ReassessableDecision>,
  {
    let ordered = prepare(decisions)?;

    let mut slots: Vec<(Period, &'a ReassessableDecision)> = Vec::new();
    for decision in &ordered {
      let incoming = *decision.period();
      slots = slots
        .into_iter()
        .flat_map(|(existing, owner)| {
          let rest = existing.minus(&incoming);
          if rest.len() != 1 || rest[0] != existing {
            tracing::trace!(
              %existing,
              %incoming,
              remainders = rest.len(),
              "overlay split"
            );
          }
          rest.into_iter().map(move |p| (p, owner))
        })
        .collect();
      slots.push((incoming, *decision));
    }

    let mut slots: Vec<_> = slots
      .into_iter()
      .filter_map(|(p, d)| p.intersection(period).map(|p| (p, d)))
      .collect();
    slots.sort_by_key(|(p, _)| *p);

    let periods: Vec<Period> = slots.iter().map(|(p, _)| *p).collect();
    if let Some((first, second)) = first_overlap(&periods) {
      tracing::warn!(%first, %second, "timeline segments overlap");
      return Err(Error::OverlappingSegments { first, second });
    }

    let segments: Vec<Segment<'a>> = slots
      .into_iter()
      .map(|(p, decision)| Segment {
        period: p,
        decision,
        grounds: decision.grounds().restrict(&p, mode),
        conditions: decision.conditions().restricted_to(&p),
      })
      .collect();

    tracing::debug!(
      decisions = ordered.len(),
      %period,
      segments = segments.len(),
      "built timeline"
    );
    Ok(Self { segments })
  }

  /// Like [`Timeline::build`], over a case's full decision list. Fails with
  /// [`Error::NotReassessable`] on the first rejection.
  pub fn from_decisions(
    decisions: &'a [Decision],
    period: &Period,
    mode: RestrictMode,
  ) -> Result<Self> {
    let reassessable = decisions
      .iter()
      .map(|d| d.as_reassessable().ok_or(Error::NotReassessable(d.id())))
      .collect::<Result<Vec<_>>>()?;
    Self::build(reassessable, period, mode)
  }

  /// Timeline from `from` to the last month any decision covers. Empty when
  /// nothing is covered from `from` onward.
  pub fn build_from<I>(decisions: I, from: Month, mode: RestrictMode) -> Result<Self>
  where
    I: IntoIterator<Item = &'a ReassessableDecision>,
  {
    let decisions: Vec<_> = decisions.into_iter().collect();
    match last_covered_month(&decisions) {
      Some(last) if last >= from => {
        let period = Period::new(from, last)?;
        Self::build(decisions, &period, mode)
      }
      _ => prepare(decisions).map(|_| Self::default()),
    }
  }

  /// Timeline over everything the decisions cover.
  pub fn build_full<I>(decisions: I, mode: RestrictMode) -> Result<Self>
  where
    I: IntoIterator<Item = &'a ReassessableDecision>,
  {
    let decisions: Vec<_> = decisions.into_iter().collect();
    match coverage(&decisions) {
      Some(span) => Self::build(decisions, &span, mode),
      None => Ok(Self::default()),
    }
  }

  pub fn segments(&self) -> &[Segment<'a>] { &self.segments }

  pub fn into_segments(self) -> Vec<Segment<'a>> { self.segments }

  pub fn is_empty(&self) -> bool { self.segments.is_empty() }

  pub fn last(&self) -> Option<&Segment<'a>> { self.segments.last() }

  pub fn periods(&self) -> Vec<Period> {
    self.segments.iter().map(|s| s.period).collect()
  }

  pub fn segment_for_month(&self, month: Month) -> Option<&Segment<'a>> {
    self.segments.iter().find(|s| s.period.contains(month))
  }

  pub fn governing_for_month(
    &self,
    month: Month,
  ) -> Option<&'a ReassessableDecision> {
    self.segment_for_month(month).map(|s| s.decision)
  }

  pub fn governing_at(&self, date: NaiveDate) -> Option<&'a ReassessableDecision> {
    self.governing_for_month(Month::containing(date))
  }

  pub fn first_gap(&self) -> Option<(Period, Period)> {
    first_gap(&self.periods())
  }

  pub fn is_contiguous(&self) -> bool { self.first_gap().is_none() }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Validate every decision and return them ordered by creation time.
fn prepare<'a, I>(decisions: I) -> Result<Vec<&'a ReassessableDecision>>
where
  I: IntoIterator<Item = &'a ReassessableDecision>,
{
  let mut ordered: Vec<&'a ReassessableDecision> =
    decisions.into_iter().collect();
  for decision in &ordered {
    decision.validate().inspect_err(|e| {
      tracing::warn!(decision = %decision.id(), error = %e, "invalid decision");
    })?;
  }
  check_single_case(&ordered)?;

  ordered.sort_by_key(|d| d.created_at());
  check_unique_created_at(&ordered)?;
  Ok(ordered)
}

fn check_single_case(decisions: &[&ReassessableDecision]) -> Result<()> {
  let Some(first) = decisions.first() else {
    return Ok(());
  };
  let expected = first.case().case_id;
  if let Some(other) = decisions.iter().find(|d| d.case().case_id != expected) {
    let found = other.case().case_id;
    tracing::warn!(%expected, %found, "decisions from more than one case");
    return Err(Error::MixedCases { expected, found });
  }
  Ok(())
}

/// Expects `sorted` ordered by creation time.
fn check_unique_created_at(sorted: &[&ReassessableDecision]) -> Result<()> {
  if let Some(pair) = sorted
    .windows(2)
    .find(|pair| pair[0].created_at() == pair[1].created_at())
  {
    let case_id = pair[0].case().case_id;
    let created_at = pair[0].created_at();
    tracing::warn!(%case_id, %created_at, "duplicate decision creation time");
    return Err(Error::DuplicateCreatedAt { case_id, created_at });
  }
  Ok(())
}

fn last_covered_month(decisions: &[&ReassessableDecision]) -> Option<Month> {
  decisions.iter().map(|d| d.period().to()).max()
}

pub(crate) fn coverage(decisions: &[&ReassessableDecision]) -> Option<Period> {
  decisions
    .iter()
    .map(|d| *d.period())
    .reduce(|acc, p| acc.span(&p))
}
