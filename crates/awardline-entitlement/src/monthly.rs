//! Month-granularity entitlement reporting over decision summaries.
//!
//! Works on [`DecisionSummary`] projections rather than full decisions, so
//! it can run across every case at once.

use std::collections::{BTreeMap, BTreeSet};

use awardline_core::{
  CaseInfo, DecisionCategory, DecisionSummary, Month, PersonId,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

/// Persons entitled to payment in `month`, sorted by identity number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyEntitlement {
  pub month:   Month,
  pub persons: Vec<PersonId>,
}

/// Cases entitled in `from` or some later month, sorted by case number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitledFromOnward {
  pub from:  Month,
  pub cases: Vec<CaseInfo>,
}

/// The category in force for each month a case's summaries cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMonths {
  pub case:   CaseInfo,
  pub months: BTreeMap<Month, DecisionCategory>,
}

/// Group summaries by case, ordered by creation time within each case.
fn by_case(
  summaries: &[DecisionSummary],
) -> Result<BTreeMap<Uuid, Vec<&DecisionSummary>>> {
  let mut cases: BTreeMap<Uuid, Vec<&DecisionSummary>> = BTreeMap::new();
  for summary in summaries {
    cases.entry(summary.case().case_id).or_default().push(summary);
  }
  for (case_id, list) in cases.iter_mut() {
    list.sort_by_key(|s| s.created_at());
    if let Some(pair) = list
      .windows(2)
      .find(|pair| pair[0].created_at() == pair[1].created_at())
    {
      let created_at = pair[0].created_at();
      tracing::warn!(%case_id, %created_at, "duplicate summary creation time");
      return Err(Error::DuplicateCreatedAt { case_id: *case_id, created_at });
    }
  }
  Ok(cases)
}

/// For each case, the category of the latest-created summary covering each
/// month. Ordered by case number.
pub fn case_month_categories(
  summaries: &[DecisionSummary],
) -> Result<Vec<CaseMonths>> {
  let mut result: Vec<CaseMonths> = by_case(summaries)?
    .into_values()
    .filter_map(|list| {
      let case = list.first()?.case().clone();
      let mut months = BTreeMap::new();
      for summary in list {
        for month in summary.period().months() {
          months.insert(month, summary.category());
        }
      }
      Some(CaseMonths { case, months })
    })
    .collect();
  result.sort_by_key(|c| (c.case.case_number, c.case.case_id));
  Ok(result)
}

/// Persons whose latest-created summary covering `month` is not a
/// discontinuation.
///
/// A person's summaries are compared across all of their cases. Summaries
/// created at the same instant in different cases are ordered by case
/// number.
pub fn monthly_entitlement(
  summaries: &[DecisionSummary],
  month: Month,
) -> Result<MonthlyEntitlement> {
  let cases = by_case(summaries)?;

  let mut latest: BTreeMap<&PersonId, &DecisionSummary> = BTreeMap::new();
  for summary in cases.values().flatten().copied() {
    if !summary.period().contains(month) {
      continue;
    }
    let person = &summary.case().person_id;
    let newer = latest.get(person).is_none_or(|current| {
      (summary.created_at(), summary.case().case_number)
        > (current.created_at(), current.case().case_number)
    });
    if newer {
      latest.insert(person, summary);
    }
  }

  let persons: BTreeSet<PersonId> = latest
    .into_iter()
    .filter(|(_, s)| !s.category().is_discontinuation())
    .map(|(person, _)| person.clone())
    .collect();

  tracing::debug!(%month, persons = persons.len(), "monthly entitlement");
  Ok(MonthlyEntitlement {
    month,
    persons: persons.into_iter().collect(),
  })
}

/// Cases with at least one month at or after `from` whose latest-created
/// covering summary is not a discontinuation.
pub fn monthly_entitlement_from_onward(
  summaries: &[DecisionSummary],
  from: Month,
) -> Result<EntitledFromOnward> {
  let cases: Vec<CaseInfo> = case_month_categories(summaries)?
    .into_iter()
    .filter(|c| {
      c.months
        .range(from..)
        .any(|(_, category)| !category.is_discontinuation())
    })
    .map(|c| c.case)
    .collect();

  tracing::debug!(%from, cases = cases.len(), "entitled from onward");
  Ok(EntitledFromOnward { from, cases })
}
