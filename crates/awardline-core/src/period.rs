//! Whole-month time axis.
//!
//! Every decision, grounds item and condition assessment is valid for a
//! [`Period`]: a contiguous, inclusive run of calendar [`Month`]s. Nothing in
//! the engine carries day-level precision; dates are only ever mapped onto the
//! month that contains them.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Month ───────────────────────────────────────────────────────────────────

/// A calendar month.
///
/// Stored as a month count since year 0 so month arithmetic is plain integer
/// arithmetic. Serialised as `"YYYY-MM"`.
#[derive(
  Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Month(i32);

impl Month {
  /// Returns [`Error::InvalidMonth`] unless `month` is in `1..=12` and `year`
  /// is representable as a calendar date.
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
      return Err(Error::InvalidMonth { year, month });
    }
    Ok(Self(year * 12 + month as i32 - 1))
  }

  /// The month a calendar date falls in.
  pub fn containing(date: NaiveDate) -> Self {
    Self(date.year() * 12 + date.month0() as i32)
  }

  pub fn year(self) -> i32 { self.0.div_euclid(12) }

  /// 1-based month number.
  pub fn month(self) -> u32 { self.0.rem_euclid(12) as u32 + 1 }

  pub fn succ(self) -> Self { Self(self.0 + 1) }

  pub fn pred(self) -> Self { Self(self.0 - 1) }

  /// Shift by `months`; negative values move backwards.
  pub fn plus(self, months: i32) -> Self { Self(self.0 + months) }

  /// Signed number of months from `self` to `other`.
  pub fn months_until(self, other: Month) -> i32 { other.0 - self.0 }

  pub fn first_day(self) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(self.year(), self.month(), 1)
  }
}

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year(), self.month())
  }
}

impl fmt::Debug for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

impl FromStr for Month {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let parse_error = || Error::MonthParse(s.to_string());
    let (year, month) = s.rsplit_once('-').ok_or_else(parse_error)?;
    let year = year.parse::<i32>().map_err(|_| parse_error())?;
    let month = month.parse::<u32>().map_err(|_| parse_error())?;
    Month::new(year, month)
  }
}

impl TryFrom<String> for Month {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<Month> for String {
  fn from(month: Month) -> Self { month.to_string() }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// A contiguous, inclusive whole-month interval `from..=to`.
///
/// The constructor guarantees `from <= to`; deserialisation goes through the
/// same check.
#[derive(
  Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
  from: Month,
  to:   Month,
}

#[derive(Deserialize)]
struct RawPeriod {
  from: Month,
  to:   Month,
}

impl TryFrom<RawPeriod> for Period {
  type Error = Error;

  fn try_from(raw: RawPeriod) -> Result<Self> { Period::new(raw.from, raw.to) }
}

impl Period {
  pub fn new(from: Month, to: Month) -> Result<Self> {
    if from > to {
      return Err(Error::InvalidPeriod { from, to });
    }
    Ok(Self { from, to })
  }

  /// A period covering exactly one month.
  pub const fn single(month: Month) -> Self { Self { from: month, to: month } }

  /// January through December of `year`.
  pub fn year(year: i32) -> Result<Self> {
    Period::new(Month::new(year, 1)?, Month::new(year, 12)?)
  }

  pub fn from(&self) -> Month { self.from }

  pub fn to(&self) -> Month { self.to }

  pub fn month_count(&self) -> u32 { self.from.months_until(self.to) as u32 + 1 }

  pub fn months(&self) -> impl Iterator<Item = Month> + use<> {
    (self.from.0..=self.to.0).map(Month)
  }

  pub fn contains(&self, month: Month) -> bool {
    self.from <= month && month <= self.to
  }

  pub fn contains_date(&self, date: NaiveDate) -> bool {
    self.contains(Month::containing(date))
  }

  /// True if every month of `other` is also in `self`.
  pub fn covers(&self, other: &Period) -> bool {
    self.from <= other.from && other.to <= self.to
  }

  pub fn overlaps(&self, other: &Period) -> bool {
    self.from <= other.to && other.from <= self.to
  }

  pub fn intersection(&self, other: &Period) -> Option<Period> {
    if !self.overlaps(other) {
      return None;
    }
    Some(Period {
      from: self.from.max(other.from),
      to:   self.to.min(other.to),
    })
  }

  /// The parts of `self` not covered by `other`: zero, one or two periods,
  /// ordered by start.
  pub fn minus(&self, other: &Period) -> Vec<Period> {
    let Some(overlap) = self.intersection(other) else {
      return vec![*self];
    };
    let mut rest = Vec::with_capacity(2);
    if self.from < overlap.from {
      rest.push(Period { from: self.from, to: overlap.from.pred() });
    }
    if overlap.to < self.to {
      rest.push(Period { from: overlap.to.succ(), to: self.to });
    }
    rest
  }

  /// True if `next` starts in the month immediately after `self` ends.
  pub fn is_followed_by(&self, next: &Period) -> bool {
    self.to.succ() == next.from
  }

  /// True if both periods end in the same month.
  pub fn ends_with(&self, other: &Period) -> bool { self.to == other.to }

  /// The smallest period containing both `self` and `other`.
  pub fn span(&self, other: &Period) -> Period {
    Period {
      from: self.from.min(other.from),
      to:   self.to.max(other.to),
    }
  }

  pub fn shift(&self, months: i32) -> Period {
    Period {
      from: self.from.plus(months),
      to:   self.to.plus(months),
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.from, self.to)
  }
}

impl fmt::Debug for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

// ─── Period collections ──────────────────────────────────────────────────────

/// Merge overlapping and calendar-adjacent periods into the minimal set of
/// contiguous periods, sorted by start.
pub fn coalesce(periods: impl IntoIterator<Item = Period>) -> Vec<Period> {
  let mut sorted: Vec<Period> = periods.into_iter().collect();
  sorted.sort();

  let mut merged: Vec<Period> = Vec::with_capacity(sorted.len());
  for period in sorted {
    match merged.last_mut() {
      Some(last) if period.from <= last.to.succ() => {
        last.to = last.to.max(period.to);
      }
      _ => merged.push(period),
    }
  }
  merged
}

/// The first consecutive pair that is not calendar-adjacent.
pub fn first_gap(periods: &[Period]) -> Option<(Period, Period)> {
  periods
    .windows(2)
    .find(|pair| !pair[0].is_followed_by(&pair[1]))
    .map(|pair| (pair[0], pair[1]))
}

/// True iff every consecutive pair is calendar-adjacent. Vacuously true for
/// zero or one period.
pub fn is_contiguous(periods: &[Period]) -> bool { first_gap(periods).is_none() }

/// The first overlapping pair in a list sorted by start.
///
/// For start-sorted input any overlap implies an overlap between neighbours,
/// so checking neighbours is sufficient.
pub fn first_overlap(sorted: &[Period]) -> Option<(Period, Period)> {
  sorted
    .windows(2)
    .find(|pair| pair[0].overlaps(&pair[1]))
    .map(|pair| (pair[0], pair[1]))
}
