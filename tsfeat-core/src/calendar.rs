//! Calendar partitioner — pure date bucketing, no IO.
//!
//! Every row gets four keys derived from its date and two configured
//! divisors: `year`, `month`, `slice_year` (coarse sub-year bucket) and
//! `slice_month` (coarse sub-month bucket). Keys are pure functions of
//! `(date, slice_month_divisor, slice_year_divisor)`: two rows with the same
//! date and config can never disagree.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// The four calendar keys of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKeys {
    pub year: i32,
    /// 1–12.
    pub month: u32,
    /// `ceil(month / slice_year_divisor)`.
    pub slice_year: u32,
    /// `ceil(day_of_month / slice_month_divisor)`.
    pub slice_month: u32,
}

/// Compute the calendar keys for one date.
pub fn row_keys(date: NaiveDate, slice_month_divisor: u32, slice_year_divisor: u32) -> RowKeys {
    RowKeys {
        year: date.year(),
        month: date.month(),
        slice_year: date.month().div_ceil(slice_year_divisor),
        slice_month: date.day().div_ceil(slice_month_divisor),
    }
}

/// One of the four calendar windows rows can be partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Year,
    Month,
    SliceYear,
    SliceMonth,
}

impl Granularity {
    /// Column-name suffix (`lvl_year`, `trd_slice_month`, ...).
    pub fn suffix(&self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::SliceYear => "slice_year",
            Granularity::SliceMonth => "slice_month",
        }
    }

    /// Partition key of a row at this granularity.
    pub fn key(&self, k: &RowKeys) -> PartitionKey {
        match self {
            Granularity::Year => PartitionKey::Year(k.year),
            Granularity::Month => PartitionKey::Month(k.year, k.month),
            Granularity::SliceYear => PartitionKey::SliceYear(k.year, k.slice_year),
            Granularity::SliceMonth => {
                PartitionKey::SliceMonth(k.year, k.month, k.slice_month)
            }
        }
    }
}

/// Identifies one partition: the row's year plus its sub-position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionKey {
    Year(i32),
    Month(i32, u32),
    SliceYear(i32, u32),
    SliceMonth(i32, u32, u32),
}

impl PartitionKey {
    pub fn year(&self) -> i32 {
        match *self {
            PartitionKey::Year(y)
            | PartitionKey::Month(y, _)
            | PartitionKey::SliceYear(y, _)
            | PartitionKey::SliceMonth(y, _, _) => y,
        }
    }

    /// The year-independent calendar position, used by the seasonality
    /// scorer. `None` for the year granularity, which has no sub-position.
    pub fn position(&self) -> Option<PositionKey> {
        match *self {
            PartitionKey::Year(_) => None,
            PartitionKey::Month(_, m) => Some(PositionKey::Month(m)),
            PartitionKey::SliceYear(_, s) => Some(PositionKey::SliceYear(s)),
            PartitionKey::SliceMonth(_, m, w) => Some(PositionKey::SliceMonth(m, w)),
        }
    }
}

/// A calendar position with the year stripped off ("March", "first half of
/// July", "second third of the year").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PositionKey {
    Month(u32),
    SliceYear(u32),
    SliceMonth(u32, u32),
}

/// Group row indices by partition key at one granularity.
///
/// Built once per granularity and resolved by index afterwards, instead of
/// re-scanning rows per unique key. `BTreeMap` keeps iteration
/// deterministic. Row indices within a partition stay in input (date) order.
pub fn partition_map(
    keys: &[RowKeys],
    granularity: Granularity,
) -> BTreeMap<PartitionKey, Vec<usize>> {
    let mut map: BTreeMap<PartitionKey, Vec<usize>> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        map.entry(granularity.key(k)).or_default().push(i);
    }
    map
}
