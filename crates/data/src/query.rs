//! Filtering and ranking over the clean table.
//!
//! These are the operations a presentation layer needs: substring search on
//! name/symbol, inclusive ranges on market cap and price, set membership on
//! ATH/ATL years, and top-N views. Every operation tolerates an empty table.

use crate::models::{CleanRecord, CleanTable, NumericColumn, YearColumn};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Combined filter; unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    search: Option<String>,
    market_cap: Option<Range>,
    price: Option<Range>,
    ath_years: BTreeSet<i32>,
    atl_years: BTreeSet<i32>,
}

impl TableFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match over name or symbol. Blank input disables it.
    #[must_use]
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        let needle = text.as_ref().trim().to_lowercase();
        self.search = (!needle.is_empty()).then_some(needle);
        self
    }

    /// Inclusive market cap bounds; a missing market cap counts as 0.
    #[must_use]
    pub fn with_market_cap_range(mut self, min: f64, max: f64) -> Self {
        self.market_cap = Some(Range::new(min, max));
        self
    }

    /// Inclusive price bounds; a missing price counts as 0.
    #[must_use]
    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price = Some(Range::new(min, max));
        self
    }

    /// Keeps only records whose ATH year is in `years`. Empty disables it.
    #[must_use]
    pub fn with_ath_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.ath_years = years.into_iter().collect();
        self
    }

    /// Keeps only records whose ATL year is in `years`. Empty disables it.
    #[must_use]
    pub fn with_atl_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.atl_years = years.into_iter().collect();
        self
    }

    /// Returns true if no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.market_cap.is_none()
            && self.price.is_none()
            && self.ath_years.is_empty()
            && self.atl_years.is_empty()
    }

    #[must_use]
    pub fn matches(&self, record: &CleanRecord) -> bool {
        if let Some(needle) = &self.search {
            if !record.matches_search(needle) {
                return false;
            }
        }
        if let Some(range) = self.market_cap {
            if !range.contains(record.market_cap.unwrap_or(0) as f64) {
                return false;
            }
        }
        if let Some(range) = self.price {
            if !range.contains(record.current_price.unwrap_or(0) as f64) {
                return false;
            }
        }
        year_allowed(&self.ath_years, record.ath_year)
            && year_allowed(&self.atl_years, record.atl_year)
    }
}

fn year_allowed(years: &BTreeSet<i32>, year: Option<i32>) -> bool {
    years.is_empty() || year.is_some_and(|y| years.contains(&y))
}

impl CleanTable {
    /// Returns the records matching `filter`, in table order.
    #[must_use]
    pub fn filter(&self, filter: &TableFilter) -> CleanTable {
        if filter.is_empty() {
            return self.clone();
        }
        self.iter().filter(|r| filter.matches(r)).cloned().collect()
    }

    /// Sorted distinct years present in a year column.
    #[must_use]
    pub fn distinct_years(&self, column: YearColumn) -> Vec<i32> {
        self.iter()
            .filter_map(|r| column.value(r))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Min and max of a column, ignoring missing values.
    #[must_use]
    pub fn range(&self, column: NumericColumn) -> Option<Range> {
        self.iter()
            .filter_map(|r| column.value(r))
            .fold(None, |acc: Option<Range>, v| match acc {
                None => Some(Range::new(v, v)),
                Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// The `n` records with the largest values in `column`; ties keep table order.
    #[must_use]
    pub fn largest(&self, column: NumericColumn, n: usize) -> CleanTable {
        self.ranked_by(column, n, |a, b| b.total_cmp(a))
    }

    /// The `n` records with the smallest values in `column`; ties keep table order.
    #[must_use]
    pub fn smallest(&self, column: NumericColumn, n: usize) -> CleanTable {
        self.ranked_by(column, n, |a, b| a.total_cmp(b))
    }

    /// The first `n` records by market cap rank.
    ///
    /// When no record carries a rank, falls back to the largest market caps.
    #[must_use]
    pub fn top_by_rank(&self, n: usize) -> CleanTable {
        if self.iter().any(|r| r.market_cap_rank.is_some()) {
            self.smallest(NumericColumn::MarketCapRank, n)
        } else {
            self.largest(NumericColumn::MarketCap, n)
        }
    }

    fn ranked_by(
        &self,
        column: NumericColumn,
        n: usize,
        order: impl Fn(&f64, &f64) -> Ordering,
    ) -> CleanTable {
        let mut present: Vec<(f64, &CleanRecord)> = self
            .iter()
            .filter_map(|r| column.value(r).map(|v| (v, r)))
            .collect();
        present.sort_by(|(a, _), (b, _)| order(a, b));
        present.into_iter().take(n).map(|(_, r)| r.clone()).collect()
    }
}
