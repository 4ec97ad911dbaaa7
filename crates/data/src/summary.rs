//! Headline statistics over a (possibly filtered) clean table.

use crate::models::{CleanTable, NumericColumn, YearColumn};
use serde::Serialize;
use std::collections::BTreeMap;

/// KPI figures shown above the table. Each statistic is `None` when the
/// table holds no value for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub coins: usize,
    pub mean_price: Option<f64>,
    pub mean_market_cap: Option<f64>,
    pub median_supply_ratio: Option<f64>,
    /// Name of the coin with the highest ATL change percentage.
    pub farthest_above_atl: Option<String>,
    /// Most common ATH year; ties resolve to the earliest year.
    pub top_ath_year: Option<i32>,
    /// Most common ATL year; ties resolve to the earliest year.
    pub top_atl_year: Option<i32>,
}

impl Summary {
    #[must_use]
    pub fn from_table(table: &CleanTable) -> Self {
        Self {
            coins: table.len(),
            mean_price: mean(table, NumericColumn::CurrentPrice),
            mean_market_cap: mean(table, NumericColumn::MarketCap),
            median_supply_ratio: median(table, NumericColumn::SupplyRatio),
            farthest_above_atl: table
                .largest(NumericColumn::AtlChangePercentage, 1)
                .iter()
                .next()
                .map(|r| r.display_name().to_string()),
            top_ath_year: mode_year(table, YearColumn::AthYear),
            top_atl_year: mode_year(table, YearColumn::AtlYear),
        }
    }
}

fn mean(table: &CleanTable, column: NumericColumn) -> Option<f64> {
    let (sum, count) = table
        .iter()
        .filter_map(|r| column.value(r))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn median(table: &CleanTable, column: NumericColumn) -> Option<f64> {
    let mut values: Vec<f64> = table.iter().filter_map(|r| column.value(r)).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn mode_year(table: &CleanTable, column: YearColumn) -> Option<i32> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in table.iter().filter_map(|r| column.value(r)) {
        *counts.entry(year).or_default() += 1;
    }
    // BTreeMap iterates ascending, and max_by_key keeps the last maximum, so
    // iterate in reverse to prefer the earliest year on ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(year, _)| year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CleanRecord;

    fn record(name: &str, price: Option<i128>, ratio: Option<f64>) -> CleanRecord {
        CleanRecord {
            name: Some(name.to_string()),
            current_price: price,
            supply_ratio: ratio,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_table_summary() {
        let summary = Summary::from_table(&CleanTable::default());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.coins, 0);
    }

    #[test]
    fn test_means_skip_missing() {
        let table = CleanTable::new(vec![
            record("a", Some(10), None),
            record("b", None, None),
            record("c", Some(20), None),
        ]);
        let summary = Summary::from_table(&table);
        assert_eq!(summary.coins, 3);
        assert_eq!(summary.mean_price, Some(15.0));
        assert_eq!(summary.mean_market_cap, None);
    }

    #[test]
    fn test_median_supply_ratio_even_and_odd() {
        let odd = CleanTable::new(vec![
            record("a", None, Some(0.9)),
            record("b", None, Some(0.1)),
            record("c", None, Some(0.5)),
        ]);
        assert_eq!(Summary::from_table(&odd).median_supply_ratio, Some(0.5));

        let even = CleanTable::new(vec![
            record("a", None, Some(0.2)),
            record("b", None, Some(0.4)),
            record("c", None, None),
        ]);
        let median = Summary::from_table(&even).median_supply_ratio.unwrap();
        assert!((median - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_farthest_above_atl_picks_first_maximum() {
        let mut a = record("Alpha", None, None);
        a.atl_change_percentage = Some(500.0);
        let mut b = record("Beta", None, None);
        b.atl_change_percentage = Some(9_000.0);
        let mut c = record("Gamma", None, None);
        c.atl_change_percentage = Some(9_000.0);

        let summary = Summary::from_table(&CleanTable::new(vec![a, b, c]));
        assert_eq!(summary.farthest_above_atl.as_deref(), Some("Beta"));
    }

    #[test]
    fn test_mode_year_prefers_earliest_on_tie() {
        let years = [2021, 2024, 2024, 2021, 2013];
        let table: CleanTable = years
            .iter()
            .map(|&y| CleanRecord {
                ath_year: Some(y),
                atl_year: Some(2015),
                ..Default::default()
            })
            .collect();

        let summary = Summary::from_table(&table);
        assert_eq!(summary.top_ath_year, Some(2021));
        assert_eq!(summary.top_atl_year, Some(2015));
    }
}
