//! Clean table and the column selectors used to query it.

use crate::models::coin::CleanRecord;
use serde::{Deserialize, Serialize};

/// Numeric columns usable for range filters and rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    CurrentPrice,
    MarketCap,
    MarketCapRank,
    TotalVolume,
    CirculatingSupply,
    TotalSupply,
    Ath,
    Atl,
    AthChangePercentage,
    AtlChangePercentage,
    SupplyRatio,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 11] = [
        Self::CurrentPrice,
        Self::MarketCap,
        Self::MarketCapRank,
        Self::TotalVolume,
        Self::CirculatingSupply,
        Self::TotalSupply,
        Self::Ath,
        Self::Atl,
        Self::AthChangePercentage,
        Self::AtlChangePercentage,
        Self::SupplyRatio,
    ];

    /// Column name as it appears in the clean table.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentPrice => "current_price",
            Self::MarketCap => "market_cap",
            Self::MarketCapRank => "market_cap_rank",
            Self::TotalVolume => "total_volume",
            Self::CirculatingSupply => "circulating_supply",
            Self::TotalSupply => "total_supply",
            Self::Ath => "ath",
            Self::Atl => "atl",
            Self::AthChangePercentage => "ath_change_percentage",
            Self::AtlChangePercentage => "atl_change_percentage",
            Self::SupplyRatio => "supply_ratio",
        }
    }

    /// Reads this column from a record as `f64`.
    #[must_use]
    pub fn value(&self, record: &CleanRecord) -> Option<f64> {
        match self {
            Self::CurrentPrice => record.current_price.map(|v| v as f64),
            Self::MarketCap => record.market_cap.map(|v| v as f64),
            Self::MarketCapRank => record.market_cap_rank.map(|v| v as f64),
            Self::TotalVolume => record.total_volume.map(|v| v as f64),
            Self::CirculatingSupply => record.circulating_supply.map(|v| v as f64),
            Self::TotalSupply => record.total_supply.map(|v| v as f64),
            Self::Ath => record.ath.map(|v| v as f64),
            Self::Atl => record.atl.map(|v| v as f64),
            Self::AthChangePercentage => record.ath_change_percentage,
            Self::AtlChangePercentage => record.atl_change_percentage,
            Self::SupplyRatio => record.supply_ratio,
        }
    }
}

impl std::str::FromStr for NumericColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| format!("unknown numeric column: {s}"))
    }
}

/// Year columns usable for set-membership filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearColumn {
    AthYear,
    AtlYear,
}

impl YearColumn {
    #[must_use]
    pub fn value(&self, record: &CleanRecord) -> Option<i32> {
        match self {
            Self::AthYear => record.ath_year,
            Self::AtlYear => record.atl_year,
        }
    }
}

/// Ordered, analysis-ready table of clean records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanTable {
    records: Vec<CleanRecord>,
}

impl CleanTable {
    #[must_use]
    pub fn new(records: Vec<CleanRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CleanRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<CleanRecord> {
        self.records
    }
}

impl From<Vec<CleanRecord>> for CleanTable {
    fn from(records: Vec<CleanRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<CleanRecord> for CleanTable {
    fn from_iter<I: IntoIterator<Item = CleanRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_round_trips_name() {
        for column in NumericColumn::ALL {
            assert_eq!(column.name().parse::<NumericColumn>().unwrap(), column);
        }
        assert_eq!(
            "market-cap".parse::<NumericColumn>().unwrap(),
            NumericColumn::MarketCap
        );
        assert!("image".parse::<NumericColumn>().is_err());
    }

    #[test]
    fn test_numeric_column_reads_missing_as_none() {
        let record = CleanRecord {
            market_cap: Some(1_500),
            supply_ratio: Some(0.5),
            ..Default::default()
        };
        assert_eq!(NumericColumn::MarketCap.value(&record), Some(1500.0));
        assert_eq!(NumericColumn::SupplyRatio.value(&record), Some(0.5));
        assert_eq!(NumericColumn::CurrentPrice.value(&record), None);
    }

    #[test]
    fn test_year_column_value() {
        let record = CleanRecord {
            ath_year: Some(2021),
            ..Default::default()
        };
        assert_eq!(YearColumn::AthYear.value(&record), Some(2021));
        assert_eq!(YearColumn::AtlYear.value(&record), None);
    }

    #[test]
    fn test_table_collects_from_iterator() {
        let table: CleanTable = (0..3).map(|_| CleanRecord::default()).collect();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert!(CleanTable::default().is_empty());
    }
}
