use crate::models::{CleanRecord, CleanTable};
use anyhow::{Context, Result};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column order of the exported clean table.
pub const CLEAN_COLUMNS: [&str; 20] = [
    "symbol",
    "name",
    "image",
    "current_price",
    "market_cap",
    "market_cap_rank",
    "total_volume",
    "circulating_supply",
    "total_supply",
    "ath",
    "ath_change_percentage",
    "ath_date",
    "atl",
    "atl_change_percentage",
    "atl_date",
    "ath_year",
    "ath_month",
    "atl_year",
    "atl_month",
    "supply_ratio",
];

pub struct CsvStorage;

impl CsvStorage {
    /// Writes the clean table to a CSV file.
    ///
    /// Format: one header row with [`CLEAN_COLUMNS`], then one row per record
    /// in table order. Missing values are empty cells; dates are RFC 3339.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_clean(path: impl AsRef<Path>, table: &CleanTable) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        Self::write_clean_to(file, table)?;
        tracing::info!(path = %path.display(), rows = table.len(), "clean table exported");
        Ok(())
    }

    /// Writes the clean table as CSV into any writer.
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_clean_to<W: Write>(writer: W, table: &CleanTable) -> Result<()> {
        let mut writer = Writer::from_writer(writer);

        writer.write_record(CLEAN_COLUMNS)?;
        for record in table.iter() {
            writer.write_record(Self::row(record))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn row(record: &CleanRecord) -> Vec<String> {
        vec![
            cell(record.symbol.as_ref()),
            cell(record.name.as_ref()),
            cell(record.image.as_ref()),
            cell(record.current_price.as_ref()),
            cell(record.market_cap.as_ref()),
            cell(record.market_cap_rank.as_ref()),
            cell(record.total_volume.as_ref()),
            cell(record.circulating_supply.as_ref()),
            cell(record.total_supply.as_ref()),
            cell(record.ath.as_ref()),
            cell(record.ath_change_percentage.as_ref()),
            record.ath_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            cell(record.atl.as_ref()),
            cell(record.atl_change_percentage.as_ref()),
            record.atl_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            cell(record.ath_year.as_ref()),
            cell(record.ath_month.as_ref()),
            cell(record.atl_year.as_ref()),
            cell(record.atl_month.as_ref()),
            cell(record.supply_ratio.as_ref()),
        ]
    }
}

fn cell<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
