//! Raw-to-clean normalization of market listings.
//!
//! [`clean`] is a pure, total function: every step runs over every row, and a
//! value that cannot be coerced becomes `None` instead of failing the table.
//!
//! Steps, in order:
//! 1. coerce numeric fields (JSON numbers or numeric strings) to `f64`
//! 2. round magnitudes half-to-even to whole numbers, percentages to 2 dp
//! 3. parse ATH/ATL dates
//! 4. derive year and month from each parsed date
//! 5. derive `supply_ratio` by guarded division
//! 6. stable sort by `market_cap_rank`, missing ranks last

use crate::models::{CleanRecord, CleanTable};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use crypto_analytics_core::{value_text, RawRecord, RawTable};
use serde_json::Value;

/// Cleans a raw table. Output has exactly as many rows as the input.
#[must_use]
pub fn clean(raw: &RawTable) -> CleanTable {
    if raw.is_empty() {
        return CleanTable::default();
    }

    let mut coercer = Coercer::default();
    let mut records: Vec<CleanRecord> = raw.iter().map(|r| coercer.record(r)).collect();
    sort_by_rank(&mut records);

    if coercer.malformed > 0 {
        tracing::debug!(
            rows = records.len(),
            malformed = coercer.malformed,
            "malformed values downgraded to missing"
        );
    }

    CleanTable::new(records)
}

/// Stable ascending sort on rank; records without a rank go last.
pub fn sort_by_rank(records: &mut [CleanRecord]) {
    records.sort_by_key(|r| (r.market_cap_rank.is_none(), r.market_cap_rank));
}

/// Coerces a JSON value to a finite `f64`.
///
/// Numbers are taken as-is and strings are parsed after trimming. Anything
/// else, including `NaN` and infinities, is missing.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Rounds half-to-even to a whole number; out-of-range values are missing.
#[must_use]
pub fn round_whole(value: Option<f64>) -> Option<i128> {
    let rounded = value?.round_ties_even();
    // i128::MAX as f64 rounds up to 2^127, hence the strict upper bound.
    (rounded >= i128::MIN as f64 && rounded < i128::MAX as f64).then_some(rounded as i128)
}

/// Rounds half-to-even to an `i64` rank.
#[must_use]
pub fn round_rank(value: Option<f64>) -> Option<i64> {
    let rounded = value?.round_ties_even();
    (rounded >= i64::MIN as f64 && rounded < i64::MAX as f64).then_some(rounded as i64)
}

/// Rounds to 2 decimal places (scale, round half-to-even, unscale).
#[must_use]
pub fn round_percentage(value: Option<f64>) -> Option<f64> {
    let rounded = (value? * 100.0).round_ties_even() / 100.0;
    rounded.is_finite().then_some(rounded)
}

/// Parses an upstream timestamp.
///
/// Accepts RFC 3339 (`2021-11-10T14:24:11.849Z`), naive ISO date-times taken
/// as UTC, and bare `YYYY-MM-DD` dates at midnight UTC.
#[must_use]
pub fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = value?.as_str()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `circulating / total`, or `None` when either side is missing, the total
/// is zero, or the quotient is not finite.
#[must_use]
pub fn supply_ratio(circulating: Option<i128>, total: Option<i128>) -> Option<f64> {
    let circulating = circulating? as f64;
    let total = total?;
    if total == 0 {
        return None;
    }
    let ratio = circulating / total as f64;
    ratio.is_finite().then_some(ratio)
}

/// Applies coercions to one record, counting values that were present but
/// unusable.
#[derive(Debug, Default)]
struct Coercer {
    malformed: usize,
}

impl Coercer {
    fn record(&mut self, raw: &RawRecord) -> CleanRecord {
        let circulating_supply = self.whole(raw.circulating_supply.as_ref());
        let total_supply = self.whole(raw.total_supply.as_ref());
        let ath_date = self.timestamp(raw.ath_date.as_ref());
        let atl_date = self.timestamp(raw.atl_date.as_ref());

        CleanRecord {
            symbol: value_text(raw.symbol.as_ref()),
            name: value_text(raw.name.as_ref()),
            image: value_text(raw.image.as_ref()),
            current_price: self.whole(raw.current_price.as_ref()),
            market_cap: self.whole(raw.market_cap.as_ref()),
            market_cap_rank: self.rank(raw.market_cap_rank.as_ref()),
            total_volume: self.whole(raw.total_volume.as_ref()),
            circulating_supply,
            total_supply,
            ath: self.whole(raw.ath.as_ref()),
            ath_change_percentage: self.percentage(raw.ath_change_percentage.as_ref()),
            ath_date,
            ath_year: ath_date.map(|d| d.year()),
            ath_month: ath_date.map(|d| d.month()),
            atl: self.whole(raw.atl.as_ref()),
            atl_change_percentage: self.percentage(raw.atl_change_percentage.as_ref()),
            atl_date,
            atl_year: atl_date.map(|d| d.year()),
            atl_month: atl_date.map(|d| d.month()),
            supply_ratio: supply_ratio(circulating_supply, total_supply),
        }
    }

    fn whole(&mut self, value: Option<&Value>) -> Option<i128> {
        let out = round_whole(coerce_number(value));
        self.track(value, out.is_some());
        out
    }

    fn rank(&mut self, value: Option<&Value>) -> Option<i64> {
        let out = round_rank(coerce_number(value));
        self.track(value, out.is_some());
        out
    }

    fn percentage(&mut self, value: Option<&Value>) -> Option<f64> {
        let out = round_percentage(coerce_number(value));
        self.track(value, out.is_some());
        out
    }

    fn timestamp(&mut self, value: Option<&Value>) -> Option<DateTime<Utc>> {
        let out = parse_timestamp(value);
        self.track(value, out.is_some());
        out
    }

    fn track(&mut self, value: Option<&Value>, coerced: bool) {
        let present = matches!(value, Some(v) if !v.is_null());
        if present && !coerced {
            self.malformed += 1;
        }
    }
}
