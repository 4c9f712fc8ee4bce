//! # Reports
//!
//! Row types for the back-office reports and the date window they cover.
//! The aggregation SQL lives in `pressstart-db`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Date Range
// =============================================================================

/// A half-open window `[from, to)` over invoice dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// The calendar month `year-month`, in UTC.
    ///
    /// ## Example
    /// ```rust
    /// use pressstart_core::report::DateRange;
    ///
    /// let dec = DateRange::month(2024, 12).unwrap();
    /// assert_eq!(dec.to.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    /// assert!(DateRange::month(2024, 13).is_err());
    /// ```
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let out_of_range = || ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(out_of_range)?;

        Ok(DateRange {
            from: midnight(start),
            to: midnight(end),
        })
    }

    /// Parses `YYYY-MM` into a month range.
    pub fn parse_month(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::invalid_format("month", "expected YYYY-MM");

        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        DateRange::month(year, month)
    }

    /// Checks whether `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at < self.to
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

// =============================================================================
// Report Rows
// =============================================================================

/// Sales performance of a single inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemsReportRow {
    pub item_id: i64,
    pub item_name: String,
    pub quantity_sold: i64,
    pub revenue_cents: i64,
}

impl ItemsReportRow {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Sales summary for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreSalesRow {
    pub store_id: i64,
    pub store_address: String,
    pub invoice_count: i64,
    pub revenue_cents: i64,
    pub trade_value_paid_cents: i64,
}

impl StoreSalesRow {
    /// Revenue less trade credit applied at the till.
    pub fn net(&self) -> Money {
        Money::from_cents(self.revenue_cents) - Money::from_cents(self.trade_value_paid_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.from.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(feb.to.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(feb.contains(feb.from));
        assert!(!feb.contains(feb.to));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            DateRange::month(2024, 0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(
            DateRange::parse_month("2023-11").unwrap(),
            DateRange::month(2023, 11).unwrap()
        );
        assert!(DateRange::parse_month("2023-1").is_err());
        assert!(DateRange::parse_month("November").is_err());
        assert!(DateRange::parse_month("2023-13").is_err());
    }

    #[test]
    fn test_store_net() {
        let row = StoreSalesRow {
            store_id: 1,
            store_address: "1 Main St".into(),
            invoice_count: 3,
            revenue_cents: 10_000,
            trade_value_paid_cents: 2_500,
        };
        assert_eq!(row.net().cents(), 7_500);
    }
}
