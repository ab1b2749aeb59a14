//! Core types for repasse
//!
//! This crate provides the fundamental types shared by the report importer and
//! the command-line tools:
//!
//! - [`FinancialRecord`] - A canonical, storage-ready financial transaction
//! - [`Category`] / [`RecordType`] - Closed classifications of a record
//! - [`ExtractedData`] - The raw, string-typed view of one parsed report
//! - [`normalize_currency`] - Locale-ambiguous amount parsing
//! - [`parse_reference_period`] - Free-text month/year label parsing
//! - [`aggregate`] - Totals per polo and category
//!
//! # Example
//!
//! ```
//! use repasse_core::{normalize_currency, parse_reference_period_at};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! assert_eq!(normalize_currency("R$ 1.234,56"), dec!(1234.56));
//! assert_eq!(normalize_currency("1,234.56"), dec!(1234.56));
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let period = parse_reference_period_at(Some("REPASSE MARÇO/2024"), today);
//! assert_eq!((period.month, period.year), (3, 2024));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod currency;
pub mod extracted;
pub mod period;
pub mod record;
pub mod text;

pub use aggregate::{aggregate, CategoryTotals};
pub use currency::normalize_currency;
pub use extracted::{
    ExtractedData, ExtractedDiscount, ExtractedPoloData, ExtractedRecord, SummaryCell,
    SummaryGrid, SUMMARY_SLOTS,
};
pub use period::{parse_reference_period, parse_reference_period_at, ReferencePeriod};
pub use record::{Category, FinancialRecord, RecordType};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
