//! Invoice timestamp parsing.
//! Tries a fixed, ordered list of formats; the first one that matches wins.

use chrono::{NaiveDate, NaiveDateTime};

/// Known `InvoiceDate` layouts, in priority order.
pub const INVOICE_DATE_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a raw invoice timestamp. Returns `None` when no known format matches.
/// The text is taken as is: surrounding whitespace is not a known layout.
pub fn parse_invoice_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.starts_with(char::is_whitespace) || raw.ends_with(char::is_whitespace) {
        return None;
    }
    INVOICE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

/// Inverse of [`days_since_epoch`].
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(chrono::Duration::days(days as i64))
}
