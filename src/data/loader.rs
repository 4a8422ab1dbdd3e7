//! Transaction CSV Loader Module
//! Reads the raw transaction log with Polars, drops malformed rows and adds the
//! derived `DateTime`, `Date` and `Revenue` columns.

use crate::data::dates::{days_since_epoch, parse_invoice_timestamp};
use log::{info, warn};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const INVOICE_NO: &str = "InvoiceNo";
pub const STOCK_CODE: &str = "StockCode";
pub const DESCRIPTION: &str = "Description";
pub const QUANTITY: &str = "Quantity";
pub const INVOICE_DATE: &str = "InvoiceDate";
pub const UNIT_PRICE: &str = "UnitPrice";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const COUNTRY: &str = "Country";

pub const DATE_TIME: &str = "DateTime";
pub const DATE: &str = "Date";
pub const REVENUE: &str = "Revenue";

/// Columns every input file must carry. A null in any of them drops the row.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    INVOICE_NO,
    STOCK_CODE,
    DESCRIPTION,
    QUANTITY,
    INVOICE_DATE,
    UNIT_PRICE,
    CUSTOMER_ID,
    COUNTRY,
];

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Required column `{0}` is missing from the CSV header")]
    MissingColumn(String),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to prepare sales and returns: {0}")]
    Prepare(#[source] PolarsError),
}

/// Cleaned base table plus the counters gathered while producing it.
pub struct LoadedFrame {
    pub frame: DataFrame,
    pub rows_read: usize,
    pub unparsed_dates: usize,
}

/// Handles transaction CSV loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load and clean a transaction CSV.
    ///
    /// Every column is read as text, then `Quantity` and `UnitPrice` are cast
    /// leniently: values that do not parse become null and the row is dropped
    /// together with any row holding a null in a required column. Rows with
    /// extra fields are cut to the header width and go through the same
    /// filter. Invalid UTF-8 is replaced rather than rejected.
    pub fn load_csv(path: &Path) -> Result<LoadedFrame, IngestError> {
        File::open(path).map_err(|source| IngestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .with_truncate_ragged_lines(true)
            .with_encoding(CsvEncoding::LossyUtf8)
            .finish()?
            .collect()?;

        Self::check_header(&raw)?;
        let rows_read = raw.height();

        let keep_complete_rows = REQUIRED_COLUMNS
            .iter()
            .fold(lit(true), |acc, name| acc.and(col(*name).is_not_null()));

        let mut typed = raw
            .lazy()
            .with_columns([
                col(QUANTITY).cast(DataType::Int64),
                col(UNIT_PRICE).cast(DataType::Float64),
            ])
            .filter(keep_complete_rows)
            .select(REQUIRED_COLUMNS.iter().map(|name| col(*name)).collect::<Vec<_>>())
            .collect()?;

        let (date_times, dates) = Self::parse_dates(&typed)?;
        let unparsed_dates = dates.iter().filter(|d| d.is_none()).count();

        let date_time = Series::new(DATE_TIME.into(), date_times)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let date = Series::new(DATE.into(), dates).cast(&DataType::Date)?;
        typed.with_column(date_time)?;
        typed.with_column(date)?;

        let frame = typed
            .lazy()
            .with_column(
                (col(QUANTITY).cast(DataType::Float64) * col(UNIT_PRICE)).alias(REVENUE),
            )
            .collect()?;

        let rows_dropped = rows_read.saturating_sub(frame.height());
        info!(
            "Loaded {} of {} rows from {}",
            frame.height(),
            rows_read,
            path.display()
        );
        if rows_dropped > 0 {
            warn!("Dropped {} malformed rows", rows_dropped);
        }
        if unparsed_dates > 0 {
            warn!(
                "{} rows have an unparseable InvoiceDate and are left out of date series",
                unparsed_dates
            );
        }

        Ok(LoadedFrame {
            frame,
            rows_read,
            unparsed_dates,
        })
    }

    fn check_header(df: &DataFrame) -> Result<(), IngestError> {
        let names = df.get_column_names();
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|name| name.as_str() == required) {
                return Err(IngestError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// Physical values for the `DateTime` (ms) and `Date` (days) columns.
    fn parse_dates(df: &DataFrame) -> PolarsResult<(Vec<Option<i64>>, Vec<Option<i32>>)> {
        let parsed = df
            .column(INVOICE_DATE)?
            .str()?
            .into_iter()
            .map(|raw| {
                let dt = raw.and_then(parse_invoice_timestamp);
                (
                    dt.map(|dt| dt.and_utc().timestamp_millis()),
                    dt.map(|dt| days_since_epoch(dt.date())),
                )
            })
            .unzip();
        Ok(parsed)
    }
}
