//! Data module - transaction loading, return matching and aggregate queries

pub mod dates;
mod loader;
mod processor;

pub use loader::{DataLoader, IngestError, LoadedFrame};
pub use processor::{
    ArticleRevenue, DailyQuantity, LoadReport, QueryError, RevenueShare, TransactionStore,
    DEFAULT_TOP_ARTICLES, RETURN_MARKER,
};

/// Column names of the base table.
pub mod columns {
    pub use super::loader::{
        COUNTRY, CUSTOMER_ID, DATE, DATE_TIME, DESCRIPTION, INVOICE_DATE, INVOICE_NO, QUANTITY,
        REQUIRED_COLUMNS, REVENUE, STOCK_CODE, UNIT_PRICE,
    };
}
