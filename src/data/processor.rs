//! Transaction Store Module
//! Splits the cleaned transaction table into sales and returns and answers the
//! aggregate queries the dashboard is built from.

use crate::data::dates::date_from_epoch_days;
use crate::data::loader::{
    DataLoader, IngestError, COUNTRY, CUSTOMER_ID, DATE, DESCRIPTION, INVOICE_NO, QUANTITY,
    REVENUE, STOCK_CODE,
};
use chrono::NaiveDate;
use log::{debug, info};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Invoice prefix that marks a return (crediting) row.
pub const RETURN_MARKER: &str = "C";

/// Default row limit for [`TransactionStore::top_revenue_by_article`].
pub const DEFAULT_TOP_ARTICLES: usize = 15;

const ORIGINAL_INVOICE_NO: &str = "OriginalInvoiceNo";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Total revenue is zero, no share can be computed")]
    EmptyDataset,
}

/// What happened while the store was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub unparsed_dates: usize,
    pub sale_rows: usize,
    pub return_rows: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {} of {} rows ({} undated): {} sales, {} returns",
            self.rows_read.saturating_sub(self.rows_dropped),
            self.rows_read,
            self.unparsed_dates,
            self.sale_rows,
            self.return_rows
        )
    }
}

/// Summed revenue of one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRevenue {
    pub description: String,
    pub revenue: f64,
}

/// Global revenue versus the revenue of one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueShare {
    pub country: String,
    pub total_revenue: f64,
    pub country_revenue: f64,
    pub share_percent: f64,
}

impl RevenueShare {
    /// Share of total revenue with two decimals, e.g. `"12.34"`.
    pub fn formatted_share(&self) -> String {
        format!("{:.2}", self.share_percent)
    }
}

/// Quantity sold on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyQuantity {
    pub date: NaiveDate,
    pub quantity: i64,
}

/// Immutable, query-ready view of one transaction log.
///
/// The base table and both partitions are computed once in the constructor;
/// every query composes a lazy plan over those cached frames.
pub struct TransactionStore {
    base: DataFrame,
    returns: DataFrame,
    sales: DataFrame,
    report: LoadReport,
}

impl TransactionStore {
    /// Load a transaction CSV and prepare the sales/returns partitions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let loaded = DataLoader::load_csv(path.as_ref())?;
        let mut store = Self::from_frame(loaded.frame).map_err(IngestError::Prepare)?;
        store.report.rows_read = loaded.rows_read;
        store.report.rows_dropped = loaded.rows_read.saturating_sub(store.base.height());
        store.report.unparsed_dates = loaded.unparsed_dates;
        info!(
            "Prepared {} sale rows and {} return rows",
            store.report.sale_rows, store.report.return_rows
        );
        Ok(store)
    }

    /// Build a store from an already cleaned base table (loader output).
    pub fn from_frame(base: DataFrame) -> PolarsResult<Self> {
        let returns = Self::return_keys(&base)?;
        let return_rows = returns.height();
        let sales = Self::sales_only(&base, &returns)?;

        let report = LoadReport {
            rows_read: base.height(),
            sale_rows: sales.height(),
            return_rows,
            ..LoadReport::default()
        };

        Ok(Self {
            base,
            returns,
            sales,
            report,
        })
    }

    /// (original invoice, stock code, customer id) of every return row.
    fn return_keys(base: &DataFrame) -> PolarsResult<DataFrame> {
        base.clone()
            .lazy()
            .filter(col(INVOICE_NO).str().starts_with(lit(RETURN_MARKER)))
            .select([
                col(INVOICE_NO)
                    .str()
                    .strip_prefix(lit(RETURN_MARKER))
                    .alias(ORIGINAL_INVOICE_NO),
                col(STOCK_CODE),
                col(CUSTOMER_ID),
            ])
            .collect()
    }

    /// Non-return rows minus those whose full key is reversed by a return.
    fn sales_only(base: &DataFrame, returns: &DataFrame) -> PolarsResult<DataFrame> {
        base.clone()
            .lazy()
            .filter(col(INVOICE_NO).str().starts_with(lit(RETURN_MARKER)).not())
            .join(
                returns.clone().lazy(),
                [col(INVOICE_NO), col(STOCK_CODE), col(CUSTOMER_ID)],
                [col(ORIGINAL_INVOICE_NO), col(STOCK_CODE), col(CUSTOMER_ID)],
                JoinArgs::new(JoinType::Anti),
            )
            .collect()
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Cleaned base table: sales and returns, with derived columns.
    pub fn base_table(&self) -> &DataFrame {
        &self.base
    }

    /// Sale rows that survived return matching.
    pub fn sales_table(&self) -> &DataFrame {
        &self.sales
    }

    /// Keys of every return row, original invoice already de-prefixed.
    pub fn return_keys_table(&self) -> &DataFrame {
        &self.returns
    }

    /// Sorted distinct countries over all rows.
    pub fn list_countries(&self) -> Result<Vec<String>, QueryError> {
        distinct_sorted(&self.base, COUNTRY)
    }

    /// Sorted distinct article descriptions sold in `country`.
    pub fn list_products(&self, country: &str) -> Result<Vec<String>, QueryError> {
        let sold = self
            .sales
            .clone()
            .lazy()
            .filter(col(COUNTRY).eq(lit(country)))
            .select([col(DESCRIPTION)])
            .collect()?;
        distinct_sorted(&sold, DESCRIPTION)
    }

    /// Articles of `country` ranked by summed sales revenue, at most `limit`.
    ///
    /// Equal revenues are ordered by ascending description.
    pub fn top_revenue_by_article(
        &self,
        country: &str,
        limit: usize,
    ) -> Result<Vec<ArticleRevenue>, QueryError> {
        let grouped = self
            .sales
            .clone()
            .lazy()
            .filter(col(COUNTRY).eq(lit(country)))
            .group_by([col(DESCRIPTION)])
            .agg([col(REVENUE).sum()])
            .collect()?;

        let descriptions = grouped.column(DESCRIPTION)?.str()?;
        let revenues = grouped.column(REVENUE)?.f64()?;

        let mut articles: Vec<ArticleRevenue> = descriptions
            .into_iter()
            .zip(revenues.into_iter())
            .filter_map(|(description, revenue)| {
                Some(ArticleRevenue {
                    description: description?.to_string(),
                    revenue: revenue.unwrap_or(0.0),
                })
            })
            .collect();

        articles.sort_by(|a, b| {
            b.revenue
                .total_cmp(&a.revenue)
                .then_with(|| a.description.cmp(&b.description))
        });
        articles.truncate(limit);

        debug!("Top {} articles for {}: {} rows", limit, country, articles.len());
        Ok(articles)
    }

    /// Revenue of all rows versus revenue of all rows in `country`.
    ///
    /// Both sums include return rows, unlike the article ranking which only
    /// looks at sales.
    pub fn revenue_share(&self, country: &str) -> Result<RevenueShare, QueryError> {
        let total_revenue = sum_revenue(self.base.clone().lazy())?;
        let country_revenue =
            sum_revenue(self.base.clone().lazy().filter(col(COUNTRY).eq(lit(country))))?;

        if total_revenue == 0.0 {
            return Err(QueryError::EmptyDataset);
        }

        Ok(RevenueShare {
            country: country.to_string(),
            total_revenue,
            country_revenue,
            share_percent: country_revenue / total_revenue * 100.0,
        })
    }

    /// Daily quantity of `product` sold in `country`, ascending by date.
    pub fn quantity_by_date(
        &self,
        country: &str,
        product: &str,
    ) -> Result<Vec<DailyQuantity>, QueryError> {
        let local = self.local_quantity(country, product).collect()?;
        daily_quantities(&local)
    }

    /// Daily quantity of `product` sold everywhere except `country`, limited to
    /// the days on which `country` itself sold it.
    pub fn global_quantity_by_date(
        &self,
        country: &str,
        product: &str,
    ) -> Result<Vec<DailyQuantity>, QueryError> {
        let local_dates = self.local_quantity(country, product).select([col(DATE)]);

        let global = self
            .sales
            .clone()
            .lazy()
            .filter(
                col(COUNTRY)
                    .neq(lit(country))
                    .and(col(DESCRIPTION).eq(lit(product))),
            )
            .join(
                local_dates,
                [col(DATE)],
                [col(DATE)],
                JoinArgs::new(JoinType::Semi),
            )
            .group_by([col(DATE)])
            .agg([col(QUANTITY).sum()])
            .collect()?;

        daily_quantities(&global)
    }

    fn local_quantity(&self, country: &str, product: &str) -> LazyFrame {
        self.sales
            .clone()
            .lazy()
            .filter(
                col(COUNTRY)
                    .eq(lit(country))
                    .and(col(DESCRIPTION).eq(lit(product)))
                    .and(col(DATE).is_not_null()),
            )
            .group_by([col(DATE)])
            .agg([col(QUANTITY).sum()])
    }
}

fn sum_revenue(lf: LazyFrame) -> PolarsResult<f64> {
    let summed = lf.select([col(REVENUE).sum()]).collect()?;
    Ok(summed.column(REVENUE)?.f64()?.get(0).unwrap_or(0.0))
}

/// Sorted distinct non-null values of a string column.
fn distinct_sorted(df: &DataFrame, column: &str) -> Result<Vec<String>, QueryError> {
    let values: BTreeSet<String> = df
        .column(column)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(values.into_iter().collect())
}

/// Convert a `[Date, Quantity]` frame into records ordered by date.
fn daily_quantities(df: &DataFrame) -> Result<Vec<DailyQuantity>, QueryError> {
    let days = df.column(DATE)?.cast(&DataType::Int32)?;
    let quantities = df.column(QUANTITY)?.cast(&DataType::Int64)?;

    let mut series: Vec<DailyQuantity> = days
        .i32()?
        .into_iter()
        .zip(quantities.i64()?.into_iter())
        .filter_map(|(day, quantity)| {
            Some(DailyQuantity {
                date: date_from_epoch_days(day?)?,
                quantity: quantity.unwrap_or(0),
            })
        })
        .collect();

    series.sort_by_key(|point| point.date);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dates::days_since_epoch;
    use crate::data::loader::{DATE_TIME, INVOICE_DATE, UNIT_PRICE};

    struct Row<'a> {
        invoice: &'a str,
        stock: &'a str,
        description: &'a str,
        quantity: i64,
        price: f64,
        date: Option<(i32, u32, u32)>,
        customer: &'a str,
        country: &'a str,
    }

    #[allow(clippy::too_many_arguments)]
    fn row<'a>(
        invoice: &'a str,
        stock: &'a str,
        description: &'a str,
        quantity: i64,
        price: f64,
        day: Option<u32>,
        customer: &'a str,
        country: &'a str,
    ) -> Row<'a> {
        Row {
            invoice,
            stock,
            description,
            quantity,
            price,
            date: day.map(|d| (2010, 12, d)),
            customer,
            country,
        }
    }

    /// Base table shaped like the loader's output.
    fn frame(rows: &[Row]) -> DataFrame {
        let dates: Vec<Option<i32>> = rows
            .iter()
            .map(|r| {
                r.date
                    .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                    .map(days_since_epoch)
            })
            .collect();
        let df = DataFrame::new(vec![
            Column::new(INVOICE_NO.into(), rows.iter().map(|r| r.invoice).collect::<Vec<_>>()),
            Column::new(STOCK_CODE.into(), rows.iter().map(|r| r.stock).collect::<Vec<_>>()),
            Column::new(
                DESCRIPTION.into(),
                rows.iter().map(|r| r.description).collect::<Vec<_>>(),
            ),
            Column::new(QUANTITY.into(), rows.iter().map(|r| r.quantity).collect::<Vec<_>>()),
            Column::new(INVOICE_DATE.into(), vec!["raw"; rows.len()]),
            Column::new(UNIT_PRICE.into(), rows.iter().map(|r| r.price).collect::<Vec<_>>()),
            Column::new(CUSTOMER_ID.into(), rows.iter().map(|r| r.customer).collect::<Vec<_>>()),
            Column::new(COUNTRY.into(), rows.iter().map(|r| r.country).collect::<Vec<_>>()),
            Column::new(DATE_TIME.into(), vec![None::<i64>; rows.len()]),
            Column::new(DATE.into(), dates),
            Column::new(
                REVENUE.into(),
                rows.iter()
                    .map(|r| r.quantity as f64 * r.price)
                    .collect::<Vec<_>>(),
            ),
        ])
        .unwrap();
        df.lazy()
            .with_column(col(DATE).cast(DataType::Date))
            .collect()
            .unwrap()
    }

    fn store(rows: &[Row]) -> TransactionStore {
        TransactionStore::from_frame(frame(rows)).unwrap()
    }

    #[test]
    fn return_removes_only_the_matching_sale() {
        let s = store(&[
            row("1001", "W1", "Widget", 3, 2.0, Some(1), "17850", "France"),
            row("1001", "W2", "Widget", 2, 2.0, Some(2), "17850", "France"),
            row("C1001", "W2", "Widget", -2, 2.0, Some(3), "17850", "France"),
        ]);
        let top = s.top_revenue_by_article("France", 15).unwrap();
        assert_eq!(
            top,
            vec![ArticleRevenue {
                description: "Widget".into(),
                revenue: 6.0
            }]
        );
        assert_eq!(s.report().sale_rows, 1);
        assert_eq!(s.report().return_rows, 1);
    }

    #[test]
    fn report_summarises_the_partition() {
        let report = LoadReport {
            rows_read: 10,
            rows_dropped: 2,
            unparsed_dates: 1,
            sale_rows: 6,
            return_rows: 2,
        };
        assert_eq!(
            report.to_string(),
            "Loaded 8 of 10 rows (1 undated): 6 sales, 2 returns"
        );
    }

    #[test]
    fn report_with_more_drops_than_reads_shows_zero_loaded() {
        let report = LoadReport {
            rows_read: 1,
            rows_dropped: 3,
            ..LoadReport::default()
        };
        assert_eq!(
            report.to_string(),
            "Loaded 0 of 1 rows (0 undated): 0 sales, 0 returns"
        );
    }

    #[test]
    fn return_needs_all_three_keys_to_match() {
        let s = store(&[
            row("1001", "W1", "Widget", 3, 2.0, Some(1), "17850", "France"),
            // Same invoice and stock code, different customer.
            row("C1001", "W1", "Widget", -3, 2.0, Some(2), "99999", "France"),
        ]);
        assert_eq!(s.sales_table().height(), 1);
    }

    #[test]
    fn countries_include_return_only_countries() {
        let s = store(&[
            row("1001", "W1", "Widget", 3, 2.0, Some(1), "1", "France"),
            row("C2001", "W1", "Widget", -1, 2.0, Some(1), "2", "Belgium"),
            row("1002", "W1", "Widget", 3, 2.0, Some(1), "1", "France"),
        ]);
        assert_eq!(s.list_countries().unwrap(), vec!["Belgium", "France"]);
        assert!(s.list_products("Belgium").unwrap().is_empty());
    }

    #[test]
    fn products_are_sorted_and_unique() {
        let s = store(&[
            row("1", "B", "Mug", 1, 1.0, Some(1), "1", "France"),
            row("2", "A", "Candle", 1, 1.0, Some(1), "1", "France"),
            row("3", "B", "Mug", 1, 1.0, Some(2), "1", "France"),
            row("4", "C", "Lamp", 1, 1.0, Some(2), "1", "Spain"),
        ]);
        assert_eq!(s.list_products("France").unwrap(), vec!["Candle", "Mug"]);
        assert!(s.list_products("Atlantis").unwrap().is_empty());
    }

    #[test]
    fn top_articles_are_limited_and_tie_broken_by_description() {
        let s = store(&[
            row("1", "A", "Beta", 1, 5.0, Some(1), "1", "France"),
            row("2", "B", "Alpha", 1, 5.0, Some(1), "1", "France"),
            row("3", "C", "Gamma", 1, 9.0, Some(1), "1", "France"),
            row("4", "D", "Delta", 1, 1.0, Some(1), "1", "France"),
        ]);
        let top = s.top_revenue_by_article("France", 3).unwrap();
        let names: Vec<&str> = top.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
        assert!(s.top_revenue_by_article("Atlantis", 3).unwrap().is_empty());
    }

    #[test]
    fn revenue_share_counts_returns_but_ranking_does_not() {
        let s = store(&[
            row("1", "A", "Widget", 10, 1.0, Some(1), "1", "France"),
            row("C1", "A", "Widget", -4, 1.0, Some(2), "1", "France"),
            row("2", "A", "Widget", 10, 1.0, Some(1), "2", "Spain"),
        ]);
        let share = s.revenue_share("France").unwrap();
        assert_eq!(share.total_revenue, 16.0);
        assert_eq!(share.country_revenue, 6.0);
        assert_eq!(share.formatted_share(), "37.50");

        // The reversed sale is gone from the ranking.
        assert!(s.top_revenue_by_article("France", 15).unwrap().is_empty());
    }

    #[test]
    fn revenue_share_of_unknown_country_is_zero() {
        let s = store(&[row("1", "A", "Widget", 1, 3.0, Some(1), "1", "France")]);
        let share = s.revenue_share("Atlantis").unwrap();
        assert_eq!(share.country_revenue, 0.0);
        assert_eq!(share.formatted_share(), "0.00");
    }

    #[test]
    fn revenue_share_on_zero_revenue_is_an_error() {
        let empty = store(&[]);
        assert!(matches!(
            empty.revenue_share("France"),
            Err(QueryError::EmptyDataset)
        ));

        let cancelled = store(&[
            row("1", "A", "Widget", 2, 1.0, Some(1), "1", "France"),
            row("C9", "A", "Widget", -2, 1.0, Some(1), "1", "France"),
        ]);
        assert!(matches!(
            cancelled.revenue_share("France"),
            Err(QueryError::EmptyDataset)
        ));
    }

    #[test]
    fn quantity_by_date_sums_per_day_and_skips_null_dates() {
        let s = store(&[
            row("1", "A", "Widget", 3, 1.0, Some(5), "1", "France"),
            row("2", "A", "Widget", 4, 1.0, Some(5), "1", "France"),
            row("3", "A", "Widget", 1, 1.0, Some(2), "1", "France"),
            row("4", "A", "Widget", 9, 1.0, None, "1", "France"),
        ]);
        let series = s.quantity_by_date("France", "Widget").unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2010, 12, d).unwrap();
        assert_eq!(
            series,
            vec![
                DailyQuantity { date: day(2), quantity: 1 },
                DailyQuantity { date: day(5), quantity: 7 },
            ]
        );
    }

    #[test]
    fn global_series_only_uses_local_dates() {
        let s = store(&[
            row("1", "A", "Widget", 3, 1.0, Some(1), "1", "France"),
            row("2", "A", "Widget", 2, 1.0, Some(3), "1", "France"),
            row("3", "A", "Widget", 10, 1.0, Some(1), "2", "Spain"),
            row("4", "A", "Widget", 20, 1.0, Some(1), "3", "Germany"),
            row("5", "A", "Widget", 50, 1.0, Some(2), "2", "Spain"),
            row("6", "B", "Mug", 70, 1.0, Some(3), "2", "Spain"),
        ]);
        let local = s.quantity_by_date("France", "Widget").unwrap();
        let global = s.global_quantity_by_date("France", "Widget").unwrap();

        assert_eq!(
            global,
            vec![DailyQuantity {
                date: NaiveDate::from_ymd_opt(2010, 12, 1).unwrap(),
                quantity: 30,
            }]
        );
        let local_dates: BTreeSet<NaiveDate> = local.iter().map(|p| p.date).collect();
        assert!(global.iter().all(|p| local_dates.contains(&p.date)));
    }

    #[test]
    fn global_series_is_empty_without_local_sales() {
        let s = store(&[row("1", "A", "Widget", 3, 1.0, Some(1), "2", "Spain")]);
        assert!(s.global_quantity_by_date("France", "Widget").unwrap().is_empty());
    }
}
