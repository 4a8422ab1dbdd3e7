//! Headless JSON output of the dashboard queries.

use crate::charts::{CountryView, ProductSeries};
use crate::config::DashboardConfig;
use crate::data::{LoadReport, TransactionStore};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CountryReport {
    load: LoadReport,
    #[serde(flatten)]
    view: CountryView,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<ProductSeries>,
}

/// Write the sorted country list.
pub fn write_countries<W: Write>(store: &TransactionStore, out: &mut W) -> Result<()> {
    let countries = store.list_countries()?;
    serde_json::to_writer_pretty(&mut *out, &countries)?;
    writeln!(out)?;
    Ok(())
}

/// Write everything the dashboard shows for `country`, plus the quantity
/// series of `product` when one is given.
pub fn write_report<W: Write>(
    store: &TransactionStore,
    config: &DashboardConfig,
    country: &str,
    product: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let view = CountryView::query(store, country, config.top_articles)?;
    let series = product
        .map(|product| ProductSeries::query(store, country, product))
        .transpose()?;

    let report = CountryReport {
        load: store.report(),
        view,
        series,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
