//! Display data for one dashboard selection.
//! Each view is queried once per selection change and then only read.

use crate::charts::TimeSeriesFrame;
use crate::data::{ArticleRevenue, DailyQuantity, QueryError, RevenueShare, TransactionStore};
use serde::Serialize;

/// Everything shown for the selected country.
#[derive(Debug, Clone, Serialize)]
pub struct CountryView {
    pub country: String,
    pub top_articles: Vec<ArticleRevenue>,
    pub revenue_share: Option<RevenueShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_share_error: Option<String>,
    pub products: Vec<String>,
}

impl CountryView {
    /// An empty dataset is not fatal here: the share table is replaced by the
    /// error message and the rest of the view still renders.
    pub fn query(
        store: &TransactionStore,
        country: &str,
        top_articles: usize,
    ) -> Result<Self, QueryError> {
        let (revenue_share, revenue_share_error) = match store.revenue_share(country) {
            Ok(share) => (Some(share), None),
            Err(err @ QueryError::EmptyDataset) => (None, Some(err.to_string())),
            Err(err) => return Err(err),
        };

        Ok(Self {
            country: country.to_string(),
            top_articles: store.top_revenue_by_article(country, top_articles)?,
            revenue_share,
            revenue_share_error,
            products: store.list_products(country)?,
        })
    }
}

/// Local and global quantity series of one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSeries {
    pub country: String,
    pub product: String,
    pub local: Vec<DailyQuantity>,
    pub global: Vec<DailyQuantity>,
    pub frame: Option<TimeSeriesFrame>,
}

impl ProductSeries {
    pub fn query(
        store: &TransactionStore,
        country: &str,
        product: &str,
    ) -> Result<Self, QueryError> {
        let local = store.quantity_by_date(country, product)?;
        let global = store.global_quantity_by_date(country, product)?;
        let frame = TimeSeriesFrame::from_series(&local, &global);

        Ok(Self {
            country: country.to_string(),
            product: product.to_string(),
            local,
            global,
            frame,
        })
    }
}
