//! Charts module - display data, axis framing and chart drawing

pub mod framing;
mod plotter;
mod view;

pub use framing::TimeSeriesFrame;
pub use plotter::ChartPlotter;
pub use view::{CountryView, ProductSeries};
