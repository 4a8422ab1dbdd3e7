//! Axis framing for the quantity time series.
//! Pure arithmetic over the query results; nothing here changes the data.

use crate::data::DailyQuantity;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Fraction of the date span appended after the last date.
const X_EXTENSION_RATIO: f64 = 0.1;
/// Headroom below zero, as a fraction of the largest quantity.
const Y_LOWER_PAD: f64 = 0.05;
/// Upper bound, as a multiple of the largest quantity.
const Y_UPPER_FACTOR: f64 = 1.1;

/// Maximum characters of an article label on the bar chart.
pub const LABEL_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesFrame {
    pub first_date: NaiveDate,
    pub extended_date: NaiveDate,
    pub y_min: f64,
    pub y_max: f64,
}

impl TimeSeriesFrame {
    /// Frame covering both series.
    ///
    /// Returns `None` when there is nothing worth drawing: no points at all, or
    /// no positive quantity.
    pub fn from_series(local: &[DailyQuantity], global: &[DailyQuantity]) -> Option<Self> {
        let points = local.iter().chain(global.iter());
        let first_date = points.clone().map(|p| p.date).min()?;
        let last_date = points.clone().map(|p| p.date).max()?;
        let max_quantity = points.map(|p| p.quantity).max()?;
        if max_quantity <= 0 {
            return None;
        }

        let span_days = (last_date - first_date).num_days();
        let extension = (span_days as f64 * X_EXTENSION_RATIO) as i64;
        let max_quantity = max_quantity as f64;

        Some(Self {
            first_date,
            extended_date: last_date + Duration::days(extension),
            y_min: -max_quantity * Y_LOWER_PAD,
            y_max: max_quantity * Y_UPPER_FACTOR,
        })
    }
}

/// Plot x coordinate of a date (days since the Unix epoch).
pub fn date_to_x(date: NaiveDate) -> f64 {
    crate::data::dates::days_since_epoch(date) as f64
}

/// Date label for a plot x coordinate.
pub fn x_to_date_label(x: f64) -> String {
    crate::data::dates::date_from_epoch_days(x.round() as i32)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Truncate a description to at most `max_chars` characters.
pub fn short_label(description: &str, max_chars: usize) -> String {
    description.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: u32, day: u32, quantity: i64) -> DailyQuantity {
        DailyQuantity {
            date: NaiveDate::from_ymd_opt(2011, month, day).unwrap(),
            quantity,
        }
    }

    #[test]
    fn extends_x_axis_by_a_tenth_of_the_span() {
        let local = [point(1, 1, 4), point(1, 31, 6)];
        let global = [point(1, 11, 20)];
        let frame = TimeSeriesFrame::from_series(&local, &global).unwrap();
        assert_eq!(frame.first_date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        // 30 day span, 3 extra days.
        assert_eq!(frame.extended_date, NaiveDate::from_ymd_opt(2011, 2, 3).unwrap());
        assert!((frame.y_min + 1.0).abs() < 1e-9);
        assert!((frame.y_max - 22.0).abs() < 1e-9);
    }

    #[test]
    fn partial_days_of_extension_are_dropped() {
        let frame = TimeSeriesFrame::from_series(&[point(3, 1, 1), point(3, 20, 1)], &[]).unwrap();
        // 19 days * 0.1 = 1.9, truncated to 1.
        assert_eq!(frame.extended_date, NaiveDate::from_ymd_opt(2011, 3, 21).unwrap());
    }

    #[test]
    fn single_day_has_no_extension() {
        let frame = TimeSeriesFrame::from_series(&[point(5, 5, 2)], &[]).unwrap();
        assert_eq!(frame.first_date, frame.extended_date);
    }

    #[test]
    fn nothing_to_frame_without_positive_quantities() {
        assert!(TimeSeriesFrame::from_series(&[], &[]).is_none());
        assert!(TimeSeriesFrame::from_series(&[point(1, 1, 0)], &[point(1, 1, -3)]).is_none());
    }

    #[test]
    fn x_coordinates_map_back_to_dates() {
        let date = NaiveDate::from_ymd_opt(2010, 12, 1).unwrap();
        assert_eq!(x_to_date_label(date_to_x(date)), "2010-12-01");
    }

    #[test]
    fn short_label_counts_characters_not_bytes() {
        assert_eq!(short_label("CRÈME BRÛLÉE DISH", 5), "CRÈME");
        assert_eq!(short_label("MUG", LABEL_MAX_CHARS), "MUG");
    }
}
