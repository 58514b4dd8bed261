//! Forecast log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the append-only forecast log.
///
/// Produced by the external forecasting collaborator; this pipeline only
/// appends them on the collaborator's behalf and never reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// When the forecasting run executed (UTC).
    pub execution_time: DateTime<Utc>,
    /// The future point in time the prediction targets (UTC).
    pub forecast_time: DateTime<Utc>,
    /// Predicted price at the target time.
    pub predicted_price: f64,
    /// Lower bound of the prediction interval.
    pub lower_bound: f64,
    /// Upper bound of the prediction interval.
    pub upper_bound: f64,
}

impl Forecast {
    /// Creates a new forecast record.
    #[must_use]
    pub const fn new(
        execution_time: DateTime<Utc>,
        forecast_time: DateTime<Utc>,
        predicted_price: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            execution_time,
            forecast_time,
            predicted_price,
            lower_bound,
            upper_bound,
        }
    }

    /// Width of the prediction interval (upper - lower).
    #[must_use]
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Whether a realized price falls inside the prediction interval.
    #[must_use]
    pub fn covers(&self, price: f64) -> bool {
        price >= self.lower_bound && price <= self.upper_bound
    }
}
