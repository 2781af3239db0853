use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_timestamp, decimal_to_f64};
use crate::error::MotionResult;

/// One sample of a charted series.
///
/// `timestamp` is the sole ordering and identity field. `volume` and
/// `dominance` are optional secondary metrics carried alongside the primary
/// value so the engine can animate them as separate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominance: Option<f64>,
}

impl ChartPoint {
    #[must_use]
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            value,
            volume: None,
            dominance: None,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn with_dominance(mut self, dominance: f64) -> Self {
        self.dominance = Some(dominance);
        self
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> MotionResult<Self> {
        Ok(Self::new(
            datetime_to_unix_timestamp(time),
            decimal_to_f64(value, "value")?,
        ))
    }
}

/// Pixel-space output point consumed by stroke/fill rendering code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
