use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{MotionError, MotionResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> MotionResult<f64> {
    value.to_f64().ok_or_else(|| {
        MotionError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_timestamp(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Linear interpolation between `a` and `b` at `t`.
///
/// `t == 0.0` returns `a` exactly, and the single-multiplication form is
/// monotonic in `t`. `t == 1.0` is only approximately `b`; callers that need
/// the target reproduced exactly handle that fraction as a special case.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Integer-key variant of [`lerp`] rounding to the nearest whole key.
#[must_use]
pub fn lerp_key(a: i64, b: i64, t: f64) -> i64 {
    lerp(a as f64, b as f64, t).round() as i64
}
