use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::types::ChartPoint;
use crate::error::{MotionError, MotionResult};

/// Ordered timestamp→value mapping with unique keys.
///
/// Ascending key order is established on construction and never violated
/// afterwards. Duplicate keys are collapsed deterministically: the last value
/// written in input order wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: IndexMap<i64, f64>,
}

impl Series {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, f64)>) -> Self {
        let mut values = IndexMap::new();
        for (key, value) in pairs {
            values.insert(key, value);
        }
        values.sort_unstable_keys();
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.values.iter().map(|(key, value)| (*key, *value))
    }

    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.keys().copied()
    }

    #[must_use]
    pub fn get(&self, key: i64) -> Option<f64> {
        self.values.get(&key).copied()
    }

    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.values.contains_key(&key)
    }

    #[must_use]
    pub fn first(&self) -> Option<(i64, f64)> {
        self.values.first().map(|(key, value)| (*key, *value))
    }

    #[must_use]
    pub fn last(&self) -> Option<(i64, f64)> {
        self.values.last().map(|(key, value)| (*key, *value))
    }

    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.values.values().copied().reduce(f64::min)
    }

    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.values.values().copied().reduce(f64::max)
    }
}

impl FromIterator<(i64, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Immutable primary series plus derived aggregates.
///
/// Built once per data refresh from a non-empty, timestamp-ascending point
/// list. Overlay series (moving averages sharing the same chart) participate
/// in the min/max value envelope. All aggregates are computed at construction
/// and are pure reads afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesModel {
    points: Vec<ChartPoint>,
    values: Series,
    overlays: IndexMap<String, Series>,
    volume: Series,
    dominance: Series,
    min_value: f64,
    max_value: f64,
    start_timestamp: i64,
    end_timestamp: i64,
    diff: f64,
    sum: f64,
}

impl SeriesModel {
    pub fn new(points: Vec<ChartPoint>) -> MotionResult<Self> {
        Self::with_overlays(points, IndexMap::new())
    }

    /// Builds a model whose value envelope also covers `overlays`.
    pub fn with_overlays(
        points: Vec<ChartPoint>,
        overlays: IndexMap<String, Series>,
    ) -> MotionResult<Self> {
        validate_points(&points)?;
        for (id, overlay) in &overlays {
            for (_, value) in overlay.iter() {
                if !value.is_finite() {
                    return Err(MotionError::InvalidData(format!(
                        "overlay series `{id}` values must be finite"
                    )));
                }
            }
        }

        let values = Series::from_pairs(points.iter().map(|p| (p.timestamp, p.value)));
        let volume = Series::from_pairs(
            points
                .iter()
                .filter_map(|p| p.volume.map(|v| (p.timestamp, v))),
        );
        let dominance = Series::from_pairs(
            points
                .iter()
                .filter_map(|p| p.dominance.map(|d| (p.timestamp, d))),
        );

        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        for (_, value) in values.iter() {
            min_value = min_value.min(value);
            max_value = max_value.max(value);
        }
        for overlay in overlays.values() {
            for (_, value) in overlay.iter() {
                min_value = min_value.min(value);
                max_value = max_value.max(value);
            }
        }

        // `validate_points` rejects empty input, so the defaults never apply.
        let start_timestamp = points.first().map(|p| p.timestamp).unwrap_or_default();
        let end_timestamp = points.last().map(|p| p.timestamp).unwrap_or_default();

        let diff = percentage_diff(&points);
        let sum = points.iter().map(|p| p.value).sum();

        Ok(Self {
            points,
            values,
            overlays,
            volume,
            dominance,
            min_value,
            max_value,
            start_timestamp,
            end_timestamp,
            diff,
            sum,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    #[must_use]
    pub fn values(&self) -> &Series {
        &self.values
    }

    #[must_use]
    pub fn overlays(&self) -> &IndexMap<String, Series> {
        &self.overlays
    }

    /// Volume-by-timestamp series; empty when no point carries a volume.
    #[must_use]
    pub fn volume(&self) -> &Series {
        &self.volume
    }

    /// Dominance-by-timestamp series; empty when no point carries a dominance.
    #[must_use]
    pub fn dominance(&self) -> &Series {
        &self.dominance
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    #[must_use]
    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    #[must_use]
    pub fn end_timestamp(&self) -> i64 {
        self.end_timestamp
    }

    /// Percentage change from the first nonzero value to the last value.
    ///
    /// Returns zero when the series has no nonzero value to anchor on.
    #[must_use]
    pub fn diff(&self) -> f64 {
        self.diff
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }
}

fn percentage_diff(points: &[ChartPoint]) -> f64 {
    let Some(first) = points.iter().map(|p| p.value).find(|v| *v != 0.0) else {
        return 0.0;
    };
    let Some(last) = points.last().map(|p| p.value) else {
        return 0.0;
    };
    (last - first) / first * 100.0
}

fn validate_points(points: &[ChartPoint]) -> MotionResult<()> {
    if points.is_empty() {
        return Err(MotionError::InvalidData(
            "series model cannot be built from empty data".to_owned(),
        ));
    }

    let mut previous: Option<i64> = None;
    for point in points {
        if !point.value.is_finite() {
            return Err(MotionError::InvalidData(
                "series values must be finite".to_owned(),
            ));
        }
        if point.volume.is_some_and(|v| !v.is_finite()) {
            return Err(MotionError::InvalidData(
                "series volumes must be finite".to_owned(),
            ));
        }
        if point.dominance.is_some_and(|d| !d.is_finite()) {
            return Err(MotionError::InvalidData(
                "series dominance values must be finite".to_owned(),
            ));
        }
        if previous.is_some_and(|prev| point.timestamp <= prev) {
            return Err(MotionError::InvalidData(
                "series timestamps must be strictly ascending".to_owned(),
            ));
        }
        previous = Some(point.timestamp);
    }

    Ok(())
}
