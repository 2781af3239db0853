use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::transition::TransitionState;
use crate::core::types::PixelPoint;
use crate::error::{MotionError, MotionResult};

/// Canvas dimensions and layout offsets supplied by the hosting view system.
///
/// Offsets shrink the plot area symmetrically: `horizontal_offset` on both
/// sides, `top_offset`/`bottom_offset` plus `extra_vertical_offset` above and
/// below the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    pub width: f64,
    pub height: f64,
    pub horizontal_offset: f64,
    pub top_offset: f64,
    pub bottom_offset: f64,
    pub extra_vertical_offset: f64,
}

impl CanvasGeometry {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            horizontal_offset: 0.0,
            top_offset: 0.0,
            bottom_offset: 0.0,
            extra_vertical_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_offsets(mut self, horizontal: f64, top: f64, bottom: f64) -> Self {
        self.horizontal_offset = horizontal;
        self.top_offset = top;
        self.bottom_offset = bottom;
        self
    }

    #[must_use]
    pub fn with_extra_vertical_offset(mut self, extra: f64) -> Self {
        self.extra_vertical_offset = extra;
        self
    }

    #[must_use]
    pub fn plot_width(self) -> f64 {
        self.width - 2.0 * self.horizontal_offset
    }

    #[must_use]
    pub fn plot_height(self) -> f64 {
        self.height - self.top_offset - self.bottom_offset - 2.0 * self.extra_vertical_offset
    }

    fn validate(self) -> MotionResult<()> {
        let fields = [
            self.width,
            self.height,
            self.horizontal_offset,
            self.top_offset,
            self.bottom_offset,
            self.extra_vertical_offset,
        ];
        if fields.iter().any(|field| !field.is_finite()) {
            return Err(MotionError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(MotionError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Domain-to-pixel ratios shared by all projection variants.
#[derive(Debug, Clone, Copy)]
struct FrameRatios {
    start_key: i64,
    min_value: f64,
    x_ratio: f64,
    y_ratio: f64,
    geometry: CanvasGeometry,
}

impl FrameRatios {
    fn for_state(state: &TransitionState, geometry: CanvasGeometry) -> MotionResult<Self> {
        geometry.validate()?;

        let key_span = (state.end_key() - state.start_key()) as f64;
        let value_span = state.max_value() - state.min_value();
        // Widening at state construction rules these out; reject loudly if a
        // caller hand-built a degenerate state anyway.
        if key_span <= 0.0 || !value_span.is_finite() || value_span <= 0.0 {
            return Err(MotionError::InvalidData(
                "transition state spans must be positive".to_owned(),
            ));
        }

        Ok(Self {
            start_key: state.start_key(),
            min_value: state.min_value(),
            x_ratio: key_span / geometry.plot_width(),
            y_ratio: value_span / geometry.plot_height(),
            geometry,
        })
    }

    fn x(self, key: i64) -> f64 {
        (key - self.start_key) as f64 / self.x_ratio + self.geometry.horizontal_offset
    }

    fn y(self, value: f64) -> f64 {
        let y_raw = (value - self.min_value) / self.y_ratio
            + self.geometry.bottom_offset
            + self.geometry.extra_vertical_offset;
        // Axis inversion: domain value grows upward, pixel y grows downward.
        self.geometry.height - y_raw
    }
}

/// Maps a frame into ordered pixel points for polyline stroking.
///
/// Output order matches the ascending key order of the frame values.
pub fn project_curve_points(
    state: &TransitionState,
    geometry: CanvasGeometry,
) -> MotionResult<Vec<PixelPoint>> {
    let ratios = FrameRatios::for_state(state, geometry)?;
    Ok(state
        .values()
        .iter()
        .map(|(key, value)| PixelPoint::new(ratios.x(key), ratios.y(value)))
        .collect())
}

/// Which side of the baseline a histogram bar falls on.
///
/// Decided in pixel space: a bar whose mapped y sits at or above the baseline
/// (smaller pixel y) is `Above`. Renderers typically color the two directions
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarDirection {
    Above,
    Below,
}

/// Baseline-anchored bar geometry for histogram-style series (e.g. MACD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBar {
    pub x_center: f64,
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    pub direction: BarDirection,
}

/// Projects a frame into bars anchored to a baseline at canvas mid-height.
///
/// All bars in one frame share a single width: the minimum successive-x gap,
/// clamped to `max_bar_width`, so spacing stays uniform as the data set
/// changes under animation.
pub fn project_histogram_bars(
    state: &TransitionState,
    geometry: CanvasGeometry,
    max_bar_width: f64,
) -> MotionResult<Vec<HistogramBar>> {
    validate_bar_width(max_bar_width)?;
    let ratios = FrameRatios::for_state(state, geometry)?;

    let baseline_y = geometry.height / 2.0;
    let mapped: Vec<(f64, f64)> = state
        .values()
        .iter()
        .map(|(key, value)| (ratios.x(key), ratios.y(value)))
        .collect();

    let half_width = shared_bar_width(&mapped, max_bar_width) * 0.5;
    Ok(mapped
        .into_iter()
        .map(|(x_center, y_value)| HistogramBar {
            x_center,
            x_left: x_center - half_width,
            x_right: x_center + half_width,
            y_top: y_value.min(baseline_y),
            y_bottom: y_value.max(baseline_y),
            direction: if y_value <= baseline_y {
                BarDirection::Above
            } else {
                BarDirection::Below
            },
        })
        .collect())
}

/// Bottom-anchored bar geometry for volume/magnitude series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBar {
    pub x_center: f64,
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

/// Projects a frame into bars rising from the canvas bottom.
///
/// The frame maximum occupies `height_fraction` of the canvas height, so
/// volume bars stay visually subordinate to the primary curve regardless of
/// the primary value axis scale.
pub fn project_volume_bars(
    state: &TransitionState,
    geometry: CanvasGeometry,
    height_fraction: f64,
    max_bar_width: f64,
) -> MotionResult<Vec<VolumeBar>> {
    validate_bar_width(max_bar_width)?;
    if !height_fraction.is_finite() || height_fraction <= 0.0 || height_fraction > 1.0 {
        return Err(MotionError::InvalidData(
            "volume height fraction must be within (0, 1]".to_owned(),
        ));
    }
    let ratios = FrameRatios::for_state(state, geometry)?;
    if state.max_value() <= 0.0 {
        return Err(MotionError::InvalidData(
            "volume range must have a positive maximum".to_owned(),
        ));
    }

    let full_height = geometry.height * height_fraction;
    let mapped: Vec<(f64, f64)> = state
        .values()
        .iter()
        .map(|(key, value)| {
            let bar_height = (value / state.max_value()).max(0.0) * full_height;
            (ratios.x(key), geometry.height - bar_height)
        })
        .collect();

    let half_width = shared_bar_width(&mapped, max_bar_width) * 0.5;
    Ok(mapped
        .into_iter()
        .map(|(x_center, y_top)| VolumeBar {
            x_center,
            x_left: x_center - half_width,
            x_right: x_center + half_width,
            y_top,
            y_bottom: geometry.height,
        })
        .collect())
}

/// Two fixed horizontal reference lines labeled with the frame extrema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBand {
    pub top_y: f64,
    pub bottom_y: f64,
    pub max_label: f64,
    pub min_label: f64,
}

/// Computes max/min reference lines offset by `margin` from the curve area.
///
/// This is not a point-series mapping: the two y positions derive purely from
/// the vertical offsets, while the labels carry the frame's value extrema.
pub fn range_band(
    state: &TransitionState,
    geometry: CanvasGeometry,
    margin: f64,
) -> MotionResult<RangeBand> {
    geometry.validate()?;
    if !margin.is_finite() || margin < 0.0 {
        return Err(MotionError::InvalidData(
            "range band margin must be finite and >= 0".to_owned(),
        ));
    }

    let top_y = geometry.top_offset + margin;
    let bottom_y = geometry.height - geometry.bottom_offset - margin;
    if top_y >= bottom_y {
        return Err(MotionError::InvalidData(
            "range band margin leaves no vertical room".to_owned(),
        ));
    }

    Ok(RangeBand {
        top_y,
        bottom_y,
        max_label: state.max_value(),
        min_label: state.min_value(),
    })
}

fn validate_bar_width(max_bar_width: f64) -> MotionResult<()> {
    if !max_bar_width.is_finite() || max_bar_width <= 0.0 {
        return Err(MotionError::InvalidData(
            "bar width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

/// Single bar width shared across a frame: the minimum successive-x gap,
/// clamped to `max_width`. A frame with fewer than two bars uses `max_width`.
fn shared_bar_width(mapped: &[(f64, f64)], max_width: f64) -> f64 {
    mapped
        .windows(2)
        .map(|pair| pair[1].0 - pair[0].0)
        .min_by_key(|gap| OrderedFloat(*gap))
        .map_or(max_width, |gap| gap.min(max_width))
}
