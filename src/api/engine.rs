use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::series::{Series, SeriesModel};
use crate::core::transition::{TransitionController, TransitionState};

/// MACD indicator series, precomputed by the host and consumed as opaque data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Optional indicator panes accompanying the main chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: Option<Series>,
    pub macd: Option<MacdSeries>,
}

/// Indicator values at a selected timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValues {
    pub line: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// Chart point snapped to the nearest sample of the current target data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPoint {
    /// Horizontal position of the snapped sample as a ratio of the key span.
    pub ratio: f64,
    pub timestamp: i64,
    pub value: f64,
    pub volume: Option<f64>,
    pub dominance: Option<f64>,
    pub moving_averages: IndexMap<String, f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdValues>,
}

/// Orchestrates one animated transition per charted series.
///
/// The engine owns the main curve plus every overlay and indicator curve that
/// accompanies it, keeps them on one shared key envelope, and fans out
/// `set_target`/`advance`/`reset` so all curves animate in lockstep under the
/// host's frame clock. Single-threaded: all calls must come from the render
/// thread in a serialized sequence.
#[derive(Debug, Clone)]
pub struct MotionEngine {
    model: SeriesModel,
    indicators: IndicatorSet,
    main: TransitionController,
    overlays: IndexMap<String, TransitionController>,
    dominance: Option<TransitionController>,
    volume: Option<TransitionController>,
    rsi: Option<TransitionController>,
    macd_line: Option<TransitionController>,
    macd_signal: Option<TransitionController>,
    macd_histogram: Option<TransitionController>,
}

impl MotionEngine {
    #[must_use]
    pub fn new(model: SeriesModel) -> Self {
        Self::with_indicators(model, IndicatorSet::default())
    }

    #[must_use]
    pub fn with_indicators(model: SeriesModel, indicators: IndicatorSet) -> Self {
        let main = TransitionController::from_model(&model);
        let overlays = build_overlay_controllers(&model);
        let dominance = build_own_envelope_controller(model.dominance(), &model);
        let volume = build_own_envelope_controller(model.volume(), &model);
        let rsi = indicators
            .rsi
            .as_ref()
            .and_then(|series| build_own_envelope_controller(series, &model));
        let (macd_line, macd_signal, macd_histogram) = build_macd_controllers(&indicators, &model);

        Self {
            model,
            indicators,
            main,
            overlays,
            dominance,
            volume,
            rsi,
            macd_line,
            macd_signal,
            macd_histogram,
        }
    }

    /// Adopts a new data refresh, re-targeting every live curve.
    ///
    /// Curves whose backing series appeared or disappeared are created or
    /// dropped; a newly created curve starts settled (its first frame is the
    /// target, not an animation from nothing).
    pub fn set_target(&mut self, model: SeriesModel, indicators: IndicatorSet) {
        debug!(
            points = model.points().len(),
            overlays = model.overlays().len(),
            has_rsi = indicators.rsi.is_some(),
            has_macd = indicators.macd.is_some(),
            "set engine target"
        );

        self.main.set_target(
            model.values().clone(),
            model.start_timestamp(),
            model.end_timestamp(),
            model.min_value(),
            model.max_value(),
        );

        let overlay_ids: Vec<&String> = model.overlays().keys().collect();
        let live_ids: Vec<&String> = self.overlays.keys().collect();
        if overlay_ids != live_ids {
            self.overlays = build_overlay_controllers(&model);
        } else {
            for (id, overlay) in model.overlays() {
                if let Some(controller) = self.overlays.get_mut(id) {
                    controller.set_target(
                        overlay.clone(),
                        model.start_timestamp(),
                        model.end_timestamp(),
                        model.min_value(),
                        model.max_value(),
                    );
                }
            }
        }

        retarget_own_envelope(&mut self.dominance, model.dominance(), &model);
        retarget_own_envelope(&mut self.volume, model.volume(), &model);

        match indicators.rsi.as_ref() {
            Some(series) if !series.is_empty() => {
                retarget_own_envelope(&mut self.rsi, series, &model);
            }
            _ => self.rsi = None,
        }

        match indicators.macd.as_ref() {
            Some(macd) => {
                let line_envelope = abs_max(&[&macd.line, &macd.signal]);
                let histogram_envelope = abs_max(&[&macd.histogram]);
                retarget_symmetric(&mut self.macd_line, &macd.line, line_envelope, &model);
                retarget_symmetric(&mut self.macd_signal, &macd.signal, line_envelope, &model);
                retarget_symmetric(
                    &mut self.macd_histogram,
                    &macd.histogram,
                    histogram_envelope,
                    &model,
                );
            }
            None => {
                self.macd_line = None;
                self.macd_signal = None;
                self.macd_histogram = None;
            }
        }

        self.model = model;
        self.indicators = indicators;
    }

    /// Advances every curve to `fraction`; states are read via accessors.
    pub fn advance(&mut self, fraction: f64) {
        self.main.advance(fraction);
        for controller in self.overlays.values_mut() {
            controller.advance(fraction);
        }
        for controller in [
            &mut self.dominance,
            &mut self.volume,
            &mut self.rsi,
            &mut self.macd_line,
            &mut self.macd_signal,
            &mut self.macd_histogram,
        ]
        .into_iter()
        .flatten()
        {
            controller.advance(fraction);
        }
    }

    /// Hard-stops all in-flight animation on the current targets.
    pub fn reset(&mut self) {
        self.main.reset();
        for controller in self.overlays.values_mut() {
            controller.reset();
        }
        for controller in [
            &mut self.dominance,
            &mut self.volume,
            &mut self.rsi,
            &mut self.macd_line,
            &mut self.macd_signal,
            &mut self.macd_histogram,
        ]
        .into_iter()
        .flatten()
        {
            controller.reset();
        }
    }

    #[must_use]
    pub fn model(&self) -> &SeriesModel {
        &self.model
    }

    #[must_use]
    pub fn main_state(&self) -> &TransitionState {
        self.main.frame()
    }

    pub fn overlay_states(&self) -> impl Iterator<Item = (&str, &TransitionState)> {
        self.overlays
            .iter()
            .map(|(id, controller)| (id.as_str(), controller.frame()))
    }

    #[must_use]
    pub fn dominance_state(&self) -> Option<&TransitionState> {
        self.dominance.as_ref().map(TransitionController::frame)
    }

    #[must_use]
    pub fn volume_state(&self) -> Option<&TransitionState> {
        self.volume.as_ref().map(TransitionController::frame)
    }

    #[must_use]
    pub fn rsi_state(&self) -> Option<&TransitionState> {
        self.rsi.as_ref().map(TransitionController::frame)
    }

    #[must_use]
    pub fn macd_line_state(&self) -> Option<&TransitionState> {
        self.macd_line.as_ref().map(TransitionController::frame)
    }

    #[must_use]
    pub fn macd_signal_state(&self) -> Option<&TransitionState> {
        self.macd_signal.as_ref().map(TransitionController::frame)
    }

    #[must_use]
    pub fn macd_histogram_state(&self) -> Option<&TransitionState> {
        self.macd_histogram.as_ref().map(TransitionController::frame)
    }

    /// Snaps a horizontal position (ratio of the key span) to the nearest
    /// sample of the current target data and gathers per-indicator values at
    /// that timestamp.
    #[must_use]
    pub fn select_at_ratio(&self, ratio: f64) -> Option<SelectedPoint> {
        if !ratio.is_finite() {
            return None;
        }

        let start = self.model.start_timestamp();
        let span = self.model.end_timestamp() - start;
        let probe = if span > 0 {
            start + (span as f64 * ratio.clamp(0.0, 1.0)).round() as i64
        } else {
            start
        };

        let nearest = self
            .model
            .points()
            .iter()
            .min_by_key(|point| (point.timestamp - probe).abs())?;
        let timestamp = nearest.timestamp;
        let snapped_ratio = if span > 0 {
            (timestamp - start) as f64 / span as f64
        } else {
            0.0
        };

        let moving_averages = self
            .model
            .overlays()
            .iter()
            .filter_map(|(id, overlay)| overlay.get(timestamp).map(|value| (id.clone(), value)))
            .collect();
        let rsi = self
            .indicators
            .rsi
            .as_ref()
            .and_then(|series| series.get(timestamp));
        let macd = self.indicators.macd.as_ref().and_then(|macd| {
            macd.line.get(timestamp).map(|line| MacdValues {
                line,
                signal: macd.signal.get(timestamp),
                histogram: macd.histogram.get(timestamp),
            })
        });

        Some(SelectedPoint {
            ratio: snapped_ratio,
            timestamp,
            value: nearest.value,
            volume: nearest.volume,
            dominance: nearest.dominance,
            moving_averages,
            rsi,
            macd,
        })
    }
}

fn build_overlay_controllers(model: &SeriesModel) -> IndexMap<String, TransitionController> {
    model
        .overlays()
        .iter()
        .map(|(id, overlay)| {
            (
                id.clone(),
                TransitionController::new(
                    overlay.clone(),
                    model.start_timestamp(),
                    model.end_timestamp(),
                    model.min_value(),
                    model.max_value(),
                ),
            )
        })
        .collect()
}

fn build_own_envelope_controller(
    series: &Series,
    model: &SeriesModel,
) -> Option<TransitionController> {
    if series.is_empty() {
        return None;
    }
    Some(TransitionController::new(
        series.clone(),
        model.start_timestamp(),
        model.end_timestamp(),
        series.min_value().unwrap_or_default(),
        series.max_value().unwrap_or_default(),
    ))
}

fn build_macd_controllers(
    indicators: &IndicatorSet,
    model: &SeriesModel,
) -> (
    Option<TransitionController>,
    Option<TransitionController>,
    Option<TransitionController>,
) {
    let Some(macd) = indicators.macd.as_ref() else {
        return (None, None, None);
    };
    let line_envelope = abs_max(&[&macd.line, &macd.signal]);
    let histogram_envelope = abs_max(&[&macd.histogram]);
    (
        Some(symmetric_controller(&macd.line, line_envelope, model)),
        Some(symmetric_controller(&macd.signal, line_envelope, model)),
        Some(symmetric_controller(
            &macd.histogram,
            histogram_envelope,
            model,
        )),
    )
}

fn symmetric_controller(series: &Series, envelope: f64, model: &SeriesModel) -> TransitionController {
    TransitionController::new(
        series.clone(),
        model.start_timestamp(),
        model.end_timestamp(),
        -envelope,
        envelope,
    )
}

fn retarget_own_envelope(
    slot: &mut Option<TransitionController>,
    series: &Series,
    model: &SeriesModel,
) {
    if series.is_empty() {
        *slot = None;
        return;
    }
    match slot {
        Some(controller) => controller.set_target(
            series.clone(),
            model.start_timestamp(),
            model.end_timestamp(),
            series.min_value().unwrap_or_default(),
            series.max_value().unwrap_or_default(),
        ),
        None => *slot = build_own_envelope_controller(series, model),
    }
}

fn retarget_symmetric(
    slot: &mut Option<TransitionController>,
    series: &Series,
    envelope: f64,
    model: &SeriesModel,
) {
    match slot {
        Some(controller) => controller.set_target(
            series.clone(),
            model.start_timestamp(),
            model.end_timestamp(),
            -envelope,
            envelope,
        ),
        None => *slot = Some(symmetric_controller(series, envelope, model)),
    }
}

/// Largest absolute value across the given series; zero when all are empty.
fn abs_max(series: &[&Series]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.iter())
        .map(|(_, value)| OrderedFloat(value.abs()))
        .max()
        .map_or(0.0, |m| m.0)
}
