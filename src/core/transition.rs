use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::align::fill_with;
use crate::core::primitives::{lerp, lerp_key};
use crate::core::series::{Series, SeriesModel};

/// One interpolated animation frame.
///
/// Invariants: `start_key <= every key <= end_key` and
/// `min_value <= every value <= max_value`, with degenerate (zero-width)
/// ranges widened at construction so downstream ratio math never divides by
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    values: Series,
    start_key: i64,
    end_key: i64,
    min_value: f64,
    max_value: f64,
}

impl TransitionState {
    #[must_use]
    pub fn new(
        values: Series,
        start_key: i64,
        end_key: i64,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        Self::widened(values, start_key, end_key, min_value, max_value).0
    }

    /// Builds a state, reporting which axes required degenerate-range widening.
    fn widened(
        values: Series,
        start_key: i64,
        end_key: i64,
        min_value: f64,
        max_value: f64,
    ) -> (Self, WidenedAxes) {
        let (min_value, max_value, value_widened) = widen_value_range(min_value, max_value);
        let (start_key, end_key, key_widened) = widen_key_range(start_key, end_key);
        (
            Self {
                values,
                start_key,
                end_key,
                min_value,
                max_value,
            },
            WidenedAxes {
                value: value_widened,
                key: key_widened,
            },
        )
    }

    #[must_use]
    pub fn values(&self) -> &Series {
        &self.values
    }

    #[must_use]
    pub fn start_key(&self) -> i64 {
        self.start_key
    }

    #[must_use]
    pub fn end_key(&self) -> i64 {
        self.end_key
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }
}

#[derive(Debug, Clone, Copy)]
struct WidenedAxes {
    value: bool,
    key: bool,
}

/// Cross-fades a keyed series toward a replaceable target.
///
/// The controller is single-threaded by design: `set_target` and `advance`
/// must run on the same (render) thread in a strictly serialized call
/// sequence. `set_target` snapshots the live frame as the new "from" state so
/// re-targeting mid-animation continues smoothly instead of jumping.
#[derive(Debug, Clone)]
pub struct TransitionController {
    from_state: TransitionState,
    to_state: TransitionState,
    frame_state: TransitionState,
    aligned_from: Series,
    aligned_to: Series,
}

impl TransitionController {
    /// Creates a settled controller: the first `advance` reproduces the
    /// target exactly, so the very first render is not animated.
    #[must_use]
    pub fn new(
        values: Series,
        start_key: i64,
        end_key: i64,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        let (state, _) = TransitionState::widened(values, start_key, end_key, min_value, max_value);
        let aligned = state.values.clone();
        Self {
            from_state: state.clone(),
            to_state: state.clone(),
            frame_state: state,
            aligned_from: aligned.clone(),
            aligned_to: aligned,
        }
    }

    #[must_use]
    pub fn from_model(model: &SeriesModel) -> Self {
        Self::new(
            model.values().clone(),
            model.start_timestamp(),
            model.end_timestamp(),
            model.min_value(),
            model.max_value(),
        )
    }

    /// Adopts a new target, snapshotting the live frame as the new origin.
    ///
    /// When an axis of the new target is degenerate and had to be widened,
    /// the "from" side of that axis is forced onto the widened target so the
    /// degenerate span is not animated.
    pub fn set_target(
        &mut self,
        values: Series,
        start_key: i64,
        end_key: i64,
        min_value: f64,
        max_value: f64,
    ) {
        let mut from = self.frame_state.clone();
        let (to, widened) = TransitionState::widened(values, start_key, end_key, min_value, max_value);

        if widened.value {
            from.min_value = to.min_value;
            from.max_value = to.max_value;
        }
        if widened.key {
            from.start_key = to.start_key;
            from.end_key = to.end_key;
        }

        self.aligned_from = fill_with(&from.values, &to.values);
        self.aligned_to = fill_with(&to.values, &from.values);
        debug!(
            from_len = from.values.len(),
            to_len = to.values.len(),
            aligned_len = self.aligned_from.len(),
            "set transition target"
        );
        self.from_state = from;
        self.to_state = to;
    }

    /// Computes the frame at `fraction` of the way from "from" to "to".
    ///
    /// Total: out-of-range and non-finite fractions are clamped, and
    /// `fraction == 1.0` reproduces the target exactly rather than
    /// approximately. Never fails, so the render loop cannot skip a frame.
    pub fn advance(&mut self, fraction: f64) -> &TransitionState {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            warn!(fraction, "non-finite animation fraction, settling on target");
            1.0
        };
        trace!(fraction, "advance transition frame");

        if self.from_state.values.is_empty() || fraction == 1.0 {
            self.frame_state = self.to_state.clone();
            return &self.frame_state;
        }

        let values = Series::from_pairs(self.aligned_from.iter().map(|(key, from_value)| {
            let to_value = self.aligned_to.get(key).unwrap_or(from_value);
            (key, lerp(from_value, to_value, fraction))
        }));

        self.frame_state = TransitionState {
            values,
            start_key: lerp_key(self.from_state.start_key, self.to_state.start_key, fraction),
            end_key: lerp_key(self.from_state.end_key, self.to_state.end_key, fraction),
            min_value: lerp(self.from_state.min_value, self.to_state.min_value, fraction),
            max_value: lerp(self.from_state.max_value, self.to_state.max_value, fraction),
        };
        &self.frame_state
    }

    /// Hard-stops any in-flight animation by settling on the current target.
    pub fn reset(&mut self) {
        self.from_state = self.to_state.clone();
        self.frame_state = self.to_state.clone();
        self.aligned_from = self.to_state.values.clone();
        self.aligned_to = self.to_state.values.clone();
    }

    /// Last computed frame, returned as-is until the next `advance` call.
    #[must_use]
    pub fn frame(&self) -> &TransitionState {
        &self.frame_state
    }

    #[must_use]
    pub fn target(&self) -> &TransitionState {
        &self.to_state
    }
}

fn widen_value_range(min_value: f64, max_value: f64) -> (f64, f64, bool) {
    if min_value != max_value {
        return (min_value, max_value, false);
    }
    if min_value == 0.0 {
        return (-1.0, 1.0, true);
    }
    let a = min_value * 0.9;
    let b = max_value * 1.1;
    (a.min(b), a.max(b), true)
}

fn widen_key_range(start_key: i64, end_key: i64) -> (i64, i64, bool) {
    if start_key != end_key {
        return (start_key, end_key, false);
    }
    let a = (start_key as f64 * 0.9).round() as i64;
    let b = (end_key as f64 * 1.1).round() as i64;
    let (start, end) = (a.min(b), a.max(b));
    if start == end {
        // Keys near zero collapse under multiplicative widening.
        (start_key - 1, end_key + 1, true)
    } else {
        (start, end, true)
    }
}
