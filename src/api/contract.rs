use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::projection::{
    CanvasGeometry, HistogramBar, RangeBand, VolumeBar, project_curve_points,
    project_histogram_bars, project_volume_bars, range_band,
};
use crate::core::types::PixelPoint;
use crate::error::{MotionError, MotionResult};

use super::MotionEngine;

pub const FRAME_GEOMETRY_JSON_SCHEMA_V1: u32 = 1;

/// Knobs for bar sizing and reference-line placement during projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Upper clamp for the shared bar width, in pixels.
    pub max_bar_width: f64,
    /// Fraction of canvas height occupied by the tallest volume bar.
    pub volume_height_fraction: f64,
    /// Offset of the range-band reference lines from the curve area edges.
    pub band_margin: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            max_bar_width: 8.0,
            volume_height_fraction: 0.4,
            band_margin: 4.0,
        }
    }
}

/// Pixel geometry of the main pane for one animation frame.
///
/// Everything a renderer needs to stroke and fill the primary chart; the
/// indicator panes project separately because they draw on their own
/// canvases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub curve: Vec<PixelPoint>,
    pub overlays: IndexMap<String, Vec<PixelPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominance: Option<Vec<PixelPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_bars: Option<Vec<VolumeBar>>,
    pub range_band: RangeBand,
}

/// Pixel geometry of the MACD pane for one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdGeometry {
    pub line: Vec<PixelPoint>,
    pub signal: Vec<PixelPoint>,
    pub histogram: Vec<HistogramBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometryJsonContractV1 {
    pub schema_version: u32,
    pub frame: FrameGeometry,
}

impl FrameGeometry {
    pub fn to_json_contract_v1_pretty(&self) -> MotionResult<String> {
        let payload = FrameGeometryJsonContractV1 {
            schema_version: FRAME_GEOMETRY_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            MotionError::InvalidData(format!("failed to serialize frame contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> MotionResult<Self> {
        if let Ok(frame) = serde_json::from_str::<FrameGeometry>(input) {
            return Ok(frame);
        }
        let payload: FrameGeometryJsonContractV1 = serde_json::from_str(input)
            .map_err(|e| MotionError::InvalidData(format!("failed to parse frame json: {e}")))?;
        if payload.schema_version != FRAME_GEOMETRY_JSON_SCHEMA_V1 {
            return Err(MotionError::InvalidData(format!(
                "unsupported frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

impl MotionEngine {
    /// Projects the current main-pane frame into renderer-ready geometry.
    pub fn project_frame(
        &self,
        geometry: CanvasGeometry,
        options: ProjectionOptions,
    ) -> MotionResult<FrameGeometry> {
        let curve = project_curve_points(self.main_state(), geometry)?;

        let mut overlays = IndexMap::new();
        for (id, state) in self.overlay_states() {
            overlays.insert(id.to_owned(), project_curve_points(state, geometry)?);
        }

        let dominance = match self.dominance_state() {
            Some(state) => Some(project_curve_points(state, geometry)?),
            None => None,
        };
        let volume_bars = match self.volume_state() {
            Some(state) => Some(project_volume_bars(
                state,
                geometry,
                options.volume_height_fraction,
                options.max_bar_width,
            )?),
            None => None,
        };
        let band = range_band(self.main_state(), geometry, options.band_margin)?;

        Ok(FrameGeometry {
            curve,
            overlays,
            dominance,
            volume_bars,
            range_band: band,
        })
    }

    /// Projects the RSI pane, when an RSI series is live.
    pub fn project_rsi(&self, geometry: CanvasGeometry) -> MotionResult<Option<Vec<PixelPoint>>> {
        match self.rsi_state() {
            Some(state) => Ok(Some(project_curve_points(state, geometry)?)),
            None => Ok(None),
        }
    }

    /// Projects the MACD pane, when MACD series are live.
    pub fn project_macd(
        &self,
        geometry: CanvasGeometry,
        options: ProjectionOptions,
    ) -> MotionResult<Option<MacdGeometry>> {
        let (Some(line), Some(signal), Some(histogram)) = (
            self.macd_line_state(),
            self.macd_signal_state(),
            self.macd_histogram_state(),
        ) else {
            return Ok(None);
        };

        Ok(Some(MacdGeometry {
            line: project_curve_points(line, geometry)?,
            signal: project_curve_points(signal, geometry)?,
            histogram: project_histogram_bars(histogram, geometry, options.max_bar_width)?,
        }))
    }

    /// Serializes the current frame's main-pane geometry as a stable JSON
    /// document for out-of-process renderers.
    pub fn frame_json_contract_v1_pretty(
        &self,
        geometry: CanvasGeometry,
        options: ProjectionOptions,
    ) -> MotionResult<String> {
        self.project_frame(geometry, options)?
            .to_json_contract_v1_pretty()
    }
}
