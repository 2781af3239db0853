pub mod align;
pub mod primitives;
pub mod projection;
pub mod series;
pub mod transition;
pub mod types;

pub use align::fill_with;
pub use projection::{
    BarDirection, CanvasGeometry, HistogramBar, RangeBand, VolumeBar, project_curve_points,
    project_histogram_bars, project_volume_bars, range_band,
};
pub use series::{Series, SeriesModel};
pub use transition::{TransitionController, TransitionState};
pub use types::{ChartPoint, PixelPoint};
