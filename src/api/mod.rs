mod contract;
mod engine;

pub use contract::{
    FRAME_GEOMETRY_JSON_SCHEMA_V1, FrameGeometry, FrameGeometryJsonContractV1, MacdGeometry,
    ProjectionOptions,
};
pub use engine::{IndicatorSet, MacdSeries, MacdValues, MotionEngine, SelectedPoint};
