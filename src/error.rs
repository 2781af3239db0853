use thiserror::Error;

pub type MotionResult<T> = Result<T, MotionError>;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("invalid canvas geometry: width={width}, height={height}")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
