use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("polygon shapes need at least one vertex")]
    EmptyPolygon,

    #[error("shape is not a polygon")]
    NotAPolygon,
}
