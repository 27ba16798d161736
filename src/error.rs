use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Transform failed: {0}")]
    TransformFailed(String),

    #[error("Coordinate outside projection domain")]
    OutOfDomain,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No valid pole bound for projection: {0}")]
    NoPoleBound(String),

    #[error("Planning error: {0}")]
    General(String),

    #[error("Projection error during planning: {0}")]
    Projection(#[from] ProjError),
}

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
