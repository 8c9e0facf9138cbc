use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Could not acquire a {width}x{height} drawing context")]
    ContextUnavailable { width: u32, height: u32 },

    #[error("Surface has not finished loading")]
    NotReady,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown toolbar action: {0}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
