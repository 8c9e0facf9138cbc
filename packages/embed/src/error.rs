use scrawl_canvas::CanvasError;
use scrawl_common::StoreError;
use scrawl_editor::EditorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("No section info for block in {source_path}; cannot locate drawing tags")]
    MissingSectionInfo { source_path: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not spawn task: {0}")]
    Spawn(#[from] futures::task::SpawnError),

    #[error("Drawing surface for {0} is busy")]
    SurfaceBusy(String),
}
