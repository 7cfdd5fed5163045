use std::path::PathBuf;

use thiserror::Error;

/// Structural problems in asset content. I/O and decode failures travel as
/// `anyhow` context chains around these.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Cannot tell asset kind from path {0}")]
    UnknownKind(PathBuf),

    #[error("OBJ contained no triangles")]
    EmptyModel,

    #[error("Unknown cube face id '{0}'")]
    UnknownFace(String),

    #[error("Cube face '{0}' listed more than once")]
    DuplicateFace(&'static str),

    #[error("Cube manifest is missing face '{0}'")]
    MissingFace(&'static str),

    #[error("Cube face '{face}' is {width}x{height}, expected {expected}x{expected}")]
    FaceSize {
        face: &'static str,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("Loader for {0} stopped without a result")]
    LoaderGone(PathBuf),
}
