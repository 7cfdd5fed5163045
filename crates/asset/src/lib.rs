//! Asset loading for the demo scene: sea normal map, OBJ aircraft model,
//! skybox cubemap, and the typed pipeline that tracks their readiness.

pub mod cube;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod pipeline;
pub mod texture;

pub use error::AssetError;
pub use pipeline::{AssetKind, AssetLoader, LoadedAsset, ReadyAssets, SceneAssets};
