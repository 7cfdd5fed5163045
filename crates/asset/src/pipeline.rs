//! Typed asset pipeline for the demo scene.
//!
//! Each request resolves to one [`LoadedAsset`] variant. [`SceneAssets`]
//! gathers them and reports when the scene can be built; [`AssetLoader`]
//! runs the loads off the frame thread.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use anyhow::{Context, Result};

use crate::cube::{CubeMapData, load_cube_from_path};
use crate::error::AssetError;
use crate::mesh::ModelData;
use crate::obj::load_obj_from_path;
use crate::texture::TextureData;

/// Asset locations relative to the asset root.
pub const NORMAL_MAP_PATH: &str = "sea_normals.jpg";
pub const MODEL_PATH: &str = "f14/f14d.obj";
pub const CUBEMAP_PATH: &str = "skybox/CubeTextureTest.cube";

/// The three requests the demo scene needs, resolved against `root`.
pub fn scene_requests(root: &Path) -> [PathBuf; 3] {
    [
        root.join(NORMAL_MAP_PATH),
        root.join(MODEL_PATH),
        root.join(CUBEMAP_PATH),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    NormalMap,
    Model,
    Cubemap,
}

impl AssetKind {
    /// Infer the kind from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png") => Ok(AssetKind::NormalMap),
            Some("obj") => Ok(AssetKind::Model),
            Some("cube") => Ok(AssetKind::Cubemap),
            _ => Err(AssetError::UnknownKind(path.to_path_buf())),
        }
    }
}

#[derive(Clone, Debug)]
pub enum LoadedAsset {
    NormalMap(TextureData),
    Model(ModelData),
    Cubemap(CubeMapData),
}

impl LoadedAsset {
    /// Load whatever `path` points at, dispatching on its kind.
    pub fn load(path: &Path) -> Result<Self> {
        let kind = AssetKind::from_path(path)?;
        let asset = match kind {
            AssetKind::NormalMap => LoadedAsset::NormalMap(TextureData::load(path)?),
            AssetKind::Model => LoadedAsset::Model(load_obj_from_path(path)?),
            AssetKind::Cubemap => LoadedAsset::Cubemap(load_cube_from_path(path)?),
        };
        Ok(asset)
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            LoadedAsset::NormalMap(_) => AssetKind::NormalMap,
            LoadedAsset::Model(_) => AssetKind::Model,
            LoadedAsset::Cubemap(_) => AssetKind::Cubemap,
        }
    }
}

/// Everything the scene needs, handed over once.
#[derive(Clone, Debug)]
pub struct ReadyAssets {
    pub normal_map: TextureData,
    pub model: ModelData,
    pub cubemap: CubeMapData,
}

/// Collects loaded assets until the full set is present.
#[derive(Default)]
pub struct SceneAssets {
    normal_map: Option<TextureData>,
    model: Option<ModelData>,
    cubemap: Option<CubeMapData>,
}

impl SceneAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an asset; a second asset of the same kind replaces the first.
    pub fn accept(&mut self, asset: LoadedAsset) {
        let kind = asset.kind();
        let replaced = match asset {
            LoadedAsset::NormalMap(t) => self.normal_map.replace(t).is_some(),
            LoadedAsset::Model(m) => self.model.replace(m).is_some(),
            LoadedAsset::Cubemap(c) => self.cubemap.replace(c).is_some(),
        };
        if replaced {
            log::warn!("{kind:?} loaded twice, keeping the latest");
        }
    }

    pub fn has(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::NormalMap => self.normal_map.is_some(),
            AssetKind::Model => self.model.is_some(),
            AssetKind::Cubemap => self.cubemap.is_some(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.normal_map.is_some() && self.model.is_some() && self.cubemap.is_some()
    }

    /// Hand over the full set, or leave everything in place if incomplete.
    pub fn take_ready(&mut self) -> Option<ReadyAssets> {
        if !self.is_complete() {
            return None;
        }
        Some(ReadyAssets {
            normal_map: self.normal_map.take()?,
            model: self.model.take()?,
            cubemap: self.cubemap.take()?,
        })
    }
}

/// Finished load: the requested path and its outcome.
pub type LoadOutcome = (PathBuf, Result<LoadedAsset>);

/// Runs each request on its own thread; results are collected by polling.
#[derive(Default)]
pub struct AssetLoader {
    pending: Vec<(PathBuf, JoinHandle<Result<LoadedAsset>>)>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let worker_path = path.clone();
        let handle = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || LoadedAsset::load(&worker_path))
            .with_context(|| format!("Failed to spawn loader for {}", path.display()))?;
        log::debug!("Requested {}", path.display());
        self.pending.push((path, handle));
        Ok(())
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Collect loads that have finished, without blocking.
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut done = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].1.is_finished() {
                let (path, handle) = self.pending.swap_remove(i);
                done.push(Self::join(path, handle));
            } else {
                i += 1;
            }
        }
        done
    }

    /// Block until every outstanding load is done.
    pub fn wait_all(&mut self) -> Vec<LoadOutcome> {
        self.pending
            .drain(..)
            .map(|(path, handle)| Self::join(path, handle))
            .collect()
    }

    fn join(path: PathBuf, handle: JoinHandle<Result<LoadedAsset>>) -> LoadOutcome {
        let result = handle
            .join()
            .unwrap_or_else(|_| Err(AssetError::LoaderGone(path.clone()).into()));
        (path, result)
    }
}
