//! Cubemap loading from a JSON manifest:
//!
//! ```json
//! { "data": [ { "id": "posX", "image": "sky_px.jpg" }, ... ] }
//! ```
//!
//! Image paths are relative to the manifest. All six faces are required and
//! must be square and the same size.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::AssetError;
use crate::texture::TextureData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CubeFace::PosX => "posX",
            CubeFace::NegX => "negX",
            CubeFace::PosY => "posY",
            CubeFace::NegY => "negY",
            CubeFace::PosZ => "posZ",
            CubeFace::NegZ => "negZ",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Deserialize)]
struct RawManifest {
    data: Vec<RawFace>,
}

#[derive(Deserialize)]
struct RawFace {
    id: String,
    image: String,
}

/// Resolved face image paths, indexed by [`CubeFace`].
#[derive(Clone, Debug, PartialEq)]
pub struct CubeManifest {
    faces: [PathBuf; 6],
}

impl CubeManifest {
    /// Parse manifest text; image paths are joined onto `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(text).context("Cube manifest is not valid JSON")?;

        let mut faces: [Option<PathBuf>; 6] = Default::default();
        for entry in raw.data {
            let face =
                CubeFace::from_id(&entry.id).ok_or_else(|| AssetError::UnknownFace(entry.id.clone()))?;
            let slot = &mut faces[face.index()];
            if slot.is_some() {
                return Err(AssetError::DuplicateFace(face.id()).into());
            }
            *slot = Some(base_dir.join(entry.image));
        }

        let mut resolved: [PathBuf; 6] = Default::default();
        for face in CubeFace::ALL {
            resolved[face.index()] = faces[face.index()]
                .take()
                .ok_or(AssetError::MissingFace(face.id()))?;
        }
        Ok(Self { faces: resolved })
    }

    #[inline]
    pub fn face_path(&self, face: CubeFace) -> &Path {
        &self.faces[face.index()]
    }
}

/// Six decoded faces of equal square size.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeMapData {
    faces: Vec<TextureData>,
    size: u32,
}

impl CubeMapData {
    /// Assemble from faces in [`CubeFace::ALL`] order, checking dimensions.
    pub fn from_faces(faces: Vec<TextureData>) -> Result<Self> {
        anyhow::ensure!(faces.len() == 6, "Cubemap needs 6 faces, got {}", faces.len());
        let size = faces[0].width;
        for (face, tex) in CubeFace::ALL.into_iter().zip(&faces) {
            if tex.width != size || tex.height != size {
                return Err(AssetError::FaceSize {
                    face: face.id(),
                    width: tex.width,
                    height: tex.height,
                    expected: size,
                }
                .into());
            }
        }
        Ok(Self { faces, size })
    }

    #[inline]
    pub fn face(&self, face: CubeFace) -> &TextureData {
        &self.faces[face.index()]
    }

    /// Edge length of every face in texels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Read a `.cube` manifest and decode the six images it names.
pub fn load_cube_from_path(path: impl AsRef<Path>) -> Result<CubeMapData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cube manifest {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let manifest = CubeManifest::parse(&text, base)
        .with_context(|| format!("Bad cube manifest {}", path.display()))?;

    let faces = CubeFace::ALL
        .into_iter()
        .map(|f| TextureData::load(manifest.face_path(f)))
        .collect::<Result<Vec<_>>>()?;
    let cube = CubeMapData::from_faces(faces)
        .with_context(|| format!("Bad cubemap {}", path.display()))?;
    log::info!("Loaded cubemap {} ({}px faces)", path.display(), cube.size());
    Ok(cube)
}
