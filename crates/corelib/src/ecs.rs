//! Scene storage: dense parallel arrays of Transform + Renderable.

use std::sync::Arc;

use asset::cube::CubeMapData;
use asset::mesh::ModelData;
use asset::texture::TextureData;

use crate::Vec2;
use crate::transform::Transform;

/// Entity id (dense, index into component arrays).
pub type Entity = u32;

/// What a node draws. Asset payloads are shared, not copied, so the
/// renderer sees exactly what the pipeline decoded.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshKind {
    /// Loaded model; every part shares the node transform.
    Model { model: Arc<ModelData> },
    /// Flat XZ plane; `uv_scale` repeats the normal map across it and the
    /// cubemap is reflected on the surface.
    Plane {
        width: f32,
        height: f32,
        uv_scale: f32,
        normal_map: Arc<TextureData>,
        env_map: Arc<CubeMapData>,
    },
    Skybox { cubemap: Arc<CubeMapData> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub mesh: MeshKind,
    /// Texture coordinate offset applied on top of the mesh UVs.
    pub uv_offset: Vec2,
}

impl Renderable {
    pub fn new(mesh: MeshKind) -> Self {
        Self {
            mesh,
            uv_offset: Vec2::ZERO,
        }
    }
}

/// Small world with dense parallel arrays.
/// Nothing allocates per frame; spawn may grow capacity.
#[derive(Default)]
pub struct World {
    transforms: Vec<Transform>,
    renderables: Vec<Option<Renderable>>,
    alive: Vec<bool>,
    len: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn entity with Transform and optional Renderable.
    pub fn spawn(&mut self, t: Transform, r: Option<Renderable>) -> Entity {
        let id = self.len;
        let idx = id as usize;
        self.len += 1;

        if idx >= self.transforms.len() {
            let new_len = (idx + 1).next_power_of_two().max(8);
            self.transforms.resize(new_len, Transform::identity());
            self.renderables.resize(new_len, None);
            self.alive.resize(new_len, false);
        }

        self.transforms[idx] = t;
        self.renderables[idx] = r;
        self.alive[idx] = true;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_alive(&self, e: Entity) -> bool {
        let i = e as usize;
        i < self.alive.len() && self.alive[i]
    }

    #[inline]
    pub fn transform(&self, e: Entity) -> Option<&Transform> {
        self.is_alive(e).then(|| &self.transforms[e as usize])
    }

    #[inline]
    pub fn transform_mut(&mut self, e: Entity) -> Option<&mut Transform> {
        if self.is_alive(e) {
            Some(&mut self.transforms[e as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn renderable(&self, e: Entity) -> Option<&Renderable> {
        if self.is_alive(e) {
            self.renderables[e as usize].as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub fn renderable_mut(&mut self, e: Entity) -> Option<&mut Renderable> {
        if self.is_alive(e) {
            self.renderables[e as usize].as_mut()
        } else {
            None
        }
    }

    /// Iterate over (Transform, Renderable) pairs.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (&Transform, &Renderable)> {
        (0..self.len as usize).filter_map(move |i| {
            if !self.alive.get(i).copied().unwrap_or(false) {
                return None;
            }
            self.renderables[i].as_ref().map(|r| (&self.transforms[i], r))
        })
    }
}
