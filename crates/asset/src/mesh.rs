//! CPU-side mesh representation used by loaders.

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// One named sub-mesh (an OBJ `o`/`g` group).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPart {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshPart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }
}

/// A model is a container of parts, drawn with one shared transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub parts: Vec<MeshPart>,
}

impl ModelData {
    pub fn part_count(&self) -> u32 {
        u32::try_from(self.parts.len()).unwrap_or(u32::MAX)
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(MeshPart::triangle_count).sum()
    }

    /// Axis-aligned bounds over every part, `None` for an empty model.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut it = self.parts.iter().flat_map(|p| p.vertices.iter());
        let first = it.next()?.position;
        Some(it.fold((first, first), |(mut lo, mut hi), v| {
            for i in 0..3 {
                lo[i] = lo[i].min(v.position[i]);
                hi[i] = hi[i].max(v.position[i]);
            }
            (lo, hi)
        }))
    }
}
