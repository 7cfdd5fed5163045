//! OBJ model parser. Each `o`/`g` statement starts a new part; faces before
//! the first group land in a part named `default`.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};

use crate::error::AssetError;
use crate::mesh::{MeshPart, MeshVertex, ModelData};

const DEFAULT_PART: &str = "default";

/// Load an OBJ model from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<ModelData> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let model = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded OBJ {}: {} part(s), {} triangle(s)",
        path.display(),
        model.parts.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parse an OBJ model from an in-memory string.
pub fn load_obj_from_str(contents: &str) -> Result<ModelData> {
    parse_obj(io::Cursor::new(contents))
}

/// Shared vertex pools; OBJ indices are global across groups.
#[derive(Default)]
struct Pools {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Corner {
    pos: usize,
    tex: Option<usize>,
    norm: Option<usize>,
}

/// Part under construction with its own vertex de-duplication table.
struct PartBuilder {
    part: MeshPart,
    unique: HashMap<Corner, u32>,
}

impl PartBuilder {
    fn new(name: &str) -> Self {
        Self {
            part: MeshPart::new(name),
            unique: HashMap::new(),
        }
    }

    fn vertex(&mut self, corner: Corner, pools: &Pools) -> Result<u32> {
        if let Some(&idx) = self.unique.get(&corner) {
            return Ok(idx);
        }
        let position = pools.positions[corner.pos];
        let uv = corner
            .tex
            .map_or([0.0, 0.0], |i| pools.texcoords[i]);
        let normal = corner
            .norm
            .map_or([0.0, 0.0, 1.0], |i| pools.normals[i]);

        let idx = u32::try_from(self.part.vertices.len())
            .map_err(|_| anyhow!("Too many vertices in part '{}'", self.part.name))?;
        self.part.vertices.push(MeshVertex::new(position, normal, uv));
        self.unique.insert(corner, idx);
        Ok(idx)
    }
}

fn parse_obj<R: BufRead>(reader: R) -> Result<ModelData> {
    let mut pools = Pools::default();
    let mut finished: Vec<MeshPart> = Vec::new();
    let mut current = PartBuilder::new(DEFAULT_PART);

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<_, 3>(&mut parts, line_no)?;
                pools.positions.push([x, y, z]);
            }
            "vt" => {
                // `v` is optional and defaults to 0.
                let [u] = parse_floats::<_, 1>(&mut parts, line_no)?;
                let v = match parts.next() {
                    Some(token) => token
                        .parse::<f32>()
                        .with_context(|| format!("Bad number '{token}' on line {line_no}"))?,
                    None => 0.0,
                };
                pools.texcoords.push([u, v]);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<_, 3>(&mut parts, line_no)?;
                pools.normals.push([x, y, z]);
            }
            "o" | "g" => {
                let name = parts.next().unwrap_or(DEFAULT_PART);
                let done = std::mem::replace(&mut current, PartBuilder::new(name));
                if done.part.is_valid() {
                    finished.push(done.part);
                }
            }
            "f" => {
                let mut face: Vec<u32> = Vec::with_capacity(4);
                for token in parts {
                    let corner = parse_corner(token, &pools, line_no)?;
                    face.push(current.vertex(corner, &pools)?);
                }
                if face.len() < 3 {
                    log::warn!("Skipping degenerate face on line {line_no}");
                    continue;
                }
                // Triangle fan around the first corner.
                for i in 1..face.len() - 1 {
                    current
                        .part
                        .indices
                        .extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            // mtllib/usemtl/s and friends: materials are bound elsewhere.
            _ => {}
        }
    }

    if current.part.is_valid() {
        finished.push(current.part);
    }
    if finished.is_empty() {
        return Err(AssetError::EmptyModel.into());
    }

    Ok(ModelData { parts: finished })
}

fn parse_floats<'a, I, const N: usize>(
    parts: &mut I,
    line_no: usize,
) -> Result<[f32; N]>
where
    I: Iterator<Item = &'a str>,
{
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts
            .next()
            .ok_or_else(|| anyhow!("Missing component {} on line {line_no}", i + 1))?;
        *slot = token
            .parse::<f32>()
            .with_context(|| format!("Bad number '{token}' on line {line_no}"))?;
    }
    Ok(out)
}

fn parse_corner(token: &str, pools: &Pools, line_no: usize) -> Result<Corner> {
    let mut split = token.split('/');
    let pos = match split.next() {
        Some(p) if !p.is_empty() => resolve_index(p, pools.positions.len(), line_no)?,
        _ => bail!("Malformed face element '{token}' on line {line_no}"),
    };
    let tex = match split.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, pools.texcoords.len(), line_no)?),
        _ => None,
    };
    let norm = match split.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, pools.normals.len(), line_no)?),
        _ => None,
    };
    Ok(Corner { pos, tex, norm })
}

/// Resolve a 1-based (or negative, relative-to-end) OBJ index.
fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{token}' on line {line_no}"))?;
    let idx = match raw {
        0 => bail!("OBJ indices are 1-based; found 0 on line {line_no}"),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    if idx < 0 || idx as usize >= len {
        bail!("OBJ index {raw} out of bounds (len={len}) on line {line_no}");
    }
    Ok(idx as usize)
}
