use std::path::PathBuf;

/// Options the binary passes to [`crate::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    /// Directory holding `sea_normals.jpg`, `f14/` and `skybox/`.
    pub asset_root: PathBuf,
    /// Log frame rate once per second.
    pub show_fps: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            asset_root: PathBuf::from("assets"),
            show_fps: false,
        }
    }
}

impl RunConfig {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}
