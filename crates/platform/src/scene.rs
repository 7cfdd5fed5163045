//! Window-independent demo state: asset loading, readiness gating and the
//! frame driver. The scene stays empty and the animation clock stays stopped
//! until the normal map, model and cubemap have all arrived.

use std::path::{Path, PathBuf};

use asset::{AssetLoader, SceneAssets, pipeline::scene_requests};
use corelib::animator::FrameDelta;
use corelib::driver::{FlightDriver, ToggleHandle};

pub struct DemoScene {
    driver: FlightDriver,
    loader: AssetLoader,
    assets: SceneAssets,
    failed_loads: usize,
    built: bool,
}

impl DemoScene {
    pub fn new(aspect: f32) -> Self {
        Self {
            driver: FlightDriver::new(aspect),
            loader: AssetLoader::new(),
            assets: SceneAssets::new(),
            failed_loads: 0,
            built: false,
        }
    }

    /// Request the three scene assets under `root`.
    pub fn request_scene(&mut self, root: &Path) {
        log::info!("Loading assets from {}", root.display());
        self.request(scene_requests(root));
    }

    pub fn request(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            if let Err(e) = self.loader.request(path) {
                log::error!("{e:#}");
                self.failed_loads += 1;
            }
        }
    }

    #[inline]
    pub fn driver(&self) -> &FlightDriver {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut FlightDriver {
        &mut self.driver
    }

    pub fn toggle_handle(&self) -> ToggleHandle {
        self.driver.toggle_handle()
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn pending_loads(&self) -> usize {
        self.loader.in_flight()
    }

    #[inline]
    pub fn failed_loads(&self) -> usize {
        self.failed_loads
    }

    /// Collect finished loads and build the scene once the set is complete.
    pub fn collect_assets(&mut self) {
        for (path, result) in self.loader.poll() {
            match result {
                Ok(asset) => {
                    log::info!("Loaded {:?} from {}", asset.kind(), path.display());
                    self.assets.accept(asset);
                }
                Err(e) => {
                    log::error!("Failed to load {}: {e:#}", path.display());
                    self.failed_loads += 1;
                }
            }
        }

        if self.built {
            return;
        }
        if let Some(ready) = self.assets.take_ready() {
            log::info!(
                "Scene assets ready: model {} part(s)/{} tris, normal map {}x{}, skybox {}px",
                ready.model.part_count(),
                ready.model.triangle_count(),
                ready.normal_map.width,
                ready.normal_map.height,
                ready.cubemap.size()
            );
            self.driver.spawn_scene(ready);
            self.built = true;
        }
    }

    /// One redraw: poll assets, then advance the animation if the scene
    /// exists. Returns `None` while still waiting for assets.
    pub fn update(&mut self, dt: f64) -> Option<FrameDelta> {
        self.collect_assets();
        self.built.then(|| self.driver.tick(dt))
    }
}
