//! Platform layer: window, event loop and frame ticking.
//!
//! - Assets load on background threads; the animation starts once the
//!   normal map, model and cubemap have all arrived and the scene is built.
//! - Any mouse button press queues one flight-mode toggle.
//! - Redraws are requested continuously; each redraw is one animator frame.
//! - GPU submission is left to a renderer; this layer only drives the scene.

use anyhow::{Context, Result};
use corelib::driver::ToggleHandle;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

pub mod clock;
pub mod config;
pub mod scene;

pub use clock::{FpsMeter, FrameClock};
pub use config::RunConfig;
pub use scene::DemoScene;

struct DemoApp {
    config: RunConfig,
    window: Option<Window>,
    scene: DemoScene,
    toggles: ToggleHandle,
    requested: bool,
    clock: FrameClock,
    fps: FpsMeter,
}

impl DemoApp {
    fn new(config: RunConfig) -> Self {
        let scene = DemoScene::new(config.aspect());
        let toggles = scene.toggle_handle();
        Self {
            config,
            window: None,
            scene,
            toggles,
            requested: false,
            clock: FrameClock::new(),
            fps: FpsMeter::new(),
        }
    }

    fn frame(&mut self) {
        if !self.scene.is_built() {
            self.scene.collect_assets();
            if !self.scene.is_built() {
                return;
            }
            // Clock starts with the scene; loading time is not a frame.
            self.clock.tick();
        }

        let dt = self.clock.tick();
        let Some(delta) = self.scene.update(dt) else {
            return;
        };
        log::trace!("Frame delta: {delta:?}");

        if self.config.show_fps {
            if let Some(fps) = self.fps.record(dt) {
                let animator = self.scene.driver().animator();
                log::info!(
                    "{fps:.1} fps, mode {:?}, t={:.1}s",
                    animator.mode(),
                    animator.elapsed()
                );
            }
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title("Aircraft Demo")
                .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
            match event_loop.create_window(attrs) {
                Ok(window) => {
                    let size = window.inner_size();
                    log::info!("Window created: {}x{}", size.width, size.height);
                    self.scene
                        .driver_mut()
                        .camera_mut()
                        .set_viewport(size.width, size.height);
                    self.window = Some(window);
                }
                Err(e) => {
                    log::error!("Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            }
        }

        if !self.requested {
            self.scene.request_scene(&self.config.asset_root);
            self.requested = true;
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Resized: {}x{}", size.width, size.height);
                self.scene
                    .driver_mut()
                    .camera_mut()
                    .set_viewport(size.width, size.height);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                log::debug!("{button:?} pressed, queueing mode toggle");
                self.toggles.request();
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the demo window and run until it is closed.
pub fn run(config: RunConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    Ok(())
}
