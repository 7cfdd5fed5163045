//! Frame driver: owns the animator, the scene world and the camera, and
//! applies each frame's [`FrameDelta`] to them.
//!
//! Mode toggles may come from any thread through a [`ToggleHandle`]; they are
//! queued and drained at the start of the next [`FlightDriver::tick`], so a
//! frame never observes a half-applied toggle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use asset::ReadyAssets;
use asset::cube::CubeMapData;
use asset::mesh::ModelData;
use asset::texture::TextureData;

use crate::animator::{AnimationState, Animator, FrameDelta, FrameInput};
use crate::camera::Camera;
use crate::ecs::{Entity, MeshKind, Renderable, World};
use crate::transform::Transform;
use crate::{DVec3, Vec3, vec3};

pub const CAMERA_START: Vec3 = vec3(0.0, 250.0, -500.0);
pub const CAMERA_NEAR: f32 = 0.5;
pub const CAMERA_FAR: f32 = 14000.0;
pub const AIRCRAFT_START: Vec3 = vec3(0.0, 200.0, 0.0);
pub const AIRCRAFT_SCALE: f32 = 20.0;
/// The model is authored nose-up; pitch it level.
pub const AIRCRAFT_PITCH_DEG: f32 = 90.0;
/// Side of the square sea plane, in world units.
pub const SEA_SIZE: f32 = 50_000.0;
/// Sea normal map repeats across the plane.
pub const SEA_UV_SCALE: f32 = 100.0;

/// Cloneable, thread-safe sender of mode toggle requests.
#[derive(Clone, Debug, Default)]
pub struct ToggleHandle(Arc<AtomicU32>);

impl ToggleHandle {
    /// Queue one toggle; applied at the start of the next frame.
    pub fn request(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    fn drain(&self) -> u32 {
        self.0.swap(0, Ordering::AcqRel)
    }
}

pub struct FlightDriver {
    animator: Animator,
    world: World,
    camera: Camera,
    toggles: ToggleHandle,
    aircraft: Option<Entity>,
    sea: Option<Entity>,
}

impl FlightDriver {
    pub fn new(aspect: f32) -> Self {
        let camera = Camera::new_perspective(
            CAMERA_START,
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            CAMERA_NEAR,
            CAMERA_FAR,
            aspect,
        );
        Self::with_animator(Animator::new(), camera)
    }

    /// Build around an existing animator and camera (e.g. to resume a run).
    pub fn with_animator(animator: Animator, camera: Camera) -> Self {
        Self {
            animator,
            world: World::new(),
            camera,
            toggles: ToggleHandle::default(),
            aircraft: None,
            sea: None,
        }
    }

    pub fn toggle_handle(&self) -> ToggleHandle {
        self.toggles.clone()
    }

    #[inline]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn aircraft(&self) -> Option<Entity> {
        self.aircraft
    }

    #[inline]
    pub fn sea(&self) -> Option<Entity> {
        self.sea
    }

    /// Build the whole scene from a complete asset set: aircraft first, then
    /// skybox and sea.
    pub fn spawn_scene(&mut self, ready: ReadyAssets) {
        let cubemap = Arc::new(ready.cubemap);
        self.spawn_aircraft(Arc::new(ready.model));
        self.spawn_sea(Arc::new(ready.normal_map), cubemap);
    }

    /// Place the aircraft model in the scene and aim the camera at it.
    /// Spawning twice keeps the first aircraft.
    pub fn spawn_aircraft(&mut self, model: Arc<ModelData>) -> Entity {
        if let Some(e) = self.aircraft {
            log::warn!("Aircraft already in scene (entity {e}), ignoring respawn");
            return e;
        }

        let stale = self.toggles.drain();
        if stale > 0 {
            log::debug!("Dropping {stale} toggle(s) queued before the aircraft existed");
        }

        let mut t = Transform::from_trs(AIRCRAFT_START, Vec3::ZERO, Vec3::splat(AIRCRAFT_SCALE));
        t.add_pitch_degrees(AIRCRAFT_PITCH_DEG);
        let parts = model.part_count();
        let e = self
            .world
            .spawn(t, Some(Renderable::new(MeshKind::Model { model })));
        self.camera.look_at(t.translation);
        self.aircraft = Some(e);
        log::info!("Aircraft spawned as entity {e} with {parts} part(s)");
        e
    }

    /// Add the skybox and the sea plane at y = 0. The cubemap is shared by
    /// the skybox and the sea reflection.
    pub fn spawn_sea(&mut self, normal_map: Arc<TextureData>, cubemap: Arc<CubeMapData>) -> Entity {
        if let Some(e) = self.sea {
            log::warn!("Sea already in scene (entity {e}), ignoring respawn");
            return e;
        }

        let skybox = MeshKind::Skybox {
            cubemap: Arc::clone(&cubemap),
        };
        self.world
            .spawn(Transform::identity(), Some(Renderable::new(skybox)));
        let plane = MeshKind::Plane {
            width: SEA_SIZE,
            height: SEA_SIZE,
            uv_scale: SEA_UV_SCALE,
            normal_map,
            env_map: cubemap,
        };
        let e = self
            .world
            .spawn(Transform::identity(), Some(Renderable::new(plane)));
        self.sea = Some(e);
        log::info!("Sea spawned as entity {e} ({SEA_SIZE}x{SEA_SIZE}, uv x{SEA_UV_SCALE})");
        e
    }

    /// Run one frame: apply queued toggles, advance the animator, push the
    /// result into the world and camera.
    pub fn tick(&mut self, dt: f64) -> FrameDelta {
        self.drain_toggles();

        let object_position = self
            .aircraft
            .and_then(|e| self.world.transform(e))
            .map_or(DVec3::ZERO, |t| t.translation.as_dvec3());
        let input = FrameInput {
            has_moving_object: self.aircraft.is_some(),
            has_water_surface: self.sea.is_some(),
            object_position,
        };

        let delta = self.animator.advance(dt, input);
        self.apply(&delta);
        delta
    }

    fn drain_toggles(&mut self) {
        let pending = self.toggles.drain();
        if pending == 0 {
            return;
        }
        // Clicks only steer the aircraft once it is in the scene.
        if self.aircraft.is_none() {
            log::debug!("Dropping {pending} toggle(s): no aircraft yet");
            return;
        }
        let mut mode: AnimationState = self.animator.mode();
        for _ in 0..pending {
            mode = self.animator.toggle_mode();
        }
        log::debug!("Animation mode -> {mode:?}");
    }

    fn apply(&mut self, delta: &FrameDelta) {
        if let (Some(e), Some(aircraft)) = (self.aircraft, delta.aircraft) {
            if let Some(t) = self.world.transform_mut(e) {
                t.set_roll_degrees(aircraft.roll_degrees as f32);
                if let Some(step) = aircraft.loop_step {
                    t.translation += step.translation.as_vec3();
                    t.add_pitch_degrees(step.pitch_degrees as f32);
                }
            }
        }

        self.camera.eye.x = delta.camera.x as f32;
        self.camera.eye.z = delta.camera.z as f32;
        if let Some(target) = delta.look_at {
            self.camera.look_at(target.as_vec3());
        }

        if let (Some(e), Some(offset)) = (self.sea, delta.scroll_offset) {
            if let Some(r) = self.world.renderable_mut(e) {
                r.uv_offset.y = offset as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(parts: usize) -> ReadyAssets {
        let face = TextureData::new_rgba8(1, 1, vec![0; 4]).unwrap();
        ReadyAssets {
            normal_map: TextureData::new_rgba8(2, 2, vec![7; 16]).unwrap(),
            model: ModelData {
                parts: (0..parts)
                    .map(|i| asset::mesh::MeshPart::new(format!("part{i}")))
                    .collect(),
            },
            cubemap: CubeMapData::from_faces(vec![face; 6]).unwrap(),
        }
    }

    fn ready_driver() -> FlightDriver {
        let mut d = FlightDriver::new(16.0 / 9.0);
        d.spawn_scene(assets(3));
        d
    }

    #[test]
    fn empty_scene_only_orbits_camera() {
        let mut d = FlightDriver::new(1.0);
        let delta = d.tick(0.016);
        assert!(delta.aircraft.is_none());
        assert!(delta.scroll_offset.is_none());
        assert!((d.camera().eye.x - 0.01f32.cos() * 400.0).abs() < 1e-3);
        assert!((d.camera().eye.z - 0.01f32.sin() * 400.0).abs() < 1e-3);
        assert_eq!(d.camera().eye.y, CAMERA_START.y);
    }

    #[test]
    fn spawn_aircraft_places_and_aims_camera() {
        let d = ready_driver();
        let e = d.aircraft().unwrap();
        let t = d.world().transform(e).unwrap();
        assert_eq!(t.translation, AIRCRAFT_START);
        assert_eq!(t.scale, Vec3::splat(20.0));
        assert!((t.rotation_euler.x - 90f32.to_radians()).abs() < 1e-6);
        assert_eq!(d.camera().target, AIRCRAFT_START);
        match &d.world().renderable(e).unwrap().mesh {
            MeshKind::Model { model } => assert_eq!(model.part_count(), 3),
            other => panic!("aircraft drew {other:?}"),
        }
    }

    #[test]
    fn spawned_nodes_share_the_given_assets() {
        let ready = assets(2);
        let model = Arc::new(ready.model);
        let normal_map = Arc::new(ready.normal_map);
        let cubemap = Arc::new(ready.cubemap);

        let mut d = FlightDriver::new(1.0);
        let aircraft = d.spawn_aircraft(Arc::clone(&model));
        let sea = d.spawn_sea(Arc::clone(&normal_map), Arc::clone(&cubemap));

        match &d.world().renderable(aircraft).unwrap().mesh {
            MeshKind::Model { model: held } => assert!(Arc::ptr_eq(held, &model)),
            other => panic!("aircraft drew {other:?}"),
        }
        match &d.world().renderable(sea).unwrap().mesh {
            MeshKind::Plane {
                width,
                uv_scale,
                normal_map: held_map,
                env_map,
                ..
            } => {
                assert_eq!(*width, SEA_SIZE);
                assert_eq!(*uv_scale, SEA_UV_SCALE);
                assert!(Arc::ptr_eq(held_map, &normal_map));
                assert!(Arc::ptr_eq(env_map, &cubemap));
            }
            other => panic!("sea drew {other:?}"),
        }
        let skyboxes: Vec<_> = d
            .world()
            .iter_renderables()
            .filter_map(|(_, r)| match &r.mesh {
                MeshKind::Skybox { cubemap } => Some(Arc::clone(cubemap)),
                _ => None,
            })
            .collect();
        assert_eq!(skyboxes.len(), 1);
        assert!(Arc::ptr_eq(&skyboxes[0], &cubemap));
    }

    #[test]
    fn respawn_is_ignored() {
        let mut d = ready_driver();
        let first = d.aircraft().unwrap();
        let extra = assets(7);
        assert_eq!(d.spawn_aircraft(Arc::new(extra.model)), first);
        let sea = d.sea().unwrap();
        assert_eq!(
            d.spawn_sea(Arc::new(extra.normal_map), Arc::new(extra.cubemap)),
            sea
        );
        // aircraft + skybox + sea
        assert_eq!(d.world().len(), 3);
    }

    #[test]
    fn toggles_before_aircraft_are_dropped() {
        let mut d = FlightDriver::new(1.0);
        d.toggle_handle().request();
        d.tick(0.016);
        assert_eq!(d.animator().mode(), AnimationState::Bank);

        d.spawn_aircraft(Arc::new(assets(1).model));
        d.tick(0.016);
        assert_eq!(d.animator().mode(), AnimationState::Bank);
    }

    #[test]
    fn clicks_while_loading_do_not_carry_into_the_scene() {
        let mut d = FlightDriver::new(1.0);
        d.toggle_handle().request();
        d.spawn_scene(assets(1));
        d.tick(0.016);
        assert_eq!(d.animator().mode(), AnimationState::Bank);
    }

    #[test]
    fn toggle_from_other_thread_applies_next_tick() {
        let mut d = ready_driver();
        let handle = d.toggle_handle();
        std::thread::spawn(move || handle.request())
            .join()
            .unwrap();
        assert_eq!(d.animator().mode(), AnimationState::Bank);

        let delta = d.tick(0.016);
        assert_eq!(d.animator().mode(), AnimationState::Loop);
        assert!(delta.aircraft.unwrap().loop_step.is_some());
    }

    #[test]
    fn two_queued_toggles_cancel_out() {
        let mut d = ready_driver();
        let h = d.toggle_handle();
        h.request();
        h.request();
        d.tick(0.016);
        assert_eq!(d.animator().mode(), AnimationState::Bank);
    }

    #[test]
    fn bank_keeps_position_and_sets_roll() {
        let mut d = ready_driver();
        let e = d.aircraft().unwrap();
        for _ in 0..20 {
            d.tick(0.016);
        }
        let t = d.world().transform(e).unwrap();
        assert_eq!(t.translation, AIRCRAFT_START);
        let expected = ((0.02f64 * 20.0).sin() * 25.0) as f32;
        assert!((t.rotation_euler.z - expected.to_radians()).abs() < 1e-5);
        assert_eq!(d.camera().target, AIRCRAFT_START);
    }

    #[test]
    fn loop_moves_aircraft_and_camera_follows() {
        let mut d = ready_driver();
        let e = d.aircraft().unwrap();
        d.toggle_handle().request();

        let mut expected = AIRCRAFT_START.as_dvec3();
        for _ in 0..10 {
            let delta = d.tick(0.016);
            expected += delta.aircraft.unwrap().loop_step.unwrap().translation;
        }
        let t = d.world().transform(e).unwrap();
        assert!((t.translation.as_dvec3() - expected).length() < 1e-3);
        assert!((d.camera().target - t.translation).length() < 1e-3);
        assert!((d.animator().loop_phase() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn full_loop_returns_to_bank() {
        let mut d = ready_driver();
        d.toggle_handle().request();
        // 2π / 0.05 ≈ 125.7 frames
        for _ in 0..126 {
            d.tick(0.016);
        }
        assert_eq!(d.animator().mode(), AnimationState::Bank);
        assert_eq!(d.animator().loop_phase(), 0.0);
    }

    #[test]
    fn sea_scrolls_every_frame() {
        let mut d = ready_driver();
        let sea = d.sea().unwrap();
        for _ in 0..5 {
            d.tick(0.0);
        }
        let r = d.world().renderable(sea).unwrap();
        assert!((r.uv_offset.y + 0.2).abs() < 1e-6);
        assert_eq!(d.animator().elapsed(), 0.0);
    }
}
