//! Frame-driven glue between the store, the camera rig and the renderer.
//!
//! A host owns one [`WarehouseSession`], forwards raw input to it and calls
//! [`WarehouseSession::frame`] once per frame to get the camera and the
//! pallet instances to draw.

use std::time::Instant;

use winit::event::{DeviceEvent, KeyEvent};

use crate::camera::{CameraMode, CameraPose, CameraRig, CameraUniform, NavInput, PlannerPhase};
use crate::error::LayoutError;
use crate::layout::{Footprint, LayoutParameters};
use crate::location::WarehouseId;
use crate::picking::{screen_to_ray, PickResult, RackOcclusion};
use crate::records::BoxRef;
use crate::render_data::{build_instances, PalletInstance};
use crate::store::{LoadState, WarehouseSource, WarehouseStore};
use crate::visibility::VisibilityFilter;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub pose: CameraPose,
    pub uniform: CameraUniform,
    pub phase: PlannerPhase,
    pub ready: bool,
    pub focused: Option<BoxRef>,
    pub selected: Option<BoxRef>,
    pub instances: Vec<PalletInstance>,
}

pub struct WarehouseSession {
    store: WarehouseStore,
    rig: CameraRig,
    filter: VisibilityFilter,
    occlusion: RackOcclusion,
    synced_revision: u64,
    synced_footprint: Footprint,
}

impl WarehouseSession {
    pub fn new(store: WarehouseStore) -> Self {
        let footprint = store.footprint();
        let mut session = Self {
            rig: CameraRig::new(&footprint),
            occlusion: store.occlusion_scene(),
            synced_revision: store.revision(),
            synced_footprint: footprint,
            filter: VisibilityFilter::new(),
            store,
        };
        let mode = session.store.camera_mode();
        session.set_camera_mode(mode);
        session
    }

    pub fn store(&self) -> &WarehouseStore {
        &self.store
    }

    /// Direct store access. Changes are picked up on the next frame.
    pub fn store_mut(&mut self) -> &mut WarehouseStore {
        &mut self.store
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn visibility(&self) -> &VisibilityFilter {
        &self.filter
    }

    pub fn occlusion(&self) -> &RackOcclusion {
        &self.occlusion
    }

    pub async fn load(&mut self, source: &dyn WarehouseSource) -> &LoadState {
        self.rig.cancel_focus();
        self.store.load(source).await;
        self.sync_scene();
        self.store.load_state()
    }

    pub fn set_parameters(&mut self, params: LayoutParameters) -> Result<(), LayoutError> {
        self.store.set_parameters(params)?;
        self.clear_focus();
        self.sync_scene();
        Ok(())
    }

    pub fn switch_warehouse(&mut self, id: WarehouseId) {
        self.store.switch_warehouse(id);
        self.rig.cancel_focus();
        self.sync_scene();
    }

    pub fn select(&mut self, target: BoxRef) -> Result<(), LayoutError> {
        self.store.select_cell(target)
    }

    /// Selects `target` and starts framing it.
    pub fn focus(&mut self, target: BoxRef) -> Result<(), LayoutError> {
        let center = self.store.focus(target)?;
        self.sync_scene();
        self.rig.focus_on(center);
        Ok(())
    }

    pub fn clear_focus(&mut self) {
        self.store.clear_focus();
        self.rig.cancel_focus();
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        if mode != self.rig.mode() {
            self.store.clear_focus();
        }
        self.rig.set_mode(mode);
        self.store.set_camera_mode(mode);
        self.filter.set_enabled(mode == CameraMode::FirstPerson);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.rig.projection.resize(width, height);
    }

    /// Applies one navigation input; manual input releases the focus.
    pub fn handle_input(&mut self, input: NavInput) {
        if self.rig.apply_input(input) {
            self.store.on_manual_camera_input();
        }
    }

    /// Returns whether the event was used for navigation.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        match self.rig.translate_event(event) {
            Some(input) => {
                self.handle_input(input);
                true
            }
            None => false,
        }
    }

    pub fn handle_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        match self.rig.translate_keyboard_event(event) {
            Some(input) => {
                self.handle_input(input);
                true
            }
            None => false,
        }
    }

    /// Pallet under a screen position.
    pub fn pick(&mut self, screen_pos: (f32, f32), screen_size: (f32, f32)) -> Option<PickResult> {
        self.sync_scene();
        let ray = screen_to_ray(screen_pos, screen_size, &self.rig.pose(), &self.rig.projection);
        self.occlusion.pick(&ray)
    }

    /// Selects the pallet under a screen position, if any.
    pub fn select_at(&mut self, screen_pos: (f32, f32), screen_size: (f32, f32)) -> Option<BoxRef> {
        let target = self.pick(screen_pos, screen_size)?.target;
        self.store.select_cell(target).ok()?;
        Some(target)
    }

    fn sync_scene(&mut self) {
        if self.store.revision() == self.synced_revision {
            return;
        }
        self.occlusion = self.store.occlusion_scene();
        let footprint = self.store.footprint();
        if footprint != self.synced_footprint {
            self.rig.set_footprint(&footprint);
            self.synced_footprint = footprint;
        }
        self.synced_revision = self.store.revision();
        log::debug!("scene rebuilt with {} occluders", self.occlusion.len());
    }

    /// Advances the camera by `dt` seconds and collects what to draw.
    pub fn frame(&mut self, now: Instant, dt: f32) -> FrameOutput {
        self.sync_scene();
        let pose = self.rig.tick(dt, &self.occlusion);

        let params = self.store.params();
        self.filter.update(now, pose.eye, params.gap_x, params.gap_z);

        let selection = self.store.selection();
        FrameOutput {
            pose,
            uniform: self.rig.uniform(),
            phase: self.rig.phase(),
            ready: self.store.is_ready(),
            focused: selection.focused,
            selected: selection.selected,
            instances: build_instances(&self.store, &self.filter),
        }
    }
}
