//! # Camera Module
//!
//! Navigation for the warehouse scene: an orbit camera for overview, a
//! first-person camera for walking the aisles, floor bounds that keep either
//! camera inside the building, and the planner that frames a focused pallet.
//!
//! ## Key Components
//!
//! - [`OrbitCamera`] / [`FirstPersonCamera`] - the two manual cameras
//! - [`CameraController`] - winit events to [`NavInput`]
//! - [`CameraPlanner`] - occlusion-aware vantage search and smoothing
//! - [`CameraBounds`] - minimum height and floor radius
//! - [`CameraRig`] - ties the above together and emits a [`CameraPose`]

pub mod bounds;
pub mod camera_controller;
pub mod first_person;
pub mod orbit_camera;
pub mod planner;
pub mod rig;

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, Vector3};
use serde::{Deserialize, Serialize};

pub use bounds::CameraBounds;
pub use camera_controller::{CameraController, NavInput, WalkKey};
pub use first_person::FirstPersonCamera;
pub use orbit_camera::OrbitCamera;
pub use planner::{CameraPlanner, PlannerPhase, Vantage};
pub use rig::{CameraRig, CameraUniform};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// World position and look-at target of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vector3<f32>,
    pub look_at: Vector3<f32>,
}

impl CameraPose {
    pub fn new(eye: Vector3<f32>, look_at: Vector3<f32>) -> Self {
        Self { eye, look_at }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.look_at),
            Vector3::unit_y(),
        )
    }
}

/// Navigation style. First-person is the close-proximity mode in which the
/// visibility window is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    Orbit,
    FirstPerson,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 1.5,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Projection {
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// OpenGL-convention projection, used for unprojecting picks.
    pub fn matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// wgpu-convention view-projection for `pose`.
    pub fn view_projection(&self, pose: &CameraPose) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.matrix() * pose.view_matrix()
    }
}
