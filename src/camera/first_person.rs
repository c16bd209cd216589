use cgmath::{InnerSpace, Vector3};

use super::CameraPose;

/// Eye height of a walking observer.
pub const EYE_HEIGHT: f32 = 1.7;

/// Walking speed in world units per second.
pub const WALK_SPEED: f32 = 4.0;

/// Which walk keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl WalkState {
    pub fn is_moving(&self) -> bool {
        self.forward != self.back || self.left != self.right
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    pub eye: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub walk: WalkState,
    /// Look-at point kept while a focus animation drives the camera.
    held_look_at: Option<Vector3<f32>>,
}

impl FirstPersonCamera {
    pub fn new(eye: Vector3<f32>, yaw: f32) -> Self {
        Self {
            eye,
            yaw,
            pitch: 0.0,
            walk: WalkState::default(),
            held_look_at: None,
        }
    }

    pub fn direction(&self) -> Vector3<f32> {
        Vector3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    pub fn pose(&self) -> CameraPose {
        let look_at = self
            .held_look_at
            .unwrap_or_else(|| self.eye + self.direction());
        CameraPose::new(self.eye, look_at)
    }

    /// Adopts `pose`, looking along its eye -> look-at direction.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.eye = pose.eye;
        if self.held_look_at.is_some() {
            self.held_look_at = Some(pose.look_at);
        }
        let dir = pose.look_at - pose.eye;
        let len = dir.magnitude();
        if len > f32::EPSILON {
            self.pitch = (dir.y / len).clamp(-1.0, 1.0).asin();
            self.yaw = dir.x.atan2(dir.z);
        }
    }

    /// Keeps the current look-at point across `set_pose` calls instead of
    /// rebuilding it one unit ahead of the eye.
    pub fn hold(&mut self) {
        if self.held_look_at.is_none() {
            self.held_look_at = Some(self.eye + self.direction());
        }
    }

    pub fn is_held(&self) -> bool {
        self.held_look_at.is_some()
    }

    /// Returns to walking height, still facing the held point.
    pub fn release(&mut self) {
        let Some(look_at) = self.held_look_at.take() else {
            return;
        };
        self.eye.y = EYE_HEIGHT;
        self.set_pose(CameraPose::new(self.eye, look_at));
    }

    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-limit, limit);
    }

    /// Moves along the floor according to the held keys.
    pub fn step(&mut self, dt: f32) {
        if !self.walk.is_moving() {
            return;
        }
        let forward = Vector3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        let right = Vector3::new(-forward.z, 0.0, forward.x);

        let axis = |positive: bool, negative: bool| (positive as i32 - negative as i32) as f32;
        let movement = forward * axis(self.walk.forward, self.walk.back)
            + right * axis(self.walk.right, self.walk.left);

        if movement.magnitude2() > 0.0 {
            self.eye += movement.normalize() * WALK_SPEED * dt;
        }
    }
}
