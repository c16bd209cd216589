use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};
use winit::event::{DeviceEvent, KeyEvent};

use super::{
    first_person::EYE_HEIGHT, CameraBounds, CameraController, CameraMode, CameraPlanner,
    CameraPose, FirstPersonCamera, NavInput, OrbitCamera, PlannerPhase, Projection, WalkKey,
};
use crate::layout::Footprint;
use crate::picking::OcclusionQuery;

/// Owns both manual cameras, the planner and the floor bounds.
///
/// Only the camera of the active [`CameraMode`] is driven; switching modes
/// carries the viewpoint over.
pub struct CameraRig {
    pub orbit: OrbitCamera,
    pub first_person: FirstPersonCamera,
    pub controller: CameraController,
    pub planner: CameraPlanner,
    pub projection: Projection,
    bounds: CameraBounds,
    mode: CameraMode,
    uniform: CameraUniform,
}

impl CameraRig {
    pub fn new(footprint: &Footprint) -> Self {
        let bounds = CameraBounds::for_footprint(footprint);
        let orbit = OrbitCamera::overview(bounds.radius);
        let mut rig = Self {
            first_person: FirstPersonCamera::new(Vector3::new(0.0, EYE_HEIGHT, 0.0), 0.0),
            orbit,
            controller: CameraController::default(),
            planner: CameraPlanner::new(),
            projection: Projection::default(),
            bounds,
            mode: CameraMode::Orbit,
            uniform: CameraUniform::default(),
        };
        let pose = rig.bounds.constrain(rig.orbit.pose());
        rig.set_pose(pose);
        rig
    }

    pub fn bounds(&self) -> &CameraBounds {
        &self.bounds
    }

    /// Adopts the bounds of a new floor and pulls the camera inside them.
    pub fn set_footprint(&mut self, footprint: &Footprint) {
        self.bounds = CameraBounds::for_footprint(footprint);
        self.orbit.bounds.max_distance = Some(self.bounds.radius * 1.5);
        let pose = self.bounds.constrain(self.pose());
        self.set_pose(pose);
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        self.planner.cancel();
        self.first_person.release();
        let pose = self.pose();
        let forward = {
            let flat = Vector3::new(pose.look_at.x - pose.eye.x, 0.0, pose.look_at.z - pose.eye.z);
            if flat.magnitude2() > f32::EPSILON {
                flat.normalize()
            } else {
                Vector3::unit_z()
            }
        };

        match mode {
            CameraMode::FirstPerson => {
                let eye = Vector3::new(pose.eye.x, EYE_HEIGHT, pose.eye.z);
                self.first_person.walk = Default::default();
                self.first_person.set_pose(CameraPose::new(eye, eye + forward));
            }
            CameraMode::Orbit => {
                let target = Vector3::new(pose.eye.x, 0.0, pose.eye.z) + forward * 8.0;
                self.orbit.set_pose(CameraPose::new(
                    pose.eye + Vector3::new(0.0, 4.0, 0.0) - forward * 4.0,
                    target,
                ));
            }
        }
        self.mode = mode;
        let pose = self.bounds.constrain(self.pose());
        self.set_pose(pose);
        log::info!("camera mode -> {:?}", mode);
    }

    pub fn pose(&self) -> CameraPose {
        match self.mode {
            CameraMode::Orbit => self.orbit.pose(),
            CameraMode::FirstPerson => self.first_person.pose(),
        }
    }

    fn set_pose(&mut self, pose: CameraPose) {
        match self.mode {
            CameraMode::Orbit => self.orbit.set_pose(pose),
            CameraMode::FirstPerson => self.first_person.set_pose(pose),
        }
        self.update_uniform(&pose);
    }

    pub fn phase(&self) -> PlannerPhase {
        self.planner.phase()
    }

    pub fn focus_on(&mut self, target: Vector3<f32>) {
        if self.mode == CameraMode::FirstPerson {
            self.first_person.hold();
        }
        self.planner.request_focus(target);
    }

    /// Stops any focus animation where it is. A first-person camera drops
    /// back to eye height.
    pub fn cancel_focus(&mut self) {
        self.planner.cancel();
        self.settle_first_person();
    }

    fn settle_first_person(&mut self) {
        if self.planner.is_active() || !self.first_person.is_held() {
            return;
        }
        self.first_person.release();
        if self.mode == CameraMode::FirstPerson {
            let pose = self.bounds.constrain(self.pose());
            self.set_pose(pose);
        }
    }

    /// Translates a raw device event into camera input.
    pub fn translate_event(&mut self, event: &DeviceEvent) -> Option<NavInput> {
        self.controller.process_events(event, self.mode)
    }

    pub fn translate_keyboard_event(&mut self, event: &KeyEvent) -> Option<NavInput> {
        self.controller.process_keyed_events(event)
    }

    /// Applies one input. Returns true when it was a manual manipulation, in
    /// which case any focus animation has been cancelled.
    pub fn apply_input(&mut self, input: NavInput) -> bool {
        let manual = input.is_manual();
        if manual {
            self.cancel_focus();
        }

        match (self.mode, input) {
            (CameraMode::Orbit, NavInput::Orbit { yaw, pitch }) => {
                self.orbit.add_yaw(yaw);
                self.orbit.add_pitch(pitch);
            }
            (CameraMode::Orbit, NavInput::Pan { dx, dy }) => self.orbit.pan((dx, dy)),
            (CameraMode::Orbit, NavInput::Zoom(delta)) => self.orbit.add_distance(delta),
            (CameraMode::Orbit, NavInput::Reset) => {
                log::debug!("resetting orbit camera");
                self.orbit.reset_to_default();
            }
            (CameraMode::FirstPerson, NavInput::Look { yaw, pitch }) => {
                self.first_person.look(yaw, pitch)
            }
            (CameraMode::FirstPerson, NavInput::Walk { key, pressed }) => {
                let walk = &mut self.first_person.walk;
                match key {
                    WalkKey::Forward => walk.forward = pressed,
                    WalkKey::Back => walk.back = pressed,
                    WalkKey::Left => walk.left = pressed,
                    WalkKey::Right => walk.right = pressed,
                }
            }
            _ => {}
        }

        // Bounds hold for manual motion too.
        let pose = self.bounds.constrain(self.pose());
        self.set_pose(pose);
        manual
    }

    /// One frame: walking, planner smoothing, then bounds.
    pub fn tick(&mut self, dt: f32, scene: &dyn OcclusionQuery) -> CameraPose {
        if self.mode == CameraMode::FirstPerson {
            self.first_person.step(dt);
        }
        let mut pose = self.pose();
        self.planner.tick(&mut pose, scene, &self.bounds);
        let pose = self.bounds.constrain(pose);
        self.set_pose(pose);
        self.settle_first_person();
        self.pose()
    }

    pub fn uniform(&self) -> CameraUniform {
        self.uniform
    }

    fn update_uniform(&mut self, pose: &CameraPose) {
        self.uniform.view_position = [pose.eye.x, pose.eye.y, pose.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.projection.view_projection(pose));
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::EmptyScene;
    use cgmath::Vector2;

    fn floor() -> Footprint {
        Footprint {
            width: 60.0,
            depth: 40.0,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }

    #[test]
    fn test_starts_inside_bounds() {
        let rig = CameraRig::new(&floor());
        assert!(rig.bounds().contains(&rig.pose()));
        assert_eq!(rig.uniform().view_position[0], rig.pose().eye.x);
    }

    #[test]
    fn test_manual_drag_cancels_focus() {
        let mut rig = CameraRig::new(&floor());
        rig.focus_on(Vector3::new(5.0, 1.0, 5.0));
        rig.tick(1.0 / 60.0, &EmptyScene);
        assert_eq!(rig.phase(), PlannerPhase::Animating);

        assert!(rig.apply_input(NavInput::Orbit {
            yaw: 0.1,
            pitch: 0.0
        }));
        assert_eq!(rig.phase(), PlannerPhase::Idle);

        let after_drag = rig.pose();
        rig.tick(1.0 / 60.0, &EmptyScene);
        assert_eq!(rig.pose(), after_drag);
    }

    #[test]
    fn test_pan_past_radius_slides_on_boundary() {
        let mut rig = CameraRig::new(&floor());
        for _ in 0..200 {
            rig.apply_input(NavInput::Pan { dx: 5.0, dy: 0.0 });
        }
        let pose = rig.pose();
        let radial = Vector2::new(pose.eye.x, pose.eye.z).magnitude();
        assert!(radial <= rig.bounds().radius + 1e-3);
        assert!(pose.eye.y >= rig.bounds().min_height);
    }

    #[test]
    fn test_first_person_walk_and_mode_switch() {
        let mut rig = CameraRig::new(&floor());
        rig.set_mode(CameraMode::FirstPerson);
        assert_eq!(rig.pose().eye.y, EYE_HEIGHT);

        let start = rig.pose().eye;
        rig.apply_input(NavInput::Walk {
            key: WalkKey::Forward,
            pressed: true,
        });
        rig.tick(0.25, &EmptyScene);
        assert!((rig.pose().eye - start).magnitude() > 0.5);
        assert_eq!(rig.pose().eye.y, EYE_HEIGHT);

        rig.set_mode(CameraMode::Orbit);
        assert_eq!(rig.mode(), CameraMode::Orbit);
        assert!(rig.bounds().contains(&rig.pose()));
    }

    #[test]
    fn test_first_person_focus_settles_at_eye_height() {
        let mut rig = CameraRig::new(&floor());
        rig.set_mode(CameraMode::FirstPerson);
        let target = Vector3::new(5.0, 1.0, 5.0);
        rig.focus_on(target);

        let mut ticks = 0;
        while rig.phase() == PlannerPhase::Searching || rig.phase() == PlannerPhase::Animating {
            rig.tick(1.0 / 60.0, &EmptyScene);
            ticks += 1;
            assert!(ticks < 600, "first-person focus did not settle");
        }

        let pose = rig.pose();
        assert_eq!(pose.eye.y, EYE_HEIGHT);
        let facing = (pose.look_at - pose.eye).normalize();
        assert!(facing.dot((target - pose.eye).normalize()) > 0.9999);
        assert!(!rig.first_person.is_held());
    }

    #[test]
    fn test_first_person_look_cancels_focus_at_eye_height() {
        let mut rig = CameraRig::new(&floor());
        rig.set_mode(CameraMode::FirstPerson);
        rig.focus_on(Vector3::new(5.0, 1.0, 5.0));
        for _ in 0..10 {
            rig.tick(1.0 / 60.0, &EmptyScene);
        }
        assert_eq!(rig.phase(), PlannerPhase::Animating);

        assert!(rig.apply_input(NavInput::Look {
            yaw: 0.1,
            pitch: 0.0
        }));
        assert_eq!(rig.phase(), PlannerPhase::Idle);
        assert_eq!(rig.pose().eye.y, EYE_HEIGHT);
    }
}
