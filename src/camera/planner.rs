//! Focus framing.
//!
//! A focus request moves the planner to `Searching`. On the next tick the
//! planner tries vantage candidates around the target in a fixed order
//! (distance, then height, then angle) and keeps the first one with a clear
//! line of sight, then smooths the camera toward it while `Animating`. Manual
//! input cancels straight to `Idle`.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use super::{CameraBounds, CameraPose};
use crate::picking::{OcclusionQuery, Ray};

/// Horizontal distances from the target, nearest first.
pub const CANDIDATE_DISTANCES: [f32; 4] = [4.0, 6.0, 8.5, 12.0];
/// Heights above the target, lowest first.
pub const CANDIDATE_HEIGHTS: [f32; 4] = [1.5, 3.0, 5.0, 8.0];
/// Angles evenly spaced around the target, starting at +x.
pub const CANDIDATE_ANGLES: usize = 8;
/// Offset used when every candidate is blocked.
pub const FALLBACK_OFFSET: Vector3<f32> = Vector3::new(5.0, 3.0, 5.0);
/// A hit this close to the target counts as hitting the target itself.
pub const TARGET_TOLERANCE: f32 = 1.0;
/// Fraction of the remaining error removed each tick.
pub const SMOOTHING_FACTOR: f32 = 0.08;
/// Eye and look-at error below which the animation finishes.
pub const ARRIVAL_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerPhase {
    #[default]
    Idle,
    Searching,
    Animating,
}

/// Chosen viewpoint for a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vantage {
    pub eye: Vector3<f32>,
    pub look_at: Vector3<f32>,
    /// False when the fallback offset was used without a clear sight line.
    pub verified: bool,
    /// Index into [`candidate_offsets`] of the accepted candidate.
    pub candidate: Option<usize>,
}

impl Vantage {
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye, self.look_at)
    }
}

/// All candidate offsets in search order.
pub fn candidate_offsets() -> impl Iterator<Item = Vector3<f32>> {
    CANDIDATE_DISTANCES.into_iter().flat_map(|distance| {
        CANDIDATE_HEIGHTS.into_iter().flat_map(move |height| {
            (0..CANDIDATE_ANGLES).map(move |i| {
                let angle = i as f32 * TAU / CANDIDATE_ANGLES as f32;
                Vector3::new(distance * angle.cos(), height, distance * angle.sin())
            })
        })
    })
}

fn has_clear_sight(eye: Vector3<f32>, target: Vector3<f32>, scene: &dyn OcclusionQuery) -> bool {
    let to_target = target - eye;
    let range = to_target.magnitude();
    if range <= f32::EPSILON {
        return true;
    }
    let ray = Ray::new(eye, to_target);
    match scene.first_hit(&ray) {
        None => true,
        Some(t) => t >= range || (ray.point_at(t) - target).magnitude() <= TARGET_TOLERANCE,
    }
}

/// First candidate around `target` that is inside `bounds` and sees it.
pub fn find_vantage(
    target: Vector3<f32>,
    scene: &dyn OcclusionQuery,
    bounds: &CameraBounds,
) -> Vantage {
    for (i, offset) in candidate_offsets().enumerate() {
        let eye = target + offset;
        if !bounds.contains(&CameraPose::new(eye, target)) {
            continue;
        }
        if has_clear_sight(eye, target, scene) {
            return Vantage {
                eye,
                look_at: target,
                verified: true,
                candidate: Some(i),
            };
        }
    }

    let fallback = bounds.constrain(CameraPose::new(target + FALLBACK_OFFSET, target));
    Vantage {
        eye: fallback.eye,
        look_at: fallback.look_at,
        verified: false,
        candidate: None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct CameraPlanner {
    phase: PlannerPhase,
    pending: Option<Vector3<f32>>,
    goal: Option<Vantage>,
}

impl CameraPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    /// Goal of the current or most recent animation.
    pub fn goal(&self) -> Option<&Vantage> {
        self.goal.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase != PlannerPhase::Idle
    }

    /// Starts framing `target`. During an animation the camera keeps moving
    /// toward the old goal until the search for the new one completes.
    pub fn request_focus(&mut self, target: Vector3<f32>) {
        self.pending = Some(target);
        self.phase = PlannerPhase::Searching;
    }

    pub fn cancel(&mut self) {
        if self.phase != PlannerPhase::Idle {
            log::debug!("camera focus cancelled in {:?}", self.phase);
        }
        self.pending = None;
        self.phase = PlannerPhase::Idle;
    }

    /// Advances one simulation tick, moving `pose` toward the goal.
    pub fn tick(
        &mut self,
        pose: &mut CameraPose,
        scene: &dyn OcclusionQuery,
        bounds: &CameraBounds,
    ) -> PlannerPhase {
        if let Some(target) = self.pending.take() {
            let vantage = find_vantage(target, scene, bounds);
            log::debug!(
                "vantage for {:?}: candidate {:?}, verified {}",
                target,
                vantage.candidate,
                vantage.verified
            );
            self.goal = Some(vantage);
            self.phase = PlannerPhase::Animating;
        }

        if self.phase != PlannerPhase::Animating {
            return self.phase;
        }
        let Some(goal) = self.goal else {
            self.phase = PlannerPhase::Idle;
            return self.phase;
        };

        pose.eye += (goal.eye - pose.eye) * SMOOTHING_FACTOR;
        pose.look_at += (goal.look_at - pose.look_at) * SMOOTHING_FACTOR;

        let eye_error = (goal.eye - pose.eye).magnitude();
        let look_error = (goal.look_at - pose.look_at).magnitude();
        if eye_error < ARRIVAL_THRESHOLD && look_error < ARRIVAL_THRESHOLD {
            *pose = goal.pose();
            self.phase = PlannerPhase::Idle;
        }
        self.phase
    }
}
