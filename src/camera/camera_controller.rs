use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::CameraMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkKey {
    Forward,
    Back,
    Left,
    Right,
}

/// Camera input after translation from raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavInput {
    /// Orbit around the target (radians).
    Orbit { yaw: f32, pitch: f32 },
    /// Move eye and target together, in view-relative units.
    Pan { dx: f32, dy: f32 },
    Zoom(f32),
    /// First-person head rotation (radians).
    Look { yaw: f32, pitch: f32 },
    Walk { key: WalkKey, pressed: bool },
    Reset,
}

impl NavInput {
    /// Whether this input counts as the user taking over the camera.
    /// Releasing a walk key does not.
    pub fn is_manual(&self) -> bool {
        !matches!(self, NavInput::Walk { pressed: false, .. })
    }
}

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub look_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.1)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            look_speed: 0.003,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent, mode: CameraMode) -> Option<NavInput> {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                None
            }
            DeviceEvent::MouseWheel { delta } if mode == CameraMode::Orbit => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                Some(NavInput::Zoom(scroll_amount * self.zoom_speed))
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                match mode {
                    CameraMode::Orbit if self.is_shift_held => Some(NavInput::Pan {
                        dx: -dx * self.pan_speed,
                        dy: dy * self.pan_speed,
                    }),
                    CameraMode::Orbit => Some(NavInput::Orbit {
                        yaw: -dx * self.rotate_speed,
                        pitch: dy * self.rotate_speed,
                    }),
                    CameraMode::FirstPerson => Some(NavInput::Look {
                        yaw: -dx * self.look_speed,
                        pitch: -dy * self.look_speed,
                    }),
                }
            }
            _ => None,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) -> Option<NavInput> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let pressed = event.state == ElementState::Pressed;
        self.process_key(code, pressed)
    }

    /// Key handling shared by [`Self::process_keyed_events`].
    pub fn process_key(&mut self, code: KeyCode, pressed: bool) -> Option<NavInput> {
        let walk = |key| Some(NavInput::Walk { key, pressed });
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                if self.is_shift_held != pressed {
                    log::trace!("shift held: {pressed}");
                }
                self.is_shift_held = pressed;
                None
            }
            // Shift+C resets the orbit view
            KeyCode::KeyC if pressed && self.is_shift_held => Some(NavInput::Reset),
            KeyCode::KeyW | KeyCode::ArrowUp => walk(WalkKey::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => walk(WalkKey::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => walk(WalkKey::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => walk(WalkKey::Right),
            _ => None,
        }
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }

    pub fn set_pan_speed(&mut self, speed: f32) {
        self.pan_speed = speed;
    }
}
