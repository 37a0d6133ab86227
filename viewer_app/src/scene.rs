//! Scene state advanced once per frame

use viewer_engine::foundation::math::{utils, Vec3};
use viewer_engine::foundation::time::Timer;

use crate::movement::FirstPersonMovement;

/// Camera pose handed to the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position
    pub position: Vec3,
    /// Unit view direction
    pub direction: Vec3,
    /// Elevation above the horizon, radians
    pub inclination: f32,
}

/// Camera and clock shared by the controller and the view
pub struct SceneState {
    camera: FirstPersonMovement,
    /// Sideways and forward speed, units per second
    translation_speed: (f32, f32),
    /// Horizontal and vertical turn rate, degrees per second
    rotation_speed: (f32, f32),
    timer: Timer,
}

impl SceneState {
    /// Scene with the camera above the atrium floor, looking in
    pub fn new() -> Self {
        Self {
            camera: FirstPersonMovement::new(Vec3::new(80.0, 50.0, 0.0), 1.5, 0.5),
            translation_speed: (0.0, 0.0),
            rotation_speed: (0.0, 0.0),
            timer: Timer::new(),
        }
    }

    /// Set sideways and forward speed in units per second
    pub fn set_camera_translation_speed(&mut self, sideward: f32, forward: f32) {
        self.translation_speed = (sideward, forward);
    }

    /// Set horizontal and vertical turn rate in degrees per second
    pub fn set_camera_rotation_speed(&mut self, horizontal: f32, vertical: f32) {
        self.rotation_speed = (horizontal, vertical);
    }

    /// Current translation speed
    pub const fn camera_translation_speed(&self) -> (f32, f32) {
        self.translation_speed
    }

    /// Current rotation speed
    pub const fn camera_rotation_speed(&self) -> (f32, f32) {
        self.rotation_speed
    }

    /// Advance by the wall-clock time since the previous update
    pub fn update(&mut self) {
        self.timer.update();
        self.advance(self.timer.delta_time());
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let (sideward, forward) = self.translation_speed;
        let (horizontal, vertical) = self.rotation_speed;
        self.camera.move_forward(forward * dt);
        self.camera.move_right(sideward * dt);
        self.camera.spin_horizontal(utils::deg_to_rad(horizontal * dt));
        self.camera.spin_vertical(utils::deg_to_rad(vertical * dt));
    }

    /// Mean updates per second since the scene was created, once any time has passed
    #[allow(clippy::cast_precision_loss)]
    pub fn average_frame_rate(&self) -> Option<f32> {
        let elapsed = self.timer.total_time();
        (elapsed > 0.0).then(|| self.timer.frame_count() as f32 / elapsed)
    }

    /// Current camera pose
    pub fn camera(&mut self) -> CameraPose {
        CameraPose {
            position: self.camera.position(),
            direction: self.camera.direction(),
            inclination: self.camera.inclination(),
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}
