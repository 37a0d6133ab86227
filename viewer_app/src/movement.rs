//! First-person camera movement

use viewer_engine::foundation::cache::Cached;
use viewer_engine::foundation::math::Vec3;

#[derive(Debug, Clone, Copy)]
struct Basis {
    forward: Vec3,
    right: Vec3,
}

/// Position and heading driven by strafe and spin commands
///
/// Azimuth 0 looks down -Z; positive azimuth turns left. Inclination is measured up from
/// the horizon. The forward/right basis is only recomputed after a spin.
#[derive(Debug, Clone)]
pub struct FirstPersonMovement {
    position: Vec3,
    azimuth: f32,
    inclination: f32,
    basis: Cached<Basis>,
}

impl FirstPersonMovement {
    /// Start at `position` with the given angles in radians
    pub fn new(position: Vec3, azimuth: f32, inclination: f32) -> Self {
        Self {
            position,
            azimuth,
            inclination,
            basis: Cached::new(),
        }
    }

    /// Current position
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction
    pub fn direction(&mut self) -> Vec3 {
        self.basis().forward
    }

    /// Elevation above the horizon, radians
    pub const fn inclination(&self) -> f32 {
        self.inclination
    }

    /// Move along the view direction
    pub fn move_forward(&mut self, distance: f32) {
        let forward = self.basis().forward;
        self.position += forward * distance;
    }

    /// Strafe along the horizontal right vector
    pub fn move_right(&mut self, distance: f32) {
        let right = self.basis().right;
        self.position += right * distance;
    }

    /// Turn around the vertical axis
    pub fn spin_horizontal(&mut self, radians: f32) {
        self.azimuth += radians;
        self.basis.invalidate();
    }

    /// Tilt up or down
    pub fn spin_vertical(&mut self, radians: f32) {
        self.inclination += radians;
        self.basis.invalidate();
    }

    fn basis(&mut self) -> Basis {
        let (azimuth, inclination) = (self.azimuth, self.inclination);
        *self.basis.get_or_compute(|| {
            let (sin_azi, cos_azi) = azimuth.sin_cos();
            let (sin_inc, cos_inc) = inclination.sin_cos();
            Basis {
                forward: Vec3::new(cos_inc * -sin_azi, sin_inc, cos_inc * -cos_azi),
                right: Vec3::new(cos_azi, 0.0, -sin_azi),
            }
        })
    }
}
