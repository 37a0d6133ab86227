//! View delegate: projection bookkeeping and the frame clear

use std::cell::RefCell;
use std::rc::Rc;

use viewer_engine::foundation::cache::Cached;
use viewer_engine::foundation::math::{utils, Mat4};
use viewer_engine::{ViewDelegate, Window};

use crate::scene::{CameraPose, SceneState};

/// Vertical field of view, degrees
const FIELD_OF_VIEW: f32 = 50.0;
const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 1000.0;

/// Horizon and zenith colours blended by camera inclination
const HORIZON: [f32; 3] = [0.55, 0.6, 0.7];
const ZENITH: [f32; 3] = [0.15, 0.25, 0.55];

/// Renders the scene from the controller's camera
pub struct ViewerView {
    scene: Rc<RefCell<SceneState>>,
    size: (u32, u32),
    projection: Cached<Mat4>,
    frames: u64,
}

impl ViewerView {
    /// View onto `scene`
    pub const fn new(scene: Rc<RefCell<SceneState>>) -> Self {
        Self {
            scene,
            size: (0, 0),
            projection: Cached::new(),
            frames: 0,
        }
    }

    /// Projection for the last reported size
    #[allow(clippy::cast_precision_loss)]
    pub fn projection(&mut self) -> Mat4 {
        let (width, height) = self.size;
        let aspect = width as f32 / height.max(1) as f32;
        *self
            .projection
            .get_or_compute(|| utils::perspective(FIELD_OF_VIEW, aspect, NEAR_PLANE, FAR_PLANE))
    }
}

/// Clear colour for a camera pitched `inclination` radians above the horizon
pub fn sky_tint(pose: &CameraPose) -> [f32; 4] {
    let t = pose.inclination.sin().clamp(0.0, 1.0);
    let mix = |i: usize| HORIZON[i] + (ZENITH[i] - HORIZON[i]) * t;
    [mix(0), mix(1), mix(2), 1.0]
}

impl ViewDelegate for ViewerView {
    fn start(&mut self, _window: &Window) {
        log::info!("View started");
        self.frames = 0;
    }

    fn reset(&mut self, _window: &Window, width: u32, height: u32) {
        log::debug!("View reset to {}x{}", width, height);
        self.size = (width, height);
        self.projection.invalidate();
    }

    fn stop(&mut self, _window: &Window) {
        match self.scene.borrow().average_frame_rate() {
            Some(rate) => log::info!("View stopped after {} frames, {:.1} fps", self.frames, rate),
            None => log::info!("View stopped after {} frames", self.frames),
        }
    }

    fn render(&mut self, window: &Window) {
        let pose = self.scene.borrow_mut().camera();
        let projection = self.projection();
        log::trace!(
            "Frame {} from {:?} looking {:?}, projection[0] = {}",
            self.frames,
            pose.position,
            pose.direction,
            projection[(0, 0)]
        );
        window.clear(sky_tint(&pose));
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use viewer_engine::foundation::math::Vec3;

    fn pose(inclination: f32) -> CameraPose {
        CameraPose {
            position: Vec3::zeros(),
            direction: Vec3::new(0.0, 0.0, -1.0),
            inclination,
        }
    }

    #[test]
    fn test_projection_follows_aspect() {
        let mut view = ViewerView::new(Rc::new(RefCell::new(SceneState::new())));
        view.size = (1024, 576);
        let wide = view.projection();

        // Stale until a reset invalidates it
        view.size = (576, 576);
        assert_relative_eq!(view.projection(), wide);

        view.projection.invalidate();
        let square = view.projection();
        assert_relative_eq!(square[(0, 0)], square[(1, 1)], epsilon = 1e-6);
        assert!(wide[(0, 0)] < square[(0, 0)]);
    }

    #[test]
    fn test_zero_height_does_not_divide_by_zero() {
        let mut view = ViewerView::new(Rc::new(RefCell::new(SceneState::new())));
        view.size = (640, 0);
        assert!(view.projection().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_sky_tint_blends_towards_zenith() {
        assert_relative_eq!(sky_tint(&pose(0.0))[2], HORIZON[2]);
        assert_relative_eq!(
            sky_tint(&pose(std::f32::consts::FRAC_PI_2))[2],
            ZENITH[2],
            epsilon = 1e-6
        );
        assert_relative_eq!(sky_tint(&pose(-1.0))[0], HORIZON[0]);
    }
}
