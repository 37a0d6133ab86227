//! Math utilities and types
//!
//! Provides the few math types the viewer passes around.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math utility functions
pub mod utils {
    use super::Mat4;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Right-handed OpenGL perspective projection
    ///
    /// `aspect` is width over height; a zero height should be clamped by the caller.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, deg_to_rad(fov_degrees), near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(utils::deg_to_rad(180.0), std::f32::consts::PI);
    }

    #[test]
    fn test_perspective_maps_near_plane_to_minus_one() {
        let projection = utils::perspective(60.0, 16.0 / 9.0, 1.0, 100.0);
        let clip = projection * nalgebra::Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(clip.z / clip.w, -1.0, epsilon = 1e-5);
    }
}
