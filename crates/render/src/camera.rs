//! Fixed perspective camera for the offscreen renderer.

use glam::{Mat4, Vec3};

/// Perspective camera looking at the workspace.
pub struct Camera {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector of the camera.
    pub up: Vec3,
    /// Aspect ratio of the render target.
    pub aspect: f32,
    /// Field of view in radians.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera framing the table from a raised three-quarter view.
    ///
    /// The world is z-up, so the camera's up vector is +Z.
    #[must_use]
    pub fn framing(table_center: Vec3, width: u32, height: u32) -> Self {
        let eye = table_center + Vec3::new(-1.1, -1.3, 0.9);
        Self {
            eye,
            target: table_center + Vec3::new(0.0, 0.0, 0.15),
            up: Vec3::Z,
            aspect: width as f32 / height as f32,
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    /// Creates a combined view projection matrix from the camera parameters.
    #[must_use]
    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}
