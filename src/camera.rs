//! Euler-angle camera.
//!
//! The camera stores its orientation as pitch/roll/yaw (radians) and keeps the
//! derived basis vectors `front`, `right` and `up` in sync with pitch and yaw.
//! Roll is deliberately kept out of the basis: it only tilts the final view
//! matrix about `front`.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

/// wgpu clip space has z in [0, 1] while cgmath builds OpenGL style [-1, 1]
/// projections, so every projection is post-multiplied with this matrix.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    fov: f32,
    eye: Vector3<f32>,
    pitch: f32,
    roll: f32,
    yaw: f32,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

/// Partial camera update: only the fields that are `Some` are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraUpdate {
    pub fov: Option<f32>,
    pub eye: Option<Vector3<f32>>,
    pub pitch: Option<f32>,
    pub roll: Option<f32>,
    pub yaw: Option<f32>,
}

impl CameraUpdate {
    /// Update every field at once.
    pub fn all(fov: f32, eye: Vector3<f32>, pitch: f32, roll: f32, yaw: f32) -> Self {
        Self {
            fov: Some(fov),
            eye: Some(eye),
            pitch: Some(pitch),
            roll: Some(roll),
            yaw: Some(yaw),
        }
    }

    pub fn fov(mut self, fov: f32) -> Self {
        self.fov = Some(fov);
        self
    }

    pub fn eye(mut self, eye: Vector3<f32>) -> Self {
        self.eye = Some(eye);
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn roll(mut self, roll: f32) -> Self {
        self.roll = Some(roll);
        self
    }

    pub fn yaw(mut self, yaw: f32) -> Self {
        self.yaw = Some(yaw);
        self
    }
}

impl Camera {
    pub fn new(fov: f32, eye: Vector3<f32>, pitch: f32, roll: f32, yaw: f32) -> Self {
        let mut camera = Self {
            fov,
            eye,
            pitch,
            roll,
            yaw,
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            up: WORLD_UP,
        };
        camera.recompute_vectors();
        camera
    }

    /// Apply the selected fields of `update`, then recompute the basis.
    pub fn set(&mut self, update: CameraUpdate) {
        if let Some(fov) = update.fov {
            self.fov = fov;
        }
        if let Some(eye) = update.eye {
            self.eye = eye;
        }
        if let Some(pitch) = update.pitch {
            self.pitch = pitch;
        }
        if let Some(roll) = update.roll {
            self.roll = roll;
        }
        if let Some(yaw) = update.yaw {
            self.yaw = yaw;
        }
        self.recompute_vectors();
    }

    fn recompute_vectors(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Look from `eye` along `front`, then tilt by `roll` about `front`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye.x, self.eye.y, self.eye.z);
        let view = Matrix4::look_at_rh(eye, eye + self.front, self.up);
        view * Matrix4::from_axis_angle(self.front, Rad(self.roll))
    }

    pub fn projection_matrix(&self, width: u32, height: u32, z_near: f32, z_far: f32) -> Matrix4<f32> {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        OPENGL_TO_WGPU_MATRIX * perspective(Rad(self.fov), aspect, z_near, z_far)
    }
}

impl Default for Camera {
    /// 45° field of view, three units in front of the origin, looking at it.
    fn default() -> Self {
        Self::new(
            45f32.to_radians(),
            Vector3::new(0.0, 0.0, 3.0),
            0.0,
            0.0,
            (-90f32).to_radians(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_basis(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert!((f.magnitude() - 1.0).abs() < EPS, "front not unit: {f:?}");
        assert!((r.magnitude() - 1.0).abs() < EPS, "right not unit: {r:?}");
        assert!((u.magnitude() - 1.0).abs() < EPS, "up not unit: {u:?}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn basis_is_orthonormal_across_pitch_and_yaw() {
        let mut camera = Camera::default();
        // pitch stays clear of ±90° where front is parallel to world up
        for pitch_step in -8..=8 {
            for yaw_step in 0..24 {
                let pitch = pitch_step as f32 * 0.18;
                let yaw = yaw_step as f32 * std::f32::consts::TAU / 24.0;
                camera.set(CameraUpdate::default().pitch(pitch).yaw(yaw));
                assert_basis(&camera);
            }
        }
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let camera = Camera::default();
        assert!((camera.front() - Vector3::new(0.0, 0.0, -1.0)).magnitude() < EPS);
        assert!((camera.right() - Vector3::new(1.0, 0.0, 0.0)).magnitude() < EPS);
        assert!((camera.up() - WORLD_UP).magnitude() < EPS);
    }

    #[test]
    fn partial_update_leaves_other_fields_untouched() {
        let mut camera = Camera::new(0.7, Vector3::new(1.0, 2.0, 3.0), 0.1, 0.2, 0.3);
        let before = camera;
        for i in 0..10 {
            camera.set(CameraUpdate::default().fov(0.5 + i as f32 * 0.01));
            assert_eq!(camera.eye().x.to_bits(), before.eye().x.to_bits());
            assert_eq!(camera.eye().y.to_bits(), before.eye().y.to_bits());
            assert_eq!(camera.eye().z.to_bits(), before.eye().z.to_bits());
            assert_eq!(camera.pitch().to_bits(), before.pitch().to_bits());
            assert_eq!(camera.roll().to_bits(), before.roll().to_bits());
            assert_eq!(camera.yaw().to_bits(), before.yaw().to_bits());
        }
        assert_eq!(camera.front(), before.front());
    }

    #[test]
    fn roll_does_not_touch_the_basis() {
        let mut camera = Camera::default();
        let before = camera;
        camera.set(CameraUpdate::default().roll(1.0));
        assert_eq!(camera.front(), before.front());
        assert_eq!(camera.right(), before.right());
        assert_eq!(camera.up(), before.up());
        assert_ne!(camera.view_matrix(), before.view_matrix());
    }
}
