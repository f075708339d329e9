//! Placed instances of a model.

use std::collections::HashMap;

use cgmath::{Matrix4, Rad, Vector3};

use crate::data_structures::{material::Material, store::ModelId};

/// A model placed in the scene.
///
/// Rotation is given as Euler angles in radians and applied about X, then Y,
/// then Z. The model is referenced, not owned: many objects may share one.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub hidden: bool,
    /// Free for application bookkeeping; the draw only looks at `hidden`.
    pub active: bool,
    pub model: ModelId,
    /// Per-mesh-index material replacement. Empty components of an entry
    /// resolve to the renderer defaults, see [`Material::resolve`].
    pub material_overwrite: HashMap<usize, Material>,
}

impl Object {
    /// Create an object at the origin with identity rotation and unit scale.
    pub fn new(model: ModelId) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            hidden: false,
            active: true,
            model,
            material_overwrite: HashMap::new(),
        }
    }

    pub fn at(model: ModelId, position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::new(model)
        }
    }

    pub fn with_overwrite(mut self, mesh: usize, material: Material) -> Self {
        self.material_overwrite.insert(mesh, material);
        self
    }

    /// Translate, rotate about X/Y/Z in that order, then scale.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn identity_transform_by_default() {
        let object = Object::new(ModelId::from_raw(0));
        assert_eq!(object.to_matrix(), Matrix4::identity());
    }

    #[test]
    fn scales_before_rotating_before_translating() {
        let mut object = Object::new(ModelId::from_raw(0));
        object.position = Vector3::new(1.0, 2.0, 3.0);
        object.rotation = Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        object.scale = Vector3::new(2.0, 2.0, 2.0);

        // (1, 0, 0) -> scaled (2, 0, 0) -> rotated about Z (0, 2, 0) -> translated
        let p = object.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 4.0).abs() < 1e-5);
        assert!((p.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn x_rotation_is_applied_last_to_the_vertex() {
        let mut object = Object::new(ModelId::from_raw(0));
        let quarter = std::f32::consts::FRAC_PI_2;
        object.rotation = Vector3::new(quarter, quarter, 0.0);

        // Ry first: (0, 0, 1) -> (1, 0, 0); then Rx leaves X untouched.
        let p = object.to_matrix() * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }
}
