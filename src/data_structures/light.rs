//! Point lights.

use cgmath::Vector3;

/// A point light.
///
/// `hidden` only controls whether a marker cube is drawn at the light's
/// position; `active` only controls whether the light takes part in the
/// lighting sum. The two flags are independent.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    /// Diffuse colour; also the colour of the marker.
    pub color: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub strength: f32,
    pub hidden: bool,
    pub active: bool,
}

impl Light {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// The light every scene starts with: contributes only a dim ambient
    /// term, has no diffuse/specular colour and is never drawn.
    pub fn default_ambient() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            ambient: Vector3::new(0.1, 0.1, 0.1),
            color: Vector3::new(0.0, 0.0, 0.0),
            specular: Vector3::new(0.0, 0.0, 0.0),
            strength: 1.0,
            hidden: true,
            active: true,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(1.0, 1.0, 1.0),
            strength: 1.0,
            hidden: false,
            active: true,
        }
    }
}
