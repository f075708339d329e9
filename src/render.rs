//! Frame planning.
//!
//! Everything the draw needs to know is decided here, from scene state
//! alone: matrices, the contiguous block of contributing lights, the
//! resolved material of every mesh and the light markers. The renderer then
//! encodes the [`FramePlan`] into a single render pass.
//!
//! # Key types
//!
//! - [`FramePlan`] is the whole frame
//! - [`ObjectDraw`] one visible object with its per-mesh materials
//! - [`LightSlot`] one entry of the light uniform array
//! - [`MarkerDraw`] the unlit cube drawn at a visible light

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use crate::data_structures::{
    material::{Material, MaterialKey},
    model::MeshMaterials,
    scene::Scene,
    store::{LightId, ModelId, ObjectId, TextureId},
};

/// Length of the light array in the lighting shader.
pub const MAX_LIGHTS: usize = 32;

/// Per-frame constants that do not live in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSettings {
    pub z_near: f32,
    pub z_far: f32,
    pub shininess: f32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            z_near: 0.1,
            z_far: 100.0,
            shininess: 32.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    /// Contributing lights, numbered without gaps.
    pub lights: Vec<LightSlot>,
    pub objects: Vec<ObjectDraw>,
    pub markers: Vec<MarkerDraw>,
    pub shininess: f32,
}

impl FramePlan {
    /// The count uploaded next to the light array.
    pub fn light_count(&self) -> u32 {
        self.lights.len() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSlot {
    pub light: LightId,
    /// Position in view space.
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub color: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub strength: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDraw {
    pub object: ObjectId,
    pub model: ModelId,
    pub model_matrix: Matrix4<f32>,
    /// Inverse transpose of `view * model`.
    pub normal_matrix: Matrix4<f32>,
    pub meshes: Vec<MeshDraw>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshDraw {
    /// Index into the model's mesh list.
    pub mesh: usize,
    pub material: Material,
}

impl MeshDraw {
    /// Textures bound to the diffuse (0) and specular (1) units. An empty
    /// component binds `unbound`.
    pub fn units(&self, unbound: TextureId) -> [TextureId; 2] {
        [
            self.material.diffuse.unwrap_or(unbound),
            self.material.specular.unwrap_or(unbound),
        ]
    }

    /// Like [`units`](Self::units), but a texture for which `exists` is false
    /// is replaced by `unbound` too.
    pub fn bound_units(&self, unbound: TextureId, exists: impl Fn(TextureId) -> bool) -> MaterialKey {
        let [diffuse, specular] = self.units(unbound).map(|id| {
            if exists(id) {
                id
            } else {
                log::warn!("{:?} no longer exists, binding the unbound texture", id);
                unbound
            }
        });
        (diffuse, specular)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerDraw {
    pub light: LightId,
    pub mvp: Matrix4<f32>,
    pub color: Vector3<f32>,
}

/// Plan one frame of `scene` for a surface of `size` pixels.
///
/// Hidden objects are skipped, as are objects whose model no longer exists
/// and meshes without geometry.
/// Inactive lights are left out of the light block but still get a marker
/// unless hidden.
pub fn plan_frame(
    scene: &Scene,
    models: &impl MeshMaterials,
    defaults: &Material,
    settings: &FrameSettings,
    size: (u32, u32),
) -> FramePlan {
    let camera = &scene.camera;
    let projection = camera.projection_matrix(size.0, size.1, settings.z_near, settings.z_far);
    let view = camera.view_matrix();

    let mut lights = Vec::new();
    for (id, light) in scene.lights().filter(|(_, l)| l.active) {
        if lights.len() == MAX_LIGHTS {
            log::warn!(
                "more than {} active lights, {:?} and later ones are ignored",
                MAX_LIGHTS,
                id
            );
            break;
        }
        let p = view * light.position.extend(1.0);
        lights.push(LightSlot {
            light: id,
            position: p.truncate(),
            ambient: light.ambient,
            color: light.color,
            specular: light.specular,
            strength: light.strength,
        });
    }

    let mut objects = Vec::new();
    for (id, object) in scene.objects().filter(|(_, o)| !o.hidden) {
        let Some(mesh_count) = models.mesh_count(object.model) else {
            log::debug!("{:?} references missing {:?}, skipped", id, object.model);
            continue;
        };
        let model_matrix = object.to_matrix();
        let normal_matrix = (view * model_matrix)
            .invert()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix4::identity);
        let meshes = (0..mesh_count)
            .filter(|&mesh| models.mesh_drawable(object.model, mesh))
            .map(|mesh| {
                let own = models.mesh_material(object.model, mesh).unwrap_or_default();
                MeshDraw {
                    mesh,
                    material: Material::resolve(
                        &own,
                        object.material_overwrite.get(&mesh),
                        defaults,
                    ),
                }
            })
            .collect();
        objects.push(ObjectDraw {
            object: id,
            model: object.model,
            model_matrix,
            normal_matrix,
            meshes,
        });
    }

    let view_projection = projection * view;
    let markers: Vec<MarkerDraw> = scene
        .lights()
        .filter(|(_, l)| !l.hidden)
        .map(|(id, light)| MarkerDraw {
            light: id,
            mvp: view_projection * Matrix4::from_translation(light.position),
            color: light.color,
        })
        .collect();

    log::trace!(
        "frame plan: {} objects, {} lights, {} markers",
        objects.len(),
        lights.len(),
        markers.len()
    );

    FramePlan {
        projection,
        view,
        lights,
        objects,
        markers,
        shininess: settings.shininess,
    }
}
