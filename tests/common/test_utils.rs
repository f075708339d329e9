use std::collections::{HashMap, HashSet};

use scppr::{
    Material, ModelId, TextureId,
    data_structures::model::MeshMaterials,
    render::FrameSettings,
};

pub const EPSILON: f32 = 1e-5;

pub fn tex(raw: u64) -> TextureId {
    TextureId::from_raw(raw)
}

/// The renderer defaults as tests see them: white diffuse, black specular.
pub fn defaults() -> Material {
    Material::new(Some(tex(1000)), Some(tex(1001)))
}

/// Black, like the default specular texture.
pub fn unbound() -> TextureId {
    tex(1001)
}

pub fn settings() -> FrameSettings {
    FrameSettings::default()
}

pub const SIZE: (u32, u32) = (800, 600);

/// Mesh materials of models that exist only on paper.
#[derive(Default)]
pub struct StubModels {
    models: HashMap<ModelId, Vec<Material>>,
    empty: HashSet<(ModelId, usize)>,
    next: u64,
}

impl StubModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, meshes: Vec<Material>) -> ModelId {
        let id = ModelId::from_raw(self.next);
        self.next += 1;
        self.models.insert(id, meshes);
        id
    }

    pub fn remove(&mut self, id: ModelId) {
        self.models.remove(&id);
    }

    /// Make one mesh of `model` have no geometry.
    pub fn empty_mesh(&mut self, model: ModelId, mesh: usize) {
        self.empty.insert((model, mesh));
    }
}

impl MeshMaterials for StubModels {
    fn mesh_count(&self, model: ModelId) -> Option<usize> {
        self.models.get(&model).map(Vec::len)
    }

    fn mesh_material(&self, model: ModelId, mesh: usize) -> Option<Material> {
        self.models.get(&model).and_then(|m| m.get(mesh)).copied()
    }

    fn mesh_drawable(&self, model: ModelId, mesh: usize) -> bool {
        !self.empty.contains(&(model, mesh))
    }
}
