//! Meshes and models.
//!
//! A [`Model`] is an ordered list of [`Mesh`]es produced from one asset file
//! (or uploaded from memory). Each mesh owns its vertex/index buffers and
//! carries the material the importer assigned to it.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    material::Material,
    store::{ModelId, Store, TextureId},
};

/// Describes how a vertex type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// CPU side of a mesh: what an importer produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    /// Triangle list.
    pub indices: Vec<u32>,
    pub material: Material,
}

impl MeshData {
    /// Whether there is anything to draw: at least one vertex and one index.
    pub fn is_drawable(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }
}

/// Get CPU meshes ready for upload: empty material components are completed
/// from `defaults`, and empty meshes are kept (so mesh indices stay stable
/// for overrides) but reported.
pub fn prepare_upload(
    meshes: impl IntoIterator<Item = MeshData>,
    defaults: &Material,
) -> Vec<MeshData> {
    meshes
        .into_iter()
        .map(|mut mesh| {
            if !mesh.is_drawable() {
                log::warn!(
                    "mesh {:?} has {} vertices and {} indices and will not be drawn",
                    mesh.name,
                    mesh.vertices.len(),
                    mesh.indices.len()
                );
            }
            mesh.material = mesh.material.or(defaults);
            mesh
        })
        .collect()
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, data: MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            num_elements: data.indices.len() as u32,
            name: data.name,
            vertices: data.vertices,
            indices: data.indices,
            material: data.material,
            vertex_buffer,
            index_buffer,
        }
    }

    /// Empty buffers cannot be bound, so such meshes are never drawn.
    pub fn is_drawable(&self) -> bool {
        self.num_elements > 0 && !self.vertices.is_empty()
    }
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    /// Materials declared by the source file, in file order.
    pub materials: Vec<Material>,
    /// Textures imported with this model; destroyed together with it.
    pub textures: Vec<TextureId>,
}

/// Lookup of per-mesh materials, the only thing frame planning needs to know
/// about models.
pub trait MeshMaterials {
    /// Number of meshes of `model`, `None` if the model does not exist.
    fn mesh_count(&self, model: ModelId) -> Option<usize>;
    /// The importer-assigned material of one mesh.
    fn mesh_material(&self, model: ModelId, mesh: usize) -> Option<Material>;
    /// Whether the mesh has geometry to draw.
    fn mesh_drawable(&self, model: ModelId, mesh: usize) -> bool;
}

impl MeshMaterials for Store<ModelId, Model> {
    fn mesh_count(&self, model: ModelId) -> Option<usize> {
        self.get(model).map(|m| m.meshes.len())
    }

    fn mesh_material(&self, model: ModelId, mesh: usize) -> Option<Material> {
        self.get(model)
            .and_then(|m| m.meshes.get(mesh))
            .map(|mesh| mesh.material)
    }

    fn mesh_drawable(&self, model: ModelId, mesh: usize) -> bool {
        self.get(model)
            .and_then(|m| m.meshes.get(mesh))
            .is_some_and(Mesh::is_drawable)
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            name: "triangle".to_string(),
            vertices: vec![ModelVertex::default(); 3],
            indices: vec![0, 1, 2],
            material: Material::default(),
        }
    }

    fn t(raw: u64) -> Option<TextureId> {
        Some(TextureId::from_raw(raw))
    }

    #[test]
    fn meshes_need_vertices_and_indices() {
        assert!(triangle().is_drawable());
        assert!(!MeshData::default().is_drawable());
        let no_indices = MeshData {
            indices: Vec::new(),
            ..triangle()
        };
        assert!(!no_indices.is_drawable());
        let no_vertices = MeshData {
            vertices: Vec::new(),
            ..triangle()
        };
        assert!(!no_vertices.is_drawable());
    }

    #[test]
    fn upload_keeps_empty_meshes_in_place() {
        let prepared = prepare_upload(
            [triangle(), MeshData::default(), triangle()],
            &Material::new(t(1), t(2)),
        );
        assert_eq!(prepared.len(), 3);
        assert!(!prepared[1].is_drawable());
        assert!(prepared[2].is_drawable());
    }

    #[test]
    fn upload_completes_materials_from_the_defaults() {
        let defaults = Material::new(t(1), t(2));
        let meshes = [
            MeshData {
                material: Material::new(t(7), None),
                ..triangle()
            },
            triangle(),
        ];
        let prepared = prepare_upload(meshes, &defaults);
        assert_eq!(prepared[0].material, Material::new(t(7), t(2)));
        assert_eq!(prepared[1].material, defaults);
    }
}
