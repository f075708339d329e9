use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{MeshData, ModelVertex, Vertex},
        texture::Texture,
    },
    render::{FramePlan, LightSlot, MAX_LIGHTS, MarkerDraw},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub strength: f32,
    pub ambient: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    pub _padding: u32,
    pub color: [f32; 3],
    pub _padding2: u32,
    pub specular: [f32; 3],
    pub _padding3: u32,
}

impl From<&LightSlot> for LightUniform {
    fn from(slot: &LightSlot) -> Self {
        Self {
            position: slot.position.into(),
            strength: slot.strength,
            ambient: slot.ambient.into(),
            color: slot.color.into(),
            specular: slot.specular.into(),
            ..Default::default()
        }
    }
}

/// The whole light block: a fixed array and the number of live entries.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub lights: [LightUniform; MAX_LIGHTS],
    pub count: u32,
    pub _padding: [u32; 3],
}

impl LightsUniform {
    /// Entries past `count` stay zeroed.
    pub fn from_plan(plan: &FramePlan) -> Self {
        let mut uniform: Self = bytemuck::Zeroable::zeroed();
        for (slot, light) in uniform.lights.iter_mut().zip(&plan.lights) {
            *slot = light.into();
        }
        uniform.count = plan.light_count();
        uniform
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::bytes_of(&<LightsUniform as bytemuck::Zeroable>::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("lights_bind_group"),
        });
        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &LightsUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size_of::<LightsUniform>() as u64),
            },
            count: None,
        }],
        label: Some("lights_bind_group_layout"),
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerUniform {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub _padding: u32,
}

impl From<&MarkerDraw> for MarkerUniform {
    fn from(marker: &MarkerDraw) -> Self {
        Self {
            mvp: marker.mvp.into(),
            color: marker.color.into(),
            _padding: 0,
        }
    }
}

pub fn mk_marker_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    marker_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Marker Pipeline Layout"),
        bind_group_layouts: &[marker_layout],
        immediate_size: 0,
    });
    crate::pipelines::basic::mk_render_pipeline(
        device,
        "Marker Pipeline",
        &layout,
        color_format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc()],
        shader,
    )
}

/// Half the edge length of the light marker cube.
pub const MARKER_HALF_EXTENT: f32 = 0.1;

/// An axis-aligned cube centred on the origin, one quad per face.
pub fn cube_mesh(half_extent: f32) -> MeshData {
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, u axis, v axis
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [0, 1, 2].map(|i| (normal[i] + su * u[i] + sv * v[i]) * half_extent);
            vertices.push(ModelVertex {
                position,
                tex_coords: [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
                normal,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData {
        name: "light marker".to_string(),
        vertices,
        indices,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_block_matches_the_wgsl_layout() {
        assert_eq!(size_of::<LightUniform>(), 64);
        assert_eq!(size_of::<LightsUniform>(), 64 * MAX_LIGHTS + 16);
        assert_eq!(size_of::<MarkerUniform>(), 80);
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_outwards() {
        let cube = cube_mesh(0.5);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| cgmath::Vector3::from(cube.vertices[tri[i] as usize].position));
            let n = cgmath::Vector3::from(cube.vertices[tri[0] as usize].normal);
            let face = (b - a).cross(c - a);
            assert!(cgmath::InnerSpace::dot(face, n) > 0.0);
            for p in [a, b, c] {
                assert!(p.x.abs() <= 0.5 + 1e-6 && p.y.abs() <= 0.5 + 1e-6 && p.z.abs() <= 0.5 + 1e-6);
            }
        }
    }
}
