use std::marker::PhantomData;

use crate::{
    data_structures::{
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    render::{FramePlan, ObjectDraw},
};

/// Per-object block of the lit shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub shininess: f32,
    // Uniform structs are padded to 16 bytes
    pub _padding: [f32; 3],
}

impl ObjectUniform {
    pub fn new(plan: &FramePlan, draw: &ObjectDraw) -> Self {
        Self {
            model: draw.model_matrix.into(),
            view: plan.view.into(),
            projection: plan.projection.into(),
            normal: draw.normal_matrix.into(),
            shininess: plan.shininess,
            _padding: [0.0; 3],
        }
    }
}

/// A growable uniform buffer holding one `T` per draw, addressed with
/// dynamic offsets through a single bind group.
#[derive(Debug)]
pub struct DynamicUniforms<T> {
    label: &'static str,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DynamicUniforms<T> {
    const INITIAL_CAPACITY: usize = 64;

    pub fn layout(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size_of::<T>() as u64),
                },
                count: None,
            }],
            label: Some(label),
        })
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &'static str) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = (size_of::<T>() as u64).div_ceil(alignment) * alignment;
        let (buffer, bind_group) = Self::allocate(device, layout, label, stride, Self::INITIAL_CAPACITY);
        Self {
            label,
            buffer,
            bind_group,
            stride,
            capacity: Self::INITIAL_CAPACITY,
            staging: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size_of::<T>() as u64),
                }),
            }],
            label: Some(label),
        });
        (buffer, bind_group)
    }

    /// Write `items` to consecutive slots, growing the buffer if needed.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        items: &[T],
    ) {
        if items.is_empty() {
            return;
        }
        if items.len() > self.capacity {
            let capacity = items.len().next_power_of_two();
            log::debug!("growing {} to {} slots", self.label, capacity);
            (self.buffer, self.bind_group) =
                Self::allocate(device, layout, self.label, self.stride, capacity);
            self.capacity = capacity;
        }
        self.staging.clear();
        self.staging.resize(self.stride as usize * items.len(), 0);
        for (slot, item) in self.staging.chunks_exact_mut(self.stride as usize).zip(items) {
            slot[..size_of::<T>()].copy_from_slice(bytemuck::bytes_of(item));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of slot `index`.
    pub fn offset(&self, index: usize) -> u32 {
        (self.stride * index as u64) as u32
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

pub fn mk_lit_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    object_layout: &wgpu::BindGroupLayout,
    lights_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Lit Pipeline Layout"),
        bind_group_layouts: &[object_layout, lights_layout, material_layout],
        immediate_size: 0,
    });

    mk_render_pipeline(
        device,
        "Lit Pipeline",
        &layout,
        color_format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc()],
        shader,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // imported winding is not trusted
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
