//! Offscreen frame capture for golden image tests.

use std::{iter, time::Duration};

use anyhow::{Context as _, bail};

use crate::{data_structures::texture::Texture, renderer::Renderer};

impl Renderer {
    /// Render the scene exactly like [`draw`](Renderer::draw) would, but into
    /// an offscreen texture of the surface's size and format, and read it back.
    pub fn capture_frame(&mut self) -> anyhow::Result<image::RgbaImage> {
        let (width, height) = self.ctx.size();
        let format = self.ctx.config.format;
        if format.block_copy_size(None) != Some(4) {
            bail!("cannot read back {:?}", format);
        }
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Capture Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let (_depth, depth_view) =
            Texture::create_depth_texture(&self.ctx.device, [width, height], "capture depth");

        let plan = self.plan();
        let keys = self.prepare(&plan);
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        self.record(&plan, &keys, &target_view, &depth_view, &mut encoder);

        let row_bytes = 4 * width;
        let padded_row_bytes = row_bytes.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Buffer"),
            size: (padded_row_bytes * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));

        let padded = self
            .runtime
            .block_on(read_buffer(&self.ctx.device, &output_buffer))?;
        let mut pixels = Vec::with_capacity((row_bytes * height) as usize);
        for row in padded.chunks(padded_row_bytes as usize) {
            pixels.extend_from_slice(&row[..row_bytes as usize]);
        }
        if matches!(
            format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        image::RgbaImage::from_raw(width, height, pixels).context("capture has the wrong size")
    }
}

async fn read_buffer(device: &wgpu::Device, buffer: &wgpu::Buffer) -> anyhow::Result<Vec<u8>> {
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        if tx.send(result).is_err() {
            log::warn!("capture readback was abandoned");
        }
    });
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })
        .context("waiting for the capture")?;
    rx.receive()
        .await
        .context("map callback never ran")?
        .context("mapping the capture buffer")?;
    let data = buffer_slice.get_mapped_range().to_vec();
    buffer.unmap();
    Ok(data)
}
