//! glTF 2.0 import (`.gltf` with external or embedded buffers, `.glb`).
//!
//! Every triangle primitive of every mesh becomes one renderer mesh; the node
//! hierarchy and its transforms are not used. Only the base colour texture of
//! a material is imported, as the diffuse map.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, bail};

use crate::{
    data_structures::{model::ModelVertex, texture::ColorSpace},
    resources::{
        ImportedMaterial, ImportedMesh, ImportedModel, ImportedTexture, mesh::generate_normals,
        texture::{load_binary, load_image},
    },
};

pub async fn load_model_gltf(path: &Path) -> anyhow::Result<ImportedModel> {
    let data = load_binary(path).await?;
    let gltf = gltf::Gltf::from_slice(&data).context("parsing glTF")?;
    let dir = path.parent().unwrap_or(Path::new("."));

    let mut buffers: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffers.push(blob.to_vec()),
                None => bail!("buffer {} refers to a missing GLB blob", buffer.index()),
            },
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                bail!("buffer {}: data URIs are not supported", buffer.index())
            }
            gltf::buffer::Source::Uri(uri) => buffers.push(load_binary(&dir.join(uri)).await?),
        }
    }

    // glTF images may be shared between materials; decode each once
    let mut textures = Vec::new();
    let mut by_image: HashMap<usize, usize> = HashMap::new();
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let base_colour = material.pbr_metallic_roughness().base_color_texture();
        let diffuse = match base_colour {
            Some(info) => {
                let img = info.texture().source();
                let index = match by_image.get(&img.index()) {
                    Some(index) => *index,
                    None => {
                        let decoded = decode_image(&img, &buffers, dir).await?;
                        textures.push(ImportedTexture {
                            label: format!(
                                "{}#{}",
                                path.display(),
                                img.name().map_or_else(|| img.index().to_string(), str::to_string)
                            ),
                            image: decoded,
                            color_space: ColorSpace::Srgb,
                        });
                        by_image.insert(img.index(), textures.len() - 1);
                        textures.len() - 1
                    }
                };
                Some(index)
            }
            None => None,
        };
        materials.push(ImportedMaterial {
            diffuse,
            specular: None,
        });
    }

    let mut meshes = Vec::new();
    for mesh in gltf.meshes() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "{}: primitive {} of mesh {} is {:?}, skipped",
                    path.display(),
                    primitive.index(),
                    mesh.index(),
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::warn!("{}: primitive without positions, skipped", path.display());
                continue;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|position| ModelVertex {
                    position,
                    ..Default::default()
                })
                .collect();
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                // glTF puts the UV origin at the top left already
                for (v, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
                    v.tex_coords = uv;
                }
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            match reader.read_normals() {
                Some(normals) => {
                    for (v, normal) in vertices.iter_mut().zip(normals) {
                        v.normal = normal;
                    }
                }
                None => generate_normals(&mut vertices, &indices),
            }
            meshes.push(ImportedMesh {
                name: mesh
                    .name()
                    .map_or_else(|| format!("mesh{}", mesh.index()), str::to_string),
                vertices,
                indices,
                material: primitive.material().index(),
            });
        }
    }

    Ok(ImportedModel {
        meshes,
        materials,
        textures,
    })
}

async fn decode_image(
    img: &gltf::Image<'_>,
    buffers: &[Vec<u8>],
    dir: &Path,
) -> anyhow::Result<image::DynamicImage> {
    match img.source() {
        gltf::image::Source::View { view, mime_type } => {
            let buffer = buffers
                .get(view.buffer().index())
                .with_context(|| format!("image {} points past the buffers", img.index()))?;
            let bytes = buffer
                .get(view.offset()..view.offset() + view.length())
                .with_context(|| format!("image {} view is out of bounds", img.index()))?;
            let format = mime_type
                .rsplit('/')
                .next()
                .and_then(image::ImageFormat::from_extension);
            let decoded = match format {
                Some(format) => image::load_from_memory_with_format(bytes, format)?,
                None => image::load_from_memory(bytes)?,
            };
            Ok(decoded)
        }
        gltf::image::Source::Uri { uri, .. } if uri.starts_with("data:") => {
            bail!("image {}: data URIs are not supported", img.index())
        }
        gltf::image::Source::Uri { uri, .. } => load_image(&dir.join(uri)).await,
    }
}
