//! Loading of external assets: images, Wavefront OBJ and glTF models.
//!
//! Importers only decode; they produce an [`ImportedModel`] of CPU-side data
//! that the renderer then uploads. Paths are resolved against the renderer's
//! assets directory unless absolute.

use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use crate::{
    data_structures::{model::ModelVertex, texture::ColorSpace},
    error::RendererError,
    resources::texture::{load_image, load_string},
};

pub mod gltf;
pub mod mesh;
pub mod texture;

/// A decoded image waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct ImportedTexture {
    pub label: String,
    pub image: image::DynamicImage,
    pub color_space: ColorSpace,
}

/// Material as indices into [`ImportedModel::textures`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportedMaterial {
    pub diffuse: Option<usize>,
    pub specular: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Index into [`ImportedModel::materials`].
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedModel {
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
    pub textures: Vec<ImportedTexture>,
}

/// `path` relative to `assets`, or `path` itself if absolute.
pub fn resolve(assets: &Path, path: impl AsRef<Path>) -> PathBuf {
    assets.join(path)
}

/// Import a model file, picking the importer by extension.
pub async fn load_model(path: &Path) -> Result<ImportedModel, RendererError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let imported = match extension.as_deref() {
        Some("obj") => load_model_obj(path).await,
        Some("gltf" | "glb") => self::gltf::load_model_gltf(path).await,
        _ => return Err(RendererError::UnknownModelFormat(path.to_path_buf())),
    }
    .map_err(|e| RendererError::asset(path, e))?;
    log::debug!(
        "imported {}: {} meshes, {} materials, {} textures",
        path.display(),
        imported.meshes.len(),
        imported.materials.len(),
        imported.textures.len()
    );
    Ok(imported)
}

pub async fn load_model_obj(path: &Path) -> anyhow::Result<ImportedModel> {
    let obj_text = load_string(path).await?;
    let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let mtl_dir = dir.clone();
    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_path = mtl_dir.join(p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("{:#}", e);
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("{}: materials unavailable ({}), using defaults", path.display(), e);
        Vec::new()
    });

    let mut textures = Vec::new();
    let mut by_file: HashMap<(String, ColorSpace), usize> = HashMap::new();
    let mut materials = Vec::new();
    for m in &obj_materials {
        let diffuse = import_texture(
            &dir,
            m.diffuse_texture.as_deref(),
            ColorSpace::Srgb,
            &mut textures,
            &mut by_file,
        )
        .await?;
        let specular = import_texture(
            &dir,
            m.specular_texture.as_deref(),
            ColorSpace::Linear,
            &mut textures,
            &mut by_file,
        )
        .await?;
        if diffuse.is_none() && specular.is_none() {
            log::debug!("{}: material {:?} references no texture", path.display(), m.name);
        }
        materials.push(ImportedMaterial { diffuse, specular });
    }

    let meshes = mesh::load_meshes(&models, &path.display().to_string());
    Ok(ImportedModel {
        meshes,
        materials,
        textures,
    })
}

/// Decode `file` once per colour space, returning its index in `textures`.
async fn import_texture(
    dir: &Path,
    file: Option<&str>,
    color_space: ColorSpace,
    textures: &mut Vec<ImportedTexture>,
    by_file: &mut HashMap<(String, ColorSpace), usize>,
) -> anyhow::Result<Option<usize>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let key = (file.to_string(), color_space);
    if let Some(index) = by_file.get(&key) {
        return Ok(Some(*index));
    }
    let texture_path = dir.join(file);
    textures.push(ImportedTexture {
        label: texture_path.display().to_string(),
        image: load_image(&texture_path).await?,
        color_space,
    });
    by_file.insert(key, textures.len() - 1);
    Ok(Some(textures.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("scppr-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TRIANGLE_OBJ: &str = "\
mtllib triangle.mtl
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
usemtl plain
f 1/1 2/2 3/3
";

    #[tokio::test]
    async fn obj_without_mtl_falls_back_to_no_materials() {
        let dir = temp_dir("no-mtl");
        let path = write_temp(&dir, "triangle.obj", TRIANGLE_OBJ);
        let imported = load_model(&path).await.unwrap();
        assert_eq!(imported.meshes.len(), 1);
        assert!(imported.materials.is_empty());
        assert_eq!(imported.meshes[0].indices, vec![0, 1, 2]);
        // generated, facing +Z
        assert!((imported.meshes[0].vertices[0].normal[2] - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn obj_material_without_textures_has_empty_components() {
        let dir = temp_dir("plain-mtl");
        write_temp(&dir, "triangle.mtl", "newmtl plain\nKd 1 1 1\n");
        let path = write_temp(&dir, "triangle.obj", TRIANGLE_OBJ);
        let imported = load_model(&path).await.unwrap();
        assert_eq!(imported.materials, vec![ImportedMaterial::default()]);
        assert_eq!(imported.meshes[0].material, Some(0));
        assert!(imported.textures.is_empty());
    }

    #[tokio::test]
    async fn unknown_extensions_are_rejected() {
        let err = load_model(Path::new("model.fbx")).await.unwrap_err();
        assert!(matches!(err, RendererError::UnknownModelFormat(_)));
    }

    #[tokio::test]
    async fn missing_files_report_the_path() {
        let err = load_model(Path::new("/definitely/not/here.obj")).await.unwrap_err();
        assert!(err.to_string().contains("here.obj"), "{err}");
    }

    #[test]
    fn absolute_paths_ignore_the_assets_dir() {
        let abs = std::env::temp_dir().join("x.png");
        assert_eq!(resolve(Path::new("assets"), &abs), abs);
        assert_eq!(resolve(Path::new("assets"), "x.png"), Path::new("assets/x.png"));
    }
}
