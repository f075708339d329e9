//! Materials, the override resolution rule and the per-material bind group
//! cache.

use std::collections::HashMap;

use crate::data_structures::store::TextureId;

/// A pair of optional texture handles.
///
/// Materials never own their textures; they are plain values that may be
/// copied freely between meshes and objects.
///
/// Every mesh uploaded through the renderer, imported or built in memory,
/// has the empty components of its own material filled from the renderer
/// defaults at upload time. An empty component that still reaches the draw
/// binds the unbound (black) texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Material {
    pub diffuse: Option<TextureId>,
    pub specular: Option<TextureId>,
}

impl Material {
    pub fn new(diffuse: Option<TextureId>, specular: Option<TextureId>) -> Self {
        Self { diffuse, specular }
    }

    /// Fill empty components from `fallback`, keeping the ones that are set.
    pub fn or(self, fallback: &Material) -> Material {
        Material {
            diffuse: self.diffuse.or(fallback.diffuse),
            specular: self.specular.or(fallback.specular),
        }
    }

    /// The material a mesh is drawn with.
    ///
    /// Without an override the mesh's own material is used unchanged. With an
    /// override, every empty component of the override falls back to the
    /// renderer-wide `defaults`, never to the mesh's own texture.
    pub fn resolve(own: &Material, overwrite: Option<&Material>, defaults: &Material) -> Material {
        match overwrite {
            Some(overwrite) => overwrite.or(defaults),
            None => *own,
        }
    }
}

/// Diffuse and specular texture actually bound for one mesh draw.
pub type MaterialKey = (TextureId, TextureId);

/// Per-material GPU state keyed by the textures it binds.
#[derive(Debug)]
pub struct MaterialCache<V> {
    entries: HashMap<MaterialKey, V>,
}

impl<V> MaterialCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &MaterialKey) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &MaterialKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: MaterialKey, value: V) {
        self.entries.insert(key, value);
    }

    /// Drop every entry that binds one of `textures`. Returns how many went.
    pub fn evict(&mut self, textures: &[TextureId]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|(diffuse, specular), _| !textures.contains(diffuse) && !textures.contains(specular));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MaterialCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
