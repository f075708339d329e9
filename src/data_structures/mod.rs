//! Renderer data structures: resources, scene entities and their storage.
//!
//! - `store` typed ids and the id-keyed storage behind every registry
//! - `texture` GPU texture wrapper and creation utilities
//! - `material` diffuse/specular texture pairs and override resolution
//! - `model` meshes, models and the vertex layout
//! - `object` placed model instances
//! - `light` point lights
//! - `scene` objects, lights, draw registries and the camera

pub mod light;
pub mod material;
pub mod model;
pub mod object;
pub mod scene;
pub mod store;
pub mod texture;
