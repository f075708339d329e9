//! scppr
//!
//! A minimal real-time 3D scene renderer. A single [`Renderer`] owns a window
//! and its GPU context, a flat scene of placed models and point lights, an
//! Euler-angle camera and one input listener per event kind. Each frame it
//! draws every registered object with Phong lighting from all active lights,
//! followed by a small marker cube at every visible light.
//!
//! High-level modules
//! - `camera`: Euler camera, partial updates, view/projection matrices
//! - `context`: window surface, device and queue; the single-instance guard
//! - `data_structures`: ids and stores, textures, materials, models, objects,
//!   lights and the scene
//! - `events`: winit event handling while polling
//! - `listener`: input callbacks and their dispatch table
//! - `pipelines`: WGSL shaders, uniform layouts and render pipelines
//! - `render`: planning a frame from scene state
//! - `renderer`: the [`Renderer`] itself
//! - `resources`: image and model import
//!

pub mod camera;
#[cfg(feature = "integration-tests")]
pub mod capture;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod events;
pub mod listener;
pub mod pipelines;
pub mod render;
pub mod renderer;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use camera::{Camera, CameraUpdate};
pub use cgmath;
pub use data_structures::{
    light::Light,
    material::Material,
    model::{MeshData, ModelVertex},
    object::Object,
    store::{LightId, ModelId, ObjectId, TextureId},
    texture::ColorSpace,
};
pub use error::RendererError;
pub use image;
pub use listener::{ButtonInput, KeyInput, Listener, ListenerKind};
pub use renderer::{Renderer, RendererConfig};
pub use wgpu::{Color, PresentMode, SurfaceError};
pub use winit::{
    event::{ElementState, MouseButton},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
};
