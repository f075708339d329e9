//! Render pipelines.
//!
//! - `basic` the lit object pipeline, its per-object uniform and the generic
//!   pipeline builder
//! - `light` the light uniform block and the marker pipeline
//! - `shader` shader sources and checked creation

pub mod basic;
pub mod light;
pub mod shader;

pub const LIT_SHADER: &str = include_str!("lit.wgsl");
pub const MARKER_SHADER: &str = include_str!("marker.wgsl");
