//! The renderer: window, GPU context, resources, scene and the draw.
//!
//! There is at most one [`Renderer`] per process. It is driven from the
//! application's own loop:
//!
//! ```no_run
//! # fn main() -> Result<(), scppr::RendererError> {
//! let mut renderer = scppr::Renderer::new("demo", "assets")?;
//! while renderer.is_open() {
//!     renderer.poll();
//!     if let Err(e) = renderer.draw() {
//!         log::error!("{}", e);
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::{iter, path::PathBuf, sync::Arc, time::Duration};

use instant::Instant;
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoop,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{CursorGrabMode, Window},
};

use crate::{
    camera::{Camera, CameraUpdate},
    context::{Context, InstanceGuard},
    data_structures::{
        light::Light,
        material::{Material, MaterialCache, MaterialKey},
        model::{DrawMesh, Mesh, MeshData, Model, prepare_upload},
        object::Object,
        scene::Scene,
        store::{LightId, ModelId, ObjectId, Store, TextureId},
        texture::{ColorSpace, Owner, Texture, remove_model_owned, remove_user_owned},
    },
    error::RendererError,
    events::{EventHandler, WindowState},
    listener::{Listener, ListenerKind, Listeners},
    pipelines::{
        LIT_SHADER, MARKER_SHADER,
        basic::{DynamicUniforms, ObjectUniform, mk_lit_pipeline},
        light::{
            LightResources, LightsUniform, MARKER_HALF_EXTENT, MarkerUniform, cube_mesh,
            mk_marker_pipeline,
        },
        shader::{ShaderSource, checked},
    },
    render::{FramePlan, FrameSettings, MeshDraw, plan_frame},
    resources::{self, ImportedModel, texture::diffuse_specular_layout},
};

/// How many times construction pumps the event loop waiting for the window.
const WINDOW_PUMPS: usize = 200;

#[derive(Clone, Debug)]
pub struct RendererConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Base directory for relative asset paths and shader overrides.
    pub assets_path: PathBuf,
    pub clear_colour: wgpu::Color,
    pub present_mode: wgpu::PresentMode,
    pub z_near: f32,
    pub z_far: f32,
    /// Specular exponent of the lighting model.
    pub shininess: f32,
}

impl RendererConfig {
    pub fn new(title: impl Into<String>, assets_path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            assets_path: assets_path.into(),
            ..Default::default()
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "scppr".to_string(),
            width: 800,
            height: 600,
            assets_path: PathBuf::from("./assets"),
            clear_colour: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.4,
                a: 1.0,
            },
            present_mode: wgpu::PresentMode::Fifo,
            z_near: 0.1,
            z_far: 100.0,
            shininess: 32.0,
        }
    }
}

pub struct Renderer {
    pub(crate) ctx: Context,
    pub(crate) config: RendererConfig,
    scene: Scene,
    textures: Store<TextureId, Texture>,
    models: Store<ModelId, Model>,
    default_material: Material,
    /// Bound for an empty component of a mesh's own material.
    unbound_texture: TextureId,
    material_layout: wgpu::BindGroupLayout,
    material_bind_groups: MaterialCache<wgpu::BindGroup>,
    object_layout: wgpu::BindGroupLayout,
    object_uniforms: DynamicUniforms<ObjectUniform>,
    marker_layout: wgpu::BindGroupLayout,
    marker_uniforms: DynamicUniforms<MarkerUniform>,
    lights: LightResources,
    /// `None` if the shader or pipeline failed validation.
    lit_pipeline: Option<wgpu::RenderPipeline>,
    marker_pipeline: Option<wgpu::RenderPipeline>,
    marker_mesh: Mesh,
    listeners: Listeners,
    window_state: WindowState,
    last_poll: Instant,
    frame_time: Duration,
    event_loop: EventLoop<()>,
    pub(crate) runtime: tokio::runtime::Runtime,
    // released last, once everything else is gone
    _guard: InstanceGuard,
}

impl Renderer {
    /// Open a window titled `name` with default settings, resolving assets
    /// against `assets_path`.
    pub fn new(
        name: impl Into<String>,
        assets_path: impl Into<PathBuf>,
    ) -> Result<Self, RendererError> {
        Self::with_config(RendererConfig::new(name, assets_path))
    }

    pub fn with_config(config: RendererConfig) -> Result<Self, RendererError> {
        if let Err(e) = env_logger::try_init() {
            log::debug!("logger already set up: {}", e);
        }

        let guard = InstanceGuard::acquire()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RendererError::Runtime)?;

        let mut event_loop = build_event_loop()?;
        let mut window_state = WindowState::new(
            Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(PhysicalSize::new(config.width, config.height)),
        );
        let mut listeners = Listeners::new();
        let window = wait_for_window(&mut event_loop, &mut window_state, &mut listeners)?;

        let ctx = runtime.block_on(Context::new(window, config.present_mode))?;
        let device = &ctx.device;
        let queue = &ctx.queue;

        let mut textures = Store::new();
        let white = textures.insert(Texture::create_solid(
            device,
            queue,
            [255, 255, 255, 255],
            "default diffuse",
            ColorSpace::Srgb,
            Owner::Renderer,
        ));
        let black = textures.insert(Texture::create_solid(
            device,
            queue,
            [0, 0, 0, 255],
            "default specular",
            ColorSpace::Linear,
            Owner::Renderer,
        ));
        let default_material = Material::new(Some(white), Some(black));

        let (lit_source, marker_source) = runtime.block_on(async {
            futures::try_join!(
                ShaderSource::load(&config.assets_path, "lit", LIT_SHADER),
                ShaderSource::load(&config.assets_path, "marker", MARKER_SHADER),
            )
        })?;

        let stages = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let object_layout =
            DynamicUniforms::<ObjectUniform>::layout(device, "object_bind_group_layout", stages);
        let marker_layout =
            DynamicUniforms::<MarkerUniform>::layout(device, "marker_bind_group_layout", stages);
        let material_layout = diffuse_specular_layout(device);
        let lights = LightResources::new(device);
        let object_uniforms = DynamicUniforms::new(device, &object_layout, "object uniforms");
        let marker_uniforms = DynamicUniforms::new(device, &marker_layout, "marker uniforms");

        let format = ctx.config.format;
        let lit_pipeline = runtime.block_on(build_pipeline(device, &lit_source, |module| {
            mk_lit_pipeline(
                device,
                format,
                &object_layout,
                &lights.bind_group_layout,
                &material_layout,
                module,
            )
        }));
        let marker_pipeline = runtime.block_on(build_pipeline(device, &marker_source, |module| {
            mk_marker_pipeline(device, format, &marker_layout, module)
        }));
        let marker_mesh = Mesh::upload(device, cube_mesh(MARKER_HALF_EXTENT));

        log::info!("renderer ready: {:?}", config.title);

        Ok(Self {
            ctx,
            config,
            scene: Scene::new(),
            textures,
            models: Store::new(),
            default_material,
            unbound_texture: black,
            material_layout,
            material_bind_groups: MaterialCache::new(),
            object_layout,
            object_uniforms,
            marker_layout,
            marker_uniforms,
            lights,
            lit_pipeline,
            marker_pipeline,
            marker_mesh,
            listeners,
            window_state,
            last_poll: Instant::now(),
            frame_time: Duration::ZERO,
            event_loop,
            runtime,
            _guard: guard,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window_state.open
    }

    /// Make [`is_open`](Self::is_open) return false.
    pub fn close(&mut self) {
        self.window_state.open = false;
    }

    /// Process pending window events, invoking the registered listeners.
    pub fn poll(&mut self) {
        let now = Instant::now();
        self.frame_time = now - self.last_poll;
        self.last_poll = now;

        let mut handler = EventHandler {
            state: &mut self.window_state,
            listeners: &mut self.listeners,
        };
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut handler)
        {
            log::info!("event loop exited with {}", code);
            self.window_state.open = false;
        }
    }

    /// Time between the two most recent calls to [`poll`](Self::poll).
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.ctx.window
    }

    /// Hide the cursor and lock it to the window. While captured, pointer
    /// listeners see a virtual position driven by raw mouse motion.
    pub fn set_cursor_captured(&mut self, captured: bool) {
        let window = &self.ctx.window;
        if captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("cannot capture the cursor: {}", e);
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("cannot release the cursor: {}", e);
        }
        window.set_cursor_visible(!captured);
        self.window_state.cursor_captured = captured;
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.window_state.cursor_captured
    }

    /// Register a listener, replacing (and returning) the previous one of
    /// the same kind.
    pub fn add_listener(&mut self, listener: Listener) -> Option<Listener> {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, kind: ListenerKind) -> Option<Listener> {
        self.listeners.remove(kind)
    }

    pub fn camera(&self) -> &Camera {
        &self.scene.camera
    }

    /// Apply the fields of `update` that are set and rebuild the basis.
    pub fn set_camera(&mut self, update: CameraUpdate) {
        self.scene.set_camera(update);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn default_material(&self) -> Material {
        self.default_material
    }

    pub fn unbound_texture(&self) -> TextureId {
        self.unbound_texture
    }

    pub fn default_ambient_light(&self) -> LightId {
        self.scene.default_ambient_light()
    }

    pub fn create_object(&mut self, object: Object) -> ObjectId {
        self.scene.create_object(object)
    }

    pub fn destroy_object(&mut self, id: ObjectId) -> Option<Object> {
        self.scene.destroy_object(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.scene.object(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.scene.object_mut(id)
    }

    pub fn add_object(&mut self, id: ObjectId) {
        self.scene.add_object(id);
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        self.scene.remove_object(id);
    }

    pub fn create_light(&mut self, light: Light) -> LightId {
        self.scene.create_light(light)
    }

    pub fn destroy_light(&mut self, id: LightId) -> Option<Light> {
        self.scene.destroy_light(id)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.scene.light(id)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.scene.light_mut(id)
    }

    pub fn add_light(&mut self, id: LightId) {
        self.scene.add_light(id);
    }

    pub fn remove_light(&mut self, id: LightId) {
        self.scene.remove_light(id);
    }

    /// Load an image file as an application-owned texture.
    pub fn load_texture(
        &mut self,
        path: impl AsRef<std::path::Path>,
        color_space: ColorSpace,
    ) -> Result<TextureId, RendererError> {
        let path = resources::resolve(&self.config.assets_path, path);
        let texture = self
            .runtime
            .block_on(resources::texture::load_texture(
                &path,
                color_space,
                Owner::User,
                &self.ctx.device,
                &self.ctx.queue,
            ))
            .map_err(|e| RendererError::asset(&path, e))?;
        let id = self.textures.insert(texture);
        log::debug!("{:?} loaded from {}", id, path.display());
        Ok(id)
    }

    /// Upload an in-memory image as an application-owned texture.
    pub fn texture_from_image(
        &mut self,
        img: &image::DynamicImage,
        label: &str,
        color_space: ColorSpace,
    ) -> TextureId {
        self.textures.insert(Texture::from_image(
            &self.ctx.device,
            &self.ctx.queue,
            img,
            label,
            color_space,
            Owner::User,
        ))
    }

    /// Destroy an application-owned texture. Materials still naming it fall
    /// back to the unbound texture.
    pub fn destroy_texture(&mut self, id: TextureId) -> Result<(), RendererError> {
        match remove_user_owned(&mut self.textures, id)? {
            None => log::warn!("destroy_texture: {:?} does not exist", id),
            Some(_) => {
                self.evict_bind_groups(&[id]);
                log::debug!("{:?} destroyed", id);
            }
        }
        Ok(())
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id)
    }

    /// Import a model file (`.obj`, `.gltf`, `.glb`).
    pub fn load_model(&mut self, path: impl AsRef<std::path::Path>) -> Result<ModelId, RendererError> {
        let path = resources::resolve(&self.config.assets_path, path);
        let imported = self.runtime.block_on(resources::load_model(&path))?;
        let id = self.upload_model(imported);
        log::debug!("{:?} loaded from {}", id, path.display());
        Ok(id)
    }

    /// Upload meshes built in memory as one model. Empty material components
    /// are filled from the defaults; meshes without geometry are kept but
    /// never drawn.
    pub fn create_model(&mut self, meshes: Vec<MeshData>) -> ModelId {
        let device = &self.ctx.device;
        let meshes = prepare_upload(meshes, &self.default_material);
        let materials = meshes.iter().map(|m| m.material).collect();
        self.models.insert(Model {
            meshes: meshes.into_iter().map(|m| Mesh::upload(device, m)).collect(),
            materials,
            textures: Vec::new(),
        })
    }

    /// Destroy a model together with the textures it imported. Objects still
    /// referencing it are no longer drawn.
    pub fn destroy_model(&mut self, id: ModelId) -> bool {
        if self.models.remove(id).is_none() {
            log::warn!("destroy_model: {:?} does not exist", id);
            return false;
        }
        let freed = remove_model_owned(&mut self.textures, id);
        self.evict_bind_groups(&freed);
        log::debug!("{:?} destroyed with {} textures", id, freed.len());
        true
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    fn upload_model(&mut self, imported: ImportedModel) -> ModelId {
        let ctx = &self.ctx;
        let textures = &mut self.textures;
        let defaults = self.default_material;
        self.models.insert_with(|id| {
            let texture_ids: Vec<TextureId> = imported
                .textures
                .iter()
                .map(|t| {
                    textures.insert(Texture::from_image(
                        &ctx.device,
                        &ctx.queue,
                        &t.image,
                        &t.label,
                        t.color_space,
                        Owner::Model(id),
                    ))
                })
                .collect();
            let lookup = |index: Option<usize>| index.and_then(|i| texture_ids.get(i).copied());
            let materials: Vec<Material> = imported
                .materials
                .iter()
                .map(|m| Material::new(lookup(m.diffuse), lookup(m.specular)).or(&defaults))
                .collect();
            let meshes = imported.meshes.into_iter().map(|m| MeshData {
                material: m
                    .material
                    .and_then(|i| materials.get(i).copied())
                    .unwrap_or_default(),
                name: m.name,
                vertices: m.vertices,
                indices: m.indices,
            });
            let meshes = prepare_upload(meshes, &defaults)
                .into_iter()
                .map(|m| Mesh::upload(&ctx.device, m))
                .collect();
            Model {
                meshes,
                materials,
                textures: texture_ids,
            }
        })
    }

    fn evict_bind_groups(&mut self, textures: &[TextureId]) {
        let evicted = self.material_bind_groups.evict(textures);
        log::trace!("{} material bind groups evicted", evicted);
    }

    fn settings(&self) -> FrameSettings {
        FrameSettings {
            z_near: self.config.z_near,
            z_far: self.config.z_far,
            shininess: self.config.shininess,
        }
    }

    /// What the next [`draw`](Self::draw) will render.
    pub fn plan(&self) -> FramePlan {
        plan_frame(
            &self.scene,
            &self.models,
            &self.default_material,
            &self.settings(),
            self.ctx.size(),
        )
    }

    /// Render the registered objects and light markers and present.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        if let Some(size) = self.window_state.resized.take() {
            self.ctx.resize(size.width, size.height);
        }

        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.ctx.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, frame skipped");
                return Ok(());
            }
            Err(e) => {
                log::error!("unable to render: {}", e);
                return Err(e);
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let plan = self.plan();
        let keys = self.prepare(&plan);
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.record(&plan, &keys, &view, &self.ctx.depth_view, &mut encoder);
        self.ctx.queue.submit(iter::once(encoder.finish()));

        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn material_key(&self, draw: &MeshDraw) -> MaterialKey {
        draw.bound_units(self.unbound_texture, |id| self.textures.contains(id))
    }

    /// Upload the frame's uniforms and make sure every material has a bind
    /// group. Returns the material of each mesh draw in draw order.
    pub(crate) fn prepare(&mut self, plan: &FramePlan) -> Vec<MaterialKey> {
        let device = &self.ctx.device;
        let queue = &self.ctx.queue;

        self.lights.write(queue, &LightsUniform::from_plan(plan));
        let objects: Vec<ObjectUniform> = plan
            .objects
            .iter()
            .map(|draw| ObjectUniform::new(plan, draw))
            .collect();
        self.object_uniforms
            .upload(device, queue, &self.object_layout, &objects);
        let markers: Vec<MarkerUniform> = plan.markers.iter().map(MarkerUniform::from).collect();
        self.marker_uniforms
            .upload(device, queue, &self.marker_layout, &markers);

        let keys: Vec<MaterialKey> = plan
            .objects
            .iter()
            .flat_map(|o| &o.meshes)
            .map(|draw| self.material_key(draw))
            .collect();
        for key in &keys {
            if self.material_bind_groups.contains(key) {
                continue;
            }
            if let (Some(diffuse), Some(specular)) = (self.textures.get(key.0), self.textures.get(key.1)) {
                let bind_group = resources::texture::material_bind_group(
                    &self.ctx.device,
                    &self.material_layout,
                    diffuse,
                    specular,
                );
                self.material_bind_groups.insert(*key, bind_group);
            }
        }
        keys
    }

    /// Encode the frame's single render pass into `encoder`.
    pub(crate) fn record(
        &self,
        plan: &FramePlan,
        keys: &[MaterialKey],
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        });

        if let Some(pipeline) = &self.lit_pipeline {
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &self.lights.bind_group, &[]);
            let mut keys = keys.iter();
            for (slot, draw) in plan.objects.iter().enumerate() {
                render_pass.set_bind_group(
                    0,
                    self.object_uniforms.bind_group(),
                    &[self.object_uniforms.offset(slot)],
                );
                let model = self.models.get(draw.model);
                for mesh_draw in &draw.meshes {
                    let key = keys.next();
                    let mesh = model.and_then(|m| m.meshes.get(mesh_draw.mesh));
                    let bind_group = key.and_then(|k| self.material_bind_groups.get(k));
                    if let (Some(mesh), Some(bind_group)) = (mesh, bind_group) {
                        render_pass.set_bind_group(2, bind_group, &[]);
                        render_pass.draw_mesh(mesh);
                    }
                }
            }
        }

        if let Some(pipeline) = &self.marker_pipeline {
            render_pass.set_pipeline(pipeline);
            for slot in 0..plan.markers.len() {
                render_pass.set_bind_group(
                    0,
                    self.marker_uniforms.bind_group(),
                    &[self.marker_uniforms.offset(slot)],
                );
                render_pass.draw_mesh(&self.marker_mesh);
            }
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        log::info!(
            "renderer shutting down ({} textures, {} models)",
            self.textures.len(),
            self.models.len()
        );
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("scene", &self.scene)
            .field("textures", &self.textures.len())
            .field("models", &self.models.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

fn build_event_loop() -> Result<EventLoop<()>, RendererError> {
    // Test harnesses run off the main thread.
    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::builder().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::builder().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop = EventLoop::new()?;

    Ok(event_loop)
}

/// Pump until the first `resumed` has created the window.
fn wait_for_window(
    event_loop: &mut EventLoop<()>,
    state: &mut WindowState,
    listeners: &mut Listeners,
) -> Result<Arc<Window>, RendererError> {
    for _ in 0..WINDOW_PUMPS {
        let mut handler = EventHandler {
            state: &mut *state,
            listeners: &mut *listeners,
        };
        if let PumpStatus::Exit(code) =
            event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut handler)
        {
            log::error!("event loop exited with {} before a window appeared", code);
            break;
        }
        if state.window.is_some() || state.creation_error.is_some() {
            break;
        }
    }
    if let Some(e) = state.creation_error.take() {
        return Err(e.into());
    }
    state.window.clone().ok_or(RendererError::WindowNeverCreated)
}

/// Compile `source` and build a pipeline from it, both under a validation
/// scope. Returns `None` if either step failed.
async fn build_pipeline(
    device: &wgpu::Device,
    source: &ShaderSource,
    create: impl FnOnce(&wgpu::ShaderModule) -> wgpu::RenderPipeline,
) -> Option<wgpu::RenderPipeline> {
    let (module, compiled) = checked(device, &format!("shader {}", source.describe()), || {
        source.module(device)
    })
    .await;
    let (pipeline, linked) = checked(device, &format!("{} pipeline", source.name), || {
        create(&module)
    })
    .await;
    if compiled && linked {
        Some(pipeline)
    } else {
        log::error!("{} pipeline disabled", source.name);
        None
    }
}
