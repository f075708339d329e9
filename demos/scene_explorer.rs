//! Four cubes with different material overrides and two lights.
//!
//! WASD to fly, hold the right mouse button to look around, scroll to zoom.
//! Textures are read from `assets/` when present; otherwise a generated
//! stand-in is used.

use std::{cell::RefCell, rc::Rc};

use scppr::{
    CameraUpdate, ColorSpace, ElementState, KeyCode, Light, Listener, Material, MouseButton,
    Object, PhysicalKey, Renderer, RendererError, TextureId,
    cgmath::{InnerSpace, Vector3},
    image::{DynamicImage, Rgba, RgbaImage},
};

const SPEED: f32 = 0.1;
const SENSITIVITY: f64 = 0.1;

/// Fly camera state in degrees, mirrored into the renderer when dirty.
struct FlyCamera {
    fov: f64,
    position: Vector3<f32>,
    pitch: f64,
    yaw: f64,
    /// Forward/backward and right/left key balance.
    df: f32,
    dr: f32,
    last_pointer: Option<(f64, f64)>,
    capture: Option<bool>,
    dirty: bool,
}

impl FlyCamera {
    fn new() -> Self {
        Self {
            fov: 45.0,
            position: Vector3::new(0.0, 0.0, 3.0),
            pitch: 0.0,
            yaw: -90.0,
            df: 0.0,
            dr: 0.0,
            last_pointer: None,
            capture: None,
            dirty: true,
        }
    }

    fn front(&self) -> Vector3<f32> {
        let (pitch, yaw) = (self.pitch.to_radians() as f32, self.yaw.to_radians() as f32);
        Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    fn tick(&mut self) {
        if self.df == 0.0 && self.dr == 0.0 {
            return;
        }
        let front = self.front();
        let right = front.cross(Vector3::unit_y()).normalize();
        self.position += front * SPEED * self.df + right * SPEED * self.dr;
        self.dirty = true;
    }

    fn update(&self) -> CameraUpdate {
        CameraUpdate::all(
            (self.fov as f32).to_radians(),
            self.position,
            (self.pitch as f32).to_radians(),
            0.0,
            (self.yaw as f32).to_radians(),
        )
    }
}

fn texture_or(
    renderer: &mut Renderer,
    file: &str,
    color_space: ColorSpace,
    fallback: impl Fn(u32, u32) -> Rgba<u8>,
) -> TextureId {
    match renderer.load_texture(file, color_space) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("{}, generating a stand-in", e);
            let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, fallback));
            renderer.texture_from_image(&img, file, color_space)
        }
    }
}

fn main() -> Result<(), RendererError> {
    let mut renderer = Renderer::new("Scene explorer", "assets")?;
    let cube = renderer.load_model("cube.obj")?;

    let crate_diffuse = texture_or(&mut renderer, "container2.png", ColorSpace::Srgb, |x, y| {
        let board = ((x / 8 + y / 8) % 2) as u8;
        Rgba([150 + 40 * board, 100 + 20 * board, 40, 255])
    });
    let crate_specular =
        texture_or(&mut renderer, "container2_specular.png", ColorSpace::Linear, |x, y| {
            let rim = x < 6 || y < 6 || x > 57 || y > 57;
            if rim { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 255]) }
        });
    let thonk = texture_or(&mut renderer, "thonk.png", ColorSpace::Srgb, |x, y| {
        Rgba([(x * 4) as u8, (y * 4) as u8, 200, 255])
    });

    let material = Material::new(Some(crate_diffuse), Some(crate_specular));
    let objects = [
        Object::new(cube).with_overwrite(0, material),
        Object::at(cube, Vector3::new(-5.0, 0.0, 0.0))
            .with_overwrite(0, Material::new(None, material.specular)),
        Object::at(cube, Vector3::new(5.0, 0.0, 0.0))
            .with_overwrite(0, Material::new(material.diffuse, None)),
        Object::at(cube, Vector3::new(0.0, 5.0, 0.0))
            .with_overwrite(0, Material::new(Some(thonk), None)),
    ];
    for object in objects {
        let id = renderer.create_object(object);
        renderer.add_object(id);
    }

    let green = renderer.create_light(Light {
        color: Vector3::new(0.0, 1.0, 0.0),
        ..Light::new(Vector3::new(0.0, 10.0, -5.0))
    });
    let white = renderer.create_light(Light::new(Vector3::new(0.0, -10.0, 5.0)));
    renderer.add_light(green);
    renderer.add_light(white);

    let camera = Rc::new(RefCell::new(FlyCamera::new()));
    {
        let camera = camera.clone();
        renderer.add_listener(Listener::scroll(move |_, dy| {
            let mut camera = camera.borrow_mut();
            camera.fov = (camera.fov - dy).clamp(10.0, 120.0);
            camera.dirty = true;
        }));
    }
    {
        let camera = camera.clone();
        renderer.add_listener(Listener::pointer_move(move |x, y| {
            let mut camera = camera.borrow_mut();
            if camera.capture != Some(true) {
                return;
            }
            if let Some((last_x, last_y)) = camera.last_pointer.replace((x, y)) {
                camera.yaw += (x - last_x) * SENSITIVITY;
                camera.pitch = (camera.pitch - (y - last_y) * SENSITIVITY).clamp(-89.0, 89.0);
                camera.dirty = true;
            }
        }));
    }
    {
        let camera = camera.clone();
        renderer.add_listener(Listener::button(move |input| {
            if input.button == MouseButton::Right {
                let mut camera = camera.borrow_mut();
                camera.capture = Some(input.state == ElementState::Pressed);
                camera.last_pointer = None;
            }
        }));
    }
    {
        let camera = camera.clone();
        renderer.add_listener(Listener::key(move |input| {
            if input.repeat {
                return;
            }
            let sign = match input.state {
                ElementState::Pressed => 1.0,
                ElementState::Released => -1.0,
            };
            let mut camera = camera.borrow_mut();
            match input.key {
                PhysicalKey::Code(KeyCode::KeyW) => camera.df += sign,
                PhysicalKey::Code(KeyCode::KeyS) => camera.df -= sign,
                PhysicalKey::Code(KeyCode::KeyD) => camera.dr += sign,
                PhysicalKey::Code(KeyCode::KeyA) => camera.dr -= sign,
                _ => {}
            }
        }));
    }

    while renderer.is_open() {
        renderer.poll();
        {
            let mut camera = camera.borrow_mut();
            if let Some(captured) = camera.capture {
                if captured != renderer.is_cursor_captured() {
                    renderer.set_cursor_captured(captured);
                }
            }
            camera.tick();
            if camera.dirty {
                renderer.set_camera(camera.update());
                camera.dirty = false;
            }
        }
        if let Err(e) = renderer.draw() {
            log::error!("{}", e);
            break;
        }
    }
    Ok(())
}
