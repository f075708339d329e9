//! One cube, scroll to zoom.

use std::{cell::Cell, rc::Rc};

use scppr::{CameraUpdate, Listener, Object, Renderer, RendererError};

fn main() -> Result<(), RendererError> {
    let mut renderer = Renderer::new("Hello world", "assets")?;
    let cube = renderer.load_model("cube.obj")?;
    let object = renderer.create_object(Object::new(cube));
    renderer.add_object(object);

    // degrees
    let fov = Rc::new(Cell::new(45.0f64));
    let dirty = Rc::new(Cell::new(true));
    {
        let (fov, dirty) = (fov.clone(), dirty.clone());
        renderer.add_listener(Listener::scroll(move |_, dy| {
            fov.set((fov.get() - dy).clamp(3.0, 120.0));
            dirty.set(true);
        }));
    }

    while renderer.is_open() {
        renderer.poll();
        if dirty.replace(false) {
            renderer.set_camera(CameraUpdate::default().fov((fov.get() as f32).to_radians()));
        }
        if let Err(e) = renderer.draw() {
            log::error!("{}", e);
            break;
        }
    }
    Ok(())
}
