//! Flat scene state: objects, lights, their draw registries and the camera.
//!
//! Objects and lights are *stored* in the scene once created and *registered*
//! for drawing separately. Registration is a set of ids, so adding the same id
//! twice or removing an id that is not registered has no effect.

use std::collections::BTreeSet;

use crate::{
    camera::{Camera, CameraUpdate},
    data_structures::{
        light::Light,
        object::Object,
        store::{LightId, ObjectId, Store},
    },
};

#[derive(Debug)]
pub struct Scene {
    objects: Store<ObjectId, Object>,
    lights: Store<LightId, Light>,
    registered_objects: BTreeSet<ObjectId>,
    registered_lights: BTreeSet<LightId>,
    default_ambient_light: LightId,
    pub camera: Camera,
}

impl Scene {
    /// An empty scene holding only the registered default ambient light.
    pub fn new() -> Self {
        let mut lights = Store::new();
        let default_ambient_light = lights.insert(Light::default_ambient());
        Self {
            objects: Store::new(),
            lights,
            registered_objects: BTreeSet::new(),
            registered_lights: BTreeSet::from([default_ambient_light]),
            default_ambient_light,
            camera: Camera::default(),
        }
    }

    pub fn default_ambient_light(&self) -> LightId {
        self.default_ambient_light
    }

    pub fn set_camera(&mut self, update: CameraUpdate) {
        self.camera.set(update);
    }

    pub fn create_object(&mut self, object: Object) -> ObjectId {
        self.objects.insert(object)
    }

    /// Drop an object, unregistering it first.
    pub fn destroy_object(&mut self, id: ObjectId) -> Option<Object> {
        self.registered_objects.remove(&id);
        self.objects.remove(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    pub fn add_object(&mut self, id: ObjectId) {
        if !self.objects.contains(id) {
            log::warn!("add_object: {:?} does not exist", id);
            return;
        }
        if self.registered_objects.insert(id) {
            log::debug!("registered {:?}", id);
        }
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        if self.registered_objects.remove(&id) {
            log::debug!("unregistered {:?}", id);
        }
    }

    pub fn create_light(&mut self, light: Light) -> LightId {
        self.lights.insert(light)
    }

    /// Drop a light, unregistering it first.
    ///
    /// The default ambient light belongs to the renderer and is never
    /// dropped; [`remove_light`](Self::remove_light) unregisters it.
    pub fn destroy_light(&mut self, id: LightId) -> Option<Light> {
        if id == self.default_ambient_light {
            log::warn!("destroy_light: {:?} is the default ambient light, use remove_light", id);
            return None;
        }
        self.registered_lights.remove(&id);
        self.lights.remove(id)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    pub fn add_light(&mut self, id: LightId) {
        if !self.lights.contains(id) {
            log::warn!("add_light: {:?} does not exist", id);
            return;
        }
        if self.registered_lights.insert(id) {
            log::debug!("registered {:?}", id);
        }
    }

    pub fn remove_light(&mut self, id: LightId) {
        if self.registered_lights.remove(&id) {
            log::debug!("unregistered {:?}", id);
        }
    }

    /// Registered objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.registered_objects
            .iter()
            .filter_map(|id| self.objects.get(*id).map(|o| (*id, o)))
    }

    /// Registered lights in creation order.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.registered_lights
            .iter()
            .filter_map(|id| self.lights.get(*id).map(|l| (*id, l)))
    }

    pub fn object_count(&self) -> usize {
        self.registered_objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.registered_lights.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
