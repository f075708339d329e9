use scppr::{
    CameraUpdate, Light, ModelId, Object,
    cgmath::{InnerSpace, Vector3},
    data_structures::scene::Scene,
};

#[test]
fn adding_twice_registers_once() {
    let mut scene = Scene::new();
    let object = scene.create_object(Object::new(ModelId::from_raw(0)));
    let light = scene.create_light(Light::default());

    for _ in 0..3 {
        scene.add_object(object);
        scene.add_light(light);
    }
    assert_eq!(scene.object_count(), 1);
    // plus the default ambient light
    assert_eq!(scene.light_count(), 2);
}

#[test]
fn removing_a_non_member_is_a_no_op() {
    let mut scene = Scene::new();
    let object = scene.create_object(Object::new(ModelId::from_raw(0)));
    let light = scene.create_light(Light::default());

    scene.remove_object(object);
    scene.remove_light(light);
    scene.remove_light(light);
    assert_eq!(scene.object_count(), 0);
    assert_eq!(scene.light_count(), 1);

    scene.add_light(light);
    scene.remove_light(light);
    scene.remove_light(light);
    assert_eq!(scene.light_count(), 1);
    // still stored, only unregistered
    assert!(scene.light(light).is_some());
}

#[test]
fn default_ambient_light_is_registered_hidden_and_dark() {
    let scene = Scene::new();
    let id = scene.default_ambient_light();
    let registered: Vec<_> = scene.lights().map(|(id, _)| id).collect();
    assert_eq!(registered, vec![id]);
    let light = scene.light(id).unwrap();
    assert!(light.hidden);
    assert!(light.active);
    assert_eq!(light.color, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn default_ambient_light_survives_destroy() {
    let mut scene = Scene::new();
    let ambient = scene.default_ambient_light();
    assert!(scene.destroy_light(ambient).is_none());
    assert!(scene.light(ambient).is_some());
    assert_eq!(scene.light_count(), 1);

    // it can still be taken out of the draw and put back
    scene.remove_light(ambient);
    assert_eq!(scene.light_count(), 0);
    assert!(scene.light(ambient).is_some());
    scene.add_light(ambient);
    assert_eq!(scene.light_count(), 1);
}

#[test]
fn destroyed_entities_are_unregistered() {
    let mut scene = Scene::new();
    let object = scene.create_object(Object::new(ModelId::from_raw(0)));
    scene.add_object(object);
    assert!(scene.destroy_object(object).is_some());
    assert_eq!(scene.object_count(), 0);
    // stale ids do not come back to life
    scene.add_object(object);
    assert_eq!(scene.object_count(), 0);
    assert!(scene.destroy_object(object).is_none());
}

#[test]
fn registries_iterate_in_creation_order() {
    let mut scene = Scene::new();
    let ids: Vec<_> = (0..4)
        .map(|i| scene.create_object(Object::new(ModelId::from_raw(i))))
        .collect();
    for id in ids.iter().rev() {
        scene.add_object(*id);
    }
    let registered: Vec<_> = scene.objects().map(|(id, _)| id).collect();
    assert_eq!(registered, ids);
}

#[test]
fn scene_camera_updates_keep_an_orthonormal_basis() {
    let mut scene = Scene::new();
    scene.set_camera(CameraUpdate::default().pitch(0.4).yaw(2.1));
    let camera = scene.camera;
    assert!((camera.front().magnitude() - 1.0).abs() < 1e-5);
    assert!(camera.front().dot(camera.right()).abs() < 1e-5);
    assert!(camera.front().dot(camera.up()).abs() < 1e-5);
    assert!(camera.right().dot(camera.up()).abs() < 1e-5);
}
