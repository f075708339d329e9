use scppr::{
    CameraUpdate, Light, Material, Object,
    cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix, Vector3, Vector4},
    data_structures::scene::Scene,
    render::{MAX_LIGHTS, plan_frame},
};

use crate::common::test_utils::{EPSILON, SIZE, StubModels, defaults, settings, tex, unbound};

mod common;

fn lit(scene: &mut Scene, light: Light) {
    let id = scene.create_light(light);
    scene.add_light(id);
}

#[test]
fn light_count_follows_active_regardless_of_hidden() {
    let mut scene = Scene::new();
    lit(&mut scene, Light::new(Vector3::new(1.0, 0.0, 0.0)));
    lit(
        &mut scene,
        Light {
            hidden: true,
            ..Light::new(Vector3::new(2.0, 0.0, 0.0))
        },
    );
    lit(
        &mut scene,
        Light {
            active: false,
            ..Light::new(Vector3::new(3.0, 0.0, 0.0))
        },
    );

    let plan = plan_frame(&scene, &StubModels::new(), &defaults(), &settings(), SIZE);
    // default ambient + two active ones
    assert_eq!(plan.light_count(), 3);
    // markers for the visible ones only: not the ambient light, not the hidden one
    assert_eq!(plan.markers.len(), 2);
}

#[test]
fn all_inactive_lights_plan_zero_and_still_draw_geometry() {
    let mut scene = Scene::new();
    let ambient = scene.default_ambient_light();
    scene.light_mut(ambient).unwrap().active = false;
    lit(
        &mut scene,
        Light {
            active: false,
            ..Light::default()
        },
    );
    let mut models = StubModels::new();
    let model = models.add(vec![Material::default()]);
    let object = scene.create_object(Object::new(model));
    scene.add_object(object);

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    assert_eq!(plan.light_count(), 0);
    assert!(plan.lights.is_empty());
    assert_eq!(plan.objects.len(), 1);
}

#[test]
fn skipped_lights_leave_no_gaps() {
    let mut scene = Scene::new();
    let ambient = scene.default_ambient_light();
    scene.remove_light(ambient);
    let mut ids = Vec::new();
    for i in 0..5 {
        let id = scene.create_light(Light {
            active: i % 2 == 0,
            ..Light::new(Vector3::new(i as f32, 0.0, 0.0))
        });
        scene.add_light(id);
        ids.push(id);
    }

    let plan = plan_frame(&scene, &StubModels::new(), &defaults(), &settings(), SIZE);
    let planned: Vec<_> = plan.lights.iter().map(|l| l.light).collect();
    assert_eq!(planned, vec![ids[0], ids[2], ids[4]]);
}

#[test]
fn light_positions_are_in_view_space() {
    let mut scene = Scene::new();
    let ambient = scene.default_ambient_light();
    scene.remove_light(ambient);
    lit(&mut scene, Light::new(Vector3::new(1.0, 2.0, -4.0)));
    scene.set_camera(CameraUpdate::default().eye(Vector3::new(0.0, 0.0, 5.0)));

    let plan = plan_frame(&scene, &StubModels::new(), &defaults(), &settings(), SIZE);
    let expected = plan.view * Vector4::new(1.0, 2.0, -4.0, 1.0);
    assert!((plan.lights[0].position - expected.truncate()).magnitude() < EPSILON);
    // default yaw looks down -Z, so the view only translates
    assert!((plan.lights[0].position - Vector3::new(1.0, 2.0, -9.0)).magnitude() < EPSILON);
}

#[test]
fn lights_past_the_uniform_array_are_dropped() {
    let mut scene = Scene::new();
    for _ in 0..MAX_LIGHTS + 4 {
        lit(&mut scene, Light::default());
    }
    let plan = plan_frame(&scene, &StubModels::new(), &defaults(), &settings(), SIZE);
    assert_eq!(plan.lights.len(), MAX_LIGHTS);
    assert_eq!(plan.light_count(), MAX_LIGHTS as u32);
}

#[test]
fn mesh_without_override_keeps_its_own_material() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let own = Material::new(Some(tex(1)), None);
    let model = models.add(vec![own]);
    let object = scene.create_object(Object::new(model));
    scene.add_object(object);

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    assert_eq!(plan.objects[0].meshes[0].material, own);
    // the empty specular binds the unbound texture, not the default
    assert_eq!(plan.objects[0].meshes[0].units(unbound()), [tex(1), unbound()]);
}

#[test]
fn override_fills_gaps_from_the_global_defaults() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let model = models.add(vec![
        Material::new(Some(tex(1)), Some(tex(2))),
        Material::new(Some(tex(3)), Some(tex(4))),
    ]);
    let object = scene.create_object(
        Object::new(model)
            .with_overwrite(0, Material::new(Some(tex(7)), None))
            .with_overwrite(1, Material::new(None, None)),
    );
    scene.add_object(object);

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    let meshes = &plan.objects[0].meshes;
    assert_eq!(meshes[0].material, Material::new(Some(tex(7)), defaults().specular));
    assert_eq!(meshes[1].material, defaults());
}

#[test]
fn hidden_objects_and_missing_models_are_skipped() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let kept = models.add(vec![Material::default()]);
    let gone = models.add(vec![Material::default()]);
    models.remove(gone);

    let visible = scene.create_object(Object::new(kept));
    let hidden = scene.create_object(Object {
        hidden: true,
        ..Object::new(kept)
    });
    let orphan = scene.create_object(Object::new(gone));
    let unregistered = scene.create_object(Object::new(kept));
    for id in [visible, hidden, orphan] {
        scene.add_object(id);
    }

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    let drawn: Vec<_> = plan.objects.iter().map(|o| o.object).collect();
    assert_eq!(drawn, vec![visible]);
    assert!(!drawn.contains(&unregistered));
}

#[test]
fn meshes_without_geometry_are_not_drawn() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let model = models.add(vec![
        Material::new(Some(tex(1)), None),
        Material::new(Some(tex(2)), None),
        Material::new(Some(tex(3)), None),
    ]);
    models.empty_mesh(model, 1);
    let id = scene.create_object(
        Object::new(model).with_overwrite(2, Material::new(Some(tex(9)), None)),
    );
    scene.add_object(id);

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    let meshes = &plan.objects[0].meshes;
    let drawn: Vec<_> = meshes.iter().map(|m| m.mesh).collect();
    assert_eq!(drawn, vec![0, 2]);
    // overrides still line up with the original mesh indices
    assert_eq!(meshes[1].material.diffuse, Some(tex(9)));
}

#[test]
fn inactive_objects_are_still_drawn() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let model = models.add(vec![Material::default()]);
    let id = scene.create_object(Object {
        active: false,
        ..Object::new(model)
    });
    scene.add_object(id);
    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    assert_eq!(plan.objects.len(), 1);
}

#[test]
fn normal_matrix_is_the_inverse_transpose_of_model_view() {
    let mut scene = Scene::new();
    let mut models = StubModels::new();
    let model = models.add(vec![Material::default()]);
    let id = scene.create_object(Object {
        rotation: Vector3::new(0.3, -0.7, 1.1),
        scale: Vector3::new(2.0, 1.0, 0.5),
        ..Object::at(model, Vector3::new(1.0, -2.0, 3.0))
    });
    scene.add_object(id);

    let plan = plan_frame(&scene, &models, &defaults(), &settings(), SIZE);
    let draw = &plan.objects[0];
    let model_view = plan.view * draw.model_matrix;
    // N^T * MV == I
    let product = draw.normal_matrix.transpose() * model_view;
    let identity = Matrix4::<f32>::identity();
    for c in 0..4 {
        assert!((product[c] - identity[c]).magnitude() < 1e-4, "{:?}", product);
    }
}

#[test]
fn marker_matrix_is_translation_only() {
    let mut scene = Scene::new();
    let position = Vector3::new(0.0, 10.0, -5.0);
    lit(
        &mut scene,
        Light {
            color: Vector3::new(0.0, 1.0, 0.0),
            ..Light::new(position)
        },
    );
    let plan = plan_frame(&scene, &StubModels::new(), &defaults(), &settings(), SIZE);
    let marker = &plan.markers[0];
    assert_eq!(marker.color, Vector3::new(0.0, 1.0, 0.0));
    let expected = plan.projection * plan.view * Matrix4::from_translation(position);
    for c in 0..4 {
        assert!((marker.mvp[c] - expected[c]).magnitude() < EPSILON);
    }
}
