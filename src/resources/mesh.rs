use cgmath::{InnerSpace, Vector3};

use crate::{data_structures::model::ModelVertex, resources::ImportedMesh};

/// Convert tobj meshes (loaded with `single_index`) into renderer vertices.
///
/// Texture coordinates are flipped vertically and meshes without normals get
/// smooth ones.
pub fn load_meshes(models: &[tobj::Model], file_name: &str) -> Vec<ImportedMesh> {
    models
        .iter()
        .filter_map(|m| {
            let mesh = &m.mesh;
            if mesh.indices.is_empty() {
                log::warn!("{}: mesh {:?} has no faces, skipped", file_name, m.name);
                return None;
            }
            let mut vertices = (0..mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            if mesh.normals.is_empty() {
                generate_normals(&mut vertices, &mesh.indices);
            }

            Some(ImportedMesh {
                name: m.name.clone(),
                vertices,
                indices: mesh.indices.clone(),
                material: mesh.material_id,
            })
        })
        .collect()
}

/// Area-weighted smooth normals: every triangle adds its unnormalised face
/// normal to its three corners, then the sums are normalised.
pub fn generate_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for c in indices.chunks_exact(3) {
        let [a, b, d] = [c[0], c[1], c[2]].map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || d >= vertices.len() {
            continue;
        }
        let p0: Vector3<f32> = vertices[a].position.into();
        let p1: Vector3<f32> = vertices[b].position.into();
        let p2: Vector3<f32> = vertices[d].position.into();
        // Cross product length is twice the triangle area
        let face = (p1 - p0).cross(p2 - p0);
        sums[a] += face;
        sums[b] += face;
        sums[d] += face;
    }
    for (v, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > f32::EPSILON {
            v.normal = sum.normalize().into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> tobj::Model {
        tobj::Model {
            mesh: tobj::Mesh {
                positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
                texcoords: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
                indices: vec![0, 1, 2, 0, 2, 3],
                material_id: Some(0),
                ..Default::default()
            },
            name: "quad".to_string(),
        }
    }

    #[test]
    fn flips_v_and_keeps_material_index() {
        let meshes = load_meshes(&[quad()], "quad.obj");
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.material, Some(0));
        assert_eq!(mesh.vertices[0].tex_coords, [0.0, 1.0]);
        assert_eq!(mesh.vertices[2].tex_coords, [1.0, 0.0]);
    }

    #[test]
    fn generates_normals_when_missing() {
        let meshes = load_meshes(&[quad()], "quad.obj");
        for v in &meshes[0].vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-6, "{:?}", v.normal);
        }
    }

    #[test]
    fn shared_vertices_average_adjacent_faces() {
        // two faces of a cube corner meeting along the Y axis
        let mut vertices: Vec<ModelVertex> = [
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
        ]
        .into_iter()
        .map(|position| ModelVertex {
            position,
            ..Default::default()
        })
        .collect();
        // face in the XY plane facing -Z, face in the YZ plane facing -X
        generate_normals(&mut vertices, &[0, 1, 2, 0, 3, 1]);
        let n: Vector3<f32> = vertices[0].normal.into();
        let expected = Vector3::new(-1.0, 0.0, -1.0).normalize();
        assert!((n - expected).magnitude() < 1e-6, "{:?}", n);
    }

    #[test]
    fn empty_meshes_are_skipped() {
        let empty = tobj::Model {
            mesh: tobj::Mesh::default(),
            name: "empty".to_string(),
        };
        assert!(load_meshes(&[empty, quad()], "x.obj").len() == 1);
    }
}
