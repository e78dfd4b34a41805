use criterion::{Criterion, criterion_group, criterion_main};
use act2ms3d::convert::{ConvertOptions, convert_body};
use act2ms3d::ms3d::to_bytes;
use act2ms3d::source::{Body, Bone, NO_BONE, SkinFace, SkinNormal, SkinVertex, StringBlock, Xform};

/// A body with a `depth`-long bone chain and a `n x n` vertex grid skinned
/// round-robin across the bones.
fn make_body(depth: usize, n: usize) -> Body {
    let bones: Vec<Bone> = (0..depth)
        .map(|i| Bone {
            parent_index: if i == 0 { NO_BONE } else { i as i32 - 1 },
            attachment: Xform::from_translation([0.0, 0.1, 0.0]),
        })
        .collect();

    let verts_per_side = n + 1;
    let mut skin_vertices = Vec::with_capacity(verts_per_side * verts_per_side);
    for y in 0..verts_per_side {
        for x in 0..verts_per_side {
            let fx = x as f32 / n as f32;
            let fy = y as f32 / n as f32;
            skin_vertices.push(SkinVertex {
                position: [fx, fy, 0.0],
                bone_index: (skin_vertices.len() % depth) as i32,
                uv: [fx, fy],
            });
        }
    }

    let mut faces = Vec::with_capacity(n * n * 2);
    for y in 0..n {
        for x in 0..n {
            let tl = (y * verts_per_side + x) as u32;
            let tr = tl + 1;
            let bl = tl + verts_per_side as u32;
            let br = bl + 1;
            let material_index = (y % 4) as u32;
            faces.push(SkinFace {
                vertex_indices: [tl, bl, tr],
                normal_indices: [0; 3],
                material_index,
            });
            faces.push(SkinFace {
                vertex_indices: [tr, bl, br],
                normal_indices: [0; 3],
                material_index,
            });
        }
    }

    Body {
        bones,
        bone_names: (0..depth).map(|i| format!("bone{i}")).collect::<StringBlock>(),
        skin_vertices,
        skin_normals: vec![SkinNormal {
            normal: [0.0, 0.0, 1.0],
        }],
        faces,
        material_names: (0..4).map(|i| format!("mat{i}")).collect(),
    }
}

fn bench_convert(c: &mut Criterion) {
    // 150x150 grid = 22801 vertices, 45000 triangles
    let body = make_body(64, 150);
    let options = ConvertOptions::default();

    c.bench_function("convert_body_45k_tris_64_bones", |b| {
        b.iter(|| convert_body(&body, &options).unwrap());
    });
}

fn bench_write(c: &mut Criterion) {
    let body = make_body(64, 150);
    let model = convert_body(&body, &ConvertOptions::default()).unwrap();

    c.bench_function("to_bytes_45k_tris", |b| {
        b.iter(|| to_bytes(&model).unwrap());
    });
}

criterion_group!(benches, bench_convert, bench_write);
criterion_main!(benches);
