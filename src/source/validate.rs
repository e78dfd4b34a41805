use tracing::debug;

use crate::convert::skeleton::bone_chain;
use crate::error::{Act2Ms3dError, Result};
use crate::source::{NO_BONE, SourceModel};

/// Check every index the converter will follow.
///
/// The converter itself indexes the body's arrays directly; a body that
/// passes this check can be converted without any out-of-bounds access or
/// unbounded parent walk.
pub fn validate_body<S: SourceModel + ?Sized>(source: &S) -> Result<()> {
    let bones = source.bones();
    let bone_count = bones.len();

    for (i, bone) in bones.iter().enumerate() {
        check_bone_ref(bone.parent_index, bone_count)
            .map_err(|msg| invalid(format!("bone {i} parent: {msg}")))?;
        if bone.parent_index == i as i32 {
            return Err(invalid(format!("bone {i} is its own parent")));
        }
        source
            .bone_name(i)
            .map_err(|_| invalid(format!("bone {i} has no name")))?;
    }

    // Walks every chain once; fails on the first cycle.
    for i in 0..bone_count {
        bone_chain(bones, i)?;
    }

    for (i, vertex) in source.skin_vertices().iter().enumerate() {
        check_bone_ref(vertex.bone_index, bone_count)
            .map_err(|msg| invalid(format!("vertex {i} bone: {msg}")))?;
    }

    let vertex_count = source.skin_vertices().len();
    let normal_count = source.skin_normals().len();
    let material_count = source.material_names().len();

    for (i, face) in source.faces().iter().enumerate() {
        if let Some(&v) = face.vertex_indices.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(invalid(format!(
                "face {i} references vertex {v} but only {vertex_count} exist"
            )));
        }
        if let Some(&n) = face.normal_indices.iter().find(|&&n| n as usize >= normal_count) {
            return Err(invalid(format!(
                "face {i} references normal {n} but only {normal_count} exist"
            )));
        }
        if face.material_index as usize >= material_count {
            return Err(invalid(format!(
                "face {i} uses material {} but only {material_count} exist",
                face.material_index
            )));
        }
    }

    debug!(
        bones = bone_count,
        vertices = vertex_count,
        faces = source.faces().len(),
        "Source body validated"
    );

    Ok(())
}

fn check_bone_ref(index: i32, bone_count: usize) -> std::result::Result<(), String> {
    if index == NO_BONE {
        return Ok(());
    }
    match usize::try_from(index) {
        Ok(i) if i < bone_count => Ok(()),
        _ => Err(format!("index {index} outside 0..{bone_count}")),
    }
}

fn invalid(msg: String) -> Act2Ms3dError {
    Act2Ms3dError::InvalidModel(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Body, Bone, SkinFace, SkinNormal, SkinVertex, StringBlock, Xform};

    fn valid_body() -> Body {
        Body {
            bones: vec![
                Bone {
                    parent_index: NO_BONE,
                    attachment: Xform::IDENTITY,
                },
                Bone {
                    parent_index: 0,
                    attachment: Xform::IDENTITY,
                },
            ],
            bone_names: StringBlock::new(vec!["root".into(), "arm".into()]),
            skin_vertices: (0..3)
                .map(|i| SkinVertex {
                    position: [i as f32, 0.0, 0.0],
                    bone_index: 1,
                    uv: [0.0, 0.0],
                })
                .collect(),
            skin_normals: vec![SkinNormal {
                normal: [0.0, 0.0, 1.0],
            }],
            faces: vec![SkinFace {
                vertex_indices: [0, 1, 2],
                normal_indices: [0, 0, 0],
                material_index: 0,
            }],
            material_names: vec!["skin".into()],
        }
    }

    #[test]
    fn accepts_consistent_body() {
        validate_body(&valid_body()).unwrap();
    }

    #[test]
    fn accepts_empty_body() {
        validate_body(&Body::default()).unwrap();
    }

    #[test]
    fn accepts_unbound_vertex() {
        let mut body = valid_body();
        body.skin_vertices[0].bone_index = NO_BONE;
        validate_body(&body).unwrap();
    }

    #[test]
    fn rejects_dangling_parent() {
        let mut body = valid_body();
        body.bones[1].parent_index = 9;
        let err = validate_body(&body).unwrap_err();
        assert!(err.to_string().contains("bone 1 parent"));
    }

    #[test]
    fn rejects_self_parent() {
        let mut body = valid_body();
        body.bones[1].parent_index = 1;
        assert!(validate_body(&body).is_err());
    }

    #[test]
    fn rejects_parent_cycle() {
        let mut body = valid_body();
        body.bones[0].parent_index = 1;
        let err = validate_body(&body).unwrap_err();
        assert!(matches!(err, Act2Ms3dError::InvalidModel(_)));
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn rejects_missing_bone_name() {
        let mut body = valid_body();
        body.bone_names = StringBlock::new(vec!["root".into()]);
        let err = validate_body(&body).unwrap_err();
        assert!(err.to_string().contains("bone 1 has no name"));
    }

    #[test]
    fn rejects_bad_vertex_bone() {
        let mut body = valid_body();
        body.skin_vertices[2].bone_index = -5;
        let err = validate_body(&body).unwrap_err();
        assert!(err.to_string().contains("vertex 2 bone"));
    }

    #[test]
    fn rejects_dangling_face_indices() {
        let mut body = valid_body();
        body.faces[0].vertex_indices[1] = 3;
        assert!(validate_body(&body).unwrap_err().to_string().contains("vertex 3"));

        let mut body = valid_body();
        body.faces[0].normal_indices[2] = 1;
        assert!(validate_body(&body).unwrap_err().to_string().contains("normal 1"));
    }

    #[test]
    fn rejects_face_material_without_material_list() {
        let mut body = valid_body();
        body.material_names.clear();
        let err = validate_body(&body).unwrap_err();
        assert!(err.to_string().contains("material 0"));
    }
}
