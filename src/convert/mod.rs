pub mod groups;
pub mod rotation;
pub mod skeleton;

use glam::DVec3;
use tracing::{debug, info};

use crate::error::{Act2Ms3dError, Result};
use crate::ms3d::{AnimControls, Joint, Material, Ms3dModel, Triangle, Vertex};
use crate::source::SourceModel;

use groups::build_groups;
use rotation::matrix_to_euler;
use skeleton::SkeletonResolver;

/// Conversion options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Extension appended to a material name to form its texture file name.
    pub texture_extension: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            texture_extension: "bmp".into(),
        }
    }
}

/// Build the MilkShape model for a skinned body.
///
/// Vertices are moved from bone space to model space, triangles gather their
/// normals and UVs, consecutive same-material triangles become groups, and
/// each bone becomes a joint with its local transform as Euler angles plus
/// position. No keyframes are produced.
pub fn convert_body<S: SourceModel + ?Sized>(
    source: &S,
    options: &ConvertOptions,
) -> Result<Ms3dModel> {
    let vertices = convert_vertices(source)?;
    let triangles = convert_triangles(source)?;

    let material_indices = source
        .faces()
        .iter()
        .enumerate()
        .map(|(i, face)| {
            i8::try_from(face.material_index).map_err(|_| {
                Act2Ms3dError::InvalidModel(format!(
                    "face {i} material {} does not fit a signed byte",
                    face.material_index
                ))
            })
        })
        .collect::<Result<Vec<i8>>>()?;
    let groups = build_groups(material_indices);
    debug!(groups = groups.len(), "Built material groups");

    let materials = convert_materials(source, options)?;
    let joints = convert_joints(source)?;

    info!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        groups = groups.len(),
        materials = materials.len(),
        joints = joints.len(),
        "Converted body"
    );

    Ok(Ms3dModel {
        vertices,
        triangles,
        groups,
        materials,
        anim_controls: AnimControls::default(),
        joints,
    })
}

fn convert_vertices<S: SourceModel + ?Sized>(source: &S) -> Result<Vec<Vertex>> {
    check_count(source.skin_vertices().len(), "vertices")?;

    let mut resolver = SkeletonResolver::new(source.bones());
    source
        .skin_vertices()
        .iter()
        .enumerate()
        .map(|(i, sv)| -> Result<Vertex> {
            let bone_id = i8::try_from(sv.bone_index).map_err(|_| {
                Act2Ms3dError::InvalidModel(format!(
                    "vertex {i} bone {} does not fit a signed byte",
                    sv.bone_index
                ))
            })?;

            let local = DVec3::from_array(sv.position.map(f64::from));
            // Unbound vertices stay where they are.
            let world = match resolver.resolve(sv.bone_index)? {
                Some(transform) => transform.transform_point3(local),
                None => local,
            };

            Ok(Vertex {
                flags: 0,
                position: world.as_vec3().to_array(),
                bone_id,
                reference_count: 0,
            })
        })
        .collect()
}

fn convert_triangles<S: SourceModel + ?Sized>(source: &S) -> Result<Vec<Triangle>> {
    check_count(source.faces().len(), "triangles")?;

    let skin_vertices = source.skin_vertices();
    let normals = source.skin_normals();

    source
        .faces()
        .iter()
        .enumerate()
        .map(|(i, face)| -> Result<Triangle> {
            let mut triangle = Triangle {
                flags: 0,
                vertex_indices: [0; 3],
                vertex_normals: [[0.0; 3]; 3],
                s: [0.0; 3],
                t: [0.0; 3],
                smoothing_group: 1,
                group_index: 0,
            };

            for corner in 0..3 {
                let vi = face.vertex_indices[corner] as usize;
                let ni = face.normal_indices[corner] as usize;

                let vertex = skin_vertices.get(vi).ok_or_else(|| {
                    Act2Ms3dError::InvalidModel(format!("face {i} references vertex {vi}"))
                })?;
                let normal = normals.get(ni).ok_or_else(|| {
                    Act2Ms3dError::InvalidModel(format!("face {i} references normal {ni}"))
                })?;

                // Checked against the vertex count, which fits in u16.
                triangle.vertex_indices[corner] = vi as u16;
                triangle.vertex_normals[corner] = normal.normal;
                // Texture coordinates live on the skin vertex.
                triangle.s[corner] = vertex.uv[0];
                triangle.t[corner] = vertex.uv[1];
            }

            Ok(triangle)
        })
        .collect()
}

fn convert_materials<S: SourceModel + ?Sized>(
    source: &S,
    options: &ConvertOptions,
) -> Result<Vec<Material>> {
    let names = source.material_names();
    check_count(names.len(), "materials")?;

    Ok(names
        .iter()
        .map(|name| Material::with_defaults(name, &options.texture_extension))
        .collect())
}

fn convert_joints<S: SourceModel + ?Sized>(source: &S) -> Result<Vec<Joint>> {
    check_count(source.bones().len(), "joints")?;

    source
        .bones()
        .iter()
        .enumerate()
        .map(|(i, bone)| -> Result<Joint> {
            let name = source.bone_name(i)?.to_string();
            let parent_name = match bone.parent() {
                Some(parent) => source.bone_name(parent)?.to_string(),
                None => String::new(),
            };

            let attachment = &bone.attachment;
            Ok(Joint {
                flags: 0,
                name,
                parent_name,
                rotation: matrix_to_euler(attachment.rotation_mat3()),
                position: attachment.translation,
                num_key_frames_rot: 0,
                num_key_frames_trans: 0,
            })
        })
        .collect()
}

fn check_count(count: usize, what: &str) -> Result<()> {
    if count > u16::MAX as usize {
        return Err(Act2Ms3dError::InvalidModel(format!(
            "{count} {what} exceed the MS3D limit of {}",
            u16::MAX
        )));
    }
    Ok(())
}
