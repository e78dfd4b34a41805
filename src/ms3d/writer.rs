use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use super::{
    FILENAME_LEN, Group, Joint, MAGIC, Material, Ms3dModel, NAME_LEN, Triangle, VERSION, Vertex,
};
use crate::error::{Act2Ms3dError, Result};

/// Encode a model into `.ms3d` bytes.
///
/// Section order: header, vertices, triangles, groups, materials, editor
/// animation controls, joints. Every variable-length section is prefixed
/// with a little-endian `u16` count; the keyframe arrays of each joint are
/// empty.
pub fn to_bytes(model: &Ms3dModel) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(model.encoded_len());

    // 1. Header
    buf.extend_from_slice(MAGIC);
    write_i32(&mut buf, VERSION);

    // 2. Vertices
    write_count(&mut buf, model.vertices.len(), "vertices")?;
    for vertex in &model.vertices {
        write_vertex(&mut buf, vertex);
    }

    // 3. Triangles
    write_count(&mut buf, model.triangles.len(), "triangles")?;
    for triangle in &model.triangles {
        write_triangle(&mut buf, triangle);
    }

    // 4. Groups
    write_count(&mut buf, model.groups.len(), "groups")?;
    for group in &model.groups {
        write_group(&mut buf, group)?;
    }

    // 5. Materials
    write_count(&mut buf, model.materials.len(), "materials")?;
    for material in &model.materials {
        write_material(&mut buf, material);
    }

    // 6. Editor animation controls
    write_f32(&mut buf, model.anim_controls.animation_fps);
    write_f32(&mut buf, model.anim_controls.current_time);
    write_i32(&mut buf, model.anim_controls.total_frames);

    // 7. Joints
    write_count(&mut buf, model.joints.len(), "joints")?;
    for joint in &model.joints {
        write_joint(&mut buf, joint);
    }

    debug_assert_eq!(buf.len(), model.encoded_len());
    Ok(buf)
}

/// Encode a model and write it to `writer`.
pub fn write_ms3d<W: Write>(model: &Ms3dModel, writer: &mut W) -> Result<usize> {
    let bytes = to_bytes(model)?;
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Encode a model and write it to `path`, returning the byte count.
///
/// Encoding happens before the file is created, so a model that cannot be
/// encoded never leaves a partial file behind.
pub fn write_ms3d_file(path: &Path, model: &Ms3dModel) -> Result<usize> {
    let bytes = to_bytes(model)?;

    let file = File::create(path).map_err(|e| {
        Act2Ms3dError::Output(format!("Failed to open {} for writing: {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    info!(path = %path.display(), bytes = bytes.len(), "Wrote MS3D file");
    Ok(bytes.len())
}

fn write_vertex(buf: &mut Vec<u8>, vertex: &Vertex) {
    buf.push(vertex.flags);
    write_f32s(buf, &vertex.position);
    write_i8(buf, vertex.bone_id);
    buf.push(vertex.reference_count);
}

fn write_triangle(buf: &mut Vec<u8>, triangle: &Triangle) {
    write_u16(buf, triangle.flags);
    for &index in &triangle.vertex_indices {
        write_u16(buf, index);
    }
    for normal in &triangle.vertex_normals {
        write_f32s(buf, normal);
    }
    write_f32s(buf, &triangle.s);
    write_f32s(buf, &triangle.t);
    buf.push(triangle.smoothing_group);
    buf.push(triangle.group_index);
}

fn write_group(buf: &mut Vec<u8>, group: &Group) -> Result<()> {
    buf.push(group.flags);
    write_cstr_fixed(buf, &group.name, NAME_LEN);
    write_count(buf, group.triangle_indices.len(), "triangles in group")?;
    for &index in &group.triangle_indices {
        write_u16(buf, index);
    }
    write_i8(buf, group.material_index);
    Ok(())
}

fn write_material(buf: &mut Vec<u8>, material: &Material) {
    write_cstr_fixed(buf, &material.name, NAME_LEN);
    write_f32s(buf, &material.ambient);
    write_f32s(buf, &material.diffuse);
    write_f32s(buf, &material.specular);
    write_f32s(buf, &material.emissive);
    write_f32(buf, material.shininess);
    write_f32(buf, material.transparency);
    write_i8(buf, material.mode);
    write_cstr_fixed(buf, &material.texture, FILENAME_LEN);
    write_cstr_fixed(buf, &material.alphamap, FILENAME_LEN);
}

fn write_joint(buf: &mut Vec<u8>, joint: &Joint) {
    buf.push(joint.flags);
    write_cstr_fixed(buf, &joint.name, NAME_LEN);
    write_cstr_fixed(buf, &joint.parent_name, NAME_LEN);
    write_f32s(buf, &joint.rotation);
    write_f32s(buf, &joint.position);
    write_u16(buf, joint.num_key_frames_rot);
    write_u16(buf, joint.num_key_frames_trans);
}

// ============================================================================
// Byte writing helpers
// ============================================================================

fn write_count(buf: &mut Vec<u8>, count: usize, what: &str) -> Result<()> {
    let count = u16::try_from(count).map_err(|_| {
        Act2Ms3dError::Output(format!(
            "too many {what}: {count} exceeds the format limit of {}",
            u16::MAX
        ))
    })?;
    write_u16(buf, count);
    Ok(())
}

fn write_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_i8(buf: &mut Vec<u8>, v: i8) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for &v in values {
        write_f32(buf, v);
    }
}

/// Write `s` into a zero-filled field of `width` bytes.
///
/// At most `width - 1` bytes of the string are kept so the field is always
/// NUL-terminated; truncation backs off to a UTF-8 character boundary.
fn write_cstr_fixed(buf: &mut Vec<u8>, s: &str, width: usize) {
    let mut len = s.len().min(width - 1);
    while !s.is_char_boundary(len) {
        len -= 1;
    }
    if len < s.len() {
        warn!(value = s, width, "Truncating string to fit fixed-width field");
    }

    let start = buf.len();
    buf.extend_from_slice(&s.as_bytes()[..len]);
    buf.resize(start + width, 0);
}
