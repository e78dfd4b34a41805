//! Split the triangle list into per-material groups.
//!
//! A group is a maximal run of consecutive triangles sharing one material
//! index. Runs are not merged: materials `2, 5, 2` give three groups, two of
//! them on material 2.

use crate::ms3d::Group;

/// Fold material indices, in triangle order, into groups named "Group N".
///
/// Triangle `i` of the input lands in exactly one group at position `i` of the
/// concatenated index lists. No triangles means no groups. The caller keeps
/// the triangle count within `u16` range.
pub fn build_groups<I>(material_indices: I) -> Vec<Group>
where
    I: IntoIterator<Item = i8>,
{
    let mut groups: Vec<Group> = Vec::new();

    for (triangle, material) in material_indices.into_iter().enumerate() {
        debug_assert!(triangle <= u16::MAX as usize);
        let triangle = triangle as u16;
        match groups.last_mut() {
            Some(current) if current.material_index == material => {
                current.triangle_indices.push(triangle);
            }
            _ => {
                let mut group = Group::new(format!("Group {}", groups.len() + 1), material);
                group.triangle_indices.push(triangle);
                groups.push(group);
            }
        }
    }

    groups
}
