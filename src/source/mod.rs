//! Read-only view of the skinned actor body being converted.
//!
//! The proprietary actor container is never parsed here. Whatever produces the
//! body only has to expose the slices of [`SourceModel`]; [`Body`] is the owned
//! implementation used by the JSON loader and the tests.

pub mod json_loader;
pub mod validate;

use glam::{DAffine3, Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Act2Ms3dError, Result};

pub use json_loader::load_body;
pub use validate::validate_body;

/// Sentinel used by the source engine for "no bone" / "no parent".
pub const NO_BONE: i32 = -1;

/// Rigid transform: row-major 3x3 rotation plus translation.
///
/// Points transform as `p' = R * p + t` (column vectors), so a child's
/// model-space transform is `parent * local`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xform {
    /// Rows of the rotation block.
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl Default for Xform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Xform {
    pub const IDENTITY: Self = Self {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [0.0, 0.0, 0.0],
    };

    /// Pure translation.
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Build from a glam rotation matrix and translation.
    pub fn from_mat3_translation(rotation: Mat3, translation: Vec3) -> Self {
        // glam stores columns; the rows of R are the columns of R^T.
        Self {
            rotation: rotation.transpose().to_cols_array_2d(),
            translation: translation.to_array(),
        }
    }

    /// Rotation block as a glam matrix.
    pub fn rotation_mat3(&self) -> Mat3 {
        Mat3::from_cols_array_2d(&self.rotation).transpose()
    }

    pub fn translation_vec3(&self) -> Vec3 {
        Vec3::from_array(self.translation)
    }

    /// Double-precision affine transform used for hierarchy composition.
    pub fn to_daffine3(&self) -> DAffine3 {
        DAffine3::from_mat3_translation(
            self.rotation_mat3().as_dmat3(),
            self.translation_vec3().as_dvec3(),
        )
    }
}

/// Skeleton node of the source body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Index of the parent bone, or [`NO_BONE`] for a root.
    pub parent_index: i32,
    /// Transform relative to the parent bone.
    pub attachment: Xform,
}

impl Bone {
    /// Parent index, or `None` for a root bone.
    pub fn parent(&self) -> Option<usize> {
        usize::try_from(self.parent_index).ok()
    }
}

/// Mesh vertex bound to exactly one bone, in that bone's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinVertex {
    pub position: [f32; 3],
    /// Owning bone, or [`NO_BONE`].
    pub bone_index: i32,
    /// Texture coordinate `[u, v]`.
    pub uv: [f32; 2],
}

impl SkinVertex {
    pub fn bone(&self) -> Option<usize> {
        usize::try_from(self.bone_index).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinNormal {
    pub normal: [f32; 3],
}

/// Skin triangle. Normals and vertices are indexed independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinFace {
    pub vertex_indices: [u32; 3],
    pub normal_indices: [u32; 3],
    pub material_index: u32,
}

/// Indexed string table (bone names).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringBlock {
    strings: Vec<String>,
}

impl StringBlock {
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    /// Look up the string at `index`.
    pub fn get(&self, index: usize) -> Result<&str> {
        self.strings
            .get(index)
            .map(String::as_str)
            .ok_or(Act2Ms3dError::StringIndexOutOfRange {
                index,
                count: self.strings.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StringBlock {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Read access to a skinned body, as the converter needs it.
pub trait SourceModel {
    fn bones(&self) -> &[Bone];
    fn skin_vertices(&self) -> &[SkinVertex];
    fn skin_normals(&self) -> &[SkinNormal];
    fn faces(&self) -> &[SkinFace];
    fn material_names(&self) -> &[String];
    /// Name of the bone at `index`.
    fn bone_name(&self, index: usize) -> Result<&str>;
}

/// Owned actor body: one skin, its skeleton and its material names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub bones: Vec<Bone>,
    pub bone_names: StringBlock,
    pub skin_vertices: Vec<SkinVertex>,
    pub skin_normals: Vec<SkinNormal>,
    pub faces: Vec<SkinFace>,
    #[serde(default)]
    pub material_names: Vec<String>,
}

impl SourceModel for Body {
    fn bones(&self) -> &[Bone] {
        &self.bones
    }

    fn skin_vertices(&self) -> &[SkinVertex] {
        &self.skin_vertices
    }

    fn skin_normals(&self) -> &[SkinNormal] {
        &self.skin_normals
    }

    fn faces(&self) -> &[SkinFace] {
        &self.faces
    }

    fn material_names(&self) -> &[String] {
        &self.material_names
    }

    fn bone_name(&self, index: usize) -> Result<&str> {
        self.bone_names.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn string_block_lookup() {
        let block: StringBlock = ["root", "spine"].into_iter().collect();
        assert_eq!(block.len(), 2);
        assert_eq!(block.get(0).unwrap(), "root");
        assert_eq!(block.get(1).unwrap(), "spine");
    }

    #[test]
    fn string_block_out_of_range() {
        let block = StringBlock::new(vec!["root".into()]);
        let err = block.get(3).unwrap_err();
        assert!(matches!(
            err,
            Act2Ms3dError::StringIndexOutOfRange { index: 3, count: 1 }
        ));
    }

    #[test]
    fn bone_parent_sentinel() {
        let root = Bone {
            parent_index: NO_BONE,
            attachment: Xform::IDENTITY,
        };
        let child = Bone {
            parent_index: 0,
            attachment: Xform::IDENTITY,
        };
        assert_eq!(root.parent(), None);
        assert_eq!(child.parent(), Some(0));
    }

    #[test]
    fn xform_rotation_is_row_major() {
        // 90 degrees about Z: x axis maps to y axis.
        let xf = Xform {
            rotation: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [1.0, 2.0, 3.0],
        };
        let p = xf.to_daffine3().transform_point3(glam::DVec3::X);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn xform_mat3_round_trip() {
        let m = Mat3::from_rotation_x(0.3);
        let xf = Xform::from_mat3_translation(m, Vec3::new(4.0, 5.0, 6.0));
        assert!(xf.rotation_mat3().abs_diff_eq(m, 1e-6));
        assert_eq!(xf.translation, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn body_exposes_slices() {
        let body = Body {
            bones: vec![Bone {
                parent_index: NO_BONE,
                attachment: Xform::default(),
            }],
            bone_names: StringBlock::new(vec!["root".into()]),
            material_names: vec!["skin".into()],
            ..Default::default()
        };
        assert_eq!(body.bones().len(), 1);
        assert_eq!(body.bone_name(0).unwrap(), "root");
        assert!(body.bone_name(1).is_err());
        assert_eq!(body.material_names(), &["skin".to_string()]);
        assert!(body.faces().is_empty());
    }
}
