//! Model-space bone transforms.
//!
//! A bone's attachment is relative to its parent, so its model-space
//! transform is the product of every attachment from the root down:
//! `root * ... * parent * local`.

use glam::DAffine3;

use crate::error::{Act2Ms3dError, Result};
use crate::source::{Bone, NO_BONE};

/// Bone indices from `index` up to its root, child first.
///
/// Fails if `index` or any parent is out of range, or if the walk visits
/// more bones than the skeleton holds (a parent cycle).
pub fn bone_chain(bones: &[Bone], index: usize) -> Result<Vec<usize>> {
    let mut chain = vec![index];
    let mut current = bone_at(bones, index)?;

    while let Some(parent) = current.parent() {
        if chain.len() >= bones.len() {
            return Err(Act2Ms3dError::InvalidModel(format!(
                "parent cycle reached from bone {index}"
            )));
        }
        current = bone_at(bones, parent)?;
        chain.push(parent);
    }

    Ok(chain)
}

/// Model-space transform of `bone_index`, or `None` for [`NO_BONE`].
///
/// Walks the parent chain on every call; see [`SkeletonResolver`] for the
/// memoized variant.
pub fn resolve_bone_transform(bones: &[Bone], bone_index: i32) -> Result<Option<DAffine3>> {
    let Some(index) = bone_ref(bone_index)? else {
        return Ok(None);
    };

    let chain = bone_chain(bones, index)?;
    let transform = chain
        .iter()
        .rev()
        .fold(DAffine3::IDENTITY, |acc, &i| {
            acc * bones[i].attachment.to_daffine3()
        });

    Ok(Some(transform))
}

/// Memoizing transform resolver for one skeleton.
///
/// Each bone's model-space transform is computed once and reused by every
/// vertex bound to it or to one of its descendants.
pub struct SkeletonResolver<'a> {
    bones: &'a [Bone],
    cache: Vec<Option<DAffine3>>,
}

impl<'a> SkeletonResolver<'a> {
    pub fn new(bones: &'a [Bone]) -> Self {
        Self {
            bones,
            cache: vec![None; bones.len()],
        }
    }

    /// Model-space transform of `bone_index`, or `None` for [`NO_BONE`].
    pub fn resolve(&mut self, bone_index: i32) -> Result<Option<DAffine3>> {
        let Some(index) = bone_ref(bone_index)? else {
            return Ok(None);
        };

        // Climb until a root or an already resolved ancestor.
        let mut pending = Vec::new();
        let mut current = Some(index);
        let mut base = DAffine3::IDENTITY;
        while let Some(i) = current {
            if let Some(cached) = self.cache.get(i).copied().flatten() {
                base = cached;
                break;
            }
            if pending.len() >= self.bones.len() {
                return Err(Act2Ms3dError::InvalidModel(format!(
                    "parent cycle reached from bone {index}"
                )));
            }
            current = bone_at(self.bones, i)?.parent();
            pending.push(i);
        }

        for &i in pending.iter().rev() {
            base = base * self.bones[i].attachment.to_daffine3();
            self.cache[i] = Some(base);
        }

        Ok(Some(base))
    }
}

fn bone_ref(bone_index: i32) -> Result<Option<usize>> {
    if bone_index == NO_BONE {
        return Ok(None);
    }
    usize::try_from(bone_index)
        .map(Some)
        .map_err(|_| Act2Ms3dError::InvalidModel(format!("invalid bone index {bone_index}")))
}

fn bone_at(bones: &[Bone], index: usize) -> Result<&Bone> {
    bones.get(index).ok_or_else(|| {
        Act2Ms3dError::InvalidModel(format!(
            "bone {index} out of range ({} bones)",
            bones.len()
        ))
    })
}
