//! Rotation matrix to Euler angles, via a unit quaternion.

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, Mat3};

/// `|sin(pitch)|` at or above this is treated as gimbal lock.
const GIMBAL_THRESHOLD: f64 = 1.0 - 1e-12;

/// Convert a rotation matrix to `[roll, pitch, yaw]` in radians.
///
/// The matrix is widened to double precision, turned into a unit quaternion
/// and decomposed there; only the final angles are narrowed to `f32`.
pub fn matrix_to_euler(rotation: Mat3) -> [f32; 3] {
    let q = DQuat::from_mat3(&rotation.as_dmat3()).normalize();
    let [roll, pitch, yaw] = quat_to_euler(q);
    [roll as f32, pitch as f32, yaw as f32]
}

/// Roll (X), pitch (Y), yaw (Z) decomposition of a unit quaternion.
///
/// Pitch saturates to exactly `±pi/2` when its sine reaches `±1`, instead
/// of taking `asin` of a value that rounding pushed out of domain.
pub fn quat_to_euler(q: DQuat) -> [f64; 3] {
    let sinr_cosp = 2.0 * (q.w * q.x + q.y * q.z);
    let cosr_cosp = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    let sinp = 2.0 * (q.w * q.y - q.z * q.x);
    let pitch = if sinp.abs() >= GIMBAL_THRESHOLD {
        FRAC_PI_2.copysign(sinp)
    } else {
        sinp.asin()
    };

    let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
    let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    [roll, pitch, yaw]
}
