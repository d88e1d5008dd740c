//! Rotation conversions for 3x4 pose matrices.
//!
//! Euler angles follow the Z-Y-X (yaw, pitch, roll) Tait-Bryan convention in
//! degrees, so `R = Rz(yaw) * Ry(pitch) * Rx(roll)`. Quaternions are `[w, x, y, z]`.

use crate::core::types::PoseMatrix;

/// Build a pose matrix from a position and yaw/pitch/roll in degrees.
///
/// # Example
/// ```
/// use tracking_osc::core::math::{pose_from_euler, to_euler};
///
/// let pose = pose_from_euler([1.0, 2.0, 3.0], 45.0, 10.0, -20.0);
/// let [yaw, pitch, roll] = to_euler(&pose);
/// assert!((yaw - 45.0).abs() < 1e-3);
/// assert!((pitch - 10.0).abs() < 1e-3);
/// assert!((roll + 20.0).abs() < 1e-3);
/// ```
pub fn pose_from_euler(position: [f32; 3], yaw: f32, pitch: f32, roll: f32) -> PoseMatrix {
    let (sy, cy) = yaw.to_radians().sin_cos();
    let (sp, cp) = pitch.to_radians().sin_cos();
    let (sr, cr) = roll.to_radians().sin_cos();
    let [x, y, z] = position;

    PoseMatrix([
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr, x],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr, y],
        [-sp, cp * sr, cp * cr, z],
    ])
}

/// Extract `[yaw, pitch, roll]` in degrees.
///
/// Pitch is clamped to ±90° so slightly non-orthonormal matrices from the
/// driver never produce NaN.
#[inline]
pub fn to_euler(pose: &PoseMatrix) -> [f32; 3] {
    let m = &pose.0;
    let yaw = m[1][0].atan2(m[0][0]);
    let pitch = (-m[2][0]).clamp(-1.0, 1.0).asin();
    let roll = m[2][1].atan2(m[2][2]);
    [yaw.to_degrees(), pitch.to_degrees(), roll.to_degrees()]
}

/// Extract a unit quaternion `[w, x, y, z]` with `w >= 0`.
///
/// Picks the largest diagonal term as pivot, which stays stable near
/// 180° rotations where the trace approaches -1.
pub fn to_quaternion(pose: &PoseMatrix) -> [f32; 4] {
    let m = &pose.0;
    let trace = m[0][0] + m[1][1] + m[2][2];

    let q = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        [
            0.25 * s,
            (m[2][1] - m[1][2]) / s,
            (m[0][2] - m[2][0]) / s,
            (m[1][0] - m[0][1]) / s,
        ]
    } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
        let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0;
        [
            (m[2][1] - m[1][2]) / s,
            0.25 * s,
            (m[0][1] + m[1][0]) / s,
            (m[0][2] + m[2][0]) / s,
        ]
    } else if m[1][1] > m[2][2] {
        let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0;
        [
            (m[0][2] - m[2][0]) / s,
            (m[0][1] + m[1][0]) / s,
            0.25 * s,
            (m[1][2] + m[2][1]) / s,
        ]
    } else {
        let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0;
        [
            (m[1][0] - m[0][1]) / s,
            (m[0][2] + m[2][0]) / s,
            (m[1][2] + m[2][1]) / s,
            0.25 * s,
        ]
    };

    let norm = q.iter().map(|v| v * v).sum::<f32>().sqrt();
    let sign = if q[0] < 0.0 { -1.0 } else { 1.0 };
    if norm > 0.0 {
        q.map(|v| sign * v / norm)
    } else {
        [1.0, 0.0, 0.0, 0.0]
    }
}
