// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat4` type and associated operations.

use super::{Vec3, Vec4, EPSILON};
use std::ops::Mul;

/// A 4x4 column-major matrix, used for 3D affine transformations.
///
/// This is the primary type for representing transformations (translation, rotation,
/// scale) in 3D space. It is also used for camera view and projection matrices.
/// The memory layout is column-major, which is compatible with modern graphics APIs.
/// All projection helpers build left-handed matrices with a [0, 1] depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4 {
            x: self.cols[0].get(index),
            y: self.cols[1].get(index),
            z: self.cols[2].get(index),
            w: self.cols[3].get(index),
        }
    }

    /// Creates a translation matrix.
    ///
    /// # Arguments
    ///
    /// * `v`: The translation vector to apply.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self {
            cols: [
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::new(0.0, 0.0, 1.0, 0.0),
                Vec4::new(v.x, v.y, v.z, 1.0),
            ],
        }
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            cols: [
                Vec4::new(scale.x, 0.0, 0.0, 0.0),
                Vec4::new(0.0, scale.y, 0.0, 0.0),
                Vec4::new(0.0, 0.0, scale.z, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, c, s, 0.0),
                Vec4::new(0.0, -s, c, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Creates a matrix for a rotation around the Y-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                Vec4::new(c, 0.0, -s, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::new(s, 0.0, c, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Creates a matrix for a rotation around the Z-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                Vec4::new(c, s, 0.0, 0.0),
                Vec4::new(-s, c, 0.0, 0.0),
                Vec4::new(0.0, 0.0, 1.0, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Creates a left-handed view matrix for a camera looking from `eye` towards `target`.
    ///
    /// # Arguments
    ///
    /// * `eye`: The position of the camera in world space.
    /// * `target`: The point in world space that the camera is looking at.
    /// * `up`: A vector indicating the "up" direction of the world (commonly `Vec3::Y`).
    ///
    /// # Returns
    ///
    /// Returns `Some(Mat4)` if a valid view matrix can be constructed, or `None` if
    /// `eye` and `target` are too close, or if `up` is parallel to the view direction.
    #[inline]
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = target - eye;
        if forward.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let f = forward.normalize();
        let s = up.cross(f);
        if s.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let s = s.normalize();
        let u = f.cross(s);

        Some(Self::from_cols(
            Vec4::new(s.x, u.x, f.x, 0.0),
            Vec4::new(s.y, u.y, f.y, 0.0),
            Vec4::new(s.z, u.z, f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), -eye.dot(f), 1.0),
        ))
    }

    /// Creates a left-handed perspective projection matrix with a [0, 1] depth range.
    ///
    /// # Arguments
    ///
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`: Distance to the near clipping plane (must be positive).
    /// * `z_far`: Distance to the far clipping plane (must be positive and > `z_near`).
    #[inline]
    pub fn perspective_fov_lh(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        assert!(z_near > 0.0 && z_far > z_near);
        let tan_half_fovy = (fov_y_radians / 2.0).tan();
        let h = 1.0 / tan_half_fovy;
        let w = h / aspect_ratio;
        let range = z_far / (z_far - z_near);

        Self::from_cols(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, 1.0),
            Vec4::new(0.0, 0.0, -range * z_near, 0.0),
        )
    }

    /// Creates a left-handed perspective projection with an infinitely distant far plane.
    ///
    /// Depth approaches 1.0 as z tends towards infinity, which avoids far-plane
    /// clipping for open scenes.
    ///
    /// # Arguments
    ///
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`: Distance to the near clipping plane (must be positive).
    #[inline]
    pub fn perspective_infinite_lh(fov_y_radians: f32, aspect_ratio: f32, z_near: f32) -> Self {
        assert!(z_near > 0.0);
        let tan_half_fovy = (fov_y_radians / 2.0).tan();
        let h = 1.0 / tan_half_fovy;
        let w = h / aspect_ratio;

        Self::from_cols(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            Vec4::new(0.0, 0.0, -z_near, 0.0),
        )
    }

    /// Creates a left-handed orthographic projection matrix centred on the origin.
    ///
    /// # Arguments
    ///
    /// * `width`: Width of the view volume.
    /// * `height`: Height of the view volume.
    /// * `z_near`: Distance to the near clipping plane.
    /// * `z_far`: Distance to the far clipping plane.
    #[inline]
    pub fn orthographic_lh(width: f32, height: f32, z_near: f32, z_far: f32) -> Self {
        let range = 1.0 / (z_far - z_near);

        Self::from_cols(
            Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, 0.0),
            Vec4::new(0.0, 0.0, -range * z_near, 1.0),
        )
    }

    /// Creates a left-handed orthographic projection matrix from explicit volume bounds.
    ///
    /// Useful for UI and 2D rendering where the origin is a screen corner rather
    /// than the centre of the view.
    #[inline]
    pub fn orthographic_off_center_lh(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let range = 1.0 / (z_far - z_near);

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, 0.0),
            Vec4::new(
                -(right + left) / rml,
                -(top + bottom) / tmb,
                -range * z_near,
                1.0,
            ),
        )
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }
}

impl Default for Mat4 {
    /// Returns `Mat4::IDENTITY`.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. Note that matrix multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result_cols = [Vec4::ZERO; 4];
        for (c_idx, target_col) in result_cols.iter_mut().enumerate() {
            let col_from_rhs = rhs.cols[c_idx];
            *target_col = Vec4 {
                x: self.get_row(0).dot(col_from_rhs),
                y: self.get_row(1).dot(col_from_rhs),
                z: self.get_row(2).dot(col_from_rhs),
                w: self.get_row(3).dot(col_from_rhs),
            };
        }
        Mat4 { cols: result_cols }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, PI};

    fn vec4_approx_eq(a: Vec4, b: Vec4) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    fn mat4_approx_eq(a: Mat4, b: Mat4) -> bool {
        vec4_approx_eq(a.cols[0], b.cols[0])
            && vec4_approx_eq(a.cols[1], b.cols[1])
            && vec4_approx_eq(a.cols[2], b.cols[2])
            && vec4_approx_eq(a.cols[3], b.cols[3])
    }

    #[test]
    fn test_identity_is_multiplicative_neutral() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);

        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0));
        assert!(mat4_approx_eq(m * Mat4::IDENTITY, m));
        assert!(mat4_approx_eq(Mat4::IDENTITY * m, m));
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let m = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let point = Vec4::new(1.0, 2.0, 3.0, 1.0);
        let direction = Vec4::new(1.0, 2.0, 3.0, 0.0);

        assert!(vec4_approx_eq(m * point, Vec4::new(11.0, 22.0, 33.0, 1.0)));
        assert!(vec4_approx_eq(m * direction, direction));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Mat4::from_rotation_z(PI / 2.0);
        let rotated = m * Vec4::X;
        assert!(vec4_approx_eq(rotated, Vec4::Y));
    }

    #[test]
    fn test_transpose_is_involutive() {
        let m = Mat4::from_cols(
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::new(5.0, 6.0, 7.0, 8.0),
            Vec4::new(9.0, 10.0, 11.0, 12.0),
            Vec4::new(13.0, 14.0, 15.0, 16.0),
        );
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().get_row(0), m.cols[0]);
    }

    #[test]
    fn test_look_at_lh_maps_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let view = Mat4::look_at_lh(eye, Vec3::ZERO, Vec3::Y).unwrap();

        let eye_view = view * eye.extend(1.0);
        assert!(vec4_approx_eq(eye_view, Vec4::W));

        // The target sits on the positive Z-axis in LH view space.
        let target_view = view * Vec4::W;
        assert!(approx_eq(target_view.x, 0.0));
        assert!(approx_eq(target_view.y, 0.0));
        assert!(target_view.z > 0.0);
    }

    #[test]
    fn test_look_at_lh_rejects_degenerate_input() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        assert!(Mat4::look_at_lh(eye, eye, Vec3::Y).is_none());
        assert!(Mat4::look_at_lh(Vec3::ZERO, Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn test_perspective_fov_lh_depth_range() {
        let proj = Mat4::perspective_fov_lh(PI / 2.0, 1.0, 0.1, 100.0);

        let near = proj * Vec4::new(0.0, 0.0, 0.1, 1.0);
        assert!(approx_eq(near.z / near.w, 0.0));

        let far = proj * Vec4::new(0.0, 0.0, 100.0, 1.0);
        assert!(approx_eq(far.z / far.w, 1.0));
    }

    #[test]
    fn test_perspective_infinite_lh_depth_approaches_one() {
        let proj = Mat4::perspective_infinite_lh(PI / 2.0, 1.0, 0.1);

        let near = proj * Vec4::new(0.0, 0.0, 0.1, 1.0);
        assert!(approx_eq(near.z / near.w, 0.0));

        let distant = proj * Vec4::new(0.0, 0.0, 1.0e6, 1.0);
        let depth = distant.z / distant.w;
        assert!(depth > 0.999 && depth <= 1.0);
    }

    #[test]
    fn test_orthographic_lh_maps_volume_to_clip_space() {
        let proj = Mat4::orthographic_lh(8.0, 6.0, 0.0, 10.0);

        let corner = proj * Vec4::new(4.0, 3.0, 10.0, 1.0);
        assert!(vec4_approx_eq(corner, Vec4::new(1.0, 1.0, 1.0, 1.0)));

        let origin = proj * Vec4::W;
        assert!(vec4_approx_eq(origin, Vec4::W));
    }

    #[test]
    fn test_orthographic_off_center_lh_screen_origin() {
        // Typical UI setup: x right, y up, origin at the bottom-left corner.
        let proj = Mat4::orthographic_off_center_lh(0.0, 800.0, 0.0, 600.0, 0.0, 1.0);

        let bottom_left = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(vec4_approx_eq(bottom_left, Vec4::new(-1.0, -1.0, 0.0, 1.0)));

        let top_right = proj * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!(vec4_approx_eq(top_right, Vec4::new(1.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_mul_composes_right_to_left() {
        let translate = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let scale = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));

        // Scale first, then translate.
        let combined = translate * scale;
        let p = combined * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(vec4_approx_eq(p, Vec4::new(3.0, 0.0, 0.0, 1.0)));
    }
}
