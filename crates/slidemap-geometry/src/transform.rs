//! Affine transforms and per-shape transform resolution.
//!
//! Every shape maps its local coordinate space into its parent's space
//! through one 3×3 homogeneous matrix derived from its stored `xfrm`
//! (ECMA-376 Part 1, L.4.7.6). `a * b` applies `b` first, so a leaf's world
//! transform is `outermost * … * innermost * leaf`.

use std::f64::consts::PI;
use std::ops::Mul;

use nalgebra::Matrix3;

use crate::model::{Point, Size, Xfrm};

/// A 2D affine transform over homogeneous coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_matrix(Matrix3::new(
            1.0, 0.0, tx, //
            0.0, 1.0, ty, //
            0.0, 0.0, 1.0,
        ))
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_matrix(Matrix3::new(
            sx, 0.0, 0.0, //
            0.0, sy, 0.0, //
            0.0, 0.0, 1.0,
        ))
    }

    /// Rotation by `theta` radians about the origin.
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::from_matrix(Matrix3::new(
            cos, -sin, 0.0, //
            sin, cos, 0.0, //
            0.0, 0.0, 1.0,
        ))
    }

    /// Rotation by `theta` radians about `center`.
    pub fn rotation_about(center: Point, theta: f64) -> Self {
        Self::translation(center.x, center.y)
            * Self::rotation(theta)
            * Self::translation(-center.x, -center.y)
    }

    /// `self` followed by `outer`.
    pub fn then(&self, outer: &AffineTransform) -> AffineTransform {
        *outer * *self
    }

    pub fn apply(&self, p: Point) -> Point {
        let m = &self.matrix;
        Point::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
        )
    }

    pub fn inverse(&self) -> Option<AffineTransform> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    /// Coefficients `(a, b, c, d, e, f)` as used by SVG `matrix(…)`.
    pub fn svg_matrix(&self) -> [f64; 6] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)],
        ]
    }

    pub fn approx_eq(&self, other: &AffineTransform, epsilon: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Resolve a shape's local-to-parent transform from its `xfrm`.
    ///
    /// `bbox` overrides the shape extent as the local coordinate box, used
    /// when a path definition declares its own size. A group's child extent
    /// takes precedence over both. A zero-sized local axis maps with unit
    /// scale onto the placed offset.
    pub fn from_xfrm(xfrm: &Xfrm, bbox: Option<Size>) -> Self {
        let child_offset = xfrm.child_offset.unwrap_or_default();
        let child_extent = xfrm.child_extent.or(bbox).unwrap_or(xfrm.extent);
        let offset = xfrm.offset;
        let extent = xfrm.extent;

        let (sx, tx) = axis_map(child_offset.x, child_extent.width, offset.x, extent.width);
        let (sy, ty) = axis_map(child_offset.y, child_extent.height, offset.y, extent.height);
        let scale_translate = Self::from_matrix(Matrix3::new(
            sx, 0.0, tx, //
            0.0, sy, ty, //
            0.0, 0.0, 1.0,
        ));

        let center_x = offset.x + extent.width / 2.0;
        let center_y = offset.y + extent.height / 2.0;
        let to_center = Self::translation(-center_x, -center_y);
        let from_center = Self::translation(center_x, center_y);
        let rotate = Self::rotation(xfrm.rotation * PI / 180.0);
        let flip = Self::scale(
            if xfrm.flip_h { -1.0 } else { 1.0 },
            if xfrm.flip_v { -1.0 } else { 1.0 },
        );

        from_center * rotate * flip * to_center * scale_translate
    }
}

/// Scale and translation for one axis of the local-to-placed mapping.
fn axis_map(local_offset: f64, local_extent: f64, offset: f64, extent: f64) -> (f64, f64) {
    if local_extent == 0.0 {
        (1.0, offset)
    } else {
        let scale = extent / local_extent;
        (scale, offset - scale * local_offset)
    }
}

impl Mul for AffineTransform {
    type Output = AffineTransform;

    fn mul(self, rhs: AffineTransform) -> AffineTransform {
        AffineTransform::from_matrix(self.matrix * rhs.matrix)
    }
}
