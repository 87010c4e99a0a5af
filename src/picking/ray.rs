//! Picking rays: un-projection from screen space and the view → local
//! transform chain.
//!
//! Matrices follow glam's column-vector convention, so the chain
//! `inverse_world * inverse_view` applied to a column vector is the same
//! mapping as the row-vector product `p * inverse_view * inverse_world`.

use std::fmt;

use glam::{Mat4, Vec2, Vec3};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-12;

/// Reasons a pick request is rejected before any intersection test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    /// Screen coordinate was NaN or infinite.
    NonFiniteScreenPoint,
    /// Viewport has a zero dimension.
    EmptyViewport,
    /// Projection matrix has a zero or non-finite focal term.
    DegenerateProjection,
    /// View or world matrix cannot be inverted.
    SingularTransform,
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteScreenPoint => {
                write!(f, "screen coordinate is not finite")
            }
            Self::EmptyViewport => write!(f, "viewport has zero size"),
            Self::DegenerateProjection => {
                write!(f, "projection matrix has a zero focal term")
            }
            Self::SingularTransform => {
                write!(f, "transform matrix is not invertible")
            }
        }
    }
}

impl std::error::Error for PickError {}

/// A half-line `origin + t * direction`, `t > 0`.
///
/// `direction` is not required to be unit length; the `t` reported by
/// the intersector is measured in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction (non-zero).
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// View-space ray through pixel `screen` of a `viewport`-sized target.
    ///
    /// The eye sits at the view-space origin looking down +Z (left-handed,
    /// as built by [`Mat4::perspective_lh`]). Only the focal terms
    /// `P[0][0]` and `P[1][1]` of the projection are used, so the result
    /// assumes a symmetric perspective frustum:
    ///
    /// ```text
    /// vx = (+2 sx / w - 1) / P[0][0]
    /// vy = (-2 sy / h + 1) / P[1][1]
    /// ```
    ///
    /// # Errors
    ///
    /// [`PickError::NonFiniteScreenPoint`], [`PickError::EmptyViewport`] or
    /// [`PickError::DegenerateProjection`] when the inputs cannot produce a
    /// finite ray.
    pub fn from_screen(
        screen: Vec2,
        viewport: (u32, u32),
        projection: &Mat4,
    ) -> Result<Self, PickError> {
        if !screen.is_finite() {
            return Err(PickError::NonFiniteScreenPoint);
        }
        let (width, height) = viewport;
        if width == 0 || height == 0 {
            return Err(PickError::EmptyViewport);
        }

        let focal_x = projection.x_axis.x;
        let focal_y = projection.y_axis.y;
        if !focal_x.is_finite()
            || !focal_y.is_finite()
            || focal_x == 0.0
            || focal_y == 0.0
        {
            return Err(PickError::DegenerateProjection);
        }

        let vx = (2.0 * screen.x / width as f32 - 1.0) / focal_x;
        let vy = (-2.0 * screen.y / height as f32 + 1.0) / focal_y;

        Ok(Self {
            origin: Vec3::ZERO,
            direction: Vec3::new(vx, vy, 1.0),
        })
    }

    /// Map the ray through `m`: origin as a point, direction as a vector.
    #[must_use]
    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }

    /// Carry a view-space ray into an object's local space.
    ///
    /// With `normalize` unset the direction keeps whatever scale the world
    /// matrix bakes in, so hit parameters are only comparable within the
    /// same object. With it set, `t` is a Euclidean distance in local
    /// units.
    #[must_use]
    pub fn to_local(
        &self,
        inverse_view: &Mat4,
        inverse_world: &Mat4,
        normalize: bool,
    ) -> Self {
        let local = self.transform(&(*inverse_world * *inverse_view));
        if normalize {
            Self {
                origin: local.origin,
                direction: local.direction.normalize_or_zero(),
            }
        } else {
            local
        }
    }
}

/// Inverse of `m`, or [`PickError::SingularTransform`] when `m` has no
/// usable inverse.
///
/// # Errors
///
/// Returns [`PickError::SingularTransform`] for a (near-)zero or
/// non-finite determinant.
pub fn checked_inverse(m: &Mat4) -> Result<Mat4, PickError> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Err(PickError::SingularTransform);
    }
    Ok(m.inverse())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use glam::{Quat, Vec4Swizzles};

    use super::*;

    const TOL: f32 = 1e-5;

    fn proj(aspect: f32) -> Mat4 {
        Mat4::perspective_lh(FRAC_PI_4, aspect, 1.0, 1000.0)
    }

    #[test]
    fn center_pixel_looks_down_view_axis() {
        for (w, h) in [(800, 600), (1920, 1080), (640, 640), (3, 7)] {
            let p = proj(w as f32 / h as f32);
            let center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
            let ray = Ray::from_screen(center, (w, h), &p).unwrap();
            assert_eq!(ray.origin, Vec3::ZERO);
            assert!(ray.direction.abs_diff_eq(Vec3::Z, TOL));
        }
    }

    #[test]
    fn corners_reproject_to_ndc_corners() {
        let (w, h) = (800_u32, 600_u32);
        let p = proj(w as f32 / h as f32);

        let top_left = Ray::from_screen(Vec2::ZERO, (w, h), &p).unwrap();
        let ndc = p.project_point3(top_left.at(10.0));
        assert!((ndc.x + 1.0).abs() < TOL);
        assert!((ndc.y - 1.0).abs() < TOL);

        let bottom_right =
            Ray::from_screen(Vec2::new(w as f32, h as f32), (w, h), &p).unwrap();
        let ndc = p.project_point3(bottom_right.at(10.0));
        assert!((ndc.x - 1.0).abs() < TOL);
        assert!((ndc.y + 1.0).abs() < TOL);
    }

    #[test]
    fn direction_has_unit_z() {
        let p = proj(1.5);
        let ray = Ray::from_screen(Vec2::new(17.0, 401.0), (900, 600), &p).unwrap();
        assert_eq!(ray.direction.z, 1.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let p = proj(1.0);
        assert_eq!(
            Ray::from_screen(Vec2::new(f32::NAN, 0.0), (10, 10), &p),
            Err(PickError::NonFiniteScreenPoint)
        );
        assert_eq!(
            Ray::from_screen(Vec2::new(0.0, f32::INFINITY), (10, 10), &p),
            Err(PickError::NonFiniteScreenPoint)
        );
        assert_eq!(
            Ray::from_screen(Vec2::ZERO, (0, 10), &p),
            Err(PickError::EmptyViewport)
        );
        assert_eq!(
            Ray::from_screen(Vec2::ZERO, (10, 10), &Mat4::ZERO),
            Err(PickError::DegenerateProjection)
        );
    }

    #[test]
    fn transform_treats_origin_as_point_and_direction_as_vector() {
        let m = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).transform(&m);
        assert_eq!(ray.origin, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn local_chain_matches_world_round_trip() {
        let view = Mat4::look_to_lh(Vec3::new(1.0, 2.0, -8.0), Vec3::Z, Vec3::Y);
        let world = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.5),
            Quat::from_rotation_y(0.3),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let inv_view = checked_inverse(&view).unwrap();
        let inv_world = checked_inverse(&world).unwrap();

        let view_ray = Ray::new(Vec3::ZERO, Vec3::new(0.1, -0.2, 1.0));
        let local = view_ray.to_local(&inv_view, &inv_world, false);

        // Walking the local ray and mapping back to view space must land
        // on the view-space ray.
        let local_point = local.at(3.0);
        let back = (view * world).transform_point3(local_point);
        assert!(back.abs_diff_eq(view_ray.at(3.0), 1e-4));

        // Composition order: world^-1 applied after view^-1.
        let expected_origin = (inv_world * inv_view.w_axis).xyz();
        assert!(local.origin.abs_diff_eq(expected_origin, 1e-5));
    }

    #[test]
    fn normalized_local_direction_measures_local_distance() {
        let world = Mat4::from_scale(Vec3::splat(0.5));
        let inv_world = checked_inverse(&world).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let raw = ray.to_local(&Mat4::IDENTITY, &inv_world, false);
        assert!((raw.direction.length() - 2.0).abs() < TOL);

        let unit = ray.to_local(&Mat4::IDENTITY, &inv_world, true);
        assert!((unit.direction.length() - 1.0).abs() < TOL);
        assert_eq!(unit.origin, raw.origin);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(checked_inverse(&flat), Err(PickError::SingularTransform));
        assert!(checked_inverse(&Mat4::IDENTITY).is_ok());
    }
}
