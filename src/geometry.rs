//! Vector primitives shared by bond perception, path annotation, and repositioning.
//!
//! Every function here is pure. Degenerate inputs (zero-length vectors, coincident points)
//! never produce `NaN`: `normalize` hands the input back untouched, `angle` reports `0.0`,
//! and `rotation_matrix` falls back to the identity.

use crate::model::types::{Point, Vector};
use nalgebra::Matrix3;

/// 3×3 rotation matrix applied to column vectors.
pub type RotationMatrix = Matrix3<f64>;

/// Tolerance on the cosine between two unit vectors when testing for (anti-)alignment.
pub const ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Euclidean distance between two points in ångströms.
pub fn distance(p: &Point, q: &Point) -> f64 {
    nalgebra::distance(p, q)
}

/// Scales `v` to unit length.
///
/// A zero vector has no direction, so it is returned unchanged instead of being divided by
/// zero.
pub fn normalize(v: &Vector) -> Vector {
    let magnitude = v.norm();
    if magnitude == 0.0 { *v } else { v / magnitude }
}

pub fn dot(a: &Vector, b: &Vector) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector, b: &Vector) -> Vector {
    a.cross(b)
}

/// Angle at `vertex` between the rays toward `a` and `b`, in degrees.
///
/// The cosine is clamped to `[-1, 1]` before the inverse cosine so rounding noise on
/// (anti-)collinear points cannot leave the domain of `acos`. When either ray has zero
/// length the angle is undefined and `0.0` is returned.
///
/// # Arguments
///
/// * `a` - End point of the first ray.
/// * `vertex` - Shared origin of both rays.
/// * `b` - End point of the second ray.
///
/// # Returns
///
/// The angle in degrees, always within `[0, 180]`.
pub fn angle(a: &Point, vertex: &Point, b: &Point) -> f64 {
    let v1 = a - vertex;
    let v2 = b - vertex;

    let denominator = v1.norm() * v2.norm();
    if denominator == 0.0 {
        return 0.0;
    }

    let cosine = (dot(&v1, &v2) / denominator).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}

/// Builds the rotation that carries the direction of `from` onto the direction of `to`.
///
/// Both inputs are normalized first, so only their directions matter. Three cases are
/// distinguished by the cosine between the unit vectors:
///
/// 1. Already aligned: the identity.
/// 2. Anti-parallel: the cross product vanishes, so a helper axis is taken orthogonal to
///    `from` (world X, or world Y when `from` lies close to X) and the half-turn
///    `2·axis·axisᵗ − I` about it is returned.
/// 3. Otherwise: Rodrigues' formula about `normalize(from × to)`, written out from
///    `cos θ` and `sin θ = √(1 − cos²θ)` without any inverse trigonometry.
///
/// A zero-length `from` or `to` carries no direction and yields the identity.
///
/// # Returns
///
/// A [`RotationMatrix`] `R` such that `R · normalize(from) ≈ normalize(to)`.
pub fn rotation_matrix(from: &Vector, to: &Vector) -> RotationMatrix {
    let from = normalize(from);
    let to = normalize(to);

    if from.norm() == 0.0 || to.norm() == 0.0 {
        return RotationMatrix::identity();
    }

    let cos_theta = dot(&from, &to);

    if (cos_theta - 1.0).abs() < ALIGNMENT_TOLERANCE {
        return RotationMatrix::identity();
    }

    if (cos_theta + 1.0).abs() < ALIGNMENT_TOLERANCE {
        let helper = if from.x.abs() < 0.9 {
            Vector::x()
        } else {
            Vector::y()
        };
        let axis = normalize(&cross(&from, &helper));
        return 2.0 * axis * axis.transpose() - RotationMatrix::identity();
    }

    let axis = normalize(&cross(&from, &to));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let one_minus_cos = 1.0 - cos_theta;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    RotationMatrix::new(
        cos_theta + x * x * one_minus_cos,
        x * y * one_minus_cos - z * sin_theta,
        x * z * one_minus_cos + y * sin_theta,
        y * x * one_minus_cos + z * sin_theta,
        cos_theta + y * y * one_minus_cos,
        y * z * one_minus_cos - x * sin_theta,
        z * x * one_minus_cos - y * sin_theta,
        z * y * one_minus_cos + x * sin_theta,
        cos_theta + z * z * one_minus_cos,
    )
}

/// Rotates `point` by `rotation` about `pivot` (translate, rotate, translate back).
pub fn rotate_about_pivot(point: &Point, rotation: &RotationMatrix, pivot: &Point) -> Point {
    pivot + rotation * (point - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vector_close(actual: &Vector, expected: &Vector, tolerance: f64) {
        assert!(
            (actual - expected).norm() < tolerance,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn sample_directions() -> Vec<Vector> {
        vec![
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.0, 1.0, 0.0),
            Vector::new(0.0, 0.0, 1.0),
            Vector::new(0.0, 0.0, -1.0),
            Vector::new(-1.0, 0.0, 0.0),
            Vector::new(1.0, 2.0, 3.0),
            Vector::new(-4.5, 0.25, 2.0),
            Vector::new(0.3, -7.0, -0.01),
            Vector::new(1e-3, 1e-3, 5.0),
        ]
    }

    #[test]
    fn distance_matches_pythagorean_triple() {
        let d = distance(&Point::new(0.0, 0.0, 0.0), &Point::new(3.0, 4.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_returns_unit_vector() {
        let n = normalize(&Vector::new(0.0, 3.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert_vector_close(&n, &Vector::new(0.0, 0.6, 0.8), 1e-12);
    }

    #[test]
    fn normalize_leaves_zero_vector_unchanged() {
        let zero = Vector::zeros();
        assert_eq!(normalize(&zero), zero);
    }

    #[test]
    fn dot_and_cross_follow_standard_definitions() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(4.0, 5.0, 6.0);
        assert!((dot(&a, &b) - 32.0).abs() < 1e-12);
        assert_vector_close(&cross(&a, &b), &Vector::new(-3.0, 6.0, -3.0), 1e-12);
    }

    #[test]
    fn angle_of_right_angle_is_ninety_degrees() {
        let value = angle(
            &Point::new(1.0, 0.0, 0.0),
            &Point::new(0.0, 0.0, 0.0),
            &Point::new(0.0, 1.0, 0.0),
        );
        assert!((value - 90.0).abs() < 1e-3);
    }

    #[test]
    fn angle_of_collinear_points_is_one_eighty_degrees() {
        let value = angle(
            &Point::new(1.0, 1.0, 1.0),
            &Point::new(2.0, 2.0, 2.0),
            &Point::new(3.0, 3.0, 3.0),
        );
        assert!((value - 180.0).abs() < 1e-3);
    }

    #[test]
    fn angle_with_coincident_points_is_zero_not_nan() {
        let p = Point::new(1.0, 2.0, 3.0);
        let value = angle(&p, &p, &Point::new(0.0, 0.0, 0.0));
        assert_eq!(value, 0.0);
    }

    #[test]
    fn angle_stays_within_bounds() {
        let vertex = Point::new(0.2, -0.1, 0.4);
        for a in sample_directions() {
            for b in sample_directions() {
                let value = angle(&(vertex + a), &vertex, &(vertex + b));
                assert!((0.0..=180.0).contains(&value), "angle {} out of range", value);
            }
        }
    }

    #[test]
    fn rotation_matrix_for_identical_vectors_is_identity() {
        for v in sample_directions() {
            let r = rotation_matrix(&v, &v);
            let point = Vector::new(1.5, -2.0, 0.75);
            assert_vector_close(&(r * point), &point, 1e-9);
        }
    }

    #[test]
    fn rotation_matrix_aligns_from_onto_to() {
        for from in sample_directions() {
            for to in sample_directions() {
                let cosine = dot(&normalize(&from), &normalize(&to));
                if (cosine.abs() - 1.0).abs() < ALIGNMENT_TOLERANCE {
                    continue;
                }
                let r = rotation_matrix(&from, &to);
                assert_vector_close(&(r * normalize(&from)), &normalize(&to), 1e-4);
            }
        }
    }

    #[test]
    fn rotation_matrix_treats_near_aligned_vectors_as_aligned() {
        let from = Vector::new(1e-3, 1e-3, 5.0);
        let to = Vector::new(0.0, 0.0, 1.0);
        assert!((dot(&normalize(&from), &to) - 1.0).abs() < ALIGNMENT_TOLERANCE);

        assert_eq!(rotation_matrix(&from, &to), RotationMatrix::identity());
    }

    #[test]
    fn rotation_matrix_handles_antiparallel_vectors() {
        let from = Vector::new(0.0, 0.0, 1.0);
        let to = Vector::new(0.0, 0.0, -1.0);
        let r = rotation_matrix(&from, &to);

        let once = r * from;
        assert_vector_close(&once, &to, 1e-4);

        let twice = r * once;
        assert_vector_close(&twice, &from, 1e-4);
    }

    #[test]
    fn rotation_matrix_antiparallel_along_x_uses_y_helper() {
        let from = Vector::new(1.0, 0.0, 0.0);
        let to = Vector::new(-1.0, 0.0, 0.0);
        let r = rotation_matrix(&from, &to);

        assert_vector_close(&(r * from), &to, 1e-9);
        assert!((r.determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_matrix_is_orthonormal_with_unit_determinant() {
        for from in sample_directions() {
            for to in sample_directions() {
                let r = rotation_matrix(&from, &to);
                let should_be_identity = r * r.transpose();
                assert!((should_be_identity - RotationMatrix::identity()).norm() < 1e-9);
                assert!((r.determinant() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn rotation_matrix_ignores_input_magnitude() {
        let a = rotation_matrix(&Vector::new(0.0, 2.0, 0.0), &Vector::new(0.0, 0.0, 10.0));
        let b = rotation_matrix(&Vector::new(0.0, 1.0, 0.0), &Vector::new(0.0, 0.0, 1.0));
        assert!((a - b).norm() < 1e-12);
    }

    #[test]
    fn rotation_matrix_with_zero_vector_is_identity() {
        let r = rotation_matrix(&Vector::zeros(), &Vector::new(1.0, 0.0, 0.0));
        assert_eq!(r, RotationMatrix::identity());

        let r = rotation_matrix(&Vector::new(1.0, 0.0, 0.0), &Vector::zeros());
        assert_eq!(r, RotationMatrix::identity());
    }

    #[test]
    fn rotate_about_pivot_keeps_pivot_fixed() {
        let pivot = Point::new(1.0, 1.0, 1.0);
        let r = rotation_matrix(&Vector::new(1.0, 0.0, 0.0), &Vector::new(0.0, 1.0, 0.0));

        let moved = rotate_about_pivot(&pivot, &r, &pivot);
        assert!((moved - pivot).norm() < 1e-12);

        let moved = rotate_about_pivot(&Point::new(2.0, 1.0, 1.0), &r, &pivot);
        assert!((moved - Point::new(1.0, 2.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn rotate_about_pivot_preserves_distance_to_pivot() {
        let pivot = Point::new(-3.0, 0.5, 2.0);
        let point = Point::new(4.0, -1.0, 0.0);
        for from in sample_directions() {
            for to in sample_directions() {
                let r = rotation_matrix(&from, &to);
                let moved = rotate_about_pivot(&point, &r, &pivot);
                assert!((distance(&moved, &pivot) - distance(&point, &pivot)).abs() < 1e-9);
            }
        }
    }
}
