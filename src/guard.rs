//! Numeric guard for points entering or leaving the simulation.
//!
//! Every position the engine stores, renders or spawns from passes through
//! [`is_valid`]. Invalid values are never propagated as errors; callers
//! either skip the work for this frame or fall back to [`DEFAULT_SEED`].

use glam::Vec3;

/// Seed used whenever a requested spawn point is unusable.
pub const DEFAULT_SEED: Vec3 = Vec3::new(0.1, 0.1, 0.1);

/// Returns `true` when every coordinate is finite and the point lies within
/// `max_radius` of the origin.
#[inline]
pub fn is_valid(point: Vec3, max_radius: f32) -> bool {
    point.is_finite() && point.length() <= max_radius
}

/// Returns `point` if it passes [`is_valid`], otherwise [`DEFAULT_SEED`].
#[inline]
pub fn sanitize(point: Vec3, max_radius: f32) -> Vec3 {
    if is_valid(point, max_radius) {
        point
    } else {
        DEFAULT_SEED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_point_inside_radius() {
        assert!(is_valid(Vec3::new(1.0, -2.0, 3.0), 10.0));
        assert!(is_valid(Vec3::ZERO, 0.0));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(!is_valid(Vec3::new(f32::NAN, 0.0, 0.0), 10.0));
        assert!(!is_valid(Vec3::new(0.0, f32::INFINITY, 0.0), 10.0));
        assert!(!is_valid(Vec3::new(0.0, 0.0, f32::NEG_INFINITY), 10.0));
    }

    #[test]
    fn test_rejects_out_of_radius() {
        assert!(!is_valid(Vec3::new(10.0, 10.0, 0.0), 10.0));
        // Exactly on the boundary is still accepted
        assert!(is_valid(Vec3::new(10.0, 0.0, 0.0), 10.0));
    }

    #[test]
    fn test_sanitize_falls_back_to_default_seed() {
        assert_eq!(sanitize(Vec3::splat(f32::NAN), 10.0), DEFAULT_SEED);
        assert_eq!(sanitize(Vec3::splat(100.0), 10.0), DEFAULT_SEED);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(sanitize(p, 10.0), p);
    }
}
