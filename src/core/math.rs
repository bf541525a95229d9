// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp a normalized value into [0, 1]
pub fn clamp01(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of `lerp`: where `value` sits between `a` and `b`.
/// A degenerate span returns 0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    let span = b - a;
    if span.abs() <= f32::EPSILON {
        0.0
    } else {
        (value - a) / span
    }
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Whether `value` lies in the closed interval [start, end]
pub fn in_window(value: f32, start: f32, end: f32) -> bool {
    value >= start && value <= end
}

/// Rotate `from` toward `to` by at most `max_radians`, returning a unit vector.
/// Zero-length targets leave the direction unchanged.
pub fn rotate_towards(from: Vec2, to: Vec2, max_radians: f32) -> Vec2 {
    let Some(target) = to.try_normalize() else {
        return from;
    };
    let current = from.try_normalize().unwrap_or(target);
    let angle = current.angle_between(target);
    if angle.abs() <= max_radians {
        return target;
    }
    let step = max_radians.copysign(angle);
    Vec2::from_angle(step).rotate(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(1.7), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 2.5), 0.25);
        assert_eq!(inverse_lerp(3.0, 3.0, 7.0), 0.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }

    #[test]
    fn test_in_window_is_inclusive() {
        assert!(in_window(0.25, 0.25, 0.45));
        assert!(in_window(0.45, 0.25, 0.45));
        assert!(!in_window(0.46, 0.25, 0.45));
    }

    #[test]
    fn test_rotate_towards_caps_step() {
        let result = rotate_towards(Vec2::X, Vec2::Y, 0.1);
        assert_abs_diff_eq!(Vec2::X.angle_between(result), 0.1, epsilon = 1e-5);

        let snapped = rotate_towards(Vec2::X, Vec2::Y, 3.0);
        assert_abs_diff_eq!(snapped.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(snapped.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_towards_zero_target() {
        assert_eq!(rotate_towards(Vec2::X, Vec2::ZERO, 1.0), Vec2::X);
    }
}
