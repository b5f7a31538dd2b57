// extensions/easing.rs
//
// Easing curves for tweens. Pure math, no scene access.

use std::f32::consts::PI;

/// Easing curve mapping normalized time to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Slow start and end.
    Smoothstep,
    SmoothstepSquared,
    SmoothstepCubed,
    /// Slow start.
    Acceleration,
    AccelerationCubed,
    /// Slow end.
    Deceleration,
    DecelerationCubed,
    /// Sine wave, fast start.
    Sine,
    SineSquared,
    SineCubed,
    /// Mirrored sine, slow start.
    InverseSine,
    InverseSineSquared,
    InverseSineCubed,
    /// Catmull-Rom segment between `p1` and `p2`, shaped by `p0` and `p3`.
    Spline { p0: f32, p1: f32, p2: f32, p3: f32 },
    /// Cubic Bezier through control values `a..d`.
    Bezier { a: f32, b: f32, c: f32, d: f32 },
}

impl Easing {
    /// Spline from 0 to 1. A `start` above 1 pulls back first, a negative
    /// `end` overshoots the target before settling.
    pub fn bounce(start: f32, end: f32) -> Self {
        Easing::Spline { p0: start, p1: 0.0, p2: 1.0, p3: end }
    }

    /// Parse a curve by its camelCase name, e.g. `"smoothstep"` or
    /// `"inverseSineCubed"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let easing = match name {
            "linear" => Easing::Linear,
            "smoothstep" => Easing::Smoothstep,
            "smoothstepSquared" => Easing::SmoothstepSquared,
            "smoothstepCubed" => Easing::SmoothstepCubed,
            "acceleration" => Easing::Acceleration,
            "accelerationCubed" => Easing::AccelerationCubed,
            "deceleration" => Easing::Deceleration,
            "decelerationCubed" => Easing::DecelerationCubed,
            "sine" => Easing::Sine,
            "sineSquared" => Easing::SineSquared,
            "sineCubed" => Easing::SineCubed,
            "inverseSine" => Easing::InverseSine,
            "inverseSineSquared" => Easing::InverseSineSquared,
            "inverseSineCubed" => Easing::InverseSineCubed,
            _ => return None,
        };
        Some(easing)
    }

    /// Apply the curve to `t`, clamped to [0, 1]. Named curves map 0 to 0
    /// and 1 to 1; splines and beziers may leave that range.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::Smoothstep => smoothstep(t),
            Easing::SmoothstepSquared => smoothstep(t).powi(2),
            Easing::SmoothstepCubed => smoothstep(t).powi(3),

            Easing::Acceleration => t * t,
            Easing::AccelerationCubed => t * t * t,
            Easing::Deceleration => 1.0 - (1.0 - t).powi(2),
            Easing::DecelerationCubed => 1.0 - (1.0 - t).powi(3),

            Easing::Sine => (t * PI / 2.0).sin(),
            Easing::SineSquared => (t * PI / 2.0).sin().powi(2),
            Easing::SineCubed => (t * PI / 2.0).sin().powi(3),
            Easing::InverseSine => 1.0 - ((1.0 - t) * PI / 2.0).sin(),
            Easing::InverseSineSquared => 1.0 - ((1.0 - t) * PI / 2.0).sin().powi(2),
            Easing::InverseSineCubed => 1.0 - ((1.0 - t) * PI / 2.0).sin().powi(3),

            Easing::Spline { p0, p1, p2, p3 } => spline(t, p0, p1, p2, p3),
            Easing::Bezier { a, b, c, d } => cubic_bezier(t, a, b, c, d),
        }
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Catmull-Rom spline value at `t` between `p1` and `p2`.
#[inline]
pub fn spline(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Cubic Bezier value at `t` for control values `a..d`.
#[inline]
pub fn cubic_bezier(t: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * a + 3.0 * u * u * t * b + 3.0 * u * t * t * c + t * t * t * d
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: [Easing; 14] = [
        Easing::Linear,
        Easing::Smoothstep,
        Easing::SmoothstepSquared,
        Easing::SmoothstepCubed,
        Easing::Acceleration,
        Easing::AccelerationCubed,
        Easing::Deceleration,
        Easing::DecelerationCubed,
        Easing::Sine,
        Easing::SineSquared,
        Easing::SineCubed,
        Easing::InverseSine,
        Easing::InverseSineSquared,
        Easing::InverseSineCubed,
    ];

    #[test]
    fn named_curves_hit_endpoints() {
        for easing in NAMED {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", easing);
        }
    }

    #[test]
    fn named_curves_are_monotonic() {
        for easing in NAMED {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev, "{:?} decreased at step {}", easing, i);
                assert!(v <= 1.0 + 1e-6);
                prev = v;
            }
        }
    }

    #[test]
    fn acceleration_and_deceleration_shapes() {
        assert!(Easing::Acceleration.apply(0.5) < 0.5);
        assert!(Easing::Deceleration.apply(0.5) > 0.5);
        assert!((Easing::Smoothstep.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn from_name_parses_camel_case() {
        assert_eq!(Easing::from_name("smoothstep"), Some(Easing::Smoothstep));
        assert_eq!(Easing::from_name("inverseSineCubed"), Some(Easing::InverseSineCubed));
        assert_eq!(Easing::from_name("bogus"), None);
    }

    #[test]
    fn bounce_spline_overshoots() {
        let easing = Easing::bounce(10.0, -10.0);
        assert!(easing.apply(0.0).abs() < 1e-6);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        assert!(easing.apply(0.1) < 0.0);
        assert!(easing.apply(0.9) > 1.0);
    }

    #[test]
    fn bezier_endpoints() {
        let easing = Easing::Bezier { a: 0.0, b: 0.9, c: 0.1, d: 1.0 };
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }
}
