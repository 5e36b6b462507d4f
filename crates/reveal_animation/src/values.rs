//! Animatable value types

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        // Exact at both ends so final frames land on the target
        if t >= 1.0 {
            return *other;
        }
        self + (other - self) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_f32() {
        assert_eq!(0.0f32.lerp(&1.0, 0.5), 0.5);
        assert_eq!((-50.0f32).lerp(&0.0, 1.0), 0.0);
        assert!((30.0f32.lerp(&0.0, 0.25) - 22.5).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_exact_at_end() {
        assert_eq!(0.0f32.lerp(&16_777_216.0, 1.0), 16_777_216.0);
        assert_eq!(0.1f32.lerp(&0.7, 1.5), 0.7);
    }
}
