//! Two-decimal rounding shared by every step of the evaluation pipeline.
//!
//! The pipeline rounds after each derived quantity and feeds the rounded
//! value into the next step, so this one function decides every reported
//! number. Ties round away from zero, which for the strictly positive
//! quantities of a core test is plain round-half-up.

/// Round to 2 decimal places, half away from zero.
///
/// ```rust
/// use strength_core::calculations::rounding::round2;
///
/// assert_eq!(round2(51.1026), 51.1);
/// assert_eq!(round2(0.125), 0.13);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(4415.625), 4415.63);
        assert_eq!(round2(63.2375), 63.24);
    }

    #[test]
    fn test_rounds_down_below_half() {
        assert_eq!(round2(48.21149141559958), 48.21);
        assert_eq!(round2(0.9935294117647059), 0.99);
    }

    #[test]
    fn test_already_rounded_values_are_stable() {
        for v in [37.5, 1.06, 3629.84, 175000.0] {
            assert_eq!(round2(v), v);
            assert_eq!(round2(round2(v)), round2(v));
        }
    }
}
