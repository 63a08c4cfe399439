/// Rounds half away from zero to `digits` decimal places.
#[inline]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_four_digits() {
        assert_eq!(round_to(0.19996, 4), 0.2);
        assert_eq!(round_to(0.19994, 4), 0.1999);
        assert_eq!(round_to(0.123456, 4), 0.1235);
    }

    #[test]
    fn test_round_to_nan_stays_nan() {
        assert!(round_to(f64::NAN, 4).is_nan());
    }
}
