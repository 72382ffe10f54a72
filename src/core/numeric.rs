// LedgerSift - core/numeric.rs
//
// Lenient numeric coercion: text that does not parse as a finite number
// becomes a missing value instead of an error.

/// Coerce a cell to a number. Surrounding whitespace is ignored; empty,
/// non-numeric, infinite and NaN inputs yield `None`.
pub fn coerce(cell: Option<&str>) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer value of a coerced number, if it has no fractional part and fits.
pub fn as_integer(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Render a coerced number for output. Integral values drop the fraction.
pub fn format(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) => match as_integer(v) {
            Some(i) => i.to_string(),
            None => v.to_string(),
        },
    }
}

/// Hashable join key for a coerced number. Equal numbers give equal keys,
/// including `0.0` and `-0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericKey(u64);

impl NumericKey {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            Self(0.0f64.to_bits())
        } else {
            Self(value.to_bits())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_accepts_numbers() {
        assert_eq!(coerce(Some("300016")), Some(300016.0));
        assert_eq!(coerce(Some(" 300016.0 ")), Some(300016.0));
        assert_eq!(coerce(Some("-12.5")), Some(-12.5));
        assert_eq!(coerce(Some("1e3")), Some(1000.0));
    }

    #[test]
    fn test_coerce_treats_garbage_as_missing() {
        assert_eq!(coerce(None), None);
        assert_eq!(coerce(Some("")), None);
        assert_eq!(coerce(Some("   ")), None);
        assert_eq!(coerce(Some("GL-300016")), None);
        assert_eq!(coerce(Some("NaN")), None);
        assert_eq!(coerce(Some("inf")), None);
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer(300016.0), Some(300016));
        assert_eq!(as_integer(300016.5), None);
        assert_eq!(as_integer(1e30), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format(None), "");
        assert_eq!(format(Some(300016.0)), "300016");
        assert_eq!(format(Some(2.5)), "2.5");
    }

    #[test]
    fn test_key_equates_signed_zero() {
        assert_eq!(NumericKey::new(0.0), NumericKey::new(-0.0));
        assert_eq!(NumericKey::new(300016.0), NumericKey::new(300016.0));
        assert_ne!(NumericKey::new(300016.0), NumericKey::new(300015.0));
    }
}
