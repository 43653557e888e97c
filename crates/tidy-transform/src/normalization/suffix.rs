//! Magnitude-suffixed numbers such as `"1.2B"`, `"400M"` and `"33k"`.
//!
//! Population tables abbreviate large values with a trailing suffix. The
//! recognized set is exactly `B` (×1e9), `M` (×1e6) and lowercase `k` (×1e3),
//! checked in that order. At most one trailing suffix is stripped before the
//! remaining text is parsed as a plain decimal.

use tidy_model::{CellValue, ParseError, ParseErrorKind};

use super::numeric::parse_decimal;

/// Recognized suffixes and their multipliers, in match order.
pub const SUFFIXES: [(char, f64); 3] = [('B', 1e9), ('M', 1e6), ('k', 1e3)];

/// Parse a decimal with an optional magnitude suffix.
///
/// `"1.2B"` → `1_200_000_000.0`, `"42"` → `42.0`. Uppercase `K` is not a
/// suffix and fails like any other non-numeric text.
pub fn parse_suffixed(value: &str) -> Result<f64, ParseError> {
    let trimmed = value.trim();
    let (digits, multiplier) = SUFFIXES
        .iter()
        .find_map(|(suffix, multiplier)| {
            trimmed
                .strip_suffix(*suffix)
                .map(|digits| (digits, *multiplier))
        })
        .unwrap_or((trimmed, 1.0));

    let base = parse_decimal(digits).map_err(|err| ParseError::new(value, err.kind))?;
    let expanded = base * multiplier;
    if !expanded.is_finite() {
        return Err(ParseError::new(value, ParseErrorKind::NonFinite));
    }
    Ok(expanded)
}

/// Expand a raw cell. Numbers pass through, blanks and NaN are missing.
pub fn expand_cell(cell: &CellValue) -> Result<Option<f64>, ParseError> {
    match cell {
        CellValue::Missing => Ok(None),
        CellValue::Number(value) if value.is_finite() => Ok(Some(*value)),
        CellValue::Number(_) => Ok(None),
        CellValue::Text(text) if text.trim().is_empty() => Ok(None),
        CellValue::Text(text) => parse_suffixed(text).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billions() {
        assert_eq!(parse_suffixed("1.2B"), Ok(1_200_000_000.0));
        assert_eq!(parse_suffixed("1.41B"), Ok(1.41 * 1e9));
    }

    #[test]
    fn test_millions() {
        assert_eq!(parse_suffixed("400M"), Ok(400_000_000.0));
    }

    #[test]
    fn test_thousands() {
        assert_eq!(parse_suffixed("33k"), Ok(33_000.0));
    }

    #[test]
    fn test_plain_decimal() {
        assert_eq!(parse_suffixed("42"), Ok(42.0));
        assert_eq!(parse_suffixed(" 908 "), Ok(908.0));
    }

    #[test]
    fn test_uppercase_k_is_not_a_suffix() {
        let err = parse_suffixed("33K").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NotANumber);
        assert_eq!(err.value, "33K");
    }

    #[test]
    fn test_single_suffix_only() {
        assert!(parse_suffixed("1MB").is_err());
        assert!(parse_suffixed("2kk").is_err());
    }

    #[test]
    fn test_bare_suffix_fails() {
        assert!(parse_suffixed("B").is_err());
        assert!(parse_suffixed("").is_err());
    }

    #[test]
    fn test_negative_and_scientific() {
        assert_eq!(parse_suffixed("-2k"), Ok(-2_000.0));
        assert_eq!(parse_suffixed("1e2M"), Ok(100_000_000.0));
    }

    #[test]
    fn test_expand_cell() {
        assert_eq!(expand_cell(&CellValue::Missing), Ok(None));
        assert_eq!(expand_cell(&CellValue::Number(7.5)), Ok(Some(7.5)));
        assert_eq!(expand_cell(&CellValue::Number(f64::NAN)), Ok(None));
        assert_eq!(
            expand_cell(&CellValue::Text("3M".to_string())),
            Ok(Some(3_000_000.0))
        );
        assert!(expand_cell(&CellValue::Text("n/a".to_string())).is_err());
    }
}
