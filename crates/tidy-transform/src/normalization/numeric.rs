//! Plain decimal parsing.
//!
//! Cells are 8-byte floats. Text is accepted when it is a decimal number,
//! optionally signed or in scientific notation, with surrounding whitespace.
//! Thousands separators are not accepted: `"1,234"` is not a number here.

use tidy_model::{ParseError, ParseErrorKind};

/// Parse trimmed text as a finite `f64`.
pub fn parse_decimal(value: &str) -> Result<f64, ParseError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| ParseError::new(value, ParseErrorKind::NotANumber))?;
    if !parsed.is_finite() {
        return Err(ParseError::new(value, ParseErrorKind::NonFinite));
    }
    Ok(parsed)
}

/// Check if a string represents a finite decimal number.
pub fn is_decimal(value: &str) -> bool {
    parse_decimal(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_integer() {
        assert_eq!(parse_decimal("123"), Ok(123.0));
        assert_eq!(parse_decimal("-456"), Ok(-456.0));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_decimal("123.45"), Ok(123.45));
        assert_eq!(parse_decimal("-0.5"), Ok(-0.5));
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(parse_decimal("  123  "), Ok(123.0));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_decimal("1.23e5"), Ok(123000.0));
    }

    #[test]
    fn test_thousands_separator_rejected() {
        let err = parse_decimal("1,234").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NotANumber);
        assert_eq!(err.value, "1,234");
    }

    #[test]
    fn test_special_values_rejected() {
        assert_eq!(
            parse_decimal("nan").unwrap_err().kind,
            ParseErrorKind::NonFinite
        );
        assert_eq!(
            parse_decimal("-inf").unwrap_err().kind,
            ParseErrorKind::NonFinite
        );
    }

    #[test]
    fn test_is_decimal() {
        assert!(is_decimal("45.67"));
        assert!(!is_decimal("abc"));
        assert!(!is_decimal(""));
    }
}
