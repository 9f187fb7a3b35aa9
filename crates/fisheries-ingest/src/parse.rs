//! Permissive numeric parsing.
//!
//! The cleaning pipeline's coercion policy is that an unparseable cell
//! becomes an absent value, never an error, so every helper here returns
//! `Option` and the caller counts the `None`s.

/// Parses a string as f64, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as i64, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Parses a year cell.
///
/// Accepts integer text and float text with a zero fraction (`"2005.0"`),
/// since upstream tools sometimes emit year columns as floats. A fractional
/// year is not a year and yields `None`.
pub fn parse_year(value: &str) -> Option<i64> {
    if let Some(year) = parse_i64(value) {
        return Some(year);
    }
    let float = parse_f64(value)?;
    if float.fract() == 0.0 && float.is_finite() {
        Some(float as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_handles_blanks_and_junk() {
        assert_eq!(parse_f64(" 120.5 "), Some(120.5));
        assert_eq!(parse_f64("-3"), Some(-3.0));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("   "), None);
        assert_eq!(parse_f64("$1,200"), None);
    }

    #[test]
    fn parse_i64_rejects_floats() {
        assert_eq!(parse_i64("2005"), Some(2005));
        assert_eq!(parse_i64("2005.0"), None);
        assert_eq!(parse_i64("n/a"), None);
    }

    #[test]
    fn parse_year_accepts_float_formatted_integers() {
        assert_eq!(parse_year("2005"), Some(2005));
        assert_eq!(parse_year(" 2005.0 "), Some(2005));
        assert_eq!(parse_year("2005.5"), None);
        assert_eq!(parse_year("unknown"), None);
        assert_eq!(parse_year(""), None);
    }
}
