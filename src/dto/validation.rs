//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a value is not made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a currency code is three ASCII letters.
///
/// # Examples
///
/// ```ignore
/// validate_currency("usd") // Ok
/// validate_currency("EUR") // Ok
/// validate_currency("us")  // Err - too short
/// ```
pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        let mut err = ValidationError::new("currency_format");
        err.message = Some(format!("currency must be a 3-letter ISO code (got `{code}`)").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Friday crawl").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_currency() {
        assert!(validate_currency("usd").is_ok());
        assert!(validate_currency("EUR").is_ok());
        assert!(validate_currency("us").is_err()); // too short
        assert!(validate_currency("usd1").is_err()); // too long
        assert!(validate_currency("u$d").is_err()); // symbol
    }
}
