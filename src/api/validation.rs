//! Input validation for API requests.
//!
//! Validation functions for request data, each returning a plain error
//! message for one field. Collect multiple failures with the
//! `ValidationErrorBuilder` from the `error` module.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for a plausible email address
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();

    /// Regex for phone numbers (digits with optional +, spaces, dashes, parens)
    static ref PHONE_REGEX: Regex = Regex::new(
        r"^\+?[0-9][0-9 ()\-]{4,19}$"
    ).unwrap();

    /// Regex for wall-clock times (24h HH:MM)
    static ref TIME_REGEX: Regex = Regex::new(
        r"^([01][0-9]|2[0-3]):[0-5][0-9]$"
    ).unwrap();
}

/// Validate a person or villa name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }
    if trimmed.len() > 120 {
        return Err("Name is too long (max 120 characters)".to_string());
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

/// Validate a phone number (optional field)
pub fn validate_phone(phone: &Option<String>) -> Result<(), String> {
    if let Some(p) = phone {
        if p.is_empty() {
            return Ok(()); // Empty string treated as no phone
        }
        if !PHONE_REGEX.is_match(p) {
            return Err("Invalid phone number format".to_string());
        }
    }
    Ok(())
}

/// Validate a calendar date in ISO `YYYY-MM-DD` form
pub fn validate_date(date: &str) -> Result<(), String> {
    if date.is_empty() {
        return Err("Date is required".to_string());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "Invalid date, expected YYYY-MM-DD".to_string())
}

/// Validate that check-out falls strictly after check-in.
/// Both dates must already be individually valid.
pub fn validate_date_range(check_in: &str, check_out: &str) -> Result<(), String> {
    let start = NaiveDate::parse_from_str(check_in, "%Y-%m-%d")
        .map_err(|_| "Invalid check-in date".to_string())?;
    let end = NaiveDate::parse_from_str(check_out, "%Y-%m-%d")
        .map_err(|_| "Invalid check-out date".to_string())?;
    if end <= start {
        return Err("Check-out must be after check-in".to_string());
    }
    Ok(())
}

/// Validate a guest count
pub fn validate_guests(guests: i64) -> Result<(), String> {
    if !(1..=20).contains(&guests) {
        return Err("Guests must be between 1 and 20".to_string());
    }
    Ok(())
}

/// Validate an actual check-in/check-out time (24h HH:MM)
pub fn validate_time(time: &str) -> Result<(), String> {
    if time.is_empty() {
        return Err("Time is required".to_string());
    }
    if !TIME_REGEX.is_match(time) {
        return Err("Invalid time, expected HH:MM".to_string());
    }
    Ok(())
}

/// Validate a UI language code
pub fn validate_language(language: &str) -> Result<(), String> {
    match language {
        "en" | "th" => Ok(()),
        _ => Err("Language must be \"en\" or \"th\"".to_string()),
    }
}

/// Validate a nightly price
pub fn validate_price(price: i64) -> Result<(), String> {
    if price <= 0 {
        return Err("Price must be positive".to_string());
    }
    Ok(())
}

/// Validate a free-text search term
pub fn validate_search(search: &str) -> Result<(), String> {
    if search.len() > 100 {
        return Err("Search term is too long (max 100 characters)".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("john@example").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
        assert!(validate_email("two words@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone(&Some("081-234-5678".to_string())).is_ok());
        assert!(validate_phone(&Some("+66 81 234 5678".to_string())).is_ok());
        assert!(validate_phone(&Some("".to_string())).is_ok());
        assert!(validate_phone(&None).is_ok());
        assert!(validate_phone(&Some("abc".to_string())).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-03-01").is_ok());
        assert!(validate_date("2026-13-01").is_err());
        assert!(validate_date("03/01/2026").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range("2026-03-01", "2026-03-03").is_ok());
        assert!(validate_date_range("2026-03-03", "2026-03-01").is_err());
        // Same-day stays are not bookable
        assert!(validate_date_range("2026-03-01", "2026-03-01").is_err());
    }

    #[test]
    fn test_validate_guests() {
        assert!(validate_guests(1).is_ok());
        assert!(validate_guests(20).is_ok());
        assert!(validate_guests(0).is_err());
        assert!(validate_guests(21).is_err());
        assert!(validate_guests(-3).is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("00:00").is_ok());
        assert!(validate_time("14:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("9:30").is_err());
        assert!(validate_time("14:60").is_err());
        assert!(validate_time("").is_err());
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("en").is_ok());
        assert!(validate_language("th").is_ok());
        assert!(validate_language("fr").is_err());
        assert!(validate_language("").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(8500).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-100).is_err());
    }
}
