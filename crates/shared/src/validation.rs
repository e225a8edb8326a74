//! Common validation utilities for registrant and shift input.

use chrono::{NaiveDate, NaiveTime, Utc};
use validator::ValidationError;

/// Maximum length of any free-text field after sanitization.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Shift title length bounds after sanitization.
pub const TITLE_MIN_LENGTH: usize = 3;
pub const TITLE_MAX_LENGTH: usize = 100;

/// Registrant name length bounds.
pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 50;

/// Operational ceiling on shift capacity.
pub const MAX_PEOPLE_CEILING: i32 = 50;

lazy_static::lazy_static! {
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^(\+31|0)[0-9]{9}$").unwrap();
    static ref NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]{2,50}$").unwrap();
}

/// Strips potentially dangerous characters from free text and caps its length.
///
/// Trims surrounding whitespace, removes `< > " ' &`, and truncates to
/// [`MAX_TEXT_LENGTH`] characters.
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Normalizes an email address for storage and comparison (trim + lower-case).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}

/// Validates a Dutch phone number.
///
/// Spaces and hyphens are ignored; the remainder must match `+31` or `0`
/// followed by nine digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let cleaned: String = phone.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if PHONE_REGEX.is_match(&cleaned) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Invalid phone number (expected +31 or 0 followed by 9 digits)".into());
        Err(err)
    }
}

/// Validates a registrant name: 2-50 letters (accented included), spaces,
/// apostrophes and hyphens.
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if NAME_REGEX.is_match(name.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("name_format");
        err.message = Some("Name must be 2-50 letters, spaces, apostrophes or hyphens".into());
        Err(err)
    }
}

/// Validates a shift title: 3-100 characters after sanitization.
pub fn validate_shift_title(title: &str) -> Result<(), ValidationError> {
    let sanitized = sanitize_text(title);
    let len = sanitized.chars().count();
    if (TITLE_MIN_LENGTH..=TITLE_MAX_LENGTH).contains(&len) {
        Ok(())
    } else {
        let mut err = ValidationError::new("title_length");
        err.message = Some("Title must be 3-100 characters".into());
        Err(err)
    }
}

/// Validates that a shift time window is well-formed (start strictly before end).
pub fn validate_time_window(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_window");
        err.message = Some("Start time must be before end time".into());
        Err(err)
    }
}

/// Validates that a shift date is today or later.
pub fn validate_future_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_past");
        err.message = Some("Shift date cannot be in the past".into());
        Err(err)
    }
}

/// Validates shift capacity bounds: `1 <= min <= max <= 50`.
pub fn validate_people_bounds(min: i32, max: i32) -> Result<(), ValidationError> {
    if min >= 1 && max >= min && max <= MAX_PEOPLE_CEILING {
        Ok(())
    } else {
        let mut err = ValidationError::new("people_bounds");
        err.message = Some("Capacity must satisfy 1 <= min <= max <= 50".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // Email tests
    #[test]
    fn test_validate_email_accepts_common_forms() {
        assert!(validate_email("jan@example.com").is_ok());
        assert!(validate_email("jan.jansen+bar@club.example.nl").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
        assert!(validate_email("UPPER@EXAMPLE.COM").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jan@example.c").is_err());
        assert!(validate_email("jan jansen@example.com").is_err());
    }

    #[test]
    fn test_validate_email_error_message() {
        let err = validate_email("nope").unwrap_err();
        assert_eq!(err.code, "email_format");
        assert_eq!(err.message.unwrap().to_string(), "Invalid email address");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jan.Jansen@Example.COM "), "jan.jansen@example.com");
        assert_eq!(normalize_email("plain@club.nl"), "plain@club.nl");
    }

    // Phone tests
    #[test]
    fn test_validate_phone_accepts_dutch_numbers() {
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("+31612345678").is_ok());
        assert!(validate_phone("06 12 34 56 78").is_ok());
        assert!(validate_phone("06-12345678").is_ok());
        assert!(validate_phone("+31 6 12345678").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_malformed() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("061234567").is_err()); // one digit short
        assert!(validate_phone("06123456789").is_err()); // one digit long
        assert!(validate_phone("+32612345678").is_err()); // wrong country code
        assert!(validate_phone("061234567a").is_err());
    }

    #[test]
    fn test_validate_phone_error_code() {
        let err = validate_phone("nope").unwrap_err();
        assert_eq!(err.code, "phone_format");
    }

    // Name tests
    #[test]
    fn test_validate_person_name_accepts_real_names() {
        assert!(validate_person_name("Jan").is_ok());
        assert!(validate_person_name("Jan Jansen").is_ok());
        assert!(validate_person_name("Anne-Marie").is_ok());
        assert!(validate_person_name("O'Brien").is_ok());
        assert!(validate_person_name("René Müller").is_ok());
    }

    #[test]
    fn test_validate_person_name_rejects_invalid() {
        assert!(validate_person_name("").is_err());
        assert!(validate_person_name("J").is_err());
        assert!(validate_person_name("Jan1").is_err());
        assert!(validate_person_name("jan@club").is_err());
        assert!(validate_person_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_person_name_boundary_lengths() {
        assert!(validate_person_name("ab").is_ok());
        assert!(validate_person_name(&"a".repeat(50)).is_ok());
    }

    // Sanitization tests
    #[test]
    fn test_sanitize_text_strips_dangerous_characters() {
        assert_eq!(sanitize_text("<script>alert('x')</script>"), "scriptalert(x)/script");
        assert_eq!(sanitize_text("Tom & Jerry"), "Tom  Jerry");
        assert_eq!(sanitize_text("\"quoted\""), "quoted");
    }

    #[test]
    fn test_sanitize_text_trims_whitespace() {
        assert_eq!(sanitize_text("  hello  "), "hello");
    }

    #[test]
    fn test_sanitize_text_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_text(&long).chars().count(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn test_sanitize_text_preserves_accents() {
        assert_eq!(sanitize_text("Café Zondag"), "Café Zondag");
    }

    // Title tests
    #[test]
    fn test_validate_shift_title_bounds() {
        assert!(validate_shift_title("Bar").is_ok());
        assert!(validate_shift_title("Zaterdag middagdienst").is_ok());
        assert!(validate_shift_title(&"t".repeat(100)).is_ok());
        assert!(validate_shift_title("ab").is_err());
        assert!(validate_shift_title(&"t".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_shift_title_measures_sanitized_length() {
        // Stripped characters do not count toward the length
        assert!(validate_shift_title("<<a>>").is_err());
        assert!(validate_shift_title("<<abc>>").is_ok());
    }

    // Time window tests
    #[test]
    fn test_validate_time_window() {
        let start = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(22, 30, 0).unwrap();
        assert!(validate_time_window(start, end).is_ok());
        assert!(validate_time_window(end, start).is_err());
        assert!(validate_time_window(start, start).is_err());
    }

    // Date tests
    #[test]
    fn test_validate_future_date() {
        let today = Utc::now().date_naive();
        assert!(validate_future_date(&today).is_ok());
        assert!(validate_future_date(&(today + Duration::days(14))).is_ok());
        assert!(validate_future_date(&(today - Duration::days(1))).is_err());
    }

    #[test]
    fn test_validate_future_date_error_code() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let err = validate_future_date(&yesterday).unwrap_err();
        assert_eq!(err.code, "date_past");
    }

    // People bounds tests
    #[test]
    fn test_validate_people_bounds() {
        assert!(validate_people_bounds(1, 1).is_ok());
        assert!(validate_people_bounds(2, 4).is_ok());
        assert!(validate_people_bounds(1, 50).is_ok());
        assert!(validate_people_bounds(0, 4).is_err());
        assert!(validate_people_bounds(5, 4).is_err());
        assert!(validate_people_bounds(1, 51).is_err());
        assert!(validate_people_bounds(-1, -1).is_err());
    }

    #[test]
    fn test_validate_people_bounds_error_message() {
        let err = validate_people_bounds(3, 2).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Capacity must satisfy 1 <= min <= max <= 50"
        );
    }
}
