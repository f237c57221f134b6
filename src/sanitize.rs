//! PII masking applied to every text that is kept in session state

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_MARKER: &str = "[redacted email]";
pub const PHONE_MARKER: &str = "[redacted phone]";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\.\w+\b").expect("valid email pattern"));

// No word boundaries: digits glued to letters or a country code are still masked.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone pattern")
});

/// Replace email addresses, then North-American phone numbers, with fixed markers.
pub fn sanitize(text: &str) -> String {
    let masked = EMAIL_PATTERN.replace_all(text, EMAIL_MARKER);
    PHONE_PATTERN.replace_all(&masked, PHONE_MARKER).into_owned()
}
