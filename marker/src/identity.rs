//! # Identity Extraction
//!
//! Test-run reports are filed under a path that contains the submitting
//! student's email address somewhere, e.g.
//! `lab1/submissions/bob.smith@school.org/result.xml`. [`extract_identity`]
//! pulls the first email-shaped substring out of such a path.
//!
//! The pattern is deliberately permissive: the local part is a run of word
//! characters, dashes and dots, and the domain is either a dotted IPv4 address
//! or a multi-label hostname ending in a label of 2 to 4 letters. Matching ignores
//! case but the returned value is not normalized; the aggregator does that.

use crate::error::MarkerError;
use once_cell::sync::Lazy;
use regex::Regex;

const OCTET: &str = r"([0-1]?[0-9]{1,2}|25[0-5]|2[0-4][0-9])";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let local = r"(([\w-]+\.)+[\w-]+|([a-zA-Z]{1}|[\w-]{2,}))";
    let ipv4 = format!(r"({OCTET}\.{OCTET}\.{OCTET}\.{OCTET}){{1}}");
    let host = r"([a-zA-Z]+[\w-]+\.)+[a-zA-Z]{2,4}";
    Regex::new(&format!(r"(?i){local}@(({ipv4})|{host})")).expect("email pattern is valid")
});

/// Returns the first email-shaped substring of `location`.
///
/// # Errors
///
/// Returns [`MarkerError::NoIdentityFound`] when nothing in `location` looks
/// like an email address.
///
/// # Example
///
/// ```
/// use marker::identity::extract_identity;
///
/// let id = extract_identity("lab1/submissions/bob.smith@school.org/result.xml").unwrap();
/// assert_eq!(id, "bob.smith@school.org");
/// assert!(extract_identity("lab1/anonymous/result.xml").is_err());
/// ```
pub fn extract_identity(location: &str) -> Result<String, MarkerError> {
    EMAIL_PATTERN
        .find(location)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| MarkerError::NoIdentityFound(location.to_string()))
}
