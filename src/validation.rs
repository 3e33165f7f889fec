use regex::Regex;
use std::sync::LazyLock;

use crate::domain::PassengerValidationResult;
use crate::error::JourneyError;

/// Sentinel for error text matching no known field.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Ordered classification table. Entries are tried top to bottom and the
/// first matching pattern wins, so broad patterns sit below narrow ones
/// (e.g. `achternaam` alone only after `achternaam.*paspoort`).
static FIELD_PATTERNS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    let entry = |id, patterns: &[&str]| {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("static field pattern"))
            .collect();
        (id, compiled)
    };
    vec![
        entry("firstName_0", &["voornaam.*paspoort", "first.*name"]),
        entry("lastName_0", &["achternaam.*paspoort", "last.*name", "achternaam"]),
        entry("gender_0", &["geslacht", "gender"]),
        entry("dob_0", &["geboortedatum", "date.*birth", r"DD/MM/JJJJ"]),
        entry("nationality", &["nationaliteit", "nationality"]),
        entry("country", &["land", "country"]),
        entry("address1", &["straatnaam", "street"]),
        entry("houseNum", &["huisnummer", "house.*number"]),
        entry("postCode", &["postcode", "postal.*code"]),
        entry("town", &["woonplaats", "town", "city"]),
        entry("phonecode", &["landcode", "phone.*code"]),
        entry("mobileNum", &["telefoonnummer", "phone", "mobile"]),
        entry("email", &["e-mail", "email"]),
        entry("firstName_1", &["voornaam.*paspoort", "first.*name"]),
        entry("lastName_1", &["achternaam.*paspoort", "achternaam"]),
        entry("gender_1", &["geslacht", "gender"]),
        entry("dob_1", &["geboortedatum", r"DD/MM/JJJJ"]),
    ]
});

/// Fields that must carry an error after an empty-form submission, with the
/// message pattern each one is expected to match.
static REQUIRED_FIELDS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let entry = |id, pattern: &str| {
        (id, Regex::new(&format!("(?i){pattern}")).expect("static required pattern"))
    };
    vec![
        entry("firstName_0", "voornaam|first.*name"),
        entry("lastName_0", "achternaam|last.*name"),
        entry("dob_0", r"geboortedatum|date.*birth|DD/MM/JJJJ"),
        entry("email", "e-mail|email"),
        entry("address1", "straatnaam|street"),
        entry("houseNum", "huisnummer|house.*number"),
        entry("postCode", "postcode|postal"),
        entry("town", "woonplaats|town|city"),
        entry("mobileNum", "telefoonnummer|phone|mobile"),
    ]
});

/// Classifies rendered error text to a canonical field id, `"unknown"` when
/// nothing in the table matches. Pure: reads nothing, triggers nothing.
#[must_use]
pub fn classify(error_text: &str) -> &'static str {
    let text = error_text.trim();
    for (field_id, patterns) in FIELD_PATTERNS.iter() {
        if patterns.iter().any(|p| p.is_match(text)) {
            return field_id;
        }
    }
    UNKNOWN_FIELD
}

/// Checks the aggregated passenger result against the required-field table.
/// A miss here is a target-form defect, reported as a field assertion so the
/// retry loop does not paper over it.
pub fn verify_required(result: &PassengerValidationResult) -> Result<(), JourneyError> {
    if !result.alert_visible {
        return Err(JourneyError::field_assertion(
            "form",
            "<empty submit>",
            "validation alert did not appear after submitting the empty form",
        ));
    }
    for (field_id, pattern) in REQUIRED_FIELDS.iter() {
        let Some(error) = result.error_for(field_id) else {
            return Err(JourneyError::field_assertion(
                *field_id,
                "<empty submit>",
                "expected a validation error for this required field",
            ));
        };
        if !pattern.is_match(&error.message) {
            return Err(JourneyError::field_assertion(
                *field_id,
                "<empty submit>",
                format!(
                    "error message {:?} does not match expected pattern {pattern}",
                    error.message
                ),
            ));
        }
    }
    Ok(())
}
