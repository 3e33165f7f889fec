use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search form values as they were committed, one per journey attempt.
/// Built incrementally while the search stage runs; complete once all five
/// selections (airport, destination, date, duration, rooms/guests) are in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub departure_airport: String,
    pub destination: String,
    pub departure_date: String,
    pub duration: u32,
    pub adults: u32,
    pub children: u32,
    /// Age assigned to the first child slot, 0 when `children == 0`.
    pub child_age: u8,
}

/// Details read from one results-list entry. The index is only stable within
/// a single render of the list and must be re-resolved after navigating back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelDetails {
    pub name: String,
    pub price: String,
    pub board_type: String,
    pub rating: String,
    pub index: usize,
}

/// One visible field error, classified against the known-field table.
/// `field_id` is a canonical identifier or the sentinel `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidationError {
    pub field_id: String,
    pub message: String,
}

/// Terminal artifact of the passenger stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerValidationResult {
    pub alert_visible: bool,
    pub alert_message: String,
    pub field_errors: Vec<FieldValidationError>,
}

impl PassengerValidationResult {
    #[must_use]
    pub fn error_for(&self, field_id: &str) -> Option<&FieldValidationError> {
        self.field_errors.iter().find(|e| e.field_id == field_id)
    }
}

/// Everything a completed journey produced, in report order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyReport {
    pub scenario_name: String,
    pub criteria: SearchCriteria,
    pub hotel: HotelDetails,
    /// 1-based count of hotel attempts consumed, including the winning one.
    pub attempts: usize,
    pub validation: PassengerValidationResult,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        u64::try_from(d.as_millis()).unwrap_or(u64::MAX).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
