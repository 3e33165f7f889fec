use serde::{Deserialize, Serialize};

/// One booking scenario: the party composition and stay length driven
/// through the search form. Everything else in the journey is randomized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingScenario {
    pub name: String,
    pub description: String,
    pub adults: u32,
    pub children: u32,
    /// Stay length in nights.
    pub duration: u32,
    /// Fixed age for every child slot; random per slot when absent.
    pub child_age: Option<u8>,
    pub tags: Vec<String>,
}

impl BookingScenario {
    fn new(
        name: &str,
        description: &str,
        adults: u32,
        children: u32,
        duration: u32,
        child_age: Option<u8>,
        tags: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            adults,
            children,
            duration,
            child_age,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

#[must_use]
pub fn scenarios() -> Vec<BookingScenario> {
    vec![
        BookingScenario::new(
            "Family with 1 child",
            "Two adults and one child on a week-long package",
            2,
            1,
            7,
            None,
            &["family", "standard"],
        ),
        BookingScenario::new(
            "Couple",
            "Two adults on a ten-night package",
            2,
            0,
            10,
            None,
            &["couple"],
        ),
        BookingScenario::new(
            "Solo traveler",
            "One adult on a short break",
            1,
            0,
            3,
            None,
            &["solo", "short"],
        ),
    ]
}

/// Case-insensitive substring lookup over scenario names.
#[must_use]
pub fn get_scenario(name: &str) -> Option<BookingScenario> {
    let needle = name.to_lowercase();
    scenarios()
        .into_iter()
        .find(|s| s.name.to_lowercase().contains(&needle))
}

/// `(name, description)` pairs for `--list-scenarios`.
#[must_use]
pub fn list_scenarios() -> Vec<(String, String)> {
    scenarios()
        .into_iter()
        .map(|s| (s.name, s.description))
        .collect()
}
