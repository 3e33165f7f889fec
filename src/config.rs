use std::time::Duration;

/// Timeout tiers used across the journey. Every driver interaction is
/// bounded by one of these; a timed-out wait is a local failure, never a hang.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Quick visibility probes (cookie banner, error banner, alert).
    pub short: Duration,
    /// Ordinary element waits.
    pub default: Duration,
    /// Stage readiness (flights content vs error banner race).
    pub medium: Duration,
    /// Inline validation error show/hide.
    pub inline: Duration,
    /// Full page navigations.
    pub navigation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(5),
            default: Duration::from_secs(15),
            medium: Duration::from_secs(10),
            inline: Duration::from_secs(3),
            navigation: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JourneyConfig {
    pub base_url: String,
    /// Landing path relative to `base_url`.
    pub landing_path: String,
    pub max_hotel_retries: usize,
    pub timeouts: Timeouts,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.tui.nl".to_string(),
            landing_path: "/h/nl".to_string(),
            max_hotel_retries: 3,
            timeouts: Timeouts::default(),
        }
    }
}

impl JourneyConfig {
    #[must_use]
    pub fn landing_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.landing_path)
    }
}
