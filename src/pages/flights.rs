use anyhow::Result;

use super::Surface;
use crate::driver::Locator;

const FLIGHTS_CONTAINER: &str = ".YourFlights__yourFlightComponent";
const CONTINUE_BUTTON: &str = ".ProgressbarNavigation__summaryButton button";

/// Readiness signal of the flights stage, kept as an explicit union so the
/// retry loop can log load failures and error banners distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightsOutcome {
    Loaded,
    Errored,
    TimedOut,
}

/// Flights stage: content visibility raced against the error banner, plus
/// the booking continue action.
pub struct FlightsPage {
    surface: Surface,
}

impl FlightsPage {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    /// Resolves the stage's readiness within the medium timeout budget.
    /// Never errs on unavailability: that is what the union expresses.
    pub async fn wait_for_outcome(&self) -> Result<FlightsOutcome> {
        let timeouts = *self.surface.timeouts();
        let content = Locator::new(FLIGHTS_CONTAINER);

        if self.surface.is_visible(&content, timeouts.medium).await {
            if self.surface.error_banner_visible().await {
                return Ok(FlightsOutcome::Errored);
            }
            // Content rendered but the continue control never became
            // interactive: still not a usable stage.
            let continue_button = Locator::new(CONTINUE_BUTTON);
            if self
                .surface
                .wait_visible_for(&continue_button, timeouts.short)
                .await
                .is_err()
            {
                return Ok(FlightsOutcome::TimedOut);
            }
            log::debug!("flights stage loaded");
            return Ok(FlightsOutcome::Loaded);
        }

        if self.surface.error_banner_visible().await {
            Ok(FlightsOutcome::Errored)
        } else {
            Ok(FlightsOutcome::TimedOut)
        }
    }

    pub async fn proceed(&self) -> Result<()> {
        self.surface.click(&Locator::new(CONTINUE_BUTTON)).await
    }
}
