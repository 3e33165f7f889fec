use anyhow::Result;

use super::{ErrorBanner, Surface};
use crate::driver::Locator;
use crate::error::JourneyError;

const CONTINUE_BUTTON: &str = ".ProgressbarNavigation__summaryButton button";

/// Hotel-details stage: readiness plus a single continue action.
pub struct HotelDetailsPage {
    surface: Surface,
}

impl HotelDetailsPage {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    pub async fn wait_for_loaded(&self) -> Result<()> {
        let timeout = self.surface.timeouts().default;
        self.surface
            .wait_visible(&Locator::new(CONTINUE_BUTTON))
            .await
            .map_err(|_| JourneyError::StageLoad {
                stage: "hotel details",
                timeout,
            })?;
        Ok(())
    }

    pub async fn error_banner_visible(&self) -> bool {
        self.surface.error_banner_visible().await
    }

    pub async fn error_banner(&self) -> Result<Option<ErrorBanner>> {
        self.surface.error_banner().await
    }

    pub async fn proceed(&self) -> Result<()> {
        self.surface.click(&Locator::new(CONTINUE_BUTTON)).await
    }
}
