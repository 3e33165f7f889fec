use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Timeouts;
use crate::driver::{Locator, PageDriver};

pub mod drop_modal;
pub mod flights;
pub mod hotel;
pub mod passenger;
pub mod results;
pub mod search;

const ERROR_BANNER: &str = ".ErrorBanner__errorBannerWrapper";
const ERROR_BANNER_TITLE: &str = ".ErrorBanner__title";
const ERROR_BANNER_DESCRIPTION: &str = ".ErrorBanner__description";

/// How long an error-banner probe is allowed to look before concluding the
/// stage is healthy.
const BANNER_PROBE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub title: String,
    pub description: String,
}

/// Shared interactive-region helpers used by every stage through delegation.
/// Stages add only their own locators and actions on top of this.
#[derive(Clone)]
pub struct Surface {
    driver: Arc<dyn PageDriver>,
    timeouts: Timeouts,
}

impl Surface {
    pub fn new(driver: Arc<dyn PageDriver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    #[must_use]
    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.driver.navigate(url, self.timeouts.navigation).await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver.current_url().await
    }

    pub async fn wait_visible(&self, target: &Locator) -> Result<()> {
        self.driver.wait_visible(target, self.timeouts.default).await
    }

    pub async fn wait_visible_for(&self, target: &Locator, timeout: Duration) -> Result<()> {
        self.driver.wait_visible(target, timeout).await
    }

    pub async fn wait_hidden(&self, target: &Locator) -> Result<()> {
        self.driver.wait_hidden(target, self.timeouts.default).await
    }

    /// Bounded probe that treats driver-side failures as "not visible".
    pub async fn is_visible(&self, target: &Locator, timeout: Duration) -> bool {
        self.driver.is_visible(target, timeout).await.unwrap_or(false)
    }

    /// Waits for visibility, then clicks.
    pub async fn click(&self, target: &Locator) -> Result<()> {
        self.driver.click(target, self.timeouts.default).await
    }

    /// Waits for visibility, then reads trimmed text.
    pub async fn text(&self, target: &Locator) -> Result<String> {
        self.wait_visible(target).await?;
        Ok(self.driver.text(target).await?.trim().to_string())
    }

    /// Trimmed text without waiting; `""` when the element is absent.
    pub async fn peek_text(&self, target: &Locator) -> Result<String> {
        Ok(self.driver.text(target).await?.trim().to_string())
    }

    pub async fn error_banner_visible(&self) -> bool {
        self.is_visible(&Locator::new(ERROR_BANNER), BANNER_PROBE).await
    }

    pub async fn error_banner(&self) -> Result<Option<ErrorBanner>> {
        if !self.error_banner_visible().await {
            return Ok(None);
        }
        Ok(Some(ErrorBanner {
            title: self.peek_text(&Locator::new(ERROR_BANNER_TITLE)).await?,
            description: self
                .peek_text(&Locator::new(ERROR_BANNER_DESCRIPTION))
                .await?,
        }))
    }
}
