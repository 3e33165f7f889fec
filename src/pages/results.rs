use anyhow::Result;
use std::time::Duration;

use super::Surface;
use crate::domain::HotelDetails;
use crate::driver::Locator;
use crate::error::JourneyError;

const RESULTS_CONTAINER: &str = "[data-test-id=\"search-results-list\"]";
const HOTEL_ITEMS: &str = "section.ResultListItemV2__resultItem";
const HOTEL_NAME: &str = "[data-test-id=\"hotel-name\"] span";
const PRICE_CURRENCY: &str = "[data-test-id=\"per-person-price-currency\"]";
const PRICE_VALUE: &str = "[data-test-id=\"per-person-price-value\"]";
const BOARD_TYPE: &str = ".ResultListItemV2__boardType";
const RATING: &str = ".ResultListItemV2__ratingNumber";
const CONTINUE_BUTTON: &str = "[data-test-id=\"continue-button\"]";

/// Results stage: the hotel list. Indices are only valid for the current
/// render; callers must re-resolve after navigating back here.
pub struct ResultsPage {
    surface: Surface,
}

impl ResultsPage {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    fn item(index: usize) -> Locator {
        Locator::new(HOTEL_ITEMS).nth(index)
    }

    pub async fn wait_for_loaded(&self) -> Result<()> {
        let timeout = self.surface.timeouts().default;
        let load = async {
            self.surface
                .wait_visible(&Locator::new(RESULTS_CONTAINER))
                .await?;
            self.surface
                .wait_visible(&Locator::new(HOTEL_ITEMS).nth(0))
                .await
        };
        load.await.map_err(|_| JourneyError::StageLoad {
            stage: "results",
            timeout,
        })?;
        Ok(())
    }

    pub async fn error_banner_visible(&self) -> bool {
        self.surface.error_banner_visible().await
    }

    pub async fn visible_count(&self) -> Result<usize> {
        Ok(self.surface.driver().count(&Locator::new(HOTEL_ITEMS)).await?)
    }

    async fn ensure_in_range(&self, index: usize) -> Result<()> {
        let count = self.visible_count().await?;
        if index >= count {
            return Err(JourneyError::IndexOutOfRange { index, count }.into());
        }
        Ok(())
    }

    /// Reads the visible details of one list entry. Re-derived per attempt:
    /// the list is not assumed stable across navigations.
    pub async fn hotel_details(&self, index: usize) -> Result<HotelDetails> {
        self.ensure_in_range(index).await?;
        let item = Self::item(index);

        let name = self
            .surface
            .peek_text(&item.clone().child(HOTEL_NAME))
            .await?;
        let currency = self
            .surface
            .peek_text(&item.clone().child(PRICE_CURRENCY))
            .await?;
        let value = self
            .surface
            .peek_text(&item.clone().child(PRICE_VALUE))
            .await?;
        let board_type = self
            .surface
            .peek_text(&item.clone().child(BOARD_TYPE))
            .await?
            .replace(['(', ')'], "")
            .trim()
            .to_string();
        let rating = self.surface.peek_text(&item.clone().child(RATING)).await?;

        Ok(HotelDetails {
            name,
            price: format!("{currency}{value}"),
            board_type,
            rating,
            index,
        })
    }

    /// Activates the entry's continue action, tolerating duplicate or hidden
    /// controls by clicking the first visible one.
    pub async fn select_hotel(&self, index: usize) -> Result<()> {
        self.wait_for_loaded().await?;
        self.ensure_in_range(index).await?;

        let driver = self.surface.driver();
        let buttons = Self::item(index).child(CONTINUE_BUTTON);
        let count = driver.count(&buttons).await?;
        for i in 0..count {
            let button = buttons.clone().nth(i);
            if driver.is_visible(&button, Duration::ZERO).await.unwrap_or(false) {
                self.surface.click(&button).await?;
                return Ok(());
            }
        }
        Err(JourneyError::NoVisibleAction { index }.into())
    }
}
