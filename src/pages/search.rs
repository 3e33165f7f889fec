use anyhow::Result;
use rand::Rng;

use super::drop_modal::{DropModal, DropModalSpec};
use super::Surface;
use crate::driver::Locator;
use crate::error::JourneyError;

const COOKIE_BANNER: &str = "#cmBannerDescription[role=\"dialog\"]";
const ACCEPT_COOKIES: &str = "#cmCloseBanner";
const DURATION_SELECT: &str = "[data-test-id=\"duration-input\"]";
const SEARCH_BUTTON: &str = "[data-test-id=\"search-button\"]";

const ROOMS_ROOT: &str = ".DropModal__dropModalContent.dropModalScope_roomandguest";

const AIRPORT_MODAL: DropModalSpec = DropModalSpec {
    name: "airports",
    root: ".DropModal__dropModalContent.dropModalScope_airports",
    trigger: Some("[data-test-id=\"airport-input\"]"),
    save_button: "button.DropModal__apply",
    items: ".SelectAirports__childrenGroup ul li label",
};

const DESTINATION_MODAL: DropModalSpec = DropModalSpec {
    name: "destinations",
    root: ".DropModal__dropModalContent.dropModalScope_destinations",
    trigger: Some(".Package__destinations .inputs__children span"),
    save_button: "button.DropModal__apply",
    items: ".DestinationsList__destinationListStyle li a",
};

const DATE_MODAL: DropModalSpec = DropModalSpec {
    name: "departure dates",
    root: ".DropModal__dropModalContent.dropModalScope_Departuredate",
    trigger: Some("[data-test-id=\"departure-date-input\"]"),
    save_button: "button.DropModal__apply",
    items: "td.SelectLegacyDate__cell.SelectLegacyDate__available",
};

const ROOMS_MODAL: DropModalSpec = DropModalSpec {
    name: "rooms and guests",
    root: ROOMS_ROOT,
    trigger: Some("[data-test-id=\"rooms-and-guest-input\"]"),
    save_button: "button.DropModal__apply",
    items: "li, label, button",
};

/// The aggregate entry at the top of the airports list; selecting it would
/// make the scenario value meaningless.
const EXCLUDED_AIRPORTS: &[&str] = &["Alle luchthavens"];

/// Search stage: cookie consent, the four drop modals, duration and the
/// search submit.
pub struct SearchPage {
    surface: Surface,
    airports: DropModal,
    destinations: DropModal,
    dates: DropModal,
    rooms: DropModal,
}

impl SearchPage {
    pub fn new(surface: Surface) -> Self {
        Self {
            airports: DropModal::new(surface.clone(), AIRPORT_MODAL),
            destinations: DropModal::new(surface.clone(), DESTINATION_MODAL),
            dates: DropModal::new(surface.clone(), DATE_MODAL),
            rooms: DropModal::new(surface.clone(), ROOMS_MODAL),
            surface,
        }
    }

    pub async fn wait_for_loaded(&self) -> Result<()> {
        let timeout = self.surface.timeouts().default;
        self.surface
            .wait_visible(&Locator::new(SEARCH_BUTTON))
            .await
            .map_err(|_| JourneyError::StageLoad {
                stage: "search",
                timeout,
            })?;
        Ok(())
    }

    pub async fn accept_cookies_if_present(&self) -> Result<()> {
        let banner = Locator::new(COOKIE_BANNER);
        if self
            .surface
            .is_visible(&banner, self.surface.timeouts().short)
            .await
        {
            self.surface.click(&Locator::new(ACCEPT_COOKIES)).await?;
            self.surface.wait_hidden(&banner).await?;
            log::debug!("cookie banner accepted");
        }
        Ok(())
    }

    pub async fn select_random_departure_airport<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<String> {
        self.airports.open().await?;
        let airport = self
            .airports
            .select_random_item(EXCLUDED_AIRPORTS, rng)
            .await?;
        self.airports.save().await?;
        Ok(airport)
    }

    pub async fn select_random_destination<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        self.destinations.open().await?;
        let destination = self.destinations.select_random_item(&[], rng).await?;
        self.destinations.save().await?;
        Ok(destination)
    }

    pub async fn select_random_departure_date<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<String> {
        self.dates.open().await?;
        let date = self.dates.select_random_item(&[], rng).await?;
        self.dates.save().await?;
        Ok(date)
    }

    pub async fn select_duration(&self, nights: u32) -> Result<()> {
        self.surface
            .driver()
            .select_by_label(&Locator::new(DURATION_SELECT), &format!("{nights} nachten"))
            .await
    }

    /// Sets adults and children, then assigns every child slot an age
    /// (explicit, or uniform in `[0,18)` per child). Returns the first
    /// child's age, 0 when there are no children.
    pub async fn configure_rooms_and_guests<R: Rng + ?Sized>(
        &self,
        adults: u32,
        children: u32,
        child_age: Option<u8>,
        rng: &mut R,
    ) -> Result<u8> {
        self.rooms.open().await?;

        let driver = self.surface.driver();
        let adults_select =
            Locator::new(format!("{ROOMS_ROOT} .AdultSelector__adultSelector select"));
        let children_select = Locator::new(format!(
            "{ROOMS_ROOT} .ChildrenSelector__childrenSelector select"
        ));
        let age_selects =
            Locator::new(format!("{ROOMS_ROOT} .ChildrenAge__childAgeSelector select"));

        driver
            .select_by_value(&adults_select, &adults.to_string())
            .await?;
        driver
            .select_by_value(&children_select, &children.to_string())
            .await?;

        let mut first_age = 0u8;
        if children > 0 {
            self.surface.wait_visible(&age_selects.clone().nth(0)).await?;
            let available = driver.count(&age_selects).await?;
            for i in 0..(children as usize).min(available) {
                let age = child_age.unwrap_or_else(|| rng.gen_range(0..18));
                driver
                    .select_by_value(&age_selects.clone().nth(i), &age.to_string())
                    .await?;
                if i == 0 {
                    first_age = age;
                }
            }
        }

        self.rooms.save().await?;
        Ok(first_age)
    }

    pub async fn submit_search(&self) -> Result<()> {
        self.surface.click(&Locator::new(SEARCH_BUTTON)).await
    }
}
