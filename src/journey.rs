use anyhow::{bail, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;

use crate::config::JourneyConfig;
use crate::domain::{HotelDetails, JourneyReport, PassengerValidationResult, SearchCriteria};
use crate::driver::PageDriver;
use crate::error::JourneyError;
use crate::pages::flights::{FlightsOutcome, FlightsPage};
use crate::pages::hotel::HotelDetailsPage;
use crate::pages::passenger::PassengerPage;
use crate::pages::results::ResultsPage;
use crate::pages::search::SearchPage;
use crate::pages::Surface;
use crate::scenario::BookingScenario;
use crate::validation::verify_required;

/// What one hotel attempt produced: a reason to advance to the next result
/// index, or the finished booking-path artifacts.
enum AttemptOutcome {
    Advance(&'static str),
    Complete {
        hotel: HotelDetails,
        validation: PassengerValidationResult,
    },
}

/// Drives one full booking journey: search, results, hotel details, flights
/// and passenger details, retrying over consecutive hotel indices when a
/// stage reports the chosen hotel unavailable.
pub struct Journey {
    surface: Surface,
    config: JourneyConfig,
    scenario: BookingScenario,
    rng: ChaCha8Rng,
}

impl Journey {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        config: JourneyConfig,
        scenario: BookingScenario,
        seed: u64,
    ) -> Self {
        let surface = Surface::new(driver, config.timeouts);
        Self {
            surface,
            config,
            scenario,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub async fn run(&mut self) -> Result<JourneyReport> {
        let started = Instant::now();
        log::info!(
            "starting scenario {:?} ({} adults, {} children, {} nights)",
            self.scenario.name,
            self.scenario.adults,
            self.scenario.children,
            self.scenario.duration
        );

        let criteria = self.run_search().await?;

        let results = ResultsPage::new(self.surface.clone());
        results.wait_for_loaded().await?;
        if results.error_banner_visible().await {
            log::warn!("results list rendered alongside an error banner");
        }
        // Captured once; every retry navigates back to this exact render.
        let results_url = self.surface.current_url().await?;

        for index in 0..self.config.max_hotel_retries {
            match self.attempt(&results, &results_url, index).await {
                Ok(AttemptOutcome::Complete { hotel, validation }) => {
                    log::info!("journey complete on hotel attempt {}", index + 1);
                    return Ok(JourneyReport {
                        scenario_name: self.scenario.name.clone(),
                        criteria,
                        hotel,
                        attempts: index + 1,
                        validation,
                        duration: started.elapsed(),
                    });
                }
                Ok(AttemptOutcome::Advance(reason)) => {
                    log::warn!("hotel attempt {}: {reason}, advancing", index + 1);
                }
                Err(err) => {
                    if err
                        .downcast_ref::<JourneyError>()
                        .is_some_and(JourneyError::is_fatal)
                    {
                        return Err(err);
                    }
                    log::warn!("hotel attempt {} failed: {err:#}, advancing", index + 1);
                }
            }
        }

        Err(JourneyError::Exhausted {
            attempts: self.config.max_hotel_retries,
        }
        .into())
    }

    /// Lands, clears cookie consent and commits all five search selections.
    async fn run_search(&mut self) -> Result<SearchCriteria> {
        let search = SearchPage::new(self.surface.clone());

        self.surface.navigate(&self.config.landing_url()).await?;
        search.accept_cookies_if_present().await?;
        search.wait_for_loaded().await?;

        let departure_airport = search
            .select_random_departure_airport(&mut self.rng)
            .await?;
        let destination = search.select_random_destination(&mut self.rng).await?;
        let departure_date = search.select_random_departure_date(&mut self.rng).await?;
        search.select_duration(self.scenario.duration).await?;
        let child_age = search
            .configure_rooms_and_guests(
                self.scenario.adults,
                self.scenario.children,
                self.scenario.child_age,
                &mut self.rng,
            )
            .await?;

        let criteria = SearchCriteria {
            departure_airport,
            destination,
            departure_date,
            duration: self.scenario.duration,
            adults: self.scenario.adults,
            children: self.scenario.children,
            child_age,
        };
        log::info!(
            "searching {} -> {} departing {} for {} nights",
            criteria.departure_airport,
            criteria.destination,
            criteria.departure_date,
            criteria.duration
        );

        search.submit_search().await?;
        Ok(criteria)
    }

    /// One pass over hotel `index`: select it, walk hotel details and flights,
    /// then run the passenger validation battery.
    async fn attempt(
        &self,
        results: &ResultsPage,
        results_url: &str,
        index: usize,
    ) -> Result<AttemptOutcome> {
        if index > 0 {
            self.surface.navigate(results_url).await?;
            results.wait_for_loaded().await?;
        }

        let hotel = results.hotel_details(index).await?;
        log::info!(
            "attempt {}: hotel {:?} ({}, {})",
            index + 1,
            hotel.name,
            hotel.price,
            hotel.board_type
        );
        results.select_hotel(index).await?;

        let hotel_page = HotelDetailsPage::new(self.surface.clone());
        if let Err(err) = hotel_page.wait_for_loaded().await {
            if hotel_page.error_banner_visible().await {
                return Ok(AttemptOutcome::Advance(
                    "hotel details replaced by an error banner",
                ));
            }
            return Err(err);
        }
        if let Some(banner) = hotel_page.error_banner().await? {
            log::warn!("hotel details banner: {} {}", banner.title, banner.description);
            return Ok(AttemptOutcome::Advance("hotel details showed an error banner"));
        }
        hotel_page.proceed().await?;

        let flights = FlightsPage::new(self.surface.clone());
        match flights.wait_for_outcome().await? {
            FlightsOutcome::Errored => {
                return Ok(AttemptOutcome::Advance("flights showed an error banner"));
            }
            FlightsOutcome::TimedOut => {
                return Ok(AttemptOutcome::Advance("flights never became ready"));
            }
            FlightsOutcome::Loaded => {}
        }
        flights.proceed().await?;

        let passenger = PassengerPage::new(self.surface.clone());
        passenger.wait_for_loaded().await?;
        if passenger.error_banner_visible().await {
            bail!("passenger details showed an error banner");
        }

        passenger.run_inline_checks().await?;
        let validation = passenger.validate_form_fields().await?;
        verify_required(&validation)?;

        Ok(AttemptOutcome::Complete { hotel, validation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeDriver;
    use crate::scenario;

    const SEARCH_BUTTON: &str = "[data-test-id=\"search-button\"]";
    const AIRPORTS_ROOT: &str = ".DropModal__dropModalContent.dropModalScope_airports";
    const DESTINATIONS_ROOT: &str = ".DropModal__dropModalContent.dropModalScope_destinations";
    const DATES_ROOT: &str = ".DropModal__dropModalContent.dropModalScope_Departuredate";
    const ROOMS_ROOT: &str = ".DropModal__dropModalContent.dropModalScope_roomandguest";

    const RESULTS_CONTAINER: &str = "[data-test-id=\"search-results-list\"]";
    const HOTEL_ITEMS: &str = "section.ResultListItemV2__resultItem";
    const STAGE_CONTINUE: &str = ".ProgressbarNavigation__summaryButton button";
    const FLIGHTS_CONTAINER: &str = ".YourFlights__yourFlightComponent";
    const BANNER: &str = ".ErrorBanner__errorBannerWrapper";

    const PAX_FORM: &str = "#pax-form";
    const PAX_CONTINUE: &str = "#PassengerV2ContinueButton__component button";
    const ALERT: &str = ".alerts__alert";
    const ALERT_TEXT: &str = ".alerts__alertText";
    const ERROR_LIKE: &str = ".inputs__error, .inputs__errorText, span[class*=\"error\"]";
    const DOB_ERROR: &str =
        ".DateOfBirth__inputDOBWrapper#0 >> .inputs__error.inputs__errorMessageWithIcon";

    const REQUIRED_MESSAGES: [&str; 9] = [
        "Vul de voornaam in zoals in het paspoort",
        "Vul de achternaam in zoals in het paspoort",
        "Vul je geboortedatum in (DD/MM/JJJJ)",
        "Vul een geldig e-mailadres in",
        "Vul je straatnaam in",
        "Vul je huisnummer in",
        "Vul je postcode in",
        "Vul je woonplaats in",
        "Vul een geldig telefoonnummer in",
    ];

    fn prime_search(fake: &FakeDriver) {
        fake.set_visible(SEARCH_BUTTON, true);

        // Each modal: visible on open and during selection, hidden after save.
        fake.push_visible(AIRPORTS_ROOT, &[true, true, false]);
        let airports = format!("{AIRPORTS_ROOT} .SelectAirports__childrenGroup ul li label");
        fake.set_count(&airports, 2);
        fake.set_text(&format!("{airports}#0"), "Alle luchthavens");
        fake.set_text(&format!("{airports}#1"), "Amsterdam");

        fake.push_visible(DESTINATIONS_ROOT, &[true, true, false]);
        let destinations =
            format!("{DESTINATIONS_ROOT} .DestinationsList__destinationListStyle li a");
        fake.set_count(&destinations, 1);
        fake.set_text(&format!("{destinations}#0"), "Kreta");

        fake.push_visible(DATES_ROOT, &[true, true, false]);
        let dates =
            format!("{DATES_ROOT} td.SelectLegacyDate__cell.SelectLegacyDate__available");
        fake.set_count(&dates, 1);
        fake.set_text(&format!("{dates}#0"), "12");

        fake.push_visible(ROOMS_ROOT, &[true, false]);
    }

    fn prime_hotel_entry(fake: &FakeDriver, index: usize, name: &str) {
        let item = format!("{HOTEL_ITEMS}#{index}");
        fake.set_text(&format!("{item} >> [data-test-id=\"hotel-name\"] span"), name);
        fake.set_text(
            &format!("{item} >> [data-test-id=\"per-person-price-currency\"]"),
            "€",
        );
        fake.set_text(
            &format!("{item} >> [data-test-id=\"per-person-price-value\"]"),
            "499",
        );
        fake.set_text(&format!("{item} >> .ResultListItemV2__boardType"), "(logies ontbijt)");
        fake.set_text(&format!("{item} >> .ResultListItemV2__ratingNumber"), "8.4");
        let buttons = format!("{item} >> [data-test-id=\"continue-button\"]");
        fake.set_count(&buttons, 1);
        fake.set_visible(&format!("{buttons}#0"), true);
    }

    fn prime_results(fake: &FakeDriver, count: usize) {
        fake.set_visible(RESULTS_CONTAINER, true);
        fake.set_visible(&format!("{HOTEL_ITEMS}#0"), true);
        fake.set_count(HOTEL_ITEMS, count);
        for i in 0..count {
            prime_hotel_entry(fake, i, &format!("Hotel {i}"));
        }
    }

    fn prime_booking_stages(fake: &FakeDriver) {
        fake.set_visible(STAGE_CONTINUE, true);
        fake.set_visible(FLIGHTS_CONTAINER, true);
        fake.set_visible(PAX_FORM, true);
        fake.set_visible(PAX_CONTINUE, true);
    }

    /// Scripts one inline-validated field: `invalid_probes` rejections, then
    /// one acceptance.
    fn prime_inline_field(fake: &FakeDriver, input: &str, invalid_probes: usize, message: &str) {
        let error = format!(".inputs__outer:has({input}) .inputs__errorMessage");
        let mut input_classes = vec![Some("inputs__error"); invalid_probes];
        input_classes.push(Some("inputs__field"));
        fake.push_attrs(input, "class", &input_classes);
        let mut error_classes = vec![Some("inputs__show"); invalid_probes];
        error_classes.push(None);
        fake.push_attrs(&error, "class", &error_classes);
        fake.set_text(&error, message);
    }

    fn prime_inline_checks(fake: &FakeDriver) {
        prime_inline_field(fake, "[name=\"email\"]", 3, "Vul een geldig e-mailadres in");
        prime_inline_field(
            fake,
            "[name=\"paxInfoFormBean[0].firstName\"]",
            3,
            "Vul de voornaam in zoals in het paspoort",
        );
        prime_inline_field(fake, "[name=\"mobileNum\"]", 3, "Vul een geldig telefoonnummer in");
        prime_inline_field(
            fake,
            "input[placeholder=\"bijv. PROMO100\"]",
            1,
            "Deze kortingscode is niet geldig",
        );
        fake.push_visible(DOB_ERROR, &[true, true, false, false]);
        fake.set_text(DOB_ERROR, "Vul je geboortedatum in (DD/MM/JJJJ)");
        prime_inline_field(fake, "[name=\"address1\"]", 1, "Vul je straatnaam in");
    }

    fn prime_validation_summary(fake: &FakeDriver) {
        fake.set_visible(ALERT, true);
        fake.set_text(ALERT_TEXT, "Controleer de rood gemarkeerde velden");
        fake.set_count(ERROR_LIKE, REQUIRED_MESSAGES.len());
        for (i, message) in REQUIRED_MESSAGES.iter().enumerate() {
            fake.set_visible(&format!("{ERROR_LIKE}#{i}"), true);
            fake.set_text(&format!("{ERROR_LIKE}#{i}"), message);
        }
    }

    fn prime_happy_path(fake: &FakeDriver, hotel_count: usize) {
        prime_search(fake);
        prime_results(fake, hotel_count);
        prime_booking_stages(fake);
        prime_inline_checks(fake);
        prime_validation_summary(fake);
    }

    fn journey(fake: Arc<FakeDriver>, max_hotel_retries: usize) -> Journey {
        let config = JourneyConfig {
            max_hotel_retries,
            ..JourneyConfig::default()
        };
        let scenario = scenario::get_scenario("couple").unwrap();
        Journey::new(fake, config, scenario, 1337)
    }

    #[test]
    fn completes_on_the_first_hotel_attempt() {
        let fake = Arc::new(FakeDriver::new());
        prime_happy_path(&fake, 3);
        let mut journey = journey(fake.clone(), 3);

        let report = tokio_test::block_on(journey.run()).expect("journey completes");
        assert_eq!(report.attempts, 1);
        assert_eq!(report.hotel.name, "Hotel 0");
        assert_eq!(report.hotel.index, 0);
        assert_eq!(report.criteria.departure_airport, "Amsterdam");
        assert_eq!(report.criteria.destination, "Kreta");
        assert_eq!(report.criteria.departure_date, "12");
        assert_eq!(report.criteria.duration, 10);
        assert_eq!(report.criteria.children, 0);
        assert!(report.validation.alert_visible);
        assert!(report.validation.field_errors.len() >= 9);

        // One navigation only: the landing page.
        assert_eq!(fake.navigations().len(), 1);
        // The committed duration used the night-count label.
        assert!(fake
            .selections()
            .iter()
            .any(|(_, v)| v == "10 nachten"));
    }

    #[test]
    fn hotel_error_banner_advances_to_the_next_result() {
        let fake = Arc::new(FakeDriver::new());
        prime_happy_path(&fake, 3);
        // Clean results render, banner on the first hotel-details probe,
        // gone afterwards.
        fake.push_visible(BANNER, &[false, true, false]);
        let mut journey = journey(fake.clone(), 3);

        let report = tokio_test::block_on(journey.run()).expect("second hotel works");
        assert_eq!(report.attempts, 2);
        assert_eq!(report.hotel.name, "Hotel 1");
        assert_eq!(report.hotel.index, 1);

        // Landing page plus one re-navigation to the captured results URL.
        let navigations = fake.navigations();
        assert_eq!(navigations.len(), 2);
        assert_eq!(navigations[0], navigations[1]);
    }

    #[test]
    fn exhausting_the_retry_budget_reports_the_attempt_count() {
        let fake = Arc::new(FakeDriver::new());
        prime_search(&fake);
        prime_results(&fake, 2);
        fake.set_visible(STAGE_CONTINUE, true);
        // Every attempt finds the hotel-details banner.
        fake.set_visible(BANNER, true);
        let mut journey = journey(fake.clone(), 2);

        let err = tokio_test::block_on(journey.run()).expect_err("no hotel ever works");
        let journey_err = err.downcast_ref::<JourneyError>().expect("typed");
        assert!(matches!(journey_err, JourneyError::Exhausted { attempts: 2 }));
        assert!(err.to_string().contains("2 hotel attempts"));
    }

    #[test]
    fn flights_timeout_consumes_an_attempt() {
        let fake = Arc::new(FakeDriver::new());
        prime_search(&fake);
        prime_results(&fake, 1);
        fake.set_visible(STAGE_CONTINUE, true);
        // Flights content never renders and no banner shows.
        let mut journey = journey(fake.clone(), 1);

        let err = tokio_test::block_on(journey.run()).expect_err("budget of one");
        let journey_err = err.downcast_ref::<JourneyError>().expect("typed");
        assert!(matches!(journey_err, JourneyError::Exhausted { attempts: 1 }));
    }

    #[test]
    fn field_assertion_failures_are_fatal_and_skip_the_retry_loop() {
        let fake = Arc::new(FakeDriver::new());
        prime_search(&fake);
        prime_results(&fake, 3);
        prime_booking_stages(&fake);
        // The first inline probe never gets the invalid marker.
        fake.set_attr("[name=\"email\"]", "class", Some("inputs__field"));
        let mut journey = journey(fake.clone(), 3);

        let err = tokio_test::block_on(journey.run()).expect_err("target defect");
        let journey_err = err.downcast_ref::<JourneyError>().expect("typed");
        assert!(matches!(journey_err, JourneyError::FieldAssertion { .. }));
        // No retry: only the landing navigation happened.
        assert_eq!(fake.navigations().len(), 1);
    }
}
