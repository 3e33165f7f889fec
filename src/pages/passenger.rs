use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use super::Surface;
use crate::domain::{FieldValidationError, PassengerValidationResult};
use crate::driver::Locator;
use crate::error::JourneyError;
use crate::validation::classify;

const PASSENGER_FORM: &str = "#pax-form";
const CONTINUE_BUTTON: &str = "#PassengerV2ContinueButton__component button";
const VALIDATION_ALERT: &str = ".alerts__alert";
const VALIDATION_ALERT_TEXT: &str = ".alerts__alertText";
/// Anything error-like that the aggregator scans for.
const ERROR_LIKE: &str = ".inputs__error, .inputs__errorText, span[class*=\"error\"]";

const DOB_WRAPPER: &str = ".DateOfBirth__inputDOBWrapper";
const DOB_ERROR: &str = ".inputs__error.inputs__errorMessageWithIcon";

const INVALID_MARKER: &str = "inputs__error";
const SHOWN_MARKER: &str = "inputs__show";

static FIRST_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)voornaam|paspoort|minimaal|minimum|gebruik|letters|cijfers|speciale").unwrap()
});
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)e-?mail|e-mailadres|geldig|ongeldig").unwrap());
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)telefoonnummer|phone|mobiel").unwrap());
static PROMO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)kortingscode|niet geldig").unwrap());
static STREET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)straatnaam|street").unwrap());
static DOB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)geboortedatum|DD/MM/JJJJ").unwrap());

/// One inline-validated input: the field itself and its error region.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: String,
    pub input: Locator,
    pub error: Locator,
}

impl FieldSpec {
    /// Field addressed by its `name` attribute; the error region is the
    /// message container of the surrounding input wrapper.
    fn by_name(id: impl Into<String>, name: &str) -> Self {
        Self {
            id: id.into(),
            input: Locator::new(format!("[name=\"{name}\"]")),
            error: Locator::new(format!(
                ".inputs__outer:has([name=\"{name}\"]) .inputs__errorMessage"
            )),
        }
    }

    fn by_placeholder(id: impl Into<String>, placeholder: &str) -> Self {
        Self {
            id: id.into(),
            input: Locator::new(format!("input[placeholder=\"{placeholder}\"]")),
            error: Locator::new(format!(
                ".inputs__outer:has(input[placeholder=\"{placeholder}\"]) .inputs__errorMessage"
            )),
        }
    }
}

/// Passenger-details stage: inline field validation, the empty-form submit
/// and the error aggregation that produces the journey's terminal artifact.
pub struct PassengerPage {
    surface: Surface,
}

impl PassengerPage {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    fn first_name_field(passenger: usize) -> FieldSpec {
        FieldSpec::by_name(
            format!("firstName_{passenger}"),
            &format!("paxInfoFormBean[{passenger}].firstName"),
        )
    }

    fn dob_wrapper() -> Locator {
        Locator::new(DOB_WRAPPER).nth(0)
    }

    fn dob_input(part: &str) -> Locator {
        Self::dob_wrapper().child(format!("input[aria-label=\"{part}\"]"))
    }

    fn dob_error() -> Locator {
        Self::dob_wrapper().child(DOB_ERROR)
    }

    pub async fn wait_for_loaded(&self) -> Result<()> {
        let timeout = self.surface.timeouts().default;
        let load = async {
            self.surface
                .wait_visible(&Locator::new(PASSENGER_FORM))
                .await?;
            self.surface
                .wait_visible(&Locator::new(CONTINUE_BUTTON))
                .await
        };
        load.await.map_err(|_| JourneyError::StageLoad {
            stage: "passenger details",
            timeout,
        })?;
        Ok(())
    }

    pub async fn error_banner_visible(&self) -> bool {
        self.surface.error_banner_visible().await
    }

    /// Sets an invalid value, triggers field exit and requires the invalid
    /// marker, the shown error region and a message matching `pattern`.
    /// The wait for the error region is best-effort: rendered state is the
    /// source of truth.
    pub async fn assert_invalid(
        &self,
        field: &FieldSpec,
        value: &str,
        pattern: &Regex,
    ) -> Result<()> {
        let driver = self.surface.driver();
        driver.fill(&field.input, value).await?;
        driver.blur(&field.input).await?;

        let inline = self.surface.timeouts().inline;
        let _ = driver.wait_visible(&field.error, inline).await;

        let input_class = driver.attr(&field.input, "class").await?.unwrap_or_default();
        if !input_class.contains(INVALID_MARKER) {
            return Err(JourneyError::field_assertion(
                &field.id,
                value,
                format!("input should carry the {INVALID_MARKER:?} marker"),
            )
            .into());
        }

        let error_class = driver.attr(&field.error, "class").await?.unwrap_or_default();
        if !error_class.contains(SHOWN_MARKER) {
            return Err(JourneyError::field_assertion(
                &field.id,
                value,
                format!("error message should be shown ({SHOWN_MARKER:?} missing)"),
            )
            .into());
        }

        let error_text = driver.text(&field.error).await?.trim().to_string();
        if !pattern.is_match(&error_text) {
            return Err(JourneyError::field_assertion(
                &field.id,
                value,
                format!("error message {error_text:?} does not match pattern {pattern}"),
            )
            .into());
        }
        Ok(())
    }

    /// Symmetric valid probe: no invalid marker, no shown error region.
    /// Clears the field afterwards so no state leaks into later checks.
    pub async fn assert_valid(&self, field: &FieldSpec, value: &str) -> Result<()> {
        self.check_valid(field, value, true).await
    }

    async fn check_valid(&self, field: &FieldSpec, value: &str, clear_after: bool) -> Result<()> {
        let driver = self.surface.driver();
        driver.fill(&field.input, value).await?;
        driver.blur(&field.input).await?;

        let inline = self.surface.timeouts().inline;
        let _ = driver.wait_hidden(&field.error, inline).await;

        let input_class = driver.attr(&field.input, "class").await?.unwrap_or_default();
        if input_class.contains(INVALID_MARKER) {
            return Err(JourneyError::field_assertion(
                &field.id,
                value,
                format!("input should not carry the {INVALID_MARKER:?} marker"),
            )
            .into());
        }

        let error_class = driver.attr(&field.error, "class").await?.unwrap_or_default();
        if error_class.contains(SHOWN_MARKER) {
            let shown = driver.text(&field.error).await?.trim().to_string();
            return Err(JourneyError::field_assertion(
                &field.id,
                value,
                format!("error message should be hidden but shows {shown:?}"),
            )
            .into());
        }

        if clear_after {
            driver.fill(&field.input, "").await?;
            driver.blur(&field.input).await?;
        }
        Ok(())
    }

    pub async fn validate_first_name_inline(&self) -> Result<()> {
        let field = Self::first_name_field(0);
        self.assert_invalid(&field, "1234", &FIRST_NAME_PATTERN).await?;
        self.assert_invalid(&field, ";%:?*", &FIRST_NAME_PATTERN).await?;
        self.assert_invalid(&field, "   ", &FIRST_NAME_PATTERN).await?;
        self.assert_valid(&field, "Vitalii").await
    }

    pub async fn validate_email_inline(&self) -> Result<()> {
        let field = FieldSpec::by_name("email", "email");
        self.assert_invalid(&field, "not-an-email", &EMAIL_PATTERN).await?;
        self.assert_invalid(&field, "qa@@example", &EMAIL_PATTERN).await?;
        self.assert_invalid(&field, "   ", &EMAIL_PATTERN).await?;
        self.assert_valid(&field, "qa.test@example.com").await
    }

    pub async fn validate_mobile_inline(&self) -> Result<()> {
        let field = FieldSpec::by_name("mobileNum", "mobileNum");
        self.assert_invalid(&field, "123", &MOBILE_PATTERN).await?;
        self.assert_invalid(&field, "abc", &MOBILE_PATTERN).await?;
        self.assert_invalid(&field, "++++++", &MOBILE_PATTERN).await?;
        self.assert_valid(&field, "0612345678").await
    }

    /// The promo field keeps its valid value so the code is still in place
    /// for the submit that follows.
    pub async fn validate_promo_code_inline(&self) -> Result<()> {
        let field = FieldSpec::by_placeholder("promoCode", "bijv. PROMO100");
        self.assert_invalid(&field, ";%:?*()", &PROMO_PATTERN).await?;
        self.check_valid(&field, "1234567", false).await
    }

    pub async fn validate_address_inline(&self) -> Result<()> {
        let field = FieldSpec::by_name("address1", "address1");
        self.assert_invalid(&field, "   ", &STREET_PATTERN).await?;
        self.assert_valid(&field, "Main Street").await
    }

    /// Date of birth is a three-part composite validated as a unit against
    /// one shared error region: out-of-range day/month, a future year and a
    /// valid past date, then all three parts are cleared.
    pub async fn validate_dob_inline(&self) -> Result<()> {
        self.probe_dob_invalid("32", "13", "2000").await?;
        self.probe_dob_invalid("01", "01", "2100").await?;
        self.probe_dob_valid("01", "02", "1990").await?;
        self.fill_dob("", "", "").await
    }

    async fn fill_dob(&self, day: &str, month: &str, year: &str) -> Result<()> {
        let driver = self.surface.driver();
        driver.fill(&Self::dob_input("day"), day).await?;
        driver.fill(&Self::dob_input("month"), month).await?;
        driver.fill(&Self::dob_input("year"), year).await?;
        driver.blur(&Self::dob_input("year")).await
    }

    async fn probe_dob_invalid(&self, day: &str, month: &str, year: &str) -> Result<()> {
        self.fill_dob(day, month, year).await?;
        let value = format!("{day}/{month}/{year}");

        let driver = self.surface.driver();
        let inline = self.surface.timeouts().inline;
        if driver.wait_visible(&Self::dob_error(), inline).await.is_err() {
            return Err(JourneyError::field_assertion(
                "dob_0",
                value,
                "error region did not appear for invalid date",
            )
            .into());
        }
        let error_text = driver.text(&Self::dob_error()).await?.trim().to_string();
        if !DOB_PATTERN.is_match(&error_text) {
            return Err(JourneyError::field_assertion(
                "dob_0",
                value,
                format!("error message {error_text:?} does not match pattern {}", *DOB_PATTERN),
            )
            .into());
        }
        Ok(())
    }

    async fn probe_dob_valid(&self, day: &str, month: &str, year: &str) -> Result<()> {
        self.fill_dob(day, month, year).await?;

        let driver = self.surface.driver();
        let inline = self.surface.timeouts().inline;
        let _ = driver.wait_hidden(&Self::dob_error(), inline).await;

        if self.surface.is_visible(&Self::dob_error(), Duration::ZERO).await {
            let shown = driver.text(&Self::dob_error()).await?.trim().to_string();
            return Err(JourneyError::field_assertion(
                "dob_0",
                format!("{day}/{month}/{year}"),
                format!("error should be hidden for a valid date but shows {shown:?}"),
            )
            .into());
        }
        Ok(())
    }

    /// Runs every inline check in form order.
    pub async fn run_inline_checks(&self) -> Result<()> {
        self.validate_email_inline().await?;
        self.validate_first_name_inline().await?;
        self.validate_mobile_inline().await?;
        self.validate_promo_code_inline().await?;
        self.validate_dob_inline().await?;
        self.validate_address_inline().await
    }

    /// Clicks the final continue control and waits (best effort) for the
    /// form-level validation alert.
    pub async fn submit_empty(&self) -> Result<()> {
        self.surface.click(&Locator::new(CONTINUE_BUTTON)).await?;
        let _ = self
            .surface
            .driver()
            .wait_visible(&Locator::new(VALIDATION_ALERT), self.surface.timeouts().short)
            .await;
        Ok(())
    }

    pub async fn alert_visible(&self) -> bool {
        self.surface
            .is_visible(&Locator::new(VALIDATION_ALERT), self.surface.timeouts().short)
            .await
    }

    /// Pure classification pass over everything currently error-styled.
    /// Triggers nothing; callable at any point with any error count.
    pub async fn collect_field_errors(&self) -> Result<Vec<FieldValidationError>> {
        let driver = self.surface.driver();
        let scan = Locator::new(ERROR_LIKE);
        let count = driver.count(&scan).await?;

        let mut errors = Vec::new();
        for i in 0..count {
            let element = scan.clone().nth(i);
            if !driver.is_visible(&element, Duration::ZERO).await.unwrap_or(false) {
                continue;
            }
            let message = driver.text(&element).await?.trim().to_string();
            if message.is_empty() {
                continue;
            }
            errors.push(FieldValidationError {
                field_id: classify(&message).to_string(),
                message,
            });
        }
        Ok(errors)
    }

    /// Submit-empty, alert inspection and aggregation in one pass.
    pub async fn validate_form_fields(&self) -> Result<PassengerValidationResult> {
        self.submit_empty().await?;

        let alert_visible = self.alert_visible().await;
        let alert_message = if alert_visible {
            self.surface
                .peek_text(&Locator::new(VALIDATION_ALERT_TEXT))
                .await?
        } else {
            String::new()
        };
        let field_errors = self.collect_field_errors().await?;

        Ok(PassengerValidationResult {
            alert_visible,
            alert_message,
            field_errors,
        })
    }
}
