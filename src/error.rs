use std::time::Duration;
use thiserror::Error;

/// Typed failure conditions of the booking journey. Recoverable conditions
/// (hotel or flights unavailability) never surface as errors at all - they
/// are folded into the hotel-retry loop. Everything here either aborts the
/// current attempt or the whole journey.
#[derive(Debug, Error)]
pub enum JourneyError {
    /// A stage produced neither a ready signal nor an error banner in budget.
    #[error("{stage}: neither ready nor error banner appeared within {timeout:?}")]
    StageLoad {
        stage: &'static str,
        timeout: Duration,
    },

    /// Random selection filtered every candidate out.
    #[error("{modal}: no selectable items found")]
    NoSelectableItems { modal: String },

    /// Results-stage indexing misuse.
    #[error("hotel index {index} out of range, only {count} results visible")]
    IndexOutOfRange { index: usize, count: usize },

    /// A result item had no visible continue control.
    #[error("result item {index}: no visible continue control found")]
    NoVisibleAction { index: usize },

    /// Inline validation expectation not met. Genuine target defect:
    /// never retried, surfaces immediately with full context.
    #[error("{field}: {detail} (input value {value:?})")]
    FieldAssertion {
        field: String,
        value: String,
        detail: String,
    },

    /// Hotel-retry budget exhausted without a passenger validation result.
    #[error("failed to complete booking after {attempts} hotel attempts")]
    Exhausted { attempts: usize },
}

impl JourneyError {
    pub fn field_assertion(
        field: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::FieldAssertion {
            field: field.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }

    /// Fatal errors abort the journey instead of advancing the hotel index.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FieldAssertion { .. } | Self::Exhausted { .. })
    }
}
