use rand::Rng;

use crate::error::JourneyError;

/// One enumerable UI item as seen by the selection engine.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    pub selectable: bool,
}

impl Candidate {
    pub fn new(text: impl Into<String>, selectable: bool) -> Self {
        Self {
            text: text.into(),
            selectable,
        }
    }
}

/// Picks one candidate uniformly at random after filtering out empty,
/// excluded (substring match) and non-selectable items. Returns the index
/// into the original slice so the caller can activate the matching element.
pub fn pick_random<R: Rng + ?Sized>(
    candidates: &[Candidate],
    exclude_texts: &[&str],
    modal: &str,
    rng: &mut R,
) -> Result<usize, JourneyError> {
    let eligible: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            let text = c.text.trim();
            !text.is_empty()
                && c.selectable
                && !exclude_texts.iter().any(|ex| text.contains(ex))
        })
        .map(|(i, _)| i)
        .collect();

    if eligible.is_empty() {
        return Err(JourneyError::NoSelectableItems {
            modal: modal.to_string(),
        });
    }

    Ok(eligible[rng.gen_range(0..eligible.len())])
}
