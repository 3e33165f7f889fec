use anyhow::{bail, Result};
use rand::Rng;

use super::Surface;
use crate::driver::Locator;
use crate::selection::{pick_random, Candidate};

const CHECKBOX: &str = "input[type=\"checkbox\"]";

/// Static description of one drop modal (airports, destinations, dates,
/// rooms/guests): where it lives, what opens it, and what its items are.
#[derive(Debug, Clone, Copy)]
pub struct DropModalSpec {
    pub name: &'static str,
    /// Modal root selector.
    pub root: &'static str,
    /// Control that opens the modal; `None` when the caller opens it.
    pub trigger: Option<&'static str>,
    /// Save/apply control, relative to the root.
    pub save_button: &'static str,
    /// Item selector, relative to the root.
    pub items: &'static str,
}

/// One drop modal. Open, pick (optionally at random) and save; the modal is
/// expected to stay open between selection and save.
pub struct DropModal {
    surface: Surface,
    spec: DropModalSpec,
}

impl DropModal {
    pub fn new(surface: Surface, spec: DropModalSpec) -> Self {
        Self { surface, spec }
    }

    fn root(&self) -> Locator {
        Locator::new(self.spec.root)
    }

    fn items(&self) -> Locator {
        Locator::new(format!("{} {}", self.spec.root, self.spec.items))
    }

    pub async fn open(&self) -> Result<()> {
        let Some(trigger) = self.spec.trigger else {
            bail!("{}: no trigger configured for this modal", self.spec.name);
        };
        self.surface.click(&Locator::new(trigger)).await?;
        self.surface.wait_visible(&self.root()).await
    }

    pub async fn save(&self) -> Result<()> {
        self.surface
            .click(&self.root().child(self.spec.save_button))
            .await?;
        self.surface.wait_hidden(&self.root()).await
    }

    /// Activates one eligible item uniformly at random and returns its text.
    /// Items with a checkbox are eligible unless the checkbox is disabled;
    /// all others are eligible unless a disabled-style class is present.
    pub async fn select_random_item<R: Rng + ?Sized>(
        &self,
        exclude_texts: &[&str],
        rng: &mut R,
    ) -> Result<String> {
        self.surface.wait_visible(&self.root()).await?;

        let driver = self.surface.driver();
        let items = self.items();
        let count = driver.count(&items).await?;

        let mut candidates = Vec::with_capacity(count);
        for i in 0..count {
            let item = items.clone().nth(i);
            let text = driver.text(&item).await?.trim().to_string();

            let checkbox = item.clone().child(CHECKBOX);
            let selectable = if driver.count(&checkbox).await? > 0 {
                driver.attr(&checkbox, "disabled").await?.is_none()
            } else {
                let class = driver.attr(&item, "class").await?.unwrap_or_default();
                !class.contains("disabled") && !class.contains("Disabled")
            };

            candidates.push(Candidate::new(text, selectable));
        }

        let chosen = pick_random(&candidates, exclude_texts, self.spec.name, rng)?;
        self.surface.click(&items.clone().nth(chosen)).await?;
        log::debug!(
            "{}: selected item {} ({:?})",
            self.spec.name,
            chosen,
            candidates[chosen].text
        );
        Ok(candidates[chosen].text.clone())
    }
}
