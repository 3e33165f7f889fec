use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

pub mod web;

#[cfg(test)]
pub mod fake;

/// A declarative element target: a CSS selector, an optional index into its
/// matches and an optional child selector scoped to that match. Two levels
/// cover every locator in the booking flow (result item -> continue button,
/// modal item -> checkbox).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub(crate) css: String,
    pub(crate) index: Option<usize>,
    pub(crate) child_css: Option<String>,
    pub(crate) child_index: Option<usize>,
}

impl Locator {
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            index: None,
            child_css: None,
            child_index: None,
        }
    }

    /// Narrows to the n-th match of the deepest selector set so far.
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        if self.child_css.is_some() {
            self.child_index = Some(index);
        } else {
            self.index = Some(index);
        }
        self
    }

    /// Scopes a child selector under the (indexed) root match.
    #[must_use]
    pub fn child(mut self, css: impl Into<String>) -> Self {
        self.child_css = Some(css.into());
        self.child_index = None;
        self
    }

    /// Canonical key used by scripted drivers and log lines.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = self.css.clone();
        if let Some(i) = self.index {
            key.push_str(&format!("#{i}"));
        }
        if let Some(child) = &self.child_css {
            key.push_str(" >> ");
            key.push_str(child);
            if let Some(i) = self.child_index {
                key.push_str(&format!("#{i}"));
            }
        }
        key
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// The one capability the journey needs from the outside world: asynchronous,
/// timeout-bounded interactions with a single browser session. A timeout is
/// always reported as an error or a `false`, never as a hang.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;
    async fn current_url(&self) -> Result<String>;

    /// Resolves once the target is rendered and displayed, errs on timeout.
    async fn wait_visible(&self, target: &Locator, timeout: Duration) -> Result<()>;
    /// Resolves once the target is gone or hidden, errs on timeout.
    async fn wait_hidden(&self, target: &Locator, timeout: Duration) -> Result<()>;
    /// Bounded probe: `false` on timeout instead of an error.
    async fn is_visible(&self, target: &Locator, timeout: Duration) -> Result<bool>;

    async fn click(&self, target: &Locator, timeout: Duration) -> Result<()>;
    /// Rendered text of the target, untrimmed absence reported as `""`.
    async fn text(&self, target: &Locator) -> Result<String>;
    async fn attr(&self, target: &Locator, name: &str) -> Result<Option<String>>;
    /// Number of matches of the deepest selector.
    async fn count(&self, target: &Locator) -> Result<usize>;

    async fn fill(&self, target: &Locator, value: &str) -> Result<()>;
    /// Field-exit trigger (blur-equivalent) so inline validation fires.
    async fn blur(&self, target: &Locator) -> Result<()>;
    async fn select_by_value(&self, target: &Locator, value: &str) -> Result<()>;
    async fn select_by_label(&self, target: &Locator, label: &str) -> Result<()>;
}
