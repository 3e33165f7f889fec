use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;

use super::{Locator, PageDriver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
    Safari,
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub remote_hub: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            remote_hub: None,
        }
    }
}

pub async fn new_session(kind: BrowserKind, cfg: &BrowserConfig) -> WebDriverResult<WebDriver> {
    let driver = match kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:9515");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg
                .remote_hub
                .as_deref()
                .unwrap_or("http://localhost:17556");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:4444");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Safari => {
            let caps = DesiredCapabilities::safari();
            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:4445");
            WebDriver::new(url, caps).await?
        }
    };

    Ok(driver)
}

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const ACTION_WAIT: Duration = Duration::from_secs(15);

/// `PageDriver` over a live WebDriver session. Waits are explicit poll loops
/// so an empty match list returns immediately instead of blocking on an
/// implicit-wait budget.
pub struct WebPageDriver {
    driver: WebDriver,
}

impl WebPageDriver {
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// The underlying session, for artifact capture and teardown.
    #[must_use]
    pub const fn session(&self) -> &WebDriver {
        &self.driver
    }

    async fn resolve(&self, target: &Locator) -> Result<Option<WebElement>> {
        let matches = self.driver.find_all(By::Css(target.css.as_str())).await?;
        let Some(root) = matches.get(target.index.unwrap_or(0)).cloned() else {
            return Ok(None);
        };
        let Some(child_css) = &target.child_css else {
            return Ok(Some(root));
        };
        let children = root.find_all(By::Css(child_css.as_str())).await?;
        Ok(children.get(target.child_index.unwrap_or(0)).cloned())
    }

    async fn displayed(&self, target: &Locator) -> bool {
        match self.resolve(target).await {
            Ok(Some(elem)) => elem.is_displayed().await.unwrap_or(false),
            _ => false,
        }
    }

    async fn await_visible(&self, target: &Locator, timeout: Duration) -> Result<WebElement> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(Some(elem)) = self.resolve(target).await {
                if elem.is_displayed().await.unwrap_or(false) {
                    return Ok(elem);
                }
            }
            if Instant::now() >= deadline {
                bail!("{target}: not visible within {timeout:?}");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageDriver for WebPageDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.driver.set_page_load_timeout(timeout).await?;
        self.driver
            .goto(url)
            .await
            .with_context(|| format!("navigating to {url}"))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn wait_visible(&self, target: &Locator, timeout: Duration) -> Result<()> {
        self.await_visible(target, timeout).await.map(|_| ())
    }

    async fn wait_hidden(&self, target: &Locator, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.displayed(target).await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("{target}: still visible after {timeout:?}");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&self, target: &Locator, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.displayed(target).await {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, target: &Locator, timeout: Duration) -> Result<()> {
        let elem = self.await_visible(target, timeout).await?;
        elem.click()
            .await
            .with_context(|| format!("clicking {target}"))?;
        Ok(())
    }

    async fn text(&self, target: &Locator) -> Result<String> {
        match self.resolve(target).await? {
            Some(elem) => Ok(elem.text().await?),
            None => Ok(String::new()),
        }
    }

    async fn attr(&self, target: &Locator, name: &str) -> Result<Option<String>> {
        match self.resolve(target).await? {
            Some(elem) => Ok(elem.attr(name).await?),
            None => Ok(None),
        }
    }

    async fn count(&self, target: &Locator) -> Result<usize> {
        if let Some(child_css) = &target.child_css {
            let matches = self.driver.find_all(By::Css(target.css.as_str())).await?;
            match matches.get(target.index.unwrap_or(0)) {
                Some(root) => Ok(root.find_all(By::Css(child_css.as_str())).await?.len()),
                None => Ok(0),
            }
        } else {
            Ok(self.driver.find_all(By::Css(target.css.as_str())).await?.len())
        }
    }

    async fn fill(&self, target: &Locator, value: &str) -> Result<()> {
        let elem = self.await_visible(target, ACTION_WAIT).await?;
        elem.clear().await?;
        if !value.is_empty() {
            elem.send_keys(value).await?;
        }
        Ok(())
    }

    async fn blur(&self, target: &Locator) -> Result<()> {
        let Some(elem) = self.resolve(target).await? else {
            bail!("{target}: cannot blur, element not found");
        };
        self.driver
            .execute("arguments[0].blur()", vec![elem.to_json()?])
            .await?;
        Ok(())
    }

    async fn select_by_value(&self, target: &Locator, value: &str) -> Result<()> {
        let select = self.await_visible(target, ACTION_WAIT).await?;
        let option = select
            .find(By::Css(format!("option[value='{value}']").as_str()))
            .await
            .with_context(|| format!("{target}: no option with value {value:?}"))?;
        option.click().await?;
        Ok(())
    }

    async fn select_by_label(&self, target: &Locator, label: &str) -> Result<()> {
        let select = self.await_visible(target, ACTION_WAIT).await?;
        let options = select.find_all(By::Css("option")).await?;
        for option in options {
            if option.text().await?.trim() == label {
                option.click().await?;
                return Ok(());
            }
        }
        bail!("{target}: no option labelled {label:?}")
    }
}
