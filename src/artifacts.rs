use anyhow::{Context, Result};
use chrono::Utc;
use std::{fs, path::Path};
use thirtyfour::prelude::*;

/// Filesystem-safe scenario label: lowercase, runs of non-alphanumerics
/// collapsed to single dashes.
#[must_use]
pub fn scenario_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[must_use]
pub fn artifacts_dir(base: &str, browser: &str, scenario: &str, seed: u64) -> String {
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    format!("{base}/{browser}/{}/seed-{seed}/{ts}", scenario_slug(scenario))
}

/// Best-effort failure capture: screenshot, DOM snapshot, final URL and the
/// full error chain. Only directory creation is allowed to fail the call.
pub async fn capture_artifacts(driver: &WebDriver, dir: &str, err: &anyhow::Error) -> Result<()> {
    fs::create_dir_all(dir).context("creating artifacts dir")?;

    if let Ok(png) = driver.screenshot_as_png().await {
        let _ = fs::write(Path::new(dir).join("screenshot.png"), &png);
    }

    if let Ok(src) = driver.source().await {
        let _ = fs::write(Path::new(dir).join("dom.html"), src);
    }

    if let Ok(url) = driver.current_url().await {
        let _ = fs::write(Path::new(dir).join("url.txt"), url.to_string());
    }

    let chain = format!("{err:#}");
    let _ = fs::write(Path::new(dir).join("error.txt"), chain);

    Ok(())
}
