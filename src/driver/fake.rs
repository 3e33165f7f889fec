//! Scripted driver for unit tests. Per-locator response queues are consumed
//! one observation at a time, with the last entry sticky, so a test can
//! script "banner on the first probe, gone on the second" without modelling
//! the page.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::{Locator, PageDriver};

#[derive(Default)]
struct FakeState {
    visible: HashMap<String, VecDeque<bool>>,
    texts: HashMap<String, VecDeque<String>>,
    attrs: HashMap<(String, String), VecDeque<Option<String>>>,
    counts: HashMap<String, VecDeque<usize>>,
    url: String,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    blurs: Vec<String>,
    selections: Vec<(String, String)>,
    navigations: Vec<String>,
}

fn take<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<FakeState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&self, key: &str, visible: bool) {
        self.push_visible(key, &[visible]);
    }

    pub fn push_visible(&self, key: &str, observations: &[bool]) {
        let mut state = self.state.lock().unwrap();
        state
            .visible
            .entry(key.to_string())
            .or_default()
            .extend(observations.iter().copied());
    }

    pub fn set_text(&self, key: &str, text: &str) {
        self.push_texts(key, &[text]);
    }

    pub fn push_texts(&self, key: &str, observations: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state
            .texts
            .entry(key.to_string())
            .or_default()
            .extend(observations.iter().map(|t| (*t).to_string()));
    }

    pub fn set_attr(&self, key: &str, name: &str, value: Option<&str>) {
        self.push_attrs(key, name, &[value]);
    }

    pub fn push_attrs(&self, key: &str, name: &str, observations: &[Option<&str>]) {
        let mut state = self.state.lock().unwrap();
        state
            .attrs
            .entry((key.to_string(), name.to_string()))
            .or_default()
            .extend(observations.iter().map(|v| v.map(str::to_string)));
    }

    pub fn set_count(&self, key: &str, count: usize) {
        let mut state = self.state.lock().unwrap();
        state
            .counts
            .entry(key.to_string())
            .or_default()
            .push_back(count);
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().url = url.to_string();
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().fills.clone()
    }

    pub fn blurs(&self) -> Vec<String> {
        self.state.lock().unwrap().blurs.clone()
    }

    pub fn selections(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().selections.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    fn observe_visible(&self, key: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        state
            .visible
            .get_mut(key)
            .and_then(take)
            .unwrap_or(false)
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_visible(&self, target: &Locator, timeout: Duration) -> Result<()> {
        if self.observe_visible(&target.key()) {
            Ok(())
        } else {
            bail!("{target}: not visible within {timeout:?}")
        }
    }

    async fn wait_hidden(&self, target: &Locator, timeout: Duration) -> Result<()> {
        if self.observe_visible(&target.key()) {
            bail!("{target}: still visible after {timeout:?}")
        } else {
            Ok(())
        }
    }

    async fn is_visible(&self, target: &Locator, _timeout: Duration) -> Result<bool> {
        Ok(self.observe_visible(&target.key()))
    }

    async fn click(&self, target: &Locator, _timeout: Duration) -> Result<()> {
        self.state.lock().unwrap().clicks.push(target.key());
        Ok(())
    }

    async fn text(&self, target: &Locator) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .texts
            .get_mut(&target.key())
            .and_then(take)
            .unwrap_or_default())
    }

    async fn attr(&self, target: &Locator, name: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .attrs
            .get_mut(&(target.key(), name.to_string()))
            .and_then(take)
            .flatten())
    }

    async fn count(&self, target: &Locator) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .counts
            .get_mut(&target.key())
            .and_then(take)
            .unwrap_or(0))
    }

    async fn fill(&self, target: &Locator, value: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .fills
            .push((target.key(), value.to_string()));
        Ok(())
    }

    async fn blur(&self, target: &Locator) -> Result<()> {
        self.state.lock().unwrap().blurs.push(target.key());
        Ok(())
    }

    async fn select_by_value(&self, target: &Locator, value: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .selections
            .push((target.key(), value.to_string()));
        Ok(())
    }

    async fn select_by_label(&self, target: &Locator, label: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .selections
            .push((target.key(), label.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_queue_is_sticky_on_last_entry() {
        let fake = FakeDriver::new();
        fake.push_visible("banner", &[true, false]);
        let loc = Locator::new("banner");
        tokio_test::block_on(async {
            assert!(fake.is_visible(&loc, Duration::ZERO).await.unwrap());
            assert!(!fake.is_visible(&loc, Duration::ZERO).await.unwrap());
            assert!(!fake.is_visible(&loc, Duration::ZERO).await.unwrap());
        });
    }

    #[test]
    fn unknown_locators_default_to_absent() {
        let fake = FakeDriver::new();
        let loc = Locator::new("#missing");
        tokio_test::block_on(async {
            assert!(!fake.is_visible(&loc, Duration::ZERO).await.unwrap());
            assert_eq!(fake.text(&loc).await.unwrap(), "");
            assert_eq!(fake.attr(&loc, "class").await.unwrap(), None);
            assert_eq!(fake.count(&loc).await.unwrap(), 0);
        });
    }

    #[test]
    fn interactions_are_recorded_in_order() {
        let fake = FakeDriver::new();
        let button = Locator::new("button");
        let field = Locator::new("input");
        tokio_test::block_on(async {
            fake.click(&button, Duration::ZERO).await.unwrap();
            fake.fill(&field, "hello").await.unwrap();
            fake.blur(&field).await.unwrap();
            fake.navigate("https://example.test", Duration::ZERO).await.unwrap();
        });
        assert_eq!(fake.clicks(), vec!["button"]);
        assert_eq!(fake.fills(), vec![("input".to_string(), "hello".to_string())]);
        assert_eq!(fake.blurs(), vec!["input"]);
        assert_eq!(fake.navigations(), vec!["https://example.test"]);
        assert_eq!(
            tokio_test::block_on(fake.current_url()).unwrap(),
            "https://example.test"
        );
    }
}
