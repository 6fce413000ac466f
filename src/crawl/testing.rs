// src/crawl/testing.rs
// =============================================================================
// A scripted PageFetcher for tests: serves canned pages from memory and
// remembers the order in which URLs were requested.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::fetch::{FetchedPage, PageFetcher};
use crate::error::FetchError;

#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<FetchedPage, String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` as text/html from `url`
    pub fn html(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(page(url, 200, Some("text/html; charset=utf-8"), body)));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Ok(page(url, status, Some("text/html"), "")));
        self
    }

    pub fn content_type(mut self, url: &str, content_type: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(page(url, 200, Some(content_type), "")));
        self
    }

    /// `url` redirects to `final_url`, which serves `body`
    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(page(final_url, 200, Some("text/html"), body)));
        self
    }

    pub fn transport_error(mut self, url: &str, message: &str) -> Self {
        self.pages.insert(url.to_string(), Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn page(final_url: &str, status: u16, content_type: Option<&str>, body: &str) -> FetchedPage {
    FetchedPage {
        status,
        final_url: final_url.to_string(),
        content_type: content_type.map(str::to_string),
        body: body.to_string(),
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.pages.get(url) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(FetchError::Connect(message.clone())),
            None => Ok(page(url, 404, Some("text/html"), "")),
        }
    }
}
