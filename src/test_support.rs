//! In-memory fakes for the network seams.

use crate::fetch::{FetchError, PageFetcher};
use crate::resolver::WebsiteResolver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves canned pages by exact URL and records every request in order.
/// Unknown URLs answer HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }
}

/// Resolves company names from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct FakeResolver {
    websites: HashMap<String, String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_website(mut self, company_name: &str, url: &str) -> Self {
        self.websites.insert(company_name.to_string(), url.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl WebsiteResolver for FakeResolver {
    async fn resolve_website(&self, company_name: &str) -> Option<String> {
        self.queries.lock().unwrap().push(company_name.to_string());
        self.websites.get(company_name).cloned()
    }
}
