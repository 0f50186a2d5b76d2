//! Shared test helpers

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use url::Url;

use bstv::config::Settings;
use bstv::infrastructure::di::ServiceContainer;
use bstv::infrastructure::traits::{HttpClient, HttpError, HttpResponse, RealFileSystem};

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Post { url: String, body: serde_json::Value },
    Get { url: String },
}

/// HTTP client that replays queued responses and records requests.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, method: &'static str, url: &Url) -> Result<HttpResponse, HttpError> {
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no response queued".to_string()));
        next.map_err(|message| HttpError {
            method,
            url: url.to_string(),
            message,
        })
    }
}

impl HttpClient for MockHttpClient {
    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(Recorded::Post {
            url: url.to_string(),
            body: body.clone(),
        });
        self.next("POST", url)
    }

    fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(Recorded::Get {
            url: url.to_string(),
        });
        self.next("GET", url)
    }
}

/// Settings pointing the store into `dir`.
pub fn settings_in(dir: &TempDir) -> Settings {
    Settings {
        data_dir: dir.path().to_path_buf(),
        api_base: "http://localhost:9999/api".to_string(),
        history_limit: 100,
        timeout_secs: 5,
    }
}

/// Container over the real filesystem and a mock HTTP client.
pub fn container_in(dir: &TempDir, http: Arc<MockHttpClient>) -> ServiceContainer {
    ServiceContainer::with_deps(settings_in(dir), Arc::new(RealFileSystem), http)
}

/// Canned remote response body.
pub fn tree_response_body(id: &str) -> String {
    serde_json::json!({
        "id": id,
        "numbers": [8, 3, 10],
        "bst": {"value": 8, "left": null, "right": null},
        "balancedBst": null,
        "createdAt": "2024-05-01T12:00:00.000Z"
    })
    .to_string()
}
