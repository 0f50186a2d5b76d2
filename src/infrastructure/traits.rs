//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Response of an HTTP exchange: status code and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level HTTP failure (no response received).
#[derive(Error, Debug)]
#[error("{method} {url}: {message}")]
pub struct HttpError {
    pub method: &'static str,
    pub url: String,
    pub message: String,
}

/// HTTP client abstraction.
///
/// Non-success statuses are returned as responses, not errors, so callers
/// can react to specific codes.
pub trait HttpClient: Send + Sync {
    /// POST a JSON body.
    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<HttpResponse, HttpError>;

    /// GET a URL.
    fn get(&self, url: &Url) -> Result<HttpResponse, HttpError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real HTTP client backed by blocking reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bstv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError {
                method: "INIT",
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn finish(
        method: &'static str,
        url: &Url,
        response: reqwest::Result<reqwest::blocking::Response>,
    ) -> Result<HttpResponse, HttpError> {
        let err = |e: reqwest::Error| HttpError {
            method,
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = response.map_err(err)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(err)?;
        tracing::trace!("{method} {url} -> {status}");
        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<HttpResponse, HttpError> {
        tracing::debug!("POST {url}");
        let response = self.client.post(url.clone()).json(body).send();
        Self::finish("POST", url, response)
    }

    fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url.clone()).send();
        Self::finish("GET", url, response)
    }
}
