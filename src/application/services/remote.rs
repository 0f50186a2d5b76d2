//! Remote tree API client
//!
//! Submits numbers to the backend. Servers that only expose the read-style
//! endpoint answer the POST with 405; the request is then repeated as a GET
//! with the parameters in the query string.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{json, join_compact, ListResponse, TreeRequest, TreeResponse, Value};
use crate::infrastructure::traits::{HttpClient, HttpResponse};

const METHOD_NOT_ALLOWED: u16 = 405;

/// Client for the remote tree endpoint.
pub struct RemoteService {
    http: Arc<dyn HttpClient>,
    base_url: Url,
}

impl RemoteService {
    pub fn new(http: Arc<dyn HttpClient>, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Parse a base URL from configuration.
    pub fn parse_base(base: &str) -> ApplicationResult<Url> {
        Url::parse(base).map_err(|e| ApplicationError::Config {
            message: format!("invalid api_base {base:?}: {e}"),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/trees`, keeping any path prefix of the base URL.
    pub fn trees_url(&self) -> ApplicationResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApplicationError::Config {
                message: format!("api_base cannot be a base URL: {}", self.base_url),
            })?
            .pop_if_empty()
            .push("trees");
        Ok(url)
    }

    /// Ask the server to build a tree. Falls back to GET on 405.
    pub fn create_tree(&self, numbers: &[Value], balanced: bool) -> ApplicationResult<TreeResponse> {
        let url = self.trees_url()?;
        let request = TreeRequest {
            numbers: numbers.to_vec(),
            balanced,
        };
        let body = serde_json::to_value(&request).map_err(|e| ApplicationError::OperationFailed {
            context: "encode tree request".to_string(),
            source: Box::new(e),
        })?;

        debug!("create_tree: POST {} ({} numbers)", url, numbers.len());
        let response = self.http.post_json(&url, &body)?;

        let response = if response.status == METHOD_NOT_ALLOWED {
            let mut get_url = url;
            get_url
                .query_pairs_mut()
                .append_pair("numbers", &join_compact(numbers))
                .append_pair("balanced", if balanced { "true" } else { "false" });
            info!("POST not allowed, retrying as GET {}", get_url);
            self.http.get(&get_url)?
        } else {
            response
        };

        decode(response)
    }

    /// Fetch the server's list of stored trees.
    pub fn list_trees(&self) -> ApplicationResult<ListResponse> {
        let url = self.trees_url()?;
        debug!("list_trees: GET {}", url);
        decode(self.http.get(&url)?)
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> ApplicationResult<T> {
    if !response.is_success() {
        return Err(ApplicationError::Remote {
            status: response.status,
            body: response.body,
        });
    }
    json::from_str(&response.body).map_err(|e| ApplicationError::OperationFailed {
        context: "decode server response".to_string(),
        source: Box::new(e),
    })
}
