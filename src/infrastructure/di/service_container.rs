//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{HistoryService, RemoteService, SubmissionService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, HttpClient, RealFileSystem, ReqwestHttpClient};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    http: Arc<dyn HttpClient>,
    history: HistoryService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let http = ReqwestHttpClient::new(Duration::from_secs(settings.timeout_secs))?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(http),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let settings = Arc::new(settings);
        let history = HistoryService::new(fs, settings.store_path());

        Self {
            settings,
            http,
            history,
        }
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn submission(&self) -> SubmissionService<'_> {
        SubmissionService::new(&self.history, self.settings.history_limit)
    }

    /// Remote client for the configured `api_base`.
    pub fn remote(&self) -> Result<RemoteService, ApplicationError> {
        let base = RemoteService::parse_base(&self.settings.api_base)?;
        Ok(RemoteService::new(Arc::clone(&self.http), base))
    }
}
