//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, HttpClient)
//! but are themselves concrete structs, not traits.

mod history;
mod remote;
mod submission;

pub use history::{HistoryService, DEFAULT_HISTORY_LIMIT, STORE_FILE_NAME};
pub use remote::RemoteService;
pub use submission::{Submission, SubmissionService};
