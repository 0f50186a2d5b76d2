//! Submission use case: parse input, build the tree, record it.

use tracing::debug;

use crate::application::services::history::{new_record_id, now_timestamp};
use crate::application::services::HistoryService;
use crate::application::ApplicationResult;
use crate::domain::{parse_numbers, DomainError, SavedTree, TreeResponse};

/// Outcome of a submission.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The record, as stored (or as it would have been stored)
    pub record: SavedTree,
    /// Tree output in the remote response shape
    pub response: TreeResponse,
    /// Whether the record was written to history
    pub saved: bool,
}

/// Builds trees from raw user input and saves them to history.
pub struct SubmissionService<'a> {
    history: &'a HistoryService,
    limit: usize,
}

impl<'a> SubmissionService<'a> {
    pub fn new(history: &'a HistoryService, limit: usize) -> Self {
        Self { history, limit }
    }

    /// Parse `input`, build its tree and optionally persist the record.
    ///
    /// Fails with [`DomainError::EmptyInput`] if no finite number is found.
    pub fn submit(&self, input: &str, balanced: bool, save: bool) -> ApplicationResult<Submission> {
        let numbers = parse_numbers(input);
        debug!("submit: {} numbers, balanced={}, save={}", numbers.len(), balanced, save);
        if numbers.is_empty() {
            return Err(DomainError::EmptyInput.into());
        }

        let record = SavedTree::new(new_record_id(), now_timestamp(), numbers, balanced);
        let response = TreeResponse::from_saved(&record);

        if save {
            self.history.append(record.clone(), self.limit)?;
        }

        Ok(Submission {
            record,
            response,
            saved: save,
        })
    }
}
