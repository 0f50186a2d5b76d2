//! Domain entities: saved submissions and API payloads

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{Tree, TreeJson, Value};

/// Number of values shown in one-line summaries before eliding.
pub const LABEL_MAX_NUMBERS: usize = 12;

/// A submission persisted in the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTree {
    /// Unique identifier (UUID v4 for new records)
    pub id: String,
    /// ISO-8601 UTC timestamp
    pub created_at: String,
    /// Parsed input, in submission order
    pub numbers: Vec<Value>,
    /// Whether the balanced variant was requested
    #[serde(default)]
    pub balanced: bool,
    /// Serialized tree; older records may lack it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<TreeJson>,
}

impl SavedTree {
    /// Create a record and materialize its serialized tree.
    pub fn new(id: String, created_at: String, numbers: Vec<Value>, balanced: bool) -> Self {
        let json = Some(Tree::from_values(&numbers).to_json());
        Self {
            id,
            created_at,
            numbers,
            balanced,
            json,
        }
    }

    pub fn tree(&self) -> Tree {
        Tree::from_values(&self.numbers)
    }

    /// Stored tree JSON, or computed from `numbers` if absent.
    pub fn tree_json(&self) -> TreeJson {
        match &self.json {
            Some(json) => json.clone(),
            None => self.tree().to_json(),
        }
    }

    /// `"1 number"` / `"5 numbers"`
    pub fn count_label(&self) -> String {
        let n = self.numbers.len();
        format!("{} number{}", n, if n == 1 { "" } else { "s" })
    }

    /// Leading numbers, elided past [`LABEL_MAX_NUMBERS`]: `1, 2, … (+3)`.
    pub fn numbers_label(&self) -> String {
        let n = self.numbers.len();
        if n > LABEL_MAX_NUMBERS {
            format!(
                "{}… (+{})",
                self.numbers[..LABEL_MAX_NUMBERS].iter().join(", "),
                n - LABEL_MAX_NUMBERS
            )
        } else {
            self.numbers.iter().join(", ")
        }
    }
}

/// Body of a create-tree request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRequest {
    pub numbers: Vec<Value>,
    pub balanced: bool,
}

/// Tree produced by the remote API, or locally in the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResponse {
    pub id: String,
    pub numbers: Vec<Value>,
    pub bst: TreeJson,
    #[serde(default)]
    pub balanced_bst: Option<TreeJson>,
    pub created_at: String,
}

impl TreeResponse {
    /// Local equivalent of a remote response for a saved record.
    pub fn from_saved(record: &SavedTree) -> Self {
        let balanced_bst = record
            .balanced
            .then(|| Tree::balanced(&record.numbers).to_json());
        Self {
            id: record.id.clone(),
            numbers: record.numbers.clone(),
            bst: record.tree_json(),
            balanced_bst,
            created_at: record.created_at.clone(),
        }
    }
}

/// One row of the remote listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub id: String,
    pub numbers: String,
    pub created_at: String,
}

/// Remote listing of stored trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<TreeSummary>,
    pub total: u64,
}
