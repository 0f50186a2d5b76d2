//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod json;
pub mod parser;
pub mod tree;
pub mod value;

pub use entities::*;
pub use error::DomainError;
pub use json::TreeJson;
pub use parser::{join_compact, normalize, parse_numbers};
pub use tree::{build_and_serialize, Node, Tree};
pub use value::Value;
