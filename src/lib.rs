//! Build, view, and save binary search trees.
//!
//! Layers, from the inside out:
//! - [`domain`]: values, tokenizer, tree builder and record types (pure)
//! - [`application`]: submission, history and remote services
//! - [`infrastructure`]: filesystem and HTTP seams, service wiring
//! - [`cli`]: argument model and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
