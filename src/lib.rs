//! issue-mirror - mirror accepted GitHub issues into Jira
//!
//! A one-shot tool meant to run from CI. Issues labelled `accepted` are created
//! as Jira tickets, then labelled `synced` so later runs leave them alone. The
//! labels are the only state; nothing is stored between runs.
//!
//! # Architecture
//!
//! - **commands**: CLI definitions, run loop and exit status
//! - **config**: settings layering, validation and Jira auth strategy
//! - **integrations**: GitHub and JIRA REST adapters
//! - **sync**: sync gate, Markdown translation, single and batch orchestration
//! - **logging**: tracing subscriber setup

pub mod commands;
pub mod config;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod sync;

// Re-exports
pub use error::{IssueMirrorError, Result};
