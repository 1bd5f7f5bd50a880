//! Record directory for Bedside.
//!
//! Loads the read-only record dataset at startup and provides the keyword
//! retriever that grounds chat prompts, plus a free-text containment search
//! for the standalone search endpoint.

pub mod record;
pub mod retriever;

pub use record::{Directory, DirectoryError, Record};
