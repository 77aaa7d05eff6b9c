//! Shared types, error model, and configuration for corpusgen.
//!
//! This crate is the foundation depended on by all other corpusgen crates.
//! It provides:
//! - [`CorpusError`]: the unified error type
//! - Domain types ([`EntryKind`], [`PageRef`], [`Section`], [`Corpus`])
//! - Configuration ([`AppConfig`], [`CorpusConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ContentConfig, CorpusConfig, OutputConfig, SanitizeConfig,
    SiteConfig, init_config, load_config, load_config_from, normalize_origin,
};
pub use error::{CorpusError, Result};
pub use types::{Corpus, EntryKind, PageRef, Section};
