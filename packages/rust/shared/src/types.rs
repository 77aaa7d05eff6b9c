//! Core domain types for the corpus pipeline.

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// EntryKind
// ---------------------------------------------------------------------------

/// Classification of one entry in an ordering declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A navigable entry: a content file, a subdirectory, or both.
    Content,
    /// A purely structural divider in the navigation.
    Separator,
    /// A navigation link pointing outside the content tree.
    ExternalLink { href: String },
}

impl EntryKind {
    /// Whether this entry can emit pages.
    pub fn is_navigable(&self) -> bool {
        match self {
            EntryKind::Content => true,
            EntryKind::Separator | EntryKind::ExternalLink { .. } => false,
        }
    }
}

// ---------------------------------------------------------------------------
// PageRef
// ---------------------------------------------------------------------------

/// One content page discovered by the collector, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Absolute (or root-joined) path to the content file.
    pub source: PathBuf,
    /// Forward-slash path from the tree root, without extension
    /// (e.g., `guides/setup`).
    pub slug: String,
    /// 0-based index in the final ordered sequence.
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Section / Corpus
// ---------------------------------------------------------------------------

/// A sanitized page tagged with its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Canonical published URL of the page.
    pub url: String,
    /// Sanitized page body.
    pub body: String,
}

/// The full output document: fixed header followed by ordered sections.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub header: String,
    pub sections: Vec<Section>,
}
