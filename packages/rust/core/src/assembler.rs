//! Corpus document assembler.
//!
//! Renders the header and ordered sections into one text artifact and
//! writes it to disk in a single replace.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use corpusgen_shared::{Corpus, CorpusError, Result, Section};

/// Delimiter placed between sections (and after the header).
pub const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// Metadata for the written artifact.
#[derive(Debug, Clone)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Render the fixed descriptive header.
///
/// The summary paragraph is left out when `summary` is empty.
pub fn render_header(site_name: &str, summary: &str, index_url: &str) -> String {
    let mut header = format!("# {site_name} — Full Documentation\n\n");

    if !summary.is_empty() {
        header.push_str(&format!("> {summary}\n\n"));
    }

    header.push_str(&format!(
        "This file contains the complete {site_name} documentation concatenated into a single document.\n\
         For a curated index, see {index_url}\n\
         \n\
         ---\n\
         \n"
    ));

    header
}

/// Render one section: source attribution comment, blank line, body.
pub fn render_section(section: &Section) -> String {
    format!("<!-- Source: {} -->\n\n{}", section.url, section.body)
}

/// Render the complete corpus text, ending with a single newline.
pub fn render(corpus: &Corpus) -> String {
    let body = corpus
        .sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join(SECTION_DELIMITER);

    format!("{}{body}\n", corpus.header)
}

/// Write `content` to `path`, replacing any previous artifact.
///
/// The text goes to a hidden sibling temp file first and is then renamed
/// over the target, so readers never observe a partial file.
#[instrument(skip_all, fields(path = %path.display(), size = content.len()))]
pub fn write_corpus(path: &Path, content: &str) -> Result<ArtifactMeta> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            CorpusError::validation(format!("output path {} has no file name", path.display()))
        })?
        .to_string_lossy()
        .into_owned();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| CorpusError::io(&parent, e))?;

    let temp = parent.join(format!(".{file_name}.tmp"));

    // Write to temp file first, then atomic rename
    let replaced = std::fs::write(&temp, content)
        .map_err(|e| CorpusError::io(&temp, e))
        .and_then(|()| std::fs::rename(&temp, path).map_err(|e| CorpusError::io(path, e)));

    if let Err(e) = replaced {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(sha256 = %sha256, "wrote corpus");
    info!(size_bytes = content.len(), "corpus written");

    Ok(ArtifactMeta {
        path: path.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
