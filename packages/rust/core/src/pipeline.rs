//! End-to-end pipeline: content tree → ordered pages → sanitized sections → corpus file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use corpusgen_markdown::{SanitizeOptions, Sanitizer};
use corpusgen_shared::{Corpus, CorpusConfig, CorpusError, PageRef, Result, Section};

use crate::assembler;
use crate::collector::{self, CollectOptions};
use crate::url_map::page_url;

/// A collected page paired with its canonical URL.
#[derive(Debug, Clone)]
pub struct PlannedPage {
    pub page: PageRef,
    pub url: String,
}

/// Result of a successful corpus build.
#[derive(Debug, Clone)]
pub struct CorpusSummary {
    /// Where the corpus was written.
    pub output: PathBuf,
    /// Number of sections (pages) in the corpus.
    pub section_count: usize,
    /// Size of the written artifact in bytes.
    pub size_bytes: usize,
    /// SHA-256 of the artifact, hex encoded.
    pub sha256: String,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is sanitized.
    fn page_sanitized(&self, url: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &CorpusSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_sanitized(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &CorpusSummary) {}
}

/// Collect pages in reading order and map each to its canonical URL.
///
/// When two pages map to the same URL (e.g. `guides.mdx` and
/// `guides/index.mdx`) the first one in reading order is kept.
#[instrument(skip_all, fields(root = %config.root.display()))]
pub fn plan(config: &CorpusConfig) -> Result<Vec<PlannedPage>> {
    let pages = collector::collect_pages(&config.root, &CollectOptions::from(config))?;

    let mut seen = HashSet::new();
    let mut planned = Vec::with_capacity(pages.len());

    for page in pages {
        let url = page_url(&config.origin, &page.slug, &config.index_marker);

        if !seen.insert(url.clone()) {
            warn!(
                url = %url,
                source = %page.source.display(),
                "duplicate canonical URL, keeping first occurrence"
            );
            continue;
        }

        planned.push(PlannedPage {
            page: PageRef {
                position: planned.len(),
                ..page
            },
            url,
        });
    }

    Ok(planned)
}

/// Read and sanitize every planned page into sections, in order.
pub fn collect_sections(
    config: &CorpusConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Section>> {
    let sanitizer = Sanitizer::new(&SanitizeOptions::from(config))?;

    progress.phase("Collecting pages");
    let planned = plan(config)?;
    let total = planned.len();

    progress.phase("Sanitizing pages");
    let mut sections = Vec::with_capacity(total);

    for (i, PlannedPage { page, url }) in planned.into_iter().enumerate() {
        let raw = read_page(&page.source)?;
        let body = sanitizer.sanitize(&raw);

        debug!(url = %url, raw_len = raw.len(), clean_len = body.len(), "page sanitized");
        progress.page_sanitized(&url, i + 1, total);

        sections.push(Section { url, body });
    }

    Ok(sections)
}

/// Read a page as UTF-8, replacing invalid sequences with U+FFFD.
fn read_page(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| CorpusError::io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(path = %path.display(), "page is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Run the full pipeline and write the corpus.
///
/// 1. Collect pages from ordering declarations
/// 2. Sanitize each page and map its canonical URL
/// 3. Render header + sections
/// 4. Replace the output file
///
/// Every read and parse happens before the write; a fatal error leaves any
/// previous output untouched.
#[instrument(skip_all, fields(root = %config.root.display(), output = %config.output.display()))]
pub fn build_corpus(
    config: &CorpusConfig,
    progress: &dyn ProgressReporter,
) -> Result<CorpusSummary> {
    let start = Instant::now();

    info!("starting corpus build");

    let sections = collect_sections(config, progress)?;

    progress.phase("Assembling corpus");
    let corpus = Corpus {
        header: assembler::render_header(&config.site_name, &config.summary, &config.index_url),
        sections,
    };
    let text = assembler::render(&corpus);

    progress.phase("Writing corpus");
    let artifact = assembler::write_corpus(&config.output, &text)?;

    let summary = CorpusSummary {
        output: artifact.path,
        section_count: corpus.sections.len(),
        size_bytes: artifact.size_bytes,
        sha256: artifact.sha256,
        elapsed: start.elapsed(),
    };

    progress.done(&summary);

    info!(
        sections = summary.section_count,
        size_bytes = summary.size_bytes,
        elapsed_ms = summary.elapsed.as_millis(),
        "corpus build complete"
    );

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
