//! Content sanitizer for authored documentation pages.
//!
//! Turns one page's raw MDX-style source into clean prose: inclusion
//! statements, self-closing components, structural wrapper tags and comment
//! annotations are removed, blank-line runs are collapsed, and the result is
//! trimmed. Everything else (prose, headings, emphasis, links, unknown tags,
//! code blocks) passes through.
//!
//! Stripping works on literal text. Tag-like syntax inside fenced code is
//! therefore matched too unless [`SanitizeOptions::preserve_code_fences`] is
//! set.

mod cleanup;

use tracing::trace;

use corpusgen_shared::{CorpusConfig, CorpusError, Result};

use cleanup::StructuralTags;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options controlling which markup is stripped.
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// Closed set of layout component names whose tags are unwrapped.
    pub structural_tags: Vec<String>,
    /// Skip passes 1–5 inside ``` / ~~~ fenced regions.
    pub preserve_code_fences: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            structural_tags: ["Toggle", "Tabs", "Tab", "Callout", "div"]
                .into_iter()
                .map(String::from)
                .collect(),
            preserve_code_fences: false,
        }
    }
}

impl From<&CorpusConfig> for SanitizeOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            structural_tags: config.structural_tags.clone(),
            preserve_code_fences: config.preserve_code_fences,
        }
    }
}

/// A compiled sanitizer. Build once, apply to every page.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    tags: Option<StructuralTags>,
    preserve_code_fences: bool,
}

impl Sanitizer {
    /// Compile the tag patterns for `opts`.
    pub fn new(opts: &SanitizeOptions) -> Result<Self> {
        let tags = StructuralTags::compile(&opts.structural_tags).map_err(|e| {
            CorpusError::config(format!("invalid structural tag list: {e}"))
        })?;

        Ok(Self {
            tags,
            preserve_code_fences: opts.preserve_code_fences,
        })
    }

    /// Sanitize one page's raw source.
    ///
    /// Pure and idempotent: the pass sequence is repeated until a round
    /// removes nothing, so `sanitize(sanitize(x)) == sanitize(x)`. Every
    /// pass only deletes text, so each changing round is strictly shorter
    /// and the loop terminates.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut current = self.run_once(raw);
        let mut round = 1;

        loop {
            let next = self.run_once(&current);
            if next == current {
                return current;
            }
            round += 1;
            trace!(round, "sanitizer removal exposed further markup");
            current = next;
        }
    }

    fn run_once(&self, text: &str) -> String {
        let stripped = if self.preserve_code_fences {
            split_fences(text)
                .into_iter()
                .map(|segment| {
                    if segment.fenced {
                        segment.text.to_string()
                    } else {
                        cleanup::strip_markup(segment.text, self.tags.as_ref())
                    }
                })
                .collect::<String>()
        } else {
            cleanup::strip_markup(text, self.tags.as_ref())
        };

        cleanup::normalize(&stripped)
    }
}

/// Sanitize with the default allow-list and literal-text matching.
pub fn sanitize(raw: &str) -> String {
    static DEFAULT: std::sync::LazyLock<Sanitizer> = std::sync::LazyLock::new(|| {
        Sanitizer::new(&SanitizeOptions::default()).expect("default allow-list compiles")
    });

    DEFAULT.sanitize(raw)
}

// ---------------------------------------------------------------------------
// Fenced code regions
// ---------------------------------------------------------------------------

/// A contiguous stretch of the page, either inside or outside a code fence.
#[derive(Debug, PartialEq, Eq)]
struct Segment<'a> {
    text: &'a str,
    fenced: bool,
}

/// Split `text` into alternating prose and fenced-code segments.
///
/// Fence lines themselves belong to the fenced segment. An unterminated
/// fence runs to the end of the text.
fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut open_fence: Option<(char, usize)> = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let Some((ch, len, info)) = fence_marker(line) else {
            continue;
        };

        match open_fence {
            None => {
                if line_start > start {
                    segments.push(Segment {
                        text: &text[start..line_start],
                        fenced: false,
                    });
                }
                start = line_start;
                open_fence = Some((ch, len));
            }
            Some((open_ch, open_len)) if ch == open_ch && len >= open_len && info.is_empty() => {
                segments.push(Segment {
                    text: &text[start..offset],
                    fenced: true,
                });
                start = offset;
                open_fence = None;
            }
            Some(_) => {}
        }
    }

    if start < text.len() {
        segments.push(Segment {
            text: &text[start..],
            fenced: open_fence.is_some(),
        });
    }

    segments
}

/// If `line` is a fence line, return its marker char, run length and info
/// string. Only a line with an empty info string can close a fence.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    // Marker chars are ASCII, so `len` is also a byte offset.
    (len >= 3).then(|| (ch, len, trimmed[len..].trim()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
