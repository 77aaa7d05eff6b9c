//! Markup stripping passes for authored page source.
//!
//! Each pass is a function `&str -> String` applied in sequence.
//! Passes 1–5 remove markup; passes 6–7 normalize whitespace.

use std::sync::LazyLock;

use regex::Regex;

/// Tag patterns for the structural allow-list, compiled once per sanitizer.
#[derive(Debug, Clone)]
pub(crate) struct StructuralTags {
    open: Regex,
    close: Regex,
}

impl StructuralTags {
    /// Build opening/closing tag patterns for `names`.
    ///
    /// Returns `Ok(None)` for an empty allow-list.
    pub(crate) fn compile(names: &[String]) -> Result<Option<Self>, regex::Error> {
        if names.is_empty() {
            return Ok(None);
        }

        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");

        // The name ends at whitespace or `>`, so `Tab` leaves `<Table>`,
        // `<Tab-panel>` and `<Tabs.Tab>` alone. `[^>]` spans newlines, so
        // multi-line attribute lists are consumed whole.
        let open = Regex::new(&format!(r"<(?:{alternation})(?:\s[^>]*)?>"))?;
        let close = Regex::new(&format!(r"</(?:{alternation})\s*>"))?;

        Ok(Some(Self { open, close }))
    }
}

/// Run the markup-removal passes (1–5) over one stretch of prose.
pub(crate) fn strip_markup(text: &str, tags: Option<&StructuralTags>) -> String {
    let mut result = remove_import_lines(text);

    result = remove_self_closing_tags(&result);
    if let Some(tags) = tags {
        result = remove_structural_open_tags(&result, tags);
        result = remove_structural_close_tags(&result, tags);
    }
    result = remove_comment_annotations(&result);

    result
}

/// Run the whitespace passes (6–7) over the whole page.
pub(crate) fn normalize(text: &str) -> String {
    let collapsed = collapse_blank_lines(text);
    collapsed.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Drop import statements
// ---------------------------------------------------------------------------

/// Remove every line of the form `import ... from "..."`.
fn remove_import_lines(text: &str) -> String {
    static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"^import\s+.*from\s+['"]"#).expect("valid regex")
    });

    text.split_inclusive('\n')
        .filter(|line| !IMPORT_RE.is_match(line))
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: Drop self-closing tags
// ---------------------------------------------------------------------------

/// Remove `<Name ... />` tags, whatever the name.
fn remove_self_closing_tags(text: &str) -> String {
    static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<\w+[^>]*/>").expect("valid regex")
    });

    SELF_CLOSING_RE.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3 + 4: Unwrap structural components
// ---------------------------------------------------------------------------

/// Remove opening tags of allow-listed components, keeping their contents.
fn remove_structural_open_tags(text: &str, tags: &StructuralTags) -> String {
    tags.open.replace_all(text, "").into_owned()
}

/// Remove closing tags of allow-listed components.
fn remove_structural_close_tags(text: &str, tags: &StructuralTags) -> String {
    tags.close.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 5: Drop comment annotations
// ---------------------------------------------------------------------------

/// Remove `{/* ... */}` comments, including multi-line ones.
fn remove_comment_annotations(text: &str) -> String {
    static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)\{/\*.*?\*/\}").expect("valid regex")
    });

    COMMENT_RE.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 6: Collapse blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of 3+ newlines into exactly 2.
fn collapse_blank_lines(text: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\n{3,}").expect("valid regex")
    });

    MULTI_BLANK_RE.replace_all(text, "\n\n").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
