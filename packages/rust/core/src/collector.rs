//! Page collector: flattens the content tree into reading order.
//!
//! Traversal is driven entirely by ordering declarations. For each declared
//! entry the collector emits `<dir>/<entry>.<ext>` when it exists, then
//! descends into `<dir>/<entry>/` when that directory has its own
//! declaration. The result is a pre-order walk: a section's landing page
//! comes before everything nested under it.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument, trace, warn};

use corpusgen_shared::{CorpusConfig, CorpusError, PageRef, Result};

use crate::meta::read_meta;

/// Tree layout settings the collector needs.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Page file extension, without the dot.
    pub extension: String,
    /// Ordering declaration file name.
    pub meta_file: String,
    /// Deepest directory nesting followed below the root.
    pub max_depth: usize,
}

impl From<&CorpusConfig> for CollectOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            meta_file: config.meta_file.clone(),
            max_depth: config.max_depth,
        }
    }
}

/// Collect every reachable page under `root`, in reading order.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn collect_pages(root: &Path, opts: &CollectOptions) -> Result<Vec<PageRef>> {
    let mut found = Vec::new();
    collect_dir(root, "", 0, opts, &mut found)?;

    let pages: Vec<PageRef> = found
        .into_iter()
        .enumerate()
        .map(|(position, (source, slug))| PageRef {
            source,
            slug,
            position,
        })
        .collect();

    debug!(pages = pages.len(), "page collection complete");
    Ok(pages)
}

fn collect_dir(
    dir: &Path,
    prefix: &str,
    depth: usize,
    opts: &CollectOptions,
    out: &mut Vec<(PathBuf, String)>,
) -> Result<()> {
    if depth > opts.max_depth {
        return Err(CorpusError::validation(format!(
            "content tree deeper than {} levels at {}",
            opts.max_depth,
            dir.display()
        )));
    }

    for name in read_meta(dir, &opts.meta_file)? {
        if !is_plain_segment(&name) {
            warn!(dir = %dir.display(), entry = %name, "entry name is not a single path segment, skipping");
            continue;
        }

        let slug = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        let page_file = dir.join(format!("{name}.{}", opts.extension));
        let sub_dir = dir.join(&name);
        let has_page = page_file.is_file();
        let has_section = sub_dir.join(&opts.meta_file).is_file();

        if has_page {
            trace!(slug = %slug, "page");
            out.push((page_file, slug.clone()));
        }

        if has_section {
            collect_dir(&sub_dir, &slug, depth + 1, opts, out)?;
        }

        if !has_page && !has_section {
            trace!(dir = %dir.display(), entry = %name, "declared entry has no page or section");
        }
    }

    Ok(())
}

/// Whether `name` names exactly one ordinary path component.
fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
        && !name.contains('\\')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{reference_tree, temp_dir, write_file};

    fn opts() -> CollectOptions {
        CollectOptions {
            extension: "mdx".into(),
            meta_file: "_meta.json".into(),
            max_depth: 32,
        }
    }

    fn slugs(pages: &[PageRef]) -> Vec<&str> {
        pages.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn collects_reference_tree_in_order() {
        let tmp = temp_dir();
        reference_tree(&tmp);

        let pages = collect_pages(&tmp, &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["intro", "guides", "guides/setup"]);
        assert_eq!(pages[2].source, tmp.join("guides").join("setup.mdx"));
        assert_eq!(
            pages.iter().map(|p| p.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn subtree_precedes_next_sibling() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"a": {}, "b": {}}"#);
        write_file(&tmp, "a/_meta.json", r#"{"index": {}, "deep": {}}"#);
        write_file(&tmp, "a/index.mdx", "a");
        write_file(&tmp, "a/deep/_meta.json", r#"{"leaf": {}}"#);
        write_file(&tmp, "a/deep/leaf.mdx", "leaf");
        write_file(&tmp, "b.mdx", "b");

        let pages = collect_pages(&tmp, &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["a/index", "a/deep/leaf", "b"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn declaration_order_beats_filesystem_order() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"zebra": {}, "apple": {}, "mango": {}}"#);
        for name in ["apple", "mango", "zebra"] {
            write_file(&tmp, &format!("{name}.mdx"), name);
        }

        let pages = collect_pages(&tmp, &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["zebra", "apple", "mango"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn undeclared_and_unmatched_entries_are_skipped() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"ghost": {}, "real": {}}"#);
        write_file(&tmp, "real.mdx", "real");
        write_file(&tmp, "hidden.mdx", "never declared");
        // Subdirectory without its own declaration is not descended into.
        write_file(&tmp, "ghost/page.mdx", "orphan");

        let pages = collect_pages(&tmp, &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["real"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn section_without_landing_page() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"api": {}}"#);
        write_file(&tmp, "api/_meta.json", r#"{"client": {}, "server": {}}"#);
        write_file(&tmp, "api/client.mdx", "c");
        write_file(&tmp, "api/server.mdx", "s");

        let pages = collect_pages(&tmp, &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["api/client", "api/server"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_root_declaration_yields_nothing() {
        let tmp = temp_dir();
        write_file(&tmp, "intro.mdx", "intro");

        assert!(collect_pages(&tmp, &opts()).unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_nested_declaration_is_fatal() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"guides": {}}"#);
        write_file(&tmp, "guides/_meta.json", "{ broken");

        let err = collect_pages(&tmp, &opts()).unwrap_err();
        assert!(matches!(err, CorpusError::Meta { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn depth_cap_is_enforced() {
        let tmp = temp_dir();
        write_file(&tmp, "_meta.json", r#"{"a": {}}"#);
        write_file(&tmp, "a/_meta.json", r#"{"b": {}}"#);
        write_file(&tmp, "a/b/_meta.json", r#"{"c": {}}"#);
        write_file(&tmp, "a/b/c.mdx", "c");

        let shallow = CollectOptions {
            max_depth: 1,
            ..opts()
        };
        let err = collect_pages(&tmp, &shallow).unwrap_err();
        assert!(err.to_string().contains("deeper than 1"));

        let deep_enough = CollectOptions {
            max_depth: 2,
            ..opts()
        };
        let pages = collect_pages(&tmp, &deep_enough).unwrap();
        assert_eq!(slugs(&pages), vec!["a/b/c"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn path_like_entry_names_are_ignored() {
        let tmp = temp_dir();
        write_file(&tmp, "docs/_meta.json", r#"{"../escape": {}, "ok": {}}"#);
        write_file(&tmp, "escape.mdx", "outside");
        write_file(&tmp, "docs/ok.mdx", "ok");

        let pages = collect_pages(&tmp.join("docs"), &opts()).unwrap();
        assert_eq!(slugs(&pages), vec!["ok"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn plain_segment_rules() {
        assert!(is_plain_segment("getting-started"));
        assert!(is_plain_segment("v1.2"));
        assert!(!is_plain_segment(".."));
        assert!(!is_plain_segment("."));
        assert!(!is_plain_segment("a/b"));
        assert!(!is_plain_segment(""));
    }
}
