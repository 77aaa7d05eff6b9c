//! Shared test utilities: throwaway content trees on disk.

use std::path::{Path, PathBuf};

/// Create an empty, uniquely named directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("corpusgen-test-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Build the reference tree: separator and external link at the root,
/// `guides` as both a page and a nested section.
pub fn reference_tree(root: &Path) {
    write_file(
        root,
        "_meta.json",
        r#"{"intro": {}, "sep": {"type": "separator"}, "external": {"href": "https://x.example"}, "guides": {}}"#,
    );
    write_file(root, "intro.mdx", "# Intro\n\nWelcome.");
    write_file(root, "guides.mdx", "# Guides\n\nAll guides.");
    write_file(root, "guides/_meta.json", r#"{"setup": {}}"#);
    write_file(root, "guides/setup.mdx", "# Setup\n\nInstall it.");
}
