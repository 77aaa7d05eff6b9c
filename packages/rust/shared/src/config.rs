//! Application configuration for corpusgen.
//!
//! Project config lives in `corpusgen.toml` next to the documentation site.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CorpusError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "corpusgen.toml";

// ---------------------------------------------------------------------------
// Config structs (matching corpusgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Published site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Content tree layout.
    #[serde(default)]
    pub content: ContentConfig,

    /// Output artifact location.
    #[serde(default)]
    pub output: OutputConfig,

    /// Markup stripping rules.
    #[serde(default)]
    pub sanitize: SanitizeConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Human-readable documentation name used in the header.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// One-paragraph description quoted under the title. Empty to omit.
    #[serde(default = "default_summary")]
    pub summary: String,

    /// Published origin every canonical URL is built on.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Curated index referenced from the header (defaults to `<origin>/llms.txt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            summary: default_summary(),
            origin: default_origin(),
            index_url: None,
        }
    }
}

fn default_site_name() -> String {
    "Splits".into()
}
fn default_summary() -> String {
    "Composable, open-source, audited smart contracts for managing onchain revenue. \
     No protocol fees. Runs forever as a hyperstructure."
        .into()
}
fn default_origin() -> String {
    "https://docs.splits.org".into()
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root of the authored content tree.
    #[serde(default = "default_root")]
    pub root: String,

    /// Page file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Per-directory ordering declaration file name.
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// Slug segment that maps to its parent directory's URL.
    #[serde(default = "default_index_marker")]
    pub index_marker: String,

    /// Maximum directory nesting followed during traversal.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: default_extension(),
            meta_file: default_meta_file(),
            index_marker: default_index_marker(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_root() -> String {
    "pages".into()
}
fn default_extension() -> String {
    "mdx".into()
}
fn default_meta_file() -> String {
    "_meta.json".into()
}
fn default_index_marker() -> String {
    "index".into()
}
fn default_max_depth() -> usize {
    32
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the corpus is written.
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    "public/llms-full.txt".into()
}

/// `[sanitize]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Layout-only component names whose tags (not contents) are stripped.
    #[serde(default = "default_structural_tags")]
    pub structural_tags: Vec<String>,

    /// Leave fenced code regions untouched by tag stripping.
    #[serde(default)]
    pub preserve_code_fences: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            structural_tags: default_structural_tags(),
            preserve_code_fences: false,
        }
    }
}

fn default_structural_tags() -> Vec<String> {
    ["Toggle", "Tabs", "Tab", "Callout", "div"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Corpus config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration: validated, with paths resolved.
///
/// This is the only input the pipeline reads; nothing is taken from
/// ambient process state.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Content tree root.
    pub root: PathBuf,
    /// Output artifact path.
    pub output: PathBuf,
    /// Published origin, without a trailing slash.
    pub origin: String,
    /// Documentation name for the header.
    pub site_name: String,
    /// Header summary (may be empty).
    pub summary: String,
    /// Curated index URL for the header.
    pub index_url: String,
    /// Page file extension, without the dot.
    pub extension: String,
    /// Ordering declaration file name.
    pub meta_file: String,
    /// Index slug segment.
    pub index_marker: String,
    /// Traversal depth cap.
    pub max_depth: usize,
    /// Structural component names to unwrap.
    pub structural_tags: Vec<String>,
    /// Skip fenced code regions while stripping tags.
    pub preserve_code_fences: bool,
}

impl CorpusConfig {
    /// Validate `config` and resolve its relative paths against `base_dir`.
    pub fn resolve(config: &AppConfig, base_dir: &Path) -> Result<Self> {
        let origin = normalize_origin(&config.site.origin)?;

        let index_url = match &config.site.index_url {
            Some(url) => {
                Url::parse(url).map_err(|e| {
                    CorpusError::config(format!("invalid site.index_url '{url}': {e}"))
                })?;
                url.clone()
            }
            None => format!("{origin}/llms.txt"),
        };

        let extension = config.content.extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(CorpusError::config("content.extension must not be empty"));
        }
        if config.content.meta_file.is_empty() {
            return Err(CorpusError::config("content.meta_file must not be empty"));
        }
        if config.content.index_marker.is_empty() || config.content.index_marker.contains('/') {
            return Err(CorpusError::config(
                "content.index_marker must be a single non-empty path segment",
            ));
        }

        Ok(Self {
            root: base_dir.join(&config.content.root),
            output: base_dir.join(&config.output.path),
            origin,
            site_name: config.site.name.clone(),
            summary: config.site.summary.trim().to_string(),
            index_url,
            extension,
            meta_file: config.content.meta_file.clone(),
            index_marker: config.content.index_marker.clone(),
            max_depth: config.content.max_depth,
            structural_tags: config.sanitize.structural_tags.clone(),
            preserve_code_fences: config.sanitize.preserve_code_fences,
        })
    }
}

/// Check that `origin` is an absolute http(s) URL and strip any trailing slash.
pub fn normalize_origin(origin: &str) -> Result<String> {
    let parsed = Url::parse(origin)
        .map_err(|e| CorpusError::config(format!("invalid site.origin '{origin}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(CorpusError::config(format!(
            "site.origin '{origin}' must be an http(s) URL with a host"
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(CorpusError::config(format!(
            "site.origin '{origin}' must not carry a query or fragment"
        )));
    }

    Ok(origin.trim_end_matches('/').to_string())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load config from `path`, or from `./corpusgen.toml` when `path` is `None`.
///
/// Returns defaults if no explicit path was given and the default file does
/// not exist. The returned directory is where relative paths resolve from.
pub fn load_config(path: Option<&Path>) -> Result<(AppConfig, PathBuf)> {
    let cwd = std::env::current_dir().map_err(|e| CorpusError::io(".", e))?;

    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = cwd.join(CONFIG_FILE_NAME);
            if !default.exists() {
                tracing::debug!(path = %default.display(), "config file not found, using defaults");
                return Ok((AppConfig::default(), cwd));
            }
            default
        }
    };

    let config = load_config_from(&path)?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => cwd,
    };

    Ok((config, base_dir))
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CorpusError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(CorpusError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CorpusError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| CorpusError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(())
}
