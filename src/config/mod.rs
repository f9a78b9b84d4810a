//! Route manifest (`route.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── generate   # `generate` tables as metadata generators
//! ├── route      # segments + ManifestLoader
//! └── mod.rs     # RouteManifest (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                              |
//! |----------------|------------------------------------------------------|
//! | `[resolve]`    | Snapshot policy, verbosity, static assets directory  |
//! | `[props]`      | Route params and search params passed to generators  |
//! | `[[segment]]`  | One route segment, root first                        |

mod error;
mod generate;
mod route;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use generate::TemplateGenerator;
pub use route::ManifestLoader;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::accumulate::{AccumulateOptions, SnapshotPolicy};
use crate::collect::ModuleKind;
use crate::log;
use crate::metadata::{Metadata, RouteProps};

// ============================================================================
// root configuration
// ============================================================================

/// Root structure of a route manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    /// Directory containing the manifest (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub resolve: ResolveConfig,

    pub props: RouteProps,

    /// Route segments, root first
    #[serde(rename = "segment")]
    pub segments: Vec<SegmentEntry>,
}

/// `[resolve]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub snapshot: SnapshotPolicy,
    pub verbose: bool,
    /// Directory static asset paths are relative to
    pub assets: PathBuf,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            snapshot: SnapshotPolicy::default(),
            verbose: false,
            assets: PathBuf::from("."),
        }
    }
}

/// `[[segment]]` entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SegmentEntry {
    pub route: String,
    pub depth: usize,
    pub kind: ModuleKind,
    /// Client-only boundary: metadata exports are ignored
    pub client: bool,
    /// Static `metadata` export
    pub metadata: Option<Metadata>,
    /// `generateMetadata` export, see [`TemplateGenerator`]
    pub generate: Option<Metadata>,
    pub icon: Vec<AssetEntry>,
    pub apple: Vec<AssetEntry>,
    pub open_graph: Vec<AssetEntry>,
    pub twitter: Vec<AssetEntry>,
}

/// Static asset: a file to inspect, or a ready descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    File(PathBuf),
    Inline(InlineAsset),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InlineAsset {
    /// File to inspect; other fields then only override `url` and `alt`
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub mime: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sizes: Option<String>,
    pub alt: Option<String>,
}

impl AssetEntry {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Inline(inline) => inline.path.as_deref(),
        }
    }
}

impl RouteManifest {
    /// Load, warn about unknown fields, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut manifest, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        manifest.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse manifest content without validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let manifest = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((manifest, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Directory static asset paths resolve against.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(&self.resolve.assets)
    }

    pub fn options(&self) -> AccumulateOptions {
        AccumulateOptions {
            props: self.props.clone(),
            snapshot: self.resolve.snapshot,
        }
    }

    /// Check segment ordering and static asset entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let assets = self.assets_dir();
        let last = self.segments.len().saturating_sub(1);

        for (i, entry) in self.segments.iter().enumerate() {
            let field = |name: &str| format!("segment[{i}].{name}");

            if entry.route.is_empty() {
                diag.error(field("route"), "route must not be empty");
            }
            if i > 0 && entry.depth < self.segments[i - 1].depth {
                diag.error_with_hint(
                    field("depth"),
                    format!(
                        "depth {} is lower than the previous segment's {}",
                        entry.depth,
                        self.segments[i - 1].depth
                    ),
                    "segments are listed root first",
                );
            }
            if entry.kind == ModuleKind::Page && i != last {
                diag.error_with_hint(
                    field("kind"),
                    "only the last segment can be a page",
                    "use kind = \"layout\"",
                );
            }

            let families = [
                ("icon", &entry.icon),
                ("apple", &entry.apple),
                ("open-graph", &entry.open_graph),
                ("twitter", &entry.twitter),
            ];
            for (family, entries) in families {
                for (j, asset) in entries.iter().enumerate() {
                    let at = field(&format!("{family}[{j}]"));
                    match asset.path() {
                        Some(path) if !assets.join(path).is_file() => diag.error(
                            at,
                            format!("file not found: {}", assets.join(path).display()),
                        ),
                        Some(_) => {}
                        None => {
                            if let AssetEntry::Inline(InlineAsset { url: None, .. }) = asset {
                                diag.error(at, "inline asset needs a `url` or a `path`");
                            }
                        }
                    }
                }
            }
        }

        diag.into_result()
    }
}
