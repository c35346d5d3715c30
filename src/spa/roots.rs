//! Static roots and the reserved-prefix rule
//!
//! Both the resource resolver and the fallback controller go through this
//! module, so they agree on which paths belong to the API and on where the
//! SPA entry document lives.

use std::path::{Component, Path, PathBuf};

use crate::config::StaticFilesConfig;
use crate::error::{AppError, Result};
use crate::logger;

/// First path segments that are never answered with the SPA document
pub const RESERVED_PREFIXES: [&str; 2] = ["api", "actuator"];

/// True when the first segment of `path` is `api` or `actuator`
///
/// Accepts paths with or without the leading slash: `/api/users`,
/// `api/users`, `/actuator` are reserved; `/apiary` and `/dashboard` are not.
pub fn is_reserved_path(path: &str) -> bool {
    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
    RESERVED_PREFIXES.contains(&first_segment)
}

/// Where a static root comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// Mounted directory; overrides the bundled build without a rebuild
    External,
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoot {
    pub kind: RootKind,
    pub dir: PathBuf,
}

/// Static roots in priority order plus the SPA entry document name
#[derive(Debug, Clone)]
pub struct StaticRoots {
    roots: Vec<StaticRoot>,
    index_file: String,
}

impl StaticRoots {
    pub fn new(roots: Vec<StaticRoot>, index_file: impl Into<String>) -> Self {
        Self {
            roots,
            index_file: index_file.into(),
        }
    }

    /// External directory first, then each bundled directory in order
    pub fn from_config(config: &StaticFilesConfig) -> Self {
        let external = config
            .external_dir
            .iter()
            .filter(|d| !d.trim().is_empty())
            .map(|d| StaticRoot {
                kind: RootKind::External,
                dir: PathBuf::from(d),
            });
        let bundled = config.bundled_dirs.iter().map(|d| StaticRoot {
            kind: RootKind::Bundled,
            dir: PathBuf::from(d),
        });

        let roots: Vec<StaticRoot> = external.chain(bundled).collect();
        for (i, root) in roots.iter().enumerate() {
            logger::log_static_root(i + 1, &root.dir, root.dir.is_dir());
        }
        Self::new(roots, config.index_file.clone())
    }

    pub fn roots(&self) -> &[StaticRoot] {
        &self.roots
    }

    pub fn index_file(&self) -> &str {
        &self.index_file
    }

    /// Look `request_path` up in a single root
    ///
    /// Only regular files count; directories, traversal attempts and paths
    /// escaping the root through symlinks yield `None`.
    pub fn file_in_root(root: &StaticRoot, request_path: &str) -> Option<PathBuf> {
        let relative = sanitize_relative(request_path)?;
        let candidate = root.dir.join(relative);
        if !candidate.is_file() {
            return None;
        }

        let root_canonical = root.dir.canonicalize().ok()?;
        let file_canonical = candidate.canonicalize().ok()?;
        if !file_canonical.starts_with(&root_canonical) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                file_canonical.display()
            ));
            return None;
        }
        Some(candidate)
    }

    /// First root holding `request_path` as a regular file
    pub fn find_file(&self, request_path: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .find_map(|root| Self::file_in_root(root, request_path))
    }

    /// SPA entry document, searched with the same root priority as assets
    pub fn locate_index(&self) -> Option<PathBuf> {
        self.find_file(&self.index_file)
    }

    /// Like `locate_index`, but a missing document is a configuration error
    pub fn require_index(&self) -> Result<PathBuf> {
        self.locate_index().ok_or_else(|| {
            logger::log_index_missing(&self.index_file);
            let searched: Vec<String> = self
                .roots
                .iter()
                .map(|r| r.dir.display().to_string())
                .collect();
            AppError::Configuration(format!(
                "SPA entry document '{}' not found in static roots [{}]",
                self.index_file,
                searched.join(", ")
            ))
        })
    }
}

/// Turn a URL path into a relative filesystem path
///
/// Rejects `..`, absolute components, backslashes and NUL bytes. An empty
/// path (the site root) has no file of its own.
fn sanitize_relative(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.contains('\\') || trimmed.contains('\0') {
        return None;
    }

    let relative = Path::new(trimmed);
    let only_normal = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    only_normal.then(|| relative.to_path_buf())
}
