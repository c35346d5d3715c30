//! Resource resolver
//!
//! Decides, for a request path that no controller claimed, whether to serve
//! a static file, the SPA entry document, or nothing at all. Strategies are
//! tried in order and the first match wins:
//!
//! 1. each static root, external directory first
//! 2. SPA fallback for every path outside the reserved prefixes

use std::path::PathBuf;

use super::roots::{is_reserved_path, StaticRoot, StaticRoots};
use crate::error::{AppError, Result};

/// Outcome of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Existing file under one of the static roots
    Asset(PathBuf),
    /// Client-side route; answer with the SPA entry document
    SpaIndex(PathBuf),
    /// Reserved prefix and no file: leave it to API routing / 404 handling
    PassThrough,
}

#[derive(Debug)]
enum Strategy<'a> {
    Root(&'a StaticRoot),
    SpaFallback,
}

pub struct ResourceResolver<'a> {
    roots: &'a StaticRoots,
    strategies: Vec<Strategy<'a>>,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(roots: &'a StaticRoots) -> Self {
        let strategies = roots
            .roots()
            .iter()
            .map(Strategy::Root)
            .chain(std::iter::once(Strategy::SpaFallback))
            .collect();
        Self { roots, strategies }
    }

    /// Resolve `path` (with or without leading slash)
    ///
    /// Fails with a configuration error only when a non-reserved path needs
    /// the SPA entry document and no root holds it anymore.
    pub fn resolve(&self, path: &str) -> Result<Resolution> {
        for strategy in &self.strategies {
            match strategy {
                Strategy::Root(root) => {
                    if let Some(file) = StaticRoots::file_in_root(root, path) {
                        return Ok(Resolution::Asset(file));
                    }
                }
                Strategy::SpaFallback => {
                    if is_reserved_path(path) {
                        return Ok(Resolution::PassThrough);
                    }
                    return self.roots.locate_index().map(Resolution::SpaIndex).ok_or_else(
                        || {
                            AppError::Configuration(format!(
                                "SPA entry document '{}' disappeared from static roots",
                                self.roots.index_file()
                            ))
                        },
                    );
                }
            }
        }
        Ok(Resolution::PassThrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spa::roots::RootKind;
    use std::fs;
    use std::path::Path;

    fn roots_for(dirs: &[(RootKind, &Path)]) -> StaticRoots {
        StaticRoots::new(
            dirs.iter()
                .map(|(kind, dir)| StaticRoot {
                    kind: *kind,
                    dir: dir.to_path_buf(),
                })
                .collect(),
            "index.html",
        )
    }

    #[test]
    fn test_existing_asset_is_served() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<html>").expect("write");
        fs::write(dir.path().join("app.js"), "js").expect("write");
        let roots = roots_for(&[(RootKind::Bundled, dir.path())]);

        let resolved = ResourceResolver::new(&roots).resolve("/app.js").unwrap();
        assert_eq!(resolved, Resolution::Asset(dir.path().join("app.js")));
    }

    #[test]
    fn test_client_route_gets_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<html>").expect("write");
        let roots = roots_for(&[(RootKind::Bundled, dir.path())]);
        let resolver = ResourceResolver::new(&roots);

        for path in ["/", "/dashboard/42", "expenses/2024/05", "/missing.js", "/apiary"] {
            assert_eq!(
                resolver.resolve(path).unwrap(),
                Resolution::SpaIndex(dir.path().join("index.html")),
                "path {path}"
            );
        }
    }

    #[test]
    fn test_reserved_paths_pass_through() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<html>").expect("write");
        let roots = roots_for(&[(RootKind::Bundled, dir.path())]);
        let resolver = ResourceResolver::new(&roots);

        assert_eq!(resolver.resolve("/api/unknown").unwrap(), Resolution::PassThrough);
        assert_eq!(resolver.resolve("api/unknown").unwrap(), Resolution::PassThrough);
        assert_eq!(
            resolver.resolve("/actuator/metrics").unwrap(),
            Resolution::PassThrough
        );
    }

    #[test]
    fn test_reserved_prefix_still_serves_real_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<html>").expect("write");
        fs::create_dir(dir.path().join("api")).expect("mkdir");
        fs::write(dir.path().join("api/openapi.json"), "{}").expect("write");
        let roots = roots_for(&[(RootKind::Bundled, dir.path())]);

        assert_eq!(
            ResourceResolver::new(&roots).resolve("/api/openapi.json").unwrap(),
            Resolution::Asset(dir.path().join("api/openapi.json"))
        );
    }

    #[test]
    fn test_external_overrides_bundled_asset() {
        let external = tempfile::tempdir().expect("tempdir");
        let bundled = tempfile::tempdir().expect("tempdir");
        fs::write(bundled.path().join("index.html"), "<html>").expect("write");
        fs::write(bundled.path().join("app.js"), "old").expect("write");
        fs::write(external.path().join("app.js"), "new").expect("write");
        let roots = roots_for(&[
            (RootKind::External, external.path()),
            (RootKind::Bundled, bundled.path()),
        ]);

        assert_eq!(
            ResourceResolver::new(&roots).resolve("/app.js").unwrap(),
            Resolution::Asset(external.path().join("app.js"))
        );
    }

    #[test]
    fn test_missing_index_is_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let roots = roots_for(&[(RootKind::Bundled, dir.path())]);
        let err = ResourceResolver::new(&roots).resolve("/dashboard").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
