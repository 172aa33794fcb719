//! Route manifest
//!
//! Built once at startup from the application's page configuration and
//! never mutated afterward. It answers three questions: which absolute
//! path a symbolic name maps to, whether a path exists at all, and
//! whether a path is a declared persistent tab.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Result;

/// One page declaration. Paths are root-relative in the source
/// configuration; resolution makes them absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Declared persistent tab page
    #[serde(default)]
    pub tab: bool,
}

/// A group of pages living under a shared root segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubPackage {
    pub root: String,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// The raw page configuration as found on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageManifest {
    #[serde(default)]
    pub pages: Vec<PageEntry>,
    #[serde(default, rename = "subPackages")]
    pub sub_packages: Vec<SubPackage>,
}

/// Compiled lookup tables over a `PageManifest`.
#[derive(Debug, Clone, Default)]
pub struct RouteManifest {
    names: HashMap<String, String>,
    paths: HashSet<String>,
    tabs: HashSet<String>,
}

impl RouteManifest {
    pub fn from_manifest(manifest: &PageManifest) -> Self {
        let mut names = HashMap::new();
        let mut paths = HashSet::new();
        let mut tabs = HashSet::new();

        {
            let mut register = |path: String, entry: &PageEntry| {
                if let Some(name) = &entry.name {
                    names.insert(name.clone(), path.clone());
                }
                if entry.tab {
                    tabs.insert(path.clone());
                }
                paths.insert(path);
            };

            for page in &manifest.pages {
                register(absolute(&page.path), page);
            }

            for sub in &manifest.sub_packages {
                let root = sub.root.trim_matches('/');
                for page in &sub.pages {
                    register(
                        format!("/{}/{}", root, page.path.trim_start_matches('/')),
                        page,
                    );
                }
            }
        }

        tracing::debug!(
            paths = paths.len(),
            names = names.len(),
            tabs = tabs.len(),
            "Compiled route manifest"
        );

        Self { names, paths, tabs }
    }

    /// Parse a JSON page configuration and compile it.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: PageManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(&manifest))
    }

    /// Absolute path registered under a symbolic name, if any.
    pub fn path_for_name(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(|s| s.as_str())
    }

    /// Whether an absolute path (query ignored) exists in the manifest.
    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(strip_query(path))
    }

    /// Whether a path is a declared persistent tab.
    pub fn is_tab_path(&self, path: &str) -> bool {
        self.tabs.contains(strip_query(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn absolute(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RouteManifest {
        RouteManifest::from_json(
            r#"{
                "pages": [
                    { "path": "pages/home/index", "name": "home", "tab": true },
                    { "path": "pages/cart/index", "name": "cart", "tab": true },
                    { "path": "pages/detail/index", "name": "detail" },
                    { "path": "pages/plain/index" }
                ],
                "subPackages": [
                    {
                        "root": "pkg-user",
                        "pages": [
                            { "path": "profile/index", "name": "profile" }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_name_lookup() {
        let manifest = sample();
        assert_eq!(manifest.path_for_name("home"), Some("/pages/home/index"));
        assert_eq!(
            manifest.path_for_name("profile"),
            Some("/pkg-user/profile/index")
        );
        assert_eq!(manifest.path_for_name("missing"), None);
    }

    #[test]
    fn test_path_set() {
        let manifest = sample();
        assert!(manifest.contains_path("/pages/plain/index"));
        assert!(manifest.contains_path("/pages/detail/index?id=3"));
        assert!(!manifest.contains_path("/pages/unknown"));
        assert_eq!(manifest.len(), 5);
    }

    #[test]
    fn test_tab_paths() {
        let manifest = sample();
        assert!(manifest.is_tab_path("/pages/home/index"));
        assert!(manifest.is_tab_path("/pages/cart/index?from=badge"));
        assert!(!manifest.is_tab_path("/pages/detail/index"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(RouteManifest::from_json("not json").is_err());
    }
}
