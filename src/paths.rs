use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// The project directory being packaged, resolved once per run.
///
/// Archive names are taken relative to `base`, the parent of the cleaned
/// root, so every name starts with the project folder. Resolving through
/// `canonicalize` makes `proj`, `proj/` and `./proj/.` indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub root: PathBuf,
    pub base: PathBuf,
    pub project: String,
}

impl SourceRoot {
    pub fn resolve(source: &Path) -> Result<Self> {
        let root = fs::canonicalize(source).map_err(|e| Error::SourceMissing {
            path: source.to_path_buf(),
            source: e,
        })?;

        if !root.is_dir() {
            return Err(Error::NotADirectory { path: root });
        }

        let (Some(base), Some(project)) = (root.parent(), root.file_name()) else {
            return Err(Error::NoParent { path: root });
        };
        let Some(project) = project.to_str() else {
            return Err(Error::NonUtf8Name { path: root });
        };

        Ok(Self {
            base: base.to_path_buf(),
            project: project.to_string(),
            root,
        })
    }

    pub fn relative_name(&self, path: &Path) -> Option<String> {
        relative_name(&self.base, path)
    }
}

/// Name of `path` relative to `base`, joined with `/` on every platform.
///
/// Segments that are not UTF-8 are converted lossily; the archive walk
/// rejects such names before they get here.
pub fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

pub fn entry_name(name: &str, is_dir: bool) -> String {
    let trimmed = name.trim_end_matches('/');
    if is_dir {
        format!("{trimmed}/")
    } else {
        trimmed.to_string()
    }
}

pub fn segments(name: &str) -> Vec<&str> {
    name.split('/').filter(|s| !s.is_empty()).collect()
}

/// Turns a `--tests` value (relative to the source) into a project-rooted name.
pub fn test_dir_name(project: &str, raw: &str) -> String {
    let rest: Vec<_> = raw
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if rest.is_empty() {
        project.to_string()
    } else {
        format!("{project}/{}", rest.join("/"))
    }
}
