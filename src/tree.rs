use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::paths::{self, SourceRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Location on disk, used to read content.
    pub path: PathBuf,
    /// Archive-relative name without a trailing `/`.
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Name as written to the archive: directories end with `/`.
    pub fn archive_name(&self) -> String {
        paths::entry_name(&self.name, self.is_dir())
    }

    /// Resolves a symbolic link that points at a regular file under `root`.
    ///
    /// Links to directories, dangling links and links leaving `root` give
    /// `None`. `root` must be canonical.
    pub fn linked_file(&self, root: &Path) -> Option<PathBuf> {
        if self.kind != EntryKind::Symlink {
            return None;
        }
        let target = fs::canonicalize(&self.path).ok()?;
        (target.is_file() && target.starts_with(root)).then_some(target)
    }
}

/// Lazy depth-first walk of a source root in lexicographic order.
///
/// Parents come before their children. Call [`Walk::prune`] right after a
/// directory is yielded to skip everything beneath it.
pub struct Walk {
    inner: walkdir::IntoIter,
    base: PathBuf,
}

impl Walk {
    pub fn new(root: &SourceRoot) -> Self {
        let inner = WalkDir::new(&root.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            inner,
            base: root.base.clone(),
        }
    }

    pub fn prune(&mut self) {
        self.inner.skip_current_dir();
    }
}

impl Iterator for Walk {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if entry.file_name().to_str().is_none() {
                return Some(Err(Error::NonUtf8Name {
                    path: entry.into_path(),
                }));
            }

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            };

            // Only paths below the base can be named; the walk never leaves it.
            let Some(name) = paths::relative_name(&self.base, entry.path()) else {
                continue;
            };

            return Some(Ok(Entry {
                path: entry.into_path(),
                name,
                kind,
            }));
        }
    }
}
