use std::fmt;

use walkdir::{DirEntry, WalkDir};

use crate::paths::{self, SourceRoot};
use crate::rules::{DIST, NODE_MODULES, PUBLIC, VERSION_CONTROL};

const BOWER_DIR: &str = "bower_components";

const LOCKFILES: &[&str] = &["package-lock.json", "yarn.lock"];

const BOWER_FILE: &str = "bower.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smell {
    MissingLockfile,
    SourceMaps,
    MinifiedCode,
    PublicFolder,
    DistFolder,
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Smell::MissingLockfile => {
                "No `package-lock.json`, `yarn.lock` or `bower.json` found. \
                 Dependencies cannot be analyzed without a lockfile"
            }
            Smell::SourceMaps => {
                "Found `.map` files. The source tree seems to contain bundled code \
                 rather than original sources"
            }
            Smell::MinifiedCode => {
                "Found minified `.min.js` files. Findings in minified code are hard to act on"
            }
            Smell::PublicFolder => {
                "Found a `public` folder. It usually holds build output and is left out of the archive"
            }
            Smell::DistFolder => {
                "Found a `dist` folder. It usually holds build output and is left out of the archive"
            }
        };
        f.write_str(message)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SmellReport {
    pub lockfile_present: bool,
    pub source_map_present: bool,
    pub minified_present: bool,
    pub public_folder_present: bool,
    pub dist_folder_present: bool,
}

impl SmellReport {
    pub fn smells(&self) -> Vec<Smell> {
        let mut smells = Vec::new();
        if !self.lockfile_present {
            smells.push(Smell::MissingLockfile);
        }
        if self.source_map_present {
            smells.push(Smell::SourceMaps);
        }
        if self.minified_present {
            smells.push(Smell::MinifiedCode);
        }
        if self.public_folder_present {
            smells.push(Smell::PublicFolder);
        }
        if self.dist_folder_present {
            smells.push(Smell::DistFolder);
        }
        smells
    }

    /// Logs one warning per smell and returns how many were logged.
    pub fn log_warnings(&self) -> usize {
        let smells = self.smells();
        for smell in &smells {
            log::warn!("{smell}");
        }
        smells.len()
    }

    /// `segments` are the path segments below the project root.
    fn observe(&mut self, segments: &[&str], is_dir: bool) {
        let Some(name) = segments.last() else {
            return;
        };
        let in_bower = segments.contains(&BOWER_DIR);

        if is_dir {
            if !in_bower {
                self.public_folder_present |= *name == PUBLIC;
                self.dist_folder_present |= *name == DIST;
            }
            return;
        }

        if *name == BOWER_FILE || (!in_bower && LOCKFILES.contains(name)) {
            self.lockfile_present = true;
        }
        if !in_bower {
            self.source_map_present |= name.ends_with(".map");
            self.minified_present |= name.ends_with(".min.js");
        }
    }
}

/// Dependency and version-control folders say nothing about the project's own sources.
fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    NODE_MODULES
        .iter()
        .chain(VERSION_CONTROL)
        .any(|skipped| *skipped == name)
}

/// Read-only scan of the source tree. Unreadable entries are skipped.
pub fn check(root: &SourceRoot) -> SmellReport {
    let mut report = SmellReport::default();

    let walker = WalkDir::new(&root.root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("smell check skipped an entry: {e}");
                continue;
            }
        };

        let Some(name) = root.relative_name(entry.path()) else {
            continue;
        };
        let segments = paths::segments(&name);
        if let Some((_, below_root)) = segments.split_first() {
            report.observe(below_root, entry.file_type().is_dir());
        }
    }

    report
}
