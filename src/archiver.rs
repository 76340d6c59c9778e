use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::classifier::{Classifier, Diagnostics};
use crate::error::{Error, Result};
use crate::paths::SourceRoot;
use crate::tree::{Entry, EntryKind, Walk};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub directories: usize,
    pub excluded: usize,
    /// Symbolic links left out because they do not point at a project file.
    pub skipped_links: usize,
    pub bytes: u64,
}

pub fn archive_file_name(project: &str, date: NaiveDate) -> String {
    format!("{project}-{}.zip", date.format("%Y-%m-%d"))
}

pub fn format_size(bytes: u64) -> String {
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1_024.0;

    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;

    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else {
        format!("{:.1} KB", value / KB)
    }
}

/// Writes every included entry under `root` into a new zip at `target`.
///
/// On any error the partially written archive is removed before the error
/// is returned.
pub fn package(
    root: &SourceRoot,
    target: &Path,
    classifier: &Classifier,
    diagnostics: &mut Diagnostics,
) -> Result<Summary> {
    package_with(root, target, classifier, diagnostics, |path: &Path| File::open(path))
}

/// [`package`] with the file contents read through `open`.
fn package_with<R, F>(
    root: &SourceRoot,
    target: &Path,
    classifier: &Classifier,
    diagnostics: &mut Diagnostics,
    open: F,
) -> Result<Summary>
where
    R: Read,
    F: Fn(&Path) -> io::Result<R>,
{
    let file = File::create(target).map_err(|e| Error::TargetCreate {
        path: target.to_path_buf(),
        source: e,
    })?;
    let output = fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());

    let archive = Archive {
        root,
        output: &output,
        classifier,
        open,
    };
    let result = archive.write(file, diagnostics);

    if result.is_err()
        && let Err(e) = fs::remove_file(target)
    {
        log::warn!("failed to remove incomplete archive {}: {e}", target.display());
    }

    result
}

struct Archive<'a, F> {
    root: &'a SourceRoot,
    output: &'a Path,
    classifier: &'a Classifier,
    open: F,
}

impl<F> Archive<'_, F> {
    fn write<R>(&self, file: File, diagnostics: &mut Diagnostics) -> Result<Summary>
    where
        R: Read,
        F: Fn(&Path) -> io::Result<R>,
    {
        let mut zip = ZipWriter::new(file);
        let mut summary = Summary::default();
        let mut walk = Walk::new(self.root);

        while let Some(entry) = walk.next() {
            let entry = entry?;

            if entry.path == self.output {
                log::debug!("skipping the output archive: {}", entry.name);
                continue;
            }

            if !self.classifier.classify(&entry.name, diagnostics).is_included() {
                summary.excluded += 1;
                if entry.is_dir() {
                    walk.prune();
                }
                continue;
            }

            match entry.kind {
                EntryKind::Symlink => match entry.linked_file(&self.root.root) {
                    Some(target) if target == self.output => {
                        log::debug!("skipping a link to the output archive: {}", entry.name);
                    }
                    Some(target) => {
                        log::debug!("adding {} from {}", entry.name, target.display());
                        summary.bytes += self.add_file(&mut zip, &target, entry.archive_name())?;
                        summary.files += 1;
                    }
                    None => {
                        log::warn!(
                            "Skipping symbolic link `{}`: it does not point to a file inside the project",
                            entry.name
                        );
                        summary.skipped_links += 1;
                    }
                },
                EntryKind::Dir => {
                    add_directory(&mut zip, &entry)?;
                    summary.directories += 1;
                }
                EntryKind::File => {
                    summary.bytes += self.add_file(&mut zip, &entry.path, entry.archive_name())?;
                    summary.files += 1;
                }
            }
        }

        zip.finish().map_err(|e| Error::Zip {
            name: "central directory".to_string(),
            source: e,
        })?;

        Ok(summary)
    }

    /// Copies the file at `path` into the archive under `name`.
    fn add_file<R>(&self, zip: &mut ZipWriter<File>, path: &Path, name: String) -> Result<u64>
    where
        R: Read,
        F: Fn(&Path) -> io::Result<R>,
    {
        let read_error = |e: io::Error| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        };

        let metadata = fs::metadata(path).map_err(read_error)?;
        let mut source = (self.open)(path).map_err(read_error)?;
        log::trace!("adding {name}");

        zip.start_file(name.as_str(), entry_options(&metadata))
            .map_err(|e| Error::Zip { name, source: e })?;

        io::copy(&mut source, zip).map_err(|e| Error::Copy {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn add_directory(zip: &mut ZipWriter<File>, entry: &Entry) -> Result<()> {
    let metadata = fs::metadata(&entry.path).map_err(|e| Error::FileRead {
        path: entry.path.clone(),
        source: e,
    })?;
    let name = entry.archive_name();
    log::trace!("adding {name}");

    zip.add_directory(name.as_str(), entry_options(&metadata))
        .map_err(|e| Error::Zip { name, source: e })
}

fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    let mut options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= u64::from(u32::MAX));

    if let Some(time) = metadata.modified().ok().and_then(zip_time) {
        options = options.last_modified_time(time);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.unix_permissions(metadata.permissions().mode() & 0o777);
    }

    options
}

/// Zip timestamps cover 1980..=2107; anything else keeps the writer's default.
fn zip_time(modified: SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = modified.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        u8::try_from(local.month()).ok()?,
        u8::try_from(local.day()).ok()?,
        u8::try_from(local.hour()).ok()?,
        u8::try_from(local.minute()).ok()?,
        u8::try_from(local.second()).ok()?,
    )
    .ok()
}
