use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: no such directory", path.display())]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("{}: cannot package a filesystem root", path.display())]
    NoParent { path: PathBuf },

    #[error("{}: cannot create archive: {source}", path.display())]
    TargetCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: cannot read file: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: cannot copy into archive: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: file name is not valid UTF-8", path.display())]
    NonUtf8Name { path: PathBuf },

    #[error("walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{name}: cannot write archive entry: {source}")]
    Zip {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },
}
