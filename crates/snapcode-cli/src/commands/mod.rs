pub mod build;
pub mod dump;
pub mod manifest;

#[cfg(test)]
mod build_tests;

use std::path::PathBuf;

use snapcode_format::BlobError;

use manifest::ManifestError;

/// Failure of a command, printed as `error: …` before exiting with status 1.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Blob { path: PathBuf, source: BlobError },
}

/// Unwrap a command result or report the error and exit.
pub fn exit_on_error<T>(result: Result<T, CommandError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
