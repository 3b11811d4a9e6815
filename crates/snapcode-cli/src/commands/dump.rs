use std::path::PathBuf;

use snapcode_core::Colors;
use snapcode_format::{BlobView, dump as dump_blob};

use super::manifest::Manifest;
use super::{CommandError, exit_on_error};

pub struct DumpArgs {
    pub blob: PathBuf,
    pub manifest: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    print!("{}", exit_on_error(dump(&args)));
}

/// Render the blob, using the manifest only for its index space.
pub fn dump(args: &DumpArgs) -> Result<String, CommandError> {
    let space = Manifest::load(&args.manifest)?.space;
    let bytes = std::fs::read(&args.blob).map_err(|source| CommandError::Read {
        path: args.blob.clone(),
        source,
    })?;
    let view = BlobView::new(&bytes, &space).map_err(|source| CommandError::Blob {
        path: args.blob.clone(),
        source,
    })?;
    Ok(dump_blob(&view, Colors::new(args.color)))
}
