use std::path::{Path, PathBuf};

use snapcode_serializer::{
    BuiltinSerializer, ObjectSerializer, PartialSnapshotCache, SerializerStats,
    serialize_cache_section,
};
use tracing::info;

use super::manifest::Manifest;
use super::{CommandError, exit_on_error};

pub struct BuildArgs {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub cache_output: Option<PathBuf>,
}

/// What `build` wrote.
pub struct BuildReport {
    pub builtins: SerializerStats,
    pub cache: Option<SerializerStats>,
}

pub fn run(args: BuildArgs) {
    let report = exit_on_error(build(&args));
    println!("{}", report.builtins);
    if let Some(cache) = report.cache {
        println!("cache section:");
        println!("{cache}");
    }
}

pub fn build(args: &BuildArgs) -> Result<BuildReport, CommandError> {
    let loaded = Manifest::load(&args.manifest)?.into_heap()?;
    info!(
        objects = loaded.heap.len(),
        roots = loaded.roots.len(),
        "manifest loaded"
    );

    let mut cache = PartialSnapshotCache::new();
    let snapshot =
        BuiltinSerializer::new(&loaded.heap, &loaded.space, &loaded.roots, &mut cache).serialize();
    write(&args.output, &snapshot.blob)?;

    let cache_stats = match &args.cache_output {
        Some(path) => {
            let section = serialize_cache_section(
                &loaded.heap,
                &loaded.space,
                &loaded.roots,
                &mut cache,
                &ObjectSerializer,
            );
            write(path, &section.blob)?;
            Some(section.stats)
        }
        None => None,
    };

    Ok(BuildReport {
        builtins: snapshot.stats,
        cache: cache_stats,
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), CommandError> {
    std::fs::write(path, bytes).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "written");
    Ok(())
}
