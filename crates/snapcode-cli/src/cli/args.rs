//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Manifest file (positional, for `build`).
pub fn manifest_path_arg() -> Arg {
    Arg::new("manifest")
        .value_name("MANIFEST")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON manifest describing the heap")
}

/// Manifest file (--manifest, for commands that take a blob positional).
pub fn manifest_flag_arg() -> Arg {
    Arg::new("manifest")
        .short('m')
        .long("manifest")
        .value_name("MANIFEST")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Manifest the blob was built from (supplies the index space)")
}

/// Builtin blob output (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("OUT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the builtin blob")
}

/// Cache section output (--cache-out).
pub fn cache_out_arg() -> Arg {
    Arg::new("cache_out")
        .long("cache-out")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Also write the cache section")
}

/// Blob to inspect (positional).
pub fn blob_path_arg() -> Arg {
    Arg::new("blob")
        .value_name("BLOB")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Builtin blob file")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .global(true)
        .action(ArgAction::Count)
        .help("Log progress to stderr (-v for debug, -vv for trace)")
}
