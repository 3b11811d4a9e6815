//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::dump::DumpArgs;

pub struct BuildParams {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub cache_output: Option<PathBuf>,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            manifest: required_path(m, "manifest"),
            output: required_path(m, "output"),
            cache_output: m.get_one::<PathBuf>("cache_out").cloned(),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            manifest: p.manifest,
            output: p.output,
            cache_output: p.cache_output,
        }
    }
}

pub struct DumpParams {
    pub blob: PathBuf,
    pub manifest: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            blob: required_path(m, "blob"),
            manifest: required_path(m, "manifest"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            blob: p.blob,
            manifest: p.manifest,
            color: p.color.should_colorize(),
        }
    }
}

/// Number of `-v` flags.
pub fn verbosity(m: &ArgMatches) -> u8 {
    m.get_count("verbose")
}

fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_else(|| unreachable!("clap marks {id} as required"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
