//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("snapcode")
        .about("Serialize builtins and bytecode handlers into a snapshot blob")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(build_command())
        .subcommand(dump_command())
}

/// Serialize a manifest's heap into a builtin blob.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Serialize a manifest into a builtin blob")
        .override_usage("  snapcode build <MANIFEST> -o <OUT> [--cache-out <PATH>]")
        .after_help(
            r#"EXAMPLES:
  snapcode build heap.json -o builtins.bin
  snapcode build heap.json -o builtins.bin --cache-out cache.bin
  RUST_LOG=trace snapcode build heap.json -o builtins.bin"#,
        )
        .arg(manifest_path_arg())
        .arg(output_arg())
        .arg(cache_out_arg())
}

/// Print the decoded contents of a builtin blob.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the units and instructions of a builtin blob")
        .override_usage("  snapcode dump <BLOB> --manifest <MANIFEST>")
        .after_help(
            r#"EXAMPLES:
  snapcode dump builtins.bin -m heap.json
  snapcode dump builtins.bin -m heap.json --color never"#,
        )
        .arg(blob_path_arg())
        .arg(manifest_flag_arg())
        .arg(color_arg())
}
