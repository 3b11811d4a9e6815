use std::path::Path;

use indoc::indoc;

use super::build::{BuildArgs, build};
use super::dump::{DumpArgs, dump};
use super::CommandError;

const HEAP: &str = indoc! {r#"
    {
      "space": { "builtins": 1, "operations": 1, "widths": 2 },
      "objects": [
        { "shape": "code", "kind": "stub", "instructions": [204] },
        { "shape": "code", "kind": "builtin", "id": 0, "instructions": [1, 2, 0, 0, 0, 0],
          "embedded": [{ "offset": 2, "target": 4 }] },
        { "shape": "string", "value": "hi" },
        { "shape": "code", "kind": "bytecode_handler", "operation": 0, "width": 1,
          "instructions": [0, 0, 0, 0], "embedded": [{ "offset": 0, "target": 2 }] },
        { "shape": "heap_number", "value": 2.5 }
      ],
      "roots": [2],
      "builtins": [1],
      "handlers": [{ "operation": 0, "width": 1, "object": 3 }],
      "lazy_handlers": [0, 0, 0]
    }
"#};

fn write_manifest(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("heap.json");
    std::fs::write(&path, HEAP).unwrap();
    path
}

#[test]
fn build_then_dump() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path());
    let output = dir.path().join("builtins.bin");
    let cache_output = dir.path().join("cache.bin");

    let report = build(&BuildArgs {
        manifest: manifest.clone(),
        output: output.clone(),
        cache_output: Some(cache_output.clone()),
    })
    .unwrap();

    assert_eq!(report.builtins.units, 2);
    assert_eq!(report.builtins.absent_slots, 1);
    assert_eq!(report.builtins.references.root, 1);
    assert_eq!(report.builtins.references.cache, 1);
    assert_eq!(std::fs::read(&output).unwrap().len(), 44);

    let cache = report.cache.unwrap();
    assert_eq!(cache.units, 1);
    assert_eq!(std::fs::read(&cache_output).unwrap().len(), 20);

    let text = dump(&DumpArgs {
        blob: output,
        manifest,
        color: false,
    })
    .unwrap();
    insta::assert_snapshot!(text, @r"
    [blob]
    bytes = 44
    units = 3 (1 builtins + 2 handler slots)
    table = 32
    padding = 8

    [units]
    U0 builtin 0 @0 14B
       0 code refs=1 [01 02 00 00 00 00]
      10 skip 2
      12 cache C0
    U1 handler 0/w0 @14 0B
    U2 handler 0/w1 @14 10B
      14 code refs=1 [00 00 00 00]
      22 root R0
    ");
}

#[test]
fn build_without_cache_section() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path());
    let output = dir.path().join("builtins.bin");

    let report = build(&BuildArgs {
        manifest,
        output: output.clone(),
        cache_output: None,
    })
    .unwrap();

    assert!(report.cache.is_none());
    assert!(output.exists());
}

#[test]
fn dump_rejects_truncated_blob() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path());
    let blob = dir.path().join("short.bin");
    std::fs::write(&blob, [0u8; 4]).unwrap();

    let err = dump(&DumpArgs {
        blob,
        manifest,
        color: false,
    })
    .unwrap_err();

    assert!(matches!(err, CommandError::Blob { .. }));
    assert!(err.to_string().ends_with("blob too small: 4 bytes, offset table needs 12"));
}

#[test]
fn build_reports_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path());

    let err = build(&BuildArgs {
        manifest,
        output: dir.path().join("missing").join("builtins.bin"),
        cache_output: None,
    })
    .err()
    .unwrap();

    assert!(matches!(err, CommandError::Write { .. }));
}

#[test]
fn build_rejects_mismatched_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("heap.json");
    std::fs::write(&manifest, HEAP.replace(r#""builtins": [1]"#, r#""builtins": [2]"#)).unwrap();
    let output = dir.path().join("builtins.bin");

    let err = build(&BuildArgs {
        manifest,
        output: output.clone(),
        cache_output: None,
    })
    .err()
    .unwrap();

    assert!(matches!(err, CommandError::Manifest(_)));
    assert_eq!(err.to_string(), "builtin 0 is object 2, a string, not code");
    assert!(!output.exists());
}
