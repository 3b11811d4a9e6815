use indoc::indoc;
use snapcode_core::Colors;

use crate::constants::{CACHE_REF, NEW_OBJECT, NOP, ROOT, SMI};
use crate::decode::Instr;
use crate::dump::{dump, format_instr};
use crate::index_space::IndexSpace;
use crate::view::BlobView;

/// Two builtins, one handler, one absent handler slot.
fn sample_blob() -> Vec<u8> {
    #[rustfmt::skip]
    let mut bytes = vec![
        // U0: byte array [aa bb]
        NEW_OBJECT, 2, 0x08, 0xAA, 0xBB,
        // U1: code, 4 instruction bytes, one from-code root reference
        NEW_OBJECT, 1, 0x10, 0x04, 0x01, 0x02, 0x03, 0x04,
        ROOT + 1, 0x08,
        // U2: fixed array [smi -2, cache 0]
        NEW_OBJECT, 3, 0x08,
        SMI, 0xFE, 0xFF, 0xFF, 0xFF,
        CACHE_REF, 0x00,
    ];
    bytes.extend([NOP; 7]);
    for offset in [0u32, 5, 15, 25] {
        bytes.extend(offset.to_le_bytes());
    }
    bytes
}

#[test]
fn dump_lists_units_and_instructions() {
    let bytes = sample_blob();
    let space = IndexSpace::new(2, 1, 2);
    let view = BlobView::new(&bytes, &space).unwrap();

    insta::assert_snapshot!(dump(&view, Colors::OFF), @r"
    [blob]
    bytes = 48
    units = 4 (2 builtins + 2 handler slots)
    table = 32
    padding = 7

    [units]
    U0 builtin 0 @0 5B
       0 byte_array [aa bb]
    U1 builtin 1 @5 10B
       5 code refs=1 [01 02 03 04]
      13 root R2 from_code
    U2 handler 0/w0 @15 10B
      15 fixed_array len=2
      18 smi -2
      23 cache C0
    U3 handler 0/w1 @25 0B
    ");
}

#[test]
fn dump_with_colors() {
    let bytes = sample_blob();
    let space = IndexSpace::new(2, 1, 2);
    let view = BlobView::new(&bytes, &space).unwrap();
    let out = dump(&view, Colors::ON);

    assert!(out.contains("\x1b[34mU1 builtin 1\x1b[0m"));
    assert!(out.contains("\x1b[33mroot R2\x1b[0m from_code"));
}

#[test]
fn long_byte_runs_are_elided() {
    let bytes: Vec<u8> = (0..20).collect();
    let text = format_instr(&Instr::NewByteArray(&bytes), Colors::OFF);

    assert_eq!(
        text,
        "byte_array [00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f] +4"
    );
}

#[test]
fn simple_instructions() {
    let render = |instr| format_instr(&instr, Colors::OFF);

    assert_eq!(render(Instr::Skip(12)), "skip 12");
    assert_eq!(render(Instr::NewHeapNumber(1.5)), "heap_number 1.5");
    assert_eq!(render(Instr::NewString(b"ab")), r#"string "ab""#);
    assert_eq!(render(Instr::Raw(&[0xFF])), "raw [ff]");
}

#[test]
fn empty_blob_dump() {
    // No units at all: just the padding.
    let bytes = [NOP; 8];
    let space = IndexSpace::new(0, 0, 0);
    let view = BlobView::new(&bytes, &space).unwrap();

    assert_eq!(
        dump(&view, Colors::OFF),
        indoc! {"
            [blob]
            bytes = 8
            units = 0 (0 builtins + 0 handler slots)
            table = 8
            padding = 8

            [units]
        "}
    );
}
