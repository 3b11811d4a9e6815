//! Human-readable dump of a builtin blob.

use std::fmt::Write as _;

use snapcode_core::{CacheIndex, Colors, HowToCode, RootIndex, UnitIndex, WhereToPoint};

use crate::decode::{Decoder, Instr};
use crate::opcode::{ReferenceKind, SiteCoding};
use crate::view::BlobView;

/// Raw byte runs longer than this are elided.
const MAX_SHOWN_BYTES: usize = 16;

/// Render the blob summary followed by every unit's decoded body.
pub fn dump(view: &BlobView<'_>, colors: Colors) -> String {
    let mut out = String::new();
    dump_summary(&mut out, view);
    dump_units(&mut out, view, colors);
    out
}

fn dump_summary(out: &mut String, view: &BlobView<'_>) {
    let space = view.space();
    writeln!(out, "[blob]").unwrap();
    writeln!(out, "bytes = {}", view.bytes().len()).unwrap();
    writeln!(
        out,
        "units = {} ({} builtins + {} handler slots)",
        space.total_count(),
        space.builtin_count(),
        space.handler_count()
    )
    .unwrap();
    writeln!(out, "table = {}", view.table_start()).unwrap();
    writeln!(out, "padding = {}", view.padding_len()).unwrap();
}

fn dump_units(out: &mut String, view: &BlobView<'_>, colors: Colors) {
    let Colors {
        blue, dim, reset, ..
    } = colors;
    let pos_width = width_for(view.table_start());

    writeln!(out).unwrap();
    writeln!(out, "[units]").unwrap();
    for (index, unit) in view.units() {
        let range = view.unit_range(index);
        writeln!(
            out,
            "{blue}{index} {unit}{reset} {dim}@{} {}B{reset}",
            range.start,
            range.len()
        )
        .unwrap();

        let mut pending_nops: Option<(usize, usize)> = None;
        for (pos, instr) in Decoder::new(view.bytes(), range) {
            if let Instr::Nop = instr {
                let (start, n) = pending_nops.unwrap_or((pos, 0));
                pending_nops = Some((start, n + 1));
                continue;
            }
            if let Some((start, n)) = pending_nops.take() {
                write_nops(out, start, n, pos_width, colors);
            }
            let text = format_instr(&instr, colors);
            writeln!(out, "  {dim}{pos:>pos_width$}{reset} {text}").unwrap();
        }
        if let Some((start, n)) = pending_nops {
            write_nops(out, start, n, pos_width, colors);
        }
    }
}

fn write_nops(out: &mut String, start: usize, n: usize, pos_width: usize, colors: Colors) {
    let Colors { dim, reset, .. } = colors;
    if n == 1 {
        writeln!(out, "  {dim}{start:>pos_width$}{reset} nop").unwrap();
    } else {
        writeln!(out, "  {dim}{start:>pos_width$}{reset} nop ×{n}").unwrap();
    }
}

/// One-line rendering of an instruction.
pub fn format_instr(instr: &Instr<'_>, colors: Colors) -> String {
    let Colors {
        yellow, dim, reset, ..
    } = colors;
    match *instr {
        Instr::Nop => "nop".to_string(),
        Instr::NewCode {
            ref_count,
            instructions,
        } => format!(
            "code refs={ref_count} {dim}{}{reset}",
            format_bytes(instructions)
        ),
        Instr::NewByteArray(bytes) => format!("byte_array {dim}{}{reset}", format_bytes(bytes)),
        Instr::NewFixedArray { len } => format!("fixed_array len={len}"),
        Instr::NewString(bytes) => format!("string {:?}", String::from_utf8_lossy(bytes)),
        Instr::NewHeapNumber(value) => format!("heap_number {value}"),
        Instr::Skip(distance) => format!("skip {distance}"),
        Instr::Smi(value) => format!("smi {value}"),
        Instr::Reference {
            kind,
            coding,
            index,
        } => format!(
            "{yellow}{} {}{reset}{}",
            kind.mnemonic(),
            format_target(kind, index),
            format_coding(coding)
        ),
        Instr::Raw(bytes) => format!("raw {dim}{}{reset}", format_bytes(bytes)),
    }
}

fn format_target(kind: ReferenceKind, index: u32) -> String {
    match kind {
        ReferenceKind::Root => RootIndex(index).to_string(),
        ReferenceKind::SelfReference => UnitIndex(index).to_string(),
        ReferenceKind::CacheReference => CacheIndex(index).to_string(),
    }
}

fn format_coding(coding: SiteCoding) -> String {
    let mut s = String::new();
    if coding.how == HowToCode::FromCode {
        s.push_str(" from_code");
    }
    if coding.point == WhereToPoint::InnerPointer {
        s.push_str(" inner");
    }
    s
}

fn format_bytes(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(MAX_SHOWN_BYTES)];
    let mut s = String::from("[");
    for (i, b) in shown.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        write!(s, "{b:02x}").unwrap();
    }
    s.push(']');
    if bytes.len() > MAX_SHOWN_BYTES {
        write!(s, " +{}", bytes.len() - MAX_SHOWN_BYTES).unwrap();
    }
    s
}

/// Decimal digits needed to print `n`.
fn width_for(n: usize) -> usize {
    n.max(1).ilog10() as usize + 1
}
