use snapcode_core::UnitIndex;

use crate::constants::{NEW_OBJECT, NOP, SHAPE_BYTE_ARRAY};
use crate::index_space::{CodeUnit, IndexSpace};
use crate::view::{BlobError, BlobView};

const SPACE: IndexSpace = IndexSpace::new(1, 1, 1);

fn blob(body: &[u8], offsets: &[u32]) -> Vec<u8> {
    let mut bytes = body.to_vec();
    bytes.extend(offsets.iter().flat_map(|o| o.to_le_bytes()));
    bytes
}

/// One 5-byte builtin, an absent handler, then three NOPs of padding.
fn valid_blob() -> Vec<u8> {
    blob(
        &[NEW_OBJECT, SHAPE_BYTE_ARRAY, 0x08, 0xAA, 0xBB, NOP, NOP, NOP],
        &[0, 5],
    )
}

#[test]
fn slices_offset_table() {
    let bytes = valid_blob();
    let view = BlobView::new(&bytes, &SPACE).unwrap();

    assert_eq!(view.offsets(), &[0, 5]);
    assert_eq!(view.table_start(), 8);
    assert_eq!(view.body_region().len(), 8);
    assert_eq!(view.offset(UnitIndex(1)), 5);
}

#[test]
fn unit_ranges() {
    let bytes = valid_blob();
    let view = BlobView::new(&bytes, &SPACE).unwrap();

    assert_eq!(view.unit_range(UnitIndex(0)), 0..5);
    assert_eq!(view.unit_bytes(UnitIndex(0)), &[NEW_OBJECT, 2, 0x08, 0xAA, 0xBB]);
    // Absent last slot: nothing before the padding.
    assert_eq!(view.unit_range(UnitIndex(1)), 5..5);
    assert_eq!(view.body_end(), 5);
    assert_eq!(view.padding_len(), 3);
}

#[test]
fn zero_bytes_inside_last_body_are_not_padding() {
    // Byte array ending in 0x00, then three NOPs.
    let bytes = blob(
        &[NEW_OBJECT, SHAPE_BYTE_ARRAY, 0x08, 0x00, 0x00, NOP, NOP, NOP],
        &[0, 0],
    );
    let view = BlobView::new(&bytes, &SPACE).unwrap();

    assert_eq!(view.unit_range(UnitIndex(0)), 0..0);
    assert_eq!(view.unit_range(UnitIndex(1)), 0..5);
    assert_eq!(view.padding_len(), 3);
}

#[test]
fn undecodable_tail_stays_in_body() {
    let bytes = blob(&[NOP, NOP, NOP, NOP, NOP, NOP, NOP, 0xFF], &[0, 0]);
    let view = BlobView::new(&bytes, &SPACE).unwrap();

    assert_eq!(view.body_end(), 8);
    assert_eq!(view.padding_len(), 0);
}

#[test]
fn units_follow_index_space() {
    let bytes = valid_blob();
    let view = BlobView::new(&bytes, &SPACE).unwrap();
    let units: Vec<_> = view.units().map(|(_, unit)| unit).collect();

    assert_eq!(units.len(), 2);
    assert!(units[0].is_builtin());
    assert!(matches!(units[1], CodeUnit::Handler { .. }));
}

#[test]
fn too_small() {
    let err = BlobView::new(&[0; 4], &SPACE).unwrap_err();
    assert_eq!(
        err,
        BlobError::TooSmall {
            needed: 8,
            actual: 4
        }
    );
}

#[test]
fn misaligned_table() {
    let bytes = blob(&[NOP; 4], &[0, 0]);
    let err = BlobView::new(&bytes, &SPACE).unwrap_err();
    assert_eq!(err, BlobError::MisalignedTable(4));
}

#[test]
fn missing_padding() {
    let bytes = blob(&[], &[0, 0]);
    let err = BlobView::new(&bytes, &SPACE).unwrap_err();
    assert_eq!(err, BlobError::MissingPadding(0));
}

#[test]
fn non_monotonic() {
    let bytes = blob(&[NOP; 8], &[5, 0]);
    let err = BlobView::new(&bytes, &SPACE).unwrap_err();
    assert_eq!(
        err,
        BlobError::NonMonotonic {
            index: 1,
            offset: 0,
            previous: 5
        }
    );
}

#[test]
fn offset_inside_padding() {
    let bytes = blob(&[NOP; 8], &[0, 6]);
    let err = BlobView::new(&bytes, &SPACE).unwrap_err();
    assert_eq!(
        err,
        BlobError::OffsetOutOfRange {
            index: 1,
            offset: 6,
            end: 5
        }
    );
}

#[test]
fn error_display() {
    let err = BlobError::TooSmall {
        needed: 28,
        actual: 3,
    };
    assert_eq!(
        err.to_string(),
        "blob too small: 3 bytes, offset table needs 28"
    );

    let err = BlobError::MisalignedTable(12);
    assert_eq!(
        err.to_string(),
        "offset table starts at 12, not 8-byte aligned"
    );
}
