//! Tests for grid construction and cell addressing.

use qa_common::{CellOrder, MaskGrid, QaGrid, QaMaskError};

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_landsat_sized_grid() {
    let grid = QaGrid::new(64, 32, vec![0x2800; 64 * 32]).unwrap();
    assert_eq!(grid.len(), 2048);
    assert_eq!(grid.order(), CellOrder::RowMajor);
}

#[test]
fn test_mismatch_reports_dimensions() {
    match QaGrid::from_u16(10, 10, &[0u16; 99]) {
        Err(QaMaskError::DimensionMismatch { width, height, len }) => {
            assert_eq!((width, height, len), (10, 10, 99));
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
}

#[test]
fn test_mask_rejects_empty() {
    assert_eq!(
        MaskGrid::new(0, 0, CellOrder::RowMajor, vec![]),
        Err(QaMaskError::EmptyGrid)
    );
}

// ============================================================================
// Addressing
// ============================================================================

#[test]
fn test_row_and_column_major_address_same_cell() {
    // 3x2 grid where value = col * 1000 + row
    let row_major: Vec<u32> = (0..2)
        .flat_map(|row| (0..3).map(move |col| col * 1000 + row))
        .collect();
    let col_major: Vec<u32> = (0..3)
        .flat_map(|col| (0..2).map(move |row| col * 1000 + row))
        .collect();

    let a = QaGrid::new(3, 2, row_major).unwrap();
    let b = QaGrid::with_order(3, 2, CellOrder::ColumnMajor, col_major).unwrap();

    for row in 0..2 {
        for col in 0..3 {
            assert_eq!(a.get(col, row), b.get(col, row));
            assert_eq!(a.get(col, row), Some(col as u32 * 1000 + row as u32));
        }
    }
}

#[test]
fn test_into_data_returns_buffer() {
    let grid = QaGrid::from_u8(2, 1, &[3, 4]).unwrap();
    assert_eq!(grid.into_data(), vec![3, 4]);
}
