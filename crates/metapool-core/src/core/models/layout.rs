use super::well::{PlateShape, Well, WellError};

// A 384-well plate holding four 96-well plates interleaved by row and column parity
// is unpacked into four contiguous 6-column blocks, one per source plate.
const BLOCK_COLS: usize = 6;
const HALF_PLATE_COLS: usize = 12;

/// Maps a well of a 2x2-interleaved 384-well plate to its position in the
/// column-block layout (`plate1 | plate2 | plate3 | plate4`).
pub fn interleaved_to_contiguous(well: Well) -> Result<Well, WellError> {
    let (row, col) = PlateShape::PLATE_384.check(well)?.to_row_col();

    let row_offset = row % 2;
    let new_row = row - row_offset + col / HALF_PLATE_COLS;

    let col_offset = col % 2 + row_offset * 2;
    let new_col = col_offset * BLOCK_COLS + (col / 2) % BLOCK_COLS;

    Ok(Well::at(new_row, new_col))
}

/// Inverse of [`interleaved_to_contiguous`].
pub fn contiguous_to_interleaved(well: Well) -> Result<Well, WellError> {
    let (new_row, new_col) = PlateShape::PLATE_384.check(well)?.to_row_col();

    let col_offset = new_col / BLOCK_COLS;
    let row_offset = col_offset / 2;
    let half = new_row % 2;

    let row = new_row - half + row_offset;
    let col = half * HALF_PLATE_COLS + (new_col % BLOCK_COLS) * 2 + col_offset % 2;

    Ok(Well::at(row, col))
}

/// Remaps a list of source wells, preserving order.
pub fn reformat_interleaved_to_columns(wells: &[Well]) -> Result<Vec<Well>, WellError> {
    wells.iter().copied().map(interleaved_to_contiguous).collect()
}
