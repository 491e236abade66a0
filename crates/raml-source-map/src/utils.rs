//! Conversions between byte offsets and line/column positions.

/// Convert a byte offset to a 0-indexed `(line, column)` pair.
///
/// Columns count characters, not bytes. Returns None if the offset is out of
/// bounds.
pub fn offset_to_line_col(source: &str, offset: usize) -> Option<(usize, usize)> {
    if offset > source.len() {
        return None;
    }

    let mut line = 0;
    let mut column = 0;

    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    Some((line, column))
}

/// Convert 0-indexed line and column numbers to a byte offset.
///
/// Returns None if the position is past the end of its line or of the source.
pub fn line_col_to_offset(source: &str, line: usize, col: usize) -> Option<usize> {
    let mut current_line = 0;
    let mut current_col = 0;

    for (offset, ch) in source.char_indices() {
        if current_line == line && current_col == col {
            return Some(offset);
        }

        if ch == '\n' {
            if current_line == line {
                return None;
            }
            current_line += 1;
            current_col = 0;
        } else {
            current_col += 1;
        }
    }

    // One past the last character is a valid end position
    if current_line == line && current_col == col {
        return Some(source.len());
    }

    None
}
