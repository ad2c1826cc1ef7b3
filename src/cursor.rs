//! Terminal cursor helpers for composing ANSI sequences.
//!
//! The renderer builds each frame out of these so call sites never hand-roll
//! escape codes.

const CSI: &str = "\x1b[";

/// Move the cursor to an absolute 1-based `row` and `column`.
pub fn move_to(row: u16, column: u16) -> String {
    format!("{CSI}{row};{column}H")
}

/// Clear from the cursor to the end of the line.
pub fn clear_to_line_end() -> &'static str {
    "\x1b[K"
}

/// Clear the whole line the cursor is on.
pub fn clear_line() -> &'static str {
    "\x1b[2K"
}
