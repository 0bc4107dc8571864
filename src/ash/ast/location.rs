//! Byte offset and line/column conversion
//!
//! Token spans from the grammar are byte ranges; results carry positions.

use super::position::Position;

pub struct SourceLocation {
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    /// Convert a line/column position back to a byte offset.
    ///
    /// Positions past the last line clamp to the start of the last line.
    pub fn position_to_byte(&self, position: Position) -> usize {
        let line = position.line.min(self.line_starts.len() - 1);
        self.line_starts[line] + position.column
    }

    /// Byte offset where the line holding `byte_offset` ends (exclusive, before the newline)
    pub fn line_end(&self, byte_offset: usize, source_len: usize) -> usize {
        let line = self.byte_to_position(byte_offset).line;
        self.line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(source_len)
    }
}
