//! Line and column lookup for spans.
//!
//! Diagnostics carry byte offsets; the `lex` and `parse` dumps and the
//! terminal summary show 1-based `line:col` positions instead.

use hoist_ir::Span;

/// Byte offset of every line start in a source file.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Scan the source once for newlines.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx as u32) + 1
    }

    /// 1-based `(line, column)`; the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .offsets
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, col as u32 + 1)
    }

    /// Start position of a span.
    pub fn span_start(&self, source: &str, span: Span) -> (u32, u32) {
        self.offset_to_line_col(source, span.start)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_col_lookup() {
        let source = "let a = 1\nconst b = 2\n\nvar c";
        let table = LineOffsetTable::build(source);

        assert_eq!(table.line_count(), 4);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 4), (1, 5));
        assert_eq!(table.offset_to_line_col(source, 10), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 22), (3, 1));
        assert_eq!(table.offset_to_line_col(source, 27), (4, 5));
    }

    #[test]
    fn test_column_counts_characters() {
        let source = "'héllo' + x";
        let table = LineOffsetTable::build(source);
        // `x` sits at byte 11 but character 10
        assert_eq!(table.span_start(source, Span::new(11, 12)), (1, 11));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let source = "abc";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 99), (1, 4));
    }
}
