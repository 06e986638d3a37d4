use std::fmt::{self, Debug, Formatter};
use std::ops::Range;

/// A byte-offset range into the original query text.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// A span covering both `self` and `other`, in source order.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(s: Span) -> Self {
        s.start..s.end
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Span::new(r.start, r.end)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Maps byte offsets into `(line, col)` pairs for a source string, computed
/// once up front rather than tracked incrementally while lexing. 1-based
/// lines, 0-based columns, both counted in `char`s rather than bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { line_starts }
    }

    /// The 1-based line and 0-based column containing `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let col = offset - self.line_starts[line];
        (line + 1, col)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn union_takes_the_outer_bounds() {
        let a = Span::new(5, 10);
        let b = Span::new(2, 7);
        assert_eq!(a.union(b), Span::new(2, 10));
    }

    #[test]
    fn line_index_finds_line_and_col() {
        let index = LineIndex::new("show devices\nwhere x = 1\n");
        assert_eq!(index.line_col(0), (1, 0));
        assert_eq!(index.line_col(13), (2, 0));
        assert_eq!(index.line_col(19), (2, 6));
    }
}
