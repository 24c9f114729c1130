use std::fmt::Display;

/// A byte offset somewhere in the source code
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BytePos(usize);

impl BytePos {
    pub const fn new(pos: usize) -> Self {
        BytePos(pos)
    }

    /// Move past the given character, which may span several bytes.
    pub fn shift(self, ch: char) -> Self {
        BytePos(self.0 + ch.len_utf8())
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

impl Display for BytePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subsection of the source code
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Starting position (inclusive)
    pub start: BytePos,
    /// Ending position (exclusive)
    pub end: BytePos,
}

impl Span {
    pub const fn new(start: BytePos, end: BytePos) -> Span {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset() - self.start.offset()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Convert the given span to the "(at 1:2)" format
    pub fn at_str(&self) -> String {
        format!("(at {})", self)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use crate::span::{BytePos, Span};

    #[test]
    fn shift_counts_utf8_bytes() {
        let pos = BytePos::new(0).shift('a').shift('é');
        assert_eq!(pos, BytePos::new(3));
    }

    #[test]
    fn at_str_format() {
        let span = Span::new(BytePos::new(4), BytePos::new(7));
        assert_eq!(span.len(), 3);
        assert_eq!(span.at_str(), "(at 4:7)");
        assert!(Span::default().is_empty());
    }
}
