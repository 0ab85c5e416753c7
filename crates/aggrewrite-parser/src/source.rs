//! Where program text comes from, and character ranges inside it.
//!
//! Offsets count `char`s, not bytes, because the lexer feeds chumsky one
//! `char` at a time. ariadne reports use the same offsets.

use internment::Intern;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// The origin of a piece of program text
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum SrcId {
    /// Text handed over directly, e.g. a test string or a body fragment
    Inline,
    File(Intern<PathBuf>),
}

impl SrcId {
    pub fn empty() -> Self {
        SrcId::Inline
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        SrcId::File(Intern::new(path.as_ref().to_path_buf()))
    }

    /// The file path, if the text was read from a file
    pub fn path(&self) -> Option<&Path> {
        match self {
            SrcId::Inline => None,
            SrcId::File(path) => Some(path.as_path()),
        }
    }
}

impl fmt::Display for SrcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SrcId::Inline => write!(f, "<inline>"),
            SrcId::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Debug for SrcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Half-open `char` range `start..end` in one source
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    src: SrcId,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(src: SrcId, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "inverted span {:?}", range);
        Span {
            src,
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Zero-width span just past the last character of `text`
    pub fn after(src: SrcId, text: &str) -> Self {
        let len = text.chars().count();
        Span::new(src, len..len)
    }

    pub fn src(&self) -> SrcId {
        self.src
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 1-based line and column of the span start within `text`
    pub fn line_col(&self, text: &str) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for ch in text.chars().take(self.start) {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.src, self.start, self.end)
    }
}

impl chumsky::Span for Span {
    type Context = SrcId;
    type Offset = usize;

    fn new(src: SrcId, range: Range<usize>) -> Self {
        Span::new(src, range)
    }

    fn context(&self) -> SrcId {
        self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl ariadne::Span for Span {
    type SourceId = SrcId;

    fn source(&self) -> &SrcId {
        &self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
#[path = "../tests/unit/source_tests.rs"]
mod tests;
