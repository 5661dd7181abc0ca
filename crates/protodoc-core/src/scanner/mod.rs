//! Character-level scanning of `.proto` source text.
//!
//! [`RuneScanner`] is a forward-only cursor over the source. It has no
//! pushback: every higher-level construct that needs lookahead consumes runes
//! and re-accumulates them itself. The extractors built on top of it live in
//! [`extract`] and each read exactly one syntactic unit:
//!
//! - a statement, up to the terminating `;`
//! - an RPC signature, up to `;` or the end of its `{ ... }` body
//! - a `//` line comment or a `/* ... */` block comment
//! - a named, brace-balanced block such as `message Foo { ... }`
//!
//! ## Example
//!
//! ```
//! use protodoc_core::scanner::RuneScanner;
//!
//! let mut scanner = RuneScanner::new(" Foo { int32 a = 1; } rest");
//! let (name, body) = scanner.extract_block("<file>")?;
//! assert_eq!(name, "Foo");
//! assert_eq!(body, " int32 a = 1; ");
//! # Ok::<(), protodoc_core::Error>(())
//! ```

mod extract;

/// Forward-only cursor over source text
#[derive(Debug, Clone)]
pub struct RuneScanner<'a> {
    source: &'a str,
    offset: usize,
}

impl<'a> RuneScanner<'a> {
    /// Creates a scanner positioned at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self { source, offset: 0 }
    }

    /// Reads the next rune, or `None` at end of input
    pub fn next_rune(&mut self) -> Option<char> {
        let c = self.source[self.offset..].chars().next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    /// Byte offset of the next unread rune
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true once every rune has been read
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// The unread part of the source
    pub fn remaining(&self) -> &'a str {
        &self.source[self.offset..]
    }
}

/// Whitespace that separates words
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}
