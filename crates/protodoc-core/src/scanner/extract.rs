//! Extractors that read one syntactic unit from a [`RuneScanner`].

use super::{is_separator, RuneScanner};
use crate::error::{Error, Result};

/// Lexical context inside a block body or statement.
///
/// Braces and semicolons only count when they appear in code, never inside
/// a string literal or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Str { quote: char, escaped: bool },
    LineComment,
    BlockComment,
}

#[derive(Debug)]
struct Literals {
    mode: Mode,
    prev: Option<char>,
    comments: bool,
}

impl Literals {
    /// Tracks string literals only
    fn strings() -> Self {
        Self {
            mode: Mode::Code,
            prev: None,
            comments: false,
        }
    }

    /// Tracks string literals and comments
    fn strings_and_comments() -> Self {
        Self {
            comments: true,
            ..Self::strings()
        }
    }

    /// Feeds one rune and returns true if it is structural code
    fn feed(&mut self, c: char) -> bool {
        let (next, structural) = match self.mode {
            Mode::Code => match c {
                '"' | '\'' => (
                    Mode::Str {
                        quote: c,
                        escaped: false,
                    },
                    false,
                ),
                '/' if self.comments && self.prev == Some('/') => (Mode::LineComment, false),
                '*' if self.comments && self.prev == Some('/') => (Mode::BlockComment, false),
                _ => (Mode::Code, true),
            },
            Mode::Str { quote, escaped } => {
                let next = if escaped {
                    Mode::Str {
                        quote,
                        escaped: false,
                    }
                } else if c == '\\' {
                    Mode::Str {
                        quote,
                        escaped: true,
                    }
                } else if c == quote {
                    Mode::Code
                } else {
                    self.mode
                };
                (next, false)
            }
            Mode::LineComment if c == '\n' => (Mode::Code, false),
            Mode::BlockComment if c == '/' && self.prev == Some('*') => (Mode::Code, false),
            mode => (mode, false),
        };

        // The rune that switches mode must not pair with the one after it
        self.prev = if next == self.mode { Some(c) } else { None };
        self.mode = next;
        structural
    }
}

impl RuneScanner<'_> {
    /// Reads a statement up to `;` or end of input.
    ///
    /// The `;` is consumed but not returned. A `;` inside a quoted string
    /// or inside braces (an aggregate option value) does not end the
    /// statement.
    pub fn extract_statement(&mut self) -> String {
        let mut statement = String::new();
        let mut literals = Literals::strings();
        let mut depth = 0usize;

        while let Some(c) = self.next_rune() {
            if literals.feed(c) {
                match c {
                    ';' if depth == 0 => break,
                    '{' => depth += 1,
                    '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            statement.push(c);
        }

        statement
    }

    /// Reads an RPC signature.
    ///
    /// The signature ends at `;` or at the end of the RPC's `{ ... }` body.
    /// The body itself, empty or holding options, is consumed and dropped.
    pub fn extract_rpc_statement(&mut self, scope: &str) -> Result<String> {
        let mut statement = String::new();

        while let Some(c) = self.next_rune() {
            match c {
                ';' => break,
                '{' => {
                    self.read_block_body(scope, statement.trim())?;
                    break;
                }
                c => statement.push(c),
            }
        }

        statement.truncate(statement.trim_end().len());
        Ok(statement)
    }

    /// Reads the rest of a `//` comment up to the end of the line
    pub fn read_line_comment(&mut self) -> String {
        let mut comment = String::new();

        while let Some(c) = self.next_rune() {
            if c == '\n' || c == '\r' {
                break;
            }
            comment.push(c);
        }

        comment
    }

    /// Reads a `/* ... */` comment body after its opening sentinel.
    ///
    /// `first` is the rune that followed `/*`. Whitespace there only
    /// separates the sentinel from the text; anything else belongs to the
    /// body. A single leading `*` (doc comments written `/**`) is dropped and
    /// trailing whitespace trimmed. The first `*/` always terminates.
    pub fn read_block_comment(&mut self, first: char, scope: &str) -> Result<String> {
        let mut raw = String::new();
        if !is_separator(first) {
            raw.push(first);
        }

        while !raw.ends_with("*/") {
            match self.next_rune() {
                Some(c) => raw.push(c),
                None => return Err(Error::unterminated_comment(scope)),
            }
        }

        raw.truncate(raw.len() - 2);
        let body = raw.strip_prefix('*').unwrap_or(&raw);
        Ok(body.trim_end().to_string())
    }

    /// Reads a named block: `Name { body }`.
    ///
    /// Runes before the first `{` form the name, whitespace discarded. The
    /// body is everything between that `{` and its matching `}`, with the
    /// outer braces stripped exactly once. Nesting depth is unbounded.
    pub fn extract_block(&mut self, scope: &str) -> Result<(String, String)> {
        let mut name = String::new();

        loop {
            match self.next_rune() {
                Some('{') => break,
                Some(c) if is_separator(c) => {}
                Some(c) => name.push(c),
                None => return Err(Error::unterminated_block(scope, name)),
            }
        }

        let body = self.read_block_body(scope, &name)?;
        Ok((name, body))
    }

    /// Reads up to the `}` matching an already consumed `{`
    fn read_block_body(&mut self, scope: &str, name: &str) -> Result<String> {
        let mut body = String::new();
        let mut literals = Literals::strings_and_comments();
        let mut depth = 1usize;

        loop {
            let Some(c) = self.next_rune() else {
                return Err(Error::unterminated_block(scope, name));
            };

            if literals.feed(c) {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(body);
                        }
                    }
                    _ => {}
                }
            }

            body.push(c);
        }
    }
}
