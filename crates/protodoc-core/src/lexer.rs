//! Word accumulation and keyword classification.
//!
//! The [`Lexer`] collects non-whitespace runes into a word and, when
//! whitespace ends the word, classifies it as a [`Token`]. Comments are read
//! eagerly: the lexer hands them over as [`Token::Comment`] with their text.
//!
//! A `//` sentinel only opens a comment when whitespace follows it. Written
//! without the space (`//nocomment`), the slashes and the text form an
//! ordinary [`Token::Word`], which every scope then treats like any other
//! unknown word. `/*` opens a block comment as soon as it is seen.

use crate::error::{Error, Result};
use crate::scanner::{is_separator, RuneScanner};
use std::fmt;

/// Field label keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// `required`
    Required,
    /// `optional`
    Optional,
    /// `repeated`
    Repeated,
}

/// A classified word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `syntax`
    Syntax,
    /// `package`
    Package,
    /// `import`
    Import,
    /// `option`
    Option,
    /// `enum`
    Enum,
    /// `message`
    Message,
    /// `service`
    Service,
    /// `oneof`
    Oneof,
    /// `rpc`
    Rpc,
    /// `reserved`
    Reserved,
    /// `extensions`
    Extensions,
    /// `extend`
    Extend,
    /// `required`, `optional` or `repeated`
    Label(Label),
    /// Text of a `//` or `/* */` comment
    Comment(String),
    /// Any other word
    Word(String),
}

impl Token {
    /// Classifies a complete word
    pub fn from_word(word: String) -> Self {
        match word.as_str() {
            "syntax" => Token::Syntax,
            "package" => Token::Package,
            "import" => Token::Import,
            "option" => Token::Option,
            "enum" => Token::Enum,
            "message" => Token::Message,
            "service" => Token::Service,
            "oneof" => Token::Oneof,
            "rpc" => Token::Rpc,
            "reserved" => Token::Reserved,
            "extensions" => Token::Extensions,
            "extend" => Token::Extend,
            "required" => Token::Label(Label::Required),
            "optional" => Token::Label(Label::Optional),
            "repeated" => Token::Label(Label::Repeated),
            _ => Token::Word(word),
        }
    }

    /// Returns the source text of the word this token was read from
    pub fn into_word(self) -> String {
        match self {
            Token::Word(word) => word,
            Token::Comment(text) => text,
            keyword => keyword.keyword().to_string(),
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Token::Syntax => "syntax",
            Token::Package => "package",
            Token::Import => "import",
            Token::Option => "option",
            Token::Enum => "enum",
            Token::Message => "message",
            Token::Service => "service",
            Token::Oneof => "oneof",
            Token::Rpc => "rpc",
            Token::Reserved => "reserved",
            Token::Extensions => "extensions",
            Token::Extend => "extend",
            Token::Label(Label::Required) => "required",
            Token::Label(Label::Optional) => "optional",
            Token::Label(Label::Repeated) => "repeated",
            Token::Comment(_) => "comment",
            Token::Word(_) => "word",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Comment(_) => f.write_str("comment"),
            keyword => f.write_str(keyword.keyword()),
        }
    }
}

/// Splits a scope body into tokens
#[derive(Debug)]
pub struct Lexer<'a> {
    scanner: RuneScanner<'a>,
    word: String,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: RuneScanner::new(source),
            word: String::new(),
        }
    }

    /// The underlying cursor, for extractors that continue after a keyword
    pub fn scanner(&mut self) -> &mut RuneScanner<'a> {
        &mut self.scanner
    }

    /// Reads the next token, or `None` at end of input.
    ///
    /// `scope` names the enclosing scope for error reporting. A word still
    /// pending at end of input is returned as a final token.
    pub fn next_token(&mut self, scope: &str) -> Result<Option<Token>> {
        loop {
            let Some(c) = self.scanner.next_rune() else {
                return match self.word.as_str() {
                    "/*" => Err(Error::unterminated_comment(scope)),
                    _ => Ok(self.take_word()),
                };
            };

            match self.word.as_str() {
                "//" if is_separator(c) => {
                    self.word.clear();
                    let text = if c == '\n' || c == '\r' {
                        String::new()
                    } else {
                        self.scanner.read_line_comment()
                    };
                    return Ok(Some(Token::Comment(text)));
                }
                "/*" => {
                    self.word.clear();
                    let text = self.scanner.read_block_comment(c, scope)?;
                    return Ok(Some(Token::Comment(text)));
                }
                _ => {}
            }

            if is_separator(c) {
                if let Some(token) = self.take_word() {
                    return Ok(Some(token));
                }
            } else {
                self.word.push(c);
            }
        }
    }

    fn take_word(&mut self) -> Option<Token> {
        if self.word.is_empty() {
            None
        } else {
            Some(Token::from_word(std::mem::take(&mut self.word)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        while let Some(token) = lexer.next_token("<test>").unwrap() {
            out.push(token);
        }
        out
    }

    #[test]
    fn test_keywords_and_words() {
        assert_eq!(
            tokens("  message\tFoo\r\n repeated oneof  bar "),
            vec![
                Token::Message,
                Token::Word("Foo".to_string()),
                Token::Label(Label::Repeated),
                Token::Oneof,
                Token::Word("bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_trailing_word_is_emitted() {
        assert_eq!(tokens("bad"), vec![Token::Word("bad".to_string())]);
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            tokens("// Color enumeration\nenum"),
            vec![
                Token::Comment("Color enumeration".to_string()),
                Token::Enum
            ]
        );
    }

    #[test]
    fn test_empty_line_comment_does_not_swallow_next_line() {
        assert_eq!(
            tokens("//\n// second\nmessage"),
            vec![
                Token::Comment(String::new()),
                Token::Comment("second".to_string()),
                Token::Message,
            ]
        );
    }

    #[test]
    fn test_comment_without_space_is_a_word() {
        assert_eq!(
            tokens("//nocomment here\n"),
            vec![
                Token::Word("//nocomment".to_string()),
                Token::Word("here".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            tokens("/* Foo message definition */ message /**/"),
            vec![
                Token::Comment("Foo message definition".to_string()),
                Token::Message,
                Token::Comment(String::new()),
            ]
        );
    }

    #[test]
    fn test_block_comment_directly_after_sentinel() {
        assert_eq!(
            tokens("/*tight*/ enum"),
            vec![Token::Comment("tight".to_string()), Token::Enum]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut lexer = Lexer::new("/* open");
        assert!(lexer.next_token("Foo").is_err());
    }

    #[test]
    fn test_comment_opener_at_end_of_input() {
        let mut lexer = Lexer::new("message /*");
        assert_eq!(lexer.next_token("Foo").unwrap(), Some(Token::Message));
        match lexer.next_token("Foo").unwrap_err() {
            Error::UnterminatedComment { scope } => assert_eq!(scope, "Foo"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_keyword_round_trips_to_word() {
        for word in ["syntax", "rpc", "optional", "extend", "Foo"] {
            assert_eq!(Token::from_word(word.to_string()).into_word(), word);
        }
    }
}
