//! The scope scanning loop shared by every block kind.
//!
//! A file, a message body, a oneof body and a service body are all read the
//! same way: tokens come from a [`Lexer`], comments pile up in a
//! [`CommentBuffer`], and every other token goes to the [`Scope`] to decide
//! what it means there. Each scope owns its own buffer, so a comment never
//! leaks into or out of a nested block.

use super::ErrorPolicy;
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use tracing::{trace, warn};

/// Pending comment text for the next declaration in a scope
#[derive(Debug, Default)]
pub(crate) struct CommentBuffer {
    text: Option<String>,
}

impl CommentBuffer {
    /// Appends a comment block, newline-separated from earlier ones
    pub(crate) fn push(&mut self, comment: String) {
        match &mut self.text {
            Some(text) => {
                text.push('\n');
                text.push_str(&comment);
            }
            None => self.text = Some(comment),
        }
    }

    /// Takes the pending comment, leaving the buffer empty
    pub(crate) fn take(&mut self) -> String {
        self.text.take().unwrap_or_default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}

/// State shared across all scopes of one file
#[derive(Debug)]
pub(crate) struct Session {
    policy: ErrorPolicy,
    skipped: Vec<Error>,
}

impl Session {
    pub(crate) fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            skipped: Vec::new(),
        }
    }

    /// Applies the error policy to the result of parsing one declaration.
    ///
    /// Returns `Ok(None)` when the declaration was malformed and is skipped.
    pub(crate) fn recover<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.policy == ErrorPolicy::SkipMalformed && err.is_recoverable() => {
                warn!("skipping declaration: {}", err);
                self.skipped.push(err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn into_skipped(self) -> Vec<Error> {
        self.skipped
    }
}

/// Everything a [`Scope`] needs to handle a token
pub(crate) struct Cursor<'s, 'p> {
    lexer: Lexer<'s>,
    comments: CommentBuffer,
    pub(crate) session: &'p mut Session,
}

impl Cursor<'_, '_> {
    /// Takes the comment for the declaration being parsed
    pub(crate) fn take_comment(&mut self) -> String {
        self.comments.take()
    }

    /// Reads a `;`-terminated statement
    pub(crate) fn statement(&mut self) -> String {
        self.lexer.scanner().extract_statement()
    }

    /// Reads an RPC signature
    pub(crate) fn rpc_statement(&mut self, scope: &str) -> Result<String> {
        self.lexer.scanner().extract_rpc_statement(scope)
    }

    /// Reads a named `{ ... }` block
    pub(crate) fn block(&mut self, scope: &str) -> Result<(String, String)> {
        self.lexer.scanner().extract_block(scope)
    }

    /// Reads and drops a statement, along with any pending comment
    pub(crate) fn discard_statement(&mut self, keyword: &Token) {
        self.comments.take();
        let statement = self.statement();
        trace!("discarding '{}{}'", keyword, statement);
    }

    /// Reads and drops a block, along with any pending comment
    pub(crate) fn discard_block(&mut self, scope: &str, keyword: &Token) -> Result<()> {
        self.comments.take();
        let (name, _) = self.block(scope)?;
        trace!("discarding '{} {}' block in '{}'", keyword, name, scope);
        Ok(())
    }

    pub(crate) fn recover<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        self.session.recover(result)
    }
}

/// One kind of block body and its keyword handling
pub(crate) trait Scope {
    /// Name used in error messages
    fn name(&self) -> &str;

    /// Handles one non-comment token
    fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()>;
}

/// Runs `scope` over `body` until end of input
pub(crate) fn scan<S: Scope>(scope: &mut S, body: &str, session: &mut Session) -> Result<()> {
    let mut cx = Cursor {
        lexer: Lexer::new(body),
        comments: CommentBuffer::default(),
        session,
    };

    while let Some(token) = cx.lexer.next_token(scope.name())? {
        match token {
            Token::Comment(text) => cx.comments.push(text),
            token => match strip_empty_statements(token) {
                Some(token) => scope.accept(token, &mut cx)?,
                None => trace!("skipping empty statement in '{}'", scope.name()),
            },
        }
    }

    if !cx.comments.is_empty() {
        trace!("dropping trailing comment in '{}'", scope.name());
    }

    Ok(())
}

/// Drops the `;` of empty statements (`};`, `;;`) glued to the front of a word
fn strip_empty_statements(token: Token) -> Option<Token> {
    match token {
        Token::Word(word) if word.starts_with(';') => {
            let rest = word.trim_start_matches(';');
            (!rest.is_empty()).then(|| Token::from_word(rest.to_string()))
        }
        token => Some(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comment_buffer_joins_with_newline() {
        let mut buffer = CommentBuffer::default();
        assert!(buffer.is_empty());
        buffer.push("first".to_string());
        buffer.push("second".to_string());
        assert_eq!(buffer.take(), "first\nsecond");
        assert!(buffer.is_empty());
        assert_eq!(buffer.take(), "");
    }

    #[test]
    fn test_comment_buffer_keeps_empty_comments() {
        let mut buffer = CommentBuffer::default();
        buffer.push(String::new());
        buffer.push("text".to_string());
        assert_eq!(buffer.take(), "\ntext");
    }

    #[test]
    fn test_session_fail_fast() {
        let mut session = Session::new(ErrorPolicy::FailFast);
        let result: Result<()> = Err(Error::malformed("Foo", "x", "bad"));
        assert!(session.recover(result).is_err());
    }

    #[test]
    fn test_session_skips_only_recoverable() {
        let mut session = Session::new(ErrorPolicy::SkipMalformed);
        let malformed: Result<()> = Err(Error::malformed("Foo", "x", "bad"));
        assert!(session.recover(malformed).unwrap().is_none());

        let structural: Result<()> = Err(Error::unterminated_block("Foo", "Bar"));
        assert!(session.recover(structural).is_err());

        assert_eq!(session.recover(Ok(3)).unwrap(), Some(3));
        assert_eq!(session.into_skipped().len(), 1);
    }

    /// Records which tokens reach the scope and which comment they saw
    struct Recorder {
        seen: Vec<(String, String)>,
    }

    impl Scope for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()> {
            let comment = cx.take_comment();
            self.seen.push((token.into_word(), comment));
            Ok(())
        }
    }

    #[test]
    fn test_scan_threads_comments() {
        let mut scope = Recorder { seen: Vec::new() };
        let mut session = Session::new(ErrorPolicy::FailFast);
        scan(
            &mut scope,
            "// one\n/* two */ alpha beta\n// dangling\n",
            &mut session,
        )
        .unwrap();

        assert_eq!(
            scope.seen,
            vec![
                ("alpha".to_string(), "one\ntwo".to_string()),
                ("beta".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_scan_skips_empty_statements() {
        let mut scope = Recorder { seen: Vec::new() };
        let mut session = Session::new(ErrorPolicy::FailFast);
        scan(&mut scope, "; // kept
;; alpha ;beta ;;;", &mut session).unwrap();

        assert_eq!(
            scope.seen,
            vec![
                ("alpha".to_string(), "kept".to_string()),
                ("beta".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_strip_empty_statements_keeps_keywords() {
        assert_eq!(
            strip_empty_statements(Token::Word(";message".to_string())),
            Some(Token::Message)
        );
        assert_eq!(strip_empty_statements(Token::Word(";;".to_string())), None);
        assert_eq!(strip_empty_statements(Token::Enum), Some(Token::Enum));
    }
}
