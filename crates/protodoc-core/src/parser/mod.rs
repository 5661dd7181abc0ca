//! Recursive descent from `.proto` source text to a [`Schema`].
//!
//! ## Architecture
//!
//! Every block kind is read by the same scanning loop (see `scope`), which
//! hands keywords to a scope-specific handler:
//!
//! | scope   | keywords                                                            |
//! |---------|---------------------------------------------------------------------|
//! | file    | `syntax` `package` `enum` `message` `service` `import` `option`     |
//! | message | `enum` `message` `oneof` `reserved` `extensions` `option`, labels   |
//! | oneof   | `option`, labels                                                    |
//! | service | `rpc` `option`                                                      |
//!
//! Unknown words are ignored at file and service level. In message and oneof
//! bodies they start a field declared without a label.
//!
//! Comments attach to the next declaration in the same scope. Enums declared
//! inside messages are hoisted into [`Schema::enums`] with a dotted name.
//!
//! ## Example
//!
//! ```
//! use protodoc_core::parse_file;
//!
//! let schema = parse_file("enum Color { White = 0; Black = 1; }")?;
//! assert_eq!(schema.enums[0].name, "Color");
//! assert_eq!(schema.enums[0].values[1].name, "Black");
//! # Ok::<(), protodoc_core::Error>(())
//! ```

pub mod entity;
mod message;
mod scope;
mod service;

use crate::error::{Error, Result};
use crate::lexer::Token;
use crate::model::Schema;
use entity::{block_name, parse_enum, parse_package, ProtoSyntax};
use message::parse_message;
use scope::{scan, Cursor, Scope, Session};
use service::parse_service;
use std::path::Path;
use tracing::{debug, trace};

/// Scope name used for file-level errors
pub const FILE_SCOPE: &str = "<file>";

/// What to do when a declaration does not match its expected shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the file on the first malformed declaration
    #[default]
    FailFast,
    /// Skip malformed declarations and keep parsing
    SkipMalformed,
}

/// Configuration for the parser
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Handling of malformed declarations
    pub error_policy: ErrorPolicy,
    /// Reject files that have no `syntax` statement
    pub require_syntax: bool,
}

impl ParserConfig {
    /// Creates a new parser config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Sets whether a `syntax` statement is mandatory
    pub fn require_syntax(mut self, require: bool) -> Self {
        self.require_syntax = require;
        self
    }
}

/// Result of parsing one file
#[derive(Debug)]
pub struct ParseOutcome {
    /// The parsed schema
    pub schema: Schema,
    /// Declared syntax, if the file has a `syntax` statement
    pub syntax: Option<ProtoSyntax>,
    /// Declarations skipped under [`ErrorPolicy::SkipMalformed`]
    pub skipped: Vec<Error>,
}

/// `.proto` source parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a new parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parses the content of one file
    pub fn parse(&self, content: &str) -> Result<ParseOutcome> {
        let mut session = Session::new(self.config.error_policy);
        let mut scope = SchemaScope::default();
        scan(&mut scope, content, &mut session)?;

        if self.config.require_syntax && scope.syntax.is_none() {
            return Err(Error::unsupported_syntax("<missing>"));
        }

        debug!(
            "parsed package '{}': {} enums, {} messages, {} services",
            scope.schema.package_name,
            scope.schema.enums.len(),
            scope.schema.messages.len(),
            scope.schema.services.len()
        );

        Ok(ParseOutcome {
            schema: scope.schema,
            syntax: scope.syntax,
            skipped: session.into_skipped(),
        })
    }

    /// Reads and parses a file; every error carries the file path
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;

        let mut outcome = self.parse(&content).map_err(|e| e.in_file(path))?;
        outcome.skipped = outcome
            .skipped
            .into_iter()
            .map(|e| e.in_file(path))
            .collect();
        Ok(outcome)
    }
}

/// Parses file content with the default fail-fast configuration
pub fn parse_file(content: &str) -> Result<Schema> {
    Parser::new().parse(content).map(|outcome| outcome.schema)
}

#[derive(Debug, Default)]
struct SchemaScope {
    schema: Schema,
    syntax: Option<ProtoSyntax>,
}

impl Scope for SchemaScope {
    fn name(&self) -> &str {
        FILE_SCOPE
    }

    fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()> {
        match token {
            Token::Syntax => {
                cx.take_comment();
                let statement = cx.statement();
                self.syntax = Some(ProtoSyntax::try_from(statement.as_str())?);
            }
            Token::Package => {
                cx.take_comment();
                let statement = cx.statement();
                let parsed = parse_package(FILE_SCOPE, &statement);
                if let Some(package) = cx.recover(parsed)? {
                    self.schema.package_name = package;
                }
            }
            Token::Enum => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(FILE_SCOPE)?;
                let parsed = block_name(FILE_SCOPE, "enum", &name)
                    .and_then(|name| parse_enum(name, &body, comment));
                if let Some(parsed) = cx.recover(parsed)? {
                    self.schema.enums.push(parsed);
                }
            }
            Token::Message => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(FILE_SCOPE)?;
                let parsed = block_name(FILE_SCOPE, "message", &name)
                    .and_then(|name| parse_message(name, &body, comment, cx.session));
                if let Some(parsed) = cx.recover(parsed)? {
                    self.schema.messages.push(parsed.message);
                    self.schema.enums.extend(parsed.hoisted);
                }
            }
            Token::Service => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(FILE_SCOPE)?;
                let parsed = block_name(FILE_SCOPE, "service", &name)
                    .and_then(|name| parse_service(name, &body, comment, cx.session));
                if let Some(service) = cx.recover(parsed)? {
                    self.schema.services.push(service);
                }
            }
            // A comment above an import or option belongs to it and does not
            // carry over to the next declaration
            Token::Import | Token::Option => cx.discard_statement(&token),
            Token::Extend => cx.discard_block(FILE_SCOPE, &token)?,
            other => trace!("ignoring top-level word '{}'", other),
        }
        Ok(())
    }
}
