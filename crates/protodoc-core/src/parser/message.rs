//! Message and oneof bodies.

use super::entity::{block_name, parse_enum, parse_extensions, parse_field, parse_oneof_field};
use super::scope::{scan, Cursor, Scope, Session};
use crate::error::Result;
use crate::lexer::{Label, Token};
use crate::model::{Enum, Message, OneOf};
use tracing::debug;

/// A parsed message plus the enums hoisted out of it
#[derive(Debug)]
pub(crate) struct ParsedMessage {
    pub(crate) message: Message,
    /// Enums declared in this message or any nested one, in source order
    pub(crate) hoisted: Vec<Enum>,
}

/// Parses a message body.
///
/// Nested messages recurse with the dotted name `<name>.<Inner>`. Nested
/// enums are not stored on the message; they come back in
/// [`ParsedMessage::hoisted`] for the caller to flatten into the schema.
pub(crate) fn parse_message(
    name: String,
    body: &str,
    comment: String,
    session: &mut Session,
) -> Result<ParsedMessage> {
    debug!("parsing message '{}'", name);

    let mut scope = MessageScope {
        message: Message {
            name,
            comment,
            ..Default::default()
        },
        hoisted: Vec::new(),
    };
    scan(&mut scope, body, session)?;

    Ok(ParsedMessage {
        message: scope.message,
        hoisted: scope.hoisted,
    })
}

/// Parses a oneof body
pub(crate) fn parse_oneof(
    name: String,
    body: &str,
    comment: String,
    session: &mut Session,
) -> Result<OneOf> {
    let mut scope = OneofScope {
        oneof: OneOf {
            name,
            comment,
            fields: Vec::new(),
        },
    };
    scan(&mut scope, body, session)?;
    Ok(scope.oneof)
}

struct MessageScope {
    message: Message,
    hoisted: Vec<Enum>,
}

impl MessageScope {
    fn nested_name(&self, local: &str) -> String {
        format!("{}.{}", self.message.name, local)
    }

    fn field(
        &mut self,
        statement: &str,
        label: Option<Label>,
        cx: &mut Cursor<'_, '_>,
    ) -> Result<()> {
        let comment = cx.take_comment();
        let parsed = parse_field(&self.message.name, statement, label, comment);
        if let Some(field) = cx.recover(parsed)? {
            self.message.fields.push(field);
        }
        Ok(())
    }
}

impl Scope for MessageScope {
    fn name(&self) -> &str {
        &self.message.name
    }

    fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()> {
        match token {
            Token::Enum => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(self.name())?;
                let parsed = block_name(self.name(), "enum", &name)
                    .and_then(|name| parse_enum(self.nested_name(&name), &body, comment));
                if let Some(nested) = cx.recover(parsed)? {
                    self.hoisted.push(nested);
                }
            }
            Token::Message => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(self.name())?;
                let parsed = block_name(self.name(), "message", &name).and_then(|name| {
                    parse_message(self.nested_name(&name), &body, comment, cx.session)
                });
                if let Some(nested) = cx.recover(parsed)? {
                    self.message.nested_messages.push(nested.message);
                    self.hoisted.extend(nested.hoisted);
                }
            }
            Token::Oneof => {
                let comment = cx.take_comment();
                let (name, body) = cx.block(self.name())?;
                let parsed = block_name(self.name(), "oneof", &name)
                    .and_then(|name| parse_oneof(name, &body, comment, cx.session));
                if let Some(oneof) = cx.recover(parsed)? {
                    self.message.oneofs.push(oneof);
                }
            }
            Token::Extensions => {
                cx.take_comment();
                let statement = cx.statement();
                let parsed = parse_extensions(self.name(), &statement);
                if let Some(range) = cx.recover(parsed)? {
                    if self.message.extensions.is_some() {
                        debug!(
                            "'{}' already has an extension range, ignoring '{}'",
                            self.name(),
                            statement.trim()
                        );
                    } else {
                        self.message.extensions = Some(range);
                    }
                }
            }
            Token::Reserved | Token::Option => cx.discard_statement(&token),
            Token::Extend => cx.discard_block(&self.message.name, &token)?,
            Token::Label(label) => {
                let statement = cx.statement();
                self.field(&statement, Some(label), cx)?;
            }
            // Anything else is the type of a field declared without a label
            other => {
                let statement = format!("{} {}", other.into_word(), cx.statement());
                self.field(&statement, None, cx)?;
            }
        }
        Ok(())
    }
}

struct OneofScope {
    oneof: OneOf,
}

impl OneofScope {
    fn field(
        &mut self,
        statement: &str,
        is_repeated: bool,
        cx: &mut Cursor<'_, '_>,
    ) -> Result<()> {
        let comment = cx.take_comment();
        let parsed = parse_oneof_field(&self.oneof.name, statement, is_repeated, comment);
        if let Some(field) = cx.recover(parsed)? {
            self.oneof.fields.push(field);
        }
        Ok(())
    }
}

impl Scope for OneofScope {
    fn name(&self) -> &str {
        &self.oneof.name
    }

    fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()> {
        match token {
            Token::Option => cx.discard_statement(&token),
            Token::Label(label) => {
                let statement = cx.statement();
                self.field(&statement, label == Label::Repeated, cx)?;
            }
            other => {
                let statement = format!("{} {}", other.into_word(), cx.statement());
                self.field(&statement, false, cx)?;
            }
        }
        Ok(())
    }
}
