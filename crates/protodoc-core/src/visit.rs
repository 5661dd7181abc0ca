//! Traversal of a parsed [`Schema`].
//!
//! This module provides the [`SchemaVisitor`] trait for walking a schema
//! without writing the recursion by hand.

use crate::model::{Enum, Message, MessageField, OneOf, OneOfField, Rpc, Schema, Service};

/// Callbacks for each element of a schema.
///
/// Every method has an empty default, so an implementation only overrides
/// what it cares about. [`walk_schema`] drives the traversal.
///
/// # Example
///
/// ```
/// use protodoc_core::model::MessageField;
/// use protodoc_core::{parse_file, walk_schema, SchemaVisitor};
///
/// struct Undocumented(Vec<String>);
///
/// impl SchemaVisitor for Undocumented {
///     fn visit_field(&mut self, field: &MessageField) {
///         if field.comment.is_empty() {
///             self.0.push(field.name.clone());
///         }
///     }
/// }
///
/// let schema = parse_file("message Foo { // documented\n int32 a = 1; int32 b = 2; }")?;
/// let mut visitor = Undocumented(Vec::new());
/// walk_schema(&schema, &mut visitor);
/// assert_eq!(visitor.0, vec!["b".to_string()]);
/// # Ok::<(), protodoc_core::Error>(())
/// ```
pub trait SchemaVisitor {
    /// Visit the schema itself, before its children
    fn visit_schema(&mut self, schema: &Schema) {
        let _ = schema;
    }

    /// Visit an enum definition, including hoisted nested enums
    fn visit_enum(&mut self, enum_type: &Enum) {
        let _ = enum_type;
    }

    /// Visit a message definition, including nested messages
    fn visit_message(&mut self, message: &Message) {
        let _ = message;
    }

    /// Visit a message field
    fn visit_field(&mut self, field: &MessageField) {
        let _ = field;
    }

    /// Visit a oneof group
    fn visit_oneof(&mut self, oneof: &OneOf) {
        let _ = oneof;
    }

    /// Visit a oneof member
    fn visit_oneof_field(&mut self, field: &OneOfField) {
        let _ = field;
    }

    /// Visit a service definition
    fn visit_service(&mut self, service: &Service) {
        let _ = service;
    }

    /// Visit an RPC signature
    fn visit_rpc(&mut self, rpc: &Rpc) {
        let _ = rpc;
    }
}

/// Walks `schema` depth first, in declaration order
pub fn walk_schema(schema: &Schema, visitor: &mut impl SchemaVisitor) {
    visitor.visit_schema(schema);

    for enum_type in &schema.enums {
        visitor.visit_enum(enum_type);
    }

    for message in schema.messages.iter().flat_map(Message::iter_all) {
        visitor.visit_message(message);
        for field in &message.fields {
            visitor.visit_field(field);
        }
        for oneof in &message.oneofs {
            visitor.visit_oneof(oneof);
            for field in &oneof.fields {
                visitor.visit_oneof_field(field);
            }
        }
    }

    for service in &schema.services {
        visitor.visit_service(service);
        for rpc in &service.rpcs {
            visitor.visit_rpc(rpc);
        }
    }
}

/// A no-op visitor
pub struct NullVisitor;

impl SchemaVisitor for NullVisitor {}

/// A visitor that collects statistics about parsed schemas
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsVisitor {
    /// Number of schemas
    pub schema_count: usize,
    /// Number of messages, nested ones included
    pub message_count: usize,
    /// Number of fields, oneof members included
    pub field_count: usize,
    /// Number of enums, hoisted ones included
    pub enum_count: usize,
    /// Number of services
    pub service_count: usize,
    /// Number of RPCs
    pub rpc_count: usize,
}

impl SchemaVisitor for StatsVisitor {
    fn visit_schema(&mut self, _schema: &Schema) {
        self.schema_count += 1;
    }

    fn visit_enum(&mut self, _enum_type: &Enum) {
        self.enum_count += 1;
    }

    fn visit_message(&mut self, _message: &Message) {
        self.message_count += 1;
    }

    fn visit_field(&mut self, _field: &MessageField) {
        self.field_count += 1;
    }

    fn visit_oneof_field(&mut self, _field: &OneOfField) {
        self.field_count += 1;
    }

    fn visit_service(&mut self, _service: &Service) {
        self.service_count += 1;
    }

    fn visit_rpc(&mut self, _rpc: &Rpc) {
        self.rpc_count += 1;
    }
}
