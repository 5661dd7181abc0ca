//! # protodoc-core
//!
//! A library for turning Protocol Buffer source files into a documentation tree.
//!
//! This crate provides the core functionality for:
//! - Scanning `.proto` text into statements, comments and brace-balanced blocks
//! - Parsing enums, messages (recursively), oneofs and services
//! - Attaching each comment to the declaration that follows it
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scanner`]: Rune cursor and the statement/comment/block extractors
//! - [`lexer`]: Word accumulation and keyword tokens
//! - [`parser`]: Scope parsers and the schema builder
//! - [`model`]: The serializable documentation tree
//! - [`visit`]: Schema traversal
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use protodoc_core::{ErrorPolicy, Parser, ParserConfig};
//!
//! let source = r#"
//!     syntax = "proto3";
//!     package custom;
//!
//!     // A greeting
//!     message Hello {
//!         string name = 1;
//!     }
//! "#;
//!
//! let parser = Parser::with_config(ParserConfig::new().error_policy(ErrorPolicy::SkipMalformed));
//! let outcome = parser.parse(source)?;
//!
//! assert_eq!(outcome.schema.package_name, "custom");
//! assert_eq!(outcome.schema.messages[0].comment, "A greeting");
//! assert!(outcome.skipped.is_empty());
//! # Ok::<(), protodoc_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`SchemaVisitor`]: Walk a parsed schema without writing the recursion
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod visit;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use model::{Documentation, Repo, Schema};
pub use parser::entity::ProtoSyntax;
pub use parser::{parse_file, ErrorPolicy, ParseOutcome, Parser, ParserConfig};
pub use visit::{walk_schema, NullVisitor, SchemaVisitor, StatsVisitor};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum valid protobuf field number (2^29 - 1)
/// Used for `extensions X to max` ranges
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;
