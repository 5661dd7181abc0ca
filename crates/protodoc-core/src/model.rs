//! Documentation tree produced by the parser.
//!
//! Ownership is strictly hierarchical: a parent owns its children and nothing
//! points back up. Field names serialize in camelCase, which is the stable key
//! set downstream JSON consumers rely on.
//!
//! Enums declared inside a message are not stored on the [`Message`]. They are
//! hoisted into [`Schema::enums`] under their dotted name (`Outer.Inner`), so a
//! consumer finds every enum of a file in one flat list.

use serde::{Deserialize, Serialize};

/// Root of the tree: one [`Schema`] per parsed source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    /// Repository the sources were read from
    pub repo: Repo,
    /// Parsed files, in discovery order
    pub schema: Vec<Schema>,
}

/// Repository metadata attached to the documentation root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Display name
    pub name: String,
    /// Base URL
    pub url: String,
}

/// One parsed `.proto` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Directory of the file, relative to the crawl root
    pub file_path: String,
    /// File name
    pub file_name: String,
    /// Source URL
    pub url: String,
    /// Declared package, empty if none
    pub package_name: String,
    /// Top-level enums followed in source order by hoisted nested enums
    pub enums: Vec<Enum>,
    /// Top-level messages
    pub messages: Vec<Message>,
    /// Services
    pub services: Vec<Service>,
}

/// An enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// Name, dotted when nested (`Outer.Inner`)
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Values in source order
    pub values: Vec<EnumValue>,
}

/// A single enumeration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Value name
    pub name: String,
    /// Numeric value; not required to be unique
    pub value: i32,
}

/// A message definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Name, dotted when nested (`Outer.Inner`)
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Extension range, if declared
    #[serde(default)]
    pub extensions: Option<FieldExtensions>,
    /// Fields in source order
    pub fields: Vec<MessageField>,
    /// Oneof groups in source order
    pub oneofs: Vec<OneOf>,
    /// Directly nested messages
    pub nested_messages: Vec<Message>,
}

/// Inclusive range of tag numbers reserved for extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtensions {
    /// Lowest tag
    pub min_tag: u32,
    /// Highest tag
    pub max_tag: u32,
}

/// A message field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageField {
    /// Field name
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Declared type as written (`string`, `foo.Bar`, `map<string, int32>`)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Tag number
    pub tag: u32,
    /// Declared `required`
    pub is_required: bool,
    /// Declared `repeated`
    pub is_repeated: bool,
    /// Reserved for extension fields; the parser never sets it
    pub is_extension: bool,
    /// Bracketed options suffix as written, e.g. `[packed = true]`
    pub annotation: String,
}

/// A oneof group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOf {
    /// Group name
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Member fields
    pub fields: Vec<OneOfField>,
}

/// A oneof member; members are implicitly optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOfField {
    /// Field name
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Declared type as written
    #[serde(rename = "type")]
    pub type_name: String,
    /// Tag number
    pub tag: u32,
    /// Declared `repeated`
    pub is_repeated: bool,
    /// Bracketed options suffix as written
    pub annotation: String,
}

/// A service definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Remote procedure calls in source order
    pub rpcs: Vec<Rpc>,
}

/// A remote procedure call signature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rpc {
    /// Method name
    pub name: String,
    /// Preceding comment
    pub comment: String,
    /// Request type
    pub rpc_input: RpcType,
    /// Response type
    pub rpc_output: RpcType,
}

/// Request or response type of an [`Rpc`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcType {
    /// Referenced message type
    #[serde(rename = "type")]
    pub type_name: String,
    /// Qualified with `stream`
    pub is_stream: bool,
}

impl Documentation {
    /// Creates an empty documentation root for the given repository
    pub fn new(repo: Repo) -> Self {
        Self {
            repo,
            schema: Vec::new(),
        }
    }
}

impl Message {
    /// Iterates over this message and all nested messages, depth first
    pub fn iter_all(&self) -> impl Iterator<Item = &Message> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.nested_messages.iter().rev());
            Some(next)
        })
    }
}
