//! Statement-level parsers.
//!
//! Each function takes the raw text of one statement (or one enum body) and
//! either returns a populated entity or a [`Error::MalformedStatement`]
//! naming the enclosing scope and the offending text.

use crate::error::{Error, Result};
use crate::lexer::Label;
use crate::model::{Enum, EnumValue, FieldExtensions, MessageField, OneOfField, Rpc, RpcType};
use crate::MAX_FIELD_NUMBER;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Proto syntax version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoSyntax {
    /// Proto2 syntax
    Proto2,
    /// Proto3 syntax
    Proto3,
}

impl ProtoSyntax {
    /// Returns the syntax declaration string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtoSyntax::Proto2 => "proto2",
            ProtoSyntax::Proto3 => "proto3",
        }
    }
}

impl TryFrom<&str> for ProtoSyntax {
    type Error = Error;

    /// Accepts the text of a `syntax` statement, e.g. ` = "proto3"`
    fn try_from(statement: &str) -> Result<Self> {
        if statement.contains("proto3") {
            Ok(ProtoSyntax::Proto3)
        } else if statement.contains("proto2") {
            Ok(ProtoSyntax::Proto2)
        } else {
            Err(Error::unsupported_syntax(statement))
        }
    }
}

const FIELD_SHAPE: &str = "expected '<type> <name> = <tag>'";

fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z_][\w.]*)\s*$").expect("valid package regex"))
}

fn block_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_]\w*$").expect("valid block name regex"))
}

fn enum_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\s*=\s*(-?\d+)").expect("valid enum value regex"))
}

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^\s*(map\s*<[^<>]*>|\.?[A-Za-z_][\w.]*)\s+([A-Za-z_]\w*)\s*=\s*(\d+)\s*(\[.*\])?\s*$",
        )
        .expect("valid field regex")
    })
}

fn rpc_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^\s*([A-Za-z_]\w*)\s*\(\s*(stream\s+)?(\.?[A-Za-z_][\w.]*)\s*\)\s*returns\s*\(\s*(stream\s+)?(\.?[A-Za-z_][\w.]*)\s*\)\s*$",
        )
        .expect("valid rpc regex")
    })
}

fn extensions_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*(\d+)(?:\s+to\s+(\d+|max))?\s*(,.*)?$").expect("valid extensions regex")
    })
}

/// Parses the statement after `package`
pub fn parse_package(scope: &str, statement: &str) -> Result<String> {
    package_regex()
        .captures(statement)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| Error::malformed(scope, statement, "expected a package name"))
}

/// Validates the name read in front of a `{ ... }` block
pub fn block_name(scope: &str, keyword: &str, name: &str) -> Result<String> {
    if block_name_regex().is_match(name) {
        Ok(name.to_string())
    } else {
        Err(Error::malformed(
            scope,
            format!("{} {}", keyword, name),
            "expected an identifier before '{'",
        ))
    }
}

/// Parses an enum body: every `<name> = <integer>` becomes one value
pub fn parse_enum(name: String, body: &str, comment: String) -> Result<Enum> {
    let values = enum_value_regex()
        .captures_iter(body)
        .map(|caps| {
            let value = caps[2]
                .parse::<i32>()
                .map_err(|_| Error::malformed(&name, &caps[0], "enum value out of range"))?;
            Ok(EnumValue {
                name: caps[1].to_string(),
                value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Enum {
        name,
        comment,
        values,
    })
}

/// Parsed `<type> <name> = <tag> [options]`
struct FieldParts {
    type_name: String,
    name: String,
    tag: u32,
    annotation: String,
}

fn field_parts(scope: &str, statement: &str) -> Result<FieldParts> {
    let caps = field_regex()
        .captures(statement)
        .ok_or_else(|| Error::malformed(scope, statement, FIELD_SHAPE))?;

    Ok(FieldParts {
        type_name: caps[1].to_string(),
        name: caps[2].to_string(),
        tag: parse_tag(scope, statement, &caps[3])?,
        annotation: caps.get(4).map_or_else(String::new, |m| m.as_str().to_string()),
    })
}

fn parse_tag(scope: &str, statement: &str, digits: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|_| Error::malformed(scope, statement, "tag number out of range"))
}

/// Parses a message field statement.
///
/// `label` is the keyword that introduced the statement, `None` for fields
/// declared without one.
pub fn parse_field(
    scope: &str,
    statement: &str,
    label: Option<Label>,
    comment: String,
) -> Result<MessageField> {
    let parts = field_parts(scope, statement)?;
    Ok(MessageField {
        name: parts.name,
        comment,
        type_name: parts.type_name,
        tag: parts.tag,
        is_required: label == Some(Label::Required),
        is_repeated: label == Some(Label::Repeated),
        is_extension: false,
        annotation: parts.annotation,
    })
}

/// Parses a oneof member statement
pub fn parse_oneof_field(
    scope: &str,
    statement: &str,
    is_repeated: bool,
    comment: String,
) -> Result<OneOfField> {
    let parts = field_parts(scope, statement)?;
    Ok(OneOfField {
        name: parts.name,
        comment,
        type_name: parts.type_name,
        tag: parts.tag,
        is_repeated,
        annotation: parts.annotation,
    })
}

/// Parses `Name (In) returns (Out)`, each side optionally `stream`-qualified
pub fn parse_rpc(scope: &str, statement: &str, comment: String) -> Result<Rpc> {
    let caps = rpc_regex().captures(statement).ok_or_else(|| {
        Error::malformed(scope, statement, "expected '<name> (<type>) returns (<type>)'")
    })?;

    let rpc_type = |caps: &Captures<'_>, stream: usize, ty: usize| RpcType {
        type_name: caps[ty].to_string(),
        is_stream: caps.get(stream).is_some(),
    };

    Ok(Rpc {
        name: caps[1].to_string(),
        comment,
        rpc_input: rpc_type(&caps, 2, 3),
        rpc_output: rpc_type(&caps, 4, 5),
    })
}

/// Parses `<min> to <max>`, `<min> to max` or a single `<tag>`.
///
/// Only the first range of a comma separated list is kept.
pub fn parse_extensions(scope: &str, statement: &str) -> Result<FieldExtensions> {
    let caps = extensions_regex()
        .captures(statement)
        .ok_or_else(|| Error::malformed(scope, statement, "expected '<min> to <max>'"))?;

    let min_tag = parse_tag(scope, statement, &caps[1])?;
    let max_tag = match caps.get(2).map(|m| m.as_str()) {
        None => min_tag,
        Some("max") => MAX_FIELD_NUMBER,
        Some(digits) => parse_tag(scope, statement, digits)?,
    };

    if max_tag < min_tag {
        return Err(Error::malformed(scope, statement, "extension range is inverted"));
    }

    Ok(FieldExtensions { min_tag, max_tag })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_proto_syntax() {
        assert_eq!(
            ProtoSyntax::try_from(" = \"proto3\"").unwrap(),
            ProtoSyntax::Proto3
        );
        assert_eq!(
            ProtoSyntax::try_from(" = 'proto2'").unwrap(),
            ProtoSyntax::Proto2
        );
        assert!(matches!(
            ProtoSyntax::try_from(" = \"proto4\""),
            Err(Error::UnsupportedSyntaxVersion { .. })
        ));
    }

    #[test]
    fn test_parse_package() {
        assert_eq!(parse_package("<file>", " custom").unwrap(), "custom");
        assert_eq!(
            parse_package("<file>", " google.protobuf ").unwrap(),
            "google.protobuf"
        );
        assert!(parse_package("<file>", "  ").is_err());
    }

    #[test]
    fn test_block_name() {
        assert_eq!(block_name("<file>", "message", "Foo").unwrap(), "Foo");
        let err = block_name("<file>", "message", "").unwrap_err();
        assert!(matches!(err, Error::MalformedStatement { .. }));
        assert!(block_name("<file>", "enum", "Foo;bar").is_err());
    }

    #[test]
    fn test_parse_enum() {
        let body = " White = 0; Black = 1;\n Alias = 1; Neg = -2; ";
        let parsed = parse_enum("Color".to_string(), body, "colors".to_string()).unwrap();
        assert_eq!(parsed.name, "Color");
        assert_eq!(parsed.comment, "colors");
        let values: Vec<_> = parsed
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.value))
            .collect();
        assert_eq!(
            values,
            vec![("White", 0), ("Black", 1), ("Alias", 1), ("Neg", -2)]
        );
    }

    #[test]
    fn test_parse_enum_ignores_options() {
        let body = " option allow_alias = true; A = 0 [deprecated = true]; ";
        let parsed = parse_enum("E".to_string(), body, String::new()).unwrap();
        assert_eq!(parsed.values.len(), 1);
        assert_eq!(parsed.values[0].name, "A");
    }

    #[test]
    fn test_parse_field_labels() {
        let cases = [
            (None, false, false),
            (Some(Label::Optional), false, false),
            (Some(Label::Required), true, false),
            (Some(Label::Repeated), false, true),
        ];

        for (label, required, repeated) in cases {
            let field = parse_field("Foo", " string field1 = 1", label, String::new()).unwrap();
            assert_eq!(field.type_name, "string");
            assert_eq!(field.name, "field1");
            assert_eq!(field.tag, 1);
            assert_eq!(field.is_required, required);
            assert_eq!(field.is_repeated, repeated);
            assert!(!field.is_extension);
        }
    }

    #[test]
    fn test_parse_field_types() {
        let field = parse_field("Foo", " .google.protobuf.Any any = 12", None, String::new())
            .unwrap();
        assert_eq!(field.type_name, ".google.protobuf.Any");

        let field = parse_field("Foo", "map<string, Bar> bars = 3", None, String::new()).unwrap();
        assert_eq!(field.type_name, "map<string, Bar>");
        assert_eq!(field.name, "bars");
    }

    #[test]
    fn test_parse_field_annotation() {
        let field = parse_field(
            "Foo",
            " int32 ids = 4 [packed = true, deprecated = true]",
            Some(Label::Repeated),
            String::new(),
        )
        .unwrap();
        assert_eq!(field.annotation, "[packed = true, deprecated = true]");
    }

    #[test]
    fn test_parse_field_malformed() {
        for statement in [" string field nestedField = 1", "bad ", " int32 a =", " int32 a = -1"] {
            let err = parse_field("Foo.Bar", statement, None, String::new()).unwrap_err();
            match err {
                Error::MalformedStatement { scope, statement: raw, .. } => {
                    assert_eq!(scope, "Foo.Bar");
                    assert_eq!(raw, statement.trim());
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_parse_field_tag_overflow() {
        assert!(parse_field("Foo", "int32 a = 99999999999", None, String::new()).is_err());
    }

    #[test]
    fn test_parse_oneof_field() {
        let field = parse_oneof_field("Options", " bool option1 = 5", false, "c".to_string())
            .unwrap();
        assert_eq!(field.type_name, "bool");
        assert_eq!(field.name, "option1");
        assert_eq!(field.tag, 5);
        assert_eq!(field.comment, "c");
        assert!(!field.is_repeated);
    }

    #[test]
    fn test_parse_rpc() {
        let rpc = parse_rpc("S", "Call (In) returns (stream Out)", String::new()).unwrap();
        assert_eq!(rpc.name, "Call");
        assert_eq!(rpc.rpc_input.type_name, "In");
        assert!(!rpc.rpc_input.is_stream);
        assert_eq!(rpc.rpc_output.type_name, "Out");
        assert!(rpc.rpc_output.is_stream);
    }

    #[test]
    fn test_parse_rpc_keeps_stream_like_type_names() {
        let rpc = parse_rpc(
            "S",
            "Pipe(stream Upstream)returns(pkg.Stream)",
            "pipes".to_string(),
        )
        .unwrap();
        assert_eq!(rpc.rpc_input.type_name, "Upstream");
        assert!(rpc.rpc_input.is_stream);
        assert_eq!(rpc.rpc_output.type_name, "pkg.Stream");
        assert!(!rpc.rpc_output.is_stream);
        assert_eq!(rpc.comment, "pipes");
    }

    #[test]
    fn test_parse_rpc_malformed() {
        for statement in ["Call (In returns (Out)", "Call (In)", "(In) returns (Out)"] {
            assert!(matches!(
                parse_rpc("S", statement, String::new()),
                Err(Error::MalformedStatement { .. })
            ));
        }
    }

    #[test]
    fn test_parse_extensions() {
        let range = parse_extensions("Foo", " 100 to 200").unwrap();
        assert_eq!((range.min_tag, range.max_tag), (100, 200));

        let range = parse_extensions("Foo", " 1000 to max").unwrap();
        assert_eq!(range.max_tag, MAX_FIELD_NUMBER);

        let range = parse_extensions("Foo", " 7").unwrap();
        assert_eq!((range.min_tag, range.max_tag), (7, 7));

        let range = parse_extensions("Foo", " 10 to 19, 30 to 39").unwrap();
        assert_eq!((range.min_tag, range.max_tag), (10, 19));

        assert!(parse_extensions("Foo", " 200 to 100").is_err());
        assert!(parse_extensions("Foo", " to 100").is_err());
    }

    #[test]
    fn test_statements_reparse_identically() {
        let field = parse_field("Foo", " Bar bar = 7", Some(Label::Repeated), String::new())
            .unwrap();
        let rendered = format!("{} {} = {}", field.type_name, field.name, field.tag);
        assert_eq!(
            parse_field("Foo", &rendered, Some(Label::Repeated), String::new()).unwrap(),
            field
        );

        let rpc = parse_rpc("S", "Call(stream In) returns (Out)", String::new()).unwrap();
        let rendered = format!(
            "{}(stream {}) returns ({})",
            rpc.name, rpc.rpc_input.type_name, rpc.rpc_output.type_name
        );
        assert_eq!(parse_rpc("S", &rendered, String::new()).unwrap(), rpc);

        let parsed = parse_enum("E".to_string(), "A = 3;", String::new()).unwrap();
        let rendered = format!("{} = {};", parsed.values[0].name, parsed.values[0].value);
        assert_eq!(parse_enum("E".to_string(), &rendered, String::new()).unwrap(), parsed);
    }
}
