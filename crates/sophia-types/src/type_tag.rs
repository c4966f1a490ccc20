//! Sophia type expression parsing.
//!
//! An ACI document describes argument and return types declaratively: a
//! bare tag string (`"int"`) or a single-key mapping from tag to generic
//! parameters (`{"list": ["int"]}`), nested arbitrarily. This module
//! normalizes those expressions into the closed [`SophiaType`] sum so the
//! encoder, decoder, and validator can branch exhaustively instead of
//! falling back on unrecognized tags.

use std::fmt;

use serde_json::Value;

/// A normalized Sophia type expression.
///
/// Every tree bottoms out at a non-container variant; container arities
/// match the shape of the values they describe (one child for list/option,
/// key and value for map, positional children for tuple, named fields for
/// record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SophiaType {
    Int,
    String,
    Bool,
    Address,
    List(Box<SophiaType>),
    Option(Box<SophiaType>),
    Map(Box<SophiaType>, Box<SophiaType>),
    Tuple(Vec<SophiaType>),
    Record(Vec<RecordField>),
}

/// A named record field and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub ty: SophiaType,
}

/// A type expression that is neither a recognized scalar tag nor a
/// recognized container shape.
#[derive(Debug, Clone)]
pub struct TypeParseError {
    detail: String,
}

impl TypeParseError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// The malformed fragment, for error reporting.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed type descriptor: {}", self.detail)
    }
}

impl std::error::Error for TypeParseError {}

impl SophiaType {
    /// Parse a declarative type expression.
    ///
    /// Accepts a bare tag string or a single-key object mapping a container
    /// tag to its generic parameters. Anything else is a hard error; there
    /// is no fallback interpretation for unknown tags.
    pub fn parse(value: &Value) -> Result<Self, TypeParseError> {
        match value {
            Value::String(tag) => match tag.as_str() {
                "int" => Ok(SophiaType::Int),
                "string" => Ok(SophiaType::String),
                "bool" => Ok(SophiaType::Bool),
                "address" => Ok(SophiaType::Address),
                other => Err(TypeParseError::new(format!(
                    "unrecognized type tag '{other}'"
                ))),
            },
            Value::Object(map) if map.len() == 1 => {
                let (tag, params) = map.iter().next().unwrap();
                match tag.as_str() {
                    "list" => Ok(SophiaType::List(Box::new(Self::parse_single(params)?))),
                    "option" => Ok(SophiaType::Option(Box::new(Self::parse_single(params)?))),
                    "map" => {
                        let pair = params.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
                            TypeParseError::new("map takes exactly two type parameters")
                        })?;
                        Ok(SophiaType::Map(
                            Box::new(Self::parse(&pair[0])?),
                            Box::new(Self::parse(&pair[1])?),
                        ))
                    }
                    "tuple" => {
                        let items = params.as_array().ok_or_else(|| {
                            TypeParseError::new("tuple takes a list of type parameters")
                        })?;
                        let children = items.iter().map(Self::parse).collect::<Result<_, _>>()?;
                        Ok(SophiaType::Tuple(children))
                    }
                    "record" => {
                        let fields = params.as_array().ok_or_else(|| {
                            TypeParseError::new("record takes a list of field descriptors")
                        })?;
                        let fields = fields
                            .iter()
                            .map(RecordField::parse)
                            .collect::<Result<_, _>>()?;
                        Ok(SophiaType::Record(fields))
                    }
                    other => Err(TypeParseError::new(format!(
                        "unrecognized container tag '{other}'"
                    ))),
                }
            }
            other => Err(TypeParseError::new(format!(
                "expected a tag string or single-key container, got {other}"
            ))),
        }
    }

    /// Parse a single generic parameter, given either bare or as a
    /// one-element list (both forms appear in published interfaces).
    fn parse_single(params: &Value) -> Result<Self, TypeParseError> {
        match params {
            Value::Array(items) if items.len() == 1 => Self::parse(&items[0]),
            Value::Array(_) => Err(TypeParseError::new(
                "container takes exactly one type parameter",
            )),
            other => Self::parse(other),
        }
    }
}

impl RecordField {
    fn parse(value: &Value) -> Result<Self, TypeParseError> {
        let obj = value
            .as_object()
            .ok_or_else(|| TypeParseError::new("record field must be a {name, type} object"))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| TypeParseError::new("record field is missing its name"))?;
        let ty = obj
            .get("type")
            .ok_or_else(|| TypeParseError::new("record field is missing its type"))?;
        Ok(RecordField {
            name: name.to_string(),
            ty: SophiaType::parse_single(ty)?,
        })
    }
}

impl fmt::Display for SophiaType {
    /// Canonical Sophia type text, usable as a decode hint for node-side
    /// return value decoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SophiaType::Int => write!(f, "int"),
            SophiaType::String => write!(f, "string"),
            SophiaType::Bool => write!(f, "bool"),
            SophiaType::Address => write!(f, "address"),
            SophiaType::List(item) => write!(f, "list({item})"),
            SophiaType::Option(item) => write!(f, "option({item})"),
            SophiaType::Map(key, value) => write!(f, "map({key}, {value})"),
            SophiaType::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            SophiaType::Record(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} : {}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(SophiaType::parse(&json!("int")).unwrap(), SophiaType::Int);
        assert_eq!(
            SophiaType::parse(&json!("string")).unwrap(),
            SophiaType::String
        );
        assert_eq!(SophiaType::parse(&json!("bool")).unwrap(), SophiaType::Bool);
        assert_eq!(
            SophiaType::parse(&json!("address")).unwrap(),
            SophiaType::Address
        );
    }

    #[test]
    fn test_parse_list_and_option() {
        let ty = SophiaType::parse(&json!({"list": ["int"]})).unwrap();
        assert_eq!(ty, SophiaType::List(Box::new(SophiaType::Int)));

        // Bare parameter form, without the one-element list.
        let ty = SophiaType::parse(&json!({"option": "string"})).unwrap();
        assert_eq!(ty, SophiaType::Option(Box::new(SophiaType::String)));
    }

    #[test]
    fn test_parse_map() {
        let ty = SophiaType::parse(&json!({"map": ["int", "string"]})).unwrap();
        assert_eq!(
            ty,
            SophiaType::Map(Box::new(SophiaType::Int), Box::new(SophiaType::String))
        );
    }

    #[test]
    fn test_parse_nested_containers() {
        let ty = SophiaType::parse(&json!({"list": [{"tuple": ["int", "bool"]}]})).unwrap();
        assert_eq!(
            ty,
            SophiaType::List(Box::new(SophiaType::Tuple(vec![
                SophiaType::Int,
                SophiaType::Bool
            ])))
        );
    }

    #[test]
    fn test_parse_record() {
        let ty = SophiaType::parse(&json!({"record": [
            {"name": "owner", "type": "address"},
            {"name": "count", "type": ["int"]},
        ]}))
        .unwrap();
        assert_eq!(
            ty,
            SophiaType::Record(vec![
                RecordField {
                    name: "owner".into(),
                    ty: SophiaType::Address
                },
                RecordField {
                    name: "count".into(),
                    ty: SophiaType::Int
                },
            ])
        );
    }

    #[test]
    fn test_unknown_tag_is_hard_error() {
        let err = SophiaType::parse(&json!("hash")).unwrap_err();
        assert!(err.to_string().contains("unrecognized type tag 'hash'"));

        let err = SophiaType::parse(&json!({"variant": ["int"]})).unwrap_err();
        assert!(err.to_string().contains("unrecognized container tag"));
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        // Multi-key objects are not valid type expressions.
        assert!(SophiaType::parse(&json!({"list": ["int"], "map": ["int", "int"]})).is_err());
        assert!(SophiaType::parse(&json!(42)).is_err());
        assert!(SophiaType::parse(&json!({"map": ["int"]})).is_err());
        assert!(SophiaType::parse(&json!({"record": [{"name": "a"}]})).is_err());
    }

    #[test]
    fn test_display_rendering() {
        let ty = SophiaType::parse(&json!({"map": ["int", {"list": ["string"]}]})).unwrap();
        assert_eq!(ty.to_string(), "map(int, list(string))");

        let ty = SophiaType::parse(&json!({"tuple": ["int", "bool"]})).unwrap();
        assert_eq!(ty.to_string(), "(int, bool)");
    }
}
