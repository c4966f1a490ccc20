//! Call-argument validation against a declared function interface.
//!
//! The validation schema is the type tree itself: one exhaustive walk over
//! [`SophiaType`] checks native arguments before any encoding happens. All
//! violations across all arguments are collected and surfaced as a single
//! aggregate [`ValidationError`] — never fail-fast per argument — so a
//! caller sees every malformed position at once.

use std::fmt;

use serde_json::Value;
use sophia_types::{address, FunctionAci, SophiaType};

/// The closed set of violation categories a check can produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    NotANumber,
    NotAString,
    NotABoolean,
    NotAnArray,
    NotAnObject,
    WrongVariantType,
}

impl ViolationKind {
    fn template(&self) -> &'static str {
        match self {
            ViolationKind::NotANumber => "is not a number",
            ViolationKind::NotAString => "is not a string",
            ViolationKind::NotABoolean => "is not a boolean",
            ViolationKind::NotAnArray => "is not an array",
            ViolationKind::NotAnObject => "is not an object",
            ViolationKind::WrongVariantType => "is not of a valid variant type",
        }
    }
}

/// One malformed value, located by its path within the argument sequence.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Position within the argument list, e.g. `[2].owner[0]`.
    pub path: String,
    pub kind: ViolationKind,
    /// Human-readable message templated by the violation kind.
    pub message: String,
    /// The offending value, stringified if structured.
    pub value: String,
}

impl Violation {
    fn new(path: &str, kind: ViolationKind, value: &Value) -> Self {
        Self {
            path: path.to_string(),
            kind,
            message: format!("value at {path} {}", kind.template()),
            value: stringify(value),
        }
    }

    fn missing(path: &str, kind: ViolationKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            message: format!("required value at {path} is missing"),
            value: "<missing>".to_string(),
        }
    }

    fn extra(path: &str, value: &Value) -> Self {
        Self {
            path: path.to_string(),
            kind: ViolationKind::WrongVariantType,
            message: format!("unexpected extra value at {path}"),
            value: stringify(value),
        }
    }
}

/// Aggregate validation failure: one entry per malformed value.
#[derive(Debug, Clone)]
pub struct ValidationError {
    entries: Vec<Violation>,
}

impl ValidationError {
    pub fn entries(&self) -> &[Violation] {
        &self.entries
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid argument value(s):", self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n  {} (got: {})", entry.message, entry.value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate call parameters against all declared arguments of a function.
///
/// The declared argument list is treated as one ordered fixed-length
/// sequence: missing and extra positions are violations too. Returns
/// `Ok(())` when nothing is malformed.
pub fn validate_args(func: &FunctionAci, params: &[Value]) -> Result<(), ValidationError> {
    let mut entries = Vec::new();
    for (i, ty) in func.arguments.iter().enumerate() {
        let path = format!("[{i}]");
        match params.get(i) {
            Some(value) => check(ty, value, &path, &mut entries),
            None => entries.push(Violation::missing(&path, expected_kind(ty))),
        }
    }
    for (i, value) in params.iter().enumerate().skip(func.arguments.len()) {
        entries.push(Violation::extra(&format!("[{i}]"), value));
    }
    if entries.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { entries })
    }
}

fn check(ty: &SophiaType, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match ty {
        SophiaType::Int => {
            if !value.is_number() {
                out.push(Violation::new(path, ViolationKind::NotANumber, value));
            }
        }
        SophiaType::String => {
            if !value.is_string() {
                out.push(Violation::new(path, ViolationKind::NotAString, value));
            }
        }
        SophiaType::Bool => {
            if !value.is_boolean() {
                out.push(Violation::new(path, ViolationKind::NotABoolean, value));
            }
        }
        SophiaType::Address => {
            // Either the numeric zero sentinel or text under a recognized
            // entity prefix.
            let ok = match value {
                Value::Number(n) => n.as_u64() == Some(0),
                Value::String(s) => address::is_entity_address(s),
                _ => false,
            };
            if !ok {
                out.push(Violation::new(path, ViolationKind::WrongVariantType, value));
            }
        }
        SophiaType::List(item) => match value.as_array() {
            Some(items) => {
                for (i, v) in items.iter().enumerate() {
                    check(item, v, &format!("{path}[{i}]"), out);
                }
            }
            None => out.push(Violation::new(path, ViolationKind::NotAnArray, value)),
        },
        SophiaType::Tuple(items) => match value.as_array() {
            Some(values) => {
                for (i, item) in items.iter().enumerate() {
                    let elem_path = format!("{path}[{i}]");
                    match values.get(i) {
                        Some(v) => check(item, v, &elem_path, out),
                        None => out.push(Violation::missing(&elem_path, expected_kind(item))),
                    }
                }
                for (i, v) in values.iter().enumerate().skip(items.len()) {
                    out.push(Violation::extra(&format!("{path}[{i}]"), v));
                }
            }
            None => out.push(Violation::new(path, ViolationKind::NotAnArray, value)),
        },
        SophiaType::Record(fields) => match value.as_object() {
            Some(obj) => {
                for field in fields {
                    let field_path = format!("{path}.{}", field.name);
                    match obj.get(&field.name) {
                        Some(v) => check(&field.ty, v, &field_path, out),
                        None => out.push(Violation::missing(&field_path, expected_kind(&field.ty))),
                    }
                }
            }
            None => out.push(Violation::new(path, ViolationKind::NotAnObject, value)),
        },
        SophiaType::Map(key, val) => match value {
            // Object form: keys are text by construction, so the key schema
            // only applies in the pair-sequence form.
            Value::Object(obj) => {
                for (k, v) in obj {
                    check(val, v, &format!("{path}.{k}"), out);
                }
            }
            Value::Array(pairs) => {
                for (i, pair) in pairs.iter().enumerate() {
                    match pair.as_array().filter(|p| p.len() == 2) {
                        Some(kv) => {
                            check(key, &kv[0], &format!("{path}[{i}][0]"), out);
                            check(val, &kv[1], &format!("{path}[{i}][1]"), out);
                        }
                        None => out.push(Violation::new(
                            &format!("{path}[{i}]"),
                            ViolationKind::WrongVariantType,
                            pair,
                        )),
                    }
                }
            }
            _ => out.push(Violation::new(path, ViolationKind::NotAnObject, value)),
        },
        // Explicit optional: null is absent, anything else is the payload.
        SophiaType::Option(item) => {
            if !value.is_null() {
                check(item, value, path, out);
            }
        }
    }
}

/// The violation kind a missing value of this type reports.
fn expected_kind(ty: &SophiaType) -> ViolationKind {
    match ty {
        SophiaType::Int => ViolationKind::NotANumber,
        SophiaType::String => ViolationKind::NotAString,
        SophiaType::Bool => ViolationKind::NotABoolean,
        SophiaType::List(_) | SophiaType::Tuple(_) => ViolationKind::NotAnArray,
        SophiaType::Record(_) | SophiaType::Map(_, _) => ViolationKind::NotAnObject,
        SophiaType::Address | SophiaType::Option(_) => ViolationKind::WrongVariantType,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sophia_types::SophiaType;

    fn func(arguments: Vec<SophiaType>) -> FunctionAci {
        FunctionAci {
            name: "sample".into(),
            arguments,
            returns: SophiaType::Int,
        }
    }

    #[test]
    fn test_well_typed_args_pass() {
        let f = func(vec![
            SophiaType::Int,
            SophiaType::String,
            SophiaType::Bool,
            SophiaType::List(Box::new(SophiaType::Int)),
        ]);
        let params = [json!(1), json!("x"), json!(true), json!([1, 2])];
        assert!(validate_args(&f, &params).is_ok());
    }

    #[test]
    fn test_single_bad_argument_is_located() {
        // Four declared arguments, index 2 carries the wrong native type.
        let f = func(vec![
            SophiaType::Int,
            SophiaType::String,
            SophiaType::Int,
            SophiaType::Bool,
        ]);
        let params = [json!(1), json!("x"), json!("not a number"), json!(false)];
        let err = validate_args(&f, &params).unwrap_err();
        assert_eq!(err.entries().len(), 1);
        let entry = &err.entries()[0];
        assert_eq!(entry.path, "[2]");
        assert_eq!(entry.kind, ViolationKind::NotANumber);
        assert_eq!(entry.value, "not a number");
    }

    #[test]
    fn test_all_violations_collected() {
        let f = func(vec![SophiaType::Int, SophiaType::Bool, SophiaType::String]);
        let params = [json!("a"), json!(3), json!([])];
        let err = validate_args(&f, &params).unwrap_err();
        let kinds: Vec<_> = err.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::NotANumber,
                ViolationKind::NotABoolean,
                ViolationKind::NotAString,
            ]
        );
    }

    #[test]
    fn test_missing_and_extra_arguments() {
        let f = func(vec![SophiaType::Int, SophiaType::Int]);
        let err = validate_args(&f, &[json!(1)]).unwrap_err();
        assert_eq!(err.entries()[0].path, "[1]");
        assert_eq!(err.entries()[0].value, "<missing>");

        let err = validate_args(&f, &[json!(1), json!(2), json!(3)]).unwrap_err();
        assert_eq!(err.entries()[0].path, "[2]");
        assert_eq!(err.entries()[0].kind, ViolationKind::WrongVariantType);
        assert_eq!(err.entries()[0].message, "unexpected extra value at [2]");
    }

    #[test]
    fn test_tuple_surplus_elements_reported_as_extra() {
        let f = func(vec![SophiaType::Tuple(vec![SophiaType::Int])]);
        let err = validate_args(&f, &[json!([1, 2])]).unwrap_err();
        assert_eq!(err.entries().len(), 1);
        assert_eq!(err.entries()[0].path, "[0][1]");
        assert_eq!(err.entries()[0].kind, ViolationKind::WrongVariantType);
        assert_eq!(err.entries()[0].message, "unexpected extra value at [0][1]");
    }

    #[test]
    fn test_non_sequence_for_list_and_tuple() {
        let f = func(vec![SophiaType::List(Box::new(SophiaType::Int))]);
        let err = validate_args(&f, &[json!(7)]).unwrap_err();
        assert_eq!(err.entries().len(), 1);
        assert_eq!(err.entries()[0].path, "[0]");
        assert_eq!(err.entries()[0].kind, ViolationKind::NotAnArray);

        let f = func(vec![SophiaType::Tuple(vec![SophiaType::Int, SophiaType::Bool])]);
        let err = validate_args(&f, &[json!("x")]).unwrap_err();
        assert_eq!(err.entries().len(), 1);
        assert_eq!(err.entries()[0].path, "[0]");
        assert_eq!(err.entries()[0].kind, ViolationKind::NotAnArray);
        assert!(err.entries()[0].message.contains("is not an array"));
    }

    #[test]
    fn test_address_variants() {
        let f = func(vec![SophiaType::Address]);
        assert!(validate_args(&f, &[json!(0)]).is_ok());
        assert!(validate_args(&f, &[json!("ak_2a1j2Mk9YSmC1gioUq4PWRm3bsv887MbuRVwyv4KaUGoR1eiKi")]).is_ok());
        assert!(validate_args(&f, &[json!(5)]).is_err());
        assert!(validate_args(&f, &[json!("plain text")]).is_err());
    }

    #[test]
    fn test_nested_paths() {
        let f = func(vec![SophiaType::Record(vec![
            sophia_types::RecordField {
                name: "xs".into(),
                ty: SophiaType::List(Box::new(SophiaType::Int)),
            },
        ])]);
        let err = validate_args(&f, &[json!({"xs": [1, "two", 3]})]).unwrap_err();
        assert_eq!(err.entries()[0].path, "[0].xs[1]");
    }

    #[test]
    fn test_record_missing_field() {
        let f = func(vec![SophiaType::Record(vec![sophia_types::RecordField {
            name: "count".into(),
            ty: SophiaType::Int,
        }])]);
        let err = validate_args(&f, &[json!({})]).unwrap_err();
        assert_eq!(err.entries()[0].path, "[0].count");
        assert_eq!(err.entries()[0].kind, ViolationKind::NotANumber);
    }

    #[test]
    fn test_map_pair_and_object_forms() {
        let map_ty = SophiaType::Map(Box::new(SophiaType::Int), Box::new(SophiaType::Bool));
        let f = func(vec![map_ty]);
        assert!(validate_args(&f, &[json!({"1": true})]).is_ok());
        assert!(validate_args(&f, &[json!([[1, true], [2, false]])]).is_ok());

        let err = validate_args(&f, &[json!([[1, true], [2]])]).unwrap_err();
        assert_eq!(err.entries()[0].path, "[0][1]");
        let err = validate_args(&f, &[json!(7)]).unwrap_err();
        assert_eq!(err.entries()[0].kind, ViolationKind::NotAnObject);
    }

    #[test]
    fn test_option_accepts_null_and_payload() {
        let f = func(vec![SophiaType::Option(Box::new(SophiaType::Int))]);
        assert!(validate_args(&f, &[json!(null)]).is_ok());
        assert!(validate_args(&f, &[json!(3)]).is_ok());
        assert!(validate_args(&f, &[json!("three")]).is_err());
    }

    #[test]
    fn test_aggregate_display_lists_entries() {
        let f = func(vec![SophiaType::Int, SophiaType::Bool]);
        let err = validate_args(&f, &[json!("a"), json!("b")]).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("2 invalid argument value(s):"));
        assert!(text.contains("value at [0] is not a number"));
        assert!(text.contains("value at [1] is not a boolean"));
    }
}
