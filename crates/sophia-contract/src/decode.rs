//! Structured return-node → native value decoding.
//!
//! The node-side decode collaborator resolves a raw return value into a
//! structured node tree (`{value: ...}`, nested). This module walks that
//! tree against the declared return [`SophiaType`] and rebuilds the native
//! representation: lists and tuples keep order and position, maps become
//! ordered key/value pair lists, records become objects keyed by field
//! name in declared order.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Map, Value};
use sophia_types::{address, address::Prefix, SophiaType};

/// Decode a structured return node against its declared type.
///
/// `prefix` is applied when re-encoding address payloads back to entity
/// address text (the account prefix by default).
pub fn decode_return(ty: &SophiaType, node: &Value, prefix: Prefix) -> Result<Value> {
    let inner = node_value(node)?;
    match ty {
        // Raw underlying value passes through unchanged.
        SophiaType::Int | SophiaType::String => Ok(inner.clone()),
        SophiaType::Bool => match inner {
            Value::Number(n) => Ok(Value::Bool(n.as_i64() != Some(0))),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            other => bail!("boolean node carries a non-numeric value: {other}"),
        },
        SophiaType::Address => decode_address(inner, prefix),
        SophiaType::List(item) => {
            let nodes = inner
                .as_array()
                .ok_or_else(|| anyhow!("list node value is not a sequence: {inner}"))?;
            let items = nodes
                .iter()
                .map(|n| decode_return(item, n, prefix))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(items))
        }
        SophiaType::Tuple(items) => {
            let nodes = inner
                .as_array()
                .ok_or_else(|| anyhow!("tuple node value is not a sequence: {inner}"))?;
            if nodes.len() != items.len() {
                bail!(
                    "tuple node arity mismatch: expected {} elements, got {}",
                    items.len(),
                    nodes.len()
                );
            }
            let values = items
                .iter()
                .zip(nodes)
                .map(|(t, n)| decode_return(t, n, prefix))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(values))
        }
        SophiaType::Record(fields) => {
            let nodes = inner
                .as_array()
                .ok_or_else(|| anyhow!("record node value is not a sequence: {inner}"))?;
            if nodes.len() != fields.len() {
                bail!(
                    "record node has {} entries for {} declared fields",
                    nodes.len(),
                    fields.len()
                );
            }
            // Entries align with the declared fields positionally; both
            // {name, value} and bare {value} entries appear in practice.
            let mut obj = Map::new();
            for (field, entry) in fields.iter().zip(nodes) {
                let value = decode_return(&field.ty, entry, prefix)
                    .with_context(|| format!("decoding record field '{}'", field.name))?;
                obj.insert(field.name.clone(), value);
            }
            Ok(Value::Object(obj))
        }
        SophiaType::Map(key, val) => {
            let entries = inner
                .as_array()
                .ok_or_else(|| anyhow!("map node value is not a sequence: {inner}"))?;
            let pairs = entries
                .iter()
                .map(|entry| {
                    let (k, v) = map_entry(entry)?;
                    Ok(Value::Array(vec![
                        decode_return(key, k, prefix)?,
                        decode_return(val, v, prefix)?,
                    ]))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(pairs))
        }
        SophiaType::Option(item) => {
            let pair = inner
                .as_array()
                .filter(|p| p.len() == 2)
                .ok_or_else(|| anyhow!("option node is not a (variant, payload) pair: {inner}"))?;
            // Variant discriminator 1 means present; anything else is absent.
            let discriminator = match &pair[0] {
                Value::Number(n) => n.as_i64(),
                node => node_value(node)?.as_i64(),
            };
            if discriminator == Some(1) {
                decode_return(item, &pair[1], prefix)
            } else {
                Ok(Value::Null)
            }
        }
    }
}

fn node_value(node: &Value) -> Result<&Value> {
    node.get("value")
        .ok_or_else(|| anyhow!("return node has no 'value' entry: {node}"))
}

fn decode_address(inner: &Value, prefix: Prefix) -> Result<Value> {
    match inner {
        // The null address decodes to the integer sentinel.
        Value::Number(n) if n.as_u64() == Some(0) => Ok(json!(0)),
        Value::String(hex_text) => {
            let payload = hex::decode(hex_text.trim_start_matches("0x"))
                .with_context(|| format!("address node payload is not hex: {hex_text}"))?;
            Ok(Value::String(address::encode(prefix, &payload)))
        }
        Value::Array(bytes) => {
            let payload = bytes
                .iter()
                .map(|b| {
                    b.as_u64()
                        .filter(|b| *b <= u8::MAX as u64)
                        .map(|b| b as u8)
                        .ok_or_else(|| anyhow!("address node byte out of range: {b}"))
                })
                .collect::<Result<Vec<u8>>>()?;
            Ok(Value::String(address::encode(prefix, &payload)))
        }
        other => bail!("address node carries neither 0 nor a payload: {other}"),
    }
}

fn map_entry(entry: &Value) -> Result<(&Value, &Value)> {
    if let Some(pair) = entry.as_array().filter(|p| p.len() == 2) {
        return Ok((&pair[0], &pair[1]));
    }
    if let (Some(k), Some(v)) = (entry.get("key"), entry.get("val")) {
        return Ok((k, v));
    }
    bail!("map node entry is not a key/value pair: {entry}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sophia_types::RecordField;

    #[test]
    fn test_scalar_passthrough() {
        assert_eq!(
            decode_return(&SophiaType::Int, &json!({"value": 42}), Prefix::default()).unwrap(),
            json!(42)
        );
        assert_eq!(
            decode_return(&SophiaType::String, &json!({"value": "hi"}), Prefix::default()).unwrap(),
            json!("hi")
        );
    }

    #[test]
    fn test_bool_nonzero_coercion() {
        let ty = SophiaType::Bool;
        assert_eq!(
            decode_return(&ty, &json!({"value": 1}), Prefix::default()).unwrap(),
            json!(true)
        );
        assert_eq!(
            decode_return(&ty, &json!({"value": 3}), Prefix::default()).unwrap(),
            json!(true)
        );
        assert_eq!(
            decode_return(&ty, &json!({"value": 0}), Prefix::default()).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_list_of_int() {
        let ty = SophiaType::List(Box::new(SophiaType::Int));
        let node = json!({"value": [{"value": 1}, {"value": 2}, {"value": 3}]});
        assert_eq!(
            decode_return(&ty, &node, Prefix::default()).unwrap(),
            json!([1, 2, 3])
        );
    }

    #[test]
    fn test_tuple_positions() {
        let ty = SophiaType::Tuple(vec![SophiaType::Int, SophiaType::Bool]);
        let node = json!({"value": [{"value": 9}, {"value": 1}]});
        assert_eq!(
            decode_return(&ty, &node, Prefix::default()).unwrap(),
            json!([9, true])
        );

        let short = json!({"value": [{"value": 9}]});
        assert!(decode_return(&ty, &short, Prefix::default()).is_err());
    }

    #[test]
    fn test_record_field_order() {
        let ty = SophiaType::Record(vec![
            RecordField {
                name: "b".into(),
                ty: SophiaType::Int,
            },
            RecordField {
                name: "a".into(),
                ty: SophiaType::String,
            },
        ]);
        let node = json!({"value": [
            {"name": "b", "value": 2},
            {"name": "a", "value": "x"},
        ]});
        let decoded = decode_return(&ty, &node, Prefix::default()).unwrap();
        assert_eq!(decoded, json!({"b": 2, "a": "x"}));
        // Declared order survives the round into the object.
        let keys: Vec<_> = decoded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_map_pairs_keep_order() {
        let ty = SophiaType::Map(Box::new(SophiaType::Int), Box::new(SophiaType::String));
        let node = json!({"value": [
            {"key": {"value": 2}, "val": {"value": "b"}},
            {"key": {"value": 1}, "val": {"value": "a"}},
        ]});
        assert_eq!(
            decode_return(&ty, &node, Prefix::default()).unwrap(),
            json!([[2, "b"], [1, "a"]])
        );
    }

    #[test]
    fn test_option_variants() {
        let ty = SophiaType::Option(Box::new(SophiaType::Int));
        let present = json!({"value": [{"value": 1}, {"value": 5}]});
        assert_eq!(
            decode_return(&ty, &present, Prefix::default()).unwrap(),
            json!(5)
        );
        let absent = json!({"value": [{"value": 0}, {"value": null}]});
        assert_eq!(
            decode_return(&ty, &absent, Prefix::default()).unwrap(),
            Value::Null
        );
        // Bare-number discriminator form.
        let present = json!({"value": [1, {"value": 7}]});
        assert_eq!(
            decode_return(&ty, &present, Prefix::default()).unwrap(),
            json!(7)
        );
    }

    #[test]
    fn test_address_zero_sentinel() {
        assert_eq!(
            decode_return(&SophiaType::Address, &json!({"value": 0}), Prefix::default()).unwrap(),
            json!(0)
        );
    }

    #[test]
    fn test_address_payload_round_trip() {
        // Encoding an address to call data and decoding the payload back
        // under the same prefix yields the identical text.
        let original = address::encode(Prefix::Contract, &[0x11, 0x22, 0x33]);
        let literal = address::to_calldata_literal(&original).unwrap();
        let node = json!({"value": literal.trim_start_matches('#')});
        assert_eq!(
            decode_return(&SophiaType::Address, &node, Prefix::Contract).unwrap(),
            json!(original)
        );
    }

    #[test]
    fn test_address_byte_array_payload() {
        let node = json!({"value": [1, 2, 3]});
        let decoded = decode_return(&SophiaType::Address, &node, Prefix::default()).unwrap();
        assert_eq!(decoded, json!(address::encode(Prefix::Account, &[1, 2, 3])));
    }

    #[test]
    fn test_missing_value_entry_errors() {
        let err = decode_return(&SophiaType::Int, &json!({"raw": 1}), Prefix::default());
        assert!(err.is_err());
    }
}
