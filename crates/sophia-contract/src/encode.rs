//! Native value → calling-convention literal encoding.
//!
//! Produces the literal argument text submitted in a contract call, guided
//! by the declared [`SophiaType`]. Encoding is a pure recursive walk; the
//! async boundary of the call path sits at the collaborator invocations,
//! not here. Validation is expected to have run first — encode errors on
//! shapes validation admits (e.g. an undecodable address payload) are
//! surfaced as plain errors.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use sophia_types::{address, FunctionAci, SophiaType};

/// Encode one native value against its declared type.
pub fn encode_arg(ty: &SophiaType, value: &Value) -> Result<String> {
    // Contract-address-shaped text overrides the declared type: callers may
    // pass a ct_... string where the interface declares a generic type.
    if let Some(text) = value.as_str() {
        if text.starts_with(address::CONTRACT_MARKER)
            && text[address::CONTRACT_MARKER.len()..].starts_with('_')
        {
            return encode_address(value);
        }
    }

    match ty {
        SophiaType::Int | SophiaType::Bool => Ok(stringify(value)),
        SophiaType::String => Ok(format!("\"{}\"", stringify(value))),
        SophiaType::Address => encode_address(value),
        SophiaType::List(item) => {
            let parts = value
                .as_array()
                .ok_or_else(|| anyhow!("list value is not a sequence: {value}"))?
                .iter()
                .map(|v| encode_arg(item, v))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(",")))
        }
        SophiaType::Tuple(items) => {
            let values = value
                .as_array()
                .ok_or_else(|| anyhow!("tuple value is not a sequence: {value}"))?;
            if values.len() != items.len() {
                bail!(
                    "tuple arity mismatch: expected {} elements, got {}",
                    items.len(),
                    values.len()
                );
            }
            let parts = items
                .iter()
                .zip(values)
                .map(|(t, v)| encode_arg(t, v))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", parts.join(",")))
        }
        SophiaType::Option(item) => {
            if value.is_null() {
                Ok("None".to_string())
            } else {
                Ok(format!("Some({})", encode_arg(item, value)?))
            }
        }
        SophiaType::Record(fields) => {
            let obj = value
                .as_object()
                .ok_or_else(|| anyhow!("record value is not an object: {value}"))?;
            let parts = fields
                .iter()
                .map(|field| {
                    let v = obj
                        .get(&field.name)
                        .ok_or_else(|| anyhow!("record value is missing field '{}'", field.name))?;
                    Ok(format!("{} = {}", field.name, encode_arg(&field.ty, v)?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", parts.join(",")))
        }
        SophiaType::Map(key, val) => {
            // Dictionary form or ordered key/value pair sequence; iteration
            // order determines emission order.
            let mut parts = Vec::new();
            match value {
                Value::Object(entries) => {
                    for (k, v) in entries {
                        let k = encode_arg(key, &Value::String(k.clone()))?;
                        parts.push(format!("[{}] = {}", k, encode_arg(val, v)?));
                    }
                }
                Value::Array(pairs) => {
                    for pair in pairs {
                        let kv = pair
                            .as_array()
                            .filter(|p| p.len() == 2)
                            .ok_or_else(|| anyhow!("map entry is not a key/value pair: {pair}"))?;
                        parts.push(format!(
                            "[{}] = {}",
                            encode_arg(key, &kv[0])?,
                            encode_arg(val, &kv[1])?
                        ));
                    }
                }
                other => bail!("map value is neither an object nor a pair sequence: {other}"),
            }
            Ok(format!("{{{}}}", parts.join(",")))
        }
    }
}

/// Encode the full parameter list of a function call.
pub fn encode_args(func: &FunctionAci, params: &[Value]) -> Result<Vec<String>> {
    if params.len() != func.arguments.len() {
        bail!(
            "'{}' expects {} argument(s), got {}",
            func.name,
            func.arguments.len(),
            params.len()
        );
    }
    func.arguments
        .iter()
        .zip(params)
        .enumerate()
        .map(|(i, (ty, value))| {
            encode_arg(ty, value).with_context(|| format!("encoding argument {i} of '{}'", func.name))
        })
        .collect()
}

fn encode_address(value: &Value) -> Result<String> {
    match value {
        Value::Number(n) if n.as_u64() == Some(0) => Ok(address::ZERO_LITERAL.to_string()),
        Value::String(text) => address::to_calldata_literal(text),
        other => bail!("address value must be 0 or entity address text, got {other}"),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
