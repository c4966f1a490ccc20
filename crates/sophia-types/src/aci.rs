//! Published contract interface documents.
//!
//! An interface document lists the callable functions of a contract with
//! their argument and return types:
//! `{"functions": [{"name", "arguments": [{"type"}], "returns"}], ...}`.
//! The document is produced by an external interface compiler; this module
//! only consumes it.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::type_tag::SophiaType;

/// One callable function from the interface document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAci {
    pub name: String,
    pub arguments: Vec<SophiaType>,
    pub returns: SophiaType,
}

/// The declared function list of a contract, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAci {
    functions: Vec<FunctionAci>,
}

impl ContractAci {
    pub fn new(functions: Vec<FunctionAci>) -> Self {
        Self { functions }
    }

    /// Parse an interface document. Keys other than `functions` are
    /// ignored; a function's missing `returns` is treated as unit.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let functions = doc
            .get("functions")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("interface document has no 'functions' list"))?;
        let functions = functions
            .iter()
            .map(FunctionAci::from_json)
            .collect::<Result<_>>()?;
        Ok(Self { functions })
    }

    /// Look up a declared function by name. `init` may legitimately be
    /// absent: constructors can be implicit.
    pub fn function(&self, name: &str) -> Option<&FunctionAci> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn functions(&self) -> &[FunctionAci] {
        &self.functions
    }
}

impl FunctionAci {
    fn from_json(entry: &Value) -> Result<Self> {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("interface function is missing its name"))?
            .to_string();
        let arguments = entry
            .get("arguments")
            .and_then(Value::as_array)
            .map(|args| {
                args.iter()
                    .map(|arg| {
                        // An argument is `{name?, type}`, or a bare type expression.
                        let ty = arg.get("type").unwrap_or(arg);
                        SophiaType::parse(ty).map_err(anyhow::Error::from)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()
            .with_context(|| format!("in arguments of function '{name}'"))?
            .unwrap_or_default();
        let returns = entry
            .get("returns")
            .map(SophiaType::parse)
            .transpose()
            .with_context(|| format!("in return type of function '{name}'"))?
            .unwrap_or(SophiaType::Tuple(Vec::new()));
        Ok(Self {
            name,
            arguments,
            returns,
        })
    }
}
