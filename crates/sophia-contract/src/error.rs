//! Domain error kinds for contract lifecycle operations.
//!
//! Collaborator failures (compiler, node, decoder) propagate unchanged as
//! plain `anyhow` errors; the kinds here are the conditions the core itself
//! detects. They surface through `anyhow::Error` at the API boundary and
//! stay recoverable via `downcast_ref`.

use std::fmt;

use sophia_types::TypeParseError;

use crate::schema::ValidationError;

/// Conditions detected by the lifecycle orchestrator and codecs.
#[derive(Debug)]
pub enum ContractError {
    /// The call or deploy target is absent from the interface and is not
    /// the implicit constructor.
    UnknownFunction { name: String },

    /// A call was attempted while the instance has no deployment record.
    NotDeployed { function: String },

    /// Aggregate argument validation failure.
    Validation(ValidationError),

    /// A type expression that is neither a recognized container nor a
    /// recognized scalar.
    MalformedType { detail: String },
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractError::UnknownFunction { name } => {
                write!(f, "function '{name}' is not declared in the contract interface")
            }
            ContractError::NotDeployed { function } => {
                write!(
                    f,
                    "cannot call '{function}': the contract has not been deployed"
                )
            }
            ContractError::Validation(err) => write!(f, "argument validation failed: {err}"),
            ContractError::MalformedType { detail } => {
                write!(f, "malformed type descriptor: {detail}")
            }
        }
    }
}

impl std::error::Error for ContractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContractError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ContractError {
    fn from(err: ValidationError) -> Self {
        ContractError::Validation(err)
    }
}

impl From<TypeParseError> for ContractError {
    fn from(err: TypeParseError) -> Self {
        ContractError::MalformedType {
            detail: err.detail().to_string(),
        }
    }
}
