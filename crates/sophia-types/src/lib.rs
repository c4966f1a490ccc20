//! Shared types for the sophia-kit workspace.
//!
//! This crate provides the foundational contract-interface types used by the
//! orchestration crate:
//!
//! - [`type_tag`]: the closed [`SophiaType`](type_tag::SophiaType) sum and
//!   parsing of declarative type expressions
//! - [`aci`]: published interface documents and function lookup
//! - [`address`]: entity address text (`ak_`/`ct_`/`ok_`/`oq_` + base58check)
//!   and call-data address literals

pub mod aci;
pub mod address;
pub mod type_tag;

// Re-export commonly used types at crate root
pub use aci::{ContractAci, FunctionAci};
pub use address::Prefix;
pub use type_tag::{RecordField, SophiaType, TypeParseError};
