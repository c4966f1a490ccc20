//! Sophia contract client.
//!
//! Marshals values between native JSON representation and the contract
//! calling convention, validates call arguments against a published
//! interface, decodes returned values back to native form, and drives a
//! contract object through its compile → deploy → call lifecycle.
//!
//! Actual source compilation, network transport, hashing/signing, and
//! transaction construction are external collaborators behind the
//! [`client::CompilerClient`] and [`client::ChainClient`] traits.
//!
//! # Core Modules
//!
//! - [`contract`]: `ContractInstance` lifecycle orchestration and the
//!   lazy-decoding `ContractCall`
//! - [`schema`]: non-fail-fast argument validation
//! - [`encode`]: native value → calling-convention literal text
//! - [`decode`]: structured return node → native value
//! - [`options`]: layered call options (instance defaults < per-call
//!   overrides)
//! - [`client`]: collaborator traits plus mock implementations for tests
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sophia_contract::{CallOverrides, ContractInstance};
//!
//! let mut contract = ContractInstance::from_source(source, compiler, chain).await?;
//! contract.deploy(&[json!(42)], &CallOverrides::new()).await?;
//! let call = contract.call("get_count", &[], &CallOverrides::new()).await?;
//! let count = call.decode().await?; // decoding is lazy, on demand
//! ```

pub mod client;
pub mod contract;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod schema;

// Re-export main types at crate root for convenience
pub use client::{
    CallReceipt, ChainClient, CompiledContract, CompilerClient, DeployRecord, InterfaceDescriptor,
};
pub use contract::{ContractCall, ContractInstance, LifecycleState, MethodKind, MethodOutcome};
pub use error::ContractError;
pub use options::{CallOptions, CallOverrides};
pub use schema::{ValidationError, Violation, ViolationKind};
