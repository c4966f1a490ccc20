//! External collaborator abstractions.
//!
//! The lifecycle orchestrator is decoupled from the actual compiler and
//! node: it consumes the two traits here and nothing else. Source
//! compilation, transport, transaction construction, and raw return-value
//! resolution all live behind these boundaries; their failures propagate
//! unchanged, with no retry and no suppression in the core.
//!
//! Mock implementations with pre-programmed responses are provided for
//! tests, so unit and integration tests never need a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::options::CallOptions;

/// Artifact produced by the compiler collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledContract {
    pub bytecode: String,
}

/// Interface document fetched for a contract source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// The declarative interface document (JSON).
    pub aci: Value,
    /// The interface in its encoded transport form.
    pub encoded: String,
}

/// Result of a deploy, as reported by the node collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRecord {
    pub owner: String,
    pub transaction: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub result: Value,
    pub raw_tx: String,
}

/// Raw result of a contract call. Return-value decoding is a separate,
/// lazy step (see `ContractCall::decode`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallReceipt {
    /// The node's raw call result payload.
    pub result: Value,
    /// The encoded return value, resolved on demand by the decode
    /// collaborator.
    pub return_value: String,
    /// Return type hint reported by the node, when present.
    pub return_type: Option<String>,
}

/// Contract source compiler.
#[async_trait]
pub trait CompilerClient: Send + Sync {
    /// Compile contract source into a deployable artifact.
    async fn compile(&self, source: &str) -> Result<CompiledContract>;

    /// Fetch the published interface for a contract source.
    async fn fetch_interface(&self, source: &str) -> Result<InterfaceDescriptor>;
}

/// Node-side operations: deploy, call, and return-value resolution.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Submit a deploy transaction for a compiled artifact.
    async fn deploy(
        &self,
        artifact: &CompiledContract,
        source: &str,
        init_args: &[String],
        options: &CallOptions,
    ) -> Result<DeployRecord>;

    /// Submit a state-mutating contract call.
    async fn call(
        &self,
        source: &str,
        address: &str,
        function: &str,
        args: &[String],
        options: &CallOptions,
    ) -> Result<CallReceipt>;

    /// Read-only call; `options.at_height` may pin it to a historical point.
    async fn static_call(
        &self,
        source: &str,
        address: &str,
        function: &str,
        args: &[String],
        options: &CallOptions,
    ) -> Result<CallReceipt>;

    /// Resolve a raw return value into a structured node tree.
    async fn decode_return_value(&self, return_type: &str, raw: &str) -> Result<Value>;
}

/// A mock compiler returning pre-configured artifacts.
///
/// Counts invocations so tests can assert recompilation behavior.
#[derive(Debug, Default)]
pub struct MockCompiler {
    bytecode: String,
    aci: Value,
    compile_calls: AtomicUsize,
}

impl MockCompiler {
    pub fn new(bytecode: &str) -> Self {
        Self {
            bytecode: bytecode.to_string(),
            aci: Value::Null,
            compile_calls: AtomicUsize::new(0),
        }
    }

    /// Set the interface document served by `fetch_interface`.
    pub fn with_interface(mut self, aci: Value) -> Self {
        self.aci = aci;
        self
    }

    pub fn compile_count(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompilerClient for MockCompiler {
    async fn compile(&self, _source: &str) -> Result<CompiledContract> {
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CompiledContract {
            bytecode: self.bytecode.clone(),
        })
    }

    async fn fetch_interface(&self, _source: &str) -> Result<InterfaceDescriptor> {
        if self.aci.is_null() {
            return Err(anyhow!("no mock interface configured"));
        }
        Ok(InterfaceDescriptor {
            aci: self.aci.clone(),
            encoded: "cb_mock".to_string(),
        })
    }
}

/// A mock node with pre-programmed call receipts and decoded nodes.
///
/// # Example
/// ```
/// use sophia_contract::client::{CallReceipt, MockChain};
/// use serde_json::json;
///
/// let chain = MockChain::new("ct_mock");
/// chain.add_receipt("get_count", CallReceipt {
///     result: json!({"gasUsed": 100}),
///     return_value: "cb_AAAA".to_string(),
///     return_type: Some("int".to_string()),
/// });
/// chain.add_decoded("cb_AAAA", json!({"value": 5}));
/// ```
#[derive(Debug, Default)]
pub struct MockChain {
    address: String,
    receipts: Mutex<HashMap<String, CallReceipt>>,
    decoded: Mutex<HashMap<String, Value>>,
    last_deploy_args: Mutex<Option<Vec<String>>>,
    last_call_args: Mutex<Option<Vec<String>>>,
    deploy_calls: AtomicUsize,
    call_calls: AtomicUsize,
    static_calls: AtomicUsize,
    decode_calls: AtomicUsize,
}

impl MockChain {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Default::default()
        }
    }

    /// Pre-program the receipt returned for a function name.
    pub fn add_receipt(&self, function: &str, receipt: CallReceipt) {
        self.receipts
            .lock()
            .unwrap()
            .insert(function.to_string(), receipt);
    }

    /// Pre-program the structured node for a raw return value.
    pub fn add_decoded(&self, raw: &str, node: Value) {
        self.decoded.lock().unwrap().insert(raw.to_string(), node);
    }

    pub fn deploy_count(&self) -> usize {
        self.deploy_calls.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.call_calls.load(Ordering::SeqCst)
    }

    pub fn static_call_count(&self) -> usize {
        self.static_calls.load(Ordering::SeqCst)
    }

    pub fn decode_count(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    /// Encoded init args of the most recent deploy.
    pub fn last_deploy_args(&self) -> Option<Vec<String>> {
        self.last_deploy_args.lock().unwrap().clone()
    }

    /// Encoded args of the most recent call.
    pub fn last_call_args(&self) -> Option<Vec<String>> {
        self.last_call_args.lock().unwrap().clone()
    }

    fn receipt_for(&self, function: &str) -> Result<CallReceipt> {
        self.receipts
            .lock()
            .unwrap()
            .get(function)
            .cloned()
            .ok_or_else(|| anyhow!("no mock receipt for function '{}'", function))
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn deploy(
        &self,
        _artifact: &CompiledContract,
        _source: &str,
        init_args: &[String],
        _options: &CallOptions,
    ) -> Result<DeployRecord> {
        self.deploy_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_deploy_args.lock().unwrap() = Some(init_args.to_vec());
        Ok(DeployRecord {
            owner: "ak_mock_owner".to_string(),
            transaction: "th_mock".to_string(),
            address: self.address.clone(),
            created_at: Utc::now(),
            result: json!({"returnType": "ok"}),
            raw_tx: "tx_mock".to_string(),
        })
    }

    async fn call(
        &self,
        _source: &str,
        _address: &str,
        function: &str,
        args: &[String],
        _options: &CallOptions,
    ) -> Result<CallReceipt> {
        self.call_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call_args.lock().unwrap() = Some(args.to_vec());
        self.receipt_for(function)
    }

    async fn static_call(
        &self,
        _source: &str,
        _address: &str,
        function: &str,
        args: &[String],
        _options: &CallOptions,
    ) -> Result<CallReceipt> {
        self.static_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call_args.lock().unwrap() = Some(args.to_vec());
        self.receipt_for(function)
    }

    async fn decode_return_value(&self, _return_type: &str, raw: &str) -> Result<Value> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        self.decoded
            .lock()
            .unwrap()
            .get(raw)
            .cloned()
            .ok_or_else(|| anyhow!("no mock decoded node for '{}'", raw))
    }
}
