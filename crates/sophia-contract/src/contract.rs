//! Contract lifecycle orchestration.
//!
//! `ContractInstance` drives a contract through its three monotonic states:
//!
//! - **Uninitialized** — no artifact, no address
//! - **Compiled** — artifact stored by `compile`
//! - **Deployed** — deployment record stored by `deploy`
//!
//! Nothing un-compiles or un-deploys an instance. Operations gate on the
//! current state (`call` requires Deployed; `deploy` compiles implicitly
//! when needed) and delegate the actual work to the compiler and node
//! collaborators. An instance is owned by the caller that created it:
//! state is mutated without synchronization, so overlapping operations on
//! the *same* instance must be serialized externally. Nothing is shared
//! across instances — the default options are a per-instance copy.

use std::sync::Arc;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use sophia_types::{ContractAci, FunctionAci, SophiaType};

use crate::client::{CallReceipt, ChainClient, CompiledContract, CompilerClient, DeployRecord};
use crate::error::ContractError;
use crate::options::{CallOptions, CallOverrides};
use crate::{decode, encode, schema};

/// Monotonic lifecycle state, derived from what has been stored so far.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Compiled,
    Deployed,
}

/// Where a method-table entry routes: `init` to deploy, all others to call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MethodKind {
    Deploy,
    Call,
}

/// Result of a method-table dispatch.
#[derive(Debug)]
pub enum MethodOutcome {
    Deployed(DeployRecord),
    Called(ContractCall),
}

/// A contract object holding interface, source, compiled artifact,
/// deployment record, and default options.
pub struct ContractInstance {
    source: String,
    aci: ContractAci,
    compiled: Option<CompiledContract>,
    deployment: Option<DeployRecord>,
    defaults: CallOptions,
    methods: IndexMap<String, MethodKind>,
    compiler: Arc<dyn CompilerClient>,
    chain: Arc<dyn ChainClient>,
}

impl ContractInstance {
    /// Create an instance from source text and an already-parsed interface.
    pub fn new(
        source: impl Into<String>,
        aci: ContractAci,
        compiler: Arc<dyn CompilerClient>,
        chain: Arc<dyn ChainClient>,
    ) -> Self {
        // The method table is built once, eagerly, from the declared
        // function list.
        let methods = aci
            .functions()
            .iter()
            .map(|f| {
                let kind = if f.name == "init" {
                    MethodKind::Deploy
                } else {
                    MethodKind::Call
                };
                (f.name.clone(), kind)
            })
            .collect();
        Self {
            source: source.into(),
            aci,
            compiled: None,
            deployment: None,
            defaults: CallOptions::default(),
            methods,
            compiler,
            chain,
        }
    }

    /// Create an instance by fetching the interface document for the source
    /// from the compiler collaborator.
    pub async fn from_source(
        source: impl Into<String>,
        compiler: Arc<dyn CompilerClient>,
        chain: Arc<dyn ChainClient>,
    ) -> Result<Self> {
        let source = source.into();
        let descriptor = compiler.fetch_interface(&source).await?;
        let aci = ContractAci::from_json(&descriptor.aci).map_err(classify_interface_error)?;
        Ok(Self::new(source, aci, compiler, chain))
    }

    /// Replace the instance's default options.
    pub fn with_defaults(mut self, defaults: CallOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn state(&self) -> LifecycleState {
        if self.deployment.is_some() {
            LifecycleState::Deployed
        } else if self.compiled.is_some() {
            LifecycleState::Compiled
        } else {
            LifecycleState::Uninitialized
        }
    }

    pub fn aci(&self) -> &ContractAci {
        &self.aci
    }

    pub fn compiled(&self) -> Option<&CompiledContract> {
        self.compiled.as_ref()
    }

    pub fn deployment(&self) -> Option<&DeployRecord> {
        self.deployment.as_ref()
    }

    pub fn defaults(&self) -> &CallOptions {
        &self.defaults
    }

    /// Explicit mutating merge into the instance defaults.
    pub fn set_defaults(&mut self, overrides: &CallOverrides) {
        self.defaults.apply(overrides);
    }

    /// The eagerly-built method table: function name → routing kind, in
    /// declared order.
    pub fn methods(&self) -> &IndexMap<String, MethodKind> {
        &self.methods
    }

    /// Compile the contract source via the compiler collaborator.
    ///
    /// Not memoized: every explicit invocation recompiles and replaces the
    /// stored artifact.
    pub async fn compile(&mut self) -> Result<&CompiledContract> {
        if self.source.is_empty() {
            bail!("cannot compile: the instance has no source");
        }
        let artifact = self.compiler.compile(&self.source).await?;
        debug!(bytes = artifact.bytecode.len(), "compiled contract source");
        self.compiled = Some(artifact);
        Ok(self.compiled.as_ref().unwrap())
    }

    /// Deploy the contract, compiling first when no artifact is stored yet.
    ///
    /// Constructor arguments are validated and encoded against the `init`
    /// descriptor unless `skip_args_convert` is set; a missing `init`
    /// declaration is tolerated and treated as a zero-argument constructor.
    pub async fn deploy(
        &mut self,
        init_args: &[Value],
        overrides: &CallOverrides,
    ) -> Result<&DeployRecord> {
        if self.compiled.is_none() {
            self.compile().await?;
        }
        let options = self.defaults.merged(overrides);
        let init = self.init_descriptor();
        let encoded = self.convert_args(&init, init_args, &options)?;

        let artifact = self.compiled.as_ref().unwrap();
        let record = self
            .chain
            .deploy(artifact, &self.source, &encoded, &options)
            .await?;
        debug!(address = %record.address, tx = %record.transaction, "contract deployed");
        self.deployment = Some(record);
        Ok(self.deployment.as_ref().unwrap())
    }

    /// Call a deployed contract function.
    ///
    /// Fails with [`ContractError::NotDeployed`] before any deploy, and with
    /// [`ContractError::UnknownFunction`] when the name is absent from the
    /// interface and is not `init`. The returned [`ContractCall`] carries
    /// the raw receipt; decoding is deferred until explicitly requested.
    pub async fn call(
        &self,
        function: &str,
        params: &[Value],
        overrides: &CallOverrides,
    ) -> Result<ContractCall> {
        let Some(deployment) = self.deployment.as_ref() else {
            return Err(ContractError::NotDeployed {
                function: function.to_string(),
            }
            .into());
        };
        let descriptor = match self.aci.function(function) {
            Some(f) => f.clone(),
            None if function == "init" => self.init_descriptor(),
            None => {
                return Err(ContractError::UnknownFunction {
                    name: function.to_string(),
                }
                .into())
            }
        };
        let options = self.defaults.merged(overrides);
        let args = self.convert_args(&descriptor, params, &options)?;

        debug!(
            function = %function,
            args = args.len(),
            call_static = options.call_static,
            "dispatching contract call"
        );
        let receipt = if options.call_static {
            self.chain
                .static_call(&self.source, &deployment.address, function, &args, &options)
                .await?
        } else {
            self.chain
                .call(&self.source, &deployment.address, function, &args, &options)
                .await?
        };
        Ok(ContractCall {
            receipt,
            return_type: descriptor.returns,
            options,
            chain: Arc::clone(&self.chain),
        })
    }

    /// Method-table dispatch: `init` routes to [`deploy`](Self::deploy),
    /// every other declared name to [`call`](Self::call), forwarding the
    /// positional arguments.
    pub async fn invoke(
        &mut self,
        function: &str,
        args: &[Value],
        overrides: &CallOverrides,
    ) -> Result<MethodOutcome> {
        let kind = match self.methods.get(function) {
            Some(kind) => *kind,
            // Implicit constructor: deployable even when undeclared.
            None if function == "init" => MethodKind::Deploy,
            None => {
                return Err(ContractError::UnknownFunction {
                    name: function.to_string(),
                }
                .into())
            }
        };
        match kind {
            MethodKind::Deploy => {
                let record = self.deploy(args, overrides).await?.clone();
                Ok(MethodOutcome::Deployed(record))
            }
            MethodKind::Call => Ok(MethodOutcome::Called(
                self.call(function, args, overrides).await?,
            )),
        }
    }

    /// The `init` descriptor, or the implicit zero-argument constructor
    /// when the interface does not declare one.
    fn init_descriptor(&self) -> FunctionAci {
        self.aci.function("init").cloned().unwrap_or(FunctionAci {
            name: "init".to_string(),
            arguments: Vec::new(),
            returns: SophiaType::Tuple(Vec::new()),
        })
    }

    /// Validate then encode, or forward raw stringified params when
    /// conversion is skipped. Validation is synchronous and completes
    /// before any encoding begins.
    fn convert_args(
        &self,
        descriptor: &FunctionAci,
        params: &[Value],
        options: &CallOptions,
    ) -> Result<Vec<String>> {
        if options.skip_args_convert {
            return Ok(params.iter().map(raw_text).collect());
        }
        schema::validate_args(descriptor, params).map_err(ContractError::Validation)?;
        encode::encode_args(descriptor, params)
    }
}

/// Surface interface type expressions the parser rejected under the
/// recoverable [`ContractError::MalformedType`] kind.
fn classify_interface_error(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<sophia_types::TypeParseError>() {
        Ok(parse_err) => ContractError::from(parse_err).into(),
        Err(err) => err,
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A raw call result with a lazy decode accessor.
///
/// Nothing is decoded until the caller asks: [`decode`](Self::decode)
/// resolves the raw return value through the node's decode collaborator and
/// transforms the structured node against the function's declared return
/// type (or an explicit descriptor via [`decode_as`](Self::decode_as)).
pub struct ContractCall {
    receipt: CallReceipt,
    return_type: SophiaType,
    options: CallOptions,
    chain: Arc<dyn ChainClient>,
}

impl std::fmt::Debug for ContractCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractCall")
            .field("receipt", &self.receipt)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

impl ContractCall {
    pub fn receipt(&self) -> &CallReceipt {
        &self.receipt
    }

    pub fn return_type(&self) -> &SophiaType {
        &self.return_type
    }

    /// Decode the return value against the interface-declared type.
    pub async fn decode(&self) -> Result<Value> {
        let return_type = self.return_type.clone();
        self.decode_as(&return_type).await
    }

    /// Decode the return value against an explicit type descriptor.
    ///
    /// When `skip_transform_decoded` is set, the structured node from the
    /// decode collaborator is returned untransformed.
    pub async fn decode_as(&self, ty: &SophiaType) -> Result<Value> {
        let hint = self
            .receipt
            .return_type
            .clone()
            .unwrap_or_else(|| ty.to_string());
        let node = self
            .chain
            .decode_return_value(&hint, &self.receipt.return_value)
            .await?;
        if self.options.skip_transform_decoded {
            return Ok(node);
        }
        decode::decode_return(ty, &node, self.options.return_prefix)
    }
}

impl std::fmt::Debug for ContractInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractInstance")
            .field("state", &self.state())
            .field("functions", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
