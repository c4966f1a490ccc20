//! Entity address codec.
//!
//! This module is the canonical source for address text handling in the
//! workspace. On-chain entities are addressed as `<prefix>_<base58check(payload)>`,
//! where the two-character prefix names the entity kind (account, contract,
//! oracle, oracle query). Call data uses a different literal form: `#0` for
//! the null address and `#<hex payload>` otherwise.

use anyhow::{anyhow, Result};

/// The entity kinds a textual address can refer to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Prefix {
    Account,
    Contract,
    Oracle,
    OracleQuery,
}

/// All recognized prefixes, in match order.
pub const ALL_PREFIXES: [Prefix; 4] = [
    Prefix::Account,
    Prefix::Contract,
    Prefix::Oracle,
    Prefix::OracleQuery,
];

/// Two-character marker identifying contract addresses; values shaped like
/// `ct_...` are treated as addresses regardless of their declared type.
pub const CONTRACT_MARKER: &str = "ct";

/// Call-data literal for the null address.
pub const ZERO_LITERAL: &str = "#0";

impl Prefix {
    /// The two-character textual tag for this entity kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Prefix::Account => "ak",
            Prefix::Contract => "ct",
            Prefix::Oracle => "ok",
            Prefix::OracleQuery => "oq",
        }
    }

    /// Resolve a textual tag to its entity kind, if recognized.
    pub fn from_tag(tag: &str) -> Option<Self> {
        ALL_PREFIXES.into_iter().find(|p| p.tag() == tag)
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix::Account
    }
}

/// Encode a raw payload as address text under the given prefix.
///
/// # Examples
///
/// ```
/// use sophia_types::address::{encode, Prefix};
///
/// let text = encode(Prefix::Account, &[1, 2, 3]);
/// assert!(text.starts_with("ak_"));
/// ```
pub fn encode(prefix: Prefix, payload: &[u8]) -> String {
    format!(
        "{}_{}",
        prefix.tag(),
        bs58::encode(payload).with_check().into_string()
    )
}

/// Decode address text into its entity kind and raw payload.
///
/// Rejects unknown prefixes and payloads that fail the base58 checksum.
pub fn decode(text: &str) -> Result<(Prefix, Vec<u8>)> {
    let (tag, body) = text
        .split_once('_')
        .ok_or_else(|| anyhow!("invalid address '{}': missing prefix separator", text))?;
    let prefix = Prefix::from_tag(tag)
        .ok_or_else(|| anyhow!("invalid address '{}': unknown prefix '{}'", text, tag))?;
    let payload = bs58::decode(body)
        .with_check(None)
        .into_vec()
        .map_err(|e| anyhow!("invalid address '{}': {}", text, e))?;
    Ok((prefix, payload))
}

/// Whether the text carries a recognized entity-address prefix.
pub fn is_entity_address(text: &str) -> bool {
    text.split_once('_')
        .is_some_and(|(tag, _)| Prefix::from_tag(tag).is_some())
}

/// Convert address text to its call-data literal, `#<hex payload>`.
pub fn to_calldata_literal(text: &str) -> Result<String> {
    let (_, payload) = decode(text)?;
    Ok(format!("#{}", hex::encode(payload)))
}
