//! Layered call options.
//!
//! Every lifecycle operation merges the instance's default options with any
//! per-call overrides. Precedence is documented and fixed: instance
//! defaults < per-call overrides. The merge is shallow and computed fresh
//! per call ([`CallOptions::merged`]); mutating the instance defaults is a
//! separate, explicit operation ([`CallOptions::apply`]). There is no
//! ambient shared default: every instance owns its copy.

use serde::{Deserialize, Serialize};
use sophia_types::address::Prefix;

/// Effective options for a compile, deploy, or call operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Gas limit forwarded to the node collaborator.
    pub gas: u64,
    /// Gas price in the chain's base unit.
    pub gas_price: u64,
    /// Coins attached to the call.
    pub amount: u64,
    /// Deposit attached at deploy time.
    pub deposit: u64,
    /// Route the call through the read-only path (no state mutation).
    pub call_static: bool,
    /// Pin a static call to a historical height.
    pub at_height: Option<u64>,
    /// Wait for the transaction to be confirmed before returning.
    pub wait_mined: bool,
    /// Skip argument validation and encoding; forward params verbatim.
    pub skip_args_convert: bool,
    /// Return the raw structured node from decode instead of the native value.
    pub skip_transform_decoded: bool,
    /// Entity prefix applied when decoding address payloads.
    pub return_prefix: Prefix,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            gas: 1_579_000,
            gas_price: 1_000_000_000,
            amount: 0,
            deposit: 0,
            call_static: false,
            at_height: None,
            wait_mined: true,
            skip_args_convert: false,
            skip_transform_decoded: false,
            return_prefix: Prefix::Account,
        }
    }
}

/// Per-call override layer: only set fields replace the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOverrides {
    pub gas: Option<u64>,
    pub gas_price: Option<u64>,
    pub amount: Option<u64>,
    pub deposit: Option<u64>,
    pub call_static: Option<bool>,
    pub at_height: Option<u64>,
    pub wait_mined: Option<bool>,
    pub skip_args_convert: Option<bool>,
    pub skip_transform_decoded: Option<bool>,
    pub return_prefix: Option<Prefix>,
}

impl CallOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_static_call(mut self, at_height: Option<u64>) -> Self {
        self.call_static = Some(true);
        self.at_height = at_height;
        self
    }

    pub fn with_skip_args_convert(mut self) -> Self {
        self.skip_args_convert = Some(true);
        self
    }

    pub fn with_raw_decode(mut self) -> Self {
        self.skip_transform_decoded = Some(true);
        self
    }

    pub fn with_return_prefix(mut self, prefix: Prefix) -> Self {
        self.return_prefix = Some(prefix);
        self
    }
}

impl CallOptions {
    /// Produce the effective options for one call without touching the
    /// defaults. Overrides win on every set field.
    pub fn merged(&self, overrides: &CallOverrides) -> CallOptions {
        CallOptions {
            gas: overrides.gas.unwrap_or(self.gas),
            gas_price: overrides.gas_price.unwrap_or(self.gas_price),
            amount: overrides.amount.unwrap_or(self.amount),
            deposit: overrides.deposit.unwrap_or(self.deposit),
            call_static: overrides.call_static.unwrap_or(self.call_static),
            at_height: overrides.at_height.or(self.at_height),
            wait_mined: overrides.wait_mined.unwrap_or(self.wait_mined),
            skip_args_convert: overrides.skip_args_convert.unwrap_or(self.skip_args_convert),
            skip_transform_decoded: overrides
                .skip_transform_decoded
                .unwrap_or(self.skip_transform_decoded),
            return_prefix: overrides.return_prefix.unwrap_or(self.return_prefix),
        }
    }

    /// Fold an override layer into these defaults, mutating them.
    pub fn apply(&mut self, overrides: &CallOverrides) {
        *self = self.merged(overrides);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_override_wins() {
        let defaults = CallOptions::default();
        let merged = defaults.merged(&CallOverrides::new().with_gas(500).with_amount(10));
        assert_eq!(merged.gas, 500);
        assert_eq!(merged.amount, 10);
        // Untouched fields keep their defaults.
        assert_eq!(merged.gas_price, defaults.gas_price);
        assert!(merged.wait_mined);
    }

    #[test]
    fn test_merge_does_not_mutate_defaults() {
        let defaults = CallOptions::default();
        let _ = defaults.merged(&CallOverrides::new().with_gas(1));
        assert_eq!(defaults.gas, CallOptions::default().gas);
    }

    #[test]
    fn test_apply_mutates() {
        let mut defaults = CallOptions::default();
        defaults.apply(&CallOverrides::new().with_amount(7));
        assert_eq!(defaults.amount, 7);
    }

    #[test]
    fn test_static_call_pin() {
        let merged = CallOptions::default().merged(&CallOverrides::new().with_static_call(Some(1234)));
        assert!(merged.call_static);
        assert_eq!(merged.at_height, Some(1234));
    }
}
