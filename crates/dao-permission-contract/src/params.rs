//! Optional transaction parameters.

use serde::{Deserialize, Serialize};

use dao_permission_core::{Address, U256};

/// Sender, gas and value for a call. Unset fields are filled from defaults
/// before the call reaches the backend; the backend forwards them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    pub from: Option<Address>,
    pub gas: Option<u64>,
    pub gas_price: Option<U256>,
    pub value: Option<U256>,
}

impl TxParams {
    /// Parameters with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with only the sender set.
    pub fn from_sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Self::default()
        }
    }

    /// Set the sending account.
    pub fn sender(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the gas limit.
    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Set the gas price in wei.
    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Set the value sent with the call, in wei.
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Fill every unset field from `defaults`. Fields already set win.
    pub fn or_defaults(self, defaults: &TxParams) -> Self {
        Self {
            from: self.from.or(defaults.from),
            gas: self.gas.or(defaults.gas),
            gas_price: self.gas_price.or(defaults.gas_price),
            value: self.value.or(defaults.value),
        }
    }
}
