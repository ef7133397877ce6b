//! Domain error codes returned by the permission contract.
//!
//! A nonzero code inside a successful response is data, not a fault: the
//! call went through and the contract reports why it did nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::types::{narrow_u16, U256};

/// A contract-level error code. `0` means success.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    pub const NO_ERROR: Self = Self(0);

    // Resource errors
    pub const RESOURCE_ERROR: Self = Self(1000);
    pub const RESOURCE_NOT_FOUND: Self = Self(1001);
    pub const RESOURCE_ALREADY_EXISTS: Self = Self(1002);

    // Access errors
    pub const ACCESS_DENIED: Self = Self(2000);

    // Parameter errors
    pub const PARAMETER_ERROR: Self = Self(3000);
    pub const INVALID_PARAM_VALUE: Self = Self(3001);
    pub const NULL_PARAM_NOT_ALLOWED: Self = Self(3002);
    pub const INTEGER_OUT_OF_BOUNDS: Self = Self(3003);
    pub const ARRAY_INDEX_OUT_OF_BOUNDS: Self = Self(3100);

    /// Decode from the wide integer the contract returns.
    pub fn from_u256(value: U256) -> Result<Self> {
        narrow_u16(value).map(Self)
    }

    /// Encode as the contract's wide integer.
    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    /// Whether this is the success code.
    pub const fn is_ok(&self) -> bool {
        self.0 == 0
    }

    /// Symbolic name for the codes this client knows about.
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::NO_ERROR => "NO_ERROR",
            Self::RESOURCE_ERROR => "RESOURCE_ERROR",
            Self::RESOURCE_NOT_FOUND => "RESOURCE_NOT_FOUND",
            Self::RESOURCE_ALREADY_EXISTS => "RESOURCE_ALREADY_EXISTS",
            Self::ACCESS_DENIED => "ACCESS_DENIED",
            Self::PARAMETER_ERROR => "PARAMETER_ERROR",
            Self::INVALID_PARAM_VALUE => "INVALID_PARAM_VALUE",
            Self::NULL_PARAM_NOT_ALLOWED => "NULL_PARAM_NOT_ALLOWED",
            Self::INTEGER_OUT_OF_BOUNDS => "INTEGER_OUT_OF_BOUNDS",
            Self::ARRAY_INDEX_OUT_OF_BOUNDS => "ARRAY_INDEX_OUT_OF_BOUNDS",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({})", self)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u16> for ErrorCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}
