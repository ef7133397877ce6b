//! Raw contract return values and positional tuple decoding.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::error_code::ErrorCode;
use crate::types::{decode_timestamp, Address, Timestamp, U256};

/// A single ABI word as returned by the contract binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Address(Address),
    Uint(U256),
    Bool(bool),
}

impl Value {
    /// ABI type name, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::Uint(_) => "uint256",
            Value::Bool(_) => "bool",
        }
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ErrorCode> for Value {
    fn from(code: ErrorCode) -> Self {
        Value::Uint(code.to_u256())
    }
}

/// Reads a return tuple front to back, checking arity up front and the type
/// of each element as it is taken.
pub struct TupleDecoder<'a> {
    method: &'static str,
    values: &'a [Value],
    position: usize,
}

impl<'a> TupleDecoder<'a> {
    /// Start decoding `values`, which must hold exactly `arity` elements.
    pub fn new(method: &'static str, values: &'a [Value], arity: usize) -> Result<Self> {
        if values.len() != arity {
            return Err(DecodeError::Arity {
                method,
                expected: arity,
                got: values.len(),
            });
        }
        Ok(Self {
            method,
            values,
            position: 0,
        })
    }

    fn next(&mut self) -> Result<&'a Value> {
        let value = self.values.get(self.position).ok_or(DecodeError::Arity {
            method: self.method,
            expected: self.position + 1,
            got: self.values.len(),
        })?;
        self.position += 1;
        Ok(value)
    }

    fn mismatch(&self, expected: &'static str, got: &Value) -> DecodeError {
        DecodeError::TypeMismatch {
            method: self.method,
            position: self.position - 1,
            expected,
            got: got.kind(),
        }
    }

    /// Take the next element as an address.
    pub fn address(&mut self) -> Result<Address> {
        match self.next()? {
            Value::Address(a) => Ok(*a),
            other => Err(self.mismatch("address", other)),
        }
    }

    /// Take the next element as an unsigned integer.
    pub fn uint(&mut self) -> Result<U256> {
        match self.next()? {
            Value::Uint(v) => Ok(*v),
            other => Err(self.mismatch("uint256", other)),
        }
    }

    /// Take the next element as a boolean.
    pub fn bool(&mut self) -> Result<bool> {
        match self.next()? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch("bool", other)),
        }
    }

    /// Take the next element as Unix seconds.
    pub fn timestamp(&mut self) -> Result<Timestamp> {
        decode_timestamp(self.uint()?)
    }

    /// Take the next element as a contract error code.
    pub fn error_code(&mut self) -> Result<ErrorCode> {
        ErrorCode::from_u256(self.uint()?)
    }
}
