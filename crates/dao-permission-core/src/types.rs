//! Chain-level type definitions and checked conversions.
//!
//! Addresses, hashes and wide integers come from `alloy-primitives`; this
//! module adds the block reference used to pin reads and the narrowing
//! conversions used by every decoder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DecodeError, Result};

pub use alloy_primitives::{Address, BlockNumber, TxHash, U256};

/// A calendar timestamp decoded from a chain value (seconds since epoch).
pub type Timestamp = DateTime<Utc>;

/// The point in chain history a read is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockRef {
    /// Whatever the node considers the current head.
    #[default]
    Latest,
    /// A fixed block height.
    Number(BlockNumber),
}

impl BlockRef {
    /// The pinned height, if any.
    pub const fn number(&self) -> Option<BlockNumber> {
        match self {
            BlockRef::Latest => None,
            BlockRef::Number(n) => Some(*n),
        }
    }
}

impl From<BlockNumber> for BlockRef {
    fn from(n: BlockNumber) -> Self {
        BlockRef::Number(n)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Latest => write!(f, "latest"),
            BlockRef::Number(n) => write!(f, "#{}", n),
        }
    }
}

/// Narrow a chain integer to `u64`.
pub fn narrow_u64(value: U256) -> Result<u64> {
    u64::try_from(value).map_err(|_| DecodeError::IntegerOverflow {
        value,
        target: "u64",
    })
}

/// Narrow a chain integer to `u16`.
pub fn narrow_u16(value: U256) -> Result<u16> {
    u16::try_from(value).map_err(|_| DecodeError::IntegerOverflow {
        value,
        target: "u16",
    })
}

/// Decode a block timestamp (Unix seconds) into a calendar timestamp.
///
/// Values beyond `i64::MAX` seconds, or beyond what the calendar type can
/// represent, are rejected rather than clamped.
pub fn decode_timestamp(value: U256) -> Result<Timestamp> {
    let secs = u64::try_from(value)
        .ok()
        .and_then(|s| i64::try_from(s).ok())
        .ok_or(DecodeError::TimestampOutOfRange(value))?;

    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(DecodeError::TimestampOutOfRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_timestamp_epoch() {
        let ts = decode_timestamp(U256::ZERO).unwrap();
        assert_eq!(ts.timestamp(), 0);
    }

    #[test]
    fn test_decode_timestamp_realistic() {
        let ts = decode_timestamp(U256::from(1_736_870_400u64)).unwrap();
        assert_eq!(ts.timestamp(), 1_736_870_400);
        assert_eq!(ts.to_rfc3339(), "2025-01-14T16:00:00+00:00");
    }

    #[test]
    fn test_decode_timestamp_rejects_wide_values() {
        let huge = U256::from(u64::MAX);
        assert_eq!(
            decode_timestamp(huge),
            Err(DecodeError::TimestampOutOfRange(huge))
        );

        let wider = U256::from(1u8) << 200usize;
        assert!(matches!(
            decode_timestamp(wider),
            Err(DecodeError::TimestampOutOfRange(_))
        ));

        // Fits in i64 but not in the calendar type.
        let far_future = U256::from(i64::MAX as u64);
        assert!(decode_timestamp(far_future).is_err());
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(narrow_u64(U256::from(42u64)).unwrap(), 42);
        assert_eq!(narrow_u16(U256::from(3001u64)).unwrap(), 3001);
        assert!(matches!(
            narrow_u16(U256::from(70_000u64)),
            Err(DecodeError::IntegerOverflow { target: "u16", .. })
        ));
        assert!(narrow_u64(U256::MAX).is_err());
    }

    #[test]
    fn test_block_ref_display() {
        assert_eq!(BlockRef::Latest.to_string(), "latest");
        assert_eq!(BlockRef::from(7).to_string(), "#7");
        assert_eq!(BlockRef::Number(7).number(), Some(7));
        assert_eq!(BlockRef::Latest.number(), None);
    }

    mod props {
        use proptest::prelude::*;

        use super::super::{decode_timestamp, narrow_u64, U256};

        proptest! {
            #[test]
            fn test_narrow_u64_matches_width(value in any::<u64>(), shift in 0usize..192) {
                prop_assert_eq!(narrow_u64(U256::from(value)), Ok(value));

                let wide = (U256::from(value) | U256::from(1u8)) << (64 + shift);
                prop_assert!(narrow_u64(wide).is_err());
            }

            #[test]
            fn test_decode_timestamp_keeps_seconds(secs in 0u64..=4_102_444_800u64) {
                let ts = decode_timestamp(U256::from(secs)).unwrap();
                prop_assert_eq!(ts.timestamp(), secs as i64);
            }
        }
    }
}
