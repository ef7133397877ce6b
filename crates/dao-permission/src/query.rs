//! Pagination parameters for owner listings.

use serde::{Deserialize, Serialize};

/// Which slice of the owner array to list.
///
/// With neither field set, the whole array is listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnersQuery {
    /// First slot to read. Defaults to 0.
    pub start_index: Option<u64>,
    /// Maximum number of slots to read. Defaults to everything after
    /// `start_index`. Also accepted as `elements`.
    #[serde(alias = "elements")]
    pub count: Option<u64>,
}

impl OwnersQuery {
    /// The whole owner array.
    pub fn all() -> Self {
        Self::default()
    }

    /// Everything from `start_index` to the end.
    pub fn from_index(start_index: u64) -> Self {
        Self {
            start_index: Some(start_index),
            count: None,
        }
    }

    /// At most `count` slots starting at `start_index`.
    pub fn range(start_index: u64, count: u64) -> Self {
        Self {
            start_index: Some(start_index),
            count: Some(count),
        }
    }

    /// Resolve to `(start, end)` against an array of `total_size` slots.
    ///
    /// `end` never exceeds `total_size`. A `start` past the end yields an
    /// empty range (`end < start` is possible and means nothing to read).
    pub fn bounds(&self, total_size: u64) -> (u64, u64) {
        let start = self.start_index.unwrap_or(0);
        let end = match self.count {
            Some(count) => start.saturating_add(count).min(total_size),
            None => total_size,
        };
        (start, end)
    }
}
