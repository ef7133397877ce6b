//! Service configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use dao_permission_contract::TxParams;
use dao_permission_core::Address;

use crate::error::{PermissionError, Result};

/// Configuration for a [`PermissionService`](crate::PermissionService).
///
/// Loadable from JSON; missing fields take their defaults:
///
/// ```json
/// { "gas": 3000000, "default_sender": null, "confirmation_timeout_ms": 60000, "fetch_concurrency": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Gas limit used when a call does not set one.
    pub gas: u64,
    /// Sender used when a call does not set one.
    pub default_sender: Option<Address>,
    /// Upper bound on each confirmation wait. `None` waits as long as the
    /// backend does.
    #[serde(rename = "confirmation_timeout_ms", with = "duration_ms")]
    pub confirmation_timeout: Option<Duration>,
    /// Maximum `ownerFromIndex` queries in flight during one listing.
    pub fetch_concurrency: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gas: 3_000_000,
            default_sender: None,
            confirmation_timeout: None,
            fetch_concurrency: 1,
        }
    }
}

impl ServiceConfig {
    /// Set the default gas limit.
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    /// Set the default sending account.
    pub fn with_default_sender(mut self, sender: Address) -> Self {
        self.default_sender = Some(sender);
        self
    }

    /// Bound every confirmation wait by `timeout`.
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }

    /// Set how many slot queries a listing may run at once.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PermissionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PermissionError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Check that gas and fetch concurrency are nonzero.
    pub fn validate(&self) -> Result<()> {
        if self.gas == 0 {
            return Err(PermissionError::Config("gas must be nonzero".into()));
        }
        if self.fetch_concurrency == 0 {
            return Err(PermissionError::Config(
                "fetch_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Transaction defaults derived from this configuration.
    pub fn tx_defaults(&self) -> TxParams {
        TxParams {
            from: self.default_sender,
            gas: Some(self.gas),
            gas_price: None,
            value: None,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
