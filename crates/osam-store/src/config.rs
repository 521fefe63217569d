use serde::{Deserialize, Serialize};

/// Configuration for the in-memory block store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of buckets (leaves) addresses are spread across.
    pub buckets: usize,
    /// Seed for bucket placement. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buckets: 12,
            seed: None,
        }
    }
}

impl StoreConfig {
    /// A reproducible configuration with the default bucket count.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_twelve_buckets() {
        let config = StoreConfig::default();
        assert_eq!(config.buckets, 12);
        assert!(config.seed.is_none());
    }

    #[test]
    fn seeded_keeps_default_buckets() {
        let config = StoreConfig::seeded(7);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.buckets, 12);
    }

    #[test]
    fn serde_roundtrip() {
        let config = StoreConfig {
            buckets: 64,
            seed: Some(99),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
