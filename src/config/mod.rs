use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::reconciliation::ReconciliationConfig;
use crate::types::*;

/// Settings shared by the console and portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurchConfig {
    /// Printed in report headers
    pub church_name: String,
    /// Currency preselected for new batches
    pub default_currency: String,
    pub reconciliation: ReconciliationConfig,
}

impl Default for ChurchConfig {
    fn default() -> Self {
        Self {
            church_name: "Your Church Name".into(),
            default_currency: "USD".into(),
            reconciliation: ReconciliationConfig::default(),
        }
    }
}

impl ChurchConfig {
    pub fn from_json_str(json: &str) -> ChurchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> ChurchResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            let data = fs::read_to_string(path)?;
            Self::from_json_str(&data)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ChurchResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChurchConfig::load(dir.path().join("church.json")).unwrap();
        assert_eq!(config, ChurchConfig::default());
        assert_eq!(
            config.reconciliation.tolerance_for("USD"),
            &BigDecimal::from_str("0.001").unwrap()
        );
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = ChurchConfig::from_json_str(
            r#"{ "church_name": "Grace Chapel", "reconciliation": { "currency_tolerances": { "ZIG": "0.5" } } }"#,
        )
        .unwrap();
        assert_eq!(config.church_name, "Grace Chapel");
        assert_eq!(config.default_currency, "USD");
        assert_eq!(
            config.reconciliation.tolerance_for("zig"),
            &BigDecimal::from_str("0.5").unwrap()
        );
        assert_eq!(
            config.reconciliation.tolerance_for("USD"),
            &BigDecimal::from_str("0.001").unwrap()
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings").join("church.json");
        let mut config = ChurchConfig::default();
        config.default_currency = "ZIG".into();
        config.save(&path).unwrap();

        let loaded = ChurchConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ChurchConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ChurchError::Serde(_)));
    }
}
