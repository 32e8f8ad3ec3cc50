use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::tier::{Allotment, Tier, TierTable};
use crate::core::services::shop_service::{DEFAULT_CEILING, QuotaRules};

/// Configuration read from `<data-dir>/config.toml`.
///
/// Every section is optional; a missing file yields the defaults. Secrets
/// (tokens, passwords) never live here, they come from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerSection,
    pub quota: QuotaSection,
    pub tiers: BTreeMap<Tier, Allotment>,
    pub audit: AuditSection,
}

impl AppConfig {
    /// Load and validate `config.toml` from the data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ShopkeeperError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.quota.ceiling == 0 {
            return Err(ShopkeeperError::InvalidConfig {
                detail: "quota.ceiling must be greater than 0".into(),
            });
        }

        let rules = self.quota_rules();
        for (tier, allotment) in rules.tiers.iter() {
            if allotment.max_value() > rules.ceiling {
                return Err(ShopkeeperError::InvalidConfig {
                    detail: format!(
                        "tiers.{tier} grants {} mentions, above quota.ceiling ({})",
                        allotment.max_value(),
                        rules.ceiling
                    ),
                });
            }
        }

        validate_simple_filename(&self.audit.log_file, "audit.log_file")?;

        if self.audit.dashboard_limit == 0 {
            return Err(ShopkeeperError::InvalidConfig {
                detail: "audit.dashboard_limit must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Ceiling and tier table as the shop service expects them.
    pub fn quota_rules(&self) -> QuotaRules {
        let mut tiers = TierTable::default();
        for (tier, allotment) in &self.tiers {
            tiers.set(*tier, *allotment);
        }
        QuotaRules {
            ceiling: self.quota.ceiling,
            tiers,
        }
    }
}

/// The `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
    pub session_ttl_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            session_ttl_secs: 86_400,
        }
    }
}

/// The `[quota]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuotaSection {
    pub ceiling: u32,
}

impl Default for QuotaSection {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
        }
    }
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditSection {
    pub log_file: String,
    /// Entries returned by `/api/logs` when no `limit` is given.
    pub dashboard_limit: usize,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            log_file: "audit.log".into(),
            dashboard_limit: 50,
        }
    }
}

/// Reject anything that is not a bare file name, so a config file cannot
/// point the audit log outside the data directory.
fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if !is_plain {
        return Err(ShopkeeperError::InvalidConfig {
            detail: format!("{what} must be a plain file name, got '{name}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load(tmp.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.quota.ceiling, 30_000);
        assert_eq!(config.audit.log_file, "audit.log");
        assert_eq!(config.audit.dashboard_limit, 50);
    }

    #[test]
    fn tier_override_is_merged() {
        let config = AppConfig::parse(
            r#"
            [tiers.VIP]
            mention_everyone = 10
            mention_here = 20
            mention_stores = 30
            "#,
        )
        .unwrap();

        let rules = config.quota_rules();
        assert_eq!(rules.tiers.allotment(Tier::Vip), Allotment::new(10, 20, 30));
        assert_eq!(rules.tiers.allotment(Tier::Gold), Allotment::new(200, 300, 400));
    }

    #[test]
    fn allotment_above_ceiling_is_rejected() {
        let err = AppConfig::parse(
            r#"
            [quota]
            ceiling = 250
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("above quota.ceiling"));
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let result = AppConfig::parse(
            r#"
            [tiers.BRONZE]
            mention_everyone = 1
            mention_here = 1
            mention_stores = 1
            "#,
        );
        assert!(matches!(result, Err(ShopkeeperError::InvalidConfig { .. })));
    }

    #[test]
    fn audit_log_path_traversal_is_rejected() {
        for bad in ["../audit.log", "logs/audit.log", "..", ""] {
            let toml = format!("[audit]\nlog_file = \"{bad}\"\n");
            assert!(AppConfig::parse(&toml).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn server_section() {
        let config = AppConfig::parse(
            r#"
            [server]
            bind = "127.0.0.1"
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.session_ttl_secs, 86_400);
    }
}
