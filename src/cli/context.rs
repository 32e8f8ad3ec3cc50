use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::adapters::store::json_shop_store::JsonShopStore;
use crate::config::app_config::AppConfig;
use crate::core::services::shop_service::ShopService;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const SHOPS_FILE: &str = "shops.json";

/// Initialize the global data directory path from `--data-dir`.
pub fn init(dir: &Path) {
    let _ = DATA_DIR.set(dir.to_path_buf());
}

/// Get the current data directory path.
pub fn data_dir() -> &'static Path {
    DATA_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new("data"))
}

/// Shop service backed by `shops.json` and the configured audit log file.
pub fn file_service(config: &AppConfig) -> ShopService {
    let dir = data_dir();
    ShopService::new(
        Arc::new(JsonShopStore::new(dir.join(SHOPS_FILE))),
        Arc::new(JsonAuditLogger::from_config(dir, &config.audit)),
        config.quota_rules(),
    )
}
