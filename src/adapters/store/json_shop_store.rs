use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use crate::adapters::store::shop_table::ShopTable;
use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::shop::{NewShop, Shop};
use crate::core::traits::shop_store::ShopStore;

/// File-based shop store that keeps every shop in one JSON document.
///
/// The file is re-read on every call so the CLI and a running server see
/// each other's changes. Writes go to a temp file in the same directory
/// which is then renamed over the original.
///
/// Example `shops.json`:
/// ```text
/// {"next_id":3,"shops":[{"id":1,"owner":"local","name":"Alpha","type":"GOLD",
///   "mentionEveryone":200,"mentionHere":250,"mentionStores":400}]}
/// ```
pub struct JsonShopStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonShopStore {
    /// Create a store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<ShopTable> {
        if !self.path.exists() {
            return Ok(ShopTable::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ShopTable::default());
        }

        serde_json::from_str(&content).map_err(|e| ShopkeeperError::StorageError {
            detail: format!("Malformed shop file {}: {e}", self.path.display()),
        })
    }

    fn save(&self, table: &ShopTable) -> Result<()> {
        let json = serde_json::to_string_pretty(table).map_err(|e| ShopkeeperError::StorageError {
            detail: format!("Failed to serialize shops: {e}"),
        })?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| ShopkeeperError::StorageError {
                detail: format!("Cannot replace {}: {e}", self.path.display()),
            })?;
        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| ShopkeeperError::StorageError {
            detail: "shop file lock poisoned".into(),
        })
    }
}

impl ShopStore for JsonShopStore {
    fn insert(&self, shop: NewShop) -> Result<Shop> {
        let _guard = self.guard()?;
        let mut table = self.load()?;
        let shop = table.insert(shop);
        self.save(&table)?;
        Ok(shop)
    }

    fn get(&self, id: u64) -> Result<Option<Shop>> {
        let _guard = self.guard()?;
        Ok(self.load()?.get(id).cloned())
    }

    fn update(
        &self,
        id: u64,
        apply: &mut dyn FnMut(&mut Shop) -> Result<()>,
    ) -> Result<Option<Shop>> {
        let _guard = self.guard()?;
        let mut table = self.load()?;
        let updated = table.update(id, apply)?;
        if updated.is_some() {
            self.save(&table)?;
        }
        Ok(updated)
    }

    fn remove(&self, id: u64) -> Result<Option<Shop>> {
        let _guard = self.guard()?;
        let mut table = self.load()?;
        let removed = table.remove(id);
        if removed.is_some() {
            self.save(&table)?;
        }
        Ok(removed)
    }

    fn restore(&self, shop: Shop) -> Result<()> {
        let _guard = self.guard()?;
        let mut table = self.load()?;
        if table.restore(shop) {
            self.save(&table)?;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Shop>> {
        let _guard = self.guard()?;
        Ok(self.load()?.list())
    }
}
