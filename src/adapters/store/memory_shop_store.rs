use std::sync::{Mutex, MutexGuard};

use crate::adapters::store::shop_table::ShopTable;
use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::shop::{NewShop, Shop};
use crate::core::traits::shop_store::ShopStore;

/// Shop store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryShopStore {
    table: Mutex<ShopTable>,
}

impl MemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, ShopTable>> {
        self.table.lock().map_err(|_| ShopkeeperError::StorageError {
            detail: "shop table lock poisoned".into(),
        })
    }
}

impl ShopStore for MemoryShopStore {
    fn insert(&self, shop: NewShop) -> Result<Shop> {
        Ok(self.table()?.insert(shop))
    }

    fn get(&self, id: u64) -> Result<Option<Shop>> {
        Ok(self.table()?.get(id).cloned())
    }

    fn update(
        &self,
        id: u64,
        apply: &mut dyn FnMut(&mut Shop) -> Result<()>,
    ) -> Result<Option<Shop>> {
        self.table()?.update(id, apply)
    }

    fn remove(&self, id: u64) -> Result<Option<Shop>> {
        Ok(self.table()?.remove(id))
    }

    fn restore(&self, shop: Shop) -> Result<()> {
        self.table()?.restore(shop);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Shop>> {
        Ok(self.table()?.list())
    }
}
