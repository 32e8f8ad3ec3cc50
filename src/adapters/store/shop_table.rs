use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::models::shop::{NewShop, Shop};

/// The full set of shops plus the id counter, shared by the store adapters.
///
/// Ids start at 1 and are never reused, even after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopTable {
    next_id: u64,
    shops: Vec<Shop>,
}

impl Default for ShopTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            shops: Vec::new(),
        }
    }
}

impl ShopTable {
    pub fn insert(&mut self, new: NewShop) -> Shop {
        // Tolerate hand-edited files whose counter lags behind the rows
        let floor = self.shops.iter().map(|s| s.id + 1).max().unwrap_or(1);
        let id = self.next_id.max(floor);
        self.next_id = id + 1;

        let shop = new.into_shop(id);
        self.shops.push(shop.clone());
        shop
    }

    pub fn get(&self, id: u64) -> Option<&Shop> {
        self.shops.iter().find(|s| s.id == id)
    }

    /// Apply `f` to a copy of the shop and keep the copy only if `f`
    /// succeeds.
    pub fn update(
        &mut self,
        id: u64,
        f: &mut dyn FnMut(&mut Shop) -> Result<()>,
    ) -> Result<Option<Shop>> {
        let Some(slot) = self.shops.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        let mut draft = slot.clone();
        f(&mut draft)?;
        *slot = draft.clone();
        Ok(Some(draft))
    }

    pub fn remove(&mut self, id: u64) -> Option<Shop> {
        let pos = self.shops.iter().position(|s| s.id == id)?;
        Some(self.shops.remove(pos))
    }

    pub fn restore(&mut self, shop: Shop) -> bool {
        if self.get(shop.id).is_some() {
            return false;
        }
        self.next_id = self.next_id.max(shop.id + 1);
        self.shops.push(shop);
        true
    }

    pub fn list(&self) -> Vec<Shop> {
        let mut shops = self.shops.clone();
        shops.sort_by_key(|s| s.id);
        shops
    }
}
