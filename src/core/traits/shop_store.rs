use crate::core::errors::Result;
use crate::core::models::shop::{NewShop, Shop};

/// Port for persisting shop records.
///
/// Implementations live in `adapters::store`. Every method is atomic with
/// respect to the others on the same store.
pub trait ShopStore: Send + Sync {
    /// Assign the next id and persist the shop.
    fn insert(&self, shop: NewShop) -> Result<Shop>;

    fn get(&self, id: u64) -> Result<Option<Shop>>;

    /// Read-modify-write a single shop. `apply` runs while the store is
    /// locked; if it fails nothing is written. Returns `None` if the id is
    /// unknown.
    fn update(&self, id: u64, apply: &mut dyn FnMut(&mut Shop) -> Result<()>)
    -> Result<Option<Shop>>;

    /// Delete a shop, returning it if it existed.
    fn remove(&self, id: u64) -> Result<Option<Shop>>;

    /// Put a removed shop back under its original id. Does nothing if the
    /// id is taken.
    fn restore(&self, shop: Shop) -> Result<()>;

    /// All shops in id order.
    fn list(&self) -> Result<Vec<Shop>>;
}
