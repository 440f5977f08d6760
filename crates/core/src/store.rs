use async_trait::async_trait;

use crate::domain::order::{Order, OrderDraft, OrderId};
use crate::domain::product::{NewProduct, Product, ProductId};
use crate::errors::StoreError;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Offset/limit window over the catalog, ordered by product id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(skip: Option<u32>, limit: Option<u32>, max_limit: u32) -> Self {
        Self {
            offset: skip.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(max_limit.max(1)),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { offset: 0, limit: DEFAULT_PAGE_LIMIT }
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self, page: PageRequest) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn count_products(&self) -> Result<u64, StoreError>;

    /// Inserts `products` only when the catalog holds no rows. The emptiness
    /// check and the inserts are one atomic step. Returns how many products
    /// were inserted.
    async fn seed_if_empty(&self, products: Vec<NewProduct>) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes the order header and all of its items atomically and returns
    /// the stored order with its assigned id and timestamp.
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Removes the order together with its items.
    async fn delete_order(&self, id: OrderId) -> Result<bool, StoreError>;
}
