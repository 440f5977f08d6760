use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::order::{Order, OrderId, OrderRequest};
use crate::domain::product::{Product, ProductId};
use crate::errors::{ApplicationError, DomainError, ValidationError};
use crate::pricing::{price_order, QuantityPolicy};
use crate::store::{CatalogStore, OrderStore, PageRequest};

/// Read side of the catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    max_page_size: u32,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>, max_page_size: u32) -> Self {
        Self { catalog, max_page_size }
    }

    pub async fn list_products(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let page = PageRequest::new(skip, limit, self.max_page_size);
        Ok(self.catalog.list_products(page).await?)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApplicationError> {
        self.catalog
            .find_product(id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(id).into())
    }
}

/// Prices and records orders.
#[derive(Clone)]
pub struct OrderService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    quantity_policy: QuantityPolicy,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        quantity_policy: QuantityPolicy,
    ) -> Self {
        Self { catalog, orders, quantity_policy }
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        self.quantity_policy
    }

    pub async fn create_order(
        &self,
        request: OrderRequest,
        correlation_id: &str,
    ) -> Result<Order, ApplicationError> {
        let products = match self.resolve_products(&request).await? {
            Ok(products) => products,
            Err(error) => {
                warn!(
                    event_name = "orders.rejected",
                    correlation_id = %correlation_id,
                    reason = %error,
                    "order references an unknown product"
                );
                return Err(error.into());
            }
        };

        let draft = match price_order(&request, &products, self.quantity_policy) {
            Ok(draft) => draft,
            Err(error) => {
                warn!(
                    event_name = "orders.rejected",
                    correlation_id = %correlation_id,
                    reason = %error,
                    "order could not be priced"
                );
                return Err(error.into());
            }
        };

        let order = self.orders.insert_order(draft).await?;
        info!(
            event_name = "orders.created",
            correlation_id = %correlation_id,
            order_id = order.id.0,
            customer = %order.customer,
            total = %order.total,
            line_count = order.items.len(),
            "order recorded"
        );

        Ok(order)
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApplicationError> {
        self.orders.find_order(id).await?.ok_or_else(|| DomainError::OrderNotFound(id).into())
    }

    /// Looks up every distinct product in request order. The outer result
    /// carries store failures, the inner one the first unknown id.
    async fn resolve_products(
        &self,
        request: &OrderRequest,
    ) -> Result<Result<HashMap<ProductId, Product>, ValidationError>, ApplicationError> {
        let mut products = HashMap::with_capacity(request.lines.len());
        for line in &request.lines {
            if products.contains_key(&line.product_id) {
                continue;
            }
            match self.catalog.find_product(line.product_id).await? {
                Some(product) => {
                    products.insert(product.id, product);
                }
                None => {
                    return Ok(Err(ValidationError::UnknownProduct {
                        product_id: line.product_id,
                    }))
                }
            }
        }
        Ok(Ok(products))
    }
}
