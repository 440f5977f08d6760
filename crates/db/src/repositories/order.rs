use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;
use vendas_core::domain::order::{Order, OrderDraft, OrderId, OrderItem};
use vendas_core::domain::product::ProductId;
use vendas_core::errors::StoreError;
use vendas_core::store::OrderStore;

use super::{parse_decimal, parse_timestamp, RepositoryError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Header and items share one transaction. Any failed insert drops the
    /// transaction uncommitted, which rolls the whole order back.
    async fn insert(&self, draft: OrderDraft) -> Result<Order, RepositoryError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query(
            "INSERT INTO orders (customer, total, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(&draft.customer)
        .bind(draft.total.to_string())
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for item in &draft.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(order_id)
            .bind(item.product_id.0)
            .bind(i64::from(item.quantity))
            .bind(item.price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(order_id, item_count = draft.items.len(), "order rows committed");

        Ok(Order {
            id: OrderId(order_id),
            customer: draft.customer,
            total: draft.total,
            created_at,
            items: draft.items,
        })
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let header = sqlx::query(
            "SELECT id, customer, CAST(total AS TEXT) AS total_text, created_at
             FROM orders WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT product_id, quantity, CAST(price AS TEXT) AS price_text
             FROM order_items WHERE order_id = ?1 ORDER BY id ASC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(|row| -> Result<OrderItem, RepositoryError> {
                let quantity: i64 = row.try_get("quantity")?;
                let price_text: String = row.try_get("price_text")?;
                Ok(OrderItem {
                    product_id: ProductId(row.try_get("product_id")?),
                    quantity: u32::try_from(quantity).map_err(|_| {
                        RepositoryError::Decode(format!("invalid order_items.quantity `{quantity}`"))
                    })?,
                    price: parse_decimal("order_items.price", &price_text)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_text: String = header.try_get("total_text")?;
        let created_at: String = header.try_get("created_at")?;
        Ok(Some(Order {
            id: OrderId(header.try_get("id")?),
            customer: header.try_get("customer")?,
            total: parse_decimal("orders.total", &total_text)?,
            created_at: parse_timestamp("orders.created_at", &created_at)?,
            items,
        }))
    }

    async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for SqlOrderRepository {
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        Ok(self.insert(draft).await?)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.find(id).await?)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, StoreError> {
        Ok(self.delete(id).await?)
    }
}
