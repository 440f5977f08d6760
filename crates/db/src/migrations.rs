use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "products",
        "orders",
        "order_items",
        "idx_products_name",
        "idx_orders_customer",
        "idx_order_items_order_id",
    ];

    #[tokio::test]
    async fn migrations_create_catalog_and_order_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE name = ?1")
                    .bind(object)
                    .fetch_one(&pool)
                    .await
                    .expect("query sqlite_master");
            assert_eq!(count, 1, "schema object `{object}` should exist after migration");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run should be a no-op");
        pool.close().await;
    }

    #[tokio::test]
    async fn order_items_reject_zero_quantity() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        sqlx::query("INSERT INTO products (name, price) VALUES ('Caneca', '19.0')")
            .execute(&pool)
            .await
            .expect("insert product");
        sqlx::query("INSERT INTO orders (customer, total, created_at) VALUES ('Ana', '0', 'now')")
            .execute(&pool)
            .await
            .expect("insert order");

        let result = sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES (1, 1, 0, '19.0')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "check constraint should reject zero quantity");

        pool.close().await;
    }
}
