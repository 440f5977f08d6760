use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row};
use vendas_core::domain::product::{NewProduct, Product, ProductId};
use vendas_core::errors::StoreError;
use vendas_core::store::{CatalogStore, PageRequest};

use super::{parse_decimal, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "id, name, description, CAST(price AS TEXT) AS price_text";

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count)
            .map_err(|_| RepositoryError::Decode(format!("negative product count `{count}`")))
    }

    /// The emptiness check and the inserts are a single
    /// `INSERT ... SELECT ... WHERE NOT EXISTS` statement.
    async fn seed(&self, products: Vec<NewProduct>) -> Result<usize, RepositoryError> {
        if products.is_empty() {
            return Ok(0);
        }
        for product in &products {
            product.validate()?;
        }

        let mut builder = QueryBuilder::<sqlx::Sqlite>::new(
            "INSERT INTO products (name, description, price) \
             SELECT column1, column2, column3 FROM (",
        );
        builder.push_values(products, |mut row, product| {
            row.push_bind(product.name)
                .push_bind(product.description)
                .push_bind(product.price.to_string());
        });
        builder.push(") WHERE NOT EXISTS (SELECT 1 FROM products)");

        let result = builder.build().execute(&self.pool).await?;
        usize::try_from(result.rows_affected())
            .map_err(|_| RepositoryError::Decode("inserted row count overflowed".to_string()))
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let price_text: String = row.try_get("price_text")?;
    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: parse_decimal("products.price", &price_text)?,
    })
}

#[async_trait]
impl CatalogStore for SqlCatalogRepository {
    async fn list_products(&self, page: PageRequest) -> Result<Vec<Product>, StoreError> {
        Ok(self.list(page).await?)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.find(id).await?)
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        Ok(self.count().await?)
    }

    async fn seed_if_empty(&self, products: Vec<NewProduct>) -> Result<usize, StoreError> {
        Ok(self.seed(products).await?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use vendas_core::domain::product::{NewProduct, ProductId};
    use vendas_core::errors::{DomainError, StoreError};
    use vendas_core::store::{CatalogStore, PageRequest};

    use super::SqlCatalogRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn products() -> Vec<NewProduct> {
        vec![
            NewProduct::new("Camiseta", "Camiseta 100% algodão", Decimal::new(399, 1)),
            NewProduct::new("Boné", "Boné com logo", Decimal::new(295, 1)),
            NewProduct::new("Caneca", "Caneca cerâmica 300ml", Decimal::new(190, 1)),
        ]
    }

    #[tokio::test]
    async fn seed_inserts_only_into_empty_catalog() {
        let pool = setup().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        assert_eq!(repo.seed_if_empty(products()).await.expect("first seed"), 3);
        assert_eq!(repo.seed_if_empty(products()).await.expect("second seed"), 0);
        assert_eq!(repo.count_products().await.expect("count"), 3);

        pool.close().await;
    }

    #[tokio::test]
    async fn seeded_prices_are_read_back_exactly() {
        let pool = setup().await;
        let repo = SqlCatalogRepository::new(pool.clone());
        repo.seed_if_empty(products()).await.expect("seed");

        let camiseta =
            repo.find_product(ProductId(1)).await.expect("lookup").expect("product 1 exists");
        assert_eq!(camiseta.name, "Camiseta");
        assert_eq!(camiseta.price, Decimal::new(399, 1));
        assert_eq!(camiseta.description, "Camiseta 100% algodão");

        assert_eq!(repo.find_product(ProductId(999)).await.expect("lookup"), None);

        pool.close().await;
    }

    #[tokio::test]
    async fn listing_is_paged_by_ascending_id() {
        let pool = setup().await;
        let repo = SqlCatalogRepository::new(pool.clone());
        repo.seed_if_empty(products()).await.expect("seed");

        let all = repo.list_products(PageRequest::default()).await.expect("list");
        let ids = all.iter().map(|product| product.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);

        let page = repo.list_products(PageRequest { offset: 1, limit: 1 }).await.expect("page");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Boné");

        let again = repo.list_products(PageRequest::default()).await.expect("list again");
        assert_eq!(all, again);

        let beyond = repo.list_products(PageRequest { offset: 10, limit: 5 }).await.expect("page");
        assert!(beyond.is_empty());

        pool.close().await;
    }

    #[tokio::test]
    async fn seeding_nothing_is_a_no_op() {
        let pool = setup().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        assert_eq!(repo.seed_if_empty(Vec::new()).await.expect("seed"), 0);
        assert_eq!(repo.count_products().await.expect("count"), 0);

        pool.close().await;
    }

    #[tokio::test]
    async fn seed_rejects_invalid_products_and_inserts_nothing() {
        let pool = setup().await;
        let repo = SqlCatalogRepository::new(pool.clone());

        let mut batch = products();
        batch.push(NewProduct::new("Adesivo", "", Decimal::new(-50, 2)));
        let error = repo.seed_if_empty(batch).await.expect_err("negative price must be rejected");
        assert!(matches!(error, StoreError::Rejected(DomainError::InvariantViolation(_))));

        let error = repo
            .seed_if_empty(vec![NewProduct::new("  ", "", Decimal::ONE)])
            .await
            .expect_err("blank name must be rejected");
        assert!(matches!(error, StoreError::Rejected(DomainError::InvariantViolation(_))));

        assert_eq!(repo.count_products().await.expect("count"), 0);

        pool.close().await;
    }

    #[tokio::test]
    async fn schema_refuses_negative_price_written_directly() {
        let pool = setup().await;

        let result = sqlx::query(
            "INSERT INTO products (name, description, price) VALUES ('Adesivo', '', '-0.50')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "price check constraint should refuse negative amounts");

        pool.close().await;
    }
}
