use rust_decimal::Decimal;
use tracing::info;
use vendas_core::domain::product::NewProduct;
use vendas_core::errors::StoreError;
use vendas_core::store::{CatalogStore, PageRequest};

/// The sample catalog written on first boot.
const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Camiseta",
        description: "Camiseta 100% algodão",
        price_cents: 3990,
    },
    SeedProduct { name: "Boné", description: "Boné com logo", price_cents: 2950 },
    SeedProduct {
        name: "Caneca",
        description: "Caneca cerâmica 300ml",
        price_cents: 1900,
    },
];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub seeded: bool,
    pub inserted: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

pub struct CatalogSeed;

impl CatalogSeed {
    pub fn products() -> Vec<NewProduct> {
        SEED_PRODUCTS
            .iter()
            .map(|seed| {
                NewProduct::new(
                    seed.name,
                    seed.description,
                    Decimal::new(seed.price_cents, 2).normalize(),
                )
            })
            .collect()
    }

    /// Writes the sample catalog unless some product already exists.
    pub async fn load_if_empty(store: &dyn CatalogStore) -> Result<SeedResult, StoreError> {
        let inserted = store.seed_if_empty(Self::products()).await?;
        let result = SeedResult { seeded: inserted > 0, inserted };

        info!(
            event_name = "catalog.seed.completed",
            correlation_id = "bootstrap",
            seeded = result.seeded,
            inserted = result.inserted,
            "catalog seed check finished"
        );

        Ok(result)
    }

    /// Checks that every sample product is present by name with its seeded
    /// price.
    pub async fn verify(store: &dyn CatalogStore) -> Result<VerificationResult, StoreError> {
        let total = store.count_products().await?;
        let limit = u32::try_from(total).unwrap_or(u32::MAX);
        let products = store.list_products(PageRequest { offset: 0, limit }).await?;

        let checks = SEED_PRODUCTS
            .iter()
            .map(|seed| {
                let expected = Decimal::new(seed.price_cents, 2);
                let present = products
                    .iter()
                    .any(|product| product.name == seed.name && product.price == expected);
                (seed.name, present)
            })
            .collect::<Vec<_>>();
        let all_present = checks.iter().all(|(_, passed)| *passed);

        Ok(VerificationResult { all_present, checks })
    }
}
