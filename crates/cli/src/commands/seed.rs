use crate::commands::{build_runtime, exit_code, load_config, CommandResult};
use vendas_db::{
    connect_with_config, migrations, CatalogSeed, DbPool, SeedResult, SqlCatalogRepository,
    VerificationResult,
};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), exit_code::DB_CONNECTIVITY))?;
        let outcome = seed_catalog(&pool).await;
        pool.close().await;
        outcome
    });

    match result {
        Ok((seed_result, verification)) if verification.all_present => {
            CommandResult::success("seed", seed_message(&seed_result))
        }
        Ok((seed_result, verification)) => CommandResult::failure(
            "seed",
            "seed_verification",
            verification_message(&seed_result, &verification),
            exit_code::SEED_VERIFICATION,
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

type Failure = (&'static str, String, u8);

async fn seed_catalog(pool: &DbPool) -> Result<(SeedResult, VerificationResult), Failure> {
    migrations::run_pending(pool)
        .await
        .map_err(|error| ("migration", error.to_string(), exit_code::MIGRATION))?;

    let store = SqlCatalogRepository::new(pool.clone());
    let seed_result = CatalogSeed::load_if_empty(&store)
        .await
        .map_err(|error| ("seed_execution", error.to_string(), exit_code::SEED_EXECUTION))?;
    let verification = CatalogSeed::verify(&store)
        .await
        .map_err(|error| ("seed_verification", error.to_string(), exit_code::SEED_VERIFICATION))?;

    Ok((seed_result, verification))
}

fn seed_message(result: &SeedResult) -> String {
    if result.seeded {
        format!("seeded {} sample products", result.inserted)
    } else {
        "catalog already populated; no products inserted".to_string()
    }
}

/// Names the sample products absent from the catalog after the run.
fn verification_message(result: &SeedResult, verification: &VerificationResult) -> String {
    let missing = verification
        .checks
        .iter()
        .filter_map(|(name, present)| (!present).then_some(*name))
        .collect::<Vec<_>>();

    let prefix = if result.seeded { "seeded catalog" } else { "existing catalog" };
    if missing.is_empty() {
        format!("{prefix} failed verification")
    } else {
        format!("{prefix} is missing sample products: {}", missing.join(", "))
    }
}
