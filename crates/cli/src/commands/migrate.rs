use crate::commands::{build_runtime, exit_code, load_config, CommandResult};
use vendas_db::{connect_with_config, migrations};

pub fn run() -> CommandResult {
    let config = match load_config("migrate") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("migrate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), exit_code::DB_CONNECTIVITY))?;
        let migrated = migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), exit_code::MIGRATION));
        pool.close().await;
        migrated
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
