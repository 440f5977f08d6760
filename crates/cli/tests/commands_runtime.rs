use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use vendas_cli::commands::{config, doctor, migrate, seed};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("VENDAS_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["error_class"], Value::Null);
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("VENDAS_DATABASE_URL", "postgres://localhost/vendas")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_reports_connectivity_failure_for_missing_directory() {
    with_env(
        &[
            ("VENDAS_DATABASE_URL", "sqlite:///nonexistent-vendas-dir/nested/vendas.db"),
            ("VENDAS_DATABASE_TIMEOUT_SECS", "1"),
        ],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 4, "expected db connectivity failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["error_class"], "db_connectivity");
        },
    );
}

#[test]
fn seed_inserts_sample_catalog_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("vendas.db").display());

    with_env(&[("VENDAS_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["command"], "seed");
        assert_eq!(first_payload["status"], "ok");
        assert_eq!(first_payload["message"], "seeded 3 sample products");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected repeated seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["status"], "ok");
        assert_eq!(second_payload["message"], "catalog already populated; no products inserted");
    });
}

#[test]
fn seed_releases_database_after_failed_migration() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("vendas.db").display());
    execute_sql(&url, "CREATE TABLE products (id INTEGER PRIMARY KEY)");

    with_env(&[("VENDAS_DATABASE_URL", url.as_str())], || {
        let failed = seed::run();
        assert_eq!(failed.exit_code, 5, "conflicting products table should break migration");
        assert_eq!(parse_payload(&failed.output)["error_class"], "migration");

        execute_sql(&url, "DROP TABLE products");

        let repaired = seed::run();
        assert_eq!(repaired.exit_code, 0, "{}", repaired.output);
        assert_eq!(parse_payload(&repaired.output)["message"], "seeded 3 sample products");
    });
}

#[test]
fn config_reports_env_sourced_values() {
    with_env(
        &[
            ("VENDAS_DATABASE_URL", "sqlite::memory:"),
            ("VENDAS_ORDERS_QUANTITY_POLICY", "reject"),
            ("VENDAS_LOG_LEVEL", "debug"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "config");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains(
                "- orders.quantity_policy = reject (source: env (VENDAS_ORDERS_QUANTITY_POLICY))"
            ));
            assert!(message.contains("- logging.level = debug (source: env (VENDAS_LOG_LEVEL))"));
            assert!(message.contains("- server.port = 8000 (source: default)"));
        },
    );
}

#[test]
fn config_treats_empty_env_values_as_unset() {
    with_env(
        &[
            ("VENDAS_DATABASE_URL", "sqlite::memory:"),
            ("VENDAS_SERVER_PORT", ""),
            ("VENDAS_LOGGING_LEVEL", "  "),
            ("VENDAS_LOG_LEVEL", "warn"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("- server.port = 8000 (source: default)"), "{message}");
            assert!(
                message.contains("- logging.level = warn (source: env (VENDAS_LOG_LEVEL))"),
                "{message}"
            );
        },
    );
}

#[test]
fn config_returns_failure_for_invalid_policy() {
    with_env(&[("VENDAS_ORDERS_QUANTITY_POLICY", "drop")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_flags_unmigrated_database() {
    with_env(&[("VENDAS_DATABASE_URL", "sqlite::memory:")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1, "fresh in-memory database has no catalog tables");

        let report: Value = serde_json::from_str(&result.output).expect("doctor json");
        assert_eq!(report["overall_status"], "fail");
        let checks = report["checks"].as_array().cloned().unwrap_or_default();
        let status_of = |name: &str| {
            checks
                .iter()
                .find(|check| check["name"] == name)
                .map(|check| check["status"].clone())
                .unwrap_or(Value::Null)
        };
        assert_eq!(status_of("config_validation"), "pass");
        assert_eq!(status_of("database_connectivity"), "pass");
        assert_eq!(status_of("catalog_schema"), "fail");
    });
}

#[test]
fn doctor_passes_after_seed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("vendas.db").display());

    with_env(&[("VENDAS_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = doctor::run(false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("doctor: all readiness checks passed"));
        assert!(result.output.contains("catalog tables present with 3 products"));
    });
}

fn execute_sql(url: &str, statement: &str) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime");
    runtime.block_on(async {
        let pool = sqlx::SqlitePool::connect(url).await.expect("open test database");
        sqlx::query(statement).execute(&pool).await.expect("execute statement");
        pool.close().await;
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(last_line(output)).expect("command output should be valid json")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "VENDAS_DATABASE_URL",
        "VENDAS_DATABASE_MAX_CONNECTIONS",
        "VENDAS_DATABASE_TIMEOUT_SECS",
        "VENDAS_SERVER_BIND_ADDRESS",
        "VENDAS_SERVER_PORT",
        "VENDAS_SERVER_CORS_PERMISSIVE",
        "VENDAS_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "VENDAS_CATALOG_SEED_ON_STARTUP",
        "VENDAS_CATALOG_MAX_PAGE_SIZE",
        "VENDAS_ORDERS_QUANTITY_POLICY",
        "VENDAS_LOGGING_LEVEL",
        "VENDAS_LOGGING_FORMAT",
        "VENDAS_LOG_LEVEL",
        "VENDAS_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
