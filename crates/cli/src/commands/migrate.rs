use crate::commands::CommandResult;
use frontdesk_core::config::{AppConfig, LoadOptions};
use frontdesk_db::{connect, migrations};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    runtime.block_on(async {
        let pool = match connect(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return CommandResult::failure("migrate", "db_connectivity", error.to_string(), 4);
            }
        };

        let result = match migrations::run_pending(&pool).await {
            Ok(total) => CommandResult::success(
                "migrate",
                format!("schema is current at {total} migrations"),
            ),
            Err(error) => CommandResult::failure("migrate", "migration", error.to_string(), 5),
        };
        pool.close().await;
        result
    })
}
