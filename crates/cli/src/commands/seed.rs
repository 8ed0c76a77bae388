use crate::commands::CommandResult;
use leasey_core::config::{AppConfig, LoadOptions};
use leasey_db::{connect_with_settings, schema, SeedDataset};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        schema::create_all(&pool)
            .await
            .map_err(|error| ("schema_creation", error.to_string(), 5u8))?;

        SeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = SeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<(), (&'static str, String, u8)> = if !verification.all_present {
            let failed_checks = verification
                .checks
                .iter()
                .filter_map(|(check, passed)| (!passed).then_some(*check))
                .collect::<Vec<_>>();
            let message = if failed_checks.is_empty() {
                "Some seed data failed to load".to_string()
            } else {
                format!("Seed verification failed for checks: {}", failed_checks.join(", "))
            };
            Err(("seed_verification", message, 6u8))
        } else {
            Ok(())
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(()) => CommandResult::success(
            "seed",
            format!(
                "Seed dataset loaded into `{}`: 8 units, 10 amenities",
                config.database.url
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn verification_error_message_targets_failed_checks() {
        let checks = [("unit-count", true), ("amenity-count", false), ("pet-amenity-count", false)];

        let failed_checks = checks
            .iter()
            .filter_map(|(check, passed)| (!passed).then_some(*check))
            .collect::<Vec<_>>();

        let message = if failed_checks.is_empty() {
            "Some seed data failed to load".to_string()
        } else {
            format!("Seed verification failed for checks: {}", failed_checks.join(", "))
        };

        assert_eq!(
            message,
            "Seed verification failed for checks: amenity-count, pet-amenity-count"
        );
    }
}
