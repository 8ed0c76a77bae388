use std::sync::Arc;
use std::time::Instant;

use crate::commands::CommandResult;
use leasey_agent::nl::SystemClock;
use leasey_agent::session::SessionState;
use leasey_agent::tools::{standard_registry, ALL_TOOL_NAMES};
use leasey_core::config::{AppConfig, LoadOptions};
use leasey_db::{connect_ephemeral, schema, SeedDataset};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

/// Runs the whole stack against a throwaway in-memory store: schema, seed
/// verification, and a real dispatch through the tool registry.
pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config_started = Instant::now();
    match AppConfig::load(LoadOptions::default()) {
        Ok(_) => checks.push(SmokeCheck {
            name: "config_validation",
            status: SmokeStatus::Pass,
            elapsed_ms: config_started.elapsed().as_millis() as u64,
            message: "configuration loaded and validated".to_string(),
        }),
        Err(error) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms: config_started.elapsed().as_millis() as u64,
                message: error.to_string(),
            });
            checks.push(skipped("store_bootstrap"));
            checks.push(skipped("tool_dispatch"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "store_bootstrap",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("tool_dispatch"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let bootstrap_started = Instant::now();
    let pool_result = runtime.block_on(async {
        let pool = connect_ephemeral().await.map_err(|error| error.to_string())?;
        schema::create_all(&pool).await.map_err(|error| error.to_string())?;
        SeedDataset::load(&pool).await.map_err(|error| error.to_string())?;
        let verification = SeedDataset::verify(&pool).await.map_err(|error| error.to_string())?;
        if !verification.all_present {
            return Err(format!("seed verification failed: {:?}", verification.checks));
        }
        Ok::<leasey_db::DbPool, String>(pool)
    });

    let pool = match pool_result {
        Ok(pool) => {
            checks.push(SmokeCheck {
                name: "store_bootstrap",
                status: SmokeStatus::Pass,
                elapsed_ms: bootstrap_started.elapsed().as_millis() as u64,
                message: "in-memory store created, seeded, and verified".to_string(),
            });
            pool
        }
        Err(message) => {
            checks.push(SmokeCheck {
                name: "store_bootstrap",
                status: SmokeStatus::Fail,
                elapsed_ms: bootstrap_started.elapsed().as_millis() as u64,
                message,
            });
            checks.push(skipped("tool_dispatch"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let dispatch_started = Instant::now();
    let dispatch_result = runtime.block_on(async {
        let registry = standard_registry(&pool, Arc::new(SystemClock));
        if registry.names() != ALL_TOOL_NAMES {
            return Err(format!("tool inventory mismatch: {:?}", registry.names()));
        }

        let mut session = SessionState::new();
        let policies = registry
            .dispatch("get_property_policies", Value::Null, &mut session)
            .await;
        if policies["status"] != "success" {
            return Err(format!("get_property_policies failed: {policies}"));
        }

        let search = registry
            .dispatch("query_units", json!({"unit_type": "1_bedroom"}), &mut session)
            .await;
        if search["status"] != "success" || search["available_count"] != json!(2) {
            return Err(format!("query_units returned unexpected payload: {search}"));
        }

        Ok(())
    });
    runtime.block_on(async {
        pool.close().await;
    });

    match dispatch_result {
        Ok(()) => checks.push(SmokeCheck {
            name: "tool_dispatch",
            status: SmokeStatus::Pass,
            elapsed_ms: dispatch_started.elapsed().as_millis() as u64,
            message: format!("{} tools registered; policy and search dispatch succeeded", ALL_TOOL_NAMES.len()),
        }),
        Err(message) => checks.push(SmokeCheck {
            name: "tool_dispatch",
            status: SmokeStatus::Fail,
            elapsed_ms: dispatch_started.elapsed().as_millis() as u64,
            message,
        }),
    }

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due to previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
