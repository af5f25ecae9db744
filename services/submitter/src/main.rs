use anyhow::Result;
use shared::errors::ServiceError;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submitter::{Config, Pipeline, RpcEndpoint, SubmitterError};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Human-readable by default; JSON for log shipping
    let use_json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "submitter=info".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    tracing::info!(
        service = "submitter",
        version = env!("CARGO_PKG_VERSION"),
        log_format = if use_json { "json" } else { "text" },
        "Starting submitter"
    );

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => return Ok(exit_with(e)),
    };
    tracing::info!(
        cluster = %config.solana.cluster,
        rpc_url = %config.solana.rpc_url,
        commitment = %config.solana.commitment,
        program_id = %config.submitter.target_program_id,
        airdrop = %config.submitter.airdrop_lamports,
        "Configuration loaded"
    );

    let rpc = Arc::new(RpcEndpoint::connect(&config.solana));
    let pipeline = Pipeline::new(config, rpc);

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => return Ok(exit_with(e)),
    };

    tracing::info!(
        run_id = %report.run_id,
        explorer_url = %report.explorer_url,
        "Run finished"
    );

    if std::env::var("REPORT_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_with(error: SubmitterError) -> ExitCode {
    let error = ServiceError::from(error);
    match error.category.log_level() {
        "warn" => tracing::warn!(code = %error.code, error = %error, "Run aborted"),
        _ => tracing::error!(code = %error.code, error = %error, "Run aborted"),
    }
    ExitCode::from(error.category.exit_code())
}
