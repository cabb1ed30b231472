use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use post_search::{wait_until_ready, AppError, Dependencies};
use post_search_repository::IndexSettingsOverrides;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> Result<(), AppError> {
    let deps = Dependencies::new().await?;

    wait_until_ready(&deps.client, deps.readiness.timeout, deps.readiness.poll_interval).await?;

    deps.synchronizer
        .ensure_index(&IndexSettingsOverrides::none())
        .await?;
    info!(index = deps.synchronizer.index_name(), "Search index ready");

    let health = deps.client.cluster_health().await?;
    info!(
        cluster = %health.cluster_name,
        status = health.status.as_str(),
        nodes = health.number_of_nodes,
        active_shards = health.active_shards,
        unassigned_shards = health.unassigned_shards,
        "Cluster health"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
