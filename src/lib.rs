pub mod core;
pub mod schedule;
pub mod schemas;
pub mod services;
pub mod store;
pub mod wizard;

use crate::core::{config::Settings, telemetry};

/// Load `.env`, settings, and tracing in one go for embedding shells that
/// don't need finer control.
pub fn init() -> anyhow::Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    tracing::debug!(
        environment = %settings.runtime().environment.as_str(),
        api_base_url = %settings.api().base_url,
        "ReportDesk core initialized"
    );

    Ok(settings)
}
