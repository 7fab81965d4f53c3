use anyhow::{Context, Result};
use tracing::info;

use crate::archive;
use crate::config::{Config, PublishArgs};
use crate::error::PublishError;
use crate::registry::{RegistryClient, Schema};

pub async fn run(args: PublishArgs) -> Result<()> {
    let cfg = Config::from_args(args).context("unable to validate options")?;
    execute(&cfg).await?;
    print!("{}", confirmation(&cfg));
    Ok(())
}

/// Run the publish flow for an already validated config
///
/// Nothing is built or uploaded unless the token is accepted and the remote
/// schema's type matches the configured one.
pub async fn execute(cfg: &Config) -> Result<Schema, PublishError> {
    let client = RegistryClient::connect(cfg.base_url(), &cfg.api_token).await?;
    info!(address = %cfg.base_url(), "connected to registry");

    let existing = client.get_schema(&cfg.schema_id).await?;
    info!(
        schema_id = %existing.id,
        name = %existing.name,
        schema_type = %existing.r#type,
        "fetched existing schema"
    );

    if existing.r#type != cfg.schema_type.as_str() {
        return Err(PublishError::Mismatch {
            schema_id: cfg.schema_id.clone(),
            expected: cfg.schema_type.to_string(),
            actual: existing.r#type,
        });
    }

    let data = archive::build_archive(cfg)?;
    info!(kind = %cfg.archive_kind, bytes = data.len(), "archive ready");

    if let Some(path) = &cfg.output {
        archive::write_archive(path, &data)?;
        info!(path = %path.display(), "archive written");
    }

    let updated = client.update_schema(cfg, &data).await?;
    info!(schema_id = %updated.id, "schema uploaded");
    Ok(updated)
}

/// Message printed once the registry has accepted the upload
pub fn confirmation(cfg: &Config) -> String {
    format!(
        "Schema updated!\nSchema ID: {}\nSchema name: {}\n",
        cfg.schema_id, cfg.schema_name
    )
}
