use crate::config::{ArchiveKind, Config};
use crate::constants::{ACCOUNT_ENDPOINT, REQUEST_TIMEOUT_SECS, SCHEMA_ENDPOINT};
use crate::error::{PublishError, Result};
use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;

/// Schema record as stored by the registry
///
/// Missing fields decode to their zero value and a `null` file list to an
/// empty one, so partially populated records still decode.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub root_type: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub team_id: String,
    pub shared: bool,
    pub archived: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub proto_files: Vec<ProtoFile>,
    pub inserted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One `.proto` file belonging to a schema
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProtoFile {
    pub id: String,
    pub file_name: String,
    pub contents: String,
    pub schema_id: String,
    pub inserted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `PUT /v1/schema`
///
/// `schema_archive` carries the archive bytes base64-encoded exactly once.
#[derive(Serialize, Debug)]
pub struct SchemaUpdateRequest {
    pub schema_id: String,
    pub name: String,
    pub schema_archive: String,
    pub schema_archive_type: ArchiveKind,
}

impl SchemaUpdateRequest {
    pub fn new(cfg: &Config, archive: &[u8]) -> Self {
        SchemaUpdateRequest {
            schema_id: cfg.schema_id.clone(),
            name: cfg.schema_name.clone(),
            schema_archive: base64::encode_config(archive, base64::STANDARD),
            schema_archive_type: cfg.archive_kind,
        }
    }
}

pub struct RegistryClient {
    pub base_url: String,
    pub client: Client,
}

impl RegistryClient {
    /// Build a client and check the token against `/v1/account`
    ///
    /// # Errors
    /// Returns [`PublishError::Authentication`] with the status and body when
    /// the account probe does not answer 200.
    pub async fn connect(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut hv = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| PublishError::validation("api-token", e.to_string()))?;
        hv.set_sensitive(true);
        headers.insert(AUTHORIZATION, hv);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let registry = RegistryClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        };

        let url = format!("{}{}", registry.base_url, ACCOUNT_ENDPOINT);
        let resp = registry.client.get(&url).send().await?;
        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let body = resp.text().await?;
            return Err(PublishError::Authentication { status, body });
        }
        debug!(%url, "account probe succeeded");

        Ok(registry)
    }

    /// Fetch the current version of a schema
    pub async fn get_schema(&self, schema_id: &str) -> Result<Schema> {
        let url = format!("{}{}/{}", self.base_url, SCHEMA_ENDPOINT, schema_id);
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    /// Upload a new archive for the configured schema
    pub async fn update_schema(&self, cfg: &Config, archive: &[u8]) -> Result<Schema> {
        let url = format!("{}{}", self.base_url, SCHEMA_ENDPOINT);
        let body = SchemaUpdateRequest::new(cfg, archive);
        let resp = self.client.put(&url).json(&body).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if status != StatusCode::OK {
        return Err(PublishError::Remote { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}
