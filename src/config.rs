//! Option resolution for a publish run
//!
//! Command-line flags are parsed by clap into [`PublishArgs`], with each flag
//! falling back to an environment variable and then to a default where one
//! exists:
//!
//! | flag            | environment variable      | default                     |
//! |-----------------|---------------------------|-----------------------------|
//! | `--schema-id`   | `STREAMDAL_SCHEMA_ID`     |                             |
//! | `--schema-type` | `STREAMDAL_SCHEMA_TYPE`   | `protobuf`                  |
//! | `--schema-name` | `STREAMDAL_SCHEMA_NAME`   |                             |
//! | `--api-token`   | `STREAMDAL_API_TOKEN`     |                             |
//! | `--api-address` | `STREAMDAL_API_ADDRESS`   | `https://api.streamdal.com` |
//! | `--input`       | `STREAMDAL_INPUT`         |                             |
//! | `--input-type`  | `STREAMDAL_INPUT_TYPE`    | `descriptor_set`            |
//! | `--output`      | `STREAMDAL_OUTPUT`        |                             |
//!
//! [`Config::from_args`] validates the raw values and produces the immutable
//! [`Config`] that the rest of the crate works from.

use clap::Args;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{PublishError, Result};

/// Raw publish options as given on the command line or through the environment
#[derive(Args, Debug, Clone, Default)]
pub struct PublishArgs {
    /// Schema ID that will be updated
    #[arg(long, env = ENV_SCHEMA_ID)]
    pub schema_id: Option<String>,

    /// Declared schema type (protobuf OR avro; only protobuf is supported)
    #[arg(long, env = ENV_SCHEMA_TYPE, default_value = DEFAULT_SCHEMA_TYPE)]
    pub schema_type: String,

    /// Updated schema name
    #[arg(long, env = ENV_SCHEMA_NAME)]
    pub schema_name: Option<String>,

    /// Registry API token (dashboard -> account -> security)
    #[arg(long, env = ENV_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// HTTP address of the registry API
    #[arg(long, env = ENV_API_ADDRESS, default_value = DEFAULT_API_ADDRESS)]
    pub api_address: String,

    /// Input file (descriptor set) or directory of .proto files
    #[arg(long, env = ENV_INPUT)]
    pub input: Option<PathBuf>,

    /// Type of data input (valid 'descriptor_set', 'dir')
    #[arg(long, env = ENV_INPUT_TYPE, default_value = DEFAULT_INPUT_TYPE)]
    pub input_type: String,

    /// Optional file to write the generated archive to
    #[arg(long, env = ENV_OUTPUT)]
    pub output: Option<PathBuf>,
}

/// Declared type of the schema being updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Protobuf,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Protobuf => "protobuf",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of the payload uploaded to the registry
///
/// Serializes to the `schema_archive_type` tag expected by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    /// Zip of the `.proto` files found under a directory
    ProtosArchive,
    /// Precompiled `FileDescriptorSet` read verbatim from disk
    DescriptorSet,
}

impl ArchiveKind {
    /// Parse an `--input-type` value; `dir` is an alias for `protos_archive`.
    pub fn from_input_type(value: &str) -> Option<Self> {
        match value {
            "dir" | "protos_archive" => Some(ArchiveKind::ProtosArchive),
            "descriptor_set" => Some(ArchiveKind::DescriptorSet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveKind::ProtosArchive => "protos_archive",
            ArchiveKind::DescriptorSet => "descriptor_set",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, immutable configuration for one publish run
#[derive(Clone)]
pub struct Config {
    pub schema_id: String,
    pub schema_type: SchemaType,
    pub schema_name: String,
    pub api_token: String,
    pub api_address: Url,
    pub input: PathBuf,
    pub archive_kind: ArchiveKind,
    pub output: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("schema_id", &self.schema_id)
            .field("schema_type", &self.schema_type)
            .field("schema_name", &self.schema_name)
            .field("api_token", &"<redacted>")
            .field("api_address", &self.api_address.as_str())
            .field("input", &self.input)
            .field("archive_kind", &self.archive_kind)
            .field("output", &self.output)
            .finish()
    }
}

impl Config {
    /// Validate raw options into a [`Config`]
    ///
    /// Only the filesystem is touched here; no network call is made.
    ///
    /// # Errors
    /// Returns [`PublishError::Validation`] naming the offending flag, or
    /// [`PublishError::Filesystem`] when the input path cannot be inspected.
    pub fn from_args(args: PublishArgs) -> Result<Self> {
        let input = args
            .input
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| PublishError::validation("input", "must be set"))?;

        let archive_kind = ArchiveKind::from_input_type(args.input_type.trim()).ok_or_else(|| {
            PublishError::validation(
                "input-type",
                format!(
                    "unrecognized value '{}' (valid 'descriptor_set', 'dir')",
                    args.input_type
                ),
            )
        })?;
        check_input(&input, archive_kind)?;

        let api_token = non_empty(args.api_token)
            .ok_or_else(|| PublishError::validation("api-token", "cannot be empty"))?;

        let schema_type = match args.schema_type.trim() {
            "protobuf" => SchemaType::Protobuf,
            other => {
                return Err(PublishError::validation(
                    "schema-type",
                    format!("'{other}' not supported (only 'protobuf')"),
                ))
            }
        };

        let schema_id = non_empty(args.schema_id)
            .ok_or_else(|| PublishError::validation("schema-id", "cannot be empty"))?;
        let schema_name = non_empty(args.schema_name)
            .ok_or_else(|| PublishError::validation("schema-name", "cannot be empty"))?;

        let api_address = parse_api_address(&args.api_address)?;

        let output = args.output.filter(|p| !p.as_os_str().is_empty());

        Ok(Config {
            schema_id,
            schema_type,
            schema_name,
            api_token,
            api_address,
            input,
            archive_kind,
            output,
        })
    }

    /// API address without a trailing slash, ready to have endpoint paths appended
    pub fn base_url(&self) -> &str {
        self.api_address.as_str().trim_end_matches('/')
    }
}

/// Blank values count as unset; anything else is kept exactly as given.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_input(input: &Path, kind: ArchiveKind) -> Result<()> {
    let meta = fs::metadata(input).map_err(|e| PublishError::filesystem(input, e))?;
    match kind {
        ArchiveKind::ProtosArchive => {
            if !meta.is_dir() {
                return Err(PublishError::validation(
                    "input",
                    format!("'{}' is not a directory", input.display()),
                ));
            }
        }
        ArchiveKind::DescriptorSet => {
            if !meta.is_file() {
                return Err(PublishError::validation(
                    "input",
                    format!("descriptor set '{}' is not a regular file", input.display()),
                ));
            }
            // stat succeeding doesn't mean we can read it
            fs::File::open(input).map_err(|e| PublishError::filesystem(input, e))?;
        }
    }
    Ok(())
}

fn parse_api_address(raw: &str) -> Result<Url> {
    let raw = match raw.trim() {
        "" => DEFAULT_API_ADDRESS,
        s => s,
    };
    let url = Url::parse(raw).map_err(|e| {
        PublishError::validation("api-address", format!("unable to parse '{raw}' as URL: {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(PublishError::validation(
            "api-address",
            format!("'{raw}' must be an http(s) URL with a host"),
        ));
    }
    Ok(url)
}
