//! Endpoints, defaults and environment variable names shared across the crate.

pub const DEFAULT_API_ADDRESS: &str = "https://api.streamdal.com";
pub const DEFAULT_SCHEMA_TYPE: &str = "protobuf";
pub const DEFAULT_INPUT_TYPE: &str = "descriptor_set";

/// Request timeout applied to every registry call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

pub const ACCOUNT_ENDPOINT: &str = "/v1/account";
pub const SCHEMA_ENDPOINT: &str = "/v1/schema";

pub const ENV_SCHEMA_ID: &str = "STREAMDAL_SCHEMA_ID";
pub const ENV_SCHEMA_TYPE: &str = "STREAMDAL_SCHEMA_TYPE";
pub const ENV_SCHEMA_NAME: &str = "STREAMDAL_SCHEMA_NAME";
pub const ENV_API_TOKEN: &str = "STREAMDAL_API_TOKEN";
pub const ENV_API_ADDRESS: &str = "STREAMDAL_API_ADDRESS";
pub const ENV_INPUT: &str = "STREAMDAL_INPUT";
pub const ENV_INPUT_TYPE: &str = "STREAMDAL_INPUT_TYPE";
pub const ENV_OUTPUT: &str = "STREAMDAL_OUTPUT";

/// Binary name used in help output and generated completion scripts.
pub const BIN_NAME: &str = "schema-publish";
