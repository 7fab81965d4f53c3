//! # schema-publish
//!
//! One-shot command that updates an existing schema in a schema registry.
//!
//! ```bash
//! # Zip a directory of protos and upload it
//! schema-publish --schema-id 1f0c... --schema-name orders \
//!     --api-token $TOKEN --input-type dir --input ./protos --output protos.zip
//!
//! # Upload a precompiled descriptor set
//! protoc --include_imports -o set.pb protos/*.proto
//! schema-publish --schema-id 1f0c... --schema-name orders --input set.pb
//! ```
//!
//! Logs go to stderr and are controlled with `RUST_LOG`; stdout only carries
//! the final confirmation.

use clap::Parser;
use schema_publish::{commands, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli.cmd, cli.publish).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
