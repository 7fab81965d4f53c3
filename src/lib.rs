//! # schema-publish
//!
//! Packages protobuf schema artifacts and publishes them to a remote schema
//! registry, replacing the archive of an existing schema record.

use clap::Parser;

pub mod archive;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod registry;

/// Publish protobuf schemas to a schema registry
///
/// Either zips a directory of `.proto` files or takes a precompiled
/// descriptor set, checks that the target schema exists with the same type,
/// and uploads the archive as its new version.
#[derive(Parser)]
#[command(
    name = constants::BIN_NAME,
    version,
    about = "Publish protobuf schema archives to a schema registry",
    long_about = "Package a directory of .proto files (zipped on the fly) or a precompiled descriptor set\nand upload it to a schema registry, updating an existing schema by ID.\n\nEvery option can also be given through its STREAMDAL_* environment variable.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,

    #[command(flatten)]
    pub publish: config::PublishArgs,
}
