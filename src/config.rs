use crate::models::{
    object::BucketScope,
    restore::{RestoreParams, RetrievalTier},
};
use anyhow::{Result, ensure};
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Centralized application configuration, validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scope: BucketScope,
    pub client: ClientConfig,
    pub quiet: bool,
    pub command: Command,
}

/// Overrides applied on top of the default AWS provider chain.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Command-line configuration.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Restore archived S3 objects and check on their restore status"
)]
pub struct Args {
    /// Bucket holding the archived objects
    #[arg(short, long, value_name = "BUCKET_NAME")]
    pub bucket: String,

    /// Only operate on keys starting with this prefix
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// AWS region (defaults to the provider chain's region)
    #[arg(long)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Use path-style addressing (`endpoint/bucket/key`)
    #[arg(long)]
    pub force_path_style: bool,

    #[command(subcommand)]
    pub command: CommandArgs,
}

#[derive(Subcommand, Debug)]
pub enum CommandArgs {
    /// Request a restore for a single object
    RestoreSingleObject {
        key: String,
        #[command(flatten)]
        restore: RestoreArgs,
    },
    /// Request a restore for every object under the prefix
    RestoreObjects {
        #[command(flatten)]
        restore: RestoreArgs,
    },
    /// Report whether a single object has been restored
    IsObjectRestored { key: String },
    /// Report the restore status of every object under the prefix
    CheckRestoreStatus {
        /// Keep polling each object until its restore finishes
        #[arg(short, long)]
        wait: bool,

        /// Seconds between polls when waiting
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        poll_interval: u64,
    },
}

#[derive(clap::Args, Debug)]
pub struct RestoreArgs {
    /// Days the restored copy stays available
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..))]
    pub days: i32,

    /// Retrieval tier
    #[arg(short, long, value_enum, default_value_t = RetrievalTier::Standard)]
    pub tier: RetrievalTier,
}

/// The validated command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RestoreSingleObject { key: String, params: RestoreParams },
    RestoreObjects { params: RestoreParams },
    IsObjectRestored { key: String },
    CheckRestoreStatus { wait: Option<Duration> },
}

impl AppConfig {
    /// Parse process arguments into an AppConfig.
    pub fn from_args() -> Result<Self> {
        Self::try_from(Args::parse())
    }
}

impl TryFrom<Args> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        let bucket = args.bucket.trim().to_string();
        ensure!(!bucket.is_empty(), "bucket name must not be empty");

        let command = match args.command {
            CommandArgs::RestoreSingleObject { key, restore } => {
                ensure!(!key.is_empty(), "object key must not be empty");
                Command::RestoreSingleObject {
                    key,
                    params: restore.into(),
                }
            }
            CommandArgs::RestoreObjects { restore } => Command::RestoreObjects {
                params: restore.into(),
            },
            CommandArgs::IsObjectRestored { key } => {
                ensure!(!key.is_empty(), "object key must not be empty");
                Command::IsObjectRestored { key }
            }
            CommandArgs::CheckRestoreStatus {
                wait,
                poll_interval,
            } => Command::CheckRestoreStatus {
                wait: wait.then(|| Duration::from_secs(poll_interval)),
            },
        };

        Ok(Self {
            scope: BucketScope::new(bucket, args.prefix),
            client: ClientConfig {
                region: args.region,
                endpoint_url: args.endpoint_url,
                force_path_style: args.force_path_style,
            },
            quiet: args.quiet,
            command,
        })
    }
}

impl From<RestoreArgs> for RestoreParams {
    fn from(args: RestoreArgs) -> Self {
        Self {
            days: args.days,
            tier: args.tier,
        }
    }
}
